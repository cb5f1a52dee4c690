/// Longest delay a channel strip can hold, in seconds.
pub const MAX_DELAY_SECONDS: f32 = 2.0;

/// Ring-buffer delay line sized for [`MAX_DELAY_SECONDS`] at a given rate.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_max_seconds(sample_rate, MAX_DELAY_SECONDS)
    }

    pub fn with_max_seconds(sample_rate: f32, max_seconds: f32) -> Self {
        let len = ((sample_rate * max_seconds).ceil() as usize).max(1) + 1;
        Self {
            buffer: vec![0.0; len],
            write_pos: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Read the sample written `delay_samples` frames ago without advancing.
    #[inline]
    pub fn read(&self, delay_samples: usize) -> f32 {
        let len = self.buffer.len();
        let delay_samples = delay_samples.clamp(1, len - 1);
        let read_pos = (self.write_pos + len - delay_samples) % len;
        self.buffer[read_pos]
    }

    /// Store `sample` at the write head and advance.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Write `sample`, return the one `delay_samples` frames old.
    pub fn next_sample(&mut self, sample: f32, delay_samples: usize) -> f32 {
        let delayed = self.read(delay_samples);
        self.write(sample);
        delayed
    }

    pub fn render(&mut self, buffer: &mut [f32], delay_samples: usize) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, delay_samples);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

/// Convert a delay time in seconds to whole frames, clamped to what the line can hold.
#[inline]
pub fn delay_frames(seconds: f32, sample_rate: f32) -> usize {
    let seconds = if seconds.is_finite() {
        seconds.clamp(0.0, MAX_DELAY_SECONDS)
    } else {
        0.0
    };
    (seconds * sample_rate).round() as usize
}
