use crate::dsp::delay::{delay_frames, DelayLine};
use crate::dsp::filter::SVFilter;
use crate::dsp::mix::scale_in_place;
use crate::mixer::settings::{ChannelSettings, ChannelUpdate, HIGHPASS_BYPASS_HZ, LOWPASS_BYPASS_HZ};

/*
Channel Strip
=============

One per voice, built the first time the voice is touched and kept for the
life of the engine. The topology never changes; switching a stage off moves
its parameter to a neutral value instead of removing it.

  input → gain → low-pass → high-pass ──→ dry (1.0) ─────────────→ master
                                  │
                                  └──→ (+) → delay ─┬─→ wet (mix) → master
                                        ↑           │
                                        └─ feedback ┘

  low-pass off   skipped; cutoff reads 22 kHz (the filter clamps to
                 0.49 × sample rate, so running it would still colour the top)
  high-pass off  skipped; cutoff reads 20 Hz
  delay off      wet gain 0 (the line keeps running, so re-enabling picks
                 up whatever is still circulating)
  channel off    gain 0 until the next volume write, which sets the gain
                 directly just as it does on an enabled channel

Parameter writes are immediate jumps at the next block.
*/

#[derive(Debug, Clone)]
pub struct ChannelStrip {
    settings: ChannelSettings,
    sample_rate: f32,

    // Live values, derived from settings on every update.
    gain: f32,
    lowpass: SVFilter,
    highpass: SVFilter,
    delay: DelayLine,
    delay_frames: usize,
    feedback: f32,
    wet: f32,
}

impl ChannelStrip {
    pub fn new(sample_rate: f32) -> Self {
        let settings = ChannelSettings::default();
        Self {
            settings,
            sample_rate,
            gain: settings.volume,
            lowpass: SVFilter::lowpass(LOWPASS_BYPASS_HZ).with_q(settings.lp_q),
            highpass: SVFilter::highpass(HIGHPASS_BYPASS_HZ).with_q(settings.hp_q),
            delay: DelayLine::new(sample_rate),
            delay_frames: delay_frames(settings.delay_time, sample_rate),
            feedback: settings.delay_feedback,
            wet: 0.0,
        }
    }

    /// Stored settings, including the channel enable flag.
    pub fn settings(&self) -> ChannelSettings {
        self.settings
    }

    pub fn update(&mut self, update: ChannelUpdate) {
        let s = &mut self.settings;

        if let Some(volume) = update.volume {
            s.volume = volume;
            self.gain = volume;
        }

        if let Some(enabled) = update.lp_enabled {
            if enabled && !s.lp_enabled {
                self.lowpass.reset();
            }
            s.lp_enabled = enabled;
            self.lowpass
                .set_cutoff(if enabled { s.lp_freq } else { LOWPASS_BYPASS_HZ });
        }
        if let Some(freq) = update.lp_freq {
            s.lp_freq = freq;
            if s.lp_enabled {
                self.lowpass.set_cutoff(freq);
            }
        }
        if let Some(q) = update.lp_q {
            s.lp_q = q;
            self.lowpass.set_q(q);
        }

        if let Some(enabled) = update.hp_enabled {
            if enabled && !s.hp_enabled {
                self.highpass.reset();
            }
            s.hp_enabled = enabled;
            self.highpass
                .set_cutoff(if enabled { s.hp_freq } else { HIGHPASS_BYPASS_HZ });
        }
        if let Some(freq) = update.hp_freq {
            s.hp_freq = freq;
            if s.hp_enabled {
                self.highpass.set_cutoff(freq);
            }
        }
        if let Some(q) = update.hp_q {
            s.hp_q = q;
            self.highpass.set_q(q);
        }

        if let Some(enabled) = update.delay_enabled {
            s.delay_enabled = enabled;
            self.wet = if enabled { s.delay_mix } else { 0.0 };
        }
        if let Some(time) = update.delay_time {
            s.delay_time = time;
            self.delay_frames = delay_frames(time, self.sample_rate);
        }
        if let Some(feedback) = update.delay_feedback {
            s.delay_feedback = feedback;
            self.feedback = feedback;
        }
        if let Some(mix) = update.delay_mix {
            s.delay_mix = mix;
            if s.delay_enabled {
                self.wet = mix;
            }
        }

        if let Some(enabled) = update.enabled {
            s.enabled = enabled;
            self.gain = if enabled { s.volume } else { 0.0 };
        }
    }

    /// Run `buffer` through the strip in place.
    pub fn process(&mut self, buffer: &mut [f32]) {
        scale_in_place(buffer, self.gain);
        if self.settings.lp_enabled {
            self.lowpass.render(buffer, self.sample_rate);
        }
        if self.settings.hp_enabled {
            self.highpass.render(buffer, self.sample_rate);
        }

        for sample in buffer.iter_mut() {
            let dry = *sample;
            let delayed = self.delay.read(self.delay_frames);
            self.delay.write(dry + delayed * self.feedback);
            *sample = dry + delayed * self.wet;
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn lowpass_cutoff(&self) -> f32 {
        self.lowpass.cutoff_hz
    }

    pub fn highpass_cutoff(&self) -> f32 {
        self.highpass.cutoff_hz
    }

    pub fn wet_gain(&self) -> f32 {
        self.wet
    }

    pub fn delay_frames(&self) -> usize {
        self.delay_frames
    }
}
