use crate::synth::params::ArpeggioSettings;
use crate::synth::NoteTrigger;

/*
Arpeggiator
===========

Splits one sounding note into a run of shorter notes that cycle through the
voice's interval list.

  base    = duration / 8          eight subdivisions per note
  step    = base * 2^speed        speed 0..=4: 32nd up to half notes
  count   = max(1, floor(duration / step))

  sub-note i:  time  = t + i * step
               pitch = f * 2^(intervals[i % len] / 12)
               length = step, never slides

    speed 2, intervals [0, 4, 7], duration 0.22 s

    |--0--|--4--|--7--|--0--|
    t                        t + 0.22

Noise voices and voices with the arpeggio off pass straight through with
their slide intact.
*/

/// Expand `trigger` into the notes the voice should actually play.
pub fn expand(trigger: &NoteTrigger, settings: &ArpeggioSettings) -> Vec<NoteTrigger> {
    if !settings.enabled || trigger.wave.is_noise() {
        return vec![*trigger];
    }

    let step = step_duration(trigger.duration, settings.speed);
    let count = step_count(trigger.duration, step);
    let intervals: &[i32] = if settings.intervals.is_empty() {
        &[0]
    } else {
        &settings.intervals
    };

    (0..count)
        .map(|i| {
            let semitones = intervals[i % intervals.len()];
            NoteTrigger {
                frequency: transpose(trigger.frequency, semitones),
                time: trigger.time + i as f64 * step,
                duration: step,
                slide_from: None,
                ..*trigger
            }
        })
        .collect()
}

pub fn step_duration(duration: f64, speed: u8) -> f64 {
    let base = duration / 8.0;
    base * 2f64.powi(i32::from(speed))
}

fn step_count(duration: f64, step: f64) -> usize {
    if step <= 0.0 || !step.is_finite() {
        return 1;
    }
    // Guard against 0.22 / 0.055 landing a hair under 4.
    let exact = duration / step;
    ((exact + 1e-9).floor() as usize).max(1)
}

#[inline]
pub fn transpose(frequency: f32, semitones: i32) -> f32 {
    frequency * 2f32.powf(semitones as f32 / 12.0)
}
