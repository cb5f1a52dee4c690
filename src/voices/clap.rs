//! Clap voice.
//!
//! A hand clap is several hands hitting almost together. One band-passed
//! noise burst is retriggered three times, 30 ms apart, on a single gain
//! timeline.
//!
//! # How It Works
//!
//! 1. Shared noise through a band-pass at 1.5 kHz (Q 0.5)
//! 2. At 0, 30 and 60 ms: gain snaps to 0, rises to 0.8 over 10 ms
//! 3. Each burst schedules an exponential fall to 0.01 at +120 ms
//!
//! Events land on the timeline in time order, so the three rises happen
//! first and the decays stack up after the last one; the tail is a single
//! fall from 0.8 starting at 70 ms.

use std::sync::Arc;

use crate::dsp::automation::ParamTimeline;
use crate::dsp::noise::NoiseBuffer;
use crate::graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode, noise::NoiseNode, GraphNode};

pub const CLAP_LENGTH: f64 = 0.4;
pub const CLAP_HITS: [f64; 3] = [0.0, 0.03, 0.06];

/// Gain timeline of the three retriggered bursts.
pub fn clap_envelope(time: f64) -> ParamTimeline {
    let mut gain = ParamTimeline::new(0.0);
    gain.set_value_at_time(0.0, time);
    for offset in CLAP_HITS {
        let hit = time + offset;
        gain.set_value_at_time(0.0, hit)
            .linear_ramp_to_value_at_time(0.8, hit + 0.01)
            .exponential_ramp_to_value_at_time(0.01, hit + 0.12);
    }
    gain
}

/// Create a clap triggered at `time`.
pub fn clap(time: f64, noise: Arc<NoiseBuffer>) -> impl GraphNode {
    NoiseNode::new(noise, time, time + CLAP_LENGTH)
        .through(FilterNode::bandpass(1500.0).with_q(0.5))
        .amplify(EnvNode::new(clap_envelope(time)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_hit_restarts_from_silence() {
        let gain = clap_envelope(1.0);
        for offset in CLAP_HITS {
            assert_eq!(gain.value_at(1.0 + offset), 0.0);
            assert!((gain.value_at(1.0 + offset + 0.01) - 0.8).abs() < 1e-4);
        }
    }

    #[test]
    fn tail_decays_after_last_hit() {
        let gain = clap_envelope(0.0);
        assert!(gain.value_at(0.1) < 0.8);
        assert!((gain.value_at(0.3) - 0.01).abs() < 1e-4);
    }
}
