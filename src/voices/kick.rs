//! Kick drum voice.
//!
//! A sine wave whose pitch dives from 120 Hz to 40 Hz in 150 ms while its
//! level falls from full scale to near silence over 350 ms. The fast pitch
//! drop is the "punch"; the slow tail is the body.
//!
//! # Timeline (from trigger time `t`)
//!
//! | param     | t     | t + 0.15 | t + 0.35 | t + 0.5 |
//! | --------- | ----- | -------- | -------- | ------- |
//! | frequency | 120   | 40 (exp) |          |         |
//! | gain      | 1.0   |          | 0.001    | stop    |

use crate::dsp::automation::ParamTimeline;
use crate::dsp::oscillator::OscillatorWaveform;
use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode, GraphNode};

pub const KICK_LENGTH: f64 = 0.5;

/// Create a kick drum triggered at `time`.
pub fn kick(time: f64) -> impl GraphNode {
    let mut pitch = ParamTimeline::new(120.0);
    pitch
        .set_value_at_time(120.0, time)
        .exponential_ramp_to_value_at_time(40.0, time + 0.15);

    OscNode::new(OscillatorWaveform::Sine, pitch, time, time + KICK_LENGTH)
        .amplify(EnvNode::exp_decay(1.0, 0.001, time, time + 0.35))
}
