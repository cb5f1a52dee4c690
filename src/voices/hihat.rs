//! Hi-hat voice (closed).
//!
//! A tight, short burst of filtered noise. Closed hi-hats are the backbone
//! of most drum patterns, providing rhythmic drive.
//!
//! # How It Works
//!
//! 1. Shared noise provides the "metallic" character
//! 2. High-pass at 6 kHz removes everything but the sizzle
//! 3. 0.7 → 0.01 over 80 ms for that tight "tss" sound

use std::sync::Arc;

use crate::dsp::noise::NoiseBuffer;
use crate::graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode, noise::NoiseNode, GraphNode};

pub const HIHAT_LENGTH: f64 = 0.15;

/// Create a closed hi-hat triggered at `time`.
pub fn hihat(time: f64, noise: Arc<NoiseBuffer>) -> impl GraphNode {
    NoiseNode::new(noise, time, time + HIHAT_LENGTH)
        .through(FilterNode::highpass(6000.0))
        .amplify(EnvNode::exp_decay(0.7, 0.01, time, time + 0.08))
}
