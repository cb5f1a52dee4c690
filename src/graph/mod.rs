//! Composable building blocks for constructing audio-processing graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with what a scheduled note
//! needs: start/stop times, parameter timelines and block-based rendering.
//! The `extensions` module adds fluent helpers so note and drum graphs read
//! as a signal chain.

/// Multiply two signals together (amplitude control).
pub mod amplify;
/// Waveshaping drive with dry/wet blend.
pub mod distortion;
/// Parameter timeline rendered as a control signal.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.through()`, `.sum()`).
pub mod extensions;
/// State-variable filter node with cutoff automation.
pub mod filter;
/// Parallel summing: two-way `Sum`, N-way equal-power `Layer`.
pub mod mix;
/// Core traits shared by all graph nodes.
pub mod node;
/// One-shot noise buffer playback.
pub mod noise;
/// Scheduled oscillators with pitch automation and vibrato.
pub mod oscillator;
/// Serial chaining of two nodes (source → processor).
pub mod through;

pub use extensions::NodeExt;
pub use node::{GraphNode, RenderCtx};
