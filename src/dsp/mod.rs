//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! making them safe to embed directly inside note graphs and channel strips.
//! They stay focused on the signal-processing math so graph nodes can layer
//! on scheduling and routing.

/// Sample-accurate parameter automation (set / linear / exponential ramps).
pub mod automation;
/// Ring-buffer delay line.
pub mod delay;
/// Table waveshaper and the drive curve.
pub mod distortion;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Summing, scaling and dry/wet helpers.
pub mod mix;
/// White noise buffers.
pub mod noise;
/// Oscillator waveforms and wavetables.
pub mod oscillator;

pub use automation::ParamTimeline;
