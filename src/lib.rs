pub mod config;
pub mod dsp;
pub mod engine; // Audio clock, command queue and note scheduling
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod io;
pub mod mixer; // Persistent per-voice channel strips
pub mod sequencing; // Patterns, library and song arrangement
pub mod synth; // Voice settings and per-note graphs
pub mod transport; // Step clock
pub mod voices; // Drum kit

pub use config::{EngineConfig, SlideResolution};
pub use engine::Engine;
pub use error::{EngineError, Result};

pub const MAX_BLOCK_SIZE: usize = 2048;

/// Steps in one pattern loop.
pub const NUM_STEPS: usize = 16;
/// Melodic voices.
pub const NUM_VOICES: usize = 3;
/// Pitch rows per voice.
pub const NUM_ROWS: usize = 8;
/// Drum rows.
pub const NUM_DRUMS: usize = 7;
pub const MAX_SONG_SLOTS: usize = 32;

/// Lowest cutoff any filter is driven to.
pub const MIN_FILTER_FREQ: f32 = 20.0;
