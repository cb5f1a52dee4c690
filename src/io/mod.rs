//! Getting songs in and audio out: song JSON files, 16-bit WAV encoding and
//! the offline song renderer that feeds it.

pub mod export;
#[cfg(feature = "serde")]
pub mod song;
pub mod wav;

pub use export::Exporter;
#[cfg(feature = "serde")]
pub use song::{load_song, parse_song, save_song, song_to_json};
