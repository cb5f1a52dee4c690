//! Sequencer data: the note grids, saved patterns, the song arrangement and
//! the session state the transport reads.

pub mod arrangement;
pub mod demo;
pub mod library;
pub mod notes;
pub mod pattern;
pub mod presets;
pub mod random;
pub mod session;
pub mod song;

pub use arrangement::SongArrangement;
pub use demo::demo_song;
pub use library::{LibraryPattern, PatternLibrary};
pub use pattern::{DrumPattern, Note, Pattern, VoicePattern};
pub use presets::{Preset, PRESETS};
pub use random::seeded_pattern;
pub use session::Session;
pub use song::Song;
