//! Song files.
//!
//! The on-disk shape is the workstation's JSON:
//! `{version, bpm, patternLibrary, songArrangement, waveTypes, octaves,
//! voiceSettings, mixerSettings}`. Cells may be legacy booleans; they are
//! normalised on read and always written back in object form.

use std::path::Path;

use crate::error::{EngineError, Result};
use crate::sequencing::song::{Song, SONG_VERSION};

pub fn parse_song(json: &str) -> Result<Song> {
    let song: Song = serde_json::from_str(json)?;
    validate(&song)?;
    Ok(song)
}

pub fn song_to_json(song: &Song) -> Result<String> {
    Ok(serde_json::to_string_pretty(song)?)
}

pub fn load_song(path: impl AsRef<Path>) -> Result<Song> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let song = parse_song(&json)?;
    log::info!(
        "read {}: {} patterns, {} slots",
        path.display(),
        song.pattern_library.len(),
        song.song_arrangement.filled_count()
    );
    Ok(song)
}

pub fn save_song(path: impl AsRef<Path>, song: &Song) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, song_to_json(song)?)?;
    log::info!("saved song to {}", path.display());
    Ok(())
}

fn validate(song: &Song) -> Result<()> {
    if song.version > SONG_VERSION {
        return Err(EngineError::InvalidSong(format!(
            "version {} is newer than supported version {SONG_VERSION}",
            song.version
        )));
    }
    let patterns = song.pattern_library.len();
    if let Some((slot, index)) = song
        .song_arrangement
        .filled()
        .find(|&(_, index)| index >= patterns)
    {
        return Err(EngineError::InvalidSong(format!(
            "slot {slot} refers to pattern {index}, library has {patterns}"
        )));
    }
    Ok(())
}
