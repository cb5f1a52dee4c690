use std::fmt;

/// Errors raised at the control boundary (settings updates, song loading,
/// export). The render path never returns these; it clamps and logs instead.
#[derive(Debug)]
pub enum EngineError {
    /// Voice index outside `0..NUM_VOICES`
    InvalidVoice(usize),
    /// BPM outside the supported range
    BpmOutOfRange { bpm: f64, min: f64, max: f64 },
    /// An arpeggio must cycle through at least one interval
    EmptyArpeggio,
    /// The audio clock was closed and can no longer be resumed
    ClockClosed,
    /// Malformed song data (valid JSON, wrong shape)
    InvalidSong(String),
    #[cfg(feature = "serde")]
    Json(serde_json::Error),
    #[cfg(feature = "serde")]
    Config(toml::de::Error),
    Wav(hound::Error),
    Io(std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidVoice(voice) => write!(f, "voice {voice} does not exist"),
            EngineError::BpmOutOfRange { bpm, min, max } => {
                write!(f, "bpm {bpm} outside supported range {min}..={max}")
            }
            EngineError::EmptyArpeggio => write!(f, "arpeggio interval list cannot be empty"),
            EngineError::ClockClosed => write!(f, "audio clock is closed"),
            EngineError::InvalidSong(reason) => write!(f, "invalid song: {reason}"),
            #[cfg(feature = "serde")]
            EngineError::Json(e) => write!(f, "song json error: {e}"),
            #[cfg(feature = "serde")]
            EngineError::Config(e) => write!(f, "config error: {e}"),
            EngineError::Wav(e) => write!(f, "wav encoding error: {e}"),
            EngineError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "serde")]
            EngineError::Json(e) => Some(e),
            #[cfg(feature = "serde")]
            EngineError::Config(e) => Some(e),
            EngineError::Wav(e) => Some(e),
            EngineError::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Json(e)
    }
}

#[cfg(feature = "serde")]
impl From<toml::de::Error> for EngineError {
    fn from(e: toml::de::Error) -> Self {
        EngineError::Config(e)
    }
}

impl From<hound::Error> for EngineError {
    fn from(e: hound::Error) -> Self {
        EngineError::Wav(e)
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e)
    }
}
