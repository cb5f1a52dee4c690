//! The fixed drum kit.
//!
//! Each drum is a recipe that takes only a trigger time and returns a ready
//! graph. Drums ignore voice settings and route straight to the master bus.
//! The noise drums all play from one shared second of noise (see
//! [`NoiseBank::shared`]), built the first time any of them fires.
//!
//! # Example
//!
//! ```ignore
//! use stepsynth::voices::{self, Drum};
//!
//! let mut noise = NoiseBank::new(44_100.0, None);
//! let graph = voices::drum(Drum::Snare, 1.25, &mut noise);
//! let stop = 1.25 + Drum::Snare.length();
//! ```

mod clap;
mod crash;
mod hihat;
mod kick;
mod openhat;
mod snare;
mod tom;

pub use clap::{clap, clap_envelope};
pub use crash::crash;
pub use hihat::hihat;
pub use kick::kick;
pub use openhat::openhat;
pub use snare::snare;
pub use tom::tom;

use crate::dsp::noise::NoiseBank;
use crate::graph::{GraphNode, NodeExt};
use crate::NUM_DRUMS;

/// Drum rows, in pattern row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Drum {
    Kick,
    Snare,
    Clap,
    ClosedHat,
    OpenHat,
    Tom,
    Crash,
}

impl Drum {
    pub const ALL: [Drum; NUM_DRUMS] = [
        Drum::Kick,
        Drum::Snare,
        Drum::Clap,
        Drum::ClosedHat,
        Drum::OpenHat,
        Drum::Tom,
        Drum::Crash,
    ];

    pub fn from_index(index: usize) -> Option<Drum> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Drum::Kick => "Kick",
            Drum::Snare => "Snare",
            Drum::Clap => "Clap",
            Drum::ClosedHat => "Closed Hat",
            Drum::OpenHat => "Open Hat",
            Drum::Tom => "Tom",
            Drum::Crash => "Crash",
        }
    }

    /// Seconds from trigger until the drum's sources stop.
    pub fn length(self) -> f64 {
        match self {
            Drum::Kick => kick::KICK_LENGTH,
            Drum::Snare => snare::SNARE_LENGTH,
            Drum::Clap => clap::CLAP_LENGTH,
            Drum::ClosedHat => hihat::HIHAT_LENGTH,
            Drum::OpenHat => openhat::OPENHAT_LENGTH,
            Drum::Tom => tom::TOM_LENGTH,
            Drum::Crash => crash::CRASH_LENGTH,
        }
    }

    pub fn uses_noise(self) -> bool {
        !matches!(self, Drum::Kick | Drum::Tom)
    }
}

/// Build the graph for `drum` triggered at `time`.
///
/// Only noise drums touch `noise`, so the shared buffer is not generated
/// until one of them plays.
pub fn drum(drum: Drum, time: f64, noise: &mut NoiseBank) -> Box<dyn GraphNode> {
    match drum {
        Drum::Kick => kick(time).boxed(),
        Drum::Tom => tom(time).boxed(),
        Drum::Snare => snare(time, noise.shared()).boxed(),
        Drum::Clap => clap(time, noise.shared()).boxed(),
        Drum::ClosedHat => hihat(time, noise.shared()).boxed(),
        Drum::OpenHat => openhat(time, noise.shared()).boxed(),
        Drum::Crash => crash(time, noise.shared()).boxed(),
    }
}
