#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer};

use crate::config::SlideResolution;
use crate::mixer::ChannelUpdate;
use crate::sequencing::pattern::{Note, Pattern};
use crate::sequencing::song::Song;
use crate::synth::params::*;
use crate::synth::WaveType;

/// One category of voice settings to merge into the store.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceUpdate {
    Adsr(AdsrUpdate),
    Pwm(PwmUpdate),
    Arpeggio(ArpeggioUpdate),
    Vibrato(VibratoUpdate),
    FilterEnvelope(FilterEnvelopeUpdate),
    VolumeEnvelope(VolumeEnvelopeUpdate),
    Distortion(DistortionUpdate),
    Detune(DetuneUpdate),
}

/// Control-side requests, applied at the start of the next rendered block.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    Start,
    Stop,
    SetBpm(f64),
    SetSongMode(bool),
    SetSlideResolution(SlideResolution),
    SetWave { voice: usize, wave: WaveType },
    SetOctave { voice: usize, octave: i8 },
    SetNote { voice: usize, row: usize, step: usize, note: Note },
    ToggleNote { voice: usize, row: usize, step: usize },
    ToggleDrum { drum: usize, step: usize },
    UpdateVoice { voice: usize, update: VoiceUpdate },
    UpdateChannel { voice: usize, update: ChannelUpdate },
    SetMasterGain(f32),
    PreviewPattern(Box<Pattern>),
    /// Replace the working pattern wholesale.
    SetPattern(Box<Pattern>),
    LoadSong(Box<Song>),
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<EngineCommand>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<EngineCommand> {
    fn pop(&mut self) -> Option<EngineCommand> {
        Consumer::pop(self).ok()
    }
}

/// Sending half of the command queue, held by the UI thread.
///
/// Tempo is range-checked here so a bad value is reported to the caller
/// instead of being dropped on the audio thread.
#[cfg(feature = "rtrb")]
pub struct EngineController {
    tx: Producer<EngineCommand>,
    min_bpm: f64,
    max_bpm: f64,
}

#[cfg(feature = "rtrb")]
impl EngineController {
    pub(crate) fn new(tx: Producer<EngineCommand>, min_bpm: f64, max_bpm: f64) -> Self {
        Self { tx, min_bpm, max_bpm }
    }

    /// Queue a command. Returns false if the queue is full.
    pub fn send(&mut self, command: EngineCommand) -> bool {
        match self.tx.push(command) {
            Ok(()) => true,
            Err(rtrb::PushError::Full(command)) => {
                log::warn!("command queue full, dropped {command:?}");
                false
            }
        }
    }

    pub fn start(&mut self) -> bool {
        self.send(EngineCommand::Start)
    }

    pub fn stop(&mut self) -> bool {
        self.send(EngineCommand::Stop)
    }

    pub fn set_bpm(&mut self, bpm: f64) -> crate::Result<bool> {
        if !(self.min_bpm..=self.max_bpm).contains(&bpm) {
            return Err(crate::EngineError::BpmOutOfRange {
                bpm,
                min: self.min_bpm,
                max: self.max_bpm,
            });
        }
        Ok(self.send(EngineCommand::SetBpm(bpm)))
    }

    pub fn set_song_mode(&mut self, enabled: bool) -> bool {
        self.send(EngineCommand::SetSongMode(enabled))
    }

    pub fn update_voice(&mut self, voice: usize, update: VoiceUpdate) -> bool {
        self.send(EngineCommand::UpdateVoice { voice, update })
    }

    pub fn update_channel(&mut self, voice: usize, update: ChannelUpdate) -> bool {
        self.send(EngineCommand::UpdateChannel { voice, update })
    }

    pub fn set_pattern(&mut self, pattern: Pattern) -> bool {
        self.send(EngineCommand::SetPattern(Box::new(pattern)))
    }

    pub fn load_song(&mut self, song: Song) -> bool {
        self.send(EngineCommand::LoadSong(Box::new(song)))
    }
}
