//! The engine context: one instance owns everything a running workstation
//! needs and renders it block by block.
//!
//! ```text
//!   commands ──→ drain ──→ Transport.poll(block end)
//!                              │ notes / drums
//!                              ↓
//!                   arpeggio → NotePlan → graph ──→ Scheduler
//!                                                     │
//!                   voice buffers ──→ channel strips ─┼─→ master bus ──→ out
//!                   drums ────────────────────────────┘
//! ```
//!
//! Nothing here is global. Two engines never share settings, noise or clock,
//! which is what lets tests run several side by side.

pub mod clock;
pub mod message;
pub mod scheduler;

pub use clock::{AudioClock, ClockState};
#[cfg(feature = "rtrb")]
pub use message::EngineController;
pub use message::{EngineCommand, MessageReceiver, VoiceUpdate};
pub use scheduler::{Destination, Scheduler};

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::config::EngineConfig;
use crate::dsp::noise::NoiseBank;
use crate::error::Result;
use crate::graph::RenderCtx;
use crate::mixer::{ChannelUpdate, Mixer};
use crate::sequencing::pattern::Pattern;
use crate::sequencing::random;
use crate::sequencing::song::{Song, SONG_VERSION};
use crate::sequencing::session::Session;
use crate::synth::{arpeggio, NotePlan, NoteTrigger, VoiceParameterStore};
use crate::transport::{self, StepEvent, TriggerSink, Transport};
use crate::voices::{self, Drum};
use crate::{MAX_BLOCK_SIZE, NUM_VOICES};

pub struct Engine {
    config: EngineConfig,
    clock: AudioClock,
    session: Session,
    store: VoiceParameterStore,
    mixer: Mixer,
    transport: Transport,
    scheduler: Scheduler,
    noise: NoiseBank,
    voice_buffers: [Vec<f32>; NUM_VOICES],
    bus: Vec<f32>,
    last_step: Option<StepEvent>,
    commands: Option<Box<dyn MessageReceiver + Send>>,
    #[cfg(feature = "rtrb")]
    step_tx: Option<Producer<StepEvent>>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let bpm = config.default_bpm;
        log::info!(
            "engine: {} Hz, {:.0} ms lookahead, {bpm} BPM",
            config.sample_rate,
            config.lookahead * 1_000.0
        );
        Self {
            clock: AudioClock::new(config.sample_rate, config.start_suspended),
            session: Session::new(bpm),
            store: VoiceParameterStore::new(),
            mixer: Mixer::new(config.sample_rate, config.master_gain),
            transport: Transport::new(&config, bpm),
            scheduler: Scheduler::new(),
            noise: NoiseBank::new(config.sample_rate, config.noise_seed),
            voice_buffers: std::array::from_fn(|_| vec![0.0; MAX_BLOCK_SIZE]),
            bus: vec![0.0; MAX_BLOCK_SIZE],
            last_step: None,
            commands: None,
            #[cfg(feature = "rtrb")]
            step_tx: None,
            config,
        }
    }

    /// Engine wired to a command queue and a step-notification queue, for
    /// running the engine on the audio thread and controlling it from another.
    #[cfg(feature = "rtrb")]
    pub fn with_queues(
        config: EngineConfig,
        capacity: usize,
    ) -> (Self, EngineController, Consumer<StepEvent>) {
        let (command_tx, command_rx) = RingBuffer::<EngineCommand>::new(capacity);
        let (step_tx, step_rx) = RingBuffer::<StepEvent>::new(capacity);
        let controller = EngineController::new(command_tx, config.min_bpm, config.max_bpm);

        let mut engine = Self::new(config);
        engine.commands = Some(Box::new(command_rx));
        engine.step_tx = Some(step_tx);
        (engine, controller, step_rx)
    }

    /// Take commands from `receiver` at the start of every block.
    pub fn attach_commands(&mut self, receiver: impl MessageReceiver + Send + 'static) {
        self.commands = Some(Box::new(receiver));
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &AudioClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut AudioClock {
        &mut self.clock
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Direct access for editing patterns, the library and the arrangement.
    /// The transport reads these on every tick.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn store(&self) -> &VoiceParameterStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut VoiceParameterStore {
        &mut self.store
    }

    pub fn mixer_mut(&mut self) -> &mut Mixer {
        &mut self.mixer
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    /// Most recent step the transport fired.
    pub fn last_step(&self) -> Option<&StepEvent> {
        self.last_step.as_ref()
    }

    /// Note and drum graphs still alive.
    pub fn scheduled_count(&self) -> usize {
        self.scheduler.len()
    }

    /// Start playback. A suspended clock gets exactly one resume attempt;
    /// if that fails the transport still runs but nothing is heard.
    pub fn start(&mut self) {
        if let Err(e) = self.clock.resume() {
            log::warn!("could not resume audio clock: {e}; playback will be silent");
        }
        if self.transport.is_playing() {
            return;
        }

        let now = self.clock.now();
        self.with_router(|transport, session, router| transport.start(now, session, router));
    }

    /// Stop firing steps. Notes already scheduled ring out.
    pub fn stop(&mut self) {
        self.transport.stop();
    }

    /// Change tempo; rejected outside the configured range.
    pub fn set_bpm(&mut self, bpm: f64) -> Result<()> {
        transport::retime(&self.config, &mut self.session, &mut self.transport, bpm)
    }

    pub fn bpm(&self) -> f64 {
        self.session.bpm()
    }

    /// Play `pattern` once and stop, leaving the working pattern alone.
    pub fn preview_pattern(&mut self, pattern: Pattern) {
        if let Err(e) = self.clock.resume() {
            log::warn!("could not resume audio clock: {e}; preview will be silent");
        }
        let now = self.clock.now();
        self.with_router(|transport, session, router| {
            transport.preview_pattern(now, pattern, session, router)
        });
    }

    /// Swap in a new working pattern. The playhead keeps its place.
    pub fn set_pattern(&mut self, pattern: Pattern) {
        self.session.working = pattern;
    }

    /// Replace the working pattern with the generator's pattern for `seed`.
    pub fn randomize_pattern(&mut self, seed: u64) {
        log::info!("randomizing working pattern (seed {seed})");
        self.set_pattern(random::seeded_pattern(seed));
    }

    pub fn update_voice(&mut self, voice: usize, update: VoiceUpdate) -> Result<()> {
        let store = &mut self.store;
        match update {
            VoiceUpdate::Adsr(u) => store.update_adsr(voice, u),
            VoiceUpdate::Pwm(u) => store.update_pwm(voice, u),
            VoiceUpdate::Arpeggio(u) => store.update_arpeggio(voice, u),
            VoiceUpdate::Vibrato(u) => store.update_vibrato(voice, u),
            VoiceUpdate::FilterEnvelope(u) => store.update_filter_envelope(voice, u),
            VoiceUpdate::VolumeEnvelope(u) => store.update_volume_envelope(voice, u),
            VoiceUpdate::Distortion(u) => store.update_distortion(voice, u),
            VoiceUpdate::Detune(u) => store.update_detune(voice, u),
        }
    }

    pub fn update_channel(&mut self, voice: usize, update: ChannelUpdate) -> Result<()> {
        self.mixer.update_channel(voice, update)
    }

    /// Replace the session, voice settings and mixer with a song's contents.
    ///
    /// The tempo is checked before anything changes, so a song with a bad
    /// tempo leaves the engine as it was.
    pub fn load_song(&mut self, song: &Song) -> Result<()> {
        if let Some(bpm) = song.bpm {
            self.config.validate_bpm(bpm)?;
        }
        self.session.apply_song(song);
        self.transport.set_bpm(self.session.bpm());

        for (voice, settings) in song.voice_settings.iter().take(NUM_VOICES).enumerate() {
            self.store.replace(voice, settings.clone())?;
        }
        for (voice, settings) in song.mixer_settings.iter().take(NUM_VOICES).enumerate() {
            self.mixer.replace_channel(voice, *settings)?;
        }
        Ok(())
    }

    /// Snapshot the current state as a song.
    pub fn to_song(&mut self) -> Result<Song> {
        let mixer_settings = (0..NUM_VOICES)
            .map(|voice| self.mixer.settings(voice))
            .collect::<Result<Vec<_>>>()?;

        Ok(Song {
            version: SONG_VERSION,
            bpm: Some(self.session.bpm()),
            pattern_library: self.session.library.patterns().to_vec(),
            song_arrangement: self.session.arrangement.clone(),
            wave_types: self.session.waves().to_vec(),
            octaves: self.session.octaves().to_vec(),
            voice_settings: self.store.all().to_vec(),
            mixer_settings,
        })
    }

    /// Apply one queued command. Failures are logged, never raised, since
    /// this runs on the audio thread.
    pub fn handle_command(&mut self, command: EngineCommand) {
        let result = match command {
            EngineCommand::Start => {
                self.start();
                Ok(())
            }
            EngineCommand::Stop => {
                self.stop();
                Ok(())
            }
            EngineCommand::SetBpm(bpm) => self.set_bpm(bpm),
            EngineCommand::SetSongMode(enabled) => {
                self.session.song_mode = enabled;
                log::debug!("song mode {}", if enabled { "on" } else { "off" });
                Ok(())
            }
            EngineCommand::SetSlideResolution(resolution) => {
                self.config.slide_resolution = resolution;
                self.transport.set_slide_resolution(resolution);
                Ok(())
            }
            EngineCommand::SetWave { voice, wave } => self.session.set_wave(voice, wave),
            EngineCommand::SetOctave { voice, octave } => self.session.set_octave(voice, octave),
            EngineCommand::SetNote { voice, row, step, note } => self
                .session
                .working
                .voice_mut(voice)
                .map(|grid| grid.set(row, step, note)),
            EngineCommand::ToggleNote { voice, row, step } => self
                .session
                .working
                .voice_mut(voice)
                .map(|grid| {
                    grid.toggle(row, step);
                }),
            EngineCommand::ToggleDrum { drum, step } => {
                self.session.working.drums.toggle(drum, step);
                Ok(())
            }
            EngineCommand::UpdateVoice { voice, update } => self.update_voice(voice, update),
            EngineCommand::UpdateChannel { voice, update } => self.update_channel(voice, update),
            EngineCommand::SetMasterGain(gain) => {
                self.mixer.set_master_gain(gain);
                Ok(())
            }
            EngineCommand::PreviewPattern(pattern) => {
                self.preview_pattern(*pattern);
                Ok(())
            }
            EngineCommand::SetPattern(pattern) => {
                self.set_pattern(*pattern);
                Ok(())
            }
            EngineCommand::LoadSong(song) => self.load_song(&song),
        };

        if let Err(e) = result {
            log::warn!("command rejected: {e}");
        }
    }

    /// Lend the transport a sink that builds and schedules what it triggers.
    fn with_router<R>(
        &mut self,
        f: impl FnOnce(&mut Transport, &Session, &mut NoteRouter<'_>) -> R,
    ) -> R {
        let Engine {
            session,
            transport,
            store,
            scheduler,
            noise,
            config,
            last_step,
            #[cfg(feature = "rtrb")]
            step_tx,
            ..
        } = self;
        let mut router = NoteRouter {
            store,
            scheduler,
            noise,
            tail: config.note_tail,
            last_step,
            #[cfg(feature = "rtrb")]
            step_tx: step_tx.as_mut(),
        };
        f(transport, session, &mut router)
    }

    fn drain_commands(&mut self) {
        let Some(mut receiver) = self.commands.take() else {
            return;
        };
        while let Some(command) = receiver.pop() {
            self.handle_command(command);
        }
        self.commands = Some(receiver);
    }

    /// Render one mono block. Blocks longer than [`MAX_BLOCK_SIZE`] are split.
    pub fn process_block(&mut self, out: &mut [f32]) {
        self.drain_commands();

        if !self.clock.is_running() {
            out.fill(0.0);
            return;
        }

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        let frames = out.len();
        let ctx = RenderCtx::new(self.config.sample_rate, self.clock.now());
        let horizon = ctx.frame_time(frames);

        self.with_router(|transport, session, router| transport.poll(horizon, session, router));

        let Engine {
            scheduler,
            mixer,
            voice_buffers,
            bus,
            ..
        } = self;

        let bus = &mut bus[..frames];
        bus.fill(0.0);
        for buffer in voice_buffers.iter_mut() {
            buffer[..frames].fill(0.0);
        }

        let touched = scheduler.render(&ctx, voice_buffers, bus);

        // Built strips keep running so delay tails outlive their notes.
        for (voice, buffer) in voice_buffers.iter_mut().enumerate() {
            if !touched[voice] && !mixer.is_built(voice) {
                continue;
            }
            if let Err(e) = mixer.mix_voice(voice, &mut buffer[..frames], bus) {
                log::warn!("voice {voice} not mixed: {e}");
            }
        }
        mixer.finish(bus);
        out.copy_from_slice(bus);

        self.clock.advance(frames);
        self.scheduler.retire(self.clock.now());
    }
}

/// Turns transport triggers into scheduled graphs.
struct NoteRouter<'a> {
    store: &'a VoiceParameterStore,
    scheduler: &'a mut Scheduler,
    noise: &'a mut NoiseBank,
    tail: f64,
    last_step: &'a mut Option<StepEvent>,
    #[cfg(feature = "rtrb")]
    step_tx: Option<&'a mut Producer<StepEvent>>,
}

impl TriggerSink for NoteRouter<'_> {
    fn note(&mut self, trigger: NoteTrigger) {
        let settings = match self.store.voice(trigger.voice) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("note dropped: {e}");
                return;
            }
        };

        for note in arpeggio::expand(&trigger, &settings.arpeggio) {
            let plan = NotePlan::new(&note, settings, self.tail);
            let (start, stop) = (plan.start, plan.stop);
            log::trace!(
                "voice {}: {:.1} Hz at {start:.4}s until {stop:.4}s",
                note.voice,
                note.frequency
            );
            let graph = plan.build(self.noise);
            self.scheduler
                .schedule(graph, start, stop, Destination::Voice(note.voice));
        }
    }

    fn drum(&mut self, drum: Drum, time: f64) {
        log::trace!("{} at {time:.4}s", drum.name());
        let graph = voices::drum(drum, time, self.noise);
        self.scheduler
            .schedule(graph, time, time + drum.length(), Destination::Master);
    }

    fn step(&mut self, event: StepEvent) {
        #[cfg(feature = "rtrb")]
        if let Some(tx) = self.step_tx.as_mut() {
            // A full queue means nobody is watching; the display can skip a step.
            let _ = tx.push(event);
        }
        *self.last_step = Some(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::ChannelSettings;
    use crate::sequencing::pattern::Note;
    use crate::synth::params::ArpeggioUpdate;
    use crate::EngineError;

    fn engine() -> Engine {
        let config = EngineConfig {
            sample_rate: 8_000.0,
            start_suspended: false,
            noise_seed: Some(3),
            ..Default::default()
        };
        let mut engine = Engine::new(config);
        engine.session_mut().song_mode = false;
        engine
    }

    fn render(engine: &mut Engine, seconds: f64) -> Vec<f32> {
        let frames = (seconds * engine.config().sample_rate as f64) as usize;
        let mut out = vec![0.0; frames];
        engine.process_block(&mut out);
        out
    }

    fn peak(buffer: &[f32]) -> f32 {
        buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn suspended_engine_renders_silence_until_started() {
        let mut engine = Engine::new(EngineConfig {
            sample_rate: 8_000.0,
            ..Default::default()
        });
        engine.session_mut().working.drums.set(0, 0, true);

        let out = render(&mut engine, 0.1);
        assert_eq!(peak(&out), 0.0);
        assert_eq!(engine.now(), 0.0);

        engine.start();
        assert_eq!(engine.clock().state(), ClockState::Running);
        let out = render(&mut engine, 0.1);
        assert!(peak(&out) > 0.05);
    }

    #[test]
    fn closed_clock_keeps_transport_but_stays_silent() {
        let mut engine = engine();
        engine.clock_mut().close();
        engine.start();
        assert!(engine.is_playing());
        let out = render(&mut engine, 0.2);
        assert_eq!(peak(&out), 0.0);
    }

    #[test]
    fn active_note_reaches_the_output() {
        let mut engine = engine();
        engine.session_mut().working.voices[0].set(5, 0, Note::on().with_length(2));
        engine.start();

        let out = render(&mut engine, 0.2);
        assert!(peak(&out) > 0.05);
        // The first note's graph is alive for a while, then dropped.
        engine.stop();
        render(&mut engine, 1.0);
        assert_eq!(engine.scheduled_count(), 0);
    }

    #[test]
    fn empty_pattern_is_silent() {
        let mut engine = engine();
        engine.start();
        let out = render(&mut engine, 0.5);
        assert_eq!(peak(&out), 0.0);
        assert_eq!(engine.last_step().map(|s| s.step), Some(3));
    }

    #[test]
    fn arpeggio_schedules_one_graph_per_sub_note() {
        let mut engine = engine();
        engine
            .update_voice(
                0,
                VoiceUpdate::Arpeggio(ArpeggioUpdate {
                    enabled: Some(true),
                    speed: Some(0),
                    ..Default::default()
                }),
            )
            .unwrap();
        engine.session_mut().working.voices[0].set(0, 0, Note::on());
        engine.start();
        // 32nd-note speed on a single step gives 8 sub-notes.
        assert_eq!(engine.scheduled_count(), 8);
    }

    #[test]
    fn muted_channel_silences_its_voice_only() {
        let mut engine = engine();
        engine.session_mut().working.voices[1].set(0, 0, Note::on());
        engine
            .update_channel(
                1,
                ChannelUpdate {
                    enabled: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        engine.start();
        assert_eq!(peak(&render(&mut engine, 0.2)), 0.0);
    }

    #[test]
    fn bpm_out_of_range_is_rejected() {
        let mut engine = engine();
        assert!(matches!(
            engine.set_bpm(30.0),
            Err(EngineError::BpmOutOfRange { .. })
        ));
        engine.set_bpm(200.0).unwrap();
        assert_eq!(engine.bpm(), 200.0);
        assert!((engine.transport().interval() - 0.075).abs() < 1e-12);
    }

    #[test]
    fn commands_apply_at_block_start() {
        let mut engine = engine();
        engine.handle_command(EngineCommand::ToggleDrum { drum: 0, step: 0 });
        engine.handle_command(EngineCommand::SetOctave { voice: 2, octave: 7 });
        engine.handle_command(EngineCommand::SetBpm(500.0));
        assert!(engine.session().working.drums.is_active(0, 0));
        assert_eq!(engine.session().octaves()[2], 2);
        assert_eq!(engine.bpm(), 120.0);
    }

    #[test]
    fn song_with_bad_tempo_changes_nothing() {
        let mut engine = engine();
        let song = Song {
            bpm: Some(999.0),
            octaves: vec![1, 1, 1],
            ..Default::default()
        };
        assert!(engine.load_song(&song).is_err());
        assert_eq!(engine.session().octaves(), &[0, 0, 0]);
    }

    #[test]
    fn song_round_trips_through_the_engine() {
        let mut engine = engine();
        engine.load_song(&crate::sequencing::demo_song()).unwrap();
        let song = engine.to_song().unwrap();

        let mut other = self::engine();
        other.load_song(&song).unwrap();
        assert_eq!(other.to_song().unwrap(), song);
        assert_eq!(other.bpm(), 124.0);
        assert_eq!(song.mixer_settings.len(), NUM_VOICES);
        assert_ne!(song.mixer_settings[0], ChannelSettings::default());
    }

    #[test]
    fn randomize_replaces_the_working_pattern() {
        let mut engine = engine();
        engine.session_mut().working.drums.set(Drum::Crash.index(), 3, true);

        engine.randomize_pattern(42);
        assert_eq!(engine.session().working, random::seeded_pattern(42));

        let pattern = random::seeded_pattern(43);
        engine.handle_command(EngineCommand::SetPattern(Box::new(pattern.clone())));
        assert_eq!(engine.session().working, pattern);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn queues_carry_commands_and_steps() {
        let config = EngineConfig {
            sample_rate: 8_000.0,
            start_suspended: false,
            ..Default::default()
        };
        let (mut engine, mut controller, mut steps) = Engine::with_queues(config, 64);
        engine.session_mut().song_mode = false;

        assert!(controller.set_bpm(250.0).is_err());
        assert!(controller.start());
        let mut out = vec![0.0; 2_000];
        engine.process_block(&mut out);

        assert!(engine.is_playing());
        let first = steps.pop().unwrap();
        assert_eq!(first.step, 0);
        assert!(steps.pop().is_ok());
    }
}
