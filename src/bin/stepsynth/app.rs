//! Audio device setup and the hand-off between audio and UI threads.
//!
//! The engine moves into the cpal callback and is only reached from there.
//! The UI talks to it through the engine's command queue and listens on its
//! step queue, plus a third queue of output samples for the scope.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use rtrb::RingBuffer;

use stepsynth::{sequencing::Song, Engine, EngineConfig, MAX_BLOCK_SIZE};

use super::ui::{UiApp, UiState};

/// Queue depth for commands and step notifications
const QUEUE_CAPACITY: usize = 256;
/// Output samples kept for the scope
const SCOPE_CAPACITY: usize = 8192;

pub fn run(config: EngineConfig, song: Song, bpm: Option<f64>) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let stream_config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = stream_config.sample_rate().0 as f32;
    let channels = stream_config.channels() as usize;

    let (mut engine, controller, step_rx) =
        Engine::with_queues(config.with_sample_rate(sample_rate), QUEUE_CAPACITY);
    engine.load_song(&song)?;
    if let Some(bpm) = bpm {
        engine.set_bpm(bpm)?;
    }
    let initial = UiState::new(&engine, &song);

    let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_CAPACITY);
    let mut block = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &stream_config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                let block = &mut block[..frames];
                engine.process_block(block);

                // Copy to output (mono to all channels)
                let out_off = frames_written * channels;
                for (i, &s) in block.iter().enumerate() {
                    for ch in 0..channels {
                        data[out_off + i * channels + ch] = s;
                    }
                    let _ = scope_tx.push(s);
                }

                frames_written += frames;
            }
        },
        |err| log::error!("audio stream error: {err}"),
        None,
    )?;
    stream.play()?;

    let mut terminal = ratatui::init();
    let result = UiApp::new(controller, step_rx, scope_rx, initial).run(&mut terminal);
    ratatui::restore();
    result
}
