//! stepsynth - terminal step sequencer
//!
//! Run with: cargo run -- play [SONG.json]
//!           cargo run -- play --preset horror
//!           cargo run -- export SONG.json OUT.wav

mod app;
mod ui;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use stepsynth::{
    io,
    io::Exporter,
    sequencing::{demo_song, presets},
    EngineConfig,
};

#[derive(Parser)]
#[command(name = "stepsynth", version, about = "Three-voice step sequencer with a drum kit")]
struct Cli {
    /// Engine settings (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a song through the default output device
    Play {
        /// Song file; plays the built-in demo when omitted
        #[arg(conflicts_with = "preset")]
        song: Option<PathBuf>,
        /// Start from a genre preset (platformer, shooter, horror, menu)
        #[arg(long)]
        preset: Option<String>,
        /// Override the song's tempo
        #[arg(long)]
        bpm: Option<f64>,
    },
    /// Render a song to a 16-bit stereo WAV file
    Export { song: PathBuf, out: PathBuf },
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    // Logs go to stderr; RUST_LOG=stepsynth=debug shows slot and tempo changes.
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => read_config(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Play { song, preset, bpm } => {
            let song = match (song, preset) {
                (Some(path), _) => io::load_song(&path)
                    .wrap_err_with(|| format!("failed to load {}", path.display()))?,
                (None, Some(name)) => presets::find(&name)
                    .ok_or_else(|| eyre!("unknown preset {name:?}"))?
                    .song(),
                (None, None) => demo_song(),
            };
            app::run(config, song, bpm)
        }
        Command::Export { song, out } => {
            let song = io::load_song(&song)
                .wrap_err_with(|| format!("failed to load {}", song.display()))?;
            let exporter = Exporter::new(config);
            let seconds = exporter.duration(&song)?;
            exporter
                .export_wav(&song, &out)
                .wrap_err_with(|| format!("failed to write {}", out.display()))?;
            println!("Exported {seconds:.1}s to {}", out.display());
            Ok(())
        }
    }
}

fn read_config(path: &Path) -> EyreResult<EngineConfig> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    Ok(EngineConfig::from_toml_str(&text)?)
}
