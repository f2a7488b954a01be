//! CLI argument definitions and parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::engine::EngineChoice;
use crate::style::Style;

/// Emotional text-to-speech with dual-engine fallback.
#[derive(Parser, Debug)]
#[command(name = "emo-tts-rs")]
#[command(about = "Emotional speech generation using a dual-engine TTS system")]
#[command(version)]
pub struct Args {
    /// Text to synthesize
    pub text: Option<String>,

    /// Output WAV file path
    pub output: Option<PathBuf>,

    /// Speech style
    #[arg(long, value_enum, default_value = "neutral")]
    pub style: Style,

    /// Style intensity, 0-100
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub intensity: u8,

    /// TTS engine selection
    #[arg(long, value_enum, default_value = "auto")]
    pub engine: EngineChoice,

    /// Voice selection: gender keyword, index, or name substring
    #[arg(long)]
    pub voice: Option<String>,

    /// Speaking speed multiplier
    #[arg(long)]
    pub speed: Option<f32>,

    /// List available voices and exit
    #[arg(long)]
    pub list_voices: bool,

    /// Show engine status and exit
    #[arg(long)]
    pub status: bool,

    /// Run the REST API server
    #[arg(long)]
    pub serve: bool,

    /// REST API port
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Neural model server host
    #[arg(long, default_value = "localhost")]
    pub neural_host: String,

    /// Neural model server port
    #[arg(long, default_value_t = 5002)]
    pub neural_port: u16,

    /// Directory for server-generated audio artifacts
    #[arg(long)]
    pub audio_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Artifact directory for the API server.
    pub fn resolve_audio_dir(&self) -> PathBuf {
        self.audio_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .expect("Could not find home directory")
                .join(".emo-tts-rs")
                .join("audio")
        })
    }
}
