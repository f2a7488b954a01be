//! Speech engine adapters and the dual-engine coordinator.
//!
//! Two adapters wrap the external synthesizers behind the
//! [`SpeechEngine`] contract; [`TtsSystem`] composes them as a
//! primary/fallback pair.

mod coordinator;
mod neural;
mod system;

pub use coordinator::{EngineInitError, EngineStatus, SynthesisError, TtsSystem};
pub use neural::NeuralEngine;
pub use system::SystemEngine;

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::style::Style;
use crate::voice::VoiceInfo;

/// The two concrete engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Neural,
    System,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Neural => "neural",
            EngineKind::System => "system",
        }
    }

    /// The other engine of the pair.
    pub fn other(&self) -> EngineKind {
        match self {
            EngineKind::Neural => EngineKind::System,
            EngineKind::System => EngineKind::Neural,
        }
    }
}

/// Engine requested by a caller.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineChoice {
    /// Let the coordinator pick the designated primary.
    #[default]
    Auto,
    Neural,
    System,
}

/// Engine-agnostic parameters for one synthesis call.
#[derive(Debug, Clone)]
pub struct SynthesisSpec {
    pub text: String,
    pub style: Style,
    /// Style intensity, 0..=100.
    pub intensity: u8,
    /// Caller-supplied voice query, resolved per adapter.
    pub voice: Option<String>,
    /// Extra speaking-rate multiplier on top of the style mapping.
    pub speed: Option<f32>,
}

impl SynthesisSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::Neutral,
            intensity: 50,
            voice: None,
            speed: None,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_intensity(mut self, intensity: u8) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }
}

/// Uniform contract over one wrapped synthesis engine.
///
/// Availability is decided once, by probing at construction time.
/// `synthesize` never panics and never errors out: failures are logged
/// and reported as `false`, with no partial file left at `dest`.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    /// Synthesize `spec` into the audio file at `dest`.
    fn synthesize(&self, spec: &SynthesisSpec, dest: &Path) -> bool;

    /// Enumerate this engine's voices. Empty when unavailable.
    fn list_voices(&self) -> Vec<VoiceInfo>;
}
