//! Style and intensity to prosody parameter mapping.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Emotional speech style.
///
/// The set is closed; strings outside it parse to [`Style::Neutral`].
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Neutral,
    Enthusiastic,
    Somber,
    Confident,
    Authoritative,
    Calm,
    Dramatic,
}

/// Base prosody multipliers for a style, before intensity scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleParams {
    pub rate_mult: f32,
    pub volume_mult: f32,
}

/// Effective prosody for one synthesis request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prosody {
    /// Speaking-rate multiplier relative to the engine default.
    pub rate: f32,
    /// Volume in 0.0..=1.0.
    pub volume: f32,
}

impl Style {
    /// All styles, in the order reported by `/api/styles`.
    pub const ALL: [Style; 7] = [
        Style::Neutral,
        Style::Enthusiastic,
        Style::Somber,
        Style::Confident,
        Style::Authoritative,
        Style::Calm,
        Style::Dramatic,
    ];

    /// Parse a style name leniently.
    ///
    /// Accepts the aliases used by older clients (happy/excited, sad,
    /// angry); anything unrecognized maps to neutral.
    pub fn parse(input: &str) -> Style {
        match input.trim().to_ascii_lowercase().as_str() {
            "neutral" => Style::Neutral,
            "enthusiastic" | "happy" | "excited" => Style::Enthusiastic,
            "somber" | "sad" => Style::Somber,
            "confident" => Style::Confident,
            "authoritative" | "angry" => Style::Authoritative,
            "calm" => Style::Calm,
            "dramatic" => Style::Dramatic,
            _ => Style::Neutral,
        }
    }

    /// Canonical identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Style::Neutral => "neutral",
            Style::Enthusiastic => "enthusiastic",
            Style::Somber => "somber",
            Style::Confident => "confident",
            Style::Authoritative => "authoritative",
            Style::Calm => "calm",
            Style::Dramatic => "dramatic",
        }
    }

    /// Display name for listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Style::Neutral => "Neutral",
            Style::Enthusiastic => "Enthusiastic",
            Style::Somber => "Somber",
            Style::Confident => "Confident",
            Style::Authoritative => "Authoritative",
            Style::Calm => "Calm",
            Style::Dramatic => "Dramatic",
        }
    }

    /// Short human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Style::Neutral => "Standard speech",
            Style::Enthusiastic => "Cheerful and upbeat",
            Style::Somber => "Melancholic and slow",
            Style::Confident => "Assured and steady",
            Style::Authoritative => "Intense and forceful",
            Style::Calm => "Peaceful and steady",
            Style::Dramatic => "Theatrical and expressive",
        }
    }

    /// Base multipliers for this style.
    pub fn params(&self) -> StyleParams {
        match self {
            Style::Neutral => StyleParams {
                rate_mult: 1.0,
                volume_mult: 1.0,
            },
            Style::Enthusiastic => StyleParams {
                rate_mult: 1.3,
                volume_mult: 1.2,
            },
            Style::Somber => StyleParams {
                rate_mult: 0.7,
                volume_mult: 0.8,
            },
            Style::Confident => StyleParams {
                rate_mult: 1.1,
                volume_mult: 1.1,
            },
            Style::Authoritative => StyleParams {
                rate_mult: 0.9,
                volume_mult: 1.0,
            },
            Style::Calm => StyleParams {
                rate_mult: 0.8,
                volume_mult: 0.9,
            },
            Style::Dramatic => StyleParams {
                rate_mult: 1.2,
                volume_mult: 1.2,
            },
        }
    }
}

/// Rescale intensity 0..=100 to the 0.5..=1.5 multiplier range.
pub fn intensity_multiplier(intensity: u8) -> f32 {
    0.5 + f32::from(intensity.min(100)) / 100.0
}

/// Combine style, intensity and an optional speed override into the
/// effective prosody. Volume is clamped to 1.0.
pub fn prosody(style: Style, intensity: u8, speed: Option<f32>) -> Prosody {
    let params = style.params();
    let scale = intensity_multiplier(intensity);

    Prosody {
        rate: params.rate_mult * scale * speed.unwrap_or(1.0),
        volume: (params.volume_mult * scale).min(1.0),
    }
}
