//! Voice resolution against an engine's voice list.

use serde::{Deserialize, Serialize};

/// Best-effort gender classification of a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Unknown,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Unknown => "unknown",
        }
    }
}

/// A voice exposed by one of the engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceInfo {
    /// Engine-native identifier, passed back verbatim at synthesis time.
    pub id: String,
    pub name: String,
    pub language: String,
    pub gender: Gender,
}

/// Queries treated as a request for any female voice.
const FEMALE_QUERIES: [&str; 4] = ["female", "woman", "wanita", "perempuan"];

/// Queries treated as a request for any male voice.
const MALE_QUERIES: [&str; 4] = ["male", "man", "pria", "laki-laki"];

/// Substrings that suggest a female voice name.
const FEMALE_HINTS: [&str; 20] = [
    "zira", "hazel", "susan", "anna", "helena", "sabina", "katja", "jenny", "female", "woman",
    "girl", "lady", "ms", "miss", "mrs", "f+", "+f", "(f)", "[f]", "fem",
];

/// Substrings that suggest a male voice name.
const MALE_HINTS: [&str; 17] = [
    "david", "mark", "richard", "george", "james", "paul", "male", "man", "boy", "gentleman", "mr",
    "mister", "m+", "+m", "(m)", "[m]", "masc",
];

/// Guess a voice's gender from its display name.
///
/// Keyword matching against locale-specific name lists; advisory only.
pub fn detect_gender(name: &str) -> Gender {
    let lower = name.to_ascii_lowercase();

    if FEMALE_HINTS.iter().any(|hint| lower.contains(hint)) {
        Gender::Female
    } else if MALE_HINTS.iter().any(|hint| lower.contains(hint)) {
        Gender::Male
    } else {
        Gender::Unknown
    }
}

/// Resolve a caller-supplied voice query against an engine's voice list.
///
/// Tried in priority order, first match wins:
/// 1. gender keywords ("female", "male" and their variants),
/// 2. a numeric index into the list,
/// 3. a case-insensitive substring of the display name.
///
/// `None` means the engine's default voice should be left unchanged.
pub fn resolve<'a>(query: &str, voices: &'a [VoiceInfo]) -> Option<&'a VoiceInfo> {
    let lower = query.trim().to_ascii_lowercase();

    if FEMALE_QUERIES.contains(&lower.as_str()) {
        return voices
            .iter()
            .find(|v| v.gender == Gender::Female)
            // No clearly female voice: the first voice is often the
            // platform default female.
            .or_else(|| voices.first());
    }

    if MALE_QUERIES.contains(&lower.as_str()) {
        return voices
            .iter()
            .find(|v| v.gender == Gender::Male)
            .or_else(|| voices.get(1))
            .or_else(|| voices.first());
    }

    if let Ok(index) = lower.parse::<usize>() {
        return voices.get(index);
    }

    voices
        .iter()
        .find(|v| v.name.to_ascii_lowercase().contains(&lower))
}
