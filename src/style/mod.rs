//! Emotional style definitions and prosody mapping.
//!
//! Maps the closed style set plus a 0-100 intensity scalar onto the
//! rate/volume multipliers the engine adapters understand.

mod params;

pub use params::{Prosody, Style, StyleParams, intensity_multiplier, prosody};
