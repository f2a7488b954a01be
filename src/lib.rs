//! emo-tts-rs: Emotional text-to-speech with dual-engine fallback.
//!
//! Wraps two interchangeable speech synthesizers (an external neural
//! model server and the OS synthesizer) behind a coordinator with
//! automatic fallback and a style/intensity-to-prosody mapping,
//! exposed through a CLI and a REST API.

pub mod api;
pub mod audio;
pub mod cli;
pub mod engine;
pub mod style;
pub mod voice;
