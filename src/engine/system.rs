//! OS speech synthesizer engine adapter.
//!
//! Drives `espeak-ng` as a subprocess: one spawn per synthesis call,
//! writing a mono WAV straight to the destination path.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info, warn};

use crate::style;
use crate::voice::{self, Gender, VoiceInfo, detect_gender};

use super::{SpeechEngine, SynthesisSpec};

/// espeak-ng default speaking rate in words per minute.
const BASE_RATE_WPM: f32 = 175.0;

/// espeak-ng amplitude value for full volume.
const FULL_AMPLITUDE: f32 = 100.0;

/// Adapter for the operating system's speech synthesizer.
pub struct SystemEngine {
    program: String,
    available: bool,
}

impl SystemEngine {
    /// Probe the default synthesizer binary.
    pub fn probe() -> Self {
        Self::probe_program("espeak-ng")
    }

    /// Probe a specific synthesizer binary.
    pub fn probe_program(program: &str) -> Self {
        let available = match Command::new(program).arg("--version").output() {
            Ok(output) if output.status.success() => {
                info!(program, "system engine ready");
                true
            }
            Ok(output) => {
                warn!(program, status = %output.status, "system engine probe rejected");
                false
            }
            Err(err) => {
                warn!(program, error = %err, "system engine unavailable");
                false
            }
        };

        Self {
            program: program.to_string(),
            available,
        }
    }
}

/// Parse `espeak-ng --voices` tabular output into voice descriptors.
///
/// Columns: Pty, Language, Age/Gender, VoiceName, File, Other Languages.
pub(crate) fn parse_voice_listing(output: &str) -> Vec<VoiceInfo> {
    output
        .lines()
        .skip(1) // header row
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return None;
            }

            let language = fields[1].to_string();
            let name = fields[3].to_string();
            let gender = match fields[2].chars().last() {
                Some('F') => Gender::Female,
                Some('M') => Gender::Male,
                _ => detect_gender(&name),
            };

            Some(VoiceInfo {
                id: name.clone(),
                name,
                language,
                gender,
            })
        })
        .collect()
}

impl SpeechEngine for SystemEngine {
    fn name(&self) -> &'static str {
        "system"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn synthesize(&self, spec: &SynthesisSpec, dest: &Path) -> bool {
        if !self.available {
            return false;
        }

        let prosody = style::prosody(spec.style, spec.intensity, spec.speed);
        let rate = (BASE_RATE_WPM * prosody.rate).round() as i64;
        let amplitude = (FULL_AMPLITUDE * prosody.volume).round() as i64;

        let mut cmd = Command::new(&self.program);
        cmd.arg("-w")
            .arg(dest)
            .args(["-s", &rate.to_string()])
            .args(["-a", &amplitude.to_string()]);

        if let Some(query) = spec.voice.as_deref() {
            let voices = self.list_voices();
            if let Some(selected) = voice::resolve(query, &voices) {
                debug!(voice = %selected.name, "selected system voice");
                cmd.args(["-v", &selected.id]);
            }
        }

        cmd.arg(&spec.text);

        match cmd.output() {
            Ok(output) if output.status.success() && dest.exists() => {
                debug!(dest = %dest.display(), rate, amplitude, "system synthesis complete");
                true
            }
            Ok(output) => {
                warn!(status = %output.status, "system synthesis failed");
                let _ = std::fs::remove_file(dest);
                false
            }
            Err(err) => {
                warn!(error = %err, "failed to spawn system synthesizer");
                let _ = std::fs::remove_file(dest);
                false
            }
        }
    }

    fn list_voices(&self) -> Vec<VoiceInfo> {
        if !self.available {
            return Vec::new();
        }

        match Command::new(&self.program).arg("--voices").output() {
            Ok(output) if output.status.success() => {
                parse_voice_listing(&String::from_utf8_lossy(&output.stdout))
            }
            _ => Vec::new(),
        }
    }
}
