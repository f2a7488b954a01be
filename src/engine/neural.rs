//! Neural model-server engine adapter.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::style;
use crate::voice::{self, Gender, VoiceInfo, detect_gender};

use super::{SpeechEngine, SynthesisSpec};

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Error, Debug)]
enum NeuralError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server rejected request: {0}")]
    Rejected(reqwest::StatusCode),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct SynthesizeBody<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice: Option<&'a str>,
    speed: f32,
}

#[derive(Deserialize)]
struct ServerVoice {
    id: String,
    name: String,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Deserialize)]
struct VoicesResponse {
    voices: Vec<ServerVoice>,
}

/// Adapter for the external neural synthesis model server.
pub struct NeuralEngine {
    base_url: String,
    client: reqwest::blocking::Client,
    available: bool,
}

impl NeuralEngine {
    /// Probe the model server and record availability.
    ///
    /// Never fails: an unreachable or unhealthy server just yields an
    /// unavailable engine.
    pub fn probe(host: &str, port: u16) -> Self {
        let base_url = format!("http://{host}:{port}");
        let client = reqwest::blocking::Client::new();

        let available = match client
            .get(format!("{base_url}/health"))
            .timeout(PROBE_TIMEOUT)
            .send()
        {
            Ok(response) if response.status().is_success() => {
                info!(%base_url, "neural engine ready");
                true
            }
            Ok(response) => {
                warn!(
                    %base_url,
                    status = %response.status(),
                    "neural engine health check rejected"
                );
                false
            }
            Err(err) => {
                warn!(%base_url, error = %err, "neural engine unreachable");
                false
            }
        };

        Self {
            base_url,
            client,
            available,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn fetch_audio(&self, spec: &SynthesisSpec, voice: Option<&str>) -> Result<Vec<u8>, NeuralError> {
        // The model server exposes emotion through speaking rate only;
        // volume is shaped client-side by the system engine instead.
        let prosody = style::prosody(spec.style, spec.intensity, spec.speed);

        let body = SynthesizeBody {
            text: &spec.text,
            voice,
            speed: prosody.rate,
        };

        let response = self
            .client
            .post(format!("{}/synthesize", self.base_url))
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            return Err(NeuralError::Rejected(response.status()));
        }

        Ok(response.bytes()?.to_vec())
    }

    fn server_voices(&self) -> Result<Vec<VoiceInfo>, NeuralError> {
        let response = self
            .client
            .get(format!("{}/voices", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()?;

        if !response.status().is_success() {
            return Err(NeuralError::Rejected(response.status()));
        }

        let listing: VoicesResponse = response.json()?;
        Ok(listing
            .voices
            .into_iter()
            .map(|v| {
                let gender = detect_gender(&v.name);
                VoiceInfo {
                    id: v.id,
                    name: v.name,
                    language: v.language.unwrap_or_else(|| "en-US".to_string()),
                    gender,
                }
            })
            .collect())
    }

    /// Voices the bundled model ships with, used when the server does
    /// not implement voice enumeration.
    fn builtin_voices() -> Vec<VoiceInfo> {
        vec![
            VoiceInfo {
                id: "jenny".to_string(),
                name: "Jenny".to_string(),
                language: "en-US".to_string(),
                gender: Gender::Female,
            },
            VoiceInfo {
                id: "ljspeech".to_string(),
                name: "LJSpeech".to_string(),
                language: "en-US".to_string(),
                gender: Gender::Female,
            },
        ]
    }
}

impl SpeechEngine for NeuralEngine {
    fn name(&self) -> &'static str {
        "neural"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn synthesize(&self, spec: &SynthesisSpec, dest: &Path) -> bool {
        if !self.available {
            return false;
        }

        let resolved = spec.voice.as_deref().and_then(|query| {
            let voices = self.list_voices();
            voice::resolve(query, &voices).map(|v| v.id.clone())
        });

        let result = self
            .fetch_audio(spec, resolved.as_deref())
            .and_then(|audio| std::fs::write(dest, &audio).map_err(NeuralError::from));

        match result {
            Ok(()) => {
                debug!(dest = %dest.display(), "neural synthesis complete");
                true
            }
            Err(err) => {
                warn!(error = %err, "neural synthesis failed");
                // No partial artifact on failure.
                let _ = std::fs::remove_file(dest);
                false
            }
        }
    }

    fn list_voices(&self) -> Vec<VoiceInfo> {
        if !self.available {
            return Vec::new();
        }

        self.server_voices().unwrap_or_else(|err| {
            debug!(error = %err, "voice listing failed, using built-in list");
            Self::builtin_voices()
        })
    }
}
