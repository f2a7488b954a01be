//! Dual-engine coordinator with single-level fallback.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::voice::VoiceInfo;

use super::{EngineChoice, EngineKind, SpeechEngine, SynthesisSpec};

/// Errors raised while composing the engine pair at startup.
#[derive(Error, Debug)]
pub enum EngineInitError {
    #[error("no speech engines available")]
    NoEnginesAvailable,
}

/// Errors reported after all attempted engines failed.
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("synthesis failed on engine '{0}'")]
    EngineFailed(&'static str),

    #[error("synthesis failed on '{primary}'; fallback '{fallback}' also failed")]
    FallbackFailed {
        primary: &'static str,
        fallback: &'static str,
    },
}

/// Engine availability snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub neural_available: bool,
    pub system_available: bool,
    pub default_engine: &'static str,
}

/// Composes the two engines as a ranked pair with automatic fallback.
///
/// The primary is the first available engine in (neural, system) order,
/// fixed at construction.
pub struct TtsSystem {
    neural: Arc<dyn SpeechEngine>,
    system: Arc<dyn SpeechEngine>,
    primary: EngineKind,
}

impl std::fmt::Debug for TtsSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtsSystem")
            .field("neural", &self.neural.name())
            .field("system", &self.system.name())
            .field("primary", &self.primary)
            .finish()
    }
}

impl TtsSystem {
    /// Compose the engine pair. Fails when neither engine probed
    /// successfully; callers treat that as fatal.
    pub fn new(
        neural: Arc<dyn SpeechEngine>,
        system: Arc<dyn SpeechEngine>,
    ) -> Result<Self, EngineInitError> {
        let primary = if neural.is_available() {
            info!(
                primary = neural.name(),
                fallback = system.is_available().then(|| system.name()),
                "dual-engine system ready"
            );
            EngineKind::Neural
        } else if system.is_available() {
            info!(
                primary = system.name(),
                "neural engine unavailable, running single-engine"
            );
            EngineKind::System
        } else {
            return Err(EngineInitError::NoEnginesAvailable);
        };

        Ok(Self {
            neural,
            system,
            primary,
        })
    }

    pub fn primary(&self) -> EngineKind {
        self.primary
    }

    fn engine(&self, kind: EngineKind) -> &dyn SpeechEngine {
        match kind {
            EngineKind::Neural => self.neural.as_ref(),
            EngineKind::System => self.system.as_ref(),
        }
    }

    fn available(&self, kind: EngineKind) -> bool {
        self.engine(kind).is_available()
    }

    /// Pick the engine for one request. An explicitly requested engine
    /// that is unavailable is substituted with the other one; startup
    /// guarantees at least one engine is available.
    fn select(&self, choice: EngineChoice) -> EngineKind {
        let requested = match choice {
            EngineChoice::Auto => return self.primary,
            EngineChoice::Neural => EngineKind::Neural,
            EngineChoice::System => EngineKind::System,
        };

        if self.available(requested) {
            requested
        } else {
            warn!(
                requested = requested.as_str(),
                substitute = requested.other().as_str(),
                "requested engine unavailable, substituting"
            );
            requested.other()
        }
    }

    /// Synthesize with the selected engine, retrying once on the
    /// fallback when the selected engine was the primary.
    ///
    /// Returns the engine that produced the artifact.
    pub fn synthesize(
        &self,
        choice: EngineChoice,
        spec: &SynthesisSpec,
        dest: &Path,
    ) -> Result<EngineKind, SynthesisError> {
        let selected = self.select(choice);

        if self.engine(selected).synthesize(spec, dest) {
            return Ok(selected);
        }

        // Fallback applies only when the primary was the engine that
        // failed; an explicitly requested non-primary engine gets a
        // single attempt.
        let fallback = selected.other();
        if selected == self.primary && self.available(fallback) {
            warn!(
                failed = selected.as_str(),
                fallback = fallback.as_str(),
                "primary engine failed, trying fallback"
            );
            if self.engine(fallback).synthesize(spec, dest) {
                return Ok(fallback);
            }
            return Err(SynthesisError::FallbackFailed {
                primary: self.engine(selected).name(),
                fallback: self.engine(fallback).name(),
            });
        }

        Err(SynthesisError::EngineFailed(self.engine(selected).name()))
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            neural_available: self.available(EngineKind::Neural),
            system_available: self.available(EngineKind::System),
            default_engine: self.engine(self.primary).name(),
        }
    }

    /// Voices exposed by one engine; empty when it is unavailable.
    pub fn voices(&self, kind: EngineKind) -> Vec<VoiceInfo> {
        if self.available(kind) {
            self.engine(kind).list_voices()
        } else {
            Vec::new()
        }
    }
}
