//! REST API for the dual-engine TTS service.
//!
//! Provides HTTP endpoints for synthesis (sync and async), engine
//! status, voice and style listings, artifact cleanup and static
//! serving of generated audio.

pub mod handlers;
pub mod tasks;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Instant;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::engine::TtsSystem;
use tasks::TaskStore;

/// Shared state accessible by all API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub tts: Arc<TtsSystem>,
    pub tasks: Arc<TaskStore>,
    /// Directory where generated artifacts are written and served from.
    pub audio_dir: PathBuf,
    pub started: Instant,
    pub requests: Arc<AtomicU64>,
}

impl ApiState {
    pub fn new(tts: Arc<TtsSystem>, audio_dir: PathBuf) -> Self {
        Self {
            tts,
            tasks: Arc::new(TaskStore::new()),
            audio_dir,
            started: Instant::now(),
            requests: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// Build the API router with all routes.
pub fn build_router(state: ApiState) -> Router {
    let audio_dir = state.audio_dir.clone();

    Router::new()
        .nest("/api", handlers::api_routes())
        .nest_service("/audio", ServeDir::new(audio_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: ApiState, addr: SocketAddr) -> std::io::Result<()> {
    std::fs::create_dir_all(&state.audio_dir)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, audio_dir = %state.audio_dir.display(), "API server listening");
    axum::serve(listener, build_router(state)).await
}

#[cfg(test)]
mod tests {
    use super::handlers::{MAX_TEXT_LEN, SynthesizeBody, sweep_audio_files, validate};
    use super::tasks::{TaskResult, TaskState, TaskStore};
    use chrono::{Duration, Utc};
    use std::time::{Duration as StdDuration, SystemTime};
    use tempfile::TempDir;

    fn body(text: &str) -> SynthesizeBody {
        SynthesizeBody {
            text: text.to_string(),
            style: "neutral".to_string(),
            intensity: 50,
            engine: Default::default(),
            voice: None,
            speed: None,
        }
    }

    // ===========================================
    // Validation tests
    // ===========================================

    #[test]
    fn test_validate_accepts_plain_request() {
        assert!(validate(&body("Hello")).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_text() {
        assert!(validate(&body("")).is_err());
        assert!(validate(&body("   ")).is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_text() {
        let long = "a".repeat(MAX_TEXT_LEN + 1);
        assert!(validate(&body(&long)).is_err());

        let at_limit = "a".repeat(MAX_TEXT_LEN);
        assert!(validate(&body(&at_limit)).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_intensity() {
        let mut request = body("Hello");
        request.intensity = 101;
        assert!(validate(&request).is_err());

        request.intensity = 100;
        assert!(validate(&request).is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_speed() {
        let mut request = body("Hello");

        request.speed = Some(0.0);
        assert!(validate(&request).is_err());

        request.speed = Some(-1.0);
        assert!(validate(&request).is_err());

        request.speed = Some(f32::NAN);
        assert!(validate(&request).is_err());

        request.speed = Some(1.5);
        assert!(validate(&request).is_ok());
    }

    // ===========================================
    // Task store tests
    // ===========================================

    fn sample_result() -> TaskResult {
        TaskResult {
            audio_url: "/audio/out.wav".to_string(),
            processing_time_secs: 0.5,
            file_size: 1024,
        }
    }

    #[test]
    fn test_task_starts_pending_at_zero() {
        let store = TaskStore::new();
        let id = store.create();

        let record = store.get(id).unwrap();
        assert_eq!(record.status, TaskState::Pending);
        assert_eq!(record.progress, 0);
        assert!(record.result.is_none());
        assert!(record.error.is_none());
    }

    #[test]
    fn test_task_status_never_moves_backward() {
        let store = TaskStore::new();
        let id = store.create();

        store.advance(id, TaskState::Processing, 30);
        store.advance(id, TaskState::Pending, 0);

        let record = store.get(id).unwrap();
        assert_eq!(record.status, TaskState::Processing);
        assert_eq!(record.progress, 30);
    }

    #[test]
    fn test_task_progress_never_decreases() {
        let store = TaskStore::new();
        let id = store.create();

        store.advance(id, TaskState::Processing, 30);
        store.advance(id, TaskState::Processing, 10);

        assert_eq!(store.get(id).unwrap().progress, 30);
    }

    #[test]
    fn test_completed_task_is_terminal() {
        let store = TaskStore::new();
        let id = store.create();

        store.advance(id, TaskState::Processing, 30);
        store.complete(id, sample_result());
        store.fail(id, "late failure must not overwrite");
        store.advance(id, TaskState::Processing, 50);

        let record = store.get(id).unwrap();
        assert_eq!(record.status, TaskState::Completed);
        assert_eq!(record.progress, 100);
        assert!(record.result.is_some());
        assert!(record.error.is_none());
    }

    #[test]
    fn test_failed_task_records_error() {
        let store = TaskStore::new();
        let id = store.create();

        store.fail(id, "engine exploded");

        let record = store.get(id).unwrap();
        assert_eq!(record.status, TaskState::Failed);
        assert_eq!(record.progress, 100);
        assert_eq!(record.error.as_deref(), Some("engine exploded"));
    }

    #[test]
    fn test_get_unknown_task() {
        let store = TaskStore::new();
        assert!(store.get(uuid::Uuid::new_v4()).is_none());
    }

    // ===========================================
    // Artifact sweep tests
    // ===========================================

    #[test]
    fn test_file_sweep_removes_only_strictly_older_wavs() {
        let temp_dir = TempDir::new().unwrap();
        let wav = temp_dir.path().join("tts_20260101_000000_abcd1234.wav");
        std::fs::write(&wav, b"RIFF").unwrap();

        // Cutoff in the past: the fresh artifact is not strictly older.
        let cutoff = SystemTime::now() - StdDuration::from_secs(3600);
        assert_eq!(sweep_audio_files(temp_dir.path(), cutoff).unwrap(), 0);
        assert!(wav.exists());

        // Cutoff in the future: the artifact is strictly older, so it goes.
        let cutoff = SystemTime::now() + StdDuration::from_secs(1);
        assert_eq!(sweep_audio_files(temp_dir.path(), cutoff).unwrap(), 1);
        assert!(!wav.exists());
    }

    #[test]
    fn test_file_sweep_leaves_non_wav_files_alone() {
        let temp_dir = TempDir::new().unwrap();
        let note = temp_dir.path().join("notes.txt");
        let bare = temp_dir.path().join("no-extension");
        std::fs::write(&note, b"keep me").unwrap();
        std::fs::write(&bare, b"keep me too").unwrap();

        let cutoff = SystemTime::now() + StdDuration::from_secs(1);
        assert_eq!(sweep_audio_files(temp_dir.path(), cutoff).unwrap(), 0);
        assert!(note.exists());
        assert!(bare.exists());
    }

    #[test]
    fn test_sweep_removes_only_strictly_older_records() {
        let store = TaskStore::new();
        let id = store.create();

        // Cutoff in the past: the fresh record survives.
        let removed = store.sweep(Utc::now() - Duration::hours(1));
        assert_eq!(removed, 0);
        assert!(store.get(id).is_some());

        // Cutoff in the future: the record is strictly older, so it goes.
        let removed = store.sweep(Utc::now() + Duration::seconds(1));
        assert_eq!(removed, 1);
        assert!(store.get(id).is_none());
        assert!(store.is_empty());
    }
}
