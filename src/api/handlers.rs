//! HTTP request handlers for the REST API.

use std::sync::atomic::Ordering;
use std::time::{Duration as StdDuration, Instant, SystemTime};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::audio;
use crate::engine::{EngineChoice, EngineKind, SynthesisError, SynthesisSpec};
use crate::style::Style;
use crate::voice::VoiceInfo;

use super::ApiState;
use super::tasks::{TaskRecord, TaskResult, TaskState};

/// Maximum accepted text length, in characters.
pub const MAX_TEXT_LEN: usize = 1000;

/// Artifacts and task records older than this are removed by cleanup.
const RETENTION_SECS: i64 = 3600;

/// Fixed text used by voice previews.
const PREVIEW_TEXT: &str = "Hello, this is a voice preview. How do you like this voice?";

/// Build all API routes.
pub fn api_routes() -> Router<ApiState> {
    Router::new()
        .route("/status", get(status))
        .route("/voices", get(voices))
        .route("/styles", get(styles))
        .route("/synthesize", post(synthesize))
        .route("/synthesize-async", post(synthesize_async))
        .route("/task/{id}", get(task_status))
        .route("/cleanup", delete(cleanup))
        .route("/preview-voice", post(preview_voice))
}

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("task not found: {0}")]
    TaskNotFound(Uuid),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Synthesis(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

// ── Types ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct SynthesizeBody {
    pub text: String,
    /// Style name; unknown names fall back to neutral.
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default = "default_intensity")]
    pub intensity: u32,
    #[serde(default)]
    pub engine: EngineChoice,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub speed: Option<f32>,
}

fn default_style() -> String {
    "neutral".to_string()
}

fn default_intensity() -> u32 {
    50
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesizeResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub neural_available: bool,
    pub system_available: bool,
    pub default_engine: &'static str,
    pub total_requests: u64,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoicesResponse {
    pub neural: Vec<VoiceInfo>,
    pub system: Vec<VoiceInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StyleDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewBody {
    #[serde(default)]
    pub voice_id: String,
    #[serde(default)]
    pub engine: EngineChoice,
}

// ── Validation ─────────────────────────────────────────────────

/// Reject invalid requests before any engine is invoked.
pub(crate) fn validate(body: &SynthesizeBody) -> Result<(), ApiError> {
    if body.text.trim().is_empty() {
        return Err(ApiError::Validation("text cannot be empty".to_string()));
    }
    if body.text.chars().count() > MAX_TEXT_LEN {
        return Err(ApiError::Validation(format!(
            "text too long (max {MAX_TEXT_LEN} characters)"
        )));
    }
    if body.intensity > 100 {
        return Err(ApiError::Validation(
            "intensity must be between 0 and 100".to_string(),
        ));
    }
    if let Some(speed) = body.speed
        && !(speed.is_finite() && speed > 0.0)
    {
        return Err(ApiError::Validation(
            "speed must be a positive number".to_string(),
        ));
    }
    Ok(())
}

fn spec_from(body: &SynthesizeBody) -> SynthesisSpec {
    let mut spec = SynthesisSpec::new(body.text.clone())
        .with_style(Style::parse(&body.style))
        .with_intensity(body.intensity as u8);
    if let Some(voice) = &body.voice {
        spec = spec.with_voice(voice.clone());
    }
    if let Some(speed) = body.speed {
        spec = spec.with_speed(speed);
    }
    spec
}

/// Unique artifact filename: prefix, timestamp, random tag.
fn output_filename(prefix: &str) -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let tag = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{timestamp}_{}.wav", &tag[..8])
}

/// Remove `.wav` artifacts in `dir` modified strictly before `cutoff`.
/// Other files are left alone. Returns the number removed.
pub(crate) fn sweep_audio_files(
    dir: &std::path::Path,
    cutoff: SystemTime,
) -> std::io::Result<usize> {
    let mut removed = 0usize;
    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        let is_old = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .is_ok_and(|modified| modified < cutoff);
        if path.extension().is_some_and(|ext| ext == "wav")
            && is_old
            && std::fs::remove_file(&path).is_ok()
        {
            removed += 1;
        }
    }
    Ok(removed)
}

// ── Handlers ───────────────────────────────────────────────────

async fn status(State(state): State<ApiState>) -> Json<StatusResponse> {
    let engines = state.tts.status();
    Json(StatusResponse {
        neural_available: engines.neural_available,
        system_available: engines.system_available,
        default_engine: engines.default_engine,
        total_requests: state.requests.load(Ordering::Relaxed),
        uptime_secs: state.started.elapsed().as_secs(),
    })
}

async fn voices(State(state): State<ApiState>) -> Result<Json<VoicesResponse>, ApiError> {
    // Voice listing shells out / does HTTP, so keep it off the runtime.
    let tts = state.tts.clone();
    let (neural, system) = tokio::task::spawn_blocking(move || {
        (tts.voices(EngineKind::Neural), tts.voices(EngineKind::System))
    })
    .await
    .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(Json(VoicesResponse { neural, system }))
}

async fn styles() -> Json<Vec<StyleDescriptor>> {
    Json(
        Style::ALL
            .iter()
            .map(|style| StyleDescriptor {
                id: style.id(),
                name: style.display_name(),
                description: style.description(),
            })
            .collect(),
    )
}

async fn synthesize(
    State(state): State<ApiState>,
    Json(body): Json<SynthesizeBody>,
) -> Result<Json<SynthesizeResponse>, ApiError> {
    state.requests.fetch_add(1, Ordering::Relaxed);
    validate(&body)?;

    std::fs::create_dir_all(&state.audio_dir)
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    let dest = state.audio_dir.join(output_filename("tts"));

    let spec = spec_from(&body);
    let engine = body.engine;
    let tts = state.tts.clone();
    let task_dest = dest.clone();
    let started = Instant::now();

    let used = tokio::task::spawn_blocking(move || tts.synthesize(engine, &spec, &task_dest))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;

    let filename = dest
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(Json(SynthesizeResponse {
        success: true,
        message: format!("speech synthesized with the {} engine", used.as_str()),
        audio_url: Some(format!("/audio/{filename}")),
        task_id: None,
        processing_time_secs: Some(started.elapsed().as_secs_f64()),
        duration_secs: audio::wav_info(&dest).map(|info| info.duration_secs),
    }))
}

async fn synthesize_async(
    State(state): State<ApiState>,
    Json(body): Json<SynthesizeBody>,
) -> Result<Json<SynthesizeResponse>, ApiError> {
    state.requests.fetch_add(1, Ordering::Relaxed);
    validate(&body)?;

    let id = state.tasks.create();
    tokio::spawn(run_task(state.clone(), id, body));

    Ok(Json(SynthesizeResponse {
        success: true,
        message: "task queued for processing".to_string(),
        audio_url: None,
        task_id: Some(id),
        processing_time_secs: None,
        duration_secs: None,
    }))
}

/// Drive one queued synthesis task to a terminal state.
async fn run_task(state: ApiState, id: Uuid, body: SynthesizeBody) {
    state.tasks.advance(id, TaskState::Processing, 10);

    if let Err(err) = std::fs::create_dir_all(&state.audio_dir) {
        state.tasks.fail(id, err.to_string());
        return;
    }
    let dest = state.audio_dir.join(output_filename("tts_async"));

    state.tasks.advance(id, TaskState::Processing, 30);

    let spec = spec_from(&body);
    let engine = body.engine;
    let tts = state.tts.clone();
    let task_dest = dest.clone();
    let started = Instant::now();

    let outcome =
        tokio::task::spawn_blocking(move || tts.synthesize(engine, &spec, &task_dest)).await;

    match outcome {
        Ok(Ok(used)) => {
            let filename = dest
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let file_size = std::fs::metadata(&dest).map(|m| m.len()).unwrap_or(0);
            info!(task = %id, engine = used.as_str(), "async synthesis complete");
            state.tasks.complete(
                id,
                TaskResult {
                    audio_url: format!("/audio/{filename}"),
                    processing_time_secs: started.elapsed().as_secs_f64(),
                    file_size,
                },
            );
        }
        Ok(Err(err)) => state.tasks.fail(id, err.to_string()),
        Err(err) => state.tasks.fail(id, format!("task aborted: {err}")),
    }
}

async fn task_status(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskRecord>, ApiError> {
    state.tasks.get(id).map(Json).ok_or(ApiError::TaskNotFound(id))
}

/// Remove artifacts and task records older than the retention window.
async fn cleanup(State(state): State<ApiState>) -> Result<Json<serde_json::Value>, ApiError> {
    let file_cutoff = SystemTime::now() - StdDuration::from_secs(RETENTION_SECS as u64);
    let removed_files = if state.audio_dir.exists() {
        sweep_audio_files(&state.audio_dir, file_cutoff)
            .map_err(|err| ApiError::Internal(err.to_string()))?
    } else {
        0
    };

    let removed_tasks = state
        .tasks
        .sweep(Utc::now() - Duration::seconds(RETENTION_SECS));

    info!(removed_files, removed_tasks, "cleanup finished");
    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("cleaned up {removed_files} files and {removed_tasks} tasks"),
    })))
}

async fn preview_voice(
    State(state): State<ApiState>,
    Json(body): Json<PreviewBody>,
) -> Result<Json<SynthesizeResponse>, ApiError> {
    state.requests.fetch_add(1, Ordering::Relaxed);

    std::fs::create_dir_all(&state.audio_dir)
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    let dest = state.audio_dir.join(output_filename("preview"));

    let mut spec = SynthesisSpec::new(PREVIEW_TEXT);
    if !body.voice_id.is_empty() {
        spec = spec.with_voice(body.voice_id.clone());
    }

    let engine = body.engine;
    let tts = state.tts.clone();
    let task_dest = dest.clone();
    let started = Instant::now();

    let used = tokio::task::spawn_blocking(move || tts.synthesize(engine, &spec, &task_dest))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;

    let filename = dest
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(Json(SynthesizeResponse {
        success: true,
        message: format!("voice preview generated with the {} engine", used.as_str()),
        audio_url: Some(format!("/audio/{filename}")),
        task_id: None,
        processing_time_secs: Some(started.elapsed().as_secs_f64()),
        duration_secs: None,
    }))
}
