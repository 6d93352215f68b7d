//! Request handlers for the stage endpoints.

use crate::dto::{
    GenerateAudioRequest, GenerateAudioResponse, GenerateScriptRequest, GenerateScriptResponse,
    GenerateVideoRequest, GenerateVideoResponse, ImprovePromptRequest, ImprovePromptResponse,
};
use crate::state::AppState;
use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use melies_core::JobId;
use melies_error::{JobErrorKind, MeliesError, MeliesErrorKind};
use serde_json::json;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::warn;

/// `POST /api/improve-prompt`: refine a raw topic prompt.
pub(crate) async fn improve_prompt(
    State(state): State<AppState>,
    Json(body): Json<ImprovePromptRequest>,
) -> Response {
    if body.prompt.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Prompt is required");
    }
    let id = match resolve_session(body.session_id.as_deref()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.pipeline().refine(&id, &body.prompt).await {
        Ok(job) => Json(ImprovePromptResponse {
            refined_prompt: job.refined_prompt().clone(),
            session_id: id.to_string(),
        })
        .into_response(),
        Err(err) => failure_response("Failed to refine prompt", &err),
    }
}

/// `POST /api/generate-script`: write the scene/speech script.
pub(crate) async fn generate_script(
    State(state): State<AppState>,
    Json(body): Json<GenerateScriptRequest>,
) -> Response {
    if body.prompt.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "A prompt is required");
    }
    let id = match resolve_session(body.session_id.as_deref()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.pipeline().script(&id, &body.prompt).await {
        Ok(job) => Json(GenerateScriptResponse {
            script: job.script().clone(),
            session_id: id.to_string(),
        })
        .into_response(),
        Err(err) => failure_response("Failed to generate script", &err),
    }
}

/// `POST /api/generate-audio`: synthesize and publish the narration.
pub(crate) async fn generate_audio(
    State(state): State<AppState>,
    Json(body): Json<GenerateAudioRequest>,
) -> Response {
    if body.script.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "A script is required");
    }
    let id = match resolve_session(body.session_id.as_deref()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.pipeline().audio(&id, &body.script).await {
        Ok(outcome) => Json(GenerateAudioResponse {
            audio_url: outcome.public_url,
            local_audio_path: outcome.local_path.display().to_string(),
            session_id: id.to_string(),
        })
        .into_response(),
        Err(err) => failure_response("Failed to generate audio", &err),
    }
}

/// `POST /api/generate-video`: generate code, render, mux and publish.
pub(crate) async fn generate_video(
    State(state): State<AppState>,
    Json(body): Json<GenerateVideoRequest>,
) -> Response {
    let local_audio = body.local_audio_path.clone().unwrap_or_default();
    if body.script.trim().is_empty() || local_audio.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Script and localAudioPath are required",
        );
    }
    let id = match resolve_session(body.session_id.as_deref()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let audio = PathBuf::from(&local_audio);
    match state.pipeline().video(&id, &body.script, Some(&audio)).await {
        Ok(job) => Json(GenerateVideoResponse {
            video_url: job.video_path().clone().unwrap_or_default(),
            session_id: id.to_string(),
        })
        .into_response(),
        Err(err) => failure_response("Failed to generate video", &err),
    }
}

/// `GET /api/jobs/:id`: the full job record.
pub(crate) async fn get_job(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let Ok(id) = raw_id.parse::<JobId>() else {
        return error_response(StatusCode::NOT_FOUND, "Job not found");
    };
    match state.pipeline().job(&id).await {
        Ok(job) => Json(job).into_response(),
        Err(err) if is_job_not_found(&err) => {
            error_response(StatusCode::NOT_FOUND, &format!("Job not found: {id}"))
        }
        Err(err) => failure_response("Failed to load job", &err),
    }
}

/// `GET /api/health`: liveness probe.
pub(crate) async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}

/// `GET /media/*path`: published media files.
pub(crate) async fn serve_media(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Response {
    let Some(full) = resolve_media_path(state.media_root(), &path) else {
        return error_response(StatusCode::NOT_FOUND, "Media not found");
    };
    match tokio::fs::read(&full).await {
        Ok(bytes) => media_response(&path, bytes),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            error_response(StatusCode::NOT_FOUND, "Media not found")
        }
        Err(err) => {
            warn!(key = %path, error = %err, "failed to read media");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read media")
        }
    }
}

fn error_response(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "error": error }))).into_response()
}

fn failure_response(summary: &str, err: &MeliesError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": summary, "details": err.to_string() })),
    )
        .into_response()
}

/// Parse the supplied session id, or mint one when the client sent none.
fn resolve_session(supplied: Option<&str>) -> Result<JobId, Response> {
    match supplied {
        Some(raw) => raw
            .parse()
            .map_err(|_| error_response(StatusCode::BAD_REQUEST, "SessionId is required")),
        None => Ok(JobId::mint()),
    }
}

fn is_job_not_found(err: &MeliesError) -> bool {
    matches!(
        err.kind(),
        MeliesErrorKind::Job(job) if matches!(job.kind, JobErrorKind::NotFound(_))
    )
}

/// Map a URL key onto the media root, refusing traversal components.
fn resolve_media_path(root: &std::path::Path, key: &str) -> Option<PathBuf> {
    if key.is_empty() {
        return None;
    }
    let mut full = root.to_path_buf();
    for part in key.split('/') {
        if part.is_empty() || part == "." || part == ".." || part.contains('\\') {
            return None;
        }
        full.push(part);
    }
    Some(full)
}

fn media_response(key: &str, bytes: Vec<u8>) -> Response {
    let len = bytes.len();
    let mime = mime_guess::from_path(key).first_or_octet_stream();
    let mut response = Response::new(Body::from(bytes));
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(mime.essence_str()) {
        headers.insert(CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&len.to_string()) {
        headers.insert(CONTENT_LENGTH, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_paths_reject_traversal() {
        let root = std::path::Path::new("/srv/media");
        assert!(resolve_media_path(root, "videos/final_1.mp4").is_some());
        assert!(resolve_media_path(root, "../etc/passwd").is_none());
        assert!(resolve_media_path(root, "videos/../../etc/passwd").is_none());
        assert!(resolve_media_path(root, "videos//final.mp4").is_none());
        assert!(resolve_media_path(root, "").is_none());
        assert!(resolve_media_path(root, "videos\\final.mp4").is_none());
    }

    #[test]
    fn session_ids_mint_when_absent() {
        assert!(resolve_session(None).is_ok());
        assert!(resolve_session(Some("client-7")).is_ok());
        assert!(resolve_session(Some("   ")).is_err());
    }
}
