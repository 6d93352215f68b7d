//! End-to-end API tests over scripted drivers and an in-process router.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use melies_models::{MockSpeechDriver, MockTextDriver};
use melies_pipeline::{MediaLayout, Pipeline};
use melies_render::{Muxer, Renderer};
use melies_server::{AppState, create_router};
use melies_storage::{FileSystemMediaStore, InMemoryJobStore};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BASE_URL: &str = "http://localhost:3001/media";

struct Harness {
    router: Router,
    text: Arc<MockTextDriver>,
    store: PathBuf,
    staging: PathBuf,
}

fn harness(root: &Path, render_command: &str, mux_command: &str) -> Harness {
    let staging = root.join("staging");
    let store = root.join("store");
    let text = Arc::new(MockTextDriver::new());
    let speech = Arc::new(MockSpeechDriver::new());
    let jobs = Arc::new(InMemoryJobStore::new());
    let media = Arc::new(FileSystemMediaStore::new(&store, BASE_URL).unwrap());
    let pipeline = Pipeline::builder()
        .text(text.clone())
        .speech(speech)
        .jobs(jobs)
        .media(media)
        .layout(MediaLayout::new(&staging))
        .renderer(Renderer::new(render_command, "-qm", None))
        .muxer(Muxer::new(mux_command))
        .voice("Kore")
        .build()
        .unwrap();
    let state = AppState::new(Arc::new(pipeline), &store);
    Harness {
        router: create_router(state),
        text,
        store,
        staging,
    }
}

fn driver_harness(root: &Path) -> Harness {
    harness(root, "manim", "ffmpeg")
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, bytes.to_vec())
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

#[cfg(unix)]
fn fake_renderer(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "fake_manim",
        concat!(
            "#!/bin/sh\n",
            "out=\"\"\n",
            "prev=\"\"\n",
            "for a in \"$@\"; do\n",
            "  if [ \"$prev\" = \"-o\" ]; then out=\"$a\"; fi\n",
            "  prev=\"$a\"\n",
            "done\n",
            "mkdir -p media/videos/scene/720p30\n",
            "printf 'silent' > \"media/videos/scene/720p30/$out\"\n",
        ),
    )
}

#[cfg(unix)]
fn fake_muxer(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "fake_ffmpeg",
        "#!/bin/sh\nfor last in \"$@\"; do :; done\nprintf 'muxed' > \"$last\"\n",
    )
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = TempDir::new().unwrap();
    let h = driver_harness(dir.path());

    let (status, _, body) = get(&h.router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["status"], "ok");
    assert!(value["timestamp"].is_string());
}

#[tokio::test]
async fn improve_prompt_refines_and_echoes_the_session() {
    let dir = TempDir::new().unwrap();
    let h = driver_harness(dir.path());
    h.text.push_text("A refined prompt about entropy.");

    let (status, body) = post_json(
        &h.router,
        "/api/improve-prompt",
        json!({ "prompt": "explain entropy", "sessionId": "client-1" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["refinedPrompt"], "A refined prompt about entropy.");
    assert_eq!(body["sessionId"], "client-1");
}

#[tokio::test]
async fn improve_prompt_mints_a_session_when_absent() {
    let dir = TempDir::new().unwrap();
    let h = driver_harness(dir.path());
    h.text.push_text("Refined.");

    let (status, body) = post_json(
        &h.router,
        "/api/improve-prompt",
        json!({ "prompt": "explain entropy" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let minted = body["sessionId"].as_str().unwrap();
    assert!(!minted.is_empty());

    // The minted id resolves through the job endpoint.
    let (status, _, job_body) = get(&h.router, &format!("/api/jobs/{minted}")).await;
    assert_eq!(status, StatusCode::OK);
    let job: Value = serde_json::from_slice(&job_body).unwrap();
    assert_eq!(job["status"], "refining");
}

#[tokio::test]
async fn improve_prompt_requires_a_prompt() {
    let dir = TempDir::new().unwrap();
    let h = driver_harness(dir.path());

    let (status, body) = post_json(&h.router, "/api/improve-prompt", json!({ "prompt": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Prompt is required");

    let (status, body) = post_json(
        &h.router,
        "/api/improve-prompt",
        json!({ "prompt": "p", "sessionId": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "SessionId is required");
}

#[tokio::test]
async fn improve_prompt_failure_returns_details() {
    let dir = TempDir::new().unwrap();
    let h = driver_harness(dir.path());
    h.text.push_error(
        melies_error::GeminiError::empty_response(Some("SAFETY".to_string())).into(),
    );

    let (status, body) = post_json(
        &h.router,
        "/api/improve-prompt",
        json!({ "prompt": "p", "sessionId": "s" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to refine prompt");
    assert!(body["details"].as_str().unwrap().contains("SAFETY"));
}

#[tokio::test]
async fn generate_script_returns_the_script() {
    let dir = TempDir::new().unwrap();
    let h = driver_harness(dir.path());
    h.text
        .push_text("--scene1--\nTitle: Entropy\n--speech--\n0:05 Hello.");

    let (status, body) = post_json(
        &h.router,
        "/api/generate-script",
        json!({ "prompt": "A refined prompt", "sessionId": "client-2" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["script"].as_str().unwrap().starts_with("--scene1--"));
    assert_eq!(body["sessionId"], "client-2");

    let (status, body) = post_json(&h.router, "/api/generate-script", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "A prompt is required");
}

#[tokio::test]
async fn generate_audio_publishes_and_returns_both_paths() {
    let dir = TempDir::new().unwrap();
    let h = driver_harness(dir.path());

    let (status, body) = post_json(
        &h.router,
        "/api/generate-audio",
        json!({ "script": "0:05 Hello and welcome!", "sessionId": "client-3" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let audio_url = body["audioUrl"].as_str().unwrap();
    assert!(audio_url.starts_with("http://localhost:3001/media/audio/audio_"));
    let local = Path::new(body["localAudioPath"].as_str().unwrap());
    assert!(local.starts_with(&h.staging));
    assert!(local.is_file());
    assert_eq!(body["sessionId"], "client-3");

    // The published copy is immediately streamable through /media.
    let key = audio_url.strip_prefix("http://localhost:3001").unwrap();
    let (status, content_type, bytes) = get(&h.router, key).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("audio/"));
    assert_eq!(&bytes[..4], b"RIFF");
}

#[tokio::test]
async fn generate_audio_requires_a_script() {
    let dir = TempDir::new().unwrap();
    let h = driver_harness(dir.path());

    let (status, body) = post_json(&h.router, "/api/generate-audio", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "A script is required");
}

#[tokio::test]
async fn generate_video_requires_script_and_audio_path() {
    let dir = TempDir::new().unwrap();
    let h = driver_harness(dir.path());

    let (status, body) = post_json(
        &h.router,
        "/api/generate-video",
        json!({ "script": "s", "sessionId": "client-4" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Script and localAudioPath are required");

    let (status, _) = post_json(
        &h.router,
        "/api/generate-video",
        json!({ "localAudioPath": "a.wav", "sessionId": "client-4" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_jobs_return_not_found() {
    let dir = TempDir::new().unwrap();
    let h = driver_harness(dir.path());

    let (status, _, body) = get(&h.router, "/api/jobs/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert!(value["error"].as_str().unwrap().contains("Job not found"));
}

#[tokio::test]
async fn media_requests_cannot_escape_the_root() {
    let dir = TempDir::new().unwrap();
    let h = driver_harness(dir.path());
    fs::create_dir_all(h.store.join("videos")).unwrap();
    fs::write(h.store.join("videos/final_9.mp4"), b"bytes").unwrap();
    fs::write(dir.path().join("secret.txt"), b"secret").unwrap();

    let (status, content_type, bytes) = get(&h.router, "/media/videos/final_9.mp4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("video/mp4"));
    assert_eq!(bytes, b"bytes");

    let (status, _, _) = get(&h.router, "/media/videos/missing.mp4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = get(&h.router, "/media/videos/../../secret.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[cfg(unix)]
#[tokio::test]
async fn generate_video_round_trips_through_media() {
    let dir = TempDir::new().unwrap();
    let renderer = fake_renderer(dir.path());
    let muxer = fake_muxer(dir.path());
    let h = harness(
        dir.path(),
        renderer.to_str().unwrap(),
        muxer.to_str().unwrap(),
    );
    h.text.push_text(
        "```python\nfrom manim import *\n\nclass ManimScene(Scene):\n    def construct(self):\n        self.play(Write(Text(\"Entropy\")))\n```",
    );

    let narration = dir.path().join("narration.wav");
    fs::write(&narration, b"RIFF").unwrap();

    let (status, body) = post_json(
        &h.router,
        "/api/generate-video",
        json!({
            "script": "--scene1-- script",
            "localAudioPath": narration.to_str().unwrap(),
            "sessionId": "client-5"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["videoUrl"],
        "http://localhost:3001/media/videos/final_client-5.mp4"
    );
    assert_eq!(body["sessionId"], "client-5");

    let (status, content_type, bytes) = get(&h.router, "/media/videos/final_client-5.mp4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("video/mp4"));
    assert_eq!(bytes, b"muxed");

    let (status, _, job_body) = get(&h.router, "/api/jobs/client-5").await;
    assert_eq!(status, StatusCode::OK);
    let job: Value = serde_json::from_slice(&job_body).unwrap();
    assert_eq!(job["status"], "completed");
}

#[cfg(unix)]
#[tokio::test]
async fn generate_video_failure_marks_the_job_failed() {
    let dir = TempDir::new().unwrap();
    let renderer = write_script(
        dir.path(),
        "failing_manim",
        "#!/bin/sh\necho 'Traceback: something broke' >&2\nexit 1\n",
    );
    let muxer = fake_muxer(dir.path());
    let h = harness(
        dir.path(),
        renderer.to_str().unwrap(),
        muxer.to_str().unwrap(),
    );
    h.text
        .push_text("from manim import *\n\nclass ManimScene(Scene):\n    def construct(self):\n        self.wait(1)\n");

    let narration = dir.path().join("narration.wav");
    fs::write(&narration, b"RIFF").unwrap();

    let (status, body) = post_json(
        &h.router,
        "/api/generate-video",
        json!({
            "script": "--scene1-- script",
            "localAudioPath": narration.to_str().unwrap(),
            "sessionId": "client-6"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate video");
    assert!(body["details"].as_str().unwrap().contains("something broke"));

    let (_, _, job_body) = get(&h.router, "/api/jobs/client-6").await;
    let job: Value = serde_json::from_slice(&job_body).unwrap();
    assert_eq!(job["status"], "failed");
    assert!(
        job["error_message"]
            .as_str()
            .unwrap()
            .contains("something broke")
    );
}
