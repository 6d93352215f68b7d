//! Melies - narrated animation generation pipeline.
//!
//! Melies turns a one-line topic prompt into a published narrated animation.
//! A text model refines the prompt and writes a timed scene script, a speech
//! model narrates it, a sandboxed animation renderer draws the scenes, and a
//! muxer stitches narration onto the silent render before the result is
//! published to a media store. Every job carries a persisted record whose
//! status only ever moves forward.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use melies::{
//!     FileSystemMediaStore, GeminiSpeechDriver, GeminiTextDriver, JobId,
//!     JsonJobStore, MediaLayout, Muxer, Pipeline, Renderer,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> melies::MeliesResult<()> {
//!     let pipeline = Pipeline::builder()
//!         .text(Arc::new(GeminiTextDriver::new("gemini-2.5-flash")?))
//!         .speech(Arc::new(GeminiSpeechDriver::new("gemini-2.5-flash-preview-tts")?))
//!         .jobs(Arc::new(JsonJobStore::new("jobs")?))
//!         .media(Arc::new(FileSystemMediaStore::new("public", "http://localhost:3001/media")?))
//!         .layout(MediaLayout::new("media"))
//!         .renderer(Renderer::new("manim", "-qm", None))
//!         .muxer(Muxer::new("ffmpeg"))
//!         .voice("Kore")
//!         .build()
//!         .map_err(|err| melies::BuilderError::from(err.to_string()))?;
//!
//!     let job = pipeline.run_all(&JobId::mint(), "explain the binomial theorem").await?;
//!     println!("published: {:?}", job.video_path());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Melies is organized as a workspace with focused crates:
//!
//! - `melies_error` - Error types
//! - `melies_core` - Job records, request/response types, the WAV codec
//! - `melies_interface` - Driver and store trait seams
//! - `melies_models` - Gemini text/speech drivers and scripted mocks
//! - `melies_render` - Code sanitizer, subprocess runner, renderer and muxer
//! - `melies_storage` - JSON job store and filesystem media store
//! - `melies_pipeline` - The stage orchestrator
//! - `melies_server` - HTTP API
//!
//! This crate (`melies`) re-exports everything for convenience and ships the
//! `melies` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;

pub use melies_core::*;
pub use melies_error::*;
pub use melies_interface::*;
pub use melies_models::{GeminiSpeechDriver, GeminiTextDriver, MockSpeechDriver, MockTextDriver};
pub use melies_pipeline::{AudioOutcome, MediaLayout, Pipeline, PipelineBuilder, prompts};
pub use melies_render::{
    CommandSpec, Muxer, ProcessOutput, Renderer, Sanitizer, strip_markdown_fences,
};
pub use melies_server::{AppState, create_router, serve};
pub use melies_storage::{FileSystemMediaStore, InMemoryJobStore, JsonJobStore};
