//! Core data types for the Melies video generation pipeline.
//!
//! This crate defines the types shared by every other crate in the
//! workspace:
//!
//! - **Job records**: [`Job`], [`JobId`] and the [`JobStatus`] state machine
//!   that tracks a prompt's progress from topic to published video
//! - **Driver payloads**: [`TextRequest`]/[`TextResponse`] and
//!   [`SpeechRequest`]/[`SpeechResponse`] exchanged with model drivers
//! - **Audio codec**: WAV encoding for raw PCM narration ([`wav`])
//! - **Capability tables**: the whitelist and blacklist governing generated
//!   animation code ([`capability`])
//!
//! # Examples
//!
//! ```
//! use melies_core::{Job, JobId, JobStatus};
//!
//! let mut job = Job::new(JobId::mint(), "Explain the water cycle");
//! assert_eq!(*job.status(), JobStatus::Created);
//!
//! job.advance(JobStatus::Refining)?;
//! job.set_refined_prompt("A detailed brief about the water cycle".to_string());
//! # Ok::<(), melies_error::MeliesError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod capability;
mod job;
mod request;
pub mod wav;

pub use job::{Job, JobId, JobStatus};
pub use request::{
    SpeechRequest, SpeechResponse, TextRequest, TextRequestBuilder, TextResponse,
};
pub use wav::WavHeader;
