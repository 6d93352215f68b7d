//! Trait definitions for the Melies video generation pipeline.
//!
//! This crate provides the seams between the orchestration layer and its
//! replaceable backends: model drivers, the job store, and the media store.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod store;
mod traits;

pub use store::{CleanupReport, JobStore, MediaStore};
pub use traits::{SpeechModelDriver, TextModelDriver};
