//! Error types for the Melies video generation pipeline.
//!
//! This crate provides the foundation error types used throughout the Melies
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use melies_error::{MeliesResult, JobError, JobErrorKind};
//!
//! fn fetch_job() -> MeliesResult<String> {
//!     Err(JobError::new(JobErrorKind::NotFound("1712000000000".to_string())))?
//! }
//!
//! match fetch_job() {
//!     Ok(job) => println!("Got: {}", job),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod audio;
mod builder;
mod config;
mod error;
mod gemini;
mod job;
mod process;
mod render;
mod server;
mod storage;

pub use audio::{AudioError, AudioErrorKind};
pub use builder::{BuilderError, BuilderErrorKind};
pub use config::{ConfigError, ConfigErrorKind};
pub use error::{MeliesError, MeliesErrorKind, MeliesResult};
pub use gemini::{GeminiError, GeminiErrorKind};
pub use job::{JobError, JobErrorKind};
pub use process::{ProcessError, ProcessErrorKind};
pub use render::{RenderError, RenderErrorKind};
pub use server::ServerError;
pub use storage::{StorageError, StorageErrorKind};
