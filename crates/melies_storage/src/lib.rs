//! Storage backends for job records and published media.
//!
//! Two job stores implement the same [`melies_interface::JobStore`] seam:
//! a JSON file-per-record store for real deployments and an in-memory map
//! for tests. Published media lives in a directory tree served over HTTP,
//! with a JSON sidecar per object carrying its content type and age.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod json_store;
mod media;
mod memory;

pub use json_store::JsonJobStore;
pub use media::FileSystemMediaStore;
pub use memory::InMemoryJobStore;
