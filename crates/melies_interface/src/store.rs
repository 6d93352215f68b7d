//! Persistence seams: job records and published media.

use async_trait::async_trait;
use melies_core::{Job, JobId};
use melies_error::{MeliesErrorKind, MeliesResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Persistent store for [`Job`] records.
///
/// Implementations persist whole records; the status state machine lives in
/// [`Job`] itself so every backend behaves identically.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a fresh record. Errors if the id already exists.
    async fn create(&self, job: &Job) -> MeliesResult<()>;

    /// Fetch a record by id. Errors with a not-found kind when absent.
    async fn get(&self, id: &JobId) -> MeliesResult<Job>;

    /// Replace an existing record. Errors when absent.
    async fn update(&self, job: &Job) -> MeliesResult<()>;

    /// Fetch a record, creating a fresh one when absent.
    ///
    /// HTTP clients may start at any stage with an id of their choosing, so
    /// every stage entry point goes through this.
    async fn get_or_create(&self, id: &JobId, raw_prompt: &str) -> MeliesResult<Job> {
        match self.get(id).await {
            Ok(job) => Ok(job),
            Err(err) if is_not_found(&err) => {
                let job = Job::new(id.clone(), raw_prompt);
                self.create(&job).await?;
                Ok(job)
            }
            Err(err) => Err(err),
        }
    }
}

fn is_not_found(err: &melies_error::MeliesError) -> bool {
    matches!(
        err.kind(),
        MeliesErrorKind::Job(job) if matches!(job.kind, melies_error::JobErrorKind::NotFound(_))
    )
}

/// Outcome of an age-based cleanup sweep.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[display("scanned {} objects, deleted {}, {} failed", scanned, deleted, failed)]
pub struct CleanupReport {
    /// Objects examined under the prefix
    pub scanned: usize,
    /// Objects removed
    pub deleted: usize,
    /// Objects that could not be removed
    pub failed: usize,
}

/// Store for published media artifacts.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Copy a local file into the store under `key`, returning its public
    /// URL. `make_public` is recorded with the object's metadata.
    async fn upload(&self, local: &Path, key: &str, make_public: bool) -> MeliesResult<String>;

    /// Remove an object. Absence is not an error.
    async fn delete(&self, key: &str) -> MeliesResult<()>;

    /// Delete objects under `prefix` older than `age`.
    ///
    /// Per-object failures are counted, never fatal.
    async fn cleanup_older_than(&self, prefix: &str, age: Duration)
    -> MeliesResult<CleanupReport>;
}
