//! In-memory job store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use melies_core::{Job, JobId};
use melies_error::{JobError, JobErrorKind, MeliesResult};
use melies_interface::JobStore;

/// Job store backed by a process-local map. Nothing survives a restart;
/// intended for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    records: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, job: &Job) -> MeliesResult<()> {
        let mut records = self.records.write().unwrap();
        if records.contains_key(job.id()) {
            return Err(JobError::new(JobErrorKind::AlreadyExists(job.id().to_string())).into());
        }
        records.insert(job.id().clone(), job.clone());
        Ok(())
    }

    async fn get(&self, id: &JobId) -> MeliesResult<Job> {
        self.records
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| JobError::new(JobErrorKind::NotFound(id.to_string())).into())
    }

    async fn update(&self, job: &Job) -> MeliesResult<()> {
        let mut records = self.records.write().unwrap();
        if !records.contains_key(job.id()) {
            return Err(JobError::new(JobErrorKind::NotFound(job.id().to_string())).into());
        }
        records.insert(job.id().clone(), job.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use melies_core::JobStatus;
    use melies_error::MeliesErrorKind;

    #[tokio::test]
    async fn create_get_update_cycle() {
        let store = InMemoryJobStore::new();
        let mut job = Job::new("1".parse().unwrap(), "topic");

        store.create(&job).await.unwrap();
        job.advance(JobStatus::Refining).unwrap();
        store.update(&job).await.unwrap();

        let loaded = store.get(job.id()).await.unwrap();
        assert_eq!(*loaded.status(), JobStatus::Refining);
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let store = InMemoryJobStore::new();
        let err = store.get(&"404".parse().unwrap()).await.unwrap_err();
        assert!(matches!(
            err.kind(),
            MeliesErrorKind::Job(job) if matches!(job.kind, JobErrorKind::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_create_is_refused() {
        let store = InMemoryJobStore::new();
        let job = Job::new("2".parse().unwrap(), "topic");
        store.create(&job).await.unwrap();
        assert!(store.create(&job).await.is_err());
    }

    #[tokio::test]
    async fn get_or_create_inserts_fresh_records() {
        let store = InMemoryJobStore::new();
        let id: JobId = "3".parse().unwrap();

        let job = store.get_or_create(&id, "topic").await.unwrap();
        assert_eq!(job.raw_prompt(), "topic");
        assert!(store.get(&id).await.is_ok());
    }
}
