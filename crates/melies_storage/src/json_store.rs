//! File-per-record job store.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use melies_core::{Job, JobId};
use melies_error::{JobError, JobErrorKind, MeliesResult, StorageError, StorageErrorKind};
use melies_interface::JobStore;
use tracing::{debug, instrument};

/// Job store keeping one pretty-printed JSON file per record.
///
/// Records are written to a temporary file in the store directory and
/// renamed into place, so a crash mid-write never leaves a half-written
/// record behind.
#[derive(Debug, Clone)]
pub struct JsonJobStore {
    root: PathBuf,
}

impl JsonJobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> MeliesResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|err| StorageError::new(StorageErrorKind::DirectoryCreation(err.to_string())))?;
        Ok(Self { root })
    }

    /// Resolve the record path for `id`, refusing ids that would escape the
    /// store directory.
    fn job_path(&self, id: &JobId) -> MeliesResult<PathBuf> {
        let raw = id.as_str();
        if raw.contains('/') || raw.contains('\\') || raw == "." || raw == ".." {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(raw.to_string())).into());
        }
        Ok(self.root.join(format!("{raw}.json")))
    }

    fn write_record(&self, path: &PathBuf, job: &Job) -> MeliesResult<()> {
        let json = serde_json::to_string_pretty(job)
            .map_err(|err| JobError::new(JobErrorKind::Serialization(err.to_string())))?;

        let mut file = tempfile::Builder::new()
            .prefix(".job-")
            .suffix(".tmp")
            .tempfile_in(&self.root)
            .map_err(|err| StorageError::new(StorageErrorKind::FileWrite(err.to_string())))?;
        file.write_all(json.as_bytes())
            .map_err(|err| StorageError::new(StorageErrorKind::FileWrite(err.to_string())))?;
        file.persist(path)
            .map_err(|err| StorageError::new(StorageErrorKind::FileWrite(err.error.to_string())))?;

        debug!(path = %path.display(), "job record written");
        Ok(())
    }
}

#[async_trait]
impl JobStore for JsonJobStore {
    #[instrument(skip(self, job), fields(job = %job.id()))]
    async fn create(&self, job: &Job) -> MeliesResult<()> {
        let path = self.job_path(job.id())?;
        if path.exists() {
            return Err(JobError::new(JobErrorKind::AlreadyExists(job.id().to_string())).into());
        }
        self.write_record(&path, job)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &JobId) -> MeliesResult<Job> {
        let path = self.job_path(id)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(JobError::new(JobErrorKind::NotFound(id.to_string())).into());
            }
            Err(err) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(err.to_string())).into());
            }
        };
        let job = serde_json::from_str(&json)
            .map_err(|err| JobError::new(JobErrorKind::Serialization(err.to_string())))?;
        Ok(job)
    }

    #[instrument(skip(self, job), fields(job = %job.id()))]
    async fn update(&self, job: &Job) -> MeliesResult<()> {
        let path = self.job_path(job.id())?;
        if !path.exists() {
            return Err(JobError::new(JobErrorKind::NotFound(job.id().to_string())).into());
        }
        self.write_record(&path, job)
    }
}
