//! Filesystem-backed media store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use melies_error::{MeliesResult, StorageError, StorageErrorKind};
use melies_interface::{CleanupReport, MediaStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

/// Suffix of the per-object metadata sidecar.
const META_SUFFIX: &str = ".meta.json";

/// Metadata recorded next to each stored object.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ObjectMeta {
    content_type: String,
    created_at: DateTime<Utc>,
    public: bool,
    size: u64,
}

/// Media store writing objects into a directory tree served over HTTP.
///
/// Each object `key` maps to `<root>/<key>` plus a `<key>.meta.json`
/// sidecar holding the content type, creation time and visibility flag.
/// Public URLs are `<public_base_url>/<key>`.
#[derive(Debug, Clone)]
pub struct FileSystemMediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl FileSystemMediaStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> MeliesResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|err| StorageError::new(StorageErrorKind::DirectoryCreation(err.to_string())))?;
        Ok(Self {
            root,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Resolve `key` inside the store, refusing traversal attempts.
    fn object_path(&self, key: &str) -> MeliesResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('/')
            && !key.contains('\\')
            && key
                .split('/')
                .all(|part| !part.is_empty() && part != "." && part != "..");
        if !valid {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(key.to_string())).into());
        }
        Ok(self.root.join(key))
    }

    fn meta_path(object: &Path) -> PathBuf {
        let mut name = object.as_os_str().to_os_string();
        name.push(META_SUFFIX);
        PathBuf::from(name)
    }

    /// When the sidecar is missing or unreadable, fall back to the
    /// filesystem's modification time; an object with neither is treated
    /// as fresh so a sweep never deletes something it cannot date.
    fn object_birth(object: &Path) -> SystemTime {
        let from_sidecar = fs::read_to_string(Self::meta_path(object))
            .ok()
            .and_then(|json| serde_json::from_str::<ObjectMeta>(&json).ok())
            .map(|meta| SystemTime::from(meta.created_at));
        from_sidecar
            .or_else(|| fs::metadata(object).and_then(|m| m.modified()).ok())
            .unwrap_or_else(SystemTime::now)
    }
}

#[async_trait]
impl MediaStore for FileSystemMediaStore {
    #[instrument(skip(self, local))]
    async fn upload(&self, local: &Path, key: &str, make_public: bool) -> MeliesResult<String> {
        let dest = self.object_path(key)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                StorageError::new(StorageErrorKind::DirectoryCreation(err.to_string()))
            })?;
        }

        let size = fs::copy(local, &dest).map_err(|err| {
            StorageError::new(StorageErrorKind::Upload {
                key: key.to_string(),
                message: err.to_string(),
            })
        })?;

        let meta = ObjectMeta {
            content_type: mime_guess::from_path(&dest)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            created_at: Utc::now(),
            public: make_public,
            size,
        };
        let json = serde_json::to_string_pretty(&meta).map_err(|err| {
            StorageError::new(StorageErrorKind::Metadata {
                key: key.to_string(),
                message: err.to_string(),
            })
        })?;
        fs::write(Self::meta_path(&dest), json).map_err(|err| {
            StorageError::new(StorageErrorKind::Metadata {
                key: key.to_string(),
                message: err.to_string(),
            })
        })?;

        let url = format!("{}/{}", self.public_base_url, key);
        info!(key = %key, bytes = size, url = %url, "media object stored");
        Ok(url)
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> MeliesResult<()> {
        let dest = self.object_path(key)?;
        match fs::remove_file(&dest) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                return Err(StorageError::new(StorageErrorKind::Upload {
                    key: key.to_string(),
                    message: err.to_string(),
                })
                .into());
            }
        }
        // Sidecar removal is best-effort.
        let _ = fs::remove_file(Self::meta_path(&dest));
        debug!(key = %key, "media object deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn cleanup_older_than(
        &self,
        prefix: &str,
        age: Duration,
    ) -> MeliesResult<CleanupReport> {
        let sweep_root = self.object_path(prefix)?;
        let Some(cutoff) = SystemTime::now().checked_sub(age) else {
            return Ok(CleanupReport::default());
        };

        let mut report = CleanupReport::default();
        for entry in WalkDir::new(&sweep_root)
            .into_iter()
            .filter_map(|entry| entry.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().ends_with(META_SUFFIX) {
                continue;
            }
            report.scanned += 1;

            let object = entry.path();
            if Self::object_birth(object) >= cutoff {
                continue;
            }

            match fs::remove_file(object) {
                Ok(()) => {
                    let _ = fs::remove_file(Self::meta_path(object));
                    report.deleted += 1;
                }
                Err(err) => {
                    warn!(path = %object.display(), error = %err, "cleanup could not delete object");
                    report.failed += 1;
                }
            }
        }

        info!(prefix = %prefix, %report, "cleanup sweep finished");
        Ok(report)
    }
}
