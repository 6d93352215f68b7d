//! On-disk staging layout for intermediate artifacts.

use chrono::Utc;
use melies_core::JobId;
use melies_error::{MeliesResult, StorageError, StorageErrorKind};
use std::fs;
use std::path::{Path, PathBuf};

/// Scratch tree where stages write their intermediate files.
///
/// Generated scene code, renders and narration audio land here; only the
/// finished narration WAV and muxed video are published through the media
/// store afterwards.
#[derive(Debug, Clone)]
pub struct MediaLayout {
    root: PathBuf,
}

impl MediaLayout {
    /// A layout rooted at `root`. Directories are created lazily by
    /// [`MediaLayout::ensure`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The staging root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding generated scene code.
    pub fn codes_dir(&self) -> PathBuf {
        self.root.join("codes")
    }

    /// Working directory for renders; silent and muxed videos land here.
    pub fn videos_dir(&self) -> PathBuf {
        self.root.join("videos")
    }

    /// Directory holding synthesized narration.
    pub fn audio_dir(&self) -> PathBuf {
        self.root.join("audio")
    }

    /// Create any missing staging directories.
    pub fn ensure(&self) -> MeliesResult<()> {
        for dir in [self.codes_dir(), self.videos_dir(), self.audio_dir()] {
            fs::create_dir_all(&dir).map_err(|err| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {err}",
                    dir.display()
                )))
            })?;
        }
        Ok(())
    }

    /// Path of a job's generated scene code.
    pub fn scene_file(&self, id: &JobId) -> PathBuf {
        self.codes_dir().join(scene_file_name(id))
    }
}

/// File name for a job's generated scene code.
pub fn scene_file_name(id: &JobId) -> String {
    format!("scene_{id}.py")
}

/// File name for a job's rendered, narration-free video.
pub fn silent_video_name(id: &JobId) -> String {
    format!("silent_{id}.mp4")
}

/// File name for a job's finished video with narration muxed in.
pub fn final_video_name(id: &JobId) -> String {
    format!("final_{id}.mp4")
}

/// Timestamp-derived file name for a narration clip.
///
/// Named by synthesis time rather than job id, so re-running the audio stage
/// never overwrites an earlier clip another job may still reference.
pub fn audio_file_name() -> String {
    format!("audio_{}.wav", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names_carry_the_job_id() {
        let id: JobId = "1712000000000".parse().unwrap();
        assert_eq!(scene_file_name(&id), "scene_1712000000000.py");
        assert_eq!(silent_video_name(&id), "silent_1712000000000.mp4");
        assert_eq!(final_video_name(&id), "final_1712000000000.mp4");
    }

    #[test]
    fn audio_names_are_timestamped_wavs() {
        let name = audio_file_name();
        assert!(name.starts_with("audio_"));
        assert!(name.ends_with(".wav"));
        let stem = &name["audio_".len()..name.len() - ".wav".len()];
        assert!(stem.parse::<i64>().is_ok());
    }

    #[test]
    fn ensure_creates_the_staging_tree() {
        let dir = tempfile::tempdir().unwrap();
        let layout = MediaLayout::new(dir.path().join("staging"));
        layout.ensure().unwrap();
        assert!(layout.codes_dir().is_dir());
        assert!(layout.videos_dir().is_dir());
        assert!(layout.audio_dir().is_dir());
    }

    #[test]
    fn scene_file_lands_under_codes() {
        let layout = MediaLayout::new("staging");
        let id: JobId = "42".parse().unwrap();
        assert_eq!(
            layout.scene_file(&id),
            PathBuf::from("staging/codes/scene_42.py")
        );
    }
}
