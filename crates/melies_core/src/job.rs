//! Job records and the status state machine.

use chrono::{DateTime, Utc};
use melies_error::{JobError, JobErrorKind, MeliesResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier for a pipeline job.
///
/// Minted identifiers are the current UNIX time in milliseconds rendered in
/// decimal, which keeps per-job artifact names (`scene_<id>.py`,
/// `silent_<id>.mp4`, `final_<id>.mp4`) collision-free across jobs. Clients
/// may also supply their own identifiers; any non-empty string round-trips.
///
/// # Examples
///
/// ```
/// use melies_core::JobId;
///
/// let id: JobId = "1712000000000".parse()?;
/// assert_eq!(id.as_str(), "1712000000000");
///
/// assert!("   ".parse::<JobId>().is_err());
/// # Ok::<(), melies_error::JobError>(())
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Mint a fresh timestamp-derived identifier.
    pub fn mint() -> Self {
        Self(Utc::now().timestamp_millis().to_string())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for JobId {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(JobError::new(JobErrorKind::InvalidId(
                "identifier is empty".to_string(),
            )));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Progress states for a job.
///
/// Progress is forward-only: `created < refining < script_generating <
/// video_generating < completed`, and `failed` is terminal. Re-entering the
/// *same* in-flight state is permitted so a stage may be re-invoked on its
/// own job.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job record exists, no stage has run
    #[display("created")]
    Created,
    /// Prompt refinement in progress
    #[display("refining")]
    Refining,
    /// Script generation in progress
    #[display("script_generating")]
    ScriptGenerating,
    /// Render, mux and publish in progress
    #[display("video_generating")]
    VideoGenerating,
    /// Final video published
    #[display("completed")]
    Completed,
    /// A stage failed; the job accepts no further work
    #[display("failed")]
    Failed,
}

impl JobStatus {
    fn rank(self) -> u8 {
        match self {
            JobStatus::Created => 0,
            JobStatus::Refining => 1,
            JobStatus::ScriptGenerating => 2,
            JobStatus::VideoGenerating => 3,
            JobStatus::Completed => 4,
            JobStatus::Failed => u8::MAX,
        }
    }

    /// True for the three stage-in-progress states.
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            JobStatus::Refining | JobStatus::ScriptGenerating | JobStatus::VideoGenerating
        )
    }

    /// True when no further transitions are accepted.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Failed)
    }

    /// Whether `advance` would accept the move from `self` to `next`.
    ///
    /// Failing a job goes through [`Job::fail`], never through `advance`, so
    /// `Failed` is rejected on both sides here.
    pub fn can_advance_to(self, next: JobStatus) -> bool {
        if self == JobStatus::Failed || next == JobStatus::Failed {
            return false;
        }
        if self == next {
            return self.is_in_flight();
        }
        next.rank() > self.rank()
    }
}

/// The persisted record of one video generation job.
///
/// Text fields (`raw_prompt`, `refined_prompt`, `script`) may be overwritten
/// by stage re-runs. Artifact reference fields hold a local path or a
/// published URL and are write-once: the first recorded reference wins and
/// later writes are ignored. Every mutation bumps `updated_at`.
///
/// # Examples
///
/// ```
/// use melies_core::{Job, JobId, JobStatus};
///
/// let mut job = Job::new(JobId::mint(), "Explain entropy");
/// job.advance(JobStatus::Refining)?;
/// job.advance(JobStatus::ScriptGenerating)?;
///
/// // Regression is refused.
/// assert!(job.advance(JobStatus::Refining).is_err());
/// # Ok::<(), melies_error::MeliesError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Job {
    /// Unique job identifier
    id: JobId,
    /// The user's original topic prompt
    raw_prompt: String,
    /// Refined prompt, empty until the refine stage completes
    #[serde(default)]
    refined_prompt: String,
    /// Generated script, empty until the script stage completes
    #[serde(default)]
    script: String,
    /// Local path of the narration WAV
    #[serde(default)]
    audio_path: Option<String>,
    /// Published URL of the final muxed video
    #[serde(default)]
    video_path: Option<String>,
    /// Local path of the sanitized animation source
    #[serde(default)]
    code_path: Option<String>,
    /// Current progress state
    status: JobStatus,
    /// Failure description, present exactly when status is `failed`
    #[serde(default)]
    error_message: Option<String>,
    /// Record creation time
    created_at: DateTime<Utc>,
    /// Last mutation time
    updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a fresh record in the `Created` state.
    pub fn new(id: JobId, raw_prompt: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            raw_prompt: raw_prompt.into(),
            refined_prompt: String::new(),
            script: String::new(),
            audio_path: None,
            video_path: None,
            code_path: None,
            status: JobStatus::Created,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Move the state machine forward.
    ///
    /// Refuses regressions, any transition out of `Failed`, and transitions
    /// *into* `Failed` (those go through [`Job::fail`]). Re-entering the
    /// current in-flight state is accepted.
    pub fn advance(&mut self, next: JobStatus) -> MeliesResult<()> {
        if self.status == JobStatus::Failed {
            return Err(JobError::new(JobErrorKind::Terminal(self.id.to_string())).into());
        }
        if !self.status.can_advance_to(next) {
            return Err(JobError::new(JobErrorKind::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            })
            .into());
        }
        self.status = next;
        self.touch();
        Ok(())
    }

    /// Mark the job failed with a description of what went wrong.
    ///
    /// A failed job is terminal: failing it a second time is an error, as is
    /// any later `advance`.
    pub fn fail(&mut self, message: impl Into<String>) -> MeliesResult<()> {
        if self.status == JobStatus::Failed {
            return Err(JobError::new(JobErrorKind::Terminal(self.id.to_string())).into());
        }
        self.status = JobStatus::Failed;
        self.error_message = Some(message.into());
        self.touch();
        Ok(())
    }

    /// Record the topic prompt. Re-runs overwrite.
    pub fn set_raw_prompt(&mut self, raw: String) {
        self.raw_prompt = raw;
        self.touch();
    }

    /// Record the refined prompt. Re-runs overwrite.
    pub fn set_refined_prompt(&mut self, refined: String) {
        self.refined_prompt = refined;
        self.touch();
    }

    /// Record the generated script. Re-runs overwrite.
    pub fn set_script(&mut self, script: String) {
        self.script = script;
        self.touch();
    }

    /// Record the narration WAV path. Write-once; later writes are ignored.
    pub fn set_audio_path(&mut self, path: impl Into<String>) {
        if self.audio_path.is_none() {
            self.audio_path = Some(path.into());
            self.touch();
        }
    }

    /// Record the published video URL. Write-once; later writes are ignored.
    pub fn set_video_path(&mut self, path: impl Into<String>) {
        if self.video_path.is_none() {
            self.video_path = Some(path.into());
            self.touch();
        }
    }

    /// Record the animation source path. Write-once; later writes are ignored.
    pub fn set_code_path(&mut self, path: impl Into<String>) {
        if self.code_path.is_none() {
            self.code_path = Some(path.into());
            self.touch();
        }
    }
}
