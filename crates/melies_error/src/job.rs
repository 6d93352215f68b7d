//! Job record error types.

/// Kinds of job record errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum JobErrorKind {
    /// No job exists with the given identifier
    #[display("Job not found: {}", _0)]
    NotFound(String),
    /// A job with the given identifier already exists
    #[display("Job already exists: {}", _0)]
    AlreadyExists(String),
    /// The requested status change would move the job backwards
    #[display("Invalid status transition: {} -> {}", from, to)]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },
    /// The job is failed and accepts no further work
    #[display("Job {} has failed and is terminal", _0)]
    Terminal(String),
    /// A job identifier could not be parsed
    #[display("Invalid job id: {}", _0)]
    InvalidId(String),
    /// The persisted record could not be serialized or deserialized
    #[display("Job serialization failed: {}", _0)]
    Serialization(String),
}

/// Job error with source location tracking.
///
/// # Examples
///
/// ```
/// use melies_error::{JobError, JobErrorKind};
///
/// let err = JobError::new(JobErrorKind::InvalidTransition {
///     from: "completed".to_string(),
///     to: "refining".to_string(),
/// });
/// assert!(format!("{}", err).contains("completed -> refining"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Job Error: {} at line {} in {}", kind, line, file)]
pub struct JobError {
    /// The kind of error that occurred
    pub kind: JobErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl JobError {
    /// Create a new JobError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: JobErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
