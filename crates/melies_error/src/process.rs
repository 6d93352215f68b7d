//! Subprocess execution error types.

/// Kinds of subprocess failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ProcessErrorKind {
    /// The command string contained no tokens
    #[display("Command is empty")]
    EmptyCommand,
    /// The child process could not be spawned
    #[display("Failed to spawn '{}': {}", program, message)]
    Spawn {
        /// Program that failed to start
        program: String,
        /// OS error description
        message: String,
    },
    /// The child exited with a non-zero status
    #[display(
        "'{}' exited with status {}\nstdout: {}\nstderr: {}",
        program,
        code.map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string()),
        stdout,
        stderr
    )]
    NonZeroExit {
        /// Program that failed
        program: String,
        /// Exit code, absent when killed by a signal
        code: Option<i32>,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },
    /// The child did not finish within the configured timeout
    #[display("'{}' timed out after {}s", program, seconds)]
    TimedOut {
        /// Program that was killed
        program: String,
        /// Configured timeout in seconds
        seconds: u64,
    },
    /// Waiting on the child or collecting its output failed
    #[display("Failed to collect output of '{}': {}", program, message)]
    OutputCapture {
        /// Program being waited on
        program: String,
        /// OS error description
        message: String,
    },
}

/// Subprocess error with source location tracking.
///
/// # Examples
///
/// ```
/// use melies_error::{ProcessError, ProcessErrorKind};
///
/// let err = ProcessError::new(ProcessErrorKind::EmptyCommand);
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Process Error: {} at line {} in {}", kind, line, file)]
pub struct ProcessError {
    /// The kind of error that occurred
    pub kind: ProcessErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProcessError {
    /// Create a new ProcessError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProcessErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
