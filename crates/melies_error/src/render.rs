//! Rendering error types.

/// Kinds of rendering failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RenderErrorKind {
    /// The model produced no usable animation code
    #[display("Generated animation code was empty after sanitizing")]
    EmptyCode,
    /// Failed to persist generated code to disk
    #[display("Failed to write animation code to {}: {}", path, message)]
    CodeWrite {
        /// Destination path
        path: String,
        /// OS error description
        message: String,
    },
    /// The renderer finished but its output file was nowhere to be found
    #[display("Renderer output '{}' not found under {}", file_name, search_root)]
    OutputNotFound {
        /// Expected output file name
        file_name: String,
        /// Directory tree that was searched
        search_root: String,
    },
}

/// Rendering error with source location tracking.
///
/// # Examples
///
/// ```
/// use melies_error::{RenderError, RenderErrorKind};
///
/// let err = RenderError::new(RenderErrorKind::OutputNotFound {
///     file_name: "silent_1712000000000.mp4".to_string(),
///     search_root: "media/videos".to_string(),
/// });
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Render Error: {} at line {} in {}", kind, line, file)]
pub struct RenderError {
    /// The kind of error that occurred
    pub kind: RenderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RenderError {
    /// Create a new RenderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RenderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
