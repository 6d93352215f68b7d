//! Top-level error wrapper types.

use crate::{
    AudioError, BuilderError, ConfigError, GeminiError, JobError, ProcessError, RenderError,
    ServerError, StorageError,
};

/// Union of every error domain in the workspace.
///
/// # Examples
///
/// ```
/// use melies_error::{MeliesError, ServerError};
///
/// let server_err = ServerError::new("Connection refused");
/// let err: MeliesError = server_err.into();
/// assert!(format!("{}", err).contains("Server Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MeliesErrorKind {
    /// Gemini model error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Subprocess execution error
    #[from(ProcessError)]
    Process(ProcessError),
    /// Rendering error
    #[from(RenderError)]
    Render(RenderError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Job record error
    #[from(JobError)]
    Job(JobError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Audio codec error
    #[from(AudioError)]
    Audio(AudioError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// HTTP server error
    #[from(ServerError)]
    Server(ServerError),
}

/// Melies error with kind discrimination.
///
/// # Examples
///
/// ```
/// use melies_error::{MeliesResult, ConfigError, ConfigErrorKind};
///
/// fn might_fail() -> MeliesResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::MissingKey("voice".to_string())))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Melies Error: {}", _0)]
pub struct MeliesError(Box<MeliesErrorKind>);

impl MeliesError {
    /// Create a new error from a kind.
    pub fn new(kind: MeliesErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MeliesErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to MeliesErrorKind
impl<T> From<T> for MeliesError
where
    T: Into<MeliesErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Melies operations.
///
/// # Examples
///
/// ```
/// use melies_error::{MeliesResult, ServerError};
///
/// fn serve() -> MeliesResult<String> {
///     Err(ServerError::new("Address in use"))?
/// }
/// ```
pub type MeliesResult<T> = std::result::Result<T, MeliesError>;
