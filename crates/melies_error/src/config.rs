//! Configuration error types.

/// Kinds of configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A required key or environment variable is absent
    #[display("Missing required configuration: {}", _0)]
    MissingKey(String),
    /// A configuration file could not be read
    #[display("Failed to read configuration: {}", _0)]
    FileRead(String),
    /// Configuration contents could not be parsed
    #[display("Failed to parse configuration: {}", _0)]
    Parse(String),
    /// A setting carried a value that makes no sense
    #[display("Invalid configuration value for {}: {}", key, message)]
    InvalidValue {
        /// Setting key
        key: String,
        /// What was wrong with it
        message: String,
    },
}

/// Configuration error with source location tracking.
///
/// # Examples
///
/// ```
/// use melies_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::MissingKey("model.voice".to_string()));
/// assert!(format!("{}", err).contains("model.voice"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of error that occurred
    pub kind: ConfigErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
