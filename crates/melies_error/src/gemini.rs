//! Gemini-specific error types.

/// Gemini-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// API key not found in environment
    #[display("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,
    /// Failed to create Gemini client
    #[display("Failed to create Gemini client: {}", _0)]
    ClientCreation(String),
    /// API request failed
    #[display("Gemini API request failed: {}", _0)]
    ApiRequest(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// The model returned no usable content
    #[display("Model response was empty or blocked (finish reason: {})", finish_reason)]
    EmptyResponse {
        /// Finish reason reported by the model, or UNKNOWN
        finish_reason: String,
    },
    /// Base64 decoding failed
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
    /// Speech response was missing the expected audio payload
    #[display("Speech response missing audio data: {}", _0)]
    MissingAudioData(String),
}

/// Gemini error with source location tracking.
///
/// # Examples
///
/// ```
/// use melies_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The kind of error that occurred
    pub kind: GeminiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new GeminiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create an empty-response error, substituting `UNKNOWN` when the model
    /// reported no finish reason.
    #[track_caller]
    pub fn empty_response(finish_reason: Option<String>) -> Self {
        Self::new(GeminiErrorKind::EmptyResponse {
            finish_reason: finish_reason.unwrap_or_else(|| "UNKNOWN".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_response_defaults_to_unknown() {
        let err = GeminiError::empty_response(None);
        assert!(format!("{}", err).contains("UNKNOWN"));

        let err = GeminiError::empty_response(Some("SAFETY".to_string()));
        assert!(format!("{}", err).contains("SAFETY"));
    }
}
