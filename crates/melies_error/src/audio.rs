//! Audio codec error types.

/// Kinds of audio codec errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AudioErrorKind {
    /// The byte slice is shorter than a WAV header
    #[display("WAV data too short: {} bytes, header needs 44", _0)]
    HeaderTooShort(usize),
    /// A header magic did not match
    #[display("Bad WAV magic: expected {}", _0)]
    BadMagic(&'static str),
    /// Audio format other than integer PCM
    #[display("Unsupported WAV audio format: {}", _0)]
    UnsupportedFormat(u16),
    /// Channel count other than mono
    #[display("Unsupported channel count: {}", _0)]
    UnsupportedChannels(u16),
    /// Bit depth other than 16
    #[display("Unsupported bit depth: {}", _0)]
    UnsupportedBitDepth(u16),
    /// Declared data size disagrees with the actual payload
    #[display("WAV data size mismatch: header says {}, payload is {}", declared, actual)]
    DataSizeMismatch {
        /// Size recorded in the header
        declared: u32,
        /// Bytes actually present after the header
        actual: usize,
    },
}

/// Audio codec error with source location tracking.
///
/// # Examples
///
/// ```
/// use melies_error::{AudioError, AudioErrorKind};
///
/// let err = AudioError::new(AudioErrorKind::HeaderTooShort(10));
/// assert!(format!("{}", err).contains("too short"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Audio Error: {} at line {} in {}", kind, line, file)]
pub struct AudioError {
    /// The kind of error that occurred
    pub kind: AudioErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AudioError {
    /// Create a new AudioError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AudioErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
