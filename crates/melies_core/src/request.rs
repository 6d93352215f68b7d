//! Request and response types exchanged with model drivers.

use serde::{Deserialize, Serialize};

/// A text generation request.
///
/// # Examples
///
/// ```
/// use melies_core::TextRequest;
///
/// let request = TextRequest::builder()
///     .prompt("Explain the water cycle")
///     .system_prompt("You are a scriptwriter")
///     .temperature(0.7f32)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.prompt, "Explain the water cycle");
/// assert_eq!(request.max_output_tokens, None);
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Default, derive_builder::Builder,
)]
#[builder(setter(into, strip_option))]
pub struct TextRequest {
    /// The user prompt
    pub prompt: String,
    /// Optional system prompt steering the model
    #[builder(default)]
    pub system_prompt: Option<String>,
    /// Sampling temperature (0.0 to 1.0)
    #[builder(default)]
    pub temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[builder(default)]
    pub max_output_tokens: Option<u32>,
}

impl TextRequest {
    /// Start building a request.
    pub fn builder() -> TextRequestBuilder {
        TextRequestBuilder::default()
    }
}

/// A text generation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_new::new)]
pub struct TextResponse {
    /// The generated text
    pub text: String,
    /// Finish reason reported by the model, when it reported one
    pub finish_reason: Option<String>,
}

/// A speech synthesis request.
///
/// # Examples
///
/// ```
/// use melies_core::SpeechRequest;
///
/// let request = SpeechRequest::new("Hello and welcome!", "Kore");
/// assert_eq!(request.voice, "Kore");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    /// Text to narrate
    pub text: String,
    /// Prebuilt voice name
    pub voice: String,
}

impl SpeechRequest {
    /// Create a request for the given text and voice.
    pub fn new(text: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
        }
    }
}

/// A speech synthesis response: raw mono PCM samples.
#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct SpeechResponse {
    /// Little-endian 16-bit samples
    pub pcm: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}
