//! Trait definitions for model backends.

use async_trait::async_trait;
use melies_core::{SpeechRequest, SpeechResponse, TextRequest, TextResponse};
use melies_error::MeliesResult;

/// Core trait every text generation backend must implement.
///
/// The pipeline depends only on this seam; production code plugs in a
/// Gemini-backed driver while tests plug in scripted doubles.
#[async_trait]
pub trait TextModelDriver: Send + Sync {
    /// Generate model output for a text request.
    async fn generate(&self, req: &TextRequest) -> MeliesResult<TextResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-2.5-flash").
    fn model_name(&self) -> &str;
}

/// Trait for speech synthesis backends.
#[async_trait]
pub trait SpeechModelDriver: Send + Sync {
    /// Synthesize narration for the request, returning raw PCM samples.
    async fn synthesize(&self, req: &SpeechRequest) -> MeliesResult<SpeechResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-2.5-flash-preview-tts").
    fn model_name(&self) -> &str;
}
