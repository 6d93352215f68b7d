//! Google Gemini driver implementations.
//!
//! Two drivers live here:
//! - [`GeminiTextDriver`] wraps the `gemini-rust` SDK for text generation
//! - [`GeminiSpeechDriver`] calls the speech-capable generateContent REST
//!   endpoint directly, since the SDK does not expose audio modalities

mod dto;
mod speech;
mod text;

pub use speech::GeminiSpeechDriver;
pub use text::GeminiTextDriver;
