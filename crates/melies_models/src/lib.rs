//! Model drivers for text generation and speech synthesis.
//!
//! The pipeline talks to models through the driver traits in
//! `melies_interface`; this crate supplies the Gemini-backed
//! implementations plus scripted doubles for tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod gemini;
pub mod mock;

pub use gemini::{GeminiSpeechDriver, GeminiTextDriver};
pub use mock::{MockSpeechDriver, MockTextDriver};
