//! Scripted driver doubles.
//!
//! These stand in for the Gemini drivers in tests: responses are queued up
//! front and handed back in order, and every received request is recorded
//! for assertions. No network is involved.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use melies_core::{SpeechRequest, SpeechResponse, TextRequest, TextResponse};
use melies_error::{GeminiError, GeminiErrorKind, MeliesError, MeliesResult};
use melies_interface::{SpeechModelDriver, TextModelDriver};

/// Text driver that replays a scripted queue of responses.
///
/// When the queue runs dry, `generate` returns an error rather than
/// fabricating content, so a test that makes more calls than it scripted
/// fails loudly.
#[derive(Debug, Default)]
pub struct MockTextDriver {
    responses: Mutex<VecDeque<MeliesResult<TextResponse>>>,
    requests: Mutex<Vec<TextRequest>>,
}

impl MockTextDriver {
    /// Create a driver with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver scripted to answer with `texts` in order.
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let driver = Self::new();
        for text in texts {
            driver.push_text(text);
        }
        driver
    }

    /// Queue a successful response.
    pub fn push_text(&self, text: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(TextResponse::new(text.into(), None)));
    }

    /// Queue a failure.
    pub fn push_error(&self, err: MeliesError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<TextRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextModelDriver for MockTextDriver {
    async fn generate(&self, req: &TextRequest) -> MeliesResult<TextResponse> {
        self.requests.lock().unwrap().push(req.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(GeminiError::new(GeminiErrorKind::ApiRequest(
                    "mock text script exhausted".to_string(),
                ))
                .into())
            })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "scripted-text"
    }
}

/// Speech driver that replays a scripted queue of responses.
///
/// Unlike [`MockTextDriver`], an empty queue yields a short burst of
/// silence at 24 kHz: most tests only care that *some* audio flows through
/// the pipeline, not what it contains.
#[derive(Debug, Default)]
pub struct MockSpeechDriver {
    responses: Mutex<VecDeque<MeliesResult<SpeechResponse>>>,
    requests: Mutex<Vec<SpeechRequest>>,
}

impl MockSpeechDriver {
    /// Create a driver that answers every call with canned silence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn push_response(&self, response: SpeechResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a failure.
    pub fn push_error(&self, err: MeliesError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// A tenth of a second of silence at the default sample rate.
    fn canned_silence() -> SpeechResponse {
        SpeechResponse::new(vec![0; 2400], 24000)
    }
}

#[async_trait]
impl SpeechModelDriver for MockSpeechDriver {
    async fn synthesize(&self, req: &SpeechRequest) -> MeliesResult<SpeechResponse> {
        self.requests.lock().unwrap().push(req.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Self::canned_silence()))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "scripted-speech"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn text_mock_replays_in_order_and_records_requests() {
        let driver = MockTextDriver::with_texts(["first", "second"]);

        let request = TextRequest::builder().prompt("p1").build().unwrap();
        assert_eq!(driver.generate(&request).await.unwrap().text, "first");

        let request = TextRequest::builder().prompt("p2").build().unwrap();
        assert_eq!(driver.generate(&request).await.unwrap().text, "second");

        let seen = driver.requests();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].prompt, "p1");
        assert_eq!(seen[1].prompt, "p2");
    }

    #[tokio::test]
    async fn text_mock_fails_when_exhausted() {
        let driver = MockTextDriver::new();
        let request = TextRequest::builder().prompt("p").build().unwrap();
        let err = driver.generate(&request).await.unwrap_err();
        assert!(format!("{err}").contains("exhausted"));
    }

    #[tokio::test]
    async fn text_mock_replays_scripted_errors() {
        let driver = MockTextDriver::new();
        driver.push_error(GeminiError::empty_response(Some("SAFETY".to_string())).into());

        let request = TextRequest::builder().prompt("p").build().unwrap();
        let err = driver.generate(&request).await.unwrap_err();
        assert!(format!("{err}").contains("SAFETY"));
    }

    #[tokio::test]
    async fn speech_mock_defaults_to_silence() {
        let driver = MockSpeechDriver::new();
        let response = driver
            .synthesize(&SpeechRequest::new("hello", "Kore"))
            .await
            .unwrap();
        assert_eq!(response.sample_rate, 24000);
        assert!(!response.pcm.is_empty());
        assert_eq!(driver.requests()[0].voice, "Kore");
    }

    #[tokio::test]
    async fn speech_mock_prefers_scripted_responses() {
        let driver = MockSpeechDriver::new();
        driver.push_response(SpeechResponse::new(vec![7, 8, 9], 16000));

        let response = driver
            .synthesize(&SpeechRequest::new("hello", "Kore"))
            .await
            .unwrap();
        assert_eq!(response.pcm, vec![7, 8, 9]);
        assert_eq!(response.sample_rate, 16000);
    }
}
