//! Gemini speech synthesis driver.

use std::env;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use melies_core::{SpeechRequest, SpeechResponse, wav};
use melies_error::{GeminiError, GeminiErrorKind, MeliesResult};
use melies_interface::SpeechModelDriver;
use regex::Regex;
use tracing::{debug, instrument};

use super::dto;

const GENERATE_CONTENT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// MIME prefix of the raw PCM payload the speech models return.
const AUDIO_MIME_PREFIX: &str = "audio/L16";

/// Sample rate assumed when the MIME type does not state one.
const DEFAULT_SAMPLE_RATE: u32 = 24000;

/// Speech synthesis through the Gemini generateContent REST endpoint.
///
/// The speech models answer with base64 raw PCM inside an inline data part.
/// The key is read from `GEMINI_API_KEY_TTS`, falling back to
/// `GEMINI_API_KEY` when no dedicated speech key is configured.
pub struct GeminiSpeechDriver {
    http: reqwest::Client,
    api_key: String,
    model_name: String,
    rate_pattern: Regex,
}

impl std::fmt::Debug for GeminiSpeechDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSpeechDriver")
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl GeminiSpeechDriver {
    /// Create a driver for `model_name`.
    pub fn new(model_name: &str) -> MeliesResult<Self> {
        let api_key = env::var("GEMINI_API_KEY_TTS")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            model_name: model_name.to_string(),
            rate_pattern: Regex::new(r"rate=(\d+)").expect("Valid rate regex"),
        })
    }

    /// Read the sample rate out of a MIME type such as
    /// `audio/L16;codec=pcm;rate=24000`.
    fn rate_from_mime(&self, mime_type: &str) -> u32 {
        self.rate_pattern
            .captures(mime_type)
            .and_then(|captures| captures.get(1))
            .and_then(|rate| rate.as_str().parse().ok())
            .unwrap_or(DEFAULT_SAMPLE_RATE)
    }
}

#[async_trait]
impl SpeechModelDriver for GeminiSpeechDriver {
    #[instrument(skip(self, req), fields(model = %self.model_name))]
    async fn synthesize(&self, req: &SpeechRequest) -> MeliesResult<SpeechResponse> {
        let url = format!("{GENERATE_CONTENT_BASE}/{}:generateContent", self.model_name);
        let body = dto::SpeechGenerationRequest::new(&req.text, &req.voice);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| GeminiError::new(GeminiErrorKind::ApiRequest(err.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            })
            .into());
        }

        let parsed: dto::SpeechGenerationResponse = response
            .json()
            .await
            .map_err(|err| GeminiError::new(GeminiErrorKind::ApiRequest(err.to_string())))?;

        let finish_reason = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.clone());

        let Some(inline) = parsed.into_inline_data() else {
            let detail = finish_reason
                .map(|reason| format!("no inline audio part (finish reason: {reason})"))
                .unwrap_or_else(|| "no inline audio part".to_string());
            return Err(GeminiError::new(GeminiErrorKind::MissingAudioData(detail)).into());
        };

        if !inline.mime_type.starts_with(AUDIO_MIME_PREFIX) {
            return Err(GeminiError::new(GeminiErrorKind::MissingAudioData(format!(
                "unexpected mime type {}",
                inline.mime_type
            )))
            .into());
        }

        let sample_rate = self.rate_from_mime(&inline.mime_type);
        let bytes = STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|err| GeminiError::new(GeminiErrorKind::Base64Decode(err.to_string())))?;
        let pcm = wav::pcm_from_le_bytes(&bytes);

        debug!(
            model = %self.model_name,
            sample_rate,
            samples = pcm.len(),
            "speech synthesis returned"
        );

        Ok(SpeechResponse::new(pcm, sample_rate))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
