//! Gemini text generation driver.

use std::env;

use async_trait::async_trait;
use gemini_rust::{Gemini, client::Model};
use melies_core::{TextRequest, TextResponse};
use melies_error::{GeminiError, GeminiErrorKind, MeliesResult};
use melies_interface::TextModelDriver;
use tracing::{debug, instrument};

/// Text generation through the Gemini generateContent API.
///
/// One driver instance is bound to one model. The API key is read from the
/// `GEMINI_API_KEY` environment variable at construction time.
pub struct GeminiTextDriver {
    client: Gemini,
    model_name: String,
}

impl std::fmt::Debug for GeminiTextDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiTextDriver")
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl GeminiTextDriver {
    /// Convert a model name string to a gemini-rust Model enum variant.
    ///
    /// Recognized names map to their enum variants; anything else becomes
    /// `Model::Custom` with the `models/` prefix the API requires.
    fn model_name_to_enum(name: &str) -> Model {
        match name {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other => {
                if other.starts_with("models/") {
                    Model::Custom(other.to_string())
                } else {
                    Model::Custom(format!("models/{}", other))
                }
            }
        }
    }

    /// Create a driver for `model_name`.
    pub fn new(model_name: &str) -> MeliesResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;

        let model_enum = Self::model_name_to_enum(model_name);
        let client = Gemini::with_model(&api_key, model_enum)
            .map_err(|err| GeminiError::new(GeminiErrorKind::ClientCreation(err.to_string())))?;

        Ok(Self {
            client,
            model_name: model_name.to_string(),
        })
    }
}

/// Render an SDK finish reason as the API's wire name.
///
/// The SDK enum is non-exhaustive, so unrecognized variants collapse to
/// `OTHER` rather than failing.
fn finish_reason_name(reason: &gemini_rust::generation::model::FinishReason) -> &'static str {
    use gemini_rust::generation::model::FinishReason;
    match reason {
        FinishReason::Stop => "STOP",
        FinishReason::MaxTokens => "MAX_TOKENS",
        FinishReason::Safety => "SAFETY",
        FinishReason::Recitation => "RECITATION",
        FinishReason::Blocklist => "BLOCKLIST",
        FinishReason::ProhibitedContent => "PROHIBITED_CONTENT",
        FinishReason::Spii => "SPII",
        FinishReason::ImageSafety => "IMAGE_SAFETY",
        FinishReason::MalformedFunctionCall => "MALFORMED_FUNCTION_CALL",
        _ => "OTHER",
    }
}

/// Parse gemini-rust errors to extract HTTP status codes.
///
/// Converts generic API error strings into structured errors with status
/// codes when the message carries one.
fn parse_gemini_error(err: impl std::fmt::Display) -> GeminiError {
    let err_msg = err.to_string();

    if let Some(status_code) = extract_status_code(&err_msg) {
        GeminiError::new(GeminiErrorKind::HttpError {
            status_code,
            message: err_msg,
        })
    } else {
        GeminiError::new(GeminiErrorKind::ApiRequest(err_msg))
    }
}

/// Extract an HTTP status code from strings like
/// "bad response from server; code 503; description: ...".
fn extract_status_code(error_msg: &str) -> Option<u16> {
    let code_start = error_msg.find("code ")?;
    let code_str = &error_msg[code_start + 5..];
    let end = code_str
        .find(|c: char| !c.is_numeric())
        .unwrap_or(code_str.len());
    code_str[..end].parse().ok()
}

#[async_trait]
impl TextModelDriver for GeminiTextDriver {
    #[instrument(skip(self, req), fields(model = %self.model_name))]
    async fn generate(&self, req: &TextRequest) -> MeliesResult<TextResponse> {
        let mut builder = self
            .client
            .generate_content()
            .with_user_message(&req.prompt);

        if let Some(system) = &req.system_prompt {
            builder = builder.with_system_prompt(system);
        }
        if let Some(temperature) = req.temperature {
            builder = builder.with_temperature(temperature);
        }
        if let Some(max_tokens) = req.max_output_tokens {
            builder = builder.with_max_output_tokens(max_tokens as i32);
        }

        let response = builder.execute().await.map_err(parse_gemini_error)?;

        let finish_reason = response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_ref())
            .map(|reason| finish_reason_name(reason).to_string());

        let text = response.text();
        debug!(
            model = %self.model_name,
            chars = text.len(),
            finish_reason = ?finish_reason,
            "text generation returned"
        );

        // Safety filtering surfaces as a present finish reason with absent
        // content; treat that the same as any other empty answer.
        if text.trim().is_empty() {
            return Err(GeminiError::empty_response(finish_reason).into());
        }

        Ok(TextResponse::new(text, finish_reason))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
