//! Speech generateContent REST data transfer objects.
//!
//! The speech-capable models are reached through the plain generateContent
//! endpoint with an `AUDIO` response modality; the SDK has no builder for
//! that, so the request and response shapes are declared here directly.

use serde::{Deserialize, Serialize};

/// Request body for a speech generateContent call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpeechGenerationRequest {
    pub(crate) contents: Vec<RequestContent>,
    pub(crate) generation_config: SpeechGenerationConfig,
}

impl SpeechGenerationRequest {
    /// Build the fixed-shape request for one narration text and voice.
    pub(crate) fn new(text: &str, voice: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: text.to_string(),
                }],
            }],
            generation_config: SpeechGenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice.to_string(),
                        },
                    },
                },
            },
        }
    }
}

/// One conversation turn holding the narration text.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RequestContent {
    pub(crate) parts: Vec<TextPart>,
}

/// Text payload of a request part.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TextPart {
    pub(crate) text: String,
}

/// Generation settings selecting the audio modality and voice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpeechGenerationConfig {
    pub(crate) response_modalities: Vec<String>,
    pub(crate) speech_config: SpeechConfig,
}

/// Speech settings container.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpeechConfig {
    pub(crate) voice_config: VoiceConfig,
}

/// Voice selection container.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VoiceConfig {
    pub(crate) prebuilt_voice_config: PrebuiltVoiceConfig,
}

/// A named prebuilt voice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PrebuiltVoiceConfig {
    pub(crate) voice_name: String,
}

/// Response body of a speech generateContent call.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SpeechGenerationResponse {
    #[serde(default)]
    pub(crate) candidates: Vec<ResponseCandidate>,
}

impl SpeechGenerationResponse {
    /// Pull the first inline payload out of the response, if any.
    pub(crate) fn into_inline_data(self) -> Option<InlineData> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.inline_data)
    }
}

/// One response candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResponseCandidate {
    #[serde(default)]
    pub(crate) content: Option<ResponseContent>,
    #[serde(default)]
    pub(crate) finish_reason: Option<String>,
}

/// Parts of a response candidate.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResponseContent {
    #[serde(default)]
    pub(crate) parts: Vec<InlinePart>,
}

/// A response part that may carry inline binary data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlinePart {
    #[serde(default)]
    pub(crate) inline_data: Option<InlineData>,
}

/// Base64 payload with its MIME type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub(crate) mime_type: String,
    pub(crate) data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_camel_case_keys() {
        let request = SpeechGenerationRequest::new("Hello there.", "Kore");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["parts"][0]["text"], "Hello there.");
        assert_eq!(value["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            value["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Kore"
        );
    }

    #[test]
    fn response_with_inline_audio_parses() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": {
                            "mimeType": "audio/L16;codec=pcm;rate=24000",
                            "data": "AAD//w=="
                        }
                    }]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let parsed: SpeechGenerationResponse = serde_json::from_str(body).unwrap();
        let inline = parsed.into_inline_data().expect("inline data");
        assert_eq!(inline.mime_type, "audio/L16;codec=pcm;rate=24000");
        assert_eq!(inline.data, "AAD//w==");
    }

    #[test]
    fn blocked_response_parses_without_content() {
        let body = r#"{
            "candidates": [{
                "finishReason": "SAFETY"
            }]
        }"#;
        let parsed: SpeechGenerationResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.candidates[0].finish_reason.as_deref(),
            Some("SAFETY")
        );
        assert!(parsed.into_inline_data().is_none());
    }

    #[test]
    fn empty_body_parses_to_no_candidates() {
        let parsed: SpeechGenerationResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
        assert!(parsed.into_inline_data().is_none());
    }
}
