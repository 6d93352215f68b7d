//! Wire types for the stage endpoints.
//!
//! Field names follow the JavaScript-style camelCase the frontend already
//! speaks. `sessionId` doubles as the job id; when a client omits it, a
//! fresh one is minted and echoed back.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/improve-prompt`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovePromptRequest {
    /// Raw topic prompt
    #[serde(default)]
    pub prompt: String,
    /// Client-chosen job id
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Success body of `POST /api/improve-prompt`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovePromptResponse {
    /// Refined prompt text
    pub refined_prompt: String,
    /// Job id the work ran under
    pub session_id: String,
}

/// Body of `POST /api/generate-script`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScriptRequest {
    /// Refined prompt to script from
    #[serde(default)]
    pub prompt: String,
    /// Client-chosen job id
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Success body of `POST /api/generate-script`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScriptResponse {
    /// Generated scene/speech script
    pub script: String,
    /// Job id the work ran under
    pub session_id: String,
}

/// Body of `POST /api/generate-audio`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAudioRequest {
    /// Script to narrate
    #[serde(default)]
    pub script: String,
    /// Client-chosen job id
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Success body of `POST /api/generate-audio`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAudioResponse {
    /// Public URL for streaming the narration
    pub audio_url: String,
    /// Local staged WAV path, fed back to the video endpoint
    pub local_audio_path: String,
    /// Job id the work ran under
    pub session_id: String,
}

/// Body of `POST /api/generate-video`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoRequest {
    /// Script the animation is generated from
    #[serde(default)]
    pub script: String,
    /// Narration WAV path returned by the audio endpoint
    #[serde(default)]
    pub local_audio_path: Option<String>,
    /// Client-chosen job id
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Success body of `POST /api/generate-video`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    /// Published URL of the finished video
    pub video_url: String,
    /// Job id the work ran under
    pub session_id: String,
}
