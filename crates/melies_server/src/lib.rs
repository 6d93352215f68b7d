//! HTTP surface for the video generation pipeline.
//!
//! One endpoint per stage, each taking a job id (`sessionId`) plus the
//! stage's text input and answering with the stage's artifact reference:
//!
//! | Method | Path                   | Work                                |
//! |--------|------------------------|-------------------------------------|
//! | POST   | `/api/improve-prompt`  | refine the topic prompt             |
//! | POST   | `/api/generate-script` | write the scene/speech script       |
//! | POST   | `/api/generate-audio`  | synthesize and publish narration    |
//! | POST   | `/api/generate-video`  | render, mux and publish the video   |
//! | GET    | `/api/jobs/:id`        | the full job record                 |
//! | GET    | `/api/health`          | liveness probe                      |
//! | GET    | `/media/*path`         | published media files               |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dto;
mod handlers;
mod routes;
mod state;

pub use dto::{
    GenerateAudioRequest, GenerateAudioResponse, GenerateScriptRequest, GenerateScriptResponse,
    GenerateVideoRequest, GenerateVideoResponse, ImprovePromptRequest, ImprovePromptResponse,
};
pub use routes::{create_router, serve};
pub use state::AppState;
