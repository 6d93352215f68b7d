//! Assembly of live components from settings.

use melies::config::Settings;
use melies::{
    BuilderError, FileSystemMediaStore, GeminiSpeechDriver, GeminiTextDriver, JsonJobStore,
    MediaLayout, MeliesResult, Muxer, Pipeline, Renderer,
};
use std::sync::Arc;

/// Build the pipeline the settings describe.
///
/// Driver construction reads the Gemini API key from the environment, so
/// this fails fast when the key is missing rather than at first use.
pub fn pipeline(settings: &Settings) -> MeliesResult<Pipeline> {
    let pipeline = Pipeline::builder()
        .text(Arc::new(GeminiTextDriver::new(&settings.model.text)?))
        .speech(Arc::new(GeminiSpeechDriver::new(&settings.model.speech)?))
        .jobs(Arc::new(JsonJobStore::new(&settings.jobs.root)?))
        .media(Arc::new(media_store(settings)?))
        .layout(MediaLayout::new(&settings.media.root))
        .renderer(Renderer::new(
            settings.render.command.as_str(),
            settings.render.quality_flag.as_str(),
            settings.render.timeout(),
        ))
        .muxer(Muxer::new(settings.mux.command.as_str()))
        .voice(settings.model.voice.as_str())
        .build()
        .map_err(|err| BuilderError::from(err.to_string()))?;
    Ok(pipeline)
}

/// The published media store on its own, for commands that never render.
pub fn media_store(settings: &Settings) -> MeliesResult<FileSystemMediaStore> {
    FileSystemMediaStore::new(
        &settings.media.store_root,
        settings.media.public_base_url.as_str(),
    )
}
