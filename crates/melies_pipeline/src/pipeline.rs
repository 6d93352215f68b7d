//! The stage orchestrator.

use crate::layout::{self, MediaLayout};
use crate::prompts;
use melies_core::{Job, JobId, JobStatus, SpeechRequest, TextRequest, wav};
use melies_error::{
    BuilderError, JobError, JobErrorKind, MeliesError, MeliesResult, RenderError, RenderErrorKind,
    StorageError, StorageErrorKind,
};
use melies_interface::{JobStore, MediaStore, SpeechModelDriver, TextModelDriver};
use melies_render::{Muxer, Renderer, Sanitizer, strip_markdown_fences};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, instrument, warn};

fn sanitizer() -> &'static Sanitizer {
    static SANITIZER: OnceLock<Sanitizer> = OnceLock::new();
    SANITIZER.get_or_init(Sanitizer::new)
}

/// What the audio stage produced.
#[derive(Debug, Clone)]
pub struct AudioOutcome {
    /// The job record after the stage ran
    pub job: Job,
    /// Staged narration WAV on the local filesystem
    pub local_path: PathBuf,
    /// Published URL of the narration clip
    pub public_url: String,
}

/// Orchestrates the four pipeline stages over pluggable drivers and stores.
///
/// Each stage is independently invokable with any job id; records are created
/// on first touch, so a client may enter at any stage. Audio and video
/// failures mark the job `failed`; refine and script failures leave the
/// record as it was, so those stages can be retried in place. Bookkeeping
/// refusals (a terminal job, a status regression) propagate without touching
/// the record.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> melies_error::MeliesResult<()> {
/// use melies_pipeline::{MediaLayout, Pipeline};
/// use melies_render::{Muxer, Renderer};
/// use std::sync::Arc;
///
/// # let (text, speech, jobs, media) = unimplemented!();
/// let pipeline = Pipeline::builder()
///     .text(text)
///     .speech(speech)
///     .jobs(jobs)
///     .media(media)
///     .layout(MediaLayout::new("staging"))
///     .renderer(Renderer::new("manim", "-qm", None))
///     .muxer(Muxer::new("ffmpeg"))
///     .voice("Kore")
///     .build()
///     .map_err(|e| melies_error::BuilderError::from(e.to_string()))?;
///
/// let id = melies_core::JobId::mint();
/// let job = pipeline.run_all(&id, "Explain how rainbows form").await?;
/// println!("published at {:?}", job.video_path());
/// # Ok(())
/// # }
/// ```
#[derive(derive_builder::Builder)]
pub struct Pipeline {
    /// Text generation backend for refinement, scripting and code generation.
    text: Arc<dyn TextModelDriver>,
    /// Speech synthesis backend for narration.
    speech: Arc<dyn SpeechModelDriver>,
    /// Job record persistence.
    jobs: Arc<dyn JobStore>,
    /// Published artifact storage.
    media: Arc<dyn MediaStore>,
    /// Staging tree for intermediate files.
    layout: MediaLayout,
    /// External renderer invocation.
    renderer: Renderer,
    /// External mux invocation.
    muxer: Muxer,
    /// Narration voice name.
    #[builder(setter(into))]
    voice: String,
}

impl Pipeline {
    /// Start building a pipeline.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Refine a raw topic prompt into a detailed script-generation prompt.
    ///
    /// On success the record holds the raw and refined prompts and moves to
    /// `refining`. On driver failure nothing is persisted beyond the record
    /// creation itself.
    #[instrument(name = "stage_refine", skip_all, fields(job = %id))]
    pub async fn refine(&self, id: &JobId, raw_prompt: &str) -> MeliesResult<Job> {
        let mut job = self.jobs.get_or_create(id, raw_prompt).await?;
        guard_not_terminal(&job)?;

        let request = TextRequest::builder()
            .prompt(prompts::refine_user_prompt(raw_prompt))
            .system_prompt(prompts::REFINE_SYSTEM_PROMPT)
            .build()
            .map_err(|err| BuilderError::from(err.to_string()))?;
        let response = self.text.generate(&request).await?;
        let refined = response.text.trim().to_string();
        debug!(chars = refined.len(), "prompt refined");

        job.set_raw_prompt(raw_prompt.to_string());
        job.set_refined_prompt(refined);
        job.advance(JobStatus::Refining)?;
        self.jobs.update(&job).await?;
        Ok(job)
    }

    /// Generate a timed scene/speech script from a refined prompt.
    #[instrument(name = "stage_script", skip_all, fields(job = %id))]
    pub async fn script(&self, id: &JobId, prompt: &str) -> MeliesResult<Job> {
        let mut job = self.jobs.get_or_create(id, prompt).await?;
        guard_not_terminal(&job)?;

        let request = TextRequest::builder()
            .prompt(prompt)
            .system_prompt(prompts::SCRIPT_SYSTEM_PROMPT)
            .build()
            .map_err(|err| BuilderError::from(err.to_string()))?;
        let response = self.text.generate(&request).await?;
        let script = response.text.trim().to_string();
        debug!(chars = script.len(), "script generated");

        job.set_script(script);
        job.advance(JobStatus::ScriptGenerating)?;
        self.jobs.update(&job).await?;
        Ok(job)
    }

    /// Synthesize narration for a script, stage it as a WAV and publish it.
    ///
    /// The job's status is left untouched on success; only the narration
    /// path is recorded. Synthesis or publication failure marks the job
    /// `failed`.
    #[instrument(name = "stage_audio", skip_all, fields(job = %id))]
    pub async fn audio(&self, id: &JobId, script: &str) -> MeliesResult<AudioOutcome> {
        let mut job = self.jobs.get_or_create(id, script).await?;
        guard_not_terminal(&job)?;

        let request = SpeechRequest::new(prompts::narration_prompt(script), self.voice.as_str());
        let response = match self.speech.synthesize(&request).await {
            Ok(response) => response,
            Err(err) => return Err(self.fail_job(&mut job, err).await),
        };
        debug!(
            samples = response.pcm.len(),
            rate = response.sample_rate,
            "narration synthesized"
        );

        if let Err(err) = self.layout.ensure() {
            return Err(self.fail_job(&mut job, err).await);
        }
        let bytes = wav::encode(&response.pcm, response.sample_rate);
        let file_name = layout::audio_file_name();
        let local_path = self.layout.audio_dir().join(&file_name);
        if let Err(err) = fs::write(&local_path, &bytes) {
            let err = StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {err}",
                local_path.display()
            )));
            return Err(self.fail_job(&mut job, err.into()).await);
        }

        let key = format!("audio/{file_name}");
        let public_url = match self.media.upload(&local_path, &key, true).await {
            Ok(url) => url,
            Err(err) => return Err(self.fail_job(&mut job, err).await),
        };

        job.set_audio_path(local_path.display().to_string());
        self.jobs.update(&job).await?;
        info!(id = %job.id(), url = %public_url, "narration published");
        Ok(AudioOutcome {
            job,
            local_path,
            public_url,
        })
    }

    /// Generate animation code, render it, mux in the narration and publish.
    ///
    /// The record moves to `video_generating` before any work runs, and to
    /// `completed` once the muxed video is published. `audio_path` overrides
    /// the narration recorded on the job; one of the two must exist.
    #[instrument(name = "stage_video", skip_all, fields(job = %id))]
    pub async fn video(
        &self,
        id: &JobId,
        script: &str,
        audio_path: Option<&Path>,
    ) -> MeliesResult<Job> {
        let mut job = self.jobs.get_or_create(id, script).await?;
        guard_not_terminal(&job)?;

        job.set_script(script.to_string());
        job.advance(JobStatus::VideoGenerating)?;
        self.jobs.update(&job).await?;

        let audio_source = match audio_path
            .map(Path::to_path_buf)
            .or_else(|| job.audio_path().clone().map(PathBuf::from))
        {
            Some(path) => path,
            None => {
                let err = StorageError::new(StorageErrorKind::NotFound(format!(
                    "narration audio for job {id}"
                )));
                return Err(self.fail_job(&mut job, err.into()).await);
            }
        };

        let request = TextRequest::builder()
            .prompt(prompts::animation_code_prompt(script))
            .build()
            .map_err(|err| BuilderError::from(err.to_string()))?;
        let response = match self.text.generate(&request).await {
            Ok(response) => response,
            Err(err) => return Err(self.fail_job(&mut job, err).await),
        };
        let code = sanitizer().sanitize(&strip_markdown_fences(&response.text));
        if code.trim().is_empty() {
            let err = RenderError::new(RenderErrorKind::EmptyCode);
            return Err(self.fail_job(&mut job, err.into()).await);
        }
        debug!(chars = code.len(), "animation code sanitized");

        if let Err(err) = self.layout.ensure() {
            return Err(self.fail_job(&mut job, err).await);
        }
        let scene_path = self.layout.scene_file(id);
        if let Err(err) = fs::write(&scene_path, &code) {
            let err = RenderError::new(RenderErrorKind::CodeWrite {
                path: scene_path.display().to_string(),
                message: err.to_string(),
            });
            return Err(self.fail_job(&mut job, err.into()).await);
        }
        job.set_code_path(scene_path.display().to_string());

        let videos_dir = self.layout.videos_dir();
        let silent_name = layout::silent_video_name(id);
        let silent_path = match self
            .renderer
            .render(&scene_path, &videos_dir, &silent_name)
            .await
        {
            Ok(path) => path,
            Err(err) => return Err(self.fail_job(&mut job, err).await),
        };

        let final_name = layout::final_video_name(id);
        let final_path = videos_dir.join(&final_name);
        if let Err(err) = self.muxer.mux(&silent_path, &audio_source, &final_path).await {
            return Err(self.fail_job(&mut job, err).await);
        }

        let key = format!("videos/{final_name}");
        let url = match self.media.upload(&final_path, &key, true).await {
            Ok(url) => url,
            Err(err) => return Err(self.fail_job(&mut job, err).await),
        };

        // The silent render is subsumed by the muxed output.
        if let Err(err) = fs::remove_file(&silent_path) {
            warn!(path = %silent_path.display(), error = %err, "silent intermediate not removed");
        }

        job.set_video_path(url.clone());
        job.advance(JobStatus::Completed)?;
        self.jobs.update(&job).await?;
        info!(id = %job.id(), url = %url, "video published");
        Ok(job)
    }

    /// Run every stage in order for a fresh or existing job.
    ///
    /// Stops at the first failure. Unlike the stand-alone refine and script
    /// stages, a failure anywhere in the sequence marks the job `failed`.
    #[instrument(name = "run_all", skip_all, fields(job = %id))]
    pub async fn run_all(&self, id: &JobId, raw_prompt: &str) -> MeliesResult<Job> {
        let job = match self.refine(id, raw_prompt).await {
            Ok(job) => job,
            Err(err) => return Err(self.record_failure(id, err).await),
        };
        let refined = job.refined_prompt().clone();
        let job = match self.script(id, &refined).await {
            Ok(job) => job,
            Err(err) => return Err(self.record_failure(id, err).await),
        };
        let script = job.script().clone();
        let narration = self.audio(id, &script).await?;
        self.video(id, &script, Some(narration.local_path.as_path()))
            .await
    }

    /// Fetch a job record.
    pub async fn job(&self, id: &JobId) -> MeliesResult<Job> {
        self.jobs.get(id).await
    }

    /// Mark `id` failed for a stage error that left its record untouched.
    async fn record_failure(&self, id: &JobId, err: MeliesError) -> MeliesError {
        match self.jobs.get(id).await {
            Ok(mut job) => self.fail_job(&mut job, err).await,
            Err(load_err) => {
                warn!(id = %id, error = %load_err, "could not load job to record failure");
                err
            }
        }
    }

    /// Mark the job failed, persist it best-effort and hand the error back.
    async fn fail_job(&self, job: &mut Job, err: MeliesError) -> MeliesError {
        warn!(id = %job.id(), error = %err, "stage failed");
        if job.fail(err.to_string()).is_ok() {
            if let Err(persist_err) = self.jobs.update(job).await {
                warn!(id = %job.id(), error = %persist_err, "could not persist failure state");
            }
        }
        err
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("text_model", &self.text.model_name())
            .field("speech_model", &self.speech.model_name())
            .field("voice", &self.voice)
            .finish_non_exhaustive()
    }
}

fn guard_not_terminal(job: &Job) -> MeliesResult<()> {
    if job.status().is_terminal() {
        return Err(JobError::new(JobErrorKind::Terminal(job.id().to_string())).into());
    }
    Ok(())
}
