//! Local pipeline execution and job inspection.

use crate::cli::wire;
use melies::config::Settings;
use melies::{JobError, JobErrorKind, JobId, JobStore, JsonJobStore, MeliesResult};

/// Drive every stage for one prompt, printing artifacts as they land.
///
/// `job` resumes an existing record; without it a fresh timestamp id is
/// minted. The record is already marked `failed` when a stage error
/// propagates out of here.
pub async fn run_pipeline(
    settings: &Settings,
    prompt: &str,
    job: Option<&str>,
) -> MeliesResult<()> {
    let id = match job {
        Some(raw) => raw.parse::<JobId>()?,
        None => JobId::mint(),
    };
    let pipeline = wire::pipeline(settings)?;
    println!("job {id}");

    let job = pipeline.refine(&id, prompt).await?;
    println!("refined prompt:\n{}\n", job.refined_prompt());

    let refined = job.refined_prompt().clone();
    let job = pipeline.script(&id, &refined).await?;
    println!("script:\n{}\n", job.script());

    let script = job.script().clone();
    let narration = pipeline.audio(&id, &script).await?;
    println!("narration: {}", narration.local_path.display());
    println!("narration url: {}", narration.public_url);

    let job = pipeline
        .video(&id, &script, Some(narration.local_path.as_path()))
        .await?;
    match job.video_path() {
        Some(url) => println!("video url: {url}"),
        None => println!("video: not recorded"),
    }
    Ok(())
}

/// Print one job record as pretty JSON.
pub async fn show_job(settings: &Settings, id: &str) -> MeliesResult<()> {
    let id = id.parse::<JobId>()?;
    let store = JsonJobStore::new(&settings.jobs.root)?;
    let job = store.get(&id).await?;

    let json = serde_json::to_string_pretty(&job)
        .map_err(|err| JobError::new(JobErrorKind::Serialization(err.to_string())))?;
    println!("{json}");
    Ok(())
}
