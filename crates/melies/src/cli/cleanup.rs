//! Aged media sweeping.

use crate::cli::wire;
use melies::config::Settings;
use melies::{MediaStore, MeliesResult};
use std::time::Duration;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Delete published objects under `prefix` older than `days` days and
/// print the sweep report.
pub async fn handle_cleanup(settings: &Settings, prefix: &str, days: u64) -> MeliesResult<()> {
    let store = wire::media_store(settings)?;
    let report = store
        .cleanup_older_than(prefix, Duration::from_secs(days * SECS_PER_DAY))
        .await?;
    println!("{report}");
    Ok(())
}
