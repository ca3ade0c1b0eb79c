//! Rebuild command - recompute review aggregates from the review log.

use super::words::open_existing;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the rebuild command.
pub fn run_rebuild(settings: &Settings) -> Result<()> {
    let db = open_existing(settings)?;

    let stale = db.check_aggregates()?;
    let spinner = Output::spinner("Rebuilding review aggregates...");
    let result = db.rebuild_aggregates();
    spinner.finish_and_clear();
    let rebuilt = result?;

    Output::success(&format!("Rebuilt aggregates for {} word(s)", rebuilt));
    if !stale.is_empty() {
        Output::info(&format!("Corrected {} stale aggregate(s)", stale.len()));
    }

    Ok(())
}
