//! Seed command - bootstrap the store from the seed files.

use crate::cli::Output;
use crate::config::Settings;
use crate::seed::{bootstrap, BootstrapOptions, SeedData};
use crate::store::Database;
use anyhow::Result;
use std::path::PathBuf;

/// Run the seed command.
pub fn run_seed(
    reset: bool,
    dir: Option<String>,
    sessions: Option<String>,
    all_words: Option<String>,
    settings: &Settings,
) -> Result<()> {
    let seed_dir = match dir {
        Some(d) => Settings::expand_path(&d),
        None => settings.seed_dir(),
    };
    let sessions_file: Option<PathBuf> = sessions.as_deref().map(Settings::expand_path);

    Output::info(&format!("Reading seed files from {}", seed_dir.display()));
    let data = SeedData::load(&settings.seed, &seed_dir, sessions_file.as_deref())?;

    let db_path = settings.database_path();
    let db = Database::open(&db_path)?;

    let options = BootstrapOptions {
        reset,
        all_words_group: all_words.or_else(|| settings.seed.all_words_group.clone()),
    };

    let spinner = Output::spinner(if reset {
        "Resetting and seeding store..."
    } else {
        "Seeding store..."
    });
    let result = bootstrap(&db, &data, &options);
    spinner.finish_and_clear();
    let report = result?;

    Output::success(&format!("Seeded {}", db_path.display()));
    Output::kv("Groups added", &report.groups.to_string());
    Output::kv("Words", &report.words.to_string());
    Output::kv("Word links added", &report.links.to_string());
    Output::kv("Activities added", &report.activities.to_string());
    if report.sessions > 0 {
        Output::kv("Sample sessions", &report.sessions.to_string());
        Output::kv("Review items", &report.review_items.to_string());
    }
    Output::kv("Aggregates", &report.aggregates.to_string());

    Ok(())
}
