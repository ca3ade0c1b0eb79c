//! Words and word commands - browse the vocabulary from the terminal.

use crate::cli::Output;
use crate::config::Settings;
use crate::store::{Database, WordListQuery};
use anyhow::Result;
use chrono::SecondsFormat;

/// List one page of words.
pub fn run_words(
    page: Option<&str>,
    sort_by: Option<&str>,
    order: Option<&str>,
    group: Option<&str>,
    settings: &Settings,
) -> Result<()> {
    let db = open_existing(settings)?;
    let query = WordListQuery::from_raw(page, sort_by, order, group);
    let result = db.list_words(&query)?;

    if result.words.is_empty() {
        match &query.group {
            Some(g) => Output::warning(&format!("No words in group {}", g)),
            None => Output::warning("No words yet. Run `lang-portal seed` first."),
        }
        return Ok(());
    }

    Output::header(&format!(
        "Words (page {} of {}, {} total, by {} {})",
        result.current_page,
        result.total_pages.max(1),
        result.total_words,
        query.sort_by,
        query.order.sql().to_lowercase()
    ));
    println!();
    for word in &result.words {
        Output::word_row(
            word.id,
            &word.english,
            &word.spanish,
            word.correct_count,
            word.wrong_count,
        );
    }

    Ok(())
}

/// Show one word with its review state and groups.
pub fn run_word(id: i64, settings: &Settings) -> Result<()> {
    let db = open_existing(settings)?;
    let word = db.get_word(id)?;

    Output::header(&format!("{} → {}", word.english, word.spanish));
    Output::kv("Id", &word.id.to_string());
    Output::kv("Correct", &word.correct_count.to_string());
    Output::kv("Wrong", &word.wrong_count.to_string());
    Output::kv(
        "Last reviewed",
        &word
            .last_reviewed
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "never".to_string()),
    );

    if word.groups.is_empty() {
        Output::kv("Groups", "none");
    } else {
        println!("  Groups:");
        for group in &word.groups {
            Output::list_item(&format!("{} (id {})", group.name, group.id));
        }
    }

    Ok(())
}

/// Open the configured store, failing if it was never seeded.
pub(super) fn open_existing(settings: &Settings) -> Result<Database> {
    let db_path = settings.database_path();
    if !db_path.exists() {
        anyhow::bail!(
            "No store at {}. Run `lang-portal seed` first.",
            db_path.display()
        );
    }
    Ok(Database::open(&db_path)?)
}
