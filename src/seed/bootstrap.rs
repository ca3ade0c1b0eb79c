//! Applying seed data to the store.

use super::{SeedData, WordRef};
use crate::error::{PortalError, Result};
use crate::store::{
    ensure_group, find_group, insert_activity, insert_review_item, insert_session,
    rebuild_aggregates_in, refresh_word_counts, schema, Database,
};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// How a bootstrap run treats existing data.
#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
    /// Drop and recreate every table before seeding.
    pub reset: bool,
    /// Catch-all group every seeded word is also linked into.
    pub all_words_group: Option<String>,
}

/// What a bootstrap run inserted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BootstrapReport {
    pub groups: usize,
    pub words: usize,
    pub links: usize,
    pub activities: usize,
    pub sessions: usize,
    pub review_items: usize,
    pub aggregates: usize,
}

/// Populate the store from `data` in one transaction.
///
/// Nothing is committed unless every step succeeds. Because SQLite DDL is
/// transactional this includes the drop performed by `reset`, so a failed run
/// leaves the previous store as it was.
#[instrument(skip_all, fields(reset = options.reset))]
pub fn bootstrap(db: &Database, data: &SeedData, options: &BootstrapOptions) -> Result<BootstrapReport> {
    let mut conn = db.connect()?;
    let tx = conn.transaction()?;

    if options.reset {
        schema::drop_tables(&tx)?;
        info!("Dropped existing tables");
    }
    schema::create_tables(&tx)?;

    let mut report = BootstrapReport::default();
    let mut seeded_words = BTreeSet::new();

    for category in &data.categories {
        let (group_id, created) =
            ensure_group(&tx, &category.group, category.description.as_deref())?;
        if created {
            report.groups += 1;
        }

        for word in &category.words {
            let word_id = ensure_word(&tx, &word.english, &word.spanish)?;
            seeded_words.insert(word_id);
            if link_word(&tx, word_id, group_id)? {
                report.links += 1;
            }
        }
        debug!("Seeded {} words into {}", category.words.len(), category.group);
    }
    report.words = seeded_words.len();

    if let Some(name) = &options.all_words_group {
        let (group_id, created) = ensure_group(&tx, name, None)?;
        if created {
            report.groups += 1;
        }
        for word_id in &seeded_words {
            if link_word(&tx, *word_id, group_id)? {
                report.links += 1;
            }
        }
    }

    for activity in &data.activities {
        if insert_activity(&tx, &activity.name, &activity.url, activity.preview_url.as_deref())? {
            report.activities += 1;
        }
    }

    refresh_word_counts(&tx)?;

    for seed in &data.sessions {
        let group = find_group(&tx, &seed.group)?.ok_or_else(|| {
            PortalError::InvalidInput(format!("sample session references unknown group {}", seed.group))
        })?;
        let session = insert_session(&tx, seed.id, group.id, seed.study_activity_id, seed.created_at)?;
        report.sessions += 1;

        for review in &seed.reviews {
            let created_at = review.created_at.unwrap_or(seed.created_at);
            let word_id = resolve_word(&tx, &review.word)?;
            insert_review_item(&tx, session.id, word_id, review.correct, created_at)?;
            report.review_items += 1;
        }
    }

    report.aggregates = rebuild_aggregates_in(&tx)?;
    tx.commit()?;

    info!(
        "Bootstrap complete: {} words, {} groups, {} activities, {} sessions",
        report.words, report.groups, report.activities, report.sessions
    );
    Ok(report)
}

/// Id of the word with this exact pair, inserting it once.
fn ensure_word(conn: &Connection, english: &str, spanish: &str) -> Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO words (english, spanish) VALUES (?1, ?2)",
        params![english, spanish],
    )?;
    let id = conn.query_row(
        "SELECT id FROM words WHERE english = ?1 AND spanish = ?2",
        params![english, spanish],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Id of a sample review's word. Ids pass through; foreign keys reject unknown ones.
fn resolve_word(conn: &Connection, word: &WordRef) -> Result<i64> {
    let english = match word {
        WordRef::Id(id) => return Ok(*id),
        WordRef::English(english) => english,
    };

    let result = conn.query_row(
        "SELECT id FROM words WHERE english = ?1 ORDER BY id LIMIT 1",
        params![english],
        |row| row.get(0),
    );
    match result {
        Ok(id) => Ok(id),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(PortalError::InvalidInput(format!(
            "sample review references unknown word {}",
            word
        ))),
        Err(e) => Err(e.into()),
    }
}

fn link_word(conn: &Connection, word_id: i64, group_id: i64) -> Result<bool> {
    let added = conn.execute(
        "INSERT OR IGNORE INTO word_groups (word_id, group_id) VALUES (?1, ?2)",
        params![word_id, group_id],
    )?;
    Ok(added == 1)
}
