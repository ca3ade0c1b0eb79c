//! Relational vocabulary store.
//!
//! A [`Database`] only remembers where the SQLite file lives. Every operation
//! opens its own connection, runs its statements, and drops the connection
//! before returning, so no handle outlives a call and nothing is shared
//! between requests.

mod activities;
mod dashboard;
mod groups;
mod models;
pub mod query;
mod reviews;
pub mod schema;
mod sessions;
mod words;

pub use models::{
    Group, GroupRef, GroupSummary, Page, QuickStats, ReviewAggregate, ReviewInput, ReviewItem,
    SessionDetail, SessionSummary, StudyActivity, StudyProgress, StudySession, Word, WordDetail,
    WordPage, WordSummary,
};
pub use query::{SortColumn, SortOrder, WordListQuery, PAGE_SIZE};

pub(crate) use activities::insert_activity;
pub(crate) use groups::{ensure_group, find_group, refresh_word_counts};
pub(crate) use reviews::{insert_review_item, rebuild_aggregates_in};
pub(crate) use sessions::insert_session;

use crate::error::{PortalError, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

/// Handle to the SQLite store file.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Open (creating if needed) the store at `path` and ensure the schema exists.
    #[instrument(skip_all)]
    pub fn open(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Self::at(path);
        let conn = db.connect()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        schema::create_tables(&conn)?;

        info!("Initialized vocabulary store at {:?}", path);
        Ok(db)
    }

    /// Handle to `path` without touching the file.
    pub fn at(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Open a fresh connection with foreign keys enforced.
    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Rows violating a foreign key, as reported by `PRAGMA foreign_key_check`.
    pub fn foreign_key_violations(&self) -> Result<usize> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
        let mut rows = stmt.query([])?;
        let mut count = 0;
        while rows.next()?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    /// Number of rows in one of the store's tables.
    pub fn table_count(&self, table: &str) -> Result<i64> {
        if !schema::TABLES.contains(&table) {
            return Err(PortalError::InvalidInput(format!("Unknown table: {}", table)));
        }
        let conn = self.connect()?;
        let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }
}

/// Tables addressable by [`require`].
#[derive(Debug, Clone, Copy)]
pub(crate) enum Entity {
    Word,
    Group,
    StudyActivity,
    StudySession,
}

impl Entity {
    fn table(&self) -> &'static str {
        match self {
            Entity::Word => "words",
            Entity::Group => "groups",
            Entity::StudyActivity => "study_activities",
            Entity::StudySession => "study_sessions",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Entity::Word => "Word",
            Entity::Group => "Group",
            Entity::StudyActivity => "Study activity",
            Entity::StudySession => "Study session",
        }
    }
}

/// Fail with a not-found error unless the row with `id` exists.
pub(crate) fn require(conn: &Connection, entity: Entity, id: i64) -> Result<()> {
    let found: bool = conn.query_row(
        &format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE id = ?1)",
            entity.table()
        ),
        params![id],
        |row| row.get(0),
    )?;

    if found {
        Ok(())
    } else {
        Err(PortalError::not_found(entity.label(), id))
    }
}

/// Current time at the precision timestamps are stored with.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width UTC text form, so string order matches time order in SQL.
pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    parse_timestamp(idx, &text)
}

pub(crate) fn optional_timestamp_column(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| parse_timestamp(idx, &t)).transpose()
}

fn parse_timestamp(idx: usize, text: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::seed::{bootstrap, ActivitySeed, BootstrapOptions, CategorySeed, SeedData, WordSeed};
    use tempfile::TempDir;

    /// Empty store in a throwaway directory. Keep the `TempDir` alive.
    pub fn temp_database() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("words.db")).unwrap();
        (dir, db)
    }

    pub fn word(english: &str, spanish: &str) -> WordSeed {
        WordSeed {
            english: english.to_string(),
            spanish: spanish.to_string(),
        }
    }

    /// Adjectives [big], Verbs [eat], one activity.
    pub fn small_seed() -> SeedData {
        SeedData {
            categories: vec![
                CategorySeed {
                    group: "Adjectives".to_string(),
                    description: None,
                    words: vec![word("big", "grande")],
                },
                CategorySeed {
                    group: "Verbs".to_string(),
                    description: None,
                    words: vec![word("eat", "comer")],
                },
            ],
            activities: vec![ActivitySeed {
                name: "Typing Tutor".to_string(),
                url: "http://localhost:8080".to_string(),
                preview_url: None,
            }],
            sessions: vec![],
        }
    }

    pub fn seeded_database() -> (TempDir, Database) {
        let (dir, db) = temp_database();
        bootstrap(&db, &small_seed(), &BootstrapOptions::default()).unwrap();
        (dir, db)
    }

    /// Id of the word with the given english text.
    pub fn word_id(db: &Database, english: &str) -> i64 {
        db.connect()
            .unwrap()
            .query_row(
                "SELECT id FROM words WHERE english = ?1",
                params![english],
                |row| row.get(0),
            )
            .unwrap()
    }

    pub fn group_id(db: &Database, name: &str) -> i64 {
        db.connect()
            .unwrap()
            .query_row(
                "SELECT id FROM groups WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .unwrap()
    }
}
