//! Table definitions for the vocabulary store.

use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;

/// Every table in the store, in creation order.
pub const TABLES: [&str; 7] = [
    "words",
    "groups",
    "word_groups",
    "study_activities",
    "study_sessions",
    "word_review_items",
    "word_reviews",
];

const CREATE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS words (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        english TEXT NOT NULL,
        spanish TEXT NOT NULL,
        UNIQUE (english, spanish)
    );

    CREATE TABLE IF NOT EXISTS groups (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        word_count INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS word_groups (
        word_id INTEGER NOT NULL REFERENCES words (id),
        group_id INTEGER NOT NULL REFERENCES groups (id),
        PRIMARY KEY (word_id, group_id)
    );

    CREATE INDEX IF NOT EXISTS idx_word_groups_group_id ON word_groups (group_id);

    CREATE TABLE IF NOT EXISTS study_activities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        url TEXT NOT NULL,
        preview_url TEXT
    );

    CREATE TABLE IF NOT EXISTS study_sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        group_id INTEGER NOT NULL REFERENCES groups (id),
        study_activity_id INTEGER NOT NULL REFERENCES study_activities (id),
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS word_review_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        study_session_id INTEGER NOT NULL REFERENCES study_sessions (id),
        word_id INTEGER NOT NULL REFERENCES words (id),
        is_correct INTEGER NOT NULL CHECK (is_correct IN (0, 1)),
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_word_review_items_word_id ON word_review_items (word_id);
    CREATE INDEX IF NOT EXISTS idx_word_review_items_session_id ON word_review_items (study_session_id);

    CREATE TABLE IF NOT EXISTS word_reviews (
        word_id INTEGER PRIMARY KEY REFERENCES words (id),
        correct_count INTEGER NOT NULL DEFAULT 0,
        wrong_count INTEGER NOT NULL DEFAULT 0,
        last_reviewed TEXT
    );
"#;

// Leaf tables first so foreign keys never dangle mid-drop.
const DROP_SQL: &str = r#"
    DROP TABLE IF EXISTS word_reviews;
    DROP TABLE IF EXISTS word_review_items;
    DROP TABLE IF EXISTS study_sessions;
    DROP TABLE IF EXISTS word_groups;
    DROP TABLE IF EXISTS study_activities;
    DROP TABLE IF EXISTS groups;
    DROP TABLE IF EXISTS words;
"#;

/// Create all tables and indexes that do not exist yet.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_SQL)?;
    debug!("Ensured {} tables exist", TABLES.len());
    Ok(())
}

/// Drop every table, dependents before the tables they reference.
pub fn drop_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(DROP_SQL)?;
    debug!("Dropped all tables");
    Ok(())
}

/// Names of the known tables currently present in the store.
pub fn existing_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names
        .into_iter()
        .filter(|name| TABLES.contains(&name.as_str()))
        .collect())
}
