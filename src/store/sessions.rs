//! Study session creation and lookup.

use super::query::{page_offset, total_pages, PAGE_SIZE};
use super::{format_timestamp, now, require, timestamp_column, Database, Entity};
use super::{Page, SessionDetail, SessionSummary, StudySession};
use crate::error::{PortalError, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use tracing::{info, instrument};

pub(super) const SUMMARY_SELECT: &str = r#"
    SELECT s.id, s.group_id, s.study_activity_id, s.created_at, g.name, a.name,
           COALESCE(SUM(CASE WHEN i.is_correct = 1 THEN 1 ELSE 0 END), 0),
           COALESCE(SUM(CASE WHEN i.is_correct = 0 THEN 1 ELSE 0 END), 0)
    FROM study_sessions s
    JOIN groups g ON g.id = s.group_id
    JOIN study_activities a ON a.id = s.study_activity_id
    LEFT JOIN word_review_items i ON i.study_session_id = s.id
"#;

pub(super) fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<SessionSummary> {
    Ok(SessionSummary {
        session: StudySession {
            id: row.get(0)?,
            group_id: row.get(1)?,
            study_activity_id: row.get(2)?,
            created_at: timestamp_column(row, 3)?,
        },
        group_name: row.get(4)?,
        activity_name: row.get(5)?,
        correct_count: row.get(6)?,
        wrong_count: row.get(7)?,
    })
}

/// Insert a session, with an explicit id when one is given.
pub(crate) fn insert_session(
    conn: &Connection,
    id: Option<i64>,
    group_id: i64,
    activity_id: i64,
    created_at: DateTime<Utc>,
) -> Result<StudySession> {
    conn.execute(
        r#"
        INSERT INTO study_sessions (id, group_id, study_activity_id, created_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![id, group_id, activity_id, format_timestamp(&created_at)],
    )?;

    Ok(StudySession {
        id: conn.last_insert_rowid(),
        group_id,
        study_activity_id: activity_id,
        created_at,
    })
}

impl Database {
    /// Start a new session for a group with an activity.
    #[instrument(skip(self))]
    pub fn create_session(&self, group_id: i64, activity_id: i64) -> Result<StudySession> {
        let conn = self.connect()?;
        require(&conn, Entity::Group, group_id)?;
        require(&conn, Entity::StudyActivity, activity_id)?;

        let session = insert_session(&conn, None, group_id, activity_id, now())?;
        info!("Created study session {}", session.id);
        Ok(session)
    }

    /// A session with names, tallies, and its review items.
    #[instrument(skip(self))]
    pub fn get_session(&self, id: i64) -> Result<SessionDetail> {
        let summary = {
            let conn = self.connect()?;
            let result = conn.query_row(
                &format!("{} WHERE s.id = ?1 GROUP BY s.id", SUMMARY_SELECT),
                params![id],
                summary_from_row,
            );
            match result {
                Ok(summary) => summary,
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    return Err(PortalError::not_found("Study session", id))
                }
                Err(e) => return Err(e.into()),
            }
        };

        let review_items = self.session_review_items(id)?;
        Ok(SessionDetail {
            summary,
            review_items,
        })
    }

    /// Sessions newest first, 50 per page.
    #[instrument(skip(self))]
    pub fn list_sessions(&self, page: i64) -> Result<Page<SessionSummary>> {
        let page = page.max(1);
        let conn = self.connect()?;

        let total: i64 = conn.query_row("SELECT COUNT(*) FROM study_sessions", [], |row| {
            row.get(0)
        })?;

        let mut stmt = conn.prepare(&format!(
            "{} GROUP BY s.id ORDER BY s.created_at DESC, s.id DESC LIMIT ?1 OFFSET ?2",
            SUMMARY_SELECT
        ))?;
        let items = stmt
            .query_map(params![PAGE_SIZE, page_offset(page)], summary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Page {
            items,
            total_pages: total_pages(total),
            current_page: page,
            total_items: total,
        })
    }

    /// Sessions run with one activity, newest first, 50 per page.
    #[instrument(skip(self))]
    pub fn activity_sessions(&self, activity_id: i64, page: i64) -> Result<Page<SessionSummary>> {
        let page = page.max(1);
        let conn = self.connect()?;
        require(&conn, Entity::StudyActivity, activity_id)?;

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM study_sessions WHERE study_activity_id = ?1",
            params![activity_id],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            "{} WHERE s.study_activity_id = ?1 GROUP BY s.id \
             ORDER BY s.created_at DESC, s.id DESC LIMIT ?2 OFFSET ?3",
            SUMMARY_SELECT
        ))?;
        let items = stmt
            .query_map(
                params![activity_id, PAGE_SIZE, page_offset(page)],
                summary_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Page {
            items,
            total_pages: total_pages(total),
            current_page: page,
            total_items: total,
        })
    }
}
