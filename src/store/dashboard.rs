//! Progress statistics for the dashboard.

use super::sessions::{summary_from_row, SUMMARY_SELECT};
use super::Database;
use super::{QuickStats, SessionSummary, StudyProgress};
use crate::error::Result;
use tracing::instrument;

impl Database {
    /// The most recently started session, if any.
    #[instrument(skip(self))]
    pub fn last_session(&self) -> Result<Option<SessionSummary>> {
        let conn = self.connect()?;
        let result = conn.query_row(
            &format!(
                "{} GROUP BY s.id ORDER BY s.created_at DESC, s.id DESC LIMIT 1",
                SUMMARY_SELECT
            ),
            [],
            summary_from_row,
        );

        match result {
            Ok(summary) => Ok(Some(summary)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// How many distinct words have been reviewed at least once.
    pub fn study_progress(&self) -> Result<StudyProgress> {
        let conn = self.connect()?;
        let progress = conn.query_row(
            r#"
            SELECT (SELECT COUNT(DISTINCT word_id) FROM word_review_items),
                   (SELECT COUNT(*) FROM words)
            "#,
            [],
            |row| {
                Ok(StudyProgress {
                    total_words_studied: row.get(0)?,
                    total_available_words: row.get(1)?,
                })
            },
        )?;
        Ok(progress)
    }

    pub fn quick_stats(&self) -> Result<QuickStats> {
        let conn = self.connect()?;
        let stats = conn.query_row(
            r#"
            SELECT (SELECT COUNT(*) FROM words),
                   (SELECT COUNT(*) FROM groups),
                   (SELECT COUNT(*) FROM study_sessions),
                   (SELECT COALESCE(AVG(CASE WHEN is_correct = 1 THEN 1.0 ELSE 0.0 END), 0.0)
                    FROM word_review_items)
            "#,
            [],
            |row| {
                Ok(QuickStats {
                    total_words: row.get(0)?,
                    total_groups: row.get(1)?,
                    total_study_sessions: row.get(2)?,
                    success_rate: row.get(3)?,
                })
            },
        )?;
        Ok(stats)
    }
}
