//! Study activities.

use super::Database;
use super::StudyActivity;
use crate::error::{PortalError, Result};
use rusqlite::{params, Connection, Row};

fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<StudyActivity> {
    Ok(StudyActivity {
        id: row.get(0)?,
        name: row.get(1)?,
        url: row.get(2)?,
        preview_url: row.get(3)?,
    })
}

/// Insert an activity unless one with the same name exists. Returns whether a row was added.
pub(crate) fn insert_activity(
    conn: &Connection,
    name: &str,
    url: &str,
    preview_url: Option<&str>,
) -> Result<bool> {
    let added = conn.execute(
        r#"
        INSERT INTO study_activities (name, url, preview_url)
        SELECT ?1, ?2, ?3
        WHERE NOT EXISTS (SELECT 1 FROM study_activities WHERE name = ?1)
        "#,
        params![name, url, preview_url],
    )?;
    Ok(added == 1)
}

impl Database {
    pub fn list_activities(&self) -> Result<Vec<StudyActivity>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT id, name, url, preview_url FROM study_activities ORDER BY id")?;
        let activities = stmt
            .query_map([], activity_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(activities)
    }

    pub fn get_activity(&self, id: i64) -> Result<StudyActivity> {
        let conn = self.connect()?;
        let result = conn.query_row(
            "SELECT id, name, url, preview_url FROM study_activities WHERE id = ?1",
            params![id],
            activity_from_row,
        );

        match result {
            Ok(activity) => Ok(activity),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(PortalError::not_found("Study activity", id))
            }
            Err(e) => Err(e.into()),
        }
    }
}
