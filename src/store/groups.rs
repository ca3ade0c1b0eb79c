//! Group lookup and cached word counts.

use super::query::{page_offset, total_pages, PAGE_SIZE};
use super::Database;
use super::{Group, GroupRef, Page};
use crate::error::{PortalError, Result};
use rusqlite::{params, Connection, Row};
use tracing::{debug, instrument};

fn group_from_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        word_count: row.get(3)?,
    })
}

/// Look a group up by id or name.
pub(crate) fn find_group(conn: &Connection, group: &GroupRef) -> Result<Option<Group>> {
    let result = match group {
        GroupRef::Id(id) => conn.query_row(
            "SELECT id, name, description, word_count FROM groups WHERE id = ?1",
            params![id],
            group_from_row,
        ),
        GroupRef::Name(name) => conn.query_row(
            "SELECT id, name, description, word_count FROM groups WHERE name = ?1",
            params![name],
            group_from_row,
        ),
    };

    match result {
        Ok(group) => Ok(Some(group)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Id of the group named `name`, creating it when missing, and whether it was created.
pub(crate) fn ensure_group(
    conn: &Connection,
    name: &str,
    description: Option<&str>,
) -> Result<(i64, bool)> {
    let added = conn.execute(
        "INSERT OR IGNORE INTO groups (name, description) VALUES (?1, ?2)",
        params![name, description],
    )?;
    let id = conn.query_row(
        "SELECT id FROM groups WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok((id, added == 1))
}

/// Recompute every group's cached word count from its memberships.
pub(crate) fn refresh_word_counts(conn: &Connection) -> Result<usize> {
    let updated = conn.execute(
        r#"
        UPDATE groups
        SET word_count = (SELECT COUNT(*) FROM word_groups wg WHERE wg.group_id = groups.id)
        "#,
        [],
    )?;
    debug!("Refreshed word counts for {} groups", updated);
    Ok(updated)
}

impl Database {
    /// Groups ordered by name, 50 per page.
    #[instrument(skip(self))]
    pub fn list_groups(&self, page: i64) -> Result<Page<Group>> {
        let page = page.max(1);
        let conn = self.connect()?;

        let total: i64 = conn.query_row("SELECT COUNT(*) FROM groups", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, description, word_count
            FROM groups
            ORDER BY name, id
            LIMIT ?1 OFFSET ?2
            "#,
        )?;
        let items = stmt
            .query_map(params![PAGE_SIZE, page_offset(page)], group_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Page {
            items,
            total_pages: total_pages(total),
            current_page: page,
            total_items: total,
        })
    }

    pub fn get_group(&self, id: i64) -> Result<Group> {
        self.resolve_group(&GroupRef::Id(id))
    }

    /// Resolve a group reference, failing with not-found.
    pub fn resolve_group(&self, group: &GroupRef) -> Result<Group> {
        let conn = self.connect()?;
        find_group(&conn, group)?.ok_or_else(|| PortalError::not_found("Group", group))
    }
}
