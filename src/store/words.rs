//! Word listing, word detail, and raw per-group export.

use super::query::{total_pages, WordListQuery, PAGE_SIZE};
use super::{find_group, optional_timestamp_column, Database};
use super::{GroupRef, GroupSummary, Word, WordDetail, WordPage, WordSummary};
use crate::error::{PortalError, Result};
use rusqlite::{params, ToSql};
use tracing::{debug, instrument};

// EXISTS keeps one row per word even when it sits in several matching groups.
const GROUP_FILTER: &str = r#"
    WHERE EXISTS (
        SELECT 1 FROM word_groups wg
        JOIN groups g ON g.id = wg.group_id
        WHERE wg.word_id = w.id AND g.name = ?
    )
"#;

impl Database {
    /// One page of words with their review counters.
    #[instrument(skip(self))]
    pub fn list_words(&self, query: &WordListQuery) -> Result<WordPage> {
        let conn = self.connect()?;

        let filter = if query.group.is_some() { GROUP_FILTER } else { "" };
        let mut args: Vec<&dyn ToSql> = Vec::new();
        if let Some(group) = &query.group {
            args.push(group);
        }

        let total_words: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM words w {}", filter),
            args.as_slice(),
            |row| row.get(0),
        )?;

        let sql = format!(
            r#"
            SELECT w.id, w.english, w.spanish,
                   COALESCE(r.correct_count, 0) AS correct_count,
                   COALESCE(r.wrong_count, 0) AS wrong_count
            FROM words w
            LEFT JOIN word_reviews r ON r.word_id = w.id
            {}
            ORDER BY {} {}, w.id ASC
            LIMIT ? OFFSET ?
            "#,
            filter,
            query.sort_by.sql(),
            query.order.sql(),
        );

        let offset = query.offset();
        args.push(&PAGE_SIZE);
        args.push(&offset);

        let mut stmt = conn.prepare(&sql)?;
        let words = stmt
            .query_map(args.as_slice(), |row| {
                Ok(WordSummary {
                    id: row.get(0)?,
                    english: row.get(1)?,
                    spanish: row.get(2)?,
                    correct_count: row.get(3)?,
                    wrong_count: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Listed {} of {} words", words.len(), total_words);
        Ok(WordPage {
            words,
            total_pages: total_pages(total_words),
            current_page: query.page,
            total_words,
        })
    }

    /// A single word with its aggregate and groups.
    #[instrument(skip(self))]
    pub fn get_word(&self, id: i64) -> Result<WordDetail> {
        let conn = self.connect()?;

        let word = conn.query_row(
            r#"
            SELECT w.id, w.english, w.spanish,
                   COALESCE(r.correct_count, 0), COALESCE(r.wrong_count, 0), r.last_reviewed
            FROM words w
            LEFT JOIN word_reviews r ON r.word_id = w.id
            WHERE w.id = ?1
            "#,
            params![id],
            |row| {
                Ok(WordDetail {
                    id: row.get(0)?,
                    english: row.get(1)?,
                    spanish: row.get(2)?,
                    correct_count: row.get(3)?,
                    wrong_count: row.get(4)?,
                    last_reviewed: optional_timestamp_column(row, 5)?,
                    groups: Vec::new(),
                })
            },
        );

        let mut word = match word {
            Ok(w) => w,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(PortalError::not_found("Word", id))
            }
            Err(e) => return Err(e.into()),
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT g.id, g.name
            FROM word_groups wg
            JOIN groups g ON g.id = wg.group_id
            WHERE wg.word_id = ?1
            ORDER BY g.id
            "#,
        )?;
        word.groups = stmt
            .query_map(params![id], |row| {
                Ok(GroupSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(word)
    }

    /// Every word of a group, unpaginated, for bulk consumers.
    #[instrument(skip(self))]
    pub fn group_words_raw(&self, group: &GroupRef) -> Result<Vec<Word>> {
        let conn = self.connect()?;

        let group = find_group(&conn, group)?
            .ok_or_else(|| PortalError::not_found("Group", group))?;

        let mut stmt = conn.prepare(
            r#"
            SELECT w.id, w.english, w.spanish
            FROM words w
            JOIN word_groups wg ON wg.word_id = w.id
            WHERE wg.group_id = ?1
            ORDER BY w.id
            "#,
        )?;
        let words = stmt
            .query_map(params![group.id], |row| {
                Ok(Word {
                    id: row.get(0)?,
                    english: row.get(1)?,
                    spanish: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Exported {} words for group {}", words.len(), group.name);
        Ok(words)
    }
}
