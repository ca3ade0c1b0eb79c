//! Review items and the per-word aggregate derived from them.
//!
//! The `word_reviews` table is a materialized view over `word_review_items`.
//! [`rebuild_aggregates_in`] is the one authoritative way to recompute it and
//! is used after bootstrap and after every batch write. A single live review
//! upserts its word's row directly; tests check that both paths agree.

use super::{
    format_timestamp, now, optional_timestamp_column, require, timestamp_column, Database, Entity,
};
use super::{ReviewAggregate, ReviewInput, ReviewItem};
use crate::error::{PortalError, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::{debug, info, instrument};

const REBUILD_SQL: &str = r#"
    DELETE FROM word_reviews;

    INSERT INTO word_reviews (word_id, correct_count, wrong_count, last_reviewed)
    SELECT word_id,
           SUM(CASE WHEN is_correct = 1 THEN 1 ELSE 0 END),
           SUM(CASE WHEN is_correct = 0 THEN 1 ELSE 0 END),
           MAX(created_at)
    FROM word_review_items
    GROUP BY word_id;
"#;

const UPSERT_SQL: &str = r#"
    INSERT INTO word_reviews (word_id, correct_count, wrong_count, last_reviewed)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT (word_id) DO UPDATE SET
        correct_count = correct_count + excluded.correct_count,
        wrong_count = wrong_count + excluded.wrong_count,
        last_reviewed = CASE
            WHEN last_reviewed IS NULL OR excluded.last_reviewed > last_reviewed
                THEN excluded.last_reviewed
            ELSE last_reviewed
        END
"#;

const LIVE_SQL: &str = r#"
    SELECT COALESCE(SUM(CASE WHEN is_correct = 1 THEN 1 ELSE 0 END), 0),
           COALESCE(SUM(CASE WHEN is_correct = 0 THEN 1 ELSE 0 END), 0),
           MAX(created_at)
    FROM word_review_items
    WHERE word_id = ?1
"#;

const MISMATCH_SQL: &str = r#"
    SELECT w.id
    FROM words w
    LEFT JOIN word_reviews r ON r.word_id = w.id
    LEFT JOIN (
        SELECT word_id,
               SUM(CASE WHEN is_correct = 1 THEN 1 ELSE 0 END) AS correct_count,
               SUM(CASE WHEN is_correct = 0 THEN 1 ELSE 0 END) AS wrong_count,
               MAX(created_at) AS last_reviewed
        FROM word_review_items
        GROUP BY word_id
    ) i ON i.word_id = w.id
    WHERE COALESCE(r.correct_count, 0) != COALESCE(i.correct_count, 0)
       OR COALESCE(r.wrong_count, 0) != COALESCE(i.wrong_count, 0)
       OR r.last_reviewed IS NOT i.last_reviewed
    ORDER BY w.id
"#;

/// Replace every aggregate with values recomputed from the item log.
pub(crate) fn rebuild_aggregates_in(conn: &Connection) -> Result<usize> {
    conn.execute_batch(REBUILD_SQL)?;
    let rows: i64 = conn.query_row("SELECT COUNT(*) FROM word_reviews", [], |row| row.get(0))?;
    debug!("Rebuilt {} review aggregates", rows);
    Ok(rows as usize)
}

/// Append one review item. Callers check the session and word exist.
pub(crate) fn insert_review_item(
    conn: &Connection,
    session_id: i64,
    word_id: i64,
    correct: bool,
    created_at: DateTime<Utc>,
) -> Result<ReviewItem> {
    conn.execute(
        r#"
        INSERT INTO word_review_items (study_session_id, word_id, is_correct, created_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![session_id, word_id, correct, format_timestamp(&created_at)],
    )?;

    Ok(ReviewItem {
        id: conn.last_insert_rowid(),
        study_session_id: session_id,
        word_id,
        is_correct: correct,
        created_at,
    })
}

fn upsert_aggregate(conn: &Connection, item: &ReviewItem) -> Result<()> {
    let (correct, wrong) = if item.is_correct { (1, 0) } else { (0, 1) };
    conn.execute(
        UPSERT_SQL,
        params![
            item.word_id,
            correct,
            wrong,
            format_timestamp(&item.created_at)
        ],
    )?;
    Ok(())
}

impl Database {
    /// Record one answer and fold it into the word's aggregate.
    #[instrument(skip(self))]
    pub fn record_review(&self, session_id: i64, word_id: i64, correct: bool) -> Result<ReviewItem> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        require(&tx, Entity::StudySession, session_id)?;
        require(&tx, Entity::Word, word_id)?;

        let item = insert_review_item(&tx, session_id, word_id, correct, now())?;
        upsert_aggregate(&tx, &item)?;
        tx.commit()?;

        debug!("Recorded review {} for word {}", item.id, word_id);
        Ok(item)
    }

    /// Record a batch of answers atomically, then rebuild all aggregates.
    #[instrument(skip(self, reviews), fields(count = reviews.len()))]
    pub fn record_reviews(&self, session_id: i64, reviews: &[ReviewInput]) -> Result<Vec<ReviewItem>> {
        if reviews.is_empty() {
            return Err(PortalError::InvalidInput(
                "at least one review is required".to_string(),
            ));
        }

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        require(&tx, Entity::StudySession, session_id)?;

        let created_at = now();
        let mut items = Vec::with_capacity(reviews.len());
        for review in reviews {
            require(&tx, Entity::Word, review.word_id)?;
            items.push(insert_review_item(
                &tx,
                session_id,
                review.word_id,
                review.correct,
                created_at,
            )?);
        }

        rebuild_aggregates_in(&tx)?;
        tx.commit()?;

        info!("Recorded {} reviews for session {}", items.len(), session_id);
        Ok(items)
    }

    /// Recompute every aggregate from the item log.
    #[instrument(skip(self))]
    pub fn rebuild_aggregates(&self) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let rows = rebuild_aggregates_in(&tx)?;
        tx.commit()?;
        info!("Rebuilt review aggregates for {} words", rows);
        Ok(rows)
    }

    /// The stored aggregate for a word, zero-filled when never reviewed.
    pub fn word_aggregate(&self, word_id: i64) -> Result<ReviewAggregate> {
        let conn = self.connect()?;
        let result = conn.query_row(
            "SELECT correct_count, wrong_count, last_reviewed FROM word_reviews WHERE word_id = ?1",
            params![word_id],
            |row| {
                Ok(ReviewAggregate {
                    word_id,
                    correct_count: row.get(0)?,
                    wrong_count: row.get(1)?,
                    last_reviewed: optional_timestamp_column(row, 2)?,
                })
            },
        );

        match result {
            Ok(aggregate) => Ok(aggregate),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(ReviewAggregate::empty(word_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// The aggregate computed from the item log at read time.
    pub fn live_aggregate(&self, word_id: i64) -> Result<ReviewAggregate> {
        let conn = self.connect()?;
        let aggregate = conn.query_row(LIVE_SQL, params![word_id], |row| {
            Ok(ReviewAggregate {
                word_id,
                correct_count: row.get(0)?,
                wrong_count: row.get(1)?,
                last_reviewed: optional_timestamp_column(row, 2)?,
            })
        })?;
        Ok(aggregate)
    }

    /// Every stored aggregate, ordered by word id.
    pub fn aggregates(&self) -> Result<Vec<ReviewAggregate>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT word_id, correct_count, wrong_count, last_reviewed FROM word_reviews ORDER BY word_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ReviewAggregate {
                    word_id: row.get(0)?,
                    correct_count: row.get(1)?,
                    wrong_count: row.get(2)?,
                    last_reviewed: optional_timestamp_column(row, 3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Word ids whose stored aggregate disagrees with the item log.
    pub fn check_aggregates(&self) -> Result<Vec<i64>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(MISMATCH_SQL)?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }

    /// Review items of one session in insertion order.
    pub fn session_review_items(&self, session_id: i64) -> Result<Vec<ReviewItem>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, study_session_id, word_id, is_correct, created_at
            FROM word_review_items
            WHERE study_session_id = ?1
            ORDER BY id
            "#,
        )?;
        let items = stmt
            .query_map(params![session_id], |row| {
                Ok(ReviewItem {
                    id: row.get(0)?,
                    study_session_id: row.get(1)?,
                    word_id: row.get(2)?,
                    is_correct: row.get(3)?,
                    created_at: timestamp_column(row, 4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn verbs_session(db: &Database) -> i64 {
        db.create_session(group_id(db, "Verbs"), 1).unwrap().id
    }

    #[test]
    fn test_right_then_wrong() {
        let (_dir, db) = seeded_database();
        let session = verbs_session(&db);
        let eat = word_id(&db, "eat");

        db.record_review(session, eat, true).unwrap();
        let second = db.record_review(session, eat, false).unwrap();

        let aggregate = db.word_aggregate(eat).unwrap();
        assert_eq!(aggregate.correct_count, 1);
        assert_eq!(aggregate.wrong_count, 1);
        assert_eq!(aggregate.last_reviewed, Some(second.created_at));

        let detail = db.get_word(eat).unwrap();
        assert_eq!(detail.correct_count, 1);
        assert_eq!(detail.wrong_count, 1);
        assert_eq!(detail.last_reviewed, Some(second.created_at));
    }

    #[test]
    fn test_unreviewed_word_is_zero() {
        let (_dir, db) = seeded_database();
        let big = word_id(&db, "big");
        assert_eq!(db.word_aggregate(big).unwrap(), ReviewAggregate::empty(big));
        assert_eq!(db.live_aggregate(big).unwrap(), ReviewAggregate::empty(big));
    }

    #[test]
    fn test_upsert_matches_rebuild() {
        let (_dir, db) = seeded_database();
        let session = verbs_session(&db);
        let eat = word_id(&db, "eat");
        let big = word_id(&db, "big");

        for (word, correct) in [(eat, true), (big, false), (eat, true), (eat, false), (big, false)] {
            db.record_review(session, word, correct).unwrap();
        }

        let upserted = db.aggregates().unwrap();
        for aggregate in &upserted {
            assert_eq!(aggregate, &db.live_aggregate(aggregate.word_id).unwrap());
        }
        assert!(db.check_aggregates().unwrap().is_empty());

        db.rebuild_aggregates().unwrap();
        assert_eq!(db.aggregates().unwrap(), upserted);

        // idempotent
        db.rebuild_aggregates().unwrap();
        assert_eq!(db.aggregates().unwrap(), upserted);
    }

    #[test]
    fn test_counts_match_item_log_across_sessions() {
        let (_dir, db) = seeded_database();
        let eat = word_id(&db, "eat");
        let first = verbs_session(&db);
        let second = verbs_session(&db);

        db.record_review(first, eat, true).unwrap();
        db.record_reviews(
            second,
            &[
                ReviewInput { word_id: eat, correct: false },
                ReviewInput { word_id: eat, correct: true },
            ],
        )
        .unwrap();

        let items: i64 = db
            .connect()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM word_review_items WHERE word_id = ?1",
                params![eat],
                |row| row.get(0),
            )
            .unwrap();
        let aggregate = db.word_aggregate(eat).unwrap();
        assert_eq!(aggregate.total(), items);
        assert_eq!(aggregate.correct_count, 2);
    }

    #[test]
    fn test_unknown_session_or_word() {
        let (_dir, db) = seeded_database();
        let eat = word_id(&db, "eat");

        let err = db.record_review(77, eat, true).unwrap_err();
        assert_eq!(err.to_string(), "Study session not found");

        let session = verbs_session(&db);
        let err = db.record_review(session, 9999, true).unwrap_err();
        assert_eq!(err.to_string(), "Word not found");
    }

    #[test]
    fn test_batch_with_unknown_word_rolls_back() {
        let (_dir, db) = seeded_database();
        let session = verbs_session(&db);
        let eat = word_id(&db, "eat");

        let result = db.record_reviews(
            session,
            &[
                ReviewInput { word_id: eat, correct: true },
                ReviewInput { word_id: 9999, correct: true },
            ],
        );
        assert!(result.unwrap_err().is_not_found());
        assert!(db.session_review_items(session).unwrap().is_empty());
        assert_eq!(db.word_aggregate(eat).unwrap(), ReviewAggregate::empty(eat));
    }

    #[test]
    fn test_empty_batch_rejected() {
        let (_dir, db) = seeded_database();
        let session = verbs_session(&db);
        assert!(matches!(
            db.record_reviews(session, &[]),
            Err(PortalError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_tampered_aggregate_detected_and_repaired() {
        let (_dir, db) = seeded_database();
        let session = verbs_session(&db);
        let eat = word_id(&db, "eat");
        db.record_review(session, eat, true).unwrap();

        db.connect()
            .unwrap()
            .execute("UPDATE word_reviews SET correct_count = 5", [])
            .unwrap();
        assert_eq!(db.check_aggregates().unwrap(), vec![eat]);

        db.rebuild_aggregates().unwrap();
        assert!(db.check_aggregates().unwrap().is_empty());
        assert_eq!(db.word_aggregate(eat).unwrap().correct_count, 1);
    }
}
