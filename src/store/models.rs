//! Record types returned by store operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vocabulary word without review state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: i64,
    pub english: String,
    pub spanish: String,
}

/// A word joined with its review counters, as shown in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSummary {
    pub id: i64,
    pub english: String,
    pub spanish: String,
    pub correct_count: i64,
    pub wrong_count: i64,
}

/// A word with its review aggregate and every group it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDetail {
    pub id: i64,
    pub english: String,
    pub spanish: String,
    pub correct_count: i64,
    pub wrong_count: i64,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub groups: Vec<GroupSummary>,
}

/// One page of the word listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordPage {
    pub words: Vec<WordSummary>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total_words: i64,
}

/// Generic page of records for the secondary listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total_items: i64,
}

/// Group id and name pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: i64,
    pub name: String,
}

/// A named collection of words with its cached word count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub word_count: i64,
}

/// Identifies a group either by id or by name.
///
/// Deserializes from a bare JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupRef {
    Id(i64),
    Name(String),
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupRef::Id(id) => write!(f, "{}", id),
            GroupRef::Name(name) => write!(f, "{}", name),
        }
    }
}

/// An external exercise type a session can be run with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyActivity {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub preview_url: Option<String>,
}

/// One practice run of a group with an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: i64,
    pub group_id: i64,
    pub study_activity_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A session with its group and activity names and review tallies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(flatten)]
    pub session: StudySession,
    pub group_name: String,
    pub activity_name: String,
    pub correct_count: i64,
    pub wrong_count: i64,
}

/// A session summary plus every review item recorded in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub summary: SessionSummary,
    pub review_items: Vec<ReviewItem>,
}

/// One right/wrong answer for one word within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: i64,
    pub study_session_id: i64,
    pub word_id: i64,
    pub is_correct: bool,
    pub created_at: DateTime<Utc>,
}

/// An answer submitted for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewInput {
    pub word_id: i64,
    pub correct: bool,
}

/// Per-word correctness statistics derived from review items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewAggregate {
    pub word_id: i64,
    pub correct_count: i64,
    pub wrong_count: i64,
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl ReviewAggregate {
    /// Aggregate of a word that has never been reviewed.
    pub fn empty(word_id: i64) -> Self {
        Self {
            word_id,
            correct_count: 0,
            wrong_count: 0,
            last_reviewed: None,
        }
    }

    pub fn total(&self) -> i64 {
        self.correct_count + self.wrong_count
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyProgress {
    pub total_words_studied: i64,
    pub total_available_words: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickStats {
    pub total_words: i64,
    pub total_groups: i64,
    pub total_study_sessions: i64,
    /// Share of correct review items, 0.0 when nothing was reviewed.
    pub success_rate: f64,
}
