//! Store bootstrap from static seed files.
//!
//! Seeding happens in two phases. [`SeedData::load`] reads and parses every
//! input file up front, so a missing or malformed file is reported before
//! the store is opened. [`bootstrap`] then applies the parsed data inside a
//! single transaction.

mod bootstrap;

pub use bootstrap::{bootstrap, BootstrapOptions, BootstrapReport};

use crate::config::SeedSettings;
use crate::error::{PortalError, Result};
use crate::store::GroupRef;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One entry of a word list file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSeed {
    pub english: String,
    pub spanish: String,
}

/// Words destined for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySeed {
    pub group: String,
    pub description: Option<String>,
    pub words: Vec<WordSeed>,
}

/// One entry of the study activities file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySeed {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub preview_url: Option<String>,
}

/// A word in a sample script, by id or by its English text.
///
/// English text resolves to the lowest word id with that text, so scripts
/// need not know the order words were inserted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WordRef {
    Id(i64),
    English(String),
}

impl fmt::Display for WordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordRef::Id(id) => write!(f, "{}", id),
            WordRef::English(english) => write!(f, "{}", english),
        }
    }
}

/// A recorded answer inside a sample session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSeed {
    #[serde(alias = "word_id")]
    pub word: WordRef,
    pub correct: bool,
    /// Defaults to the session's own timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A sample session replayed with a fixed id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSeed {
    /// Explicit id for clients that expect a known session; assigned when absent.
    #[serde(default)]
    pub id: Option<i64>,
    /// Group id or group name.
    pub group: GroupRef,
    pub study_activity_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reviews: Vec<ReviewSeed>,
}

/// Everything a bootstrap run inserts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedData {
    pub categories: Vec<CategorySeed>,
    pub activities: Vec<ActivitySeed>,
    pub sessions: Vec<SessionSeed>,
}

impl SeedData {
    /// Read all seed files named by `settings` from `dir`.
    ///
    /// `sessions_file` overrides the configured sample-session script and is
    /// taken as given rather than relative to `dir`.
    pub fn load(settings: &SeedSettings, dir: &Path, sessions_file: Option<&Path>) -> Result<Self> {
        let mut categories = Vec::with_capacity(settings.categories.len());
        for category in &settings.categories {
            let words: Vec<WordSeed> = read_json(&dir.join(&category.file))?;
            debug!("Loaded {} words for {}", words.len(), category.group);
            categories.push(CategorySeed {
                group: category.group.clone(),
                description: category.description.clone(),
                words,
            });
        }

        let activities: Vec<ActivitySeed> = read_json(&dir.join(&settings.activities_file))?;

        let sessions_path: Option<PathBuf> = match sessions_file {
            Some(path) => Some(path.to_path_buf()),
            None => settings.sessions_file.as_ref().map(|f| dir.join(f)),
        };
        let sessions: Vec<SessionSeed> = match sessions_path {
            Some(path) => read_json(&path)?,
            None => Vec::new(),
        };

        let data = Self {
            categories,
            activities,
            sessions,
        };
        info!(
            "Loaded seed data: {} words in {} categories, {} activities, {} sample sessions",
            data.word_count(),
            data.categories.len(),
            data.activities.len(),
            data.sessions.len()
        );
        Ok(data)
    }

    /// Word entries across all categories, duplicates included.
    pub fn word_count(&self) -> usize {
        self.categories.iter().map(|c| c.words.len()).sum()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let seed_error = |reason: String| PortalError::Seed {
        file: path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| seed_error(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| seed_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategorySettings;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn write_defaults(dir: &Path) {
        write(dir, "data_adjectives.json", r#"[{"english": "big", "spanish": "grande"}]"#);
        write(dir, "data_verbs.json", r#"[{"english": "eat", "spanish": "comer"}]"#);
        write(
            dir,
            "study_activities.json",
            r#"[{"name": "Typing Tutor", "url": "http://localhost:8080", "preview_url": "/img/typing.png"}]"#,
        );
    }

    #[test]
    fn test_load_default_layout() {
        let dir = tempfile::tempdir().unwrap();
        write_defaults(dir.path());

        let data = SeedData::load(&SeedSettings::default(), dir.path(), None).unwrap();
        assert_eq!(data.categories.len(), 2);
        assert_eq!(data.categories[0].group, "Adjectives");
        assert_eq!(data.categories[1].words[0].spanish, "comer");
        assert_eq!(
            data.activities[0].preview_url.as_deref(),
            Some("/img/typing.png")
        );
        assert!(data.sessions.is_empty());
        assert_eq!(data.word_count(), 2);
    }

    #[test]
    fn test_missing_file_names_it() {
        let dir = tempfile::tempdir().unwrap();
        write_defaults(dir.path());
        std::fs::remove_file(dir.path().join("data_verbs.json")).unwrap();

        let err = SeedData::load(&SeedSettings::default(), dir.path(), None).unwrap_err();
        match err {
            PortalError::Seed { file, .. } => assert!(file.ends_with("data_verbs.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_json_is_seed_error() {
        let dir = tempfile::tempdir().unwrap();
        write_defaults(dir.path());
        write(dir.path(), "study_activities.json", r#"[{"name": "No url"}]"#);

        let err = SeedData::load(&SeedSettings::default(), dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("study_activities.json"));
    }

    #[test]
    fn test_sample_sessions_from_settings_and_override() {
        let dir = tempfile::tempdir().unwrap();
        write_defaults(dir.path());
        write(
            dir.path(),
            "sessions.json",
            r#"[{"id": 1, "group": "Verbs", "study_activity_id": 1,
                 "created_at": "2025-02-01T10:00:00Z",
                 "reviews": [{"word_id": 2, "correct": true},
                             {"word": "eat", "correct": false}]}]"#,
        );

        let settings = SeedSettings {
            sessions_file: Some("sessions.json".to_string()),
            categories: vec![CategorySettings {
                group: "Verbs".to_string(),
                file: "data_verbs.json".to_string(),
                description: Some("Common verbs".to_string()),
            }],
            ..SeedSettings::default()
        };
        let data = SeedData::load(&settings, dir.path(), None).unwrap();
        assert_eq!(data.sessions.len(), 1);
        assert_eq!(data.sessions[0].group, GroupRef::Name("Verbs".to_string()));
        assert_eq!(data.sessions[0].reviews[0].created_at, None);
        assert_eq!(data.sessions[0].reviews[0].word, WordRef::Id(2));
        assert_eq!(
            data.sessions[0].reviews[1].word,
            WordRef::English("eat".to_string())
        );
        assert_eq!(data.categories[0].description.as_deref(), Some("Common verbs"));

        let other = tempfile::tempdir().unwrap();
        let override_path = other.path().join("replay.json");
        std::fs::write(&override_path, "[]").unwrap();
        let data = SeedData::load(&settings, dir.path(), Some(&override_path)).unwrap();
        assert!(data.sessions.is_empty());
    }
}
