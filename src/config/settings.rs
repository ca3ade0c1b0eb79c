//! Configuration settings for the language portal.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub seed: SeedSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.lang-portal".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Relational store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file.
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "~/.lang-portal/words.db".to_string(),
        }
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allow cross-origin requests from any origin (front-ends run on other ports).
    pub cors: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors: true,
        }
    }
}

/// One vocabulary category: a seed file whose words all land in one group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySettings {
    /// Group name the category's words are linked into.
    pub group: String,
    /// Word list file, relative to the seed directory.
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Bootstrap input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedSettings {
    /// Directory holding the seed JSON files.
    pub dir: String,
    /// Word list files, one per group.
    pub categories: Vec<CategorySettings>,
    /// Study activity definitions, relative to the seed directory.
    pub activities_file: String,
    /// Optional sample-session script replayed after seeding.
    pub sessions_file: Option<String>,
    /// Optional catch-all group every seeded word is also linked into.
    pub all_words_group: Option<String>,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            dir: "seed".to_string(),
            categories: vec![
                CategorySettings {
                    group: "Adjectives".to_string(),
                    file: "data_adjectives.json".to_string(),
                    description: None,
                },
                CategorySettings {
                    group: "Verbs".to_string(),
                    file: "data_verbs.json".to_string(),
                    description: None,
                },
            ],
            activities_file: "study_activities.json".to_string(),
            sessions_file: None,
            all_words_group: None,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::PortalError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lang-portal")
            .join("config.toml")
    }

    /// Config file named by `--config`, or the default location.
    pub fn config_path(flag: Option<&str>) -> PathBuf {
        flag.map(Self::expand_path)
            .unwrap_or_else(Self::default_config_path)
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded database path.
    pub fn database_path(&self) -> PathBuf {
        Self::expand_path(&self.database.path)
    }

    /// Get the expanded seed directory path.
    pub fn seed_dir(&self) -> PathBuf {
        Self::expand_path(&self.seed.dir)
    }
}
