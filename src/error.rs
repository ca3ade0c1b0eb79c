//! Error types for the language portal.

use thiserror::Error;

/// Library-level error type for portal operations.
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A requested record does not exist. Displays as e.g. "Word not found".
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Seed file {file}: {reason}")]
    Seed { file: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PortalError {
    /// Build a not-found error for the given entity and identifier.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        PortalError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortalError::NotFound { .. })
    }
}

/// Result type alias for portal operations.
pub type Result<T> = std::result::Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = PortalError::not_found("Word", 42);
        assert_eq!(err.to_string(), "Word not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_seed_message_names_file() {
        let err = PortalError::Seed {
            file: "seed/data_verbs.json".to_string(),
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert!(err.to_string().contains("data_verbs.json"));
        assert!(!err.is_not_found());
    }
}
