//! Configuration module for the language portal.
//!
//! Handles loading and saving application settings.

mod settings;

pub use settings::{
    CategorySettings, DatabaseSettings, GeneralSettings, SeedSettings, ServerSettings, Settings,
};
