//! Lang Portal - Spanish vocabulary and study-session backend
//!
//! A local-first store for a language-learning portal: word lists grouped by
//! category, study activities, study sessions, and the per-word review history
//! recorded while practising.
//!
//! # Overview
//!
//! Lang Portal allows you to:
//! - Seed a SQLite store from static JSON word lists
//! - Browse words with their review counters, sorted and paged
//! - Record study sessions and the answers given in them
//! - Serve everything over a JSON API for the practice front-ends
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `store` - SQLite schema, queries and review aggregation
//! - `seed` - Loading seed files and bootstrapping the store
//! - `server` - HTTP API
//! - `cli` - Command-line front-end
//!
//! # Example
//!
//! ```rust,no_run
//! use lang_portal::config::Settings;
//! use lang_portal::seed::{bootstrap, BootstrapOptions, SeedData};
//! use lang_portal::store::{Database, WordListQuery};
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let db = Database::open(&settings.database_path())?;
//!
//!     let data = SeedData::load(&settings.seed, &settings.seed_dir(), None)?;
//!     bootstrap(&db, &data, &BootstrapOptions::default())?;
//!
//!     let page = db.list_words(&WordListQuery::default())?;
//!     println!("{} words in the store", page.total_words);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod seed;
pub mod server;
pub mod store;

pub use error::{PortalError, Result};
