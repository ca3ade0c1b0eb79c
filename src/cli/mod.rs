//! CLI module for the language portal.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Lang Portal - Spanish vocabulary and study-session backend
///
/// Seeds a local vocabulary store, records study sessions, and serves it all
/// over a JSON API for the practice front-ends.
#[derive(Parser, Debug)]
#[command(name = "lang-portal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Populate the store from the seed files
    Seed {
        /// Drop and recreate every table first
        #[arg(long)]
        reset: bool,

        /// Seed directory (overrides seed.dir)
        #[arg(short, long)]
        dir: Option<String>,

        /// Sample-session script to replay (overrides seed.sessions_file)
        #[arg(long)]
        sessions: Option<String>,

        /// Also link every word into a catch-all group with this name
        #[arg(long)]
        all_words: Option<String>,
    },

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List words with their review counts
    Words {
        /// Page number (50 words per page)
        #[arg(short, long)]
        page: Option<String>,

        /// Sort column (english, spanish, correct_count, wrong_count)
        #[arg(short, long)]
        sort_by: Option<String>,

        /// Sort direction (asc, desc)
        #[arg(short, long)]
        order: Option<String>,

        /// Only words in this group
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Show one word with its groups
    Word {
        /// Word id
        id: i64,
    },

    /// Recompute every review aggregate from the review log
    Rebuild,

    /// Check configuration and store consistency
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
