//! CLI command implementations.

mod config;
mod doctor;
mod rebuild;
mod seed;
mod serve;
mod words;

pub use config::run_config;
pub use doctor::run_doctor;
pub use rebuild::run_rebuild;
pub use seed::run_seed;
pub use serve::run_serve;
pub use words::{run_word, run_words};
