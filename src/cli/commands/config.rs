//! `config` subcommand: inspect or edit the settings file.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Run the config command against the resolved config file.
pub fn run_config(action: &ConfigAction, config_path: &Path, settings: &Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", render(settings, config_path)?);
            Ok(())
        }
        ConfigAction::Edit => edit(settings, config_path),
        ConfigAction::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

/// Effective settings as TOML, headed by where they came from.
fn render(settings: &Settings, config_path: &Path) -> Result<String> {
    let source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        "built-in defaults".to_string()
    };
    let body = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
    Ok(format!("# {}\n{}", source, body))
}

/// Write the current settings to `config_path` unless a file is already there.
fn write_if_missing(settings: &Settings, config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }
    settings
        .save_to(&config_path.to_path_buf())
        .with_context(|| format!("Failed to create {}", config_path.display()))?;
    Ok(true)
}

fn edit(settings: &Settings, config_path: &Path) -> Result<()> {
    if write_if_missing(settings, config_path)? {
        Output::info(&format!("Created {}", config_path.display()));
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
    let status = Command::new(&editor)
        .arg(config_path)
        .status()
        .with_context(|| format!("Failed to launch {}", editor))?;
    if !status.success() {
        bail!("{} exited with {}", editor, status);
    }

    // the edited file must still parse
    Settings::load_from(Some(&config_path.to_path_buf()))
        .with_context(|| format!("{} is not valid settings TOML", config_path.display()))?;
    Output::success("Config saved.");
    Ok(())
}
