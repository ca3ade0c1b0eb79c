//! Doctor command - verify configuration and store consistency.

use crate::cli::Output;
use crate::config::Settings;
use crate::store::{schema, Database};
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(config_path: &Path, settings: &Settings) -> anyhow::Result<()> {
    Output::header("Lang Portal Doctor");
    println!();
    println!("Checking configuration and store...\n");

    let mut checks = Vec::new();

    println!("{}", style("Configuration").bold());
    let config_checks = vec![check_config_file(config_path), check_seed_dir(settings)];
    for check in &config_checks {
        check.print();
    }
    checks.extend(config_checks);

    println!();

    println!("{}", style("Store").bold());
    let store_checks = check_store(&Database::at(&settings.database_path()));
    for check in &store_checks {
        check.print();
    }
    checks.extend(store_checks);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!("{} error(s) found.", errors));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! The store is consistent.");
    }

    Ok(())
}

/// Check if config file exists.
fn check_config_file(path: &Path) -> CheckResult {
    if path.exists() {
        CheckResult::ok("Config file", &format!("{}", path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: lang-portal config edit",
        )
    }
}

fn check_seed_dir(settings: &Settings) -> CheckResult {
    let dir = settings.seed_dir();
    if !dir.is_dir() {
        return CheckResult::warning(
            "Seed directory",
            &format!("{} (missing)", dir.display()),
            "Set seed.dir or pass --dir to `lang-portal seed`",
        );
    }

    let missing: Vec<&str> = settings
        .seed
        .categories
        .iter()
        .map(|c| c.file.as_str())
        .chain(std::iter::once(settings.seed.activities_file.as_str()))
        .filter(|f| !dir.join(f).exists())
        .collect();

    if missing.is_empty() {
        CheckResult::ok("Seed directory", &format!("{}", dir.display()))
    } else {
        CheckResult::warning(
            "Seed directory",
            &format!("missing {}", missing.join(", ")),
            "Seeding will fail until these files exist",
        )
    }
}

/// Check the database file, its schema and the review aggregates.
fn check_store(db: &Database) -> Vec<CheckResult> {
    let mut results = Vec::new();

    if !db.exists() {
        results.push(CheckResult::warning(
            "Database",
            &format!("{} (not created yet)", db.path().display()),
            "Create with: lang-portal seed",
        ));
        return results;
    }

    let size = std::fs::metadata(db.path())
        .map(|m| format_size(m.len()))
        .unwrap_or_else(|_| "unknown size".to_string());
    results.push(CheckResult::ok(
        "Database",
        &format!("{} ({})", db.path().display(), size),
    ));

    let tables = db
        .connect()
        .and_then(|conn| schema::existing_tables(&conn));
    match tables {
        Ok(tables) => {
            let missing: Vec<&str> = schema::TABLES
                .iter()
                .copied()
                .filter(|t| !tables.iter().any(|e| e == t))
                .collect();
            if missing.is_empty() {
                results.push(CheckResult::ok(
                    "Schema",
                    &format!("{} tables present", schema::TABLES.len()),
                ));
            } else {
                results.push(CheckResult::error(
                    "Schema",
                    &format!("missing {}", missing.join(", ")),
                    "Recreate with: lang-portal seed --reset",
                ));
                return results;
            }
        }
        Err(e) => {
            results.push(CheckResult::error(
                "Schema",
                &format!("unreadable: {}", e),
                "Is this a Lang Portal database?",
            ));
            return results;
        }
    }

    results.push(match db.foreign_key_violations() {
        Ok(0) => CheckResult::ok("Foreign keys", "no violations"),
        Ok(n) => CheckResult::error(
            "Foreign keys",
            &format!("{} violating row(s)", n),
            "Recreate with: lang-portal seed --reset",
        ),
        Err(e) => CheckResult::error("Foreign keys", &format!("error: {}", e), "Check the database file"),
    });

    results.push(match db.check_aggregates() {
        Ok(stale) if stale.is_empty() => CheckResult::ok("Review aggregates", "consistent"),
        Ok(stale) => CheckResult::warning(
            "Review aggregates",
            &format!("{} word(s) out of date", stale.len()),
            "Fix with: lang-portal rebuild",
        ),
        Err(e) => CheckResult::error(
            "Review aggregates",
            &format!("error: {}", e),
            "Check the database file",
        ),
    });

    results
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
