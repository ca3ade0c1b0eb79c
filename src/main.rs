//! Lang Portal CLI entry point.

use anyhow::Result;
use clap::Parser;
use lang_portal::cli::{commands, Cli, Commands};
use lang_portal::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = Settings::config_path(cli.config.as_deref());
    let settings = Settings::load_from(Some(&config_path))?;

    // Initialize logging; -v flags win over the configured level
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("lang_portal={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Ensure data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match &cli.command {
        Commands::Seed {
            reset,
            dir,
            sessions,
            all_words,
        } => {
            commands::run_seed(*reset, dir.clone(), sessions.clone(), all_words.clone(), &settings)?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Words {
            page,
            sort_by,
            order,
            group,
        } => {
            commands::run_words(
                page.as_deref(),
                sort_by.as_deref(),
                order.as_deref(),
                group.as_deref(),
                &settings,
            )?;
        }

        Commands::Word { id } => {
            commands::run_word(*id, &settings)?;
        }

        Commands::Rebuild => {
            commands::run_rebuild(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&config_path, &settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &config_path, &settings)?;
        }
    }

    Ok(())
}
