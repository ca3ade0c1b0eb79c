//! Serve command - run the HTTP API.

use crate::cli::Output;
use crate::config::Settings;
use crate::server;
use crate::store::Database;
use tracing::info;

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let db_path = settings.database_path();
    if !db_path.exists() {
        Output::warning(&format!(
            "{} does not exist yet; serving an empty store (run `lang-portal seed` first)",
            db_path.display()
        ));
    }
    let db = Database::open(&db_path)?;
    let app = server::router(db, settings.server.cors);

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    Output::header("Lang Portal API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    Output::kv("Database", &db_path.display().to_string());
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Words", "GET  /api/words, /api/words/{id}");
    Output::kv("Groups", "GET  /api/groups, /api/groups/{id}, /api/groups/{id}/words/raw");
    Output::kv("Activities", "GET  /api/study_activities, /api/study_activities/{id}");
    Output::kv("Sessions", "GET  /api/study_sessions, /api/study_sessions/{id}");
    Output::kv("New session", "POST /api/study_sessions");
    Output::kv("Review", "POST /api/study_sessions/{id}/review");
    Output::kv(
        "Dashboard",
        "GET  /api/dashboard/last_study_session, study_progress, quick_stats",
    );
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}
