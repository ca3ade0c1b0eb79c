use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use lang_portal::seed::{bootstrap, ActivitySeed, BootstrapOptions, CategorySeed, SeedData, WordSeed};
use lang_portal::server;
use lang_portal::store::Database;
use serde_json::Value;
use tempfile::TempDir;

fn word(english: &str, spanish: &str) -> WordSeed {
    WordSeed {
        english: english.to_string(),
        spanish: spanish.to_string(),
    }
}

/// Adjectives [big], Verbs [eat] and one activity, served from a fresh store.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub fn create_test_app() -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("words.db")).unwrap();

    let data = SeedData {
        categories: vec![
            CategorySeed {
                group: "Adjectives".to_string(),
                description: None,
                words: vec![word("big", "grande")],
            },
            CategorySeed {
                group: "Verbs".to_string(),
                description: None,
                words: vec![word("eat", "comer")],
            },
        ],
        activities: vec![ActivitySeed {
            name: "Typing Tutor".to_string(),
            url: "http://localhost:8080".to_string(),
            preview_url: None,
        }],
        sessions: vec![],
    };
    bootstrap(&db, &data, &BootstrapOptions::default()).unwrap();

    (dir, server::router(db, true))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
