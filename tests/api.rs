use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

use common::{create_test_app, get, json_body, post_json};

#[tokio::test]
async fn test_health() {
    let (_dir, app) = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_list_words_after_seed() {
    let (_dir, app) = create_test_app();

    let response = app.oneshot(get("/api/words")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let english: Vec<&str> = body["words"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["english"].as_str().unwrap())
        .collect();
    assert_eq!(english, vec!["big", "eat"]);
    assert_eq!(body["total_words"], 2);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["current_page"], 1);
    assert_eq!(body["words"][0]["correct_count"], 0);
}

#[tokio::test]
async fn test_malformed_listing_params_fall_back_to_defaults() {
    let (_dir, app) = create_test_app();

    let response = app
        .oneshot(get("/api/words?page=abc&sort_by=bogus&order=sideways"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["current_page"], 1);
    assert_eq!(body["words"][0]["english"], "big");
}

#[tokio::test]
async fn test_sort_descending_by_spanish() {
    let (_dir, app) = create_test_app();

    let response = app
        .oneshot(get("/api/words?sort_by=spanish&order=desc"))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["words"][0]["spanish"], "grande");
    assert_eq!(body["words"][1]["spanish"], "comer");
}

#[tokio::test]
async fn test_unknown_group_filter_is_empty() {
    let (_dir, app) = create_test_app();

    let response = app.oneshot(get("/api/words?group=Nouns")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["total_words"], 0);
    assert_eq!(body["words"], json!([]));
}

#[tokio::test]
async fn test_missing_word_is_404() {
    let (_dir, app) = create_test_app();

    let response = app.oneshot(get("/api/words/999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({ "error": "Word not found" }));
}

#[tokio::test]
async fn test_word_detail_lists_groups() {
    let (_dir, app) = create_test_app();

    let response = app.oneshot(get("/api/words/2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["english"], "eat");
    assert_eq!(body["last_reviewed"], Value::Null);
    assert_eq!(body["groups"], json!([{ "id": 2, "name": "Verbs" }]));
}

#[tokio::test]
async fn test_groups_and_raw_words() {
    let (_dir, app) = create_test_app();

    let response = app.clone().oneshot(get("/api/groups")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["total_items"], 2);
    assert_eq!(body["items"][0]["name"], "Adjectives");
    assert_eq!(body["items"][0]["word_count"], 1);

    let response = app.clone().oneshot(get("/api/groups/2/words/raw")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "words": [{ "id": 2, "english": "eat", "spanish": "comer" }] })
    );

    let response = app.oneshot(get("/api/groups/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_study_activities() {
    let (_dir, app) = create_test_app();

    let response = app.clone().oneshot(get("/api/study_activities")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body[0]["name"], "Typing Tutor");
    assert_eq!(body[0]["url"], "http://localhost:8080");

    let response = app.oneshot(get("/api/study_activities/9")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_reviews_update_word_counts() {
    let (_dir, app) = create_test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/study_sessions",
            json!({ "group_id": 2, "study_activity_id": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let session = json_body(response).await;
    let session_id = session["id"].as_i64().unwrap();

    for correct in [true, false] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/study_sessions/{}/review", session_id),
                json!({ "word_id": 2, "correct": correct }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["recorded"], 1);
    }

    let response = app.clone().oneshot(get("/api/words/2")).await.unwrap();
    let word = json_body(response).await;
    assert_eq!(word["correct_count"], 1);
    assert_eq!(word["wrong_count"], 1);
    assert!(word["last_reviewed"].is_string());

    let response = app
        .clone()
        .oneshot(get(&format!("/api/study_sessions/{}", session_id)))
        .await
        .unwrap();
    let detail = json_body(response).await;
    assert_eq!(detail["group_name"], "Verbs");
    assert_eq!(detail["activity_name"], "Typing Tutor");
    assert_eq!(detail["review_items"].as_array().unwrap().len(), 2);

    let response = app
        .oneshot(get("/api/dashboard/last_study_session"))
        .await
        .unwrap();
    let last = json_body(response).await;
    assert_eq!(last["id"], session_id);
    assert_eq!(last["correct_count"], 1);
    assert_eq!(last["wrong_count"], 1);
}

#[tokio::test]
async fn test_batch_review() {
    let (_dir, app) = create_test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/study_sessions",
            json!({ "group_id": 1, "study_activity_id": 1 }),
        ))
        .await
        .unwrap();
    let session_id = json_body(response).await["id"].as_i64().unwrap();
    let review_uri = format!("/api/study_sessions/{}/review", session_id);

    let response = app
        .clone()
        .oneshot(post_json(
            &review_uri,
            json!({ "reviews": [
                { "word_id": 1, "correct": true },
                { "word_id": 1, "correct": true },
                { "word_id": 2, "correct": false },
            ]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["recorded"], 3);

    let response = app
        .clone()
        .oneshot(get("/api/words?sort_by=correct_count&order=desc"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["words"][0]["english"], "big");
    assert_eq!(body["words"][0]["correct_count"], 2);
    assert_eq!(body["words"][1]["wrong_count"], 1);

    let response = app
        .clone()
        .oneshot(post_json(&review_uri, json!({ "reviews": [] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // one unknown word rejects the whole batch
    let response = app
        .clone()
        .oneshot(post_json(
            &review_uri,
            json!({ "reviews": [
                { "word_id": 2, "correct": true },
                { "word_id": 99, "correct": true },
            ]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/api/words/2")).await.unwrap();
    assert_eq!(json_body(response).await["correct_count"], 0);
}

#[tokio::test]
async fn test_review_for_missing_session_is_404() {
    let (_dir, app) = create_test_app();

    let response = app
        .oneshot(post_json(
            "/api/study_sessions/77/review",
            json!({ "word_id": 1, "correct": true }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Study session not found" })
    );
}

#[tokio::test]
async fn test_dashboard_on_fresh_store() {
    let (_dir, app) = create_test_app();

    let response = app
        .clone()
        .oneshot(get("/api/dashboard/last_study_session"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, Value::Null);

    let response = app
        .clone()
        .oneshot(get("/api/dashboard/study_progress"))
        .await
        .unwrap();
    assert_eq!(
        json_body(response).await,
        json!({ "total_words_studied": 0, "total_available_words": 2 })
    );

    let response = app
        .oneshot(get("/api/dashboard/quick_stats"))
        .await
        .unwrap();
    let stats = json_body(response).await;
    assert_eq!(stats["total_words"], 2);
    assert_eq!(stats["total_groups"], 2);
    assert_eq!(stats["total_study_sessions"], 0);
    assert_eq!(stats["success_rate"], 0.0);
}

#[tokio::test]
async fn test_page_far_past_the_end_is_empty() {
    let (_dir, app) = create_test_app();

    let response = app
        .clone()
        .oneshot(get("/api/words?page=9223372036854775807"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["words"], json!([]));
    assert_eq!(body["total_words"], 2);

    for uri in [
        "/api/groups?page=9223372036854775807",
        "/api/study_sessions?page=9223372036854775807",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["items"], json!([]));
    }
}

#[tokio::test]
async fn test_non_numeric_id_gets_json_error() {
    let (_dir, app) = create_test_app();

    let response = app.oneshot(get("/api/words/abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn test_malformed_body_gets_json_error() {
    let (_dir, app) = create_test_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/study_sessions", json!({ "group_id": "x" })))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
    assert!(json_body(response).await["error"].is_string());

    let response = app
        .oneshot(post_json(
            "/api/study_sessions/1/review",
            json!({ "word": "big" }),
        ))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn test_activity_sessions() {
    let (_dir, app) = create_test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/study_sessions",
            json!({ "group_id": 1, "study_activity_id": 1 }),
        ))
        .await
        .unwrap();
    let session_id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/study_activities/1/sessions"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total_items"], 1);
    assert_eq!(body["items"][0]["id"], session_id);
    assert_eq!(body["items"][0]["group_name"], "Adjectives");

    let response = app
        .oneshot(get("/api/study_activities/9/sessions"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Study activity not found" })
    );
}
