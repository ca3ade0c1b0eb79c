//! Request handlers.

use super::extract::{ApiJson, ApiPath};
use super::{blocking, ApiError, AppState};
use crate::store::query::parse_page;
use crate::store::{
    Group, GroupRef, Page, QuickStats, ReviewInput, ReviewItem, SessionDetail, SessionSummary,
    StudyActivity, StudyProgress, StudySession, Word, WordDetail, WordListQuery, WordPage,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

type ApiResult<T> = Result<Json<T>, ApiError>;

// === Request/Response Types ===

/// Raw listing parameters; normalized by [`WordListQuery::from_raw`].
#[derive(Deserialize)]
pub(super) struct WordsParams {
    page: Option<String>,
    sort_by: Option<String>,
    order: Option<String>,
    group: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct PageParams {
    page: Option<String>,
}

#[derive(Serialize)]
pub(super) struct RawWordsResponse {
    words: Vec<Word>,
}

#[derive(Deserialize)]
pub(super) struct CreateSessionRequest {
    group_id: i64,
    study_activity_id: i64,
}

/// Either one answer or a batch under `reviews`.
#[derive(Deserialize)]
#[serde(untagged)]
pub(super) enum ReviewPayload {
    Batch { reviews: Vec<ReviewInput> },
    Single(ReviewInput),
}

#[derive(Serialize)]
pub(super) struct ReviewResponse {
    session_id: i64,
    recorded: usize,
    items: Vec<ReviewItem>,
}

// === Handlers ===

pub(super) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub(super) async fn list_words(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WordsParams>,
) -> ApiResult<WordPage> {
    let query = WordListQuery::from_raw(
        params.page.as_deref(),
        params.sort_by.as_deref(),
        params.order.as_deref(),
        params.group.as_deref(),
    );
    let page = blocking(&state, move |db| db.list_words(&query)).await?;
    Ok(Json(page))
}

pub(super) async fn get_word(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<WordDetail> {
    let word = blocking(&state, move |db| db.get_word(id)).await?;
    Ok(Json(word))
}

pub(super) async fn list_groups(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> ApiResult<Page<Group>> {
    let page = parse_page(params.page.as_deref());
    let groups = blocking(&state, move |db| db.list_groups(page)).await?;
    Ok(Json(groups))
}

pub(super) async fn get_group(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Group> {
    let group = blocking(&state, move |db| db.get_group(id)).await?;
    Ok(Json(group))
}

pub(super) async fn group_words_raw(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<RawWordsResponse> {
    let words = blocking(&state, move |db| db.group_words_raw(&GroupRef::Id(id))).await?;
    Ok(Json(RawWordsResponse { words }))
}

pub(super) async fn list_activities(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<StudyActivity>> {
    let activities = blocking(&state, |db| db.list_activities()).await?;
    Ok(Json(activities))
}

pub(super) async fn get_activity(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StudyActivity> {
    let activity = blocking(&state, move |db| db.get_activity(id)).await?;
    Ok(Json(activity))
}

pub(super) async fn activity_sessions(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    Query(params): Query<PageParams>,
) -> ApiResult<Page<SessionSummary>> {
    let page = parse_page(params.page.as_deref());
    let sessions = blocking(&state, move |db| db.activity_sessions(id, page)).await?;
    Ok(Json(sessions))
}

pub(super) async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> ApiResult<Page<SessionSummary>> {
    let page = parse_page(params.page.as_deref());
    let sessions = blocking(&state, move |db| db.list_sessions(page)).await?;
    Ok(Json(sessions))
}

pub(super) async fn create_session(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateSessionRequest>,
) -> Result<(StatusCode, Json<StudySession>), ApiError> {
    let session = blocking(&state, move |db| {
        db.create_session(req.group_id, req.study_activity_id)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub(super) async fn get_session(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<SessionDetail> {
    let session = blocking(&state, move |db| db.get_session(id)).await?;
    Ok(Json(session))
}

pub(super) async fn record_review(
    State(state): State<Arc<AppState>>,
    ApiPath(session_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ReviewPayload>,
) -> ApiResult<ReviewResponse> {
    let items = blocking(&state, move |db| match payload {
        ReviewPayload::Single(review) => db
            .record_review(session_id, review.word_id, review.correct)
            .map(|item| vec![item]),
        ReviewPayload::Batch { reviews } => db.record_reviews(session_id, &reviews),
    })
    .await?;

    Ok(Json(ReviewResponse {
        session_id,
        recorded: items.len(),
        items,
    }))
}

pub(super) async fn last_session(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Option<SessionSummary>> {
    let session = blocking(&state, |db| db.last_session()).await?;
    Ok(Json(session))
}

pub(super) async fn study_progress(State(state): State<Arc<AppState>>) -> ApiResult<StudyProgress> {
    let progress = blocking(&state, |db| db.study_progress()).await?;
    Ok(Json(progress))
}

pub(super) async fn quick_stats(State(state): State<Arc<AppState>>) -> ApiResult<QuickStats> {
    let stats = blocking(&state, |db| db.quick_stats()).await?;
    Ok(Json(stats))
}
