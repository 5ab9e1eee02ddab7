use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        request::MAX_SUGGESTIONS, Candidate, ChatTurn, ContentType, RatingTier, RecommendedTitle,
        SuggestionRequest,
    },
    notice::{Notice, Notices},
    services::recommendations,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse<T> {
    pub results: Vec<T>,
    pub notices: Notices,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub year: Option<i32>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub rating: RatingTier,
}

#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub title: RecommendedTitle,
    pub notices: Notices,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    pub session_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReplyResponse {
    pub session_id: Uuid,
    pub reply: String,
    pub notices: Notices,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub session_id: Uuid,
    pub transcript: Vec<ChatTurn>,
}

// Handlers

/// Health check endpoint, including configuration problems found at startup
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        notices: state.startup_notices.as_ref().clone(),
    })
}

/// Model-driven recommendations for the search form
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SuggestionRequest>,
) -> AppResult<Json<ResultsResponse<RecommendedTitle>>> {
    request.validate()?;

    tracing::info!(
        request_id = %request_id,
        genre = %request.genre,
        industry = %request.industry,
        count = request.count,
        "Processing recommendation request"
    );

    let mut notices = Notices::new();
    let results = recommendations::recommend(
        &state.suggestions,
        &state.metadata,
        &state.posters,
        &request,
        &mut notices,
    )
    .await;

    Ok(Json(ResultsResponse { results, notices }))
}

/// Catalogue search with an optional rating tier
pub async fn search_titles(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<ResultsResponse<Candidate>>> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }
    let limit = params
        .limit
        .unwrap_or(MAX_SUGGESTIONS as usize)
        .clamp(1, MAX_SUGGESTIONS as usize);

    tracing::info!(
        request_id = %request_id,
        query = %query,
        limit,
        rating = %params.rating,
        "Processing title search"
    );

    let mut notices = Notices::new();
    let results = recommendations::discover(
        &state.metadata,
        query,
        params.year,
        limit,
        params.content_type,
        params.rating,
        &mut notices,
    )
    .await;

    Ok(Json(ResultsResponse { results, notices }))
}

/// Detail view for a single title
pub async fn get_title(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> AppResult<Json<TitleResponse>> {
    if external_id.is_empty() || !external_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::InvalidInput(format!(
            "Invalid title id: {}",
            external_id
        )));
    }

    let mut notices = Notices::new();
    let title =
        recommendations::title_details(&state.metadata, &state.posters, &external_id, &mut notices)
            .await;

    Ok(Json(TitleResponse { title, notices }))
}

/// Start an empty chat session
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let (session_id, _) = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionResponse { session_id }))
}

/// Submit a chat message, creating the session on first use
pub async fn post_message(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ChatMessageRequest>,
) -> AppResult<Json<ChatReplyResponse>> {
    if request.message.trim().is_empty() {
        return Err(AppError::InvalidInput("Message cannot be empty".to_string()));
    }

    let (session_id, session) = state.sessions.get_or_create(request.session_id).await;

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        "Processing chat message"
    );

    // Run the exchange on its own task so a dropped connection cannot leave
    // the session stuck waiting for a reply.
    let chat = state.chat.clone();
    let (reply, notices) = tokio::spawn(async move {
        let mut notices = Notices::new();
        let mut guard = session.lock().await;
        let reply = chat.submit(&mut guard, &request.message, &mut notices).await;
        (reply, notices)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(ChatReplyResponse {
        session_id,
        reply: reply?,
        notices,
    }))
}

/// Transcript of a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<TranscriptResponse>> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Chat session {}", session_id)))?;
    let transcript = session.lock().await.transcript().to_vec();

    Ok(Json(TranscriptResponse {
        session_id,
        transcript,
    }))
}

/// End a session and discard its transcript
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state.sessions.end(session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Chat session {}", session_id)))
    }
}
