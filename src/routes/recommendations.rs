use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::Datelike;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{Movie, PreferenceSet},
    routes::AppState,
    services::inference::ParseKind,
};

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize)]
pub struct CandidatesResponse {
    pub titles: Vec<String>,
    pub parse: ParseKind,
}

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    prefs: Result<Json<PreferenceSet>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(prefs) = prefs?;
    prefs.validate(current_year())?;

    tracing::info!(
        request_id = %request_id,
        mood = %prefs.mood,
        genre = %prefs.genre,
        industry = %prefs.industry,
        content_type = %prefs.content_type,
        "Processing recommendation request"
    );

    let movies = state.resolver.resolve(&prefs).await?;

    tracing::info!(
        request_id = %request_id,
        movies = movies.len(),
        "Recommendation request completed"
    );

    Ok(Json(RecommendationResponse { movies }))
}

/// Handler for the inference-only endpoint: candidate titles, unresolved
pub async fn candidates(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    prefs: Result<Json<PreferenceSet>, JsonRejection>,
) -> AppResult<Json<CandidatesResponse>> {
    let Json(prefs) = prefs?;
    prefs.validate(current_year())?;

    let parsed = state.resolver.candidates(&prefs).await?;

    tracing::info!(
        request_id = %request_id,
        parse = ?parsed.kind(),
        candidates = parsed.titles().len(),
        "Candidate request completed"
    );

    Ok(Json(CandidatesResponse {
        parse: parsed.kind(),
        titles: parsed.into_titles(),
    }))
}
