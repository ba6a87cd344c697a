use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Movie, MovieId, SearchPage, Video},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    query: Option<String>,
}

/// Movie record plus the values a detail page renders directly
#[derive(Debug, Serialize)]
pub struct MovieDetailsResponse {
    #[serde(flatten)]
    pub movie: Movie,
    pub trailer: Option<Video>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub release_year: Option<i32>,
}

impl From<Movie> for MovieDetailsResponse {
    fn from(movie: Movie) -> Self {
        Self {
            trailer: movie.trailer().cloned(),
            poster_url: movie.poster_url(),
            backdrop_url: movie.backdrop_url(),
            release_year: movie.release_year(),
            movie,
        }
    }
}

/// Handler for movie search endpoint
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> AppResult<Json<SearchPage>> {
    let Query(params) = params?;
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Query is required".to_string()))?;

    tracing::info!(request_id = %request_id, query = %query, "Searching movies");

    let page = state.catalog.search_movies(query).await?;
    Ok(Json(page))
}

/// Handler for movie detail endpoint
pub async fn details(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<MovieId>, PathRejection>,
) -> AppResult<Json<MovieDetailsResponse>> {
    let Path(id) = id?;
    tracing::info!(request_id = %request_id, movie_id = id, "Fetching movie details");

    let movie = state.catalog.fetch_movie(id).await?;
    Ok(Json(MovieDetailsResponse::from(movie)))
}
