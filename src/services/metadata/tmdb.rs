/// TMDB metadata provider
///
/// API Flow:
/// 1. Title Search: /search/movie?include_adult=false → ranked summaries
/// 2. Details: /movie/{id}?append_to_response=videos,credits → full record
///
/// Both calls go through the optional Redis response cache.
use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::{AppError, AppResult},
    models::{Movie, MovieId, SearchPage, TmdbMovieDetails, TmdbSearchResponse},
    services::metadata::MovieCatalog,
};
use reqwest::{Client as HttpClient, StatusCode};

const DETAIL_APPENDS: &str = "videos,credits";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl TmdbProvider {
    pub fn new(
        http_client: HttpClient,
        api_key: String,
        api_url: String,
        cache: Option<Cache>,
        cache_ttl: u64,
    ) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl,
        }
    }

    async fn request_search(&self, query: &str) -> AppResult<SearchPage> {
        let url = format!("{}/search/movie", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("include_adult", "false"),
            ])
            .send()
            .await
            .map_err(AppError::metadata)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::MetadataUnavailable(format!(
                "TMDB search returned status {}: {}",
                status, body
            )));
        }

        let raw: TmdbSearchResponse = response.json().await.map_err(AppError::metadata)?;
        let page = SearchPage::from(raw);

        tracing::info!(
            query = %query,
            results = page.results.len(),
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(page)
    }

    async fn request_movie(&self, id: MovieId) -> AppResult<Movie> {
        let url = format!("{}/movie/{}", self.api_url, id);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("append_to_response", DETAIL_APPENDS),
            ])
            .send()
            .await
            .map_err(AppError::metadata)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Movie {} not found", id)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::MetadataUnavailable(format!(
                "TMDB movie lookup returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await.map_err(AppError::metadata)?;
        let details: TmdbMovieDetails = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                movie_id = id,
                "Failed to deserialize TMDB movie response"
            );
            AppError::MetadataUnavailable(format!("Failed to parse TMDB response: {}", e))
        })?;

        let movie = Movie::from(details);

        tracing::info!(
            movie_id = id,
            title = %movie.title,
            videos = movie.videos.as_ref().map_or(0, |v| v.results.len()),
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(movie)
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbProvider {
    async fn search_movies(&self, query: &str) -> AppResult<SearchPage> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache.as_ref(),
            CacheKey::MovieSearch(query.to_string()),
            self.cache_ttl,
            self.request_search(query)
        )
    }

    async fn fetch_movie(&self, id: MovieId) -> AppResult<Movie> {
        cached!(
            self.cache.as_ref(),
            CacheKey::MovieDetails(id),
            self.cache_ttl,
            self.request_movie(id)
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
