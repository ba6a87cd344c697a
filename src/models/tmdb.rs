use serde::Deserialize;

use super::movie::{
    CastMember, Credits, CrewMember, Genre, Movie, MovieId, MovieSummary, SearchPage, Video,
    VideoList,
};

// ============================================================================
// Raw TMDB API types
// ============================================================================

/// Response from GET /search/movie
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<TmdbSearchResult>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResult {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

/// Response from GET /movie/{id}?append_to_response=videos,credits
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub videos: Option<TmdbVideos>,
    #[serde(default)]
    pub credits: Option<TmdbCredits>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideos {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// TMDB sends "" for missing dates and taglines
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<TmdbSearchResult> for MovieSummary {
    fn from(raw: TmdbSearchResult) -> Self {
        MovieSummary {
            id: raw.id,
            title: raw.title,
            overview: raw.overview.unwrap_or_default(),
            poster_path: non_empty(raw.poster_path),
            backdrop_path: non_empty(raw.backdrop_path),
            release_date: non_empty(raw.release_date),
            vote_average: raw.vote_average,
            vote_count: raw.vote_count,
            genre_ids: raw.genre_ids,
        }
    }
}

impl From<TmdbSearchResponse> for SearchPage {
    fn from(raw: TmdbSearchResponse) -> Self {
        SearchPage {
            page: raw.page,
            results: raw.results.into_iter().map(MovieSummary::from).collect(),
            total_pages: raw.total_pages,
            total_results: raw.total_results,
        }
    }
}

impl From<TmdbMovieDetails> for Movie {
    fn from(raw: TmdbMovieDetails) -> Self {
        Movie {
            id: raw.id,
            title: raw.title,
            overview: raw.overview.unwrap_or_default(),
            poster_path: non_empty(raw.poster_path),
            backdrop_path: non_empty(raw.backdrop_path),
            release_date: non_empty(raw.release_date),
            vote_average: raw.vote_average,
            vote_count: raw.vote_count,
            genres: raw.genres,
            runtime: raw.runtime.filter(|r| *r > 0),
            tagline: non_empty(raw.tagline),
            videos: raw.videos.map(|v| VideoList { results: v.results }),
            credits: raw.credits.map(|c| Credits {
                cast: c.cast,
                crew: c.crew,
            }),
        }
    }
}
