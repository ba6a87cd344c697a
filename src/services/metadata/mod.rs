/// Movie metadata catalog abstraction
///
/// The resolver and the movie routes only see this trait, so the TMDB
/// provider can be swapped for a fake in tests.
use crate::{
    error::AppResult,
    models::{Movie, MovieId, SearchPage},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Search movies by title
    ///
    /// Adult titles are always excluded. Results keep the upstream relevance
    /// order; an unknown title yields an empty page, not an error.
    async fn search_movies(&self, query: &str) -> AppResult<SearchPage>;

    /// Fetch a full movie record, with videos and credits embedded
    ///
    /// Fails with `NotFound` for an unknown id and `MetadataUnavailable` when
    /// the service cannot be reached.
    async fn fetch_movie(&self, id: MovieId) -> AppResult<Movie>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
