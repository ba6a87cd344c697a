use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::{
    error::AppResult,
    models::{Movie, PreferenceSet},
    services::{
        inference::{CandidateParse, TitleRecommender},
        metadata::MovieCatalog,
    },
};

/// Turns a preference set into an ordered, deduplicated list of movies
///
/// Candidate titles come from the inference service; each one is resolved
/// against the catalog by search-then-fetch. Only an unreachable inference
/// service fails a resolution. A candidate that cannot be resolved is dropped.
#[derive(Clone)]
pub struct RecommendationResolver {
    recommender: Arc<dyn TitleRecommender>,
    catalog: Arc<dyn MovieCatalog>,
}

impl RecommendationResolver {
    pub fn new(recommender: Arc<dyn TitleRecommender>, catalog: Arc<dyn MovieCatalog>) -> Self {
        Self {
            recommender,
            catalog,
        }
    }

    /// Runs the inference step alone
    pub async fn candidates(&self, prefs: &PreferenceSet) -> AppResult<CandidateParse> {
        self.recommender.infer(prefs).await
    }

    /// Runs a full resolution cycle
    pub async fn resolve(&self, prefs: &PreferenceSet) -> AppResult<Vec<Movie>> {
        let titles = self.candidates(prefs).await?.into_titles();
        if titles.is_empty() {
            tracing::info!(
                recommender = self.recommender.name(),
                "No candidate titles, nothing to resolve"
            );
            return Ok(Vec::new());
        }

        let candidate_count = titles.len();
        let resolved = self.resolve_all(titles).await;
        let movies = dedup_by_id(resolved);

        tracing::info!(
            candidates = candidate_count,
            movies = movies.len(),
            catalog = self.catalog.name(),
            "Recommendations resolved"
        );

        Ok(movies)
    }

    /// Resolves every title concurrently, keeping candidate order
    ///
    /// Each task carries its launch index and writes into that slot, so
    /// completion order has no effect on the result.
    async fn resolve_all(&self, titles: Vec<String>) -> Vec<Movie> {
        let mut slots: Vec<Option<Movie>> = vec![None; titles.len()];
        let mut tasks = JoinSet::new();

        for (index, title) in titles.into_iter().enumerate() {
            let catalog = Arc::clone(&self.catalog);
            tasks.spawn(async move { (index, resolve_candidate(&*catalog, &title).await) });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, movie)) => slots[index] = movie,
                Err(e) => tracing::error!(error = %e, "Candidate resolution task failed"),
            }
        }

        slots.into_iter().flatten().collect()
    }
}

/// Search for the title, then fetch the top hit. `None` drops the candidate.
async fn resolve_candidate(catalog: &dyn MovieCatalog, title: &str) -> Option<Movie> {
    let page = match catalog.search_movies(title).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(title = %title, error = %e, "Candidate search failed, dropping");
            return None;
        }
    };

    // Top relevance match is taken as-is, without comparing titles
    let Some(top) = page.first() else {
        tracing::warn!(title = %title, "No catalog match for candidate, dropping");
        return None;
    };

    match catalog.fetch_movie(top.id).await {
        Ok(movie) => Some(movie),
        Err(e) => {
            tracing::warn!(
                title = %title,
                movie_id = top.id,
                error = %e,
                "Candidate details fetch failed, dropping"
            );
            None
        }
    }
}

/// Keeps the first occurrence of each movie id
fn dedup_by_id(movies: Vec<Movie>) -> Vec<Movie> {
    let mut seen = HashSet::with_capacity(movies.len());
    movies.into_iter().filter(|m| seen.insert(m.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::movie::fixtures::{movie, page, summary};
    use crate::models::preferences::fixtures::happy_comedy;
    use crate::models::{MovieId, SearchPage};
    use crate::services::inference::MockTitleRecommender;
    use crate::services::metadata::MockMovieCatalog;
    use std::collections::HashMap;
    use std::time::Duration;

    fn recommender_returning(titles: &[&str]) -> MockTitleRecommender {
        let titles: Vec<String> = titles.iter().map(|t| t.to_string()).collect();
        let mut recommender = MockTitleRecommender::new();
        recommender
            .expect_infer()
            .times(1)
            .returning(move |_| Ok(CandidateParse::Parsed(titles.clone())));
        recommender.expect_name().return_const("mock");
        recommender
    }

    /// Catalog fake with per-title latency, for ordering checks
    struct SlowCatalog {
        /// title -> (movie id, search latency)
        entries: HashMap<String, (MovieId, Duration)>,
    }

    #[async_trait::async_trait]
    impl MovieCatalog for SlowCatalog {
        async fn search_movies(&self, query: &str) -> AppResult<SearchPage> {
            match self.entries.get(query) {
                Some((id, delay)) => {
                    tokio::time::sleep(*delay).await;
                    Ok(page(vec![summary(*id, query)]))
                }
                None => Ok(page(vec![])),
            }
        }

        async fn fetch_movie(&self, id: MovieId) -> AppResult<Movie> {
            Ok(movie(id, &format!("Movie {}", id)))
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    fn ids(movies: &[Movie]) -> Vec<MovieId> {
        movies.iter().map(|m| m.id).collect()
    }

    // Paused clock: sleeps advance virtual time, so elapsed is the critical path
    #[tokio::test(start_paused = true)]
    async fn test_order_follows_candidates_not_completion() {
        let catalog = SlowCatalog {
            entries: HashMap::from([
                ("A".to_string(), (1, Duration::from_millis(120))),
                ("B".to_string(), (2, Duration::from_millis(60))),
                ("C".to_string(), (3, Duration::from_millis(5))),
            ]),
        };
        let resolver = RecommendationResolver::new(
            Arc::new(recommender_returning(&["A", "B", "C"])),
            Arc::new(catalog),
        );

        let started = tokio::time::Instant::now();
        let movies = resolver.resolve(&happy_comedy()).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(ids(&movies), vec![1, 2, 3]);
        // Sequential lookups would take 185ms; concurrent ones finish with the slowest
        assert!(elapsed >= Duration::from_millis(120), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(150), "elapsed {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_duplicate_ids_keep_earliest_position() {
        let catalog = SlowCatalog {
            entries: HashMap::from([
                ("The Office".to_string(), (10, Duration::from_millis(50))),
                ("Parks and Rec".to_string(), (20, Duration::from_millis(1))),
                ("Office, The".to_string(), (10, Duration::from_millis(1))),
            ]),
        };
        let resolver = RecommendationResolver::new(
            Arc::new(recommender_returning(&["The Office", "Parks and Rec", "Office, The"])),
            Arc::new(catalog),
        );

        let movies = resolver.resolve(&happy_comedy()).await.unwrap();
        assert_eq!(ids(&movies), vec![10, 20]);
    }

    #[tokio::test]
    async fn test_unmatched_candidate_is_dropped() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search_movies()
            .returning(|query| match query {
                "A" => Ok(page(vec![summary(1, "A")])),
                "C" => Ok(page(vec![summary(3, "C")])),
                _ => Ok(page(vec![])),
            });
        catalog
            .expect_fetch_movie()
            .times(2)
            .returning(|id| Ok(movie(id, "resolved")));
        catalog.expect_name().return_const("mock");

        let resolver = RecommendationResolver::new(
            Arc::new(recommender_returning(&["A", "B", "C"])),
            Arc::new(catalog),
        );

        let movies = resolver.resolve(&happy_comedy()).await.unwrap();
        assert_eq!(ids(&movies), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_metadata_failures_are_isolated() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search_movies()
            .returning(|query| match query {
                "Down" => Err(AppError::MetadataUnavailable("timeout".to_string())),
                "Gone" => Ok(page(vec![summary(404, "Gone")])),
                _ => Ok(page(vec![summary(7, "Fine"), summary(8, "Other")])),
            });
        catalog.expect_fetch_movie().returning(|id| match id {
            404 => Err(AppError::NotFound("movie 404".to_string())),
            _ => Ok(movie(id, "Fine")),
        });
        catalog.expect_name().return_const("mock");

        let resolver = RecommendationResolver::new(
            Arc::new(recommender_returning(&["Down", "Fine", "Gone"])),
            Arc::new(catalog),
        );

        let movies = resolver.resolve(&happy_comedy()).await.unwrap();
        // Only the first search hit is used
        assert_eq!(ids(&movies), vec![7]);
    }

    #[tokio::test]
    async fn test_empty_inference_skips_catalog() {
        let mut recommender = MockTitleRecommender::new();
        recommender
            .expect_infer()
            .returning(|_| Ok(CandidateParse::Empty));
        recommender.expect_name().return_const("mock");

        let mut catalog = MockMovieCatalog::new();
        catalog.expect_search_movies().times(0);
        catalog.expect_fetch_movie().times(0);

        let resolver = RecommendationResolver::new(Arc::new(recommender), Arc::new(catalog));

        let movies = resolver.resolve(&happy_comedy()).await.unwrap();
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn test_inference_outage_surfaces() {
        let mut recommender = MockTitleRecommender::new();
        recommender
            .expect_infer()
            .returning(|_| Err(AppError::InferenceUnavailable("connection refused".to_string())));

        let mut catalog = MockMovieCatalog::new();
        catalog.expect_search_movies().times(0);

        let resolver = RecommendationResolver::new(Arc::new(recommender), Arc::new(catalog));

        let result = resolver.resolve(&happy_comedy()).await;
        assert!(matches!(result, Err(AppError::InferenceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_happy_comedy_scenario() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search_movies()
            .times(3)
            .returning(|query| match query {
                "Movie X" => Ok(page(vec![summary(100, "Movie X")])),
                "Movie Y" => Ok(page(vec![summary(200, "Movie Y")])),
                _ => Ok(page(vec![])),
            });
        catalog
            .expect_fetch_movie()
            .returning(|id| Ok(movie(id, &format!("Movie {}", id))));
        catalog.expect_name().return_const("mock");

        let resolver = RecommendationResolver::new(
            Arc::new(recommender_returning(&["Movie X", "Movie Y", "Movie X"])),
            Arc::new(catalog),
        );

        let movies = resolver.resolve(&happy_comedy()).await.unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(ids(&movies), vec![100, 200]);
    }

    #[test]
    fn test_dedup_by_id_keeps_first() {
        let movies = vec![movie(1, "first"), movie(2, "b"), movie(1, "second")];
        let deduped = dedup_by_id(movies);
        assert_eq!(ids(&deduped), vec![1, 2]);
        assert_eq!(deduped[0].title, "first");
    }
}
