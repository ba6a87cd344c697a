/// Recommendation inference abstraction
///
/// Maps a preference set to candidate movie titles using a text-completion
/// service. Candidates are unverified: they may not exist in the catalog.
use crate::{error::AppResult, models::PreferenceSet};

pub mod openrouter;
pub mod parse;
pub mod prompt;

pub use openrouter::OpenRouterProvider;
pub use parse::{parse_candidates, CandidateParse, ParseKind};
pub use prompt::build_prompt;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TitleRecommender: Send + Sync {
    /// Ask the completion service for 3-5 titles matching the preferences
    ///
    /// Only an unreachable service is an error (`InferenceUnavailable`). A
    /// reply with no usable titles is `Ok(CandidateParse::Empty)`.
    async fn infer(&self, prefs: &PreferenceSet) -> AppResult<CandidateParse>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
