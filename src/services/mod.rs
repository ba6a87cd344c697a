pub mod inference;
pub mod metadata;
pub mod recommendations;

pub use recommendations::RecommendationResolver;
