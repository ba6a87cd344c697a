pub mod movie;
pub mod preferences;
pub mod tmdb;

pub use movie::{
    image_url, CastMember, Credits, CrewMember, Genre, ImageSize, Movie, MovieId, MovieSummary,
    SearchPage, Video, VideoList,
};
pub use preferences::{ContentType, PreferenceSet, YearRange, MIN_RATINGS, MIN_YEAR};
pub use tmdb::{TmdbMovieDetails, TmdbSearchResponse};
