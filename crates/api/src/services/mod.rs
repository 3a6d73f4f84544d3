//! Domain services and external integrations.

pub mod auth;
pub mod tmdb;
pub mod video_extraction;

pub use auth::AuthService;
pub use tmdb::TmdbService;
pub use video_extraction::VideoExtractionService;
