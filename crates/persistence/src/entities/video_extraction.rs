//! Video extraction entity (database row mapping).
//!
//! Extracted movies and add-to-list history are stored as JSONB
//! documents alongside the video metadata.

use chrono::{DateTime, Utc};
use domain::models::{AddedToList, ExtractedMovie, ExtractionResponse, Platform};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the video_extractions table.
#[derive(Debug, Clone, FromRow)]
pub struct VideoExtractionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_url: String,
    pub video_title: String,
    pub video_description: String,
    pub platform: String,
    pub extracted_movies: Json<Vec<ExtractedMovie>>,
    pub added_to_lists: Json<Vec<AddedToList>>,
    pub created_at: DateTime<Utc>,
}

impl VideoExtractionEntity {
    /// Movies from the stored extraction matching the given TMDB ids.
    /// Unknown ids are skipped.
    pub fn select_movies(&self, tmdb_ids: &[i64]) -> Vec<&ExtractedMovie> {
        self.extracted_movies
            .0
            .iter()
            .filter(|m| m.tmdb_id.map(|id| tmdb_ids.contains(&id)).unwrap_or(false))
            .collect()
    }

    pub fn to_response(&self) -> ExtractionResponse {
        ExtractionResponse {
            id: self.id,
            video_url: self.video_url.clone(),
            video_title: self.video_title.clone(),
            video_description: self.video_description.clone(),
            platform: Platform::Youtube,
            extracted_movies: self.extracted_movies.0.clone(),
            added_to_lists: self.added_to_lists.0.clone(),
            created_at: self.created_at,
        }
    }
}
