//! Personal list entity (database row mapping).
//!
//! Each user has exactly one personal list, created at registration.

use chrono::{DateTime, Utc};
use domain::models::MovieRecord;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the personal_lists table.
#[derive(Debug, Clone, FromRow)]
pub struct PersonalListEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movies: Json<Vec<MovieRecord>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PersonalListEntity {
    /// Check if the list already holds a movie with this exact title.
    pub fn has_movie_title(&self, title: &str) -> bool {
        self.movies.0.iter().any(|m| m.title == title)
    }

    pub fn find_movie(&self, movie_id: &str) -> Option<&MovieRecord> {
        self.movies.0.iter().find(|m| m.id == movie_id)
    }
}
