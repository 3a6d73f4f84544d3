//! Space entity (database row mapping).
//!
//! A space's movie list is stored as a JSONB document; membership is a
//! uuid array so owner checks and member checks stay in SQL.

use chrono::{DateTime, Utc};
use domain::models::{MovieRecord, SpaceResponse};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the spaces table.
#[derive(Debug, Clone, FromRow)]
pub struct SpaceEntity {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    pub member_ids: Vec<Uuid>,
    pub movies: Json<Vec<MovieRecord>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SpaceEntity {
    /// Check if the given user belongs to this space.
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.member_ids.contains(&user_id)
    }

    /// Check if the given user owns this space.
    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Check if the list already holds a movie with this exact title.
    pub fn has_movie_title(&self, title: &str) -> bool {
        self.movies.0.iter().any(|m| m.title == title)
    }

    /// Find a movie in the list by its id.
    pub fn find_movie(&self, movie_id: &str) -> Option<&MovieRecord> {
        self.movies.0.iter().find(|m| m.id == movie_id)
    }

    pub fn to_response(&self) -> SpaceResponse {
        SpaceResponse {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            owner_id: self.owner_id,
            member_ids: self.member_ids.clone(),
            movies: self.movies.0.clone(),
            created_at: self.created_at,
        }
    }
}
