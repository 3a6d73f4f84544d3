//! Repository for video extraction database operations.

use domain::models::{AddedToList, ExtractedMovie};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::VideoExtractionEntity;

const EXTRACTION_COLUMNS: &str = "id, user_id, video_url, video_title, video_description, \
     platform, extracted_movies, added_to_lists, created_at";

/// Repository for video extraction operations.
#[derive(Clone)]
pub struct VideoExtractionRepository {
    pool: PgPool,
}

impl VideoExtractionRepository {
    /// Creates a new video extraction repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists a completed extraction.
    pub async fn create(
        &self,
        user_id: Uuid,
        video_url: &str,
        video_title: &str,
        video_description: &str,
        platform: &str,
        extracted_movies: &[ExtractedMovie],
    ) -> Result<VideoExtractionEntity, sqlx::Error> {
        sqlx::query_as::<_, VideoExtractionEntity>(&format!(
            r#"
            INSERT INTO video_extractions
                (user_id, video_url, video_title, video_description, platform,
                 extracted_movies, added_to_lists)
            VALUES ($1, $2, $3, $4, $5, $6, '[]'::jsonb)
            RETURNING {EXTRACTION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(video_url)
        .bind(video_title)
        .bind(video_description)
        .bind(platform)
        .bind(Json(extracted_movies))
        .fetch_one(&self.pool)
        .await
    }

    /// Finds an extraction by id.
    pub async fn find_by_id(
        &self,
        extraction_id: Uuid,
    ) -> Result<Option<VideoExtractionEntity>, sqlx::Error> {
        sqlx::query_as::<_, VideoExtractionEntity>(&format!(
            "SELECT {EXTRACTION_COLUMNS} FROM video_extractions WHERE id = $1"
        ))
        .bind(extraction_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Pages a user's extraction history, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VideoExtractionEntity>, sqlx::Error> {
        sqlx::query_as::<_, VideoExtractionEntity>(&format!(
            r#"
            SELECT {EXTRACTION_COLUMNS}
            FROM video_extractions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Total extractions for a user, for pagination metadata.
    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM video_extractions WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }

    /// Appends an add-to-list audit entry to an extraction.
    pub async fn append_added_to_list(
        &self,
        extraction_id: Uuid,
        entry: &AddedToList,
    ) -> Result<Option<VideoExtractionEntity>, sqlx::Error> {
        sqlx::query_as::<_, VideoExtractionEntity>(&format!(
            r#"
            UPDATE video_extractions
            SET added_to_lists = added_to_lists || $2::jsonb
            WHERE id = $1
            RETURNING {EXTRACTION_COLUMNS}
            "#
        ))
        .bind(extraction_id)
        .bind(Json(entry))
        .fetch_optional(&self.pool)
        .await
    }

    /// Deletes an extraction owned by the given user. Returns whether a
    /// row was removed.
    pub async fn delete_for_user(
        &self,
        extraction_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM video_extractions WHERE id = $1 AND user_id = $2")
            .bind(extraction_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
