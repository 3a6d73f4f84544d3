//! Repository for personal list database operations.

use domain::models::MovieRecord;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PersonalListEntity;

const LIST_COLUMNS: &str = "id, user_id, movies, created_at, updated_at";

/// Repository for personal list operations.
#[derive(Clone)]
pub struct PersonalListRepository {
    pool: PgPool,
}

impl PersonalListRepository {
    /// Creates a new personal list repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates an empty list for a freshly registered user.
    pub async fn create_empty(&self, user_id: Uuid) -> Result<PersonalListEntity, sqlx::Error> {
        sqlx::query_as::<_, PersonalListEntity>(&format!(
            r#"
            INSERT INTO personal_lists (user_id, movies)
            VALUES ($1, '[]'::jsonb)
            RETURNING {LIST_COLUMNS}
            "#
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a user's list without creating it.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PersonalListEntity>, sqlx::Error> {
        sqlx::query_as::<_, PersonalListEntity>(&format!(
            "SELECT {LIST_COLUMNS} FROM personal_lists WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Finds a user's list, creating an empty one if it does not exist.
    /// Lists normally exist from registration; this covers accounts that
    /// predate eager creation.
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<PersonalListEntity, sqlx::Error> {
        sqlx::query_as::<_, PersonalListEntity>(&format!(
            r#"
            INSERT INTO personal_lists (user_id, movies)
            VALUES ($1, '[]'::jsonb)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING {LIST_COLUMNS}
            "#
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Replaces the movie list.
    pub async fn set_movies(
        &self,
        user_id: Uuid,
        movies: &[MovieRecord],
    ) -> Result<Option<PersonalListEntity>, sqlx::Error> {
        sqlx::query_as::<_, PersonalListEntity>(&format!(
            r#"
            UPDATE personal_lists
            SET movies = $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING {LIST_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(Json(movies))
        .fetch_optional(&self.pool)
        .await
    }

    /// Appends movies without replacing existing ones.
    pub async fn append_movies(
        &self,
        user_id: Uuid,
        movies: &[MovieRecord],
    ) -> Result<Option<PersonalListEntity>, sqlx::Error> {
        sqlx::query_as::<_, PersonalListEntity>(&format!(
            r#"
            UPDATE personal_lists
            SET movies = movies || $2::jsonb, updated_at = NOW()
            WHERE user_id = $1
            RETURNING {LIST_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(Json(movies))
        .fetch_optional(&self.pool)
        .await
    }
}
