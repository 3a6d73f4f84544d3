//! Repository for space database operations.

use domain::models::MovieRecord;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SpaceEntity;

const SPACE_COLUMNS: &str =
    "id, name, description, owner_id, member_ids, movies, created_at, updated_at";

/// Repository for space operations.
#[derive(Clone)]
pub struct SpaceRepository {
    pool: PgPool,
}

impl SpaceRepository {
    /// Creates a new space repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a space owned by the given user. The owner is the first
    /// member.
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        owner_id: Uuid,
    ) -> Result<SpaceEntity, sqlx::Error> {
        sqlx::query_as::<_, SpaceEntity>(&format!(
            r#"
            INSERT INTO spaces (name, description, owner_id, member_ids, movies)
            VALUES ($1, $2, $3, ARRAY[$3], '[]'::jsonb)
            RETURNING {SPACE_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(description)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a space by id.
    pub async fn find_by_id(&self, space_id: Uuid) -> Result<Option<SpaceEntity>, sqlx::Error> {
        sqlx::query_as::<_, SpaceEntity>(&format!(
            "SELECT {SPACE_COLUMNS} FROM spaces WHERE id = $1"
        ))
        .bind(space_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists spaces the user belongs to, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<SpaceEntity>, sqlx::Error> {
        sqlx::query_as::<_, SpaceEntity>(&format!(
            r#"
            SELECT {SPACE_COLUMNS}
            FROM spaces
            WHERE owner_id = $1 OR $1 = ANY(member_ids)
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Adds a member to a space. Idempotent: adding an existing member
    /// changes nothing.
    pub async fn add_member(
        &self,
        space_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<SpaceEntity>, sqlx::Error> {
        sqlx::query_as::<_, SpaceEntity>(&format!(
            r#"
            UPDATE spaces
            SET member_ids = CASE
                    WHEN $2 = ANY(member_ids) THEN member_ids
                    ELSE array_append(member_ids, $2)
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SPACE_COLUMNS}
            "#
        ))
        .bind(space_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Replaces the movie list of a space.
    pub async fn set_movies(
        &self,
        space_id: Uuid,
        movies: &[MovieRecord],
    ) -> Result<Option<SpaceEntity>, sqlx::Error> {
        sqlx::query_as::<_, SpaceEntity>(&format!(
            r#"
            UPDATE spaces
            SET movies = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {SPACE_COLUMNS}
            "#
        ))
        .bind(space_id)
        .bind(Json(movies))
        .fetch_optional(&self.pool)
        .await
    }

    /// Appends movies to a space's list without replacing existing ones.
    pub async fn append_movies(
        &self,
        space_id: Uuid,
        movies: &[MovieRecord],
    ) -> Result<Option<SpaceEntity>, sqlx::Error> {
        sqlx::query_as::<_, SpaceEntity>(&format!(
            r#"
            UPDATE spaces
            SET movies = movies || $2::jsonb, updated_at = NOW()
            WHERE id = $1
            RETURNING {SPACE_COLUMNS}
            "#
        ))
        .bind(space_id)
        .bind(Json(movies))
        .fetch_optional(&self.pool)
        .await
    }
}
