//! Shared space routes: creation, listing, membership and the space
//! movie list.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{AddMemberRequest, AddMovieRequest, CreateSpaceRequest, SpaceResponse};
use persistence::entities::SpaceEntity;
use persistence::repositories::{SpaceRepository, UserRepository};
use shared::validation::normalize_email;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// POST /api/spaces
///
/// Creates a space owned by the caller.
pub async fn create_space(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<CreateSpaceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = SpaceRepository::new(state.pool.clone());
    let space = repo
        .create(request.name.trim(), request.description.trim(), auth.user_id)
        .await?;

    info!(space_id = %space.id, owner_id = %auth.user_id, "Space created");

    Ok((StatusCode::CREATED, Json(space.to_response())))
}

/// GET /api/spaces
///
/// Lists the caller's spaces, newest first.
pub async fn list_spaces(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SpaceRepository::new(state.pool.clone());
    let spaces = repo.list_for_user(auth.user_id).await?;

    let response: Vec<SpaceResponse> = spaces.iter().map(SpaceEntity::to_response).collect();
    Ok(Json(response))
}

/// GET /api/spaces/:space_id
///
/// Returns a space the caller belongs to.
pub async fn get_space(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(space_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let space = find_space_for_member(&state, space_id, auth.user_id).await?;
    Ok(Json(space.to_response()))
}

/// POST /api/spaces/:space_id/members
///
/// Directly adds a registered user to the space by email. Owner only.
pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(space_id): Path<Uuid>,
    Json(request): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = SpaceRepository::new(state.pool.clone());
    let space = repo
        .find_by_id(space_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Space not found".into()))?;

    if !space.is_owner(auth.user_id) {
        return Err(ApiError::Forbidden(
            "Only the space owner can add members".into(),
        ));
    }

    let user_repo = UserRepository::new(state.pool.clone());
    let user = user_repo
        .find_by_email(&normalize_email(&request.email))
        .await?
        .ok_or_else(|| ApiError::NotFound("No user with this email".into()))?;

    check_not_member(&space, user.id)?;

    let updated = repo
        .add_member(space_id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Space not found".into()))?;

    info!(space_id = %space_id, member_id = %user.id, "Member added to space");

    Ok(Json(updated.to_response()))
}

/// POST /api/spaces/:space_id/movies
///
/// Adds a movie to the space list. Members only; an exact duplicate title
/// is rejected.
pub async fn add_movie(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(space_id): Path<Uuid>,
    Json(request): Json<AddMovieRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let space = find_space_for_member(&state, space_id, auth.user_id).await?;

    if space.has_movie_title(&request.movie.title) {
        return Err(ApiError::Conflict(
            "Movie is already in this space's list".into(),
        ));
    }

    let repo = SpaceRepository::new(state.pool.clone());
    let updated = repo
        .append_movies(space_id, std::slice::from_ref(&request.movie))
        .await?
        .ok_or_else(|| ApiError::NotFound("Space not found".into()))?;

    Ok((StatusCode::CREATED, Json(updated.to_response())))
}

/// DELETE /api/spaces/:space_id/movies/:movie_id
///
/// Removes a movie from the space list by record id. Removing an absent
/// movie is not an error.
pub async fn remove_movie(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path((space_id, movie_id)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let space = find_space_for_member(&state, space_id, auth.user_id).await?;

    let remaining: Vec<_> = space
        .movies
        .0
        .iter()
        .filter(|m| m.id != movie_id)
        .cloned()
        .collect();

    let repo = SpaceRepository::new(state.pool.clone());
    let updated = repo
        .set_movies(space_id, &remaining)
        .await?
        .ok_or_else(|| ApiError::NotFound("Space not found".into()))?;

    Ok(Json(updated.to_response()))
}

/// Rejects a direct add when the target already belongs to the space.
fn check_not_member(space: &SpaceEntity, user_id: Uuid) -> Result<(), ApiError> {
    if space.is_member(user_id) {
        return Err(ApiError::Conflict(
            "User is already a member of this space".into(),
        ));
    }
    Ok(())
}

/// Loads a space and checks the caller belongs to it.
async fn find_space_for_member(
    state: &AppState,
    space_id: Uuid,
    user_id: Uuid,
) -> Result<SpaceEntity, ApiError> {
    let repo = SpaceRepository::new(state.pool.clone());
    let space = repo
        .find_by_id(space_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Space not found".into()))?;

    if !space.is_member(user_id) && !space.is_owner(user_id) {
        return Err(ApiError::Forbidden(
            "You are not a member of this space".into(),
        ));
    }

    Ok(space)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;

    fn space_with(owner: Uuid, members: Vec<Uuid>) -> SpaceEntity {
        SpaceEntity {
            id: Uuid::new_v4(),
            name: "Horror Night".to_string(),
            description: String::new(),
            owner_id: owner,
            member_ids: members,
            movies: Json(vec![]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_direct_add_of_existing_member_is_conflict() {
        let owner = Uuid::new_v4();
        let member = Uuid::new_v4();
        let space = space_with(owner, vec![owner, member]);
        assert!(matches!(
            check_not_member(&space, member),
            Err(ApiError::Conflict(_))
        ));
    }

    #[test]
    fn test_direct_add_of_new_user_passes() {
        let owner = Uuid::new_v4();
        let space = space_with(owner, vec![owner]);
        assert!(check_not_member(&space, Uuid::new_v4()).is_ok());
    }
}
