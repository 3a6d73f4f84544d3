//! Personal list routes.
//!
//! Every user has one personal movie list. It is created at registration
//! and lazily recreated here for accounts that predate that behavior.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use domain::models::{AddMovieRequest, MovieRecord, UpdateMovieRequest};
use persistence::repositories::PersonalListRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// GET /api/movies
///
/// Returns the caller's personal movie list.
pub async fn get_movies(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PersonalListRepository::new(state.pool.clone());
    let list = repo.get_or_create(auth.user_id).await?;
    Ok(Json(list.movies.0))
}

/// POST /api/movies
///
/// Adds a movie to the personal list. Exact duplicate titles are rejected.
pub async fn add_movie(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<AddMovieRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = PersonalListRepository::new(state.pool.clone());
    let list = repo.get_or_create(auth.user_id).await?;

    if list.has_movie_title(&request.movie.title) {
        return Err(ApiError::Conflict("Movie is already in your list".into()));
    }

    let updated = repo
        .append_movies(auth.user_id, std::slice::from_ref(&request.movie))
        .await?
        .ok_or_else(|| ApiError::NotFound("Personal list not found".into()))?;

    Ok((StatusCode::CREATED, Json(updated.movies.0)))
}

/// DELETE /api/movies/:movie_id
///
/// Removes a movie by record id. Removing an absent movie is not an error.
pub async fn remove_movie(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(movie_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PersonalListRepository::new(state.pool.clone());
    let list = repo.get_or_create(auth.user_id).await?;

    let remaining: Vec<MovieRecord> = list
        .movies
        .0
        .iter()
        .filter(|m| m.id != movie_id)
        .cloned()
        .collect();

    let updated = repo
        .set_movies(auth.user_id, &remaining)
        .await?
        .ok_or_else(|| ApiError::NotFound("Personal list not found".into()))?;

    Ok(Json(updated.movies.0))
}

/// PUT /api/movies/:movie_id
///
/// Updates metadata fields of a movie in the personal list. Only
/// whitelisted fields are merged; the id and title stay fixed.
pub async fn update_movie(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(movie_id): Path<String>,
    Json(request): Json<UpdateMovieRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PersonalListRepository::new(state.pool.clone());
    let list = repo.get_or_create(auth.user_id).await?;

    let mut movies = list.movies.0.clone();
    let movie = movies
        .iter_mut()
        .find(|m| m.id == movie_id)
        .ok_or_else(|| ApiError::NotFound("Movie not found in your list".into()))?;

    request.apply_to(movie);
    let updated_movie = movie.clone();

    repo.set_movies(auth.user_id, &movies)
        .await?
        .ok_or_else(|| ApiError::NotFound("Personal list not found".into()))?;

    Ok(Json(updated_movie))
}
