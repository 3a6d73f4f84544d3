//! Video extraction routes: analyze a video, add extracted movies to a
//! list, browse and prune extraction history.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    AddToListRequest, AddToListResponse, AddedToList, AnalyzeVideoRequest, AnalyzeVideoResponse,
    ExtractedMovie, ExtractionHistoryResponse, ExtractionResponse, ListDestinationKind,
    MessageResponse, MovieRecord,
};
use persistence::entities::VideoExtractionEntity;
use persistence::repositories::{
    PersonalListRepository, SpaceRepository, VideoExtractionRepository,
};
use shared::pagination::{PageInfo, PageQuery};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::services::tmdb::poster_url;

/// POST /api/video-extraction/analyze
///
/// Analyzes a video URL and persists the extraction. A video with no
/// recognizable movies returns 200 with a null extraction and persists
/// nothing.
pub async fn analyze(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<AnalyzeVideoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let mut outcome = state.video.analyze(&request.video_url).await?;

    if !outcome.from_cache {
        state.tmdb.match_movies(&mut outcome.movies).await;
        state
            .video
            .store(
                &request.video_url,
                outcome.metadata.clone(),
                outcome.movies.clone(),
            )
            .await;
    }

    if outcome.movies.is_empty() {
        return Ok((
            StatusCode::OK,
            Json(AnalyzeVideoResponse {
                message: "No movies found in this video".to_string(),
                extraction: None,
            }),
        ));
    }

    let repo = VideoExtractionRepository::new(state.pool.clone());
    let entity = repo
        .create(
            auth.user_id,
            request.video_url.trim(),
            &outcome.metadata.title,
            &outcome.metadata.description,
            "youtube",
            &outcome.movies,
        )
        .await?;

    info!(
        extraction_id = %entity.id,
        movies = outcome.movies.len(),
        "Video extraction saved"
    );

    Ok((
        StatusCode::OK,
        Json(AnalyzeVideoResponse {
            message: format!("Found {} movies", outcome.movies.len()),
            extraction: Some(entity.to_response()),
        }),
    ))
}

/// POST /api/video-extraction/:extraction_id/add-to-list
///
/// Adds extracted movies to the caller's personal list or to a space.
/// Requested ids that are not part of the extraction are dropped
/// silently; the response reports how many movies were actually added.
pub async fn add_to_list(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(extraction_id): Path<Uuid>,
    Json(request): Json<AddToListRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = VideoExtractionRepository::new(state.pool.clone());
    let extraction = repo
        .find_by_id(extraction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Extraction not found".into()))?;

    if extraction.user_id != auth.user_id {
        return Err(ApiError::Forbidden("This extraction is not yours".into()));
    }

    let selected: Vec<MovieRecord> = extraction
        .select_movies(&request.movie_ids)
        .into_iter()
        .map(to_movie_record)
        .collect();

    if selected.is_empty() {
        return Err(ApiError::Validation(
            "None of the requested movies belong to this extraction".into(),
        ));
    }

    let (list_id, added) = match request.destination.kind {
        ListDestinationKind::Personal => {
            add_to_personal_list(&state, auth.user_id, &selected).await?
        }
        ListDestinationKind::Space => {
            let space_id = request.destination.list_id.ok_or_else(|| {
                ApiError::Validation("A space destination requires listId".into())
            })?;
            add_to_space_list(&state, auth.user_id, space_id, &selected).await?
        }
    };

    let entry = AddedToList {
        kind: request.destination.kind,
        list_id,
        movie_ids: added.iter().filter_map(|m| m.tmdb_id).collect(),
        added_at: Utc::now(),
    };
    if repo
        .append_added_to_list(extraction_id, &entry)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Extraction not found".into()));
    }

    info!(
        extraction_id = %extraction_id,
        added = added.len(),
        "Extracted movies added to list"
    );

    Ok(Json(AddToListResponse {
        message: format!("Added {} movies to your list", added.len()),
        added_count: added.len(),
    }))
}

/// GET /api/video-extraction/history
///
/// Pages the caller's extraction history, newest first.
pub async fn history(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = VideoExtractionRepository::new(state.pool.clone());

    let total = repo.count_for_user(auth.user_id).await?;
    let entities = repo
        .list_for_user(auth.user_id, query.limit(), query.offset())
        .await?;

    let extractions: Vec<ExtractionResponse> = entities
        .iter()
        .map(VideoExtractionEntity::to_response)
        .collect();

    Ok(Json(ExtractionHistoryResponse {
        extractions,
        pagination: PageInfo::new(&query, total),
    }))
}

/// DELETE /api/video-extraction/:extraction_id
///
/// Hard-deletes an extraction owned by the caller.
pub async fn delete_extraction(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(extraction_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = VideoExtractionRepository::new(state.pool.clone());
    let deleted = repo.delete_for_user(extraction_id, auth.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Extraction not found".into()));
    }

    Ok(Json(MessageResponse::new("Extraction deleted")))
}

/// Converts an extracted movie to an embeddable list record.
fn to_movie_record(movie: &ExtractedMovie) -> MovieRecord {
    let tmdb_id = movie.tmdb_id;
    MovieRecord {
        id: tmdb_id
            .map(|id| format!("tmdb-{}", id))
            .unwrap_or_else(|| format!("extracted-{}", Uuid::new_v4())),
        title: movie.title.clone(),
        year: movie.year.map(|y| y.to_string()).unwrap_or_default(),
        genre: Vec::new(),
        plot: String::new(),
        poster_url: movie.poster_path.as_deref().map(poster_url),
        rating: None,
        director: None,
        runtime: None,
        actors: None,
        tmdb_id,
    }
}

/// Appends to the personal list, skipping movies already present by id.
async fn add_to_personal_list(
    state: &AppState,
    user_id: Uuid,
    movies: &[MovieRecord],
) -> Result<(Uuid, Vec<MovieRecord>), ApiError> {
    let repo = PersonalListRepository::new(state.pool.clone());
    let list = repo.get_or_create(user_id).await?;

    let new_movies: Vec<MovieRecord> = movies
        .iter()
        .filter(|m| list.find_movie(&m.id).is_none())
        .cloned()
        .collect();

    if !new_movies.is_empty() {
        repo.append_movies(user_id, &new_movies)
            .await?
            .ok_or_else(|| ApiError::NotFound("Personal list not found".into()))?;
    }

    Ok((list.id, new_movies))
}

/// Appends to a space list the caller belongs to, skipping duplicates.
async fn add_to_space_list(
    state: &AppState,
    user_id: Uuid,
    space_id: Uuid,
    movies: &[MovieRecord],
) -> Result<(Uuid, Vec<MovieRecord>), ApiError> {
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

    let new_movies: Vec<MovieRecord> = movies
        .iter()
        .filter(|m| space.find_movie(&m.id).is_none())
        .cloned()
        .collect();

    if !new_movies.is_empty() {
        repo.append_movies(space_id, &new_movies)
            .await?
            .ok_or_else(|| ApiError::NotFound("Space not found".into()))?;
    }

    Ok((space.id, new_movies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::Confidence;

    #[test]
    fn test_to_movie_record_with_tmdb_match() {
        let extracted = ExtractedMovie {
            title: "Heat".to_string(),
            year: Some(1995),
            confidence: Confidence::High,
            matched: true,
            tmdb_id: Some(949),
            poster_path: Some("/heat.jpg".to_string()),
        };
        let record = to_movie_record(&extracted);
        assert_eq!(record.id, "tmdb-949");
        assert_eq!(record.year, "1995");
        assert_eq!(
            record.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w342/heat.jpg")
        );
        assert_eq!(record.tmdb_id, Some(949));
    }

    #[test]
    fn test_to_movie_record_unmatched() {
        let extracted = ExtractedMovie {
            title: "Obscure Short".to_string(),
            year: None,
            confidence: Confidence::Low,
            matched: false,
            tmdb_id: None,
            poster_path: None,
        };
        let record = to_movie_record(&extracted);
        assert!(record.id.starts_with("extracted-"));
        assert!(record.year.is_empty());
        assert!(record.poster_url.is_none());
    }
}
