//! Shared space models. A space holds a movie list visible to all members.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::validation::validate_space_name;
use uuid::Uuid;
use validator::Validate;

use super::movie::MovieRecord;

/// Request body for creating a space.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceRequest {
    #[validate(custom(function = "validate_space_name"))]
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// Request body for directly adding a member by email.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Request body for adding a movie to a space's list. The body is the
/// movie record itself.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddMovieRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub movie: MovieRecord,
}

/// Public space representation. `created_at` is serialized as epoch
/// milliseconds for client compatibility.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    pub member_ids: Vec<Uuid>,
    pub movies: Vec<MovieRecord>,
    #[serde(serialize_with = "serialize_epoch_millis")]
    pub created_at: DateTime<Utc>,
}

fn serialize_epoch_millis<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i64(value.timestamp_millis())
}
