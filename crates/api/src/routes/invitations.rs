//! Space invitation routes.
//!
//! Invitations move through a one-way state machine: pending, then
//! accepted or rejected. Responding to a non-pending invitation is a
//! conflict.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{MessageResponse, PendingInvitationResponse, SendInvitationRequest};
use persistence::entities::{InvitationEntity, PendingInvitationRow, SpaceEntity};
use persistence::repositories::{InvitationRepository, SpaceRepository, UserRepository};
use shared::validation::normalize_email;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// POST /api/invitations
///
/// Invites a registered user to a space by email. Any member of the
/// space can invite; the invitee must already have an account. One
/// pending invitation per (space, email).
pub async fn send_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<SendInvitationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;
    let email = normalize_email(&request.email);

    let space_repo = SpaceRepository::new(state.pool.clone());
    let space = space_repo
        .find_by_id(request.space_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Space not found".into()))?;

    let user_repo = UserRepository::new(state.pool.clone());
    let invitee = user_repo.find_by_email(&email).await?;
    check_send_preconditions(&space, auth.user_id, invitee.map(|u| u.id))?;

    let invite_repo = InvitationRepository::new(state.pool.clone());
    if invite_repo.pending_exists(request.space_id, &email).await? {
        return Err(ApiError::Conflict(
            "A pending invitation already exists for this email".into(),
        ));
    }

    let invitation = invite_repo
        .create(request.space_id, &email, auth.user_id)
        .await?;

    info!(
        invitation_id = %invitation.id,
        space_id = %request.space_id,
        "Invitation sent"
    );

    Ok((StatusCode::CREATED, Json(invitation.to_response())))
}

/// GET /api/invitations/pending
///
/// Lists pending invitations addressed to the caller's email, newest
/// first, with space and inviter details.
pub async fn list_pending(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvitationRepository::new(state.pool.clone());
    let rows = repo.list_pending_for_email(&auth.email).await?;

    let response: Vec<PendingInvitationResponse> =
        rows.iter().map(PendingInvitationRow::to_response).collect();
    Ok(Json(response))
}

/// POST /api/invitations/:invitation_id/accept
///
/// Accepts a pending invitation addressed to the caller and joins the
/// space. Status write and membership add happen in one transaction.
pub async fn accept_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(invitation_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvitationRepository::new(state.pool.clone());
    let invitation = load_addressed_invitation(&repo, invitation_id, &auth).await?;

    if !invitation.is_pending() {
        return Err(ApiError::Conflict(
            "Invitation has already been responded to".into(),
        ));
    }

    // A racing accept can flip the status between the read above and the
    // guarded update; the loser gets the same conflict as a stale retry.
    let accepted = repo
        .accept(invitation_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Conflict("Invitation has already been responded to".into()))?;

    info!(
        invitation_id = %invitation_id,
        space_id = %accepted.space_id,
        user_id = %auth.user_id,
        "Invitation accepted"
    );

    Ok(Json(accepted.to_response()))
}

/// POST /api/invitations/:invitation_id/reject
///
/// Rejects a pending invitation addressed to the caller.
pub async fn reject_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(invitation_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvitationRepository::new(state.pool.clone());
    let invitation = load_addressed_invitation(&repo, invitation_id, &auth).await?;

    if !invitation.is_pending() {
        return Err(ApiError::Conflict(
            "Invitation has already been responded to".into(),
        ));
    }

    repo.reject(invitation_id).await?.ok_or_else(|| {
        ApiError::Conflict("Invitation has already been responded to".into())
    })?;

    info!(invitation_id = %invitation_id, "Invitation rejected");

    Ok(Json(MessageResponse::new("Invitation rejected")))
}

/// Checks a send request against the loaded space and invitee lookup.
/// Returns the invitee's user id on success.
fn check_send_preconditions(
    space: &SpaceEntity,
    requester_id: Uuid,
    invitee_id: Option<Uuid>,
) -> Result<Uuid, ApiError> {
    if !space.is_owner(requester_id) && !space.is_member(requester_id) {
        return Err(ApiError::Forbidden(
            "Only space members can send invitations".into(),
        ));
    }

    let invitee_id =
        invitee_id.ok_or_else(|| ApiError::NotFound("No user with this email".into()))?;

    if space.is_member(invitee_id) {
        return Err(ApiError::Conflict(
            "User is already a member of this space".into(),
        ));
    }

    Ok(invitee_id)
}

/// Loads an invitation and checks it is addressed to the caller.
async fn load_addressed_invitation(
    repo: &InvitationRepository,
    invitation_id: Uuid,
    auth: &UserAuth,
) -> Result<InvitationEntity, ApiError> {
    let invitation = repo
        .find_by_id(invitation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".into()))?;

    if !invitation.is_addressed_to(&auth.email) {
        return Err(ApiError::Forbidden(
            "This invitation is not addressed to you".into(),
        ));
    }

    Ok(invitation)
}
