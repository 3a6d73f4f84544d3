//! Space invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{
    InvitationResponse, InvitationStatus, InvitedByInfo, PendingInvitationResponse,
    PendingSpaceInfo,
};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub id: Uuid,
    pub space_id: Uuid,
    pub invited_email: String,
    pub invited_by: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvitationEntity {
    pub fn status(&self) -> Option<InvitationStatus> {
        InvitationStatus::parse(&self.status)
    }

    /// Check if this invitation is still awaiting a response.
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending.as_str()
    }

    /// Check if this invitation is addressed to the given email.
    pub fn is_addressed_to(&self, email: &str) -> bool {
        self.invited_email.eq_ignore_ascii_case(email)
    }

    pub fn to_response(&self) -> InvitationResponse {
        InvitationResponse {
            id: self.id,
            space_id: self.space_id,
            invited_email: self.invited_email.clone(),
            invited_by: self.invited_by,
            status: self.status().unwrap_or(InvitationStatus::Pending),
            created_at: self.created_at,
        }
    }
}

/// Joined row for the pending-invitations listing: invitation plus the
/// space it targets and the user who sent it.
#[derive(Debug, Clone, FromRow)]
pub struct PendingInvitationRow {
    pub id: Uuid,
    pub space_id: Uuid,
    pub space_name: String,
    pub space_description: String,
    pub inviter_username: String,
    pub inviter_email: String,
    pub created_at: DateTime<Utc>,
}

impl PendingInvitationRow {
    pub fn to_response(&self) -> PendingInvitationResponse {
        PendingInvitationResponse {
            id: self.id,
            space: PendingSpaceInfo {
                id: self.space_id,
                name: self.space_name.clone(),
                description: self.space_description.clone(),
            },
            invited_by: InvitedByInfo {
                username: self.inviter_username.clone(),
                email: self.inviter_email.clone(),
            },
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_invitation(status: &str) -> InvitationEntity {
        InvitationEntity {
            id: Uuid::new_v4(),
            space_id: Uuid::new_v4(),
            invited_email: "invitee@example.com".to_string(),
            invited_by: Uuid::new_v4(),
            status: status.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_pending() {
        assert!(create_test_invitation("pending").is_pending());
        assert!(!create_test_invitation("accepted").is_pending());
        assert!(!create_test_invitation("rejected").is_pending());
    }

    #[test]
    fn test_is_addressed_to_case_insensitive() {
        let invitation = create_test_invitation("pending");
        assert!(invitation.is_addressed_to("INVITEE@EXAMPLE.COM"));
        assert!(!invitation.is_addressed_to("other@example.com"));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            create_test_invitation("rejected").status(),
            Some(InvitationStatus::Rejected)
        );
        assert_eq!(create_test_invitation("bogus").status(), None);
    }
}
