//! Space invitation models and the invitation lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of an invitation. Transitions are one-way: a pending
/// invitation becomes accepted or rejected and then never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(InvitationStatus::Pending),
            "accepted" => Some(InvitationStatus::Accepted),
            "rejected" => Some(InvitationStatus::Rejected),
            _ => None,
        }
    }
}

/// Request body for inviting a user to a space by email.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendInvitationRequest {
    pub space_id: Uuid,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Compact space info embedded in a pending-invitation listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSpaceInfo {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

/// Who sent the invitation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitedByInfo {
    pub username: String,
    pub email: String,
}

/// A pending invitation as shown to the invitee.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInvitationResponse {
    pub id: Uuid,
    pub space: PendingSpaceInfo,
    pub invited_by: InvitedByInfo,
    pub created_at: DateTime<Utc>,
}

/// Full invitation representation returned after sending one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: Uuid,
    pub space_id: Uuid,
    pub invited_email: String,
    pub invited_by: Uuid,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            InvitationStatus::Pending,
            InvitationStatus::Accepted,
            InvitationStatus::Rejected,
        ] {
            assert_eq!(InvitationStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_parse_unknown() {
        assert_eq!(InvitationStatus::parse("expired"), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&InvitationStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }

    #[test]
    fn test_send_invitation_request_invalid_email() {
        let request = SendInvitationRequest {
            space_id: Uuid::new_v4(),
            email: "nope".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_pending_invitation_response_shape() {
        let response = PendingInvitationResponse {
            id: Uuid::new_v4(),
            space: PendingSpaceInfo {
                id: Uuid::new_v4(),
                name: "Horror Night".to_string(),
                description: String::new(),
            },
            invited_by: InvitedByInfo {
                username: "owner".to_string(),
                email: "owner@x.com".to_string(),
            },
            created_at: Utc::now(),
        };
        let json: serde_json::Value = serde_json::to_value(&response).unwrap();
        assert_eq!(json["space"]["name"], "Horror Night");
        assert_eq!(json["invitedBy"]["username"], "owner");
    }
}
