//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::UserResponse;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEntity {
    /// Converts to the public API representation, dropping the hash.
    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_response_drops_hash() {
        let user = UserEntity {
            id: Uuid::new_v4(),
            username: "moviefan".to_string(),
            email: "fan@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let response = user.to_response();
        assert_eq!(response.username, "moviefan");
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("argon2id"));
    }
}
