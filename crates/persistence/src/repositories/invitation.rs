//! Repository for space invitation database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{InvitationEntity, PendingInvitationRow};

const INVITATION_COLUMNS: &str =
    "id, space_id, invited_email, invited_by, status, created_at, updated_at";

/// Repository for invitation operations.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Creates a new invitation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a pending invitation. The partial unique index on
    /// (space_id, invited_email) for pending rows rejects duplicates.
    pub async fn create(
        &self,
        space_id: Uuid,
        invited_email: &str,
        invited_by: Uuid,
    ) -> Result<InvitationEntity, sqlx::Error> {
        sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            INSERT INTO invitations (space_id, invited_email, invited_by, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING {INVITATION_COLUMNS}
            "#
        ))
        .bind(space_id)
        .bind(invited_email)
        .bind(invited_by)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds an invitation by id.
    pub async fn find_by_id(
        &self,
        invitation_id: Uuid,
    ) -> Result<Option<InvitationEntity>, sqlx::Error> {
        sqlx::query_as::<_, InvitationEntity>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE id = $1"
        ))
        .bind(invitation_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Checks whether a pending invitation already exists for this space
    /// and email.
    pub async fn pending_exists(
        &self,
        space_id: Uuid,
        invited_email: &str,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM invitations
                WHERE space_id = $1 AND invited_email = $2 AND status = 'pending'
            )
            "#,
        )
        .bind(space_id)
        .bind(invited_email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.0)
    }

    /// Lists pending invitations addressed to an email, joined with the
    /// target space and the inviting user, newest first.
    pub async fn list_pending_for_email(
        &self,
        email: &str,
    ) -> Result<Vec<PendingInvitationRow>, sqlx::Error> {
        sqlx::query_as::<_, PendingInvitationRow>(
            r#"
            SELECT i.id, i.space_id, s.name AS space_name,
                   s.description AS space_description,
                   u.username AS inviter_username, u.email AS inviter_email,
                   i.created_at
            FROM invitations i
            JOIN spaces s ON s.id = i.space_id
            JOIN users u ON u.id = i.invited_by
            WHERE i.invited_email = $1 AND i.status = 'pending'
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
    }

    /// Accepts a pending invitation: marks it accepted and adds the user
    /// to the space's members in one transaction. The membership add is
    /// idempotent. Returns None when the invitation is no longer pending.
    pub async fn accept(
        &self,
        invitation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<InvitationEntity>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let invitation = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            UPDATE invitations
            SET status = 'accepted', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {INVITATION_COLUMNS}
            "#
        ))
        .bind(invitation_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(invitation) = invitation else {
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE spaces
            SET member_ids = array_append(member_ids, $1), updated_at = NOW()
            WHERE id = $2 AND NOT ($1 = ANY(member_ids))
            "#,
        )
        .bind(user_id)
        .bind(invitation.space_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(invitation))
    }

    /// Marks a pending invitation rejected.
    pub async fn reject(
        &self,
        invitation_id: Uuid,
    ) -> Result<Option<InvitationEntity>, sqlx::Error> {
        sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            UPDATE invitations
            SET status = 'rejected', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {INVITATION_COLUMNS}
            "#
        ))
        .bind(invitation_id)
        .fetch_optional(&self.pool)
        .await
    }
}
