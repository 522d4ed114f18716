/// Invitation model and database operations
///
/// Invitations let admins bring users into a team by email before the user
/// has ever seen the team. An invitation carries the role the membership
/// will be created with, and a random token the invitee presents to accept.
///
/// # Lifecycle
///
/// ```text
/// pending -> accepted   (invitee accepts, membership created)
/// pending -> revoked    (admin revokes)
/// ```
///
/// Status is stored as text; accepted and revoked invitations are kept for
/// the record rather than deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::membership::MemberRole;

/// Invitation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Revoked,
}

impl InvitationStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Revoked => "revoked",
        }
    }

    /// Parses status from its stored string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InvitationStatus::Pending),
            "accepted" => Some(InvitationStatus::Accepted),
            "revoked" => Some(InvitationStatus::Revoked),
            _ => None,
        }
    }
}

/// Invitation record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invitation {
    /// Unique invitation ID
    pub id: Uuid,

    /// Team the invitee is invited to
    pub team_id: Uuid,

    /// Invitee email
    pub email: String,

    /// Role the membership will be created with
    pub role: MemberRole,

    /// Opaque accept token
    pub token: String,

    /// Lifecycle status ("pending", "accepted", "revoked")
    pub status: String,

    /// When the invitation was created
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Whether the invitation can still be accepted
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending.as_str()
    }
}

/// Input for creating a new invitation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvitation {
    /// Team to invite into
    pub team_id: Uuid,

    /// Invitee email
    pub email: String,

    /// Role the membership will be created with
    pub role: MemberRole,

    /// Accept token (generated by the caller)
    pub token: String,
}

impl Invitation {
    /// Creates a pending invitation
    pub async fn create(pool: &PgPool, data: CreateInvitation) -> Result<Self, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            INSERT INTO invitations (team_id, email, role, token)
            VALUES ($1, $2, $3, $4)
            RETURNING id, team_id, email, role, token, status, created_at
            "#,
        )
        .bind(data.team_id)
        .bind(&data.email)
        .bind(data.role)
        .bind(&data.token)
        .fetch_one(pool)
        .await?;

        Ok(invitation)
    }

    /// Finds an invitation by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, team_id, email, role, token, status, created_at
            FROM invitations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(invitation)
    }

    /// Finds an invitation by its accept token
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<Self>, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, team_id, email, role, token, status, created_at
            FROM invitations
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(invitation)
    }

    /// Lists a team's invitations, newest first
    pub async fn list_by_team(pool: &PgPool, team_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let invitations = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, team_id, email, role, token, status, created_at
            FROM invitations
            WHERE team_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(invitations)
    }

    /// Transitions a pending invitation to a new status
    ///
    /// Guarded on the current status being "pending" so two concurrent
    /// accepts (or an accept racing a revoke) cannot both win. Returns the
    /// updated row, or None if the invitation was not pending anymore.
    pub async fn transition(
        pool: &PgPool,
        id: Uuid,
        to: InvitationStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            UPDATE invitations
            SET status = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING id, team_id, email, role, token, status, created_at
            "#,
        )
        .bind(id)
        .bind(to.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(invitation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            InvitationStatus::Pending,
            InvitationStatus::Accepted,
            InvitationStatus::Revoked,
        ] {
            assert_eq!(InvitationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(InvitationStatus::parse("expired"), None);
    }

    #[test]
    fn test_is_pending() {
        let invitation = Invitation {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            email: "new@example.com".to_string(),
            role: MemberRole::Editor,
            token: "tok".to_string(),
            status: "pending".to_string(),
            created_at: Utc::now(),
        };
        assert!(invitation.is_pending());

        let accepted = Invitation {
            status: "accepted".to_string(),
            ..invitation
        };
        assert!(!accepted.is_pending());
    }
}
