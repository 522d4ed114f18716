/// Membership model and database operations
///
/// A membership is the join entity granting a user a role within a team.
/// It implements a many-to-many relationship between users and teams with
/// role-based access control.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE member_role AS ENUM ('owner', 'admin', 'editor', 'viewer');
///
/// CREATE TABLE team_members (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role member_role NOT NULL DEFAULT 'viewer',
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT team_members_team_user_key UNIQUE (team_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **owner**: full control, may delete the team
/// - **admin**: may manage members and delete projects/boards/tasks
/// - **editor**: may create and work on content
/// - **viewer**: read access (and content creation, since any member may create;
///   see the policy table in `auth::authorization`)
///
/// Note that `teams.owner_id` is authoritative for ownership: the team
/// owner is fully privileged even when their membership row is missing or
/// stale. Role comparisons here only order the four enum values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role granted to a user within a team
///
/// Ordered by privilege: owner > admin > editor > viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Full control, may delete the team
    Owner,

    /// May manage members and delete projects, boards and tasks
    Admin,

    /// May create and work on content
    Editor,

    /// Read access
    Viewer,
}

impl MemberRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Owner => "owner",
            MemberRole::Admin => "admin",
            MemberRole::Editor => "editor",
            MemberRole::Viewer => "viewer",
        }
    }

    /// Checks whether this role meets a required minimum role
    ///
    /// Hierarchy: Owner > Admin > Editor > Viewer
    pub fn meets(&self, required: MemberRole) -> bool {
        self.privilege_level() >= required.privilege_level()
    }

    /// Numeric privilege level used for comparison
    fn privilege_level(&self) -> u8 {
        match self {
            MemberRole::Owner => 4,
            MemberRole::Admin => 3,
            MemberRole::Editor => 2,
            MemberRole::Viewer => 1,
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership row: a user's role within a team
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Row ID
    pub id: Uuid,

    /// Team ID
    pub team_id: Uuid,

    /// User ID (opaque, assigned by the auth provider)
    pub user_id: String,

    /// Role within the team
    pub role: MemberRole,

    /// When the user joined the team
    pub joined_at: DateTime<Utc>,
}

/// Input for creating a new membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    /// Team ID
    pub team_id: Uuid,

    /// User ID
    pub user_id: String,

    /// Role to assign (defaults to Viewer)
    #[serde(default = "default_role")]
    pub role: MemberRole,
}

fn default_role() -> MemberRole {
    MemberRole::Viewer
}

/// A member as presented in listings: membership joined with user profile
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberProfile {
    /// User ID
    pub user_id: String,

    /// User email
    pub email: String,

    /// User display name
    pub name: String,

    /// Role within the team
    pub role: MemberRole,

    /// When the user joined the team
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    /// Creates a new membership (adds a user to a team)
    ///
    /// # Errors
    ///
    /// Returns an error if the (team, user) pair already exists (unique
    /// constraint), a foreign key is missing, or the connection fails.
    pub async fn create(pool: &PgPool, data: CreateMembership) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO team_members (team_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING id, team_id, user_id, role, joined_at
            "#,
        )
        .bind(data.team_id)
        .bind(&data.user_id)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Finds the membership for a (team, user) pair, if any
    pub async fn find(
        pool: &PgPool,
        team_id: Uuid,
        user_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, team_id, user_id, role, joined_at
            FROM team_members
            WHERE team_id = $1 AND user_id = $2
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Deletes a membership (removes a user from a team)
    ///
    /// Returns true if a row was deleted. Callers are responsible for the
    /// owner-removal rule; this function does not inspect roles.
    pub async fn delete(
        pool: &PgPool,
        team_id: Uuid,
        user_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the members of a team joined with their user profiles
    ///
    /// This is the shape the member-listing endpoint returns: user id,
    /// email, name, role and join date.
    pub async fn list_profiles_by_team(
        pool: &PgPool,
        team_id: Uuid,
    ) -> Result<Vec<MemberProfile>, sqlx::Error> {
        let members = sqlx::query_as::<_, MemberProfile>(
            r#"
            SELECT m.user_id, u.email, u.name, m.role, m.joined_at
            FROM team_members m
            INNER JOIN users u ON u.id = m.user_id
            WHERE m.team_id = $1
            ORDER BY m.joined_at ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_as_str() {
        assert_eq!(MemberRole::Owner.as_str(), "owner");
        assert_eq!(MemberRole::Admin.as_str(), "admin");
        assert_eq!(MemberRole::Editor.as_str(), "editor");
        assert_eq!(MemberRole::Viewer.as_str(), "viewer");
    }

    #[test]
    fn test_role_order_is_strict() {
        let ordered = [
            MemberRole::Viewer,
            MemberRole::Editor,
            MemberRole::Admin,
            MemberRole::Owner,
        ];

        for (i, lower) in ordered.iter().enumerate() {
            for higher in &ordered[i + 1..] {
                assert!(higher.meets(*lower), "{higher} should meet {lower}");
                assert!(!lower.meets(*higher), "{lower} should not meet {higher}");
            }
        }
    }

    #[test]
    fn test_role_meets_itself() {
        for role in [
            MemberRole::Owner,
            MemberRole::Admin,
            MemberRole::Editor,
            MemberRole::Viewer,
        ] {
            assert!(role.meets(role));
        }
    }

    #[test]
    fn test_create_membership_default_role() {
        assert_eq!(default_role(), MemberRole::Viewer);
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&MemberRole::Editor).unwrap(),
            "\"editor\""
        );
        let parsed: MemberRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, MemberRole::Admin);
    }

    // Integration tests for database operations live in taskdeck-api/tests.
}
