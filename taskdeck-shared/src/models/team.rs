/// Team model and database operations
///
/// Teams are the top-level tenant and ownership boundary. Every project,
/// board and task ultimately belongs to exactly one team, and every
/// permission check resolves to a team plus a membership lookup.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL,
///     description TEXT,
///     owner_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// A team has exactly one owner, set at creation and never null. Creation
/// also inserts a role=owner membership row for the creator, but ownership
/// is checked against `owner_id` independently of membership rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::membership::MemberRole;

/// Team record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    /// Unique team ID
    pub id: Uuid,

    /// Team name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Owner user ID; the owner is always fully privileged
    pub owner_id: String,

    /// When the team was created
    pub created_at: DateTime<Utc>,

    /// When the team was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    /// Team name
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

impl Team {
    /// Creates a team owned by `owner_id`
    ///
    /// The creator becomes the owner and receives a role=owner membership
    /// row in the same transaction, so the two can never diverge at
    /// creation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist (foreign key) or the
    /// connection fails.
    pub async fn create(
        pool: &PgPool,
        data: CreateTeam,
        owner_id: &str,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO team_members (team_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(team.id)
            .bind(owner_id)
            .bind(MemberRole::Owner)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(team)
    }

    /// Finds a team by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, description, owner_id, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Lists the teams a user owns or is a member of
    ///
    /// Ownership counts even without a membership row, consistent with the
    /// resolver's ownership bypass.
    pub async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT t.id, t.name, t.description, t.owner_id, t.created_at, t.updated_at
            FROM teams t
            WHERE t.owner_id = $1
               OR EXISTS (
                   SELECT 1 FROM team_members m
                   WHERE m.team_id = t.id AND m.user_id = $1
               )
            ORDER BY t.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(teams)
    }

    /// Deletes a team
    ///
    /// Memberships, projects, boards, tasks, comments, activities and
    /// invitations are removed by cascade. Returns true if a row was
    /// deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
