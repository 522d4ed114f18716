/// Project model and database operations
///
/// A project belongs to exactly one team and is cascade-deleted with it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     name TEXT NOT NULL,
///     description TEXT,
///     created_by TEXT REFERENCES users(id) ON DELETE SET NULL,
///     archived BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Project record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Owning team
    pub team_id: Uuid,

    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// User who created the project (null if the user was deleted)
    pub created_by: Option<String>,

    /// Whether the project is archived
    pub archived: bool,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Owning team
    pub team_id: Uuid,

    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

impl Project {
    /// Creates a project in a team
    pub async fn create(
        pool: &PgPool,
        data: CreateProject,
        created_by: &str,
    ) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (team_id, name, description, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, team_id, name, description, created_by, archived,
                      created_at, updated_at
            "#,
        )
        .bind(data.team_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(created_by)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, team_id, name, description, created_by, archived,
                   created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists the projects of a team
    pub async fn list_by_team(pool: &PgPool, team_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, team_id, name, description, created_by, archived,
                   created_at, updated_at
            FROM projects
            WHERE team_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Deletes a project (boards and tasks cascade)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
