/// Board model and database operations
///
/// Boards are the kanban columns of a project. Their display order is
/// `order_index`: the first board of a project gets 0, each subsequent one
/// max(existing)+1. Indices are not reused after deletion, so gaps are
/// normal.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     name TEXT NOT NULL,
///     order_index INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Board record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    /// Unique board ID
    pub id: Uuid,

    /// Owning project
    pub project_id: Uuid,

    /// Board name
    pub name: String,

    /// Display order among sibling boards
    pub order_index: i32,

    /// When the board was created
    pub created_at: DateTime<Utc>,

    /// When the board was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoard {
    /// Owning project
    pub project_id: Uuid,

    /// Board name
    pub name: String,
}

impl Board {
    /// Creates a board at the end of the project's board list
    ///
    /// `order_index` is assigned as max(existing)+1, or 0 for the first
    /// board. Computed in the insert itself so concurrent creates cannot
    /// read a stale maximum from a separate query.
    pub async fn create(pool: &PgPool, data: CreateBoard) -> Result<Self, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (project_id, name, order_index)
            VALUES (
                $1, $2,
                (SELECT COALESCE(MAX(order_index) + 1, 0) FROM boards WHERE project_id = $1)
            )
            RETURNING id, project_id, name, order_index, created_at, updated_at
            "#,
        )
        .bind(data.project_id)
        .bind(&data.name)
        .fetch_one(pool)
        .await?;

        Ok(board)
    }

    /// Finds a board by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, project_id, name, order_index, created_at, updated_at
            FROM boards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(board)
    }

    /// Lists the boards of a project in display order
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let boards = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, project_id, name, order_index, created_at, updated_at
            FROM boards
            WHERE project_id = $1
            ORDER BY order_index ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(boards)
    }

    /// Deletes a board (tasks cascade)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
