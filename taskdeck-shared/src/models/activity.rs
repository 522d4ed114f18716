/// Activity model: a per-team audit trail
///
/// Mutating endpoints record what happened (`action` like "task.created",
/// the entity type and id) so dashboards can show a team feed. Recording is
/// best effort: callers log and continue when an insert fails, since the feed
/// must never fail the request it describes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Activity record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Activity {
    /// Unique activity ID
    pub id: Uuid,

    /// Team the activity happened in
    pub team_id: Uuid,

    /// Acting user (null if the user was deleted)
    pub user_id: Option<String>,

    /// What happened, e.g. "board.deleted"
    pub action: String,

    /// Kind of entity acted on, e.g. "board"
    pub entity_type: String,

    /// Identifier of the entity acted on, if it still has one
    pub entity_id: Option<String>,

    /// When the activity was recorded
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// Records an activity
    pub async fn record(
        pool: &PgPool,
        team_id: Uuid,
        user_id: &str,
        action: &str,
        entity_type: &str,
        entity_id: Option<String>,
    ) -> Result<Self, sqlx::Error> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (team_id, user_id, action, entity_type, entity_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, team_id, user_id, action, entity_type, entity_id, created_at
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .bind(action)
        .bind(entity_type)
        .bind(&entity_id)
        .fetch_one(pool)
        .await?;

        Ok(activity)
    }

    /// Lists a team's most recent activities, newest first
    pub async fn list_by_team(
        pool: &PgPool,
        team_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let activities = sqlx::query_as::<_, Activity>(
            r#"
            SELECT id, team_id, user_id, action, entity_type, entity_id, created_at
            FROM activities
            WHERE team_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(team_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(activities)
    }
}
