/// Team endpoints
///
/// # Endpoints
///
/// - `GET    /api/teams` - Teams the caller owns or belongs to
/// - `POST   /api/teams` - Create a team (caller becomes owner)
/// - `DELETE /api/teams/:team_id` - Delete a team (owner policy)
/// - `GET    /api/teams/:team_id/activity` - Per-team audit feed

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::record_activity,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskdeck_shared::auth::authorization::Action;
use taskdeck_shared::auth::middleware::AuthContext;
use taskdeck_shared::auth::scope::TeamScope;
use taskdeck_shared::models::activity::Activity;
use taskdeck_shared::models::team::{CreateTeam, Team};
use uuid::Uuid;
use validator::Validate;

/// Create team request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Team name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Activity feed query parameters
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    /// Maximum number of entries to return (default 50, capped at 200)
    pub limit: Option<i64>,
}

/// Lists the teams the caller owns or is a member of
///
/// # Endpoint
///
/// ```text
/// GET /api/teams
/// Authorization: Bearer <session_token>
/// ```
pub async fn list_teams(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Team>>> {
    let teams = Team::list_for_user(&state.db, &auth.user_id).await?;
    Ok(Json(teams))
}

/// Creates a team
///
/// The caller becomes the team's owner and receives a role=owner
/// membership row.
///
/// # Endpoint
///
/// ```text
/// POST /api/teams
/// Authorization: Bearer <session_token>
/// Content-Type: application/json
///
/// { "name": "Acme", "description": "Platform team" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `401 Unauthorized`: missing or invalid session
pub async fn create_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    req.validate()?;

    let team = Team::create(
        &state.db,
        CreateTeam {
            name: req.name,
            description: req.description,
        },
        &auth.user_id,
    )
    .await?;

    tracing::info!(team_id = %team.id, user_id = %auth.user_id, "team created");

    record_activity(
        &state.db,
        team.id,
        &auth.user_id,
        "team.created",
        "team",
        Some(team.id.to_string()),
    )
    .await;

    Ok((StatusCode::CREATED, Json(team)))
}

/// Deletes a team
///
/// Requires the owner policy: the team owner, or a member holding the
/// owner role. Projects, boards, tasks, memberships and the activity feed
/// are removed by cascade.
///
/// # Errors
///
/// - `401 Unauthorized`: missing or invalid session
/// - `403 Forbidden`: caller is not an owner
/// - `404 Not Found`: no such team (including a repeated delete)
pub async fn delete_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<Team>> {
    let scope = TeamScope::resolve(&state.db, team_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::DeleteTeam)?;

    if !Team::delete(&state.db, team_id).await? {
        return Err(ApiError::NotFound("Team not found".to_string()));
    }

    tracing::info!(team_id = %team_id, user_id = %auth.user_id, "team deleted");

    // No activity entry: the feed lives in the team that was just removed.
    Ok(Json(scope.team))
}

/// Lists a team's recent activity, newest first
///
/// Any member (or the owner) may read the feed.
pub async fn list_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<Uuid>,
    Query(query): Query<ActivityQuery>,
) -> ApiResult<Json<Vec<Activity>>> {
    let scope = TeamScope::resolve(&state.db, team_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::View)?;

    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let activities = Activity::list_by_team(&state.db, team_id, limit).await?;

    Ok(Json(activities))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_team_request_validation() {
        let valid = CreateTeamRequest {
            name: "Acme".to_string(),
            description: Some("Platform team".to_string()),
        };
        assert!(valid.validate().is_ok());

        let empty_name = CreateTeamRequest {
            name: "".to_string(),
            description: None,
        };
        assert!(empty_name.validate().is_err());

        let long_name = CreateTeamRequest {
            name: "a".repeat(256),
            description: None,
        };
        assert!(long_name.validate().is_err());
    }
}
