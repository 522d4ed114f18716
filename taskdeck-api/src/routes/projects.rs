/// Project endpoints
///
/// # Endpoints
///
/// - `GET    /api/projects/:team_id` - List a team's projects
/// - `POST   /api/projects` - Create a project (any member)
/// - `DELETE /api/projects/:project_id` - Delete a project (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::record_activity,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskdeck_shared::auth::authorization::Action;
use taskdeck_shared::auth::middleware::AuthContext;
use taskdeck_shared::auth::scope::TeamScope;
use taskdeck_shared::models::project::{CreateProject, Project};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Owning team
    pub team_id: Uuid,

    /// Project name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Lists the projects of a team
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Project>>> {
    let scope = TeamScope::resolve(&state.db, team_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::View)?;

    let projects = Project::list_by_team(&state.db, team_id).await?;
    Ok(Json(projects))
}

/// Creates a project in a team
///
/// Any member of the team (or its owner) may create projects.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate()?;

    let scope = TeamScope::resolve(&state.db, req.team_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::CreateProject)?;

    let project = Project::create(
        &state.db,
        CreateProject {
            team_id: req.team_id,
            name: req.name,
            description: req.description,
        },
        &auth.user_id,
    )
    .await?;

    tracing::info!(project_id = %project.id, team_id = %project.team_id, "project created");

    record_activity(
        &state.db,
        project.team_id,
        &auth.user_id,
        "project.created",
        "project",
        Some(project.id.to_string()),
    )
    .await;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Deletes a project
///
/// Admin policy; boards and tasks cascade.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let (project, scope) = TeamScope::for_project(&state.db, project_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::DeleteProject)?;

    if !Project::delete(&state.db, project_id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    tracing::info!(project_id = %project_id, team_id = %project.team_id, "project deleted");

    record_activity(
        &state.db,
        project.team_id,
        &auth.user_id,
        "project.deleted",
        "project",
        Some(project_id.to_string()),
    )
    .await;

    Ok(Json(project))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_project_request_validation() {
        let valid = CreateProjectRequest {
            team_id: Uuid::new_v4(),
            name: "Website".to_string(),
            description: None,
        };
        assert!(valid.validate().is_ok());

        let empty_name = CreateProjectRequest {
            team_id: Uuid::new_v4(),
            name: "".to_string(),
            description: None,
        };
        assert!(empty_name.validate().is_err());
    }
}
