/// Task endpoints
///
/// # Endpoints
///
/// - `GET    /api/tasks/:board_id` - List a board's tasks, optional `?status=` filter
/// - `POST   /api/tasks` - Create a task (any member of the board's team)
/// - `DELETE /api/tasks/:task_id` - Delete a task (admin, or the task's creator)
///
/// Deletion carries the creator override: the task's creator may delete it
/// with any role, as long as they are still a member of the team.

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
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskdeck_shared::auth::authorization::Action;
use taskdeck_shared::auth::middleware::AuthContext;
use taskdeck_shared::auth::scope::TeamScope;
use taskdeck_shared::models::task::{CreateTask, Task, TaskPriority, TaskStatus};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Owning board
    pub board_id: Uuid,

    /// Task title
    #[validate(length(min = 1, max = 500, message = "Title must be 1-500 characters"))]
    pub title: String,

    /// Optional description
    #[validate(length(max = 10000, message = "Description must be at most 10000 characters"))]
    pub description: Option<String>,

    /// Workflow status (defaults to todo)
    pub status: Option<TaskStatus>,

    /// Priority (defaults to medium)
    pub priority: Option<TaskPriority>,

    /// Assigned user, if any
    pub assignee_id: Option<String>,

    /// Optional due date (ISO 8601)
    pub due_date: Option<DateTime<Utc>>,
}

/// Task listing query parameters
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    /// Only return tasks with this status
    pub status: Option<TaskStatus>,
}

/// Lists the tasks of a board
///
/// # Endpoint
///
/// ```text
/// GET /api/tasks/:board_id?status=todo
/// Authorization: Bearer <session_token>
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(board_id): Path<Uuid>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let (board, scope) = TeamScope::for_board(&state.db, board_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::View)?;

    let tasks = Task::list_by_board(&state.db, board.id, query.status).await?;
    Ok(Json(tasks))
}

/// Creates a task on a board
///
/// The membership check is scoped to the board's own team, resolved up the
/// ancestor chain; membership in some other team grants nothing.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `403 Forbidden`: caller is not a member of the board's team
/// - `404 Not Found`: board (or its ancestor chain) not found
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let (board, scope) = TeamScope::for_board(&state.db, req.board_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::CreateTask)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            board_id: board.id,
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or(TaskStatus::Todo),
            priority: req.priority.unwrap_or(TaskPriority::Medium),
            assignee_id: req.assignee_id,
            due_date: req.due_date,
        },
        &auth.user_id,
    )
    .await?;

    tracing::info!(task_id = %task.id, board_id = %task.board_id, "task created");

    record_activity(
        &state.db,
        scope.team.id,
        &auth.user_id,
        "task.created",
        "task",
        Some(task.id.to_string()),
    )
    .await;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Deletes a task
///
/// Admin policy, or the creator override: the task's creator may delete it
/// with any role. The override requires membership: a creator who has
/// left the team is denied.
///
/// # Errors
///
/// - `403 Forbidden`: caller is below admin and not the creator
/// - `404 Not Found`: task not found (including a repeated delete)
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let (task, scope) = TeamScope::for_task(&state.db, task_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    scope.authorize_with_creator_override(
        &auth.user_id,
        Action::DeleteTask,
        task.created_by.as_deref(),
    )?;

    if !Task::delete(&state.db, task_id).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id = %task_id, "task deleted");

    record_activity(
        &state.db,
        scope.team.id,
        &auth.user_id,
        "task.deleted",
        "task",
        Some(task_id.to_string()),
    )
    .await;

    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_request_validation() {
        let valid = CreateTaskRequest {
            board_id: Uuid::new_v4(),
            title: "Fix login flow".to_string(),
            description: None,
            status: None,
            priority: None,
            assignee_id: None,
            due_date: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateTaskRequest {
            board_id: Uuid::new_v4(),
            title: "".to_string(),
            description: None,
            status: None,
            priority: None,
            assignee_id: None,
            due_date: None,
        };
        assert!(empty_title.validate().is_err());

        let long_title = CreateTaskRequest {
            board_id: Uuid::new_v4(),
            title: "a".repeat(501),
            description: None,
            status: None,
            priority: None,
            assignee_id: None,
            due_date: None,
        };
        assert!(long_title.validate().is_err());
    }

    #[test]
    fn test_create_task_request_parses_enums() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{
                "board_id": "550e8400-e29b-41d4-a716-446655440000",
                "title": "Ship it",
                "status": "in_progress",
                "priority": "high"
            }"#,
        )
        .unwrap();

        assert_eq!(req.status, Some(TaskStatus::InProgress));
        assert_eq!(req.priority, Some(TaskPriority::High));
    }
}
