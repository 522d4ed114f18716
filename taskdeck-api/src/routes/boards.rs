/// Board endpoints
///
/// # Endpoints
///
/// - `GET    /api/boards/:project_id` - List a project's boards in display order
/// - `POST   /api/boards` - Create a board (any member)
/// - `DELETE /api/boards/:board_id` - Delete a board (admin)

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
use taskdeck_shared::models::board::{Board, CreateBoard};
use uuid::Uuid;
use validator::Validate;

/// Create board request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardRequest {
    /// Owning project
    pub project_id: Uuid,

    /// Board name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Lists the boards of a project in display order
pub async fn list_boards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Board>>> {
    let (project, scope) = TeamScope::for_project(&state.db, project_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::View)?;

    let boards = Board::list_by_project(&state.db, project.id).await?;
    Ok(Json(boards))
}

/// Creates a board at the end of the project's board list
///
/// The new board's order_index is max(existing)+1, or 0 for the first
/// board of the project.
pub async fn create_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateBoardRequest>,
) -> ApiResult<(StatusCode, Json<Board>)> {
    req.validate()?;

    let (project, scope) = TeamScope::for_project(&state.db, req.project_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::CreateBoard)?;

    let board = Board::create(
        &state.db,
        CreateBoard {
            project_id: req.project_id,
            name: req.name,
        },
    )
    .await?;

    tracing::info!(
        board_id = %board.id,
        project_id = %board.project_id,
        order_index = board.order_index,
        "board created"
    );

    record_activity(
        &state.db,
        project.team_id,
        &auth.user_id,
        "board.created",
        "board",
        Some(board.id.to_string()),
    )
    .await;

    Ok((StatusCode::CREATED, Json(board)))
}

/// Deletes a board
///
/// Admin policy; tasks cascade.
pub async fn delete_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Json<Board>> {
    let (board, scope) = TeamScope::for_board(&state.db, board_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::DeleteBoard)?;

    if !Board::delete(&state.db, board_id).await? {
        return Err(ApiError::NotFound("Board not found".to_string()));
    }

    tracing::info!(board_id = %board_id, "board deleted");

    record_activity(
        &state.db,
        scope.team.id,
        &auth.user_id,
        "board.deleted",
        "board",
        Some(board_id.to_string()),
    )
    .await;

    Ok(Json(board))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_board_request_validation() {
        let valid = CreateBoardRequest {
            project_id: Uuid::new_v4(),
            name: "In Progress".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty_name = CreateBoardRequest {
            project_id: Uuid::new_v4(),
            name: "".to_string(),
        };
        assert!(empty_name.validate().is_err());
    }
}
