/// Comment endpoints
///
/// # Endpoints
///
/// - `GET    /api/tasks/:task_id/comments` - List a task's comments
/// - `POST   /api/tasks/:task_id/comments` - Comment on a task (any member)
/// - `DELETE /api/comments/:comment_id` - Delete a comment (admin, or the author)

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
use taskdeck_shared::models::comment::Comment;
use uuid::Uuid;
use validator::Validate;

/// Create comment request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Comment body
    #[validate(length(min = 1, max = 4000, message = "Content must be 1-4000 characters"))]
    pub content: String,
}

/// Lists the comments of a task, oldest first
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    let (task, scope) = TeamScope::for_task(&state.db, task_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::View)?;

    let comments = Comment::list_by_task(&state.db, task.id).await?;
    Ok(Json(comments))
}

/// Comments on a task
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    req.validate()?;

    let (task, scope) = TeamScope::for_task(&state.db, task_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::CreateComment)?;

    let comment = Comment::create(&state.db, task.id, &auth.user_id, &req.content).await?;

    record_activity(
        &state.db,
        scope.team.id,
        &auth.user_id,
        "comment.created",
        "comment",
        Some(comment.id.to_string()),
    )
    .await;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Deletes a comment
///
/// Same override shape as task deletion: admin policy, or the comment's
/// own author (membership still required).
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(comment_id): Path<Uuid>,
) -> ApiResult<Json<Comment>> {
    let comment = Comment::find_by_id(&state.db, comment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    let (_task, scope) = TeamScope::for_task(&state.db, comment.task_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    scope.authorize_with_creator_override(
        &auth.user_id,
        Action::DeleteComment,
        Some(comment.user_id.as_str()),
    )?;

    if !Comment::delete(&state.db, comment_id).await? {
        return Err(ApiError::NotFound("Comment not found".to_string()));
    }

    record_activity(
        &state.db,
        scope.team.id,
        &auth.user_id,
        "comment.deleted",
        "comment",
        Some(comment_id.to_string()),
    )
    .await;

    Ok(Json(comment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_comment_request_validation() {
        let valid = CreateCommentRequest {
            content: "Looks good to me".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = CreateCommentRequest {
            content: "".to_string(),
        };
        assert!(empty.validate().is_err());

        let too_long = CreateCommentRequest {
            content: "a".repeat(4001),
        };
        assert!(too_long.validate().is_err());
    }
}
