/// Team member endpoints
///
/// # Endpoints
///
/// - `GET    /api/team-members/:team_id` - List members with profiles
/// - `POST   /api/team-members/:team_id` - Add a member by email (admin)
/// - `DELETE /api/team-members/:team_id/:member_id` - Remove a member (admin)
///
/// Removal is the one place with a target-side rule: a role=owner
/// membership can never be removed, whoever asks.

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
use taskdeck_shared::auth::authorization::{authorize_member_removal, Action};
use taskdeck_shared::auth::middleware::AuthContext;
use taskdeck_shared::auth::scope::TeamScope;
use taskdeck_shared::models::membership::{
    CreateMembership, MemberProfile, MemberRole, Membership,
};
use taskdeck_shared::models::user::User;
use uuid::Uuid;
use validator::Validate;

/// Add member request
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    /// Email of the user to add
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    /// Role to grant (defaults to viewer)
    #[serde(default = "default_member_role")]
    pub role: MemberRole,
}

fn default_member_role() -> MemberRole {
    MemberRole::Viewer
}

/// Lists the members of a team
///
/// Any member (or the owner) may view the member list.
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<Vec<MemberProfile>>> {
    let scope = TeamScope::resolve(&state.db, team_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::View)?;

    let members = Membership::list_profiles_by_team(&state.db, team_id).await?;
    Ok(Json(members))
}

/// Adds a user to a team by email
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `403 Forbidden`: caller is below admin
/// - `404 Not Found`: team or user not found
/// - `409 Conflict`: user is already a member
pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<Membership>)> {
    req.validate()?;

    let scope = TeamScope::resolve(&state.db, team_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::AddMember)?;

    let target_user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if Membership::find(&state.db, team_id, &target_user.id)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "User is already a member of this team".to_string(),
        ));
    }

    let membership = Membership::create(
        &state.db,
        CreateMembership {
            team_id,
            user_id: target_user.id.clone(),
            role: req.role,
        },
    )
    .await?;

    tracing::info!(
        team_id = %team_id,
        user_id = %target_user.id,
        role = %req.role,
        "member added"
    );

    record_activity(
        &state.db,
        team_id,
        &auth.user_id,
        "member.added",
        "membership",
        Some(target_user.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(membership)))
}

/// Removes a member from a team
///
/// `member_id` is the target user's ID. An owner-role membership is never
/// removable through this endpoint (403 `CannotRemoveOwner`), independent
/// of the caller's own role.
///
/// # Errors
///
/// - `403 Forbidden`: caller is below admin, or the target holds the owner role
/// - `404 Not Found`: team or membership not found
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((team_id, member_id)): Path<(Uuid, String)>,
) -> ApiResult<Json<Membership>> {
    let scope = TeamScope::resolve(&state.db, team_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let target = Membership::find(&state.db, team_id, &member_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    authorize_member_removal(&auth.user_id, &scope.team, scope.membership.as_ref(), &target)?;

    if !Membership::delete(&state.db, team_id, &member_id).await? {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    tracing::info!(team_id = %team_id, user_id = %member_id, "member removed");

    record_activity(
        &state.db,
        team_id,
        &auth.user_id,
        "member.removed",
        "membership",
        Some(member_id),
    )
    .await;

    Ok(Json(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_member_request_validation() {
        let valid = AddMemberRequest {
            email: "new@example.com".to_string(),
            role: MemberRole::Editor,
        };
        assert!(valid.validate().is_ok());

        let invalid = AddMemberRequest {
            email: "not-an-email".to_string(),
            role: MemberRole::Viewer,
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_add_member_role_defaults_to_viewer() {
        let req: AddMemberRequest =
            serde_json::from_str(r#"{"email": "new@example.com"}"#).unwrap();
        assert_eq!(req.role, MemberRole::Viewer);
    }
}
