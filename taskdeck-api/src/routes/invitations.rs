/// Invitation endpoints
///
/// Invitations bring users into a team by email: an admin creates one, the
/// invitee presents its token to accept and becomes a member with the
/// invited role.
///
/// # Endpoints
///
/// - `POST   /api/invitations` - Create an invitation (admin)
/// - `GET    /api/invitations/:team_id` - List a team's invitations (admin)
/// - `DELETE /api/invitations/:invitation_id` - Revoke a pending invitation (admin)
/// - `POST   /api/invitations/accept/:token` - Accept an invitation

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
use rand::{distributions::Alphanumeric, Rng};
use serde::Deserialize;
use taskdeck_shared::auth::authorization::Action;
use taskdeck_shared::auth::middleware::AuthContext;
use taskdeck_shared::auth::scope::TeamScope;
use taskdeck_shared::models::invitation::{
    CreateInvitation, Invitation, InvitationStatus,
};
use taskdeck_shared::models::membership::{CreateMembership, MemberRole, Membership};
use taskdeck_shared::models::user::User;
use uuid::Uuid;
use validator::Validate;

/// Create invitation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    /// Team to invite into
    pub team_id: Uuid,

    /// Invitee email
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    /// Role the membership will be created with (defaults to viewer)
    #[serde(default = "default_invite_role")]
    pub role: MemberRole,
}

fn default_invite_role() -> MemberRole {
    MemberRole::Viewer
}

/// Length of generated accept tokens
const TOKEN_LENGTH: usize = 32;

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Creates an invitation
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `403 Forbidden`: caller is below admin
/// - `404 Not Found`: team not found
pub async fn create_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateInvitationRequest>,
) -> ApiResult<(StatusCode, Json<Invitation>)> {
    req.validate()?;

    let scope = TeamScope::resolve(&state.db, req.team_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::ManageInvitations)?;

    let invitation = Invitation::create(
        &state.db,
        CreateInvitation {
            team_id: req.team_id,
            email: req.email,
            role: req.role,
            token: generate_token(),
        },
    )
    .await?;

    tracing::info!(
        invitation_id = %invitation.id,
        team_id = %invitation.team_id,
        role = %invitation.role,
        "invitation created"
    );

    Ok((StatusCode::CREATED, Json(invitation)))
}

/// Lists a team's invitations, newest first
pub async fn list_invitations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Invitation>>> {
    let scope = TeamScope::resolve(&state.db, team_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::ManageInvitations)?;

    let invitations = Invitation::list_by_team(&state.db, team_id).await?;
    Ok(Json(invitations))
}

/// Revokes a pending invitation
///
/// # Errors
///
/// - `403 Forbidden`: caller is below admin
/// - `404 Not Found`: invitation or team not found
/// - `409 Conflict`: invitation already accepted or revoked
pub async fn revoke_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(invitation_id): Path<Uuid>,
) -> ApiResult<Json<Invitation>> {
    let invitation = Invitation::find_by_id(&state.db, invitation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    let scope = TeamScope::resolve(&state.db, invitation.team_id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    scope.authorize(&auth.user_id, Action::ManageInvitations)?;

    let revoked = Invitation::transition(&state.db, invitation_id, InvitationStatus::Revoked)
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("Invitation is no longer pending".to_string())
        })?;

    Ok(Json(revoked))
}

/// Accepts an invitation
///
/// The session user's email must match the invitation. On success the
/// caller becomes a member with the invited role and the invitation is
/// marked accepted.
///
/// # Errors
///
/// - `403 Forbidden`: invitation was issued to a different email
/// - `404 Not Found`: token unknown, or invitation no longer pending
/// - `409 Conflict`: caller is already a member
pub async fn accept_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(token): Path<String>,
) -> ApiResult<(StatusCode, Json<Membership>)> {
    let invitation = Invitation::find_by_token(&state.db, &token)
        .await?
        .filter(Invitation::is_pending)
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    let user = User::find_by_id(&state.db, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::InternalError("Session user missing".to_string()))?;

    if !user.email.eq_ignore_ascii_case(&invitation.email) {
        return Err(ApiError::Forbidden(
            "this invitation was issued to a different email address".to_string(),
        ));
    }

    if Membership::find(&state.db, invitation.team_id, &auth.user_id)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "You are already a member of this team".to_string(),
        ));
    }

    // The pending->accepted transition is guarded in SQL, so only one
    // accept can win a race.
    Invitation::transition(&state.db, invitation.id, InvitationStatus::Accepted)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    let membership = Membership::create(
        &state.db,
        CreateMembership {
            team_id: invitation.team_id,
            user_id: auth.user_id.clone(),
            role: invitation.role,
        },
    )
    .await?;

    tracing::info!(
        team_id = %invitation.team_id,
        user_id = %auth.user_id,
        role = %invitation.role,
        "invitation accepted"
    );

    record_activity(
        &state.db,
        invitation.team_id,
        &auth.user_id,
        "member.joined",
        "membership",
        Some(auth.user_id.clone()),
    )
    .await;

    Ok((StatusCode::CREATED, Json(membership)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));

        // Two tokens colliding would mean a broken RNG.
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_create_invitation_request_validation() {
        let valid = CreateInvitationRequest {
            team_id: Uuid::new_v4(),
            email: "new@example.com".to_string(),
            role: MemberRole::Editor,
        };
        assert!(valid.validate().is_ok());

        let invalid = CreateInvitationRequest {
            team_id: Uuid::new_v4(),
            email: "nope".to_string(),
            role: MemberRole::Viewer,
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_invite_role_defaults_to_viewer() {
        let req: CreateInvitationRequest = serde_json::from_str(
            r#"{"team_id": "550e8400-e29b-41d4-a716-446655440000", "email": "new@example.com"}"#,
        )
        .unwrap();
        assert_eq!(req.role, MemberRole::Viewer);
    }
}
