/// The authorization resolver
///
/// Every endpoint that reads or mutates team-owned data asks the same
/// question: may this user perform this action in this team? This module
/// answers it as a pure function of three already-fetched values (the team
/// row, the caller's membership row or its absence, and the action) so
/// the decision logic exists exactly once instead of being re-derived in
/// every handler.
///
/// # Decision procedure
///
/// 1. **Ownership bypass**: the user named by `team.owner_id` is allowed
///    unconditionally, even when their membership row is missing or stale.
/// 2. No membership row → `NotAMember`.
/// 3. Otherwise the member's role must meet `action.min_role()` in the
///    strict order owner > admin > editor > viewer, else
///    `InsufficientRole`.
///
/// Two refinements sit next to the base procedure:
///
/// - [`authorize_with_creator_override`] additionally allows the entity's
///   creator (used for task and comment deletion). The override never
///   applies to non-members: membership is checked before the creator
///   comparison.
/// - [`authorize_member_removal`] denies `CannotRemoveOwner` whenever the
///   **target** membership holds the owner role, before any check on the
///   acting user, so even the team owner cannot remove an owner-role row
///   through this path.
///
/// Denial is a normal return value, not a failure: callers map
/// `AuthzError` to 403. "Entity does not exist" is never an authorization
/// outcome: the caller resolves the ancestor chain first and returns 404
/// when it breaks.

use uuid::Uuid;

use crate::models::membership::{MemberRole, Membership};
use crate::models::team::Team;

/// Actions subject to authorization, each annotated with a minimum role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read anything within the team: projects, boards, tasks, members,
    /// comments, the activity feed
    View,

    /// Create a project
    CreateProject,

    /// Create a board
    CreateBoard,

    /// Create a task
    CreateTask,

    /// Comment on a task
    CreateComment,

    /// Add a member to the team
    AddMember,

    /// Remove a member from the team (see [`authorize_member_removal`])
    RemoveMember,

    /// Create, list or revoke invitations
    ManageInvitations,

    /// Delete the team itself
    DeleteTeam,

    /// Delete a project
    DeleteProject,

    /// Delete a board
    DeleteBoard,

    /// Delete a task (creator override applies)
    DeleteTask,

    /// Delete a comment (author override applies)
    DeleteComment,
}

impl Action {
    /// Minimum role required for this action
    ///
    /// Any member may view and create content; member management takes
    /// admin; destructive operations take admin, except deleting the team
    /// itself which takes owner.
    pub fn min_role(&self) -> MemberRole {
        match self {
            Action::View
            | Action::CreateProject
            | Action::CreateBoard
            | Action::CreateTask
            | Action::CreateComment => MemberRole::Viewer,

            Action::AddMember
            | Action::RemoveMember
            | Action::ManageInvitations
            | Action::DeleteProject
            | Action::DeleteBoard
            | Action::DeleteTask
            | Action::DeleteComment => MemberRole::Admin,

            Action::DeleteTeam => MemberRole::Owner,
        }
    }
}

/// Denial reasons
///
/// The display strings are the reason text surfaced in 403 responses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// The acting user has no membership in the team
    #[error("you are not a member of team {0}")]
    NotAMember(Uuid),

    /// The acting user's role is below the action's minimum
    #[error("requires {required} role or higher, you are {actual}")]
    InsufficientRole {
        required: MemberRole,
        actual: MemberRole,
    },

    /// The target of a remove-member operation holds the owner role
    #[error("the team owner cannot be removed")]
    CannotRemoveOwner,
}

/// Decides whether `user_id` may perform `action` in `team`
///
/// `membership` is the row for (team.id, user_id), or None when the user
/// has no membership. The caller is responsible for having fetched both
/// against the same team; nothing here touches storage.
pub fn authorize(
    user_id: &str,
    team: &Team,
    membership: Option<&Membership>,
    action: Action,
) -> Result<(), AuthzError> {
    if team.owner_id == user_id {
        return Ok(());
    }

    let member = membership.ok_or(AuthzError::NotAMember(team.id))?;

    let required = action.min_role();
    if member.role.meets(required) {
        Ok(())
    } else {
        Err(AuthzError::InsufficientRole {
            required,
            actual: member.role,
        })
    }
}

/// [`authorize`], additionally allowing the entity's creator
///
/// `created_by` is the entity's creator column (None when the creating
/// user has been deleted). The override requires membership: a non-member
/// creator is denied `NotAMember` like anyone else.
pub fn authorize_with_creator_override(
    user_id: &str,
    team: &Team,
    membership: Option<&Membership>,
    action: Action,
    created_by: Option<&str>,
) -> Result<(), AuthzError> {
    if team.owner_id == user_id {
        return Ok(());
    }

    let member = membership.ok_or(AuthzError::NotAMember(team.id))?;

    if created_by == Some(user_id) {
        return Ok(());
    }

    let required = action.min_role();
    if member.role.meets(required) {
        Ok(())
    } else {
        Err(AuthzError::InsufficientRole {
            required,
            actual: member.role,
        })
    }
}

/// Decides whether `user_id` may remove the `target` membership
///
/// An owner-role membership can never be removed through this path,
/// whoever asks: the target check runs before the ownership bypass and the
/// acting-role check, so the denial reason is `CannotRemoveOwner` for
/// every caller. (Changing who owns a team is a transfer, not a removal.)
pub fn authorize_member_removal(
    user_id: &str,
    team: &Team,
    membership: Option<&Membership>,
    target: &Membership,
) -> Result<(), AuthzError> {
    if target.role == MemberRole::Owner {
        return Err(AuthzError::CannotRemoveOwner);
    }

    authorize(user_id, team, membership, Action::RemoveMember)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn team(owner_id: &str) -> Team {
        Team {
            id: Uuid::new_v4(),
            name: "Test Team".to_string(),
            description: None,
            owner_id: owner_id.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn membership(team: &Team, user_id: &str, role: MemberRole) -> Membership {
        Membership {
            id: Uuid::new_v4(),
            team_id: team.id,
            user_id: user_id.to_string(),
            role,
            joined_at: Utc::now(),
        }
    }

    const ALL_ACTIONS: [Action; 13] = [
        Action::View,
        Action::CreateProject,
        Action::CreateBoard,
        Action::CreateTask,
        Action::CreateComment,
        Action::AddMember,
        Action::RemoveMember,
        Action::ManageInvitations,
        Action::DeleteTeam,
        Action::DeleteProject,
        Action::DeleteBoard,
        Action::DeleteTask,
        Action::DeleteComment,
    ];

    #[test]
    fn test_owner_bypass_without_membership_row() {
        let t = team("owner-1");

        for action in ALL_ACTIONS {
            assert_eq!(authorize("owner-1", &t, None, action), Ok(()));
        }
    }

    #[test]
    fn test_owner_bypass_ignores_stale_role() {
        // Owner demoted to viewer in the membership table still passes:
        // ownership is checked against the team row, not the membership.
        let t = team("owner-1");
        let stale = membership(&t, "owner-1", MemberRole::Viewer);

        assert_eq!(
            authorize("owner-1", &t, Some(&stale), Action::DeleteTeam),
            Ok(())
        );
    }

    #[test]
    fn test_non_member_denied_every_action() {
        let t = team("owner-1");

        for action in ALL_ACTIONS {
            assert_eq!(
                authorize("stranger", &t, None, action),
                Err(AuthzError::NotAMember(t.id))
            );
        }
    }

    #[test]
    fn test_role_threshold_matrix() {
        let t = team("owner-1");
        let roles = [
            MemberRole::Viewer,
            MemberRole::Editor,
            MemberRole::Admin,
            MemberRole::Owner,
        ];

        for role in roles {
            let m = membership(&t, "user-2", role);
            for action in ALL_ACTIONS {
                let decision = authorize("user-2", &t, Some(&m), action);
                if role.meets(action.min_role()) {
                    assert_eq!(decision, Ok(()), "{role} should pass {action:?}");
                } else {
                    assert_eq!(
                        decision,
                        Err(AuthzError::InsufficientRole {
                            required: action.min_role(),
                            actual: role,
                        }),
                        "{role} should fail {action:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_any_member_may_view_and_create() {
        let t = team("owner-1");
        let viewer = membership(&t, "user-2", MemberRole::Viewer);

        for action in [
            Action::View,
            Action::CreateProject,
            Action::CreateBoard,
            Action::CreateTask,
            Action::CreateComment,
        ] {
            assert_eq!(authorize("user-2", &t, Some(&viewer), action), Ok(()));
        }
    }

    #[test]
    fn test_delete_team_requires_owner_role() {
        let t = team("owner-1");
        let admin = membership(&t, "user-2", MemberRole::Admin);

        assert_eq!(
            authorize("user-2", &t, Some(&admin), Action::DeleteTeam),
            Err(AuthzError::InsufficientRole {
                required: MemberRole::Owner,
                actual: MemberRole::Admin,
            })
        );
    }

    #[test]
    fn test_creator_override_allows_viewer() {
        let t = team("owner-1");
        let viewer = membership(&t, "user-3", MemberRole::Viewer);

        assert_eq!(
            authorize_with_creator_override(
                "user-3",
                &t,
                Some(&viewer),
                Action::DeleteTask,
                Some("user-3"),
            ),
            Ok(())
        );
    }

    #[test]
    fn test_creator_override_requires_membership() {
        let t = team("owner-1");

        // The creator left the team: no membership row, no override.
        assert_eq!(
            authorize_with_creator_override("user-3", &t, None, Action::DeleteTask, Some("user-3")),
            Err(AuthzError::NotAMember(t.id))
        );
    }

    #[test]
    fn test_creator_override_not_for_other_members() {
        let t = team("owner-1");
        let editor = membership(&t, "user-4", MemberRole::Editor);

        assert_eq!(
            authorize_with_creator_override(
                "user-4",
                &t,
                Some(&editor),
                Action::DeleteTask,
                Some("user-3"),
            ),
            Err(AuthzError::InsufficientRole {
                required: MemberRole::Admin,
                actual: MemberRole::Editor,
            })
        );
    }

    #[test]
    fn test_creator_override_ignores_orphaned_creator() {
        let t = team("owner-1");
        let viewer = membership(&t, "user-3", MemberRole::Viewer);

        // created_by was nulled when the creator's account was deleted;
        // nobody inherits the override.
        assert_eq!(
            authorize_with_creator_override("user-3", &t, Some(&viewer), Action::DeleteTask, None),
            Err(AuthzError::InsufficientRole {
                required: MemberRole::Admin,
                actual: MemberRole::Viewer,
            })
        );
    }

    #[test]
    fn test_owner_role_cannot_be_removed_by_anyone() {
        let t = team("owner-1");
        let target = membership(&t, "owner-2", MemberRole::Owner);

        let callers: [(&str, Option<MemberRole>); 4] = [
            ("owner-1", None),                     // the team owner itself
            ("user-2", Some(MemberRole::Admin)),
            ("user-3", Some(MemberRole::Viewer)),
            ("stranger", None),
        ];

        for (caller, role) in callers {
            let m = role.map(|r| membership(&t, caller, r));
            assert_eq!(
                authorize_member_removal(caller, &t, m.as_ref(), &target),
                Err(AuthzError::CannotRemoveOwner),
                "caller {caller} should be denied"
            );
        }
    }

    #[test]
    fn test_member_removal_requires_admin() {
        let t = team("owner-1");
        let target = membership(&t, "user-5", MemberRole::Editor);

        let admin = membership(&t, "user-2", MemberRole::Admin);
        assert_eq!(
            authorize_member_removal("user-2", &t, Some(&admin), &target),
            Ok(())
        );

        let editor = membership(&t, "user-4", MemberRole::Editor);
        assert_eq!(
            authorize_member_removal("user-4", &t, Some(&editor), &target),
            Err(AuthzError::InsufficientRole {
                required: MemberRole::Admin,
                actual: MemberRole::Editor,
            })
        );

        // Team owner passes via the ownership bypass.
        assert_eq!(authorize_member_removal("owner-1", &t, None, &target), Ok(()));
    }

    #[test]
    fn test_deny_reasons_read_well() {
        let t = team("owner-1");

        let err = authorize("stranger", &t, None, Action::View).unwrap_err();
        assert!(err.to_string().contains("not a member"));

        let viewer = membership(&t, "user-2", MemberRole::Viewer);
        let err = authorize("user-2", &t, Some(&viewer), Action::DeleteBoard).unwrap_err();
        assert_eq!(
            err.to_string(),
            "requires admin role or higher, you are viewer"
        );

        assert_eq!(
            AuthzError::CannotRemoveOwner.to_string(),
            "the team owner cannot be removed"
        );
    }
}
