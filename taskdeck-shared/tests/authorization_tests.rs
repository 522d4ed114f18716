/// Scenario tests for the authorization resolver
///
/// The resolver is pure, so these run against hand-built team and
/// membership rows, no database needed. Each test mirrors a workflow the
/// API exposes: creating and deleting boards, the task-creator override,
/// member removal.

use chrono::Utc;
use uuid::Uuid;

use taskdeck_shared::auth::authorization::{
    authorize, authorize_member_removal, authorize_with_creator_override, Action, AuthzError,
};
use taskdeck_shared::models::membership::{MemberRole, Membership};
use taskdeck_shared::models::team::Team;

fn team_owned_by(owner_id: &str) -> Team {
    Team {
        id: Uuid::new_v4(),
        name: "Acme".to_string(),
        description: None,
        owner_id: owner_id.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn member(team: &Team, user_id: &str, role: MemberRole) -> Membership {
    Membership {
        id: Uuid::new_v4(),
        team_id: team.id,
        user_id: user_id.to_string(),
        role,
        joined_at: Utc::now(),
    }
}

/// Team T owned by U1; U2 has role=editor. U2 may create a board in a
/// project of T, may not delete it (editor < admin), and U1 may.
#[test]
fn editor_creates_board_but_cannot_delete_it() {
    let team = team_owned_by("u1");
    let editor = member(&team, "u2", MemberRole::Editor);

    assert_eq!(
        authorize("u2", &team, Some(&editor), Action::CreateBoard),
        Ok(())
    );

    assert_eq!(
        authorize("u2", &team, Some(&editor), Action::DeleteBoard),
        Err(AuthzError::InsufficientRole {
            required: MemberRole::Admin,
            actual: MemberRole::Editor,
        })
    );

    // The owner deletes it, with no membership row at all.
    assert_eq!(authorize("u1", &team, None, Action::DeleteBoard), Ok(()));
}

/// U3 has role=viewer in T and created task X: the creator override lets
/// U3 delete X even though viewer < admin.
#[test]
fn viewer_deletes_own_task_via_creator_override() {
    let team = team_owned_by("u1");
    let viewer = member(&team, "u3", MemberRole::Viewer);

    assert_eq!(
        authorize_with_creator_override(
            "u3",
            &team,
            Some(&viewer),
            Action::DeleteTask,
            Some("u3"),
        ),
        Ok(())
    );

    // A different viewer gets the plain role denial.
    let other = member(&team, "u4", MemberRole::Viewer);
    assert_eq!(
        authorize_with_creator_override(
            "u4",
            &team,
            Some(&other),
            Action::DeleteTask,
            Some("u3"),
        ),
        Err(AuthzError::InsufficientRole {
            required: MemberRole::Admin,
            actual: MemberRole::Viewer,
        })
    );
}

/// The creator override never applies to non-members: a creator who left
/// the team is denied NotAMember.
#[test]
fn creator_override_requires_membership() {
    let team = team_owned_by("u1");

    assert_eq!(
        authorize_with_creator_override("u3", &team, None, Action::DeleteTask, Some("u3")),
        Err(AuthzError::NotAMember(team.id))
    );
}

/// An owner-role membership row can never be removed, whoever asks: even
/// the team owner, and even when (abnormally) several owner rows exist.
#[test]
fn owner_membership_rows_are_unremovable() {
    let team = team_owned_by("u1");
    let first_owner_row = member(&team, "u1", MemberRole::Owner);
    let second_owner_row = member(&team, "u2", MemberRole::Owner);
    let admin = member(&team, "u5", MemberRole::Admin);

    for target in [&first_owner_row, &second_owner_row] {
        assert_eq!(
            authorize_member_removal("u1", &team, Some(&first_owner_row), target),
            Err(AuthzError::CannotRemoveOwner)
        );
        assert_eq!(
            authorize_member_removal("u5", &team, Some(&admin), target),
            Err(AuthzError::CannotRemoveOwner)
        );
    }

    // Ordinary removals still work for admins.
    let editor = member(&team, "u6", MemberRole::Editor);
    assert_eq!(
        authorize_member_removal("u5", &team, Some(&admin), &editor),
        Ok(())
    );
}

/// The owner is fully privileged with no membership row for every action,
/// while a stranger is denied NotAMember for every action.
#[test]
fn ownership_is_independent_of_membership_rows() {
    let team = team_owned_by("u1");

    let actions = [
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

    for action in actions {
        assert_eq!(authorize("u1", &team, None, action), Ok(()));
        assert_eq!(
            authorize("nobody", &team, None, action),
            Err(AuthzError::NotAMember(team.id))
        );
    }
}

/// Deleting the team takes the owner role; admins are refused.
#[test]
fn only_owners_delete_teams() {
    let team = team_owned_by("u1");
    let admin = member(&team, "u2", MemberRole::Admin);
    let owner_row = member(&team, "u3", MemberRole::Owner);

    assert_eq!(
        authorize("u2", &team, Some(&admin), Action::DeleteTeam),
        Err(AuthzError::InsufficientRole {
            required: MemberRole::Owner,
            actual: MemberRole::Admin,
        })
    );

    // A role=owner membership row meets the threshold even when the user
    // is not teams.owner_id.
    assert_eq!(
        authorize("u3", &team, Some(&owner_row), Action::DeleteTeam),
        Ok(())
    );
}
