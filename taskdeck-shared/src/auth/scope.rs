/// Ancestor-chain resolution
///
/// Authorization is always decided against a team, but requests arrive
/// addressing a task, a board or a project, several relationship hops away
/// from it. `TeamScope` walks the chain (Task -> Board -> Project -> Team)
/// once, fetches the caller's membership row alongside, and hands both to
/// the pure resolver in [`super::authorization`].
///
/// Every resolver returns `None` whenever any link of the chain is missing,
/// which the caller surfaces as 404. A broken chain is a NotFound, never an
/// authorization outcome.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::auth::authorization::Action;
/// use taskdeck_shared::auth::scope::TeamScope;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, board_id: Uuid, user_id: &str) -> Result<(), Box<dyn std::error::Error>> {
/// let Some((board, scope)) = TeamScope::for_board(&pool, board_id, user_id).await? else {
///     // 404
///     return Ok(());
/// };
/// scope.authorize(user_id, Action::DeleteBoard)?; // 403 on Err
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use super::authorization::{
    authorize, authorize_with_creator_override, Action, AuthzError,
};
use crate::models::board::Board;
use crate::models::membership::Membership;
use crate::models::project::Project;
use crate::models::task::Task;
use crate::models::team::Team;

/// The pair every authorization decision is evaluated against
#[derive(Debug, Clone)]
pub struct TeamScope {
    /// The owning team of the entity being acted on
    pub team: Team,

    /// The acting user's membership in that team, if any
    pub membership: Option<Membership>,
}

impl TeamScope {
    /// Resolves a team directly
    pub async fn resolve(
        pool: &PgPool,
        team_id: Uuid,
        user_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let Some(team) = Team::find_by_id(pool, team_id).await? else {
            return Ok(None);
        };

        let membership = Membership::find(pool, team.id, user_id).await?;

        Ok(Some(TeamScope { team, membership }))
    }

    /// Resolves a project up to its team
    pub async fn for_project(
        pool: &PgPool,
        project_id: Uuid,
        user_id: &str,
    ) -> Result<Option<(Project, Self)>, sqlx::Error> {
        let Some(project) = Project::find_by_id(pool, project_id).await? else {
            return Ok(None);
        };

        let scope = Self::resolve(pool, project.team_id, user_id).await?;
        Ok(scope.map(|scope| (project, scope)))
    }

    /// Resolves a board up through its project to the team
    pub async fn for_board(
        pool: &PgPool,
        board_id: Uuid,
        user_id: &str,
    ) -> Result<Option<(Board, Self)>, sqlx::Error> {
        let Some(board) = Board::find_by_id(pool, board_id).await? else {
            return Ok(None);
        };

        let Some(project) = Project::find_by_id(pool, board.project_id).await? else {
            return Ok(None);
        };

        let scope = Self::resolve(pool, project.team_id, user_id).await?;
        Ok(scope.map(|scope| (board, scope)))
    }

    /// Resolves a task up through board and project to the team
    pub async fn for_task(
        pool: &PgPool,
        task_id: Uuid,
        user_id: &str,
    ) -> Result<Option<(Task, Self)>, sqlx::Error> {
        let Some(task) = Task::find_by_id(pool, task_id).await? else {
            return Ok(None);
        };

        let Some(board) = Board::find_by_id(pool, task.board_id).await? else {
            return Ok(None);
        };

        let Some(project) = Project::find_by_id(pool, board.project_id).await? else {
            return Ok(None);
        };

        let scope = Self::resolve(pool, project.team_id, user_id).await?;
        Ok(scope.map(|scope| (task, scope)))
    }

    /// Decides `action` for `user_id` within this scope
    pub fn authorize(&self, user_id: &str, action: Action) -> Result<(), AuthzError> {
        authorize(user_id, &self.team, self.membership.as_ref(), action)
    }

    /// Decides `action`, additionally allowing the entity's creator
    pub fn authorize_with_creator_override(
        &self,
        user_id: &str,
        action: Action,
        created_by: Option<&str>,
    ) -> Result<(), AuthzError> {
        authorize_with_creator_override(
            user_id,
            &self.team,
            self.membership.as_ref(),
            action,
            created_by,
        )
    }
}
