/// API route handlers, organized by resource
///
/// - `health`: Health check endpoint
/// - `teams`: Team CRUD and the per-team activity feed
/// - `team_members`: Member listing and management
/// - `projects`, `boards`, `tasks`: Content hierarchy
/// - `comments`: Comments on tasks
/// - `invitations`: Email invitations into a team
///
/// Every handler follows the same shape: authenticate (session middleware)
/// → validate input → resolve the target and its ancestor chain (404 when
/// it breaks) → authorize against the resolved team (403 with reason) →
/// perform the store operation.

use sqlx::PgPool;
use taskdeck_shared::models::activity::Activity;
use uuid::Uuid;

pub mod boards;
pub mod comments;
pub mod health;
pub mod invitations;
pub mod projects;
pub mod tasks;
pub mod team_members;
pub mod teams;

/// Records an activity row, best effort
///
/// The audit feed must never fail the request it describes, so insert
/// errors are logged and swallowed.
pub(crate) async fn record_activity(
    db: &PgPool,
    team_id: Uuid,
    user_id: &str,
    action: &str,
    entity_type: &str,
    entity_id: Option<String>,
) {
    if let Err(e) = Activity::record(db, team_id, user_id, action, entity_type, entity_id).await {
        tracing::warn!(error = %e, action, "failed to record activity");
    }
}
