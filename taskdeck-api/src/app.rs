/// Application state and router builder
///
/// Defines the shared application state and builds the axum router with all
/// routes and middleware. The state is the only way handlers reach the
/// database and configuration; there are no module-level singletons.
///
/// # Router layout
///
/// ```text
/// /
/// ├── /health                         # public
/// └── /api/                           # session-authenticated
///     ├── /teams                      # list/create/delete + activity feed
///     ├── /team-members               # list/add/remove members
///     ├── /projects                   # list/create/delete
///     ├── /boards                     # list/create/delete
///     ├── /tasks                      # list/create/delete + comments
///     ├── /comments                   # delete
///     └── /invitations                # create/list/revoke/accept
/// ```
///
/// # Middleware stack
///
/// Applied outermost-first: security headers, CORS, request tracing; the
/// session middleware wraps only the `/api` subtree.

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdeck_shared::auth::middleware::create_session_middleware;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor; cheap to
/// clone (pool is internally ref-counted, config behind an Arc).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let team_routes = Router::new()
        .route("/", get(routes::teams::list_teams))
        .route("/", post(routes::teams::create_team))
        .route("/:team_id", delete(routes::teams::delete_team))
        .route("/:team_id/activity", get(routes::teams::list_activity));

    let member_routes = Router::new()
        .route("/:team_id", get(routes::team_members::list_members))
        .route("/:team_id", post(routes::team_members::add_member))
        .route(
            "/:team_id/:member_id",
            delete(routes::team_members::remove_member),
        );

    // GET lists by the parent's id, DELETE addresses the entity itself;
    // the shared ":id" segment means different things per method.
    let project_routes = Router::new()
        .route("/", post(routes::projects::create_project))
        .route(
            "/:id",
            get(routes::projects::list_projects).delete(routes::projects::delete_project),
        );

    let board_routes = Router::new()
        .route("/", post(routes::boards::create_board))
        .route(
            "/:id",
            get(routes::boards::list_boards).delete(routes::boards::delete_board),
        );

    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route(
            "/:id",
            get(routes::tasks::list_tasks).delete(routes::tasks::delete_task),
        )
        .route(
            "/:id/comments",
            get(routes::comments::list_comments).post(routes::comments::create_comment),
        );

    let comment_routes = Router::new().route("/:id", delete(routes::comments::delete_comment));

    let invitation_routes = Router::new()
        .route("/", post(routes::invitations::create_invitation))
        .route(
            "/:id",
            get(routes::invitations::list_invitations)
                .delete(routes::invitations::revoke_invitation),
        )
        .route(
            "/accept/:token",
            post(routes::invitations::accept_invitation),
        );

    // Everything under /api requires a valid session
    let api_routes = Router::new()
        .nest("/teams", team_routes)
        .nest("/team-members", member_routes)
        .nest("/projects", project_routes)
        .nest("/boards", board_routes)
        .nest("/tasks", task_routes)
        .nest("/comments", comment_routes)
        .nest("/invitations", invitation_routes)
        .layer(axum::middleware::from_fn(create_session_middleware(
            state.db.clone(),
        )));

    let cors = build_cors_layer(&state.config);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Configures CORS from the allowed-origins list
///
/// A lone "*" enables permissive mode for development; otherwise only the
/// configured origins are allowed, with credentials.
fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
