/// Session authentication middleware for axum
///
/// Extracts the bearer token from the Authorization header, resolves it
/// through [`super::session`], and injects an [`AuthContext`] into request
/// extensions for handlers to pick up with axum's `Extension` extractor.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskdeck_shared::auth::middleware::{create_session_middleware, AuthContext};
/// use sqlx::PgPool;
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     auth.user_id
/// }
///
/// fn router(pool: PgPool) -> Router {
///     Router::new()
///         .route("/whoami", get(whoami))
///         .layer(middleware::from_fn(create_session_middleware(pool)))
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::session::Session;

/// Authentication context added to request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: String,

    /// Session the request authenticated with
    pub session_id: String,
}

impl AuthContext {
    /// Creates auth context from a resolved session
    pub fn from_session(session: &Session) -> Self {
        Self {
            user_id: session.user_id.clone(),
            session_id: session.id.clone(),
        }
    }
}

/// Error type for the authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing Authorization header
    MissingCredentials,

    /// Authorization header is not a bearer token
    InvalidFormat(String),

    /// Token unknown or session expired
    InvalidSession,

    /// Session lookup failed
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidSession => {
                (StatusCode::UNAUTHORIZED, "Invalid or expired session").into_response()
            }
            AuthError::DatabaseError(msg) => {
                tracing::error!(error = %msg, "session lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Session authentication middleware
///
/// Validates `Authorization: Bearer <token>` against the sessions table.
///
/// # Errors
///
/// Returns 401 when the header is missing, the token is unknown, or the
/// session has expired; 400 when the header is not a bearer token.
pub async fn session_auth_middleware(
    pool: PgPool,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let session = Session::find_valid(&pool, token)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::InvalidSession)?;

    req.extensions_mut()
        .insert(AuthContext::from_session(&session));

    Ok(next.run(req).await)
}

/// Creates a session authentication middleware closure
///
/// Helper that captures the database pool and returns a function usable
/// with `axum::middleware::from_fn`.
pub fn create_session_middleware(
    pool: PgPool,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    move |req, next| {
        let pool = pool.clone();
        Box::pin(session_auth_middleware(pool, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_auth_context_from_session() {
        let session = Session {
            id: "sess-1".to_string(),
            token: "tok-1".to_string(),
            user_id: "user-1".to_string(),
            expires_at: Utc::now(),
            ip_address: None,
            user_agent: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let context = AuthContext::from_session(&session);
        assert_eq!(context.user_id, "user-1");
        assert_eq!(context.session_id, "sess-1");
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidFormat("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AuthError::InvalidSession.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::DatabaseError("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
