/// Session lookup against the auth provider's table
///
/// TaskDeck does not issue or refresh sessions; the external auth provider
/// owns the sessions table and its cryptography. This module is the
/// read-only view the API needs: given a bearer token, find the session and
/// check that it has not expired.
///
/// # Schema (provider-owned)
///
/// ```sql
/// CREATE TABLE sessions (
///     id TEXT PRIMARY KEY,
///     token TEXT NOT NULL UNIQUE,
///     user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     expires_at TIMESTAMPTZ NOT NULL,
///     ip_address TEXT,
///     user_agent TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Session record as the auth provider stores it
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Session ID
    pub id: String,

    /// Bearer token presented by the client
    pub token: String,

    /// Authenticated user
    pub user_id: String,

    /// When the session stops being valid
    pub expires_at: DateTime<Utc>,

    /// Client IP at session creation, if recorded
    pub ip_address: Option<String>,

    /// Client user agent at session creation, if recorded
    pub user_agent: Option<String>,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session was last updated
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Finds a live session by bearer token
    ///
    /// Expiry is checked in the query itself, so an expired session is
    /// indistinguishable from a missing one: both are None.
    pub async fn find_valid(pool: &PgPool, token: &str) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, token, user_id, expires_at, ip_address, user_agent,
                   created_at, updated_at
            FROM sessions
            WHERE token = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Inserts a session row (test harness only)
    ///
    /// At runtime sessions come from the auth provider.
    pub async fn create(
        pool: &PgPool,
        id: &str,
        token: &str,
        user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, token, user_id, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, token, user_id, expires_at, ip_address, user_agent,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            id: "sess-1".to_string(),
            token: "tok-1".to_string(),
            user_id: "user-1".to_string(),
            expires_at,
            ip_address: None,
            user_agent: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_expired() {
        assert!(session(Utc::now() - Duration::hours(1)).is_expired());
        assert!(!session(Utc::now() + Duration::hours(1)).is_expired());
    }
}
