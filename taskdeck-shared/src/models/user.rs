/// User model
///
/// Users are created and owned by the external auth provider; TaskDeck only
/// references them. The `create` function exists for provisioning and test
/// harnesses, not for any API endpoint.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id TEXT PRIMARY KEY,
///     name TEXT NOT NULL,
///     email TEXT NOT NULL UNIQUE,
///     email_verified BOOLEAN NOT NULL DEFAULT FALSE,
///     image TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// User IDs are opaque text, assigned by the auth provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User record as the auth provider stores it
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Opaque stable identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Email address (unique)
    pub email: String,

    /// Whether the auth provider has verified the email
    pub email_verified: bool,

    /// Optional avatar URL
    pub image: Option<String>,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a user (provisioning/test harness only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Opaque stable identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,
}

impl User {
    /// Inserts a user row
    ///
    /// At runtime users come from the auth provider; this is used by
    /// provisioning scripts and the test harness.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, email_verified, image, created_at, updated_at
            "#,
        )
        .bind(&data.id)
        .bind(&data.name)
        .bind(&data.email)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, email_verified, image, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email
    ///
    /// Used by the add-member endpoint, which addresses users by email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, email_verified, image, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
