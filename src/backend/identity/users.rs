/**
 * User Model and Database Operations
 *
 * This module handles user records and their (address, fingerprint)
 * bindings in the SQL store. The `identities` table carries a primary key
 * on `(ip, fingerprint)`, so one physical client maps to exactly one user.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::fmt;

/// Stable, server-assigned user id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// The loopback admin identity; never stored in the database
    pub const ADMIN: UserId = UserId(0);

    pub fn is_admin(&self) -> bool {
        *self == Self::ADMIN
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: UserId,
    /// Random username (UUID v4)
    pub username: String,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Last successful realtime handshake
    pub last_seen_at: DateTime<Utc>,
    /// Cooldown expiry; `None` until the first accepted edit
    pub timeout_until: Option<DateTime<Utc>>,
    /// Number of accepted edits
    pub modified_pixels: i64,
}

/// Find the user bound to an (address, fingerprint) pair
pub async fn find_user_by_binding(
    pool: &SqlitePool,
    ip: &str,
    fingerprint: &str,
) -> Result<Option<UserId>, sqlx::Error> {
    let user_id = sqlx::query_scalar::<_, UserId>(
        r#"
        SELECT user_id
        FROM identities
        WHERE ip = ? AND fingerprint = ?
        "#,
    )
    .bind(ip)
    .bind(fingerprint)
    .fetch_optional(pool)
    .await?;

    Ok(user_id)
}

/// Create a user and bind it to an (address, fingerprint) pair
///
/// Runs in one transaction. If another writer bound the same pair first,
/// the new user is rolled back and the existing id is returned instead.
pub async fn create_user_for_binding(
    pool: &SqlitePool,
    ip: &str,
    fingerprint: &str,
) -> Result<UserId, sqlx::Error> {
    let username = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    let user_id = sqlx::query_scalar::<_, UserId>(
        r#"
        INSERT INTO users (username, created_at, last_seen_at, timeout_until, modified_pixels)
        VALUES (?, ?, ?, NULL, 0)
        RETURNING id
        "#,
    )
    .bind(&username)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let bound = sqlx::query(
        r#"
        INSERT INTO identities (ip, fingerprint, user_id, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (ip, fingerprint) DO NOTHING
        "#,
    )
    .bind(ip)
    .bind(fingerprint)
    .bind(user_id)
    .bind(now)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if bound == 0 {
        tx.rollback().await?;
        return find_user_by_binding(pool, ip, fingerprint)
            .await?
            .ok_or(sqlx::Error::RowNotFound);
    }

    tx.commit().await?;
    Ok(user_id)
}

/// Get user by ID
pub async fn get_user_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, created_at, last_seen_at, timeout_until, modified_pixels
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Refresh `last_seen_at`
pub async fn touch_last_seen(pool: &SqlitePool, id: UserId) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_seen_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Persist an accepted edit: new cooldown expiry and one more modified pixel
pub async fn record_edit(
    pool: &SqlitePool,
    id: UserId,
    timeout_until: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET timeout_until = ?, modified_pixels = modified_pixels + 1
        WHERE id = ?
        "#,
    )
    .bind(timeout_until)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Addresses a user has been seen from
pub async fn known_addresses(pool: &SqlitePool, id: UserId) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT DISTINCT ip FROM identities WHERE user_id = ? ORDER BY ip")
        .bind(id)
        .fetch_all(pool)
        .await
}

/// Fingerprints a user has been seen with
pub async fn known_fingerprints(pool: &SqlitePool, id: UserId) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT fingerprint FROM identities WHERE user_id = ? ORDER BY fingerprint",
    )
    .bind(id)
    .fetch_all(pool)
    .await
}
