/**
 * Identity Resolver
 *
 * Turns a realtime connection's (address, fingerprint) pair into a durable
 * `UserId`. The fingerprint is never taken from the realtime connection
 * itself: it comes from the page-load binding for the same address.
 *
 * First contact is serialized by an in-memory gate, and the store's
 * `(ip, fingerprint)` key backs it up, so two racing handshakes from one
 * client never create two users.
 */
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::backend::identity::bindings::BindingCache;
use crate::backend::identity::users::{self, UserId};
use crate::backend::identity::IdentityError;

/// A resolved identity, as needed by an active session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub timeout_until: Option<DateTime<Utc>>,
    pub modified_pixels: i64,
}

impl Identity {
    pub fn admin() -> Self {
        Self {
            user_id: UserId::ADMIN,
            timeout_until: None,
            modified_pixels: 0,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_id.is_admin()
    }
}

#[derive(Debug, Clone)]
pub struct IdentityResolver {
    pool: SqlitePool,
    bindings: BindingCache,
    gate: Arc<Mutex<()>>,
}

impl IdentityResolver {
    pub fn new(pool: SqlitePool, bindings: BindingCache) -> Self {
        Self {
            pool,
            bindings,
            gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn bindings(&self) -> &BindingCache {
        &self.bindings
    }

    /// Page-load phase: remember which fingerprint `address` presented
    pub fn bind_page_load(&self, address: IpAddr, fingerprint: impl Into<String>) {
        self.bindings.bind(address, fingerprint);
    }

    /// Handshake phase: remove and return the fingerprint bound to `address`
    pub fn consume_binding(&self, address: IpAddr) -> Option<String> {
        self.bindings.consume(address)
    }

    /// Look up the user bound to the pair, creating one if unseen
    pub async fn resolve_or_create(&self, address: IpAddr, fingerprint: &str) -> Result<UserId, IdentityError> {
        let ip = address.to_string();
        let _gate = self.gate.lock().await;

        if let Some(user_id) = users::find_user_by_binding(&self.pool, &ip, fingerprint).await? {
            return Ok(user_id);
        }

        let user_id = users::create_user_for_binding(&self.pool, &ip, fingerprint).await?;
        tracing::info!("[Identity] Created user {} for {}", user_id, ip);
        Ok(user_id)
    }

    /// Full realtime handshake for a connection from `address`.
    ///
    /// The page-load binding is required for everyone. The admin identity is
    /// granted only when the connection also asserts it and comes from a
    /// loopback address; otherwise the assertion is ignored.
    pub async fn handshake(&self, address: IpAddr, asserts_admin: bool) -> Result<Identity, IdentityError> {
        let fingerprint = self
            .consume_binding(address)
            .ok_or(IdentityError::MissingBinding(address))?;

        if asserts_admin {
            if address.is_loopback() {
                tracing::info!("[Identity] Admin handshake from {}", address);
                return Ok(Identity::admin());
            }
            tracing::warn!("[Identity] Ignoring admin assertion from non-loopback {}", address);
        }

        let user_id = self.resolve_or_create(address, &fingerprint).await?;
        let user = users::get_user_by_id(&self.pool, user_id)
            .await?
            .ok_or(IdentityError::UnknownUser(user_id))?;

        let pool = self.pool.clone();
        tokio::spawn(async move {
            if let Err(e) = users::touch_last_seen(&pool, user_id).await {
                tracing::warn!("[Identity] Failed to update last seen for {}: {:?}", user_id, e);
            }
        });

        Ok(Identity {
            user_id,
            timeout_until: user.timeout_until,
            modified_pixels: user.modified_pixels,
        })
    }
}
