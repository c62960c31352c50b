//! Identity Module
//!
//! This module maps realtime connections to durable user identities.
//!
//! # Architecture
//!
//! - **`users`** - User records and SQL operations
//! - **`bindings`** - Short-TTL page-load `address -> fingerprint` cache
//! - **`resolver`** - Handshake: binding lookup, user lookup or creation
//!
//! # Identity Flow
//!
//! 1. **Page load**: `GET /` stores the fingerprint for the caller's address
//! 2. **Handshake**: `GET /ws` consumes that binding and resolves the
//!    (address, fingerprint) pair to a `UserId`, creating the user if unseen
//! 3. **Failure**: no binding → `invalidHash`; store failure → `missingUser`

use std::net::IpAddr;
use thiserror::Error;

use crate::shared::HandshakeFailure;

/// User records and SQL operations
pub mod users;

/// Page-load binding cache
pub mod bindings;

/// Handshake identity resolution
pub mod resolver;

pub use bindings::{spawn_binding_sweeper, BindingCache};
pub use resolver::{Identity, IdentityResolver};
pub use users::{User, UserId};

/// Errors that end a realtime handshake
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No live page-load binding for this address
    #[error("no page-load binding for {0}")]
    MissingBinding(IpAddr),

    /// A bound user id has no user record
    #[error("user {0} does not exist")]
    UnknownUser(UserId),

    /// The user store failed
    #[error("user store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl IdentityError {
    /// Signal sent to the client for this error
    pub fn failure(&self) -> HandshakeFailure {
        match self {
            Self::MissingBinding(_) => HandshakeFailure::InvalidHash,
            Self::UnknownUser(_) | Self::Store(_) => HandshakeFailure::MissingUser,
        }
    }
}
