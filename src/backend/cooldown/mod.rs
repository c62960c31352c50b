//! Cooldown Module
//!
//! Per-identity edit cooldown. The ledger is the only authority on whether an
//! edit may be applied; the expiry it reports to clients is advisory for
//! their countdown display.
//!
//! Check-and-record is only ever performed by the edit writer task, which
//! makes the pair atomic per user without holding the ledger lock across
//! the grid write.

/// Cooldown ledger
pub mod ledger;

pub use ledger::{spawn_ledger_sweeper, CooldownEntry, CooldownLedger};
