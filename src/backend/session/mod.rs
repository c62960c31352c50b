//! Realtime Session Module
//!
//! - **`state`** - `EditSession`, the per-connection state machine
//! - **`socket`** - the `GET /ws` handler driving a session over a WebSocket
//! - **`counter`** - live session count

pub mod counter;
pub mod socket;
pub mod state;

pub use counter::{SessionCounter, SessionGuard};
pub use socket::{handle_realtime_upgrade, run_session, RealtimeQuery};
pub use state::{EditSession, SessionState};
