/**
 * Realtime Canvas Protocol
 *
 * This module defines the closed set of messages exchanged over the
 * realtime connection. Every frame is a JSON text frame shaped as
 * `{"type": <tag>, "data": <payload>}`.
 *
 * # Server → Client
 *
 * - `error` - handshake failed (`"invalidHash"` or `"missingUser"`)
 * - `timeoutUpdated` - new cooldown expiry (unix seconds)
 * - `postStats` - canvas dimensions and chunk size, sent once
 * - `postChunk` - one chunk of raw RGBA bytes
 * - `update` - one accepted pixel edit
 *
 * # Client → Server
 *
 * - `getChunk` - request one chunk
 * - `mouseDown` - submit a pixel edit
 * - `requestTimeout` - ask for the current cooldown expiry (no payload)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Version of the message set, reported to clients in `postStats`
pub const PROTOCOL_VERSION: u32 = 1;

/// An RGB color triple; serialized as `[r, g, b]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Color of a never-edited pixel
    pub const BACKGROUND: Color = Color([217, 217, 217]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn r(&self) -> u8 {
        self.0[0]
    }

    pub fn g(&self) -> u8 {
        self.0[1]
    }

    pub fn b(&self) -> u8 {
        self.0[2]
    }
}

/// A single accepted edit as seen by every connected client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelUpdate {
    pub x: u32,
    pub y: u32,
    pub color: Color,
}

/// Reason a realtime handshake was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandshakeFailure {
    /// No page-load binding for this address; the client must reload
    InvalidHash,
    /// The identity could not be created or loaded
    MissingUser,
}

/// Messages sent from the server to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    Error(HandshakeFailure),
    TimeoutUpdated(f64),
    #[serde(rename_all = "camelCase")]
    PostStats {
        width: u32,
        height: u32,
        chunk_size: u32,
        version: u32,
    },
    #[serde(rename_all = "camelCase")]
    PostChunk {
        chunk_x: u32,
        chunk_y: u32,
        data: Vec<u8>,
    },
    Update(PixelUpdate),
}

impl ServerMessage {
    /// `timeoutUpdated` carrying `expiry` as fractional unix seconds
    pub fn timeout_updated(expiry: DateTime<Utc>) -> Self {
        Self::TimeoutUpdated(expiry.timestamp_millis() as f64 / 1000.0)
    }

    pub fn stats(width: u32, height: u32, chunk_size: u32) -> Self {
        Self::PostStats {
            width,
            height,
            chunk_size,
            version: PROTOCOL_VERSION,
        }
    }

    /// Wire tag, used in log lines
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Error(_) => "error",
            Self::TimeoutUpdated(_) => "timeoutUpdated",
            Self::PostStats { .. } => "postStats",
            Self::PostChunk { .. } => "postChunk",
            Self::Update(_) => "update",
        }
    }

    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Messages sent from a client to the server
///
/// Coordinates are decoded as signed integers so that negative values reach
/// validation and are rejected there instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    GetChunk { chunk_x: i64, chunk_y: i64 },
    MouseDown { x: i64, y: i64, color: Color },
    RequestTimeout,
}

impl ClientMessage {
    /// Decode one text frame
    pub fn parse(text: &str) -> Result<Self, SharedError> {
        serde_json::from_str(text).map_err(|e| SharedError::protocol(e.to_string()))
    }
}
