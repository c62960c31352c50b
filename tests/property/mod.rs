//! Property-based tests

#[cfg(feature = "ssr")]
pub mod canvas_proptest;
pub mod protocol_proptest;
