//! Integration tests against a built router or a live listener

pub mod http_routes_test;
pub mod realtime_session_test;
