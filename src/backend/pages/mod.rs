//! Page Module
//!
//! HTTP surface outside the realtime socket: page load, client error
//! reports and canvas stats.

pub mod handlers;
pub mod shell;

pub use handlers::{get_canvas_stats, render_canvas_page, report_client_error, CanvasStats};
