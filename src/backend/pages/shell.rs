//! HTML shell served on page load.
//!
//! The shell only bootstraps the client script. Without a fingerprint the
//! script derives one and reloads with `?hash=`; with one it opens `/ws`.

const SHELL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/css/canvas.css">
</head>
<body data-bound="{bound}">
    <canvas id="canvas"></canvas>
    <div id="cooldown" hidden></div>
    <script type="module" src="/static/js/canvas.js"></script>
</body>
</html>
"#;

pub const PAGE_TITLE: &str = "pixelboard";

/// Render the shell; `bound` tells the script whether this page load
/// registered a fingerprint
pub fn render_shell(bound: bool) -> String {
    SHELL_TEMPLATE
        .replace("{title}", PAGE_TITLE)
        .replace("{bound}", if bound { "true" } else { "false" })
}
