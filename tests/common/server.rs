//! Server fixtures

use pixelboard::backend::routes::create_router;
use pixelboard::backend::server::{build_state, AppState};
use pixelboard::shared::ServerConfig;
use std::net::SocketAddr;
use tempfile::TempDir;

/// 10x10 canvas, chunk size 5, five minute cooldown, in-memory store, all
/// directories under `dir`
pub fn test_config(dir: &TempDir) -> ServerConfig {
    ServerConfig::builder()
        .canvas(10, 10)
        .chunk_size(5)
        .cooldown_secs(300)
        .database_url("sqlite::memory:")
        .audit_dir(dir.path().join("logs"))
        .cache_dir(dir.path().join("cache"))
        .static_dir(dir.path().join("public"))
        .build()
        .expect("test config is valid")
}

/// A server bound to an ephemeral loopback port
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    pub dir: TempDir,
}

impl TestServer {
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = test_config(&dir);
        let state = build_state(config).await.expect("state builds");
        let app = create_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .expect("server runs");
        });

        Self { addr, state, dir }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self, query: &str) -> String {
        format!("ws://{}/ws{}", self.addr, query)
    }

    /// Page load with `fingerprint`, as a browser would before connecting
    pub async fn page_load(&self, fingerprint: &str) {
        let response = reqwest::get(self.url(&format!("/?hash={}", fingerprint)))
            .await
            .expect("page load");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }
}
