//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::PathBuf;

use mock_server::config::ServerConfig;
use mock_server::lifecycle::Shutdown;
use mock_server::storage::RouteFile;
use mock_server::HttpServer;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub const SECRET: &str = "integration-secret";

/// A mock server running on an ephemeral port over a temporary directory.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub routes_path: PathBuf,
    pub responses_dir: PathBuf,
    shutdown: Shutdown,
    _dir: TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Write `routes` and `artifacts` to a temp dir and serve them.
#[allow(dead_code)]
pub async fn start_server(routes: &str, artifacts: &[(&str, &str)]) -> TestServer {
    start_server_with(routes, artifacts, |_| {}).await
}

/// Like [`start_server`], with a hook to adjust the configuration.
pub async fn start_server_with<F>(routes: &str, artifacts: &[(&str, &str)], configure: F) -> TestServer
where
    F: FnOnce(&mut ServerConfig),
{
    let dir = tempfile::tempdir().unwrap();
    let routes_path = dir.path().join("routes.json");
    let responses_dir = dir.path().join("responses");
    let static_dir = dir.path().join("static");

    std::fs::write(&routes_path, routes).unwrap();
    std::fs::create_dir_all(&responses_dir).unwrap();
    for (name, body) in artifacts {
        std::fs::write(responses_dir.join(name), body).unwrap();
    }
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join("index.html"), "<html>docs</html>").unwrap();

    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.routes.path = routes_path.display().to_string();
    config.responses.root = responses_dir.display().to_string();
    config.static_files.root = static_dir.display().to_string();
    config.auth.secret = SECRET.into();
    configure(&mut config);

    let table = RouteFile::new(&routes_path).load_table().unwrap();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (_, route_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config, table);

    tokio::spawn(async move {
        let _ = server.run(listener, route_updates, server_shutdown).await;
    });

    TestServer {
        addr,
        routes_path,
        responses_dir,
        shutdown,
        _dir: dir,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
