//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own database, seed dataset
//! and events catalog.

use super::constants::*;
use super::fixtures::{create_catalog_file, create_seed_file};
use hackathon_registry_server::catalog::EventCatalog;
use hackathon_registry_server::registry::{Registry, RegistryStore, SqliteRegistryStore};
use hackathon_registry_server::seed::{load_seed_file, seed_store};
use hackathon_registry_server::server::{server::make_app, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated database
///
/// When dropped, the server gracefully shuts down and temp resources are
/// cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Store handle for direct database access in tests
    pub store: Arc<dyn RegistryStore>,

    // Private fields - keep resources alive until drop
    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// This writes the seed and catalog fixtures into a temp directory,
    /// opens a fresh SQLite database, seeds it, binds to 127.0.0.1:0 and
    /// spawns the server in a background task, then waits until the home
    /// endpoint answers.
    ///
    /// # Panics
    ///
    /// Panics if any setup step fails or the server does not become ready
    /// within the timeout.
    pub async fn spawn() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let seed_path = create_seed_file(&temp_dir).expect("Failed to write seed fixture");
        let catalog_path = create_catalog_file(&temp_dir).expect("Failed to write catalog fixture");
        let db_path = temp_dir.path().join("registry.db");

        let store: Arc<dyn RegistryStore> =
            Arc::new(SqliteRegistryStore::new(&db_path).expect("Failed to open registry store"));

        let catalog = EventCatalog::load(&catalog_path).expect("Failed to load catalog fixture");

        let seed_users = load_seed_file(&seed_path).expect("Failed to load seed fixture");
        seed_store(store.as_ref(), &seed_users).expect("Failed to seed registry store");

        let store_for_test = store.clone();
        let registry = Arc::new(Registry::new(store, catalog));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
        };

        let app = make_app(config, registry).expect("Failed to build app");

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            store: store_for_test,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
