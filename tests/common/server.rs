//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own copy of the dataset.

use super::constants::*;
use super::fixtures::{write_dataset, TEST_DATASET_CSV};
use async_trait::async_trait;
use similarity_catalog_server::catalog::CsvTrackLoader;
use similarity_catalog_server::enrichment::{
    Enrichment, EnrichmentError, EnrichmentGateway, RelatedTrack,
};
use similarity_catalog_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use similarity_catalog_server::similarity::SimilarityService;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Enrichment gateway for testing.
///
/// Matches every track except "Unmatched Song" and fails lookups for
/// "Broken Lookup". External ids are derived from the track name.
struct FixtureGateway;

pub fn fixture_external_id(track_name: &str) -> String {
    format!("ext-{}", track_name.to_lowercase().replace(' ', "-"))
}

#[async_trait]
impl EnrichmentGateway for FixtureGateway {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn lookup(
        &self,
        track_name: &str,
        _artist: &str,
    ) -> Result<Option<Enrichment>, EnrichmentError> {
        match track_name {
            UNMATCHED_TRACK_NAME => Ok(None),
            BROKEN_LOOKUP_TRACK_NAME => Err(EnrichmentError::Api {
                status: 500,
                message: "upstream exploded".to_string(),
            }),
            _ => Ok(Some(Enrichment {
                external_id: fixture_external_id(track_name),
                cover_url: Some(format!("https://covers.test/{}.jpg", track_name.len())),
                preview_url: Some(format!("https://previews.test/{}.mp3", track_name.len())),
            })),
        }
    }

    async fn related(&self, external_id: &str) -> Result<Vec<RelatedTrack>, EnrichmentError> {
        Ok(vec![RelatedTrack {
            external_id: format!("{}-related", external_id),
            track_name: "Related Tune".to_string(),
            artist: "Related Artist".to_string(),
            cover_url: None,
            preview_url: None,
        }])
    }
}

/// Test server instance with an isolated dataset
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Dataset file read by the server on every request
    pub dataset_path: PathBuf,

    // Private fields - keep resources alive until drop
    _temp_dataset_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port, serving the fixture dataset
    pub async fn spawn() -> Self {
        Self::spawn_with_dataset(TEST_DATASET_CSV).await
    }

    /// Spawns a new test server serving the given CSV content
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - The dataset cannot be written
    /// - Port binding fails
    /// - Server doesn't become ready within timeout
    pub async fn spawn_with_dataset(csv: &str) -> Self {
        let (temp_dataset_dir, dataset_path) =
            write_dataset(csv).expect("Failed to write test dataset");

        let service = Arc::new(SimilarityService::new(
            Arc::new(CsvTrackLoader::new(&dataset_path)),
            Arc::new(FixtureGateway),
            Duration::from_millis(ENRICHMENT_TIMEOUT_MS),
        ));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            content_cache_age_sec: CONTENT_CACHE_AGE_SEC,
            frontend_dir_path: None,
            default_top_n: DEFAULT_TOP_N,
        };

        let app = make_app(config, service).expect("Failed to build app");

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
            dataset_path,
            _temp_dataset_dir: temp_dataset_dir,
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
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir will be cleaned up automatically
    }
}
