//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Server Endpoints
    // ========================================================================

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.get("/").await
    }

    // ========================================================================
    // Track Endpoints
    // ========================================================================

    /// GET /v1/tracks with optional pagination parameters
    pub async fn get_tracks(&self, page_number: Option<i64>, page_size: Option<i64>) -> Response {
        let mut params = Vec::new();
        if let Some(page_number) = page_number {
            params.push(format!("page_number={}", page_number));
        }
        if let Some(page_size) = page_size {
            params.push(format!("page_size={}", page_size));
        }
        if params.is_empty() {
            self.get("/v1/tracks").await
        } else {
            self.get(&format!("/v1/tracks?{}", params.join("&"))).await
        }
    }

    /// GET /v1/tracks/{id}
    pub async fn get_track(&self, id: usize) -> Response {
        self.get(&format!("/v1/tracks/{}", id)).await
    }

    // ========================================================================
    // Similarity Endpoints
    // ========================================================================

    /// GET /v1/tracks/{id}/similar
    pub async fn get_similar(&self, id: usize, top_n: Option<i64>) -> Response {
        match top_n {
            Some(top_n) => {
                self.get(&format!("/v1/tracks/{}/similar?top_n={}", id, top_n))
                    .await
            }
            None => self.get(&format!("/v1/tracks/{}/similar", id)).await,
        }
    }

    /// GET /v1/tracks/{id}/similar/plot
    pub async fn get_similar_plot(&self, id: usize, x: &str, y: &str, top_n: i64) -> Response {
        self.get(&format!(
            "/v1/tracks/{}/similar/plot?x={}&y={}&top_n={}",
            id, x, y, top_n
        ))
        .await
    }

    /// GET /v1/metrics/fields
    pub async fn get_metric_fields(&self) -> Response {
        self.get("/v1/metrics/fields").await
    }
}
