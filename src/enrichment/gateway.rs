use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata found for a track on the streaming service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub external_id: String,
    pub cover_url: Option<String>,
    pub preview_url: Option<String>,
}

/// A track suggested by the streaming service as related to another one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedTrack {
    pub external_id: String,
    pub track_name: String,
    pub artist: String,
    pub cover_url: Option<String>,
    pub preview_url: Option<String>,
}

/// Errors that can occur when talking to the enrichment service.
///
/// None of these is fatal for a query, callers degrade to un-enriched tracks.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for EnrichmentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EnrichmentError::Timeout
        } else if err.is_decode() {
            EnrichmentError::InvalidResponse(err.to_string())
        } else {
            EnrichmentError::Connection(err.to_string())
        }
    }
}

/// Looks up external metadata for tracks of the dataset.
///
/// Implementations are shared between concurrent requests and must hold any
/// credential state internally.
#[async_trait]
pub trait EnrichmentGateway: Send + Sync {
    /// Short name used in logs (e.g. "spotify").
    fn name(&self) -> &str;

    /// Finds the best match for a track by name and artist.
    ///
    /// Returns `Ok(None)` when the service has no match.
    async fn lookup(
        &self,
        track_name: &str,
        artist: &str,
    ) -> Result<Option<Enrichment>, EnrichmentError>;

    /// Fetches tracks related to the one identified by `external_id`.
    async fn related(&self, external_id: &str) -> Result<Vec<RelatedTrack>, EnrichmentError>;
}

/// Gateway used when no streaming service is configured.
pub struct NoOpEnrichmentGateway;

#[async_trait]
impl EnrichmentGateway for NoOpEnrichmentGateway {
    fn name(&self) -> &str {
        "noop"
    }

    async fn lookup(
        &self,
        _track_name: &str,
        _artist: &str,
    ) -> Result<Option<Enrichment>, EnrichmentError> {
        Ok(None)
    }

    async fn related(&self, _external_id: &str) -> Result<Vec<RelatedTrack>, EnrichmentError> {
        Ok(vec![])
    }
}
