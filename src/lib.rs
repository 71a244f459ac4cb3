//! Track similarity catalog server library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod config;
pub mod enrichment;
pub mod server;
pub mod similarity;

// Re-export commonly used types for convenience
pub use catalog::{CsvTrackLoader, MetricField, ScoredTrack, TrackLoader, TrackRecord};
pub use enrichment::{EnrichmentGateway, NoOpEnrichmentGateway, SpotifyClient};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use similarity::{SimilarityError, SimilarityService};
