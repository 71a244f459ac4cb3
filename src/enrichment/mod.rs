//! External metadata enrichment for dataset tracks.
//!
//! The rest of the crate only sees the [`EnrichmentGateway`] trait; the
//! Spotify client is the production implementation.

mod gateway;
pub mod spotify;

pub use gateway::{
    Enrichment, EnrichmentError, EnrichmentGateway, NoOpEnrichmentGateway, RelatedTrack,
};
pub use spotify::{SpotifyClient, SpotifyCredentials};
