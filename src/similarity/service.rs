//! Query pipeline: load the dataset, locate the reference, rank, enrich.
//!
//! Every call reloads the dataset through the injected loader, nothing
//! survives between calls.

use super::rank;
use crate::catalog::{MetricField, ScoredTrack, TrackLoader, TrackRecord};
use crate::enrichment::{EnrichmentError, EnrichmentGateway, RelatedTrack};
use crate::server::metrics::{record_enrichment, set_dataset_size};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("Track not found: {0}")]
    NotFound(usize),

    #[error("Dataset unavailable: {0:#}")]
    DataUnavailable(anyhow::Error),
}

/// A track with the related tracks suggested by the enrichment service.
#[derive(Clone, Debug, Serialize)]
pub struct TrackDetail {
    pub track: TrackRecord,
    pub recommendations: Vec<RelatedTrack>,
}

/// A ranked track projected onto two metric fields for charting.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlotPoint {
    pub id: usize,
    pub track_name: String,
    pub artist: String,
    pub similarity: f64,
    pub x: f64,
    pub y: f64,
}

/// Clamps a caller supplied result count, negative values mean "nothing".
pub fn clamp_top_n(top_n: i64) -> usize {
    if top_n <= 0 {
        0
    } else {
        usize::try_from(top_n).unwrap_or(usize::MAX)
    }
}

pub struct SimilarityService {
    loader: Arc<dyn TrackLoader>,
    gateway: Arc<dyn EnrichmentGateway>,
    enrichment_timeout: Duration,
}

impl SimilarityService {
    pub fn new(
        loader: Arc<dyn TrackLoader>,
        gateway: Arc<dyn EnrichmentGateway>,
        enrichment_timeout: Duration,
    ) -> Self {
        Self {
            loader,
            gateway,
            enrichment_timeout,
        }
    }

    async fn load_tracks(&self) -> Result<Vec<TrackRecord>, SimilarityError> {
        let loader = self.loader.clone();
        let tracks = tokio::task::spawn_blocking(move || loader.load_all())
            .await
            .map_err(|err| SimilarityError::DataUnavailable(anyhow::Error::new(err)))?
            .map_err(SimilarityError::DataUnavailable)?;
        set_dataset_size(tracks.len());
        Ok(tracks)
    }

    fn locate(tracks: &[TrackRecord], id: usize) -> Result<&TrackRecord, SimilarityError> {
        tracks
            .iter()
            .find(|t| t.id == id)
            .ok_or(SimilarityError::NotFound(id))
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, EnrichmentError>
    where
        F: std::future::Future<Output = Result<T, EnrichmentError>>,
    {
        match tokio::time::timeout(self.enrichment_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(EnrichmentError::Timeout),
        }
    }

    /// Enriches a single track, leaving it untouched if the lookup fails.
    async fn enrich(&self, track: TrackRecord) -> TrackRecord {
        let gateway = self.gateway.name();
        let outcome = self
            .bounded(self.gateway.lookup(&track.track_name, &track.artist))
            .await;
        match outcome {
            Ok(Some(enrichment)) => {
                record_enrichment(gateway, "found");
                track.with_enrichment(&enrichment)
            }
            Ok(None) => {
                record_enrichment(gateway, "missing");
                debug!(
                    "No {} match for track {} ({} - {})",
                    gateway, track.id, track.artist, track.track_name
                );
                track
            }
            Err(err) => {
                record_enrichment(gateway, "failed");
                warn!(
                    "Enrichment of track {} ({} - {}) failed: {}",
                    track.id, track.artist, track.track_name, err
                );
                track
            }
        }
    }

    /// Enriches all tracks concurrently, preserving their order.
    async fn enrich_all(&self, tracks: Vec<TrackRecord>) -> Vec<TrackRecord> {
        join_all(tracks.into_iter().map(|track| self.enrich(track))).await
    }

    /// Returns the `top_n` tracks most similar to `reference_id`, enriched.
    pub async fn get_similar(
        &self,
        reference_id: usize,
        top_n: i64,
    ) -> Result<Vec<ScoredTrack>, SimilarityError> {
        let tracks = self.load_tracks().await?;
        let reference = Self::locate(&tracks, reference_id)?;
        let ranked = rank(reference, &tracks, clamp_top_n(top_n));
        debug!(
            "Ranked {} tracks against reference {}",
            ranked.len(),
            reference_id
        );

        let (tracks, scores): (Vec<TrackRecord>, Vec<f64>) = ranked
            .into_iter()
            .map(|scored| (scored.track, scored.similarity))
            .unzip();
        let enriched = self.enrich_all(tracks).await;

        Ok(enriched
            .into_iter()
            .zip(scores)
            .map(|(track, similarity)| ScoredTrack { track, similarity })
            .collect())
    }

    /// Returns one page of the dataset in file order, enriched.
    ///
    /// Pages are 1-based; a page past the end is empty.
    pub async fn get_tracks(
        &self,
        page_number: usize,
        page_size: usize,
    ) -> Result<Vec<TrackRecord>, SimilarityError> {
        let tracks = self.load_tracks().await?;
        let page: Vec<TrackRecord> = tracks
            .into_iter()
            .skip(page_number.saturating_sub(1).saturating_mul(page_size))
            .take(page_size)
            .collect();
        Ok(self.enrich_all(page).await)
    }

    /// Returns a single enriched track and the service's related tracks for it.
    pub async fn get_track(&self, id: usize) -> Result<TrackDetail, SimilarityError> {
        let tracks = self.load_tracks().await?;
        let track = Self::locate(&tracks, id)?.clone();
        let track = self.enrich(track).await;

        let recommendations = match &track.external_id {
            Some(external_id) => match self.bounded(self.gateway.related(external_id)).await {
                Ok(related) => related,
                Err(err) => {
                    warn!("Fetching related tracks for {} failed: {}", id, err);
                    vec![]
                }
            },
            None => vec![],
        };

        Ok(TrackDetail {
            track,
            recommendations,
        })
    }

    /// Ranks like [`Self::get_similar`] and projects the result onto two fields.
    ///
    /// No enrichment happens here, only dataset values are plotted.
    pub async fn get_similar_plot(
        &self,
        reference_id: usize,
        top_n: i64,
        x: MetricField,
        y: MetricField,
    ) -> Result<Vec<PlotPoint>, SimilarityError> {
        let tracks = self.load_tracks().await?;
        let reference = Self::locate(&tracks, reference_id)?;

        Ok(rank(reference, &tracks, clamp_top_n(top_n))
            .into_iter()
            .map(|scored| PlotPoint {
                id: scored.track.id,
                x: x.value_of(&scored.track),
                y: y.value_of(&scored.track),
                similarity: scored.similarity,
                track_name: scored.track.track_name,
                artist: scored.track.artist,
            })
            .collect())
    }
}
