//! Engagement-based track similarity.
//!
//! [`cosine_similarity`] compares two tracks, [`rank`] orders a candidate set
//! against a reference and [`SimilarityService`] wires both to the dataset
//! loader and the enrichment gateway.

mod ranking;
mod scorer;
mod service;

pub use ranking::rank;
pub use scorer::cosine_similarity;
pub use service::{clamp_top_n, PlotPoint, SimilarityError, SimilarityService, TrackDetail};
