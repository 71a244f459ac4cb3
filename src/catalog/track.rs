use serde::{Deserialize, Serialize};

use crate::enrichment::Enrichment;

/// A row of the streaming dataset.
///
/// The `id` is assigned by the loader from the row position (1-based), it is
/// unique within a single load but not stable across reloads of a changed file.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    pub id: usize,
    pub track_name: String,
    pub album_name: String,
    pub artist: String,
    pub release_date: String,
    pub isrc: String,
    pub all_time_rank: u64,
    pub track_score: f64,
    pub spotify_streams: u64,
    pub spotify_playlist_count: u64,
    pub spotify_playlist_reach: u64,
    pub spotify_popularity: u64,
    #[serde(rename = "youTubeViews")]
    pub youtube_views: u64,
    #[serde(rename = "youTubeLikes")]
    pub youtube_likes: u64,
    #[serde(rename = "tikTokPosts")]
    pub tiktok_posts: u64,
    #[serde(rename = "tikTokLikes")]
    pub tiktok_likes: u64,
    #[serde(rename = "tikTokViews")]
    pub tiktok_views: u64,
    #[serde(rename = "youTubePlaylistReach")]
    pub youtube_playlist_reach: u64,
    pub apple_music_playlist_count: u64,
    #[serde(rename = "airPlaySpins")]
    pub airplay_spins: u64,
    #[serde(rename = "siriusXMSpins")]
    pub siriusxm_spins: u64,
    pub deezer_playlist_count: u64,
    pub deezer_playlist_reach: u64,
    pub amazon_playlist_count: u64,
    pub pandora_streams: u64,
    pub pandora_track_stations: u64,
    pub soundcloud_streams: u64,
    pub shazam_counts: u64,
    pub tidal_popularity: u64,
    pub explicit_track: bool,

    // Populated by enrichment only, never read from the dataset.
    pub external_id: Option<String>,
    pub cover_url: Option<String>,
    pub preview_url: Option<String>,
}

impl TrackRecord {
    /// Returns a copy of this record carrying the given enrichment data.
    pub fn with_enrichment(&self, enrichment: &Enrichment) -> TrackRecord {
        TrackRecord {
            external_id: Some(enrichment.external_id.clone()),
            cover_url: enrichment.cover_url.clone(),
            preview_url: enrichment.preview_url.clone(),
            ..self.clone()
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.external_id.is_some()
    }
}

/// A track together with its similarity to some reference track.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct ScoredTrack {
    pub track: TrackRecord,
    pub similarity: f64,
}
