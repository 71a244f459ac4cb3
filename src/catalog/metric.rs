//! Selectable numeric fields of a [`TrackRecord`].
//!
//! The chart in the client plots any two numeric fields against each other,
//! the field is picked by its wire name at runtime and resolved here.

use super::TrackRecord;
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricField {
    AllTimeRank,
    TrackScore,
    SpotifyStreams,
    SpotifyPlaylistCount,
    SpotifyPlaylistReach,
    SpotifyPopularity,
    YouTubeViews,
    YouTubeLikes,
    TikTokPosts,
    TikTokLikes,
    TikTokViews,
    YouTubePlaylistReach,
    AppleMusicPlaylistCount,
    AirPlaySpins,
    SiriusXMSpins,
    DeezerPlaylistCount,
    DeezerPlaylistReach,
    AmazonPlaylistCount,
    PandoraStreams,
    PandoraTrackStations,
    SoundcloudStreams,
    ShazamCounts,
    TidalPopularity,
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown metric field: {0}")]
pub struct UnknownMetricField(pub String);

impl MetricField {
    pub const ALL: [MetricField; 23] = [
        MetricField::AllTimeRank,
        MetricField::TrackScore,
        MetricField::SpotifyStreams,
        MetricField::SpotifyPlaylistCount,
        MetricField::SpotifyPlaylistReach,
        MetricField::SpotifyPopularity,
        MetricField::YouTubeViews,
        MetricField::YouTubeLikes,
        MetricField::TikTokPosts,
        MetricField::TikTokLikes,
        MetricField::TikTokViews,
        MetricField::YouTubePlaylistReach,
        MetricField::AppleMusicPlaylistCount,
        MetricField::AirPlaySpins,
        MetricField::SiriusXMSpins,
        MetricField::DeezerPlaylistCount,
        MetricField::DeezerPlaylistReach,
        MetricField::AmazonPlaylistCount,
        MetricField::PandoraStreams,
        MetricField::PandoraTrackStations,
        MetricField::SoundcloudStreams,
        MetricField::ShazamCounts,
        MetricField::TidalPopularity,
    ];

    /// Wire name, identical to the JSON key of the field in a serialized track.
    pub fn name(&self) -> &'static str {
        match self {
            MetricField::AllTimeRank => "allTimeRank",
            MetricField::TrackScore => "trackScore",
            MetricField::SpotifyStreams => "spotifyStreams",
            MetricField::SpotifyPlaylistCount => "spotifyPlaylistCount",
            MetricField::SpotifyPlaylistReach => "spotifyPlaylistReach",
            MetricField::SpotifyPopularity => "spotifyPopularity",
            MetricField::YouTubeViews => "youTubeViews",
            MetricField::YouTubeLikes => "youTubeLikes",
            MetricField::TikTokPosts => "tikTokPosts",
            MetricField::TikTokLikes => "tikTokLikes",
            MetricField::TikTokViews => "tikTokViews",
            MetricField::YouTubePlaylistReach => "youTubePlaylistReach",
            MetricField::AppleMusicPlaylistCount => "appleMusicPlaylistCount",
            MetricField::AirPlaySpins => "airPlaySpins",
            MetricField::SiriusXMSpins => "siriusXMSpins",
            MetricField::DeezerPlaylistCount => "deezerPlaylistCount",
            MetricField::DeezerPlaylistReach => "deezerPlaylistReach",
            MetricField::AmazonPlaylistCount => "amazonPlaylistCount",
            MetricField::PandoraStreams => "pandoraStreams",
            MetricField::PandoraTrackStations => "pandoraTrackStations",
            MetricField::SoundcloudStreams => "soundcloudStreams",
            MetricField::ShazamCounts => "shazamCounts",
            MetricField::TidalPopularity => "tidalPopularity",
        }
    }

    pub fn value_of(&self, track: &TrackRecord) -> f64 {
        let count = match self {
            MetricField::TrackScore => return track.track_score,
            MetricField::AllTimeRank => track.all_time_rank,
            MetricField::SpotifyStreams => track.spotify_streams,
            MetricField::SpotifyPlaylistCount => track.spotify_playlist_count,
            MetricField::SpotifyPlaylistReach => track.spotify_playlist_reach,
            MetricField::SpotifyPopularity => track.spotify_popularity,
            MetricField::YouTubeViews => track.youtube_views,
            MetricField::YouTubeLikes => track.youtube_likes,
            MetricField::TikTokPosts => track.tiktok_posts,
            MetricField::TikTokLikes => track.tiktok_likes,
            MetricField::TikTokViews => track.tiktok_views,
            MetricField::YouTubePlaylistReach => track.youtube_playlist_reach,
            MetricField::AppleMusicPlaylistCount => track.apple_music_playlist_count,
            MetricField::AirPlaySpins => track.airplay_spins,
            MetricField::SiriusXMSpins => track.siriusxm_spins,
            MetricField::DeezerPlaylistCount => track.deezer_playlist_count,
            MetricField::DeezerPlaylistReach => track.deezer_playlist_reach,
            MetricField::AmazonPlaylistCount => track.amazon_playlist_count,
            MetricField::PandoraStreams => track.pandora_streams,
            MetricField::PandoraTrackStations => track.pandora_track_stations,
            MetricField::SoundcloudStreams => track.soundcloud_streams,
            MetricField::ShazamCounts => track.shazam_counts,
            MetricField::TidalPopularity => track.tidal_popularity,
        };
        count as f64
    }
}

impl FromStr for MetricField {
    type Err = UnknownMetricField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricField::ALL
            .iter()
            .find(|field| field.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| UnknownMetricField(s.to_string()))
    }
}

impl std::fmt::Display for MetricField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
