use super::TrackRecord;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source of the full track dataset.
///
/// Implementations are read fresh on every call, nothing is cached.
pub trait TrackLoader: Send + Sync {
    fn load_all(&self) -> Result<Vec<TrackRecord>>;
}

/// Loads tracks from the "Most Streamed Spotify Songs" CSV export.
pub struct CsvTrackLoader {
    path: PathBuf,
}

impl CsvTrackLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TrackLoader for CsvTrackLoader {
    fn load_all(&self) -> Result<Vec<TrackRecord>> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Failed to open dataset {:?}", self.path))?;
        let tracks = parse_tracks(file)
            .with_context(|| format!("Failed to parse dataset {:?}", self.path))?;
        debug!("Loaded {} tracks from {:?}", tracks.len(), self.path);
        Ok(tracks)
    }
}

/// Maps lowercased header names to column positions.
struct Columns(HashMap<String, usize>);

impl Columns {
    fn from_headers(headers: &csv::ByteRecord) -> Self {
        let map = headers
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let name = String::from_utf8_lossy(raw)
                    .trim_start_matches('\u{feff}')
                    .trim()
                    .to_lowercase();
                (name, index)
            })
            .collect();
        Columns(map)
    }

    fn text(&self, record: &csv::ByteRecord, header: &str) -> String {
        self.0
            .get(header)
            .and_then(|index| record.get(*index))
            .map(|raw| String::from_utf8_lossy(raw).into_owned())
            .unwrap_or_default()
    }

    fn count(&self, record: &csv::ByteRecord, header: &str) -> u64 {
        parse_count(&self.text(record, header))
    }
}

fn strip_number_noise(text: &str) -> String {
    text.trim().replace([',', '"'], "")
}

/// Parses a count such as `"1,234,567"`. Blank or malformed values are zero.
fn parse_count(text: &str) -> u64 {
    strip_number_noise(text).parse().unwrap_or(0)
}

fn parse_score(text: &str) -> f64 {
    strip_number_noise(text)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn parse_flag(text: &str) -> bool {
    matches!(text.trim().parse::<i64>(), Ok(1))
}

/// Parses CSV content into track records, assigning ids 1..=N in row order.
pub fn parse_tracks<R: Read>(reader: R) -> Result<Vec<TrackRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::from_headers(csv_reader.byte_headers()?);

    let mut tracks = Vec::new();
    for (index, record) in csv_reader.byte_records().enumerate() {
        let record = record?;
        tracks.push(TrackRecord {
            id: index + 1,
            track_name: columns.text(&record, "track"),
            album_name: columns.text(&record, "album name"),
            artist: columns.text(&record, "artist"),
            release_date: columns.text(&record, "release date"),
            isrc: columns.text(&record, "isrc"),
            all_time_rank: columns.count(&record, "all time rank"),
            track_score: parse_score(&columns.text(&record, "track score")),
            spotify_streams: columns.count(&record, "spotify streams"),
            spotify_playlist_count: columns.count(&record, "spotify playlist count"),
            spotify_playlist_reach: columns.count(&record, "spotify playlist reach"),
            spotify_popularity: columns.count(&record, "spotify popularity"),
            youtube_views: columns.count(&record, "youtube views"),
            youtube_likes: columns.count(&record, "youtube likes"),
            tiktok_posts: columns.count(&record, "tiktok posts"),
            tiktok_likes: columns.count(&record, "tiktok likes"),
            tiktok_views: columns.count(&record, "tiktok views"),
            youtube_playlist_reach: columns.count(&record, "youtube playlist reach"),
            apple_music_playlist_count: columns.count(&record, "apple music playlist count"),
            airplay_spins: columns.count(&record, "airplay spins"),
            siriusxm_spins: columns.count(&record, "siriusxm spins"),
            deezer_playlist_count: columns.count(&record, "deezer playlist count"),
            deezer_playlist_reach: columns.count(&record, "deezer playlist reach"),
            amazon_playlist_count: columns.count(&record, "amazon playlist count"),
            pandora_streams: columns.count(&record, "pandora streams"),
            pandora_track_stations: columns.count(&record, "pandora track stations"),
            soundcloud_streams: columns.count(&record, "soundcloud streams"),
            shazam_counts: columns.count(&record, "shazam counts"),
            tidal_popularity: columns.count(&record, "tidal popularity"),
            explicit_track: parse_flag(&columns.text(&record, "explicit track")),
            external_id: None,
            cover_url: None,
            preview_url: None,
        });
    }
    Ok(tracks)
}
