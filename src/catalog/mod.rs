mod loader;
mod metric;
mod track;

pub use loader::{parse_tracks, CsvTrackLoader, TrackLoader};
pub use metric::{MetricField, UnknownMetricField};
pub use track::{ScoredTrack, TrackRecord};
