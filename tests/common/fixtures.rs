//! Test fixture creation
//!
//! Writes the fixture dataset into a temporary directory.

use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;

/// Fixture dataset in the export's column layout.
///
/// Counts use thousands separators and quoting the way the real export does,
/// and columns the service never reads are left out.
pub const TEST_DATASET_CSV: &str = "\u{feff}Track,Album Name,Artist,Release Date,ISRC,All Time Rank,Track Score,Spotify Streams,YouTube Views,YouTube Likes,TikTok Likes,Explicit Track
Reference Song,First Album,The Test Band,4/26/2024,QM24S2402528,1,725.4,\"1,000\",\"5,000\",100,10,0
Twice As Big,First Album,The Test Band,5/4/2024,USUG12400910,2,545.9,\"2,000\",\"6,000\",200,20,1
Silent Song,Quiet Album,Nobody,3/19/2024,QZJ842400387,3,538.4,,,,,0
Video Hit,Tube Album,Vlogger,1/12/2023,USSM12209777,4,444.9,10,\"90,000\",\"1,000\",0,0
Unmatched Song,Obscure Album,Unknown Artist,5/31/2024,USUG12403398,5,423.3,\"3,000\",\"1,500\",300,0,0
Broken Lookup,Glitch Album,The Errors,2/2/2024,USAT22409172,6,410.1,\"1,000\",n/a,0,0,0
";

/// Writes `csv` to a fresh temporary directory, returning the dir and file path.
pub fn write_dataset(csv: &str) -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let path = dir.path().join("songs.csv");
    std::fs::write(&path, csv)?;
    Ok((dir, path))
}
