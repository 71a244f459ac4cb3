use crate::catalog::TrackRecord;

fn engagement_vector(track: &TrackRecord) -> [f64; 3] {
    [
        track.spotify_streams as f64,
        track.youtube_likes as f64,
        track.tiktok_likes as f64,
    ]
}

fn magnitude(v: &[f64; 3]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Cosine similarity of the (streams, YouTube likes, TikTok likes) vectors.
///
/// The raw counts are used as-is, so stream counts dominate the result.
/// A zero vector on either side scores exactly `0.0`.
pub fn cosine_similarity(reference: &TrackRecord, candidate: &TrackRecord) -> f64 {
    let a = engagement_vector(reference);
    let b = engagement_vector(candidate);

    let magnitude_a = magnitude(&a);
    let magnitude_b = magnitude(&b);
    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot / (magnitude_a * magnitude_b)
}
