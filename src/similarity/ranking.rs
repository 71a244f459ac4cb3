use super::cosine_similarity;
use crate::catalog::{ScoredTrack, TrackRecord};

/// Scores every candidate against `reference` and returns the `top_n` best.
///
/// The reference itself (matched by id) is never part of the result. Ties keep
/// the order the candidates were given in, and `top_n` larger than the
/// candidate set simply returns everything.
pub fn rank(reference: &TrackRecord, candidates: &[TrackRecord], top_n: usize) -> Vec<ScoredTrack> {
    if top_n == 0 {
        return Vec::new();
    }

    let mut scored: Vec<ScoredTrack> = candidates
        .iter()
        .filter(|candidate| candidate.id != reference.id)
        .map(|candidate| ScoredTrack {
            similarity: cosine_similarity(reference, candidate),
            track: candidate.clone(),
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    scored.truncate(top_n);
    scored
}
