use std::cmp::Ordering;

use crate::types::ClassScore;

/// Descending by confidence; NaN scores sort after every number.
fn by_confidence_desc(a: &ClassScore, b: &ClassScore) -> Ordering {
    match (a.confidence.is_nan(), b.confidence.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b
            .confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal),
    }
}

/// Top-3 classes by raw score. Equal scores keep ascending class order;
/// missing slots hold `ClassScore::SENTINEL`.
pub fn rank(scores: &[ClassScore]) -> [ClassScore; 3] {
    let mut sorted = scores.to_vec();
    // Both sorts are stable: class order first, then confidence.
    sorted.sort_by_key(|s| s.class_index);
    sorted.sort_by(by_confidence_desc);

    let mut top = [ClassScore::SENTINEL; 3];
    for (slot, score) in top.iter_mut().zip(sorted) {
        *slot = score;
    }
    top
}

/// Rank raw engine output where the class index is the position.
pub fn rank_raw(scores: &[f32]) -> [ClassScore; 3] {
    let scores: Vec<ClassScore> = scores
        .iter()
        .enumerate()
        .map(|(i, &c)| ClassScore::new(i as i32, c))
        .collect();
    rank(&scores)
}
