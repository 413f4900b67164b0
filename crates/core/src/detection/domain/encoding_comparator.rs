use crate::shared::face_encoding::{DistanceMetric, FaceEncoding};

/// Decides which known encodings a candidate matches.
pub trait EncodingComparator: Send {
    /// One flag per entry in `known`: true when the candidate lies within
    /// `tolerance` of it.
    fn compare(&self, known: &[FaceEncoding], candidate: &FaceEncoding, tolerance: f64)
        -> Vec<bool>;

    fn matches_any(&self, known: &[FaceEncoding], candidate: &FaceEncoding, tolerance: f64) -> bool {
        self.compare(known, candidate, tolerance)
            .into_iter()
            .any(|m| m)
    }
}

/// Threshold comparator: a match is `distance <= tolerance`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DistanceComparator {
    metric: DistanceMetric,
}

impl DistanceComparator {
    pub fn new(metric: DistanceMetric) -> Self {
        Self { metric }
    }
}

impl EncodingComparator for DistanceComparator {
    fn compare(
        &self,
        known: &[FaceEncoding],
        candidate: &FaceEncoding,
        tolerance: f64,
    ) -> Vec<bool> {
        known
            .iter()
            .map(|k| k.distance(candidate, self.metric) <= tolerance)
            .collect()
    }
}
