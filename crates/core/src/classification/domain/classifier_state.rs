use crate::detection::domain::encoding_comparator::EncodingComparator;
use crate::shared::face_encoding::FaceEncoding;
use crate::shared::scan_config::ScanMode;

/// Encodings of every distinct face seen so far in a dedup run.
///
/// Append-only: members are never removed or replaced, and a new member is
/// only added when it matched none of the existing ones.
#[derive(Clone, Debug, Default)]
pub struct SeenFaceSet {
    encodings: Vec<FaceEncoding>,
}

impl SeenFaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `candidate` is within `tolerance` of any member.
    pub fn contains_match(
        &self,
        comparator: &dyn EncodingComparator,
        candidate: &FaceEncoding,
        tolerance: f64,
    ) -> bool {
        comparator.matches_any(&self.encodings, candidate, tolerance)
    }

    /// Adds `candidate` unless it matches an existing member. Returns
    /// whether it was added.
    pub fn insert_if_new(
        &mut self,
        comparator: &dyn EncodingComparator,
        candidate: FaceEncoding,
        tolerance: f64,
    ) -> bool {
        if self.contains_match(comparator, &candidate, tolerance) {
            return false;
        }
        self.encodings.push(candidate);
        true
    }

    pub fn len(&self) -> usize {
        self.encodings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encodings.is_empty()
    }
}

/// Mutable state threaded through every classification call of a run.
#[derive(Clone, Debug)]
pub enum ClassifierState {
    Dedup(SeenFaceSet),
    Match(FaceEncoding),
}

impl ClassifierState {
    pub fn dedup() -> Self {
        Self::Dedup(SeenFaceSet::new())
    }

    pub fn matching(reference: FaceEncoding) -> Self {
        Self::Match(reference)
    }

    pub fn mode(&self) -> ScanMode {
        match self {
            Self::Dedup(_) => ScanMode::Dedup,
            Self::Match(_) => ScanMode::Match,
        }
    }
}
