use crate::shared::face_encoding::FaceEncoding;
use crate::shared::face_location::FaceLocation;
use crate::shared::frame::Frame;

/// Domain interface for turning detected faces into comparable encodings.
///
/// Returns exactly one encoding per location, in the same order.
pub trait FaceEncoder: Send {
    fn encode(
        &mut self,
        frame: &Frame,
        locations: &[FaceLocation],
    ) -> Result<Vec<FaceEncoding>, Box<dyn std::error::Error>>;
}
