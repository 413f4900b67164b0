use crate::shared::face_location::FaceLocation;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// Locations are in the pixel space of the frame passed in. Implementations
/// may keep scratch buffers between calls, hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceLocation>, Box<dyn std::error::Error>>;
}
