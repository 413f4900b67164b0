use crate::shared::frame::Frame;

/// Receives every classified, annotated frame.
pub trait FrameSink: Send {
    fn show(&mut self, frame: &Frame, frame_number: usize) -> Result<(), Box<dyn std::error::Error>>;
}

/// Discards frames.
pub struct NullFrameSink;

impl FrameSink for NullFrameSink {
    fn show(&mut self, _frame: &Frame, _frame_number: usize) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}
