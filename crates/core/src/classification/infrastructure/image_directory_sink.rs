use std::path::PathBuf;

use crate::classification::domain::frame_sink::FrameSink;
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Dumps annotated frames as `frame_{n}.jpg` into a directory.
pub struct ImageDirectorySink {
    dir: PathBuf,
    writer: Box<dyn ImageWriter>,
}

impl ImageDirectorySink {
    pub fn new(dir: PathBuf, writer: Box<dyn ImageWriter>) -> Self {
        Self { dir, writer }
    }
}

impl FrameSink for ImageDirectorySink {
    fn show(&mut self, frame: &Frame, frame_number: usize) -> Result<(), Box<dyn std::error::Error>> {
        let path = self.dir.join(format!("frame_{frame_number}.jpg"));
        self.writer.write(&path, frame, None)
    }
}
