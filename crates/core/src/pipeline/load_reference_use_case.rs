use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_encoder::FaceEncoder;
use crate::shared::face_encoding::FaceEncoding;
use crate::shared::scan_error::ScanError;
use crate::video::domain::video_reader::VideoReader;

/// Extracts the reference encoding for a match scan.
///
/// The reference image is analysed at full resolution; only the first
/// detected face is used.
pub struct LoadReferenceUseCase {
    reader: Box<dyn VideoReader>,
}

impl LoadReferenceUseCase {
    pub fn new(reader: Box<dyn VideoReader>) -> Self {
        Self { reader }
    }

    pub fn execute(
        &mut self,
        path: &Path,
        detector: &mut dyn FaceDetector,
        encoder: &mut dyn FaceEncoder,
    ) -> Result<FaceEncoding, Box<dyn std::error::Error>> {
        let reference_err = |reason: String| ScanError::ReferenceImage {
            path: path.to_path_buf(),
            reason,
        };

        self.reader
            .open(path)
            .map_err(|e| reference_err(e.to_string()))?;
        let frame = self.reader.frames().next();
        self.reader.close();
        let frame = match frame {
            Some(Ok(frame)) if !frame.is_empty() => frame,
            Some(Ok(_)) => return Err(reference_err("image is empty".into()).into()),
            Some(Err(e)) => return Err(reference_err(e.to_string()).into()),
            None => return Err(reference_err("no image data".into()).into()),
        };

        let locations = detector.detect(&frame)?;
        log::debug!(
            "Reference image {} has {} face(s)",
            path.display(),
            locations.len()
        );
        let Some(first) = locations.first() else {
            return Err(ScanError::NoReferenceFace(path.to_path_buf()).into());
        };

        encoder
            .encode(&frame, std::slice::from_ref(first))?
            .into_iter()
            .next()
            .ok_or_else(|| ScanError::NoReferenceFace(path.to_path_buf()).into())
    }
}
