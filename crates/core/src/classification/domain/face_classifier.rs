use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::classification::domain::classifier_state::{ClassifierState, SeenFaceSet};
use crate::classification::domain::frame_annotator;
use crate::classification::domain::match_record::{Classification, MatchRecord};
use crate::detection::domain::encoding_comparator::EncodingComparator;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_encoder::FaceEncoder;
use crate::shared::face_encoding::FaceEncoding;
use crate::shared::face_location::{FaceLocation, DETECTION_SCALE};
use crate::shared::frame::Frame;
use crate::shared::timestamp::Timestamp;
use crate::video::domain::image_writer::ImageWriter;

/// What happened to one sampled frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassificationResult {
    pub classification: Classification,
    /// Faces detected in the frame, qualifying or not.
    pub faces_detected: usize,
    pub detect_ms: f64,
}

/// Detects, encodes and classifies the faces of one frame at a time.
///
/// Detection runs on a half-resolution copy; every box is doubled back to
/// full resolution before it is cropped, reported or drawn.
pub struct FaceClassifier {
    detector: Box<dyn FaceDetector>,
    encoder: Box<dyn FaceEncoder>,
    comparator: Box<dyn EncodingComparator>,
    thumbnail_writer: Box<dyn ImageWriter>,
    tolerance: f64,
    output_dir: PathBuf,
}

impl FaceClassifier {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        encoder: Box<dyn FaceEncoder>,
        comparator: Box<dyn EncodingComparator>,
        thumbnail_writer: Box<dyn ImageWriter>,
        tolerance: f64,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            detector,
            encoder,
            comparator,
            thumbnail_writer,
            tolerance,
            output_dir,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Classifies the faces in `frame` and annotates them in place.
    ///
    /// `frame_number` is the 1-based position in the stream and `fps` must
    /// be positive. In dedup mode new faces are added to the seen set and
    /// their thumbnails written before this returns.
    pub fn classify_frame(
        &mut self,
        frame: &mut Frame,
        frame_number: usize,
        fps: f64,
        state: &mut ClassifierState,
    ) -> Result<ClassificationResult, Box<dyn std::error::Error>> {
        let small = frame.scaled(DETECTION_SCALE)?;

        let detect_start = Instant::now();
        let half_locations = self.detector.detect(&small)?;
        let encodings = if half_locations.is_empty() {
            Vec::new()
        } else {
            self.encoder.encode(&small, &half_locations)?
        };
        let detect_ms = detect_start.elapsed().as_secs_f64() * 1000.0;

        if encodings.len() != half_locations.len() {
            return Err(format!(
                "Encoder returned {} encodings for {} faces",
                encodings.len(),
                half_locations.len()
            )
            .into());
        }

        let mut records = Vec::new();
        let mut annotations = Vec::with_capacity(half_locations.len());
        for (face_index, (encoding, half_location)) in
            encodings.into_iter().zip(&half_locations).enumerate()
        {
            let location = half_location.to_full_resolution();
            let record = match state {
                ClassifierState::Dedup(seen) => self.classify_dedup(
                    seen,
                    encoding,
                    frame,
                    frame_number,
                    face_index,
                    fps,
                    location,
                )?,
                ClassifierState::Match(reference) => self.classify_match(
                    reference,
                    &encoding,
                    frame_number,
                    face_index,
                    fps,
                    location,
                ),
            };
            annotations.push((location, record.is_some()));
            records.extend(record);
        }

        frame_annotator::annotate(frame, &annotations);

        Ok(ClassificationResult {
            classification: Classification::from_records(records),
            faces_detected: half_locations.len(),
            detect_ms,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn classify_dedup(
        &self,
        seen: &mut SeenFaceSet,
        encoding: FaceEncoding,
        frame: &Frame,
        frame_number: usize,
        face_index: usize,
        fps: f64,
        location: FaceLocation,
    ) -> Result<Option<MatchRecord>, Box<dyn std::error::Error>> {
        if !seen.insert_if_new(&*self.comparator, encoding, self.tolerance) {
            return Ok(None);
        }

        // The frame is still clean here: annotation happens after all faces
        let thumbnail = match frame.crop(&location) {
            Some(crop) => {
                let path = self
                    .output_dir
                    .join(thumbnail_name(frame_number, face_index));
                self.thumbnail_writer.write(&path, &crop, None)?;
                log::info!("New face saved to {}", path.display());
                Some(path)
            }
            None => {
                log::warn!(
                    "Face {face_index} in frame {frame_number} lies outside the frame; no thumbnail saved"
                );
                None
            }
        };

        Ok(Some(MatchRecord {
            frame_number,
            face_index,
            timestamp: Timestamp::from_frame(frame_number, fps),
            location,
            thumbnail,
        }))
    }

    fn classify_match(
        &self,
        reference: &FaceEncoding,
        encoding: &FaceEncoding,
        frame_number: usize,
        face_index: usize,
        fps: f64,
        location: FaceLocation,
    ) -> Option<MatchRecord> {
        let matched = self
            .comparator
            .matches_any(std::slice::from_ref(reference), encoding, self.tolerance);
        if !matched {
            return None;
        }
        let timestamp = Timestamp::from_frame(frame_number, fps);
        log::info!("Match found at {timestamp}");
        Some(MatchRecord {
            frame_number,
            face_index,
            timestamp,
            location,
            thumbnail: None,
        })
    }
}

/// File name of the thumbnail for face `face_index` of `frame_number`.
pub fn thumbnail_name(frame_number: usize, face_index: usize) -> String {
    format!("detected_face_{frame_number}_face_{face_index}.jpg")
}
