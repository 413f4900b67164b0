use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::classification::domain::classifier_state::ClassifierState;
use crate::classification::domain::face_classifier::FaceClassifier;
use crate::classification::domain::frame_sink::FrameSink;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::scan_executor::{ScanContext, ScanExecutor, ScanRunConfig};
use crate::pipeline::scan_report::ScanReport;
use crate::shared::scan_error::ScanError;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// Orchestrates one scan of an opened video.
///
/// Wires the reader, classifier and sink together and delegates the loop
/// to a `ScanExecutor`. Single-use: `execute` consumes the reader, so a
/// second call fails.
pub struct ScanVideoUseCase {
    reader: Option<Box<dyn VideoReader>>,
    classifier: FaceClassifier,
    sink: Box<dyn FrameSink>,
    executor: Box<dyn ScanExecutor>,
    logger: Box<dyn PipelineLogger>,
    skip_interval: usize,
    on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    cancelled: Arc<AtomicBool>,
}

impl ScanVideoUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reader: Box<dyn VideoReader>,
        classifier: FaceClassifier,
        sink: Box<dyn FrameSink>,
        executor: Box<dyn ScanExecutor>,
        logger: Box<dyn PipelineLogger>,
        skip_interval: usize,
        on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            reader: Some(reader),
            classifier,
            sink,
            executor,
            logger,
            skip_interval,
            on_progress,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    /// Runs the scan. `metadata` comes from opening the reader.
    ///
    /// An empty result is a successful report, and so is an aborted run:
    /// it carries the records found before the abort with `cancelled` set.
    /// Only setup failures and collaborator errors are errors.
    pub fn execute(
        &mut self,
        metadata: &VideoMetadata,
        mut state: ClassifierState,
    ) -> Result<ScanReport, Box<dyn std::error::Error>> {
        if !metadata.has_usable_fps() {
            return Err(ScanError::InvalidFrameRate(metadata.fps).into());
        }
        if self.skip_interval == 0 {
            return Err(ScanError::InvalidConfig("skip interval must be positive".into()).into());
        }
        let reader = self.reader.take().ok_or("Scan already executed")?;

        let mode = state.mode();
        self.logger.info(&format!(
            "Scanning {}x{} @ {:.2} fps, every {} frame(s), mode {mode}",
            metadata.width, metadata.height, metadata.fps, self.skip_interval
        ));

        let config = ScanRunConfig {
            skip_interval: self.skip_interval,
            fps: metadata.fps,
            total_frames: metadata.total_frames,
            on_progress: self.on_progress.take(),
            cancelled: self.cancelled.clone(),
        };
        let ctx = ScanContext {
            classifier: &mut self.classifier,
            sink: self.sink.as_mut(),
            state: &mut state,
            logger: self.logger.as_mut(),
        };
        let stats = self.executor.execute(reader, ctx, &config)?;
        if stats.cancelled {
            log::warn!(
                "Scan aborted after {} frame(s); keeping {} record(s)",
                stats.frames_read,
                stats.records.len()
            );
        }
        self.logger.summary();

        Ok(ScanReport {
            mode,
            records: stats.records,
            frames_read: stats.frames_read,
            frames_classified: stats.frames_classified,
            frame_rate: metadata.fps,
            output_dir: self.classifier.output_dir().to_path_buf(),
            cancelled: stats.cancelled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::domain::face_classifier::tests::{
        PositionEncoder, StubDetector, StubImageWriter,
    };
    use crate::classification::domain::frame_sink::NullFrameSink;
    use crate::detection::domain::encoding_comparator::DistanceComparator;
    use crate::pipeline::infrastructure::sequential_scan_executor::SequentialScanExecutor;
    use crate::pipeline::infrastructure::threaded_scan_executor::ThreadedScanExecutor;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::pipeline::scan_executor::tests::StubReader;
    use crate::pipeline::scan_report::ScanOutcome;
    use crate::shared::face_encoding::{DistanceMetric, FaceEncoding};
    use crate::shared::face_location::FaceLocation;
    use crate::shared::scan_config::ScanMode;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::{Mutex, atomic::Ordering};

    const FACE_A: FaceLocation = FaceLocation {
        top: 2,
        right: 8,
        bottom: 8,
        left: 2,
    };
    const FACE_B: FaceLocation = FaceLocation {
        top: 10,
        right: 18,
        bottom: 18,
        left: 10,
    };

    struct Built {
        use_case: ScanVideoUseCase,
        written: Arc<Mutex<Vec<(PathBuf, u32, u32)>>>,
        metadata: VideoMetadata,
    }

    fn build(
        frames: usize,
        faces: HashMap<usize, Vec<FaceLocation>>,
        skip_interval: usize,
        executor: Box<dyn ScanExecutor>,
    ) -> Built {
        let writer = StubImageWriter::new();
        let written = writer.written.clone();
        let classifier = FaceClassifier::new(
            Box::new(StubDetector::new(faces)),
            Box::new(PositionEncoder),
            Box::new(DistanceComparator::new(DistanceMetric::Euclidean)),
            Box::new(writer),
            0.6,
            PathBuf::from("/out/run"),
        );
        let mut reader = StubReader::new(frames);
        let metadata = reader.open(Path::new("clip.mp4")).unwrap();
        Built {
            use_case: ScanVideoUseCase::new(
                Box::new(reader),
                classifier,
                Box::new(NullFrameSink),
                executor,
                Box::new(NullPipelineLogger),
                skip_interval,
                None,
                None,
            ),
            written,
            metadata,
        }
    }

    fn executor(threaded: bool) -> Box<dyn ScanExecutor> {
        if threaded {
            Box::new(ThreadedScanExecutor::new())
        } else {
            Box::new(SequentialScanExecutor::new())
        }
    }

    #[rstest]
    #[case::sequential(false)]
    #[case::threaded(true)]
    fn test_dedup_saves_each_face_once(#[case] threaded: bool) {
        // Face A on frames 20, 40, 60; face B joins on 40
        let faces = HashMap::from([
            (19, vec![FACE_A]),
            (39, vec![FACE_A, FACE_B]),
            (59, vec![FACE_B, FACE_A]),
        ]);
        let mut built = build(70, faces, 20, executor(threaded));

        let report = built
            .use_case
            .execute(&built.metadata, ClassifierState::dedup())
            .unwrap();

        assert_eq!(report.mode, ScanMode::Dedup);
        assert!(!report.cancelled);
        assert_eq!(report.frames_read, 70);
        assert_eq!(report.frames_classified, 3);
        let saved: Vec<(usize, usize)> = report
            .records
            .iter()
            .map(|r| (r.frame_number, r.face_index))
            .collect();
        assert_eq!(saved, vec![(20, 0), (40, 1)]);
        assert_eq!(built.written.lock().unwrap().len(), 2);
        assert_eq!(report.output_dir, PathBuf::from("/out/run"));
    }

    #[rstest]
    #[case::sequential(false)]
    #[case::threaded(true)]
    fn test_match_timestamps_in_frame_order(#[case] threaded: bool) {
        let faces = HashMap::from([
            (4, vec![FACE_A]),
            (9, vec![FACE_B]),
            (149, vec![FACE_B, FACE_A]),
            (184, vec![FACE_A]),
        ]);
        let mut built = build(200, faces, 5, executor(threaded));
        let reference = FaceEncoding::new(vec![FACE_A.left as f32, FACE_A.top as f32]);

        let report = built
            .use_case
            .execute(&built.metadata, ClassifierState::matching(reference))
            .unwrap();

        let frames: Vec<usize> = report.records.iter().map(|r| r.frame_number).collect();
        assert_eq!(frames, vec![5, 150, 185]);
        assert!(frames.windows(2).all(|w| w[0] <= w[1]));
        assert_relative_eq!(report.records[1].timestamp.seconds, 5.0);
        assert_relative_eq!(
            report.records[2].timestamp.seconds,
            185.0 / 30.0,
            epsilon = 1e-9
        );
        assert_eq!(report.outcome(), ScanOutcome::Found(3));
        assert!(built.written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_no_faces_is_empty_outcome() {
        let mut built = build(50, HashMap::new(), 5, executor(false));
        let report = built
            .use_case
            .execute(
                &built.metadata,
                ClassifierState::matching(FaceEncoding::new(vec![0.0, 0.0])),
            )
            .unwrap();
        assert_eq!(report.outcome(), ScanOutcome::NoResults);
        assert_eq!(report.empty_message(), "Match not found");
        assert_eq!(report.frames_classified, 10);
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-25.0)]
    #[case::nan(f64::NAN)]
    fn test_unusable_fps_fails_before_reading(#[case] fps: f64) {
        let mut built = build(10, HashMap::new(), 5, executor(false));
        let metadata = VideoMetadata {
            fps,
            ..built.metadata.clone()
        };
        let err = built
            .use_case
            .execute(&metadata, ClassifierState::dedup())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::InvalidFrameRate(_))
        ));
    }

    #[test]
    fn test_second_execute_fails() {
        let mut built = build(10, HashMap::new(), 5, executor(false));
        built
            .use_case
            .execute(&built.metadata, ClassifierState::dedup())
            .unwrap();
        assert!(built
            .use_case
            .execute(&built.metadata, ClassifierState::dedup())
            .is_err());
    }

    #[rstest]
    #[case::sequential(false)]
    #[case::threaded(true)]
    fn test_shared_cancel_flag_stops_scan(#[case] threaded: bool) {
        let cancelled = Arc::new(AtomicBool::new(true));
        let mut built = build(10, HashMap::new(), 1, executor(threaded));
        built.use_case.cancelled = cancelled.clone();

        let report = built
            .use_case
            .execute(&built.metadata, ClassifierState::dedup())
            .unwrap();
        assert!(report.cancelled);
        assert_eq!(report.frames_classified, 0);
        assert!(cancelled.load(Ordering::Relaxed));
    }

    #[rstest]
    #[case::sequential(false)]
    #[case::threaded(true)]
    fn test_abort_keeps_matches_found_so_far(#[case] threaded: bool) {
        let faces: HashMap<usize, Vec<FaceLocation>> =
            (0..1000).map(|i| (i, vec![FACE_A])).collect();
        let mut built = build(1000, faces, 1, executor(threaded));
        let flag = built.use_case.cancelled.clone();
        built.use_case.on_progress = Some(Box::new(move |read, _| {
            if read >= 3 {
                flag.store(true, Ordering::Relaxed);
            }
            true
        }));
        let reference = FaceEncoding::new(vec![FACE_A.left as f32, FACE_A.top as f32]);

        let report = built
            .use_case
            .execute(&built.metadata, ClassifierState::matching(reference))
            .unwrap();

        assert!(report.cancelled);
        let frames: Vec<usize> = report.records.iter().map(|r| r.frame_number).collect();
        assert_eq!(frames, vec![1, 2, 3]);
        assert_eq!(report.outcome(), ScanOutcome::Found(3));
    }
}
