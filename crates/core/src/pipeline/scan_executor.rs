use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::classification::domain::classifier_state::ClassifierState;
use crate::classification::domain::face_classifier::FaceClassifier;
use crate::classification::domain::frame_sampler::SampledFrame;
use crate::classification::domain::frame_sink::FrameSink;
use crate::classification::domain::match_record::MatchRecord;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::video::domain::video_reader::VideoReader;

/// Configuration for a scan execution run.
pub struct ScanRunConfig {
    pub skip_interval: usize,
    /// Positive frame rate used for timestamps.
    pub fps: f64,
    /// Reported to the progress callback; 0 when unknown.
    pub total_frames: usize,
    /// Called with `(frames_read, total_frames)` after each classified
    /// frame. Returning `false` aborts the run.
    pub on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    pub cancelled: Arc<AtomicBool>,
}

impl ScanRunConfig {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Counters and records gathered while executing a scan.
///
/// An aborted run still returns its stats, with `cancelled` set and the
/// records found up to that point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanStats {
    pub records: Vec<MatchRecord>,
    pub frames_read: usize,
    pub frames_classified: usize,
    pub cancelled: bool,
}

/// Collaborators the classification loop drives, borrowed for one run.
pub struct ScanContext<'a> {
    pub classifier: &'a mut FaceClassifier,
    pub sink: &'a mut dyn FrameSink,
    pub state: &'a mut ClassifierState,
    pub logger: &'a mut dyn PipelineLogger,
}

/// Abstracts how the read → sample → classify loop is executed.
///
/// Port (application-layer interface); infrastructure provides sequential
/// and threaded implementations. Implementations must classify sampled
/// frames strictly in stream order and close the reader before returning.
pub trait ScanExecutor: Send {
    fn execute(
        &self,
        reader: Box<dyn VideoReader>,
        ctx: ScanContext<'_>,
        config: &ScanRunConfig,
    ) -> Result<ScanStats, Box<dyn std::error::Error>>;
}

/// Classifies one sampled frame, shows it, and reports progress.
///
/// `frames_read` is the sampler's count at the time the frame was taken.
/// Returns `Ok(false)` once the run has been aborted, either through the
/// shared flag (the frame is then left unclassified) or by the progress
/// callback.
pub fn process_sampled_frame(
    sampled: SampledFrame,
    frames_read: usize,
    ctx: &mut ScanContext<'_>,
    config: &ScanRunConfig,
    stats: &mut ScanStats,
) -> Result<bool, Box<dyn std::error::Error>> {
    if config.is_cancelled() {
        stats.cancelled = true;
        return Ok(false);
    }

    let SampledFrame { number, mut frame } = sampled;
    let start = Instant::now();
    let result = ctx
        .classifier
        .classify_frame(&mut frame, number, config.fps, ctx.state)?;
    ctx.logger.timing("detect", result.detect_ms);
    ctx.logger.metric("faces", result.faces_detected as f64);
    if result.classification.is_match() {
        log::debug!(
            "Frame {number}: {} qualifying face(s)",
            result.classification.records().len()
        );
    }

    ctx.sink.show(&frame, number)?;
    ctx.logger
        .timing("classify", start.elapsed().as_secs_f64() * 1000.0);

    stats.records.extend(result.classification.into_records());
    stats.frames_classified += 1;
    stats.frames_read = frames_read;

    ctx.logger.progress(frames_read, config.total_frames);
    if let Some(ref callback) = config.on_progress {
        if !callback(frames_read, config.total_frames) {
            config.cancelled.store(true, Ordering::Relaxed);
            stats.cancelled = true;
            return Ok(false);
        }
    }
    Ok(true)
}
