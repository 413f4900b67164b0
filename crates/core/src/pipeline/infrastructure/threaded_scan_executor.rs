use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::classification::domain::frame_sampler::{FrameSampler, SampledFrame};
use crate::pipeline::scan_executor::{
    process_sampled_frame, ScanContext, ScanExecutor, ScanRunConfig, ScanStats,
};
use crate::video::domain::video_reader::VideoReader;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// Sampled frame plus the sampler's read count when it was taken.
type Sampled = (SampledFrame, usize);

/// Decodes and samples on a reader thread while the calling thread
/// classifies.
///
/// Layout: `reader [decode/sample] → main [classify/show]`
///
/// Frames cross a bounded channel, so decoding never runs more than
/// `channel_capacity` sampled frames ahead. Classification order and
/// results are the same as the sequential executor.
pub struct ThreadedScanExecutor {
    channel_capacity: usize,
}

impl ThreadedScanExecutor {
    pub fn new() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self {
            channel_capacity: channel_capacity.max(1),
        }
    }
}

impl Default for ThreadedScanExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanExecutor for ThreadedScanExecutor {
    fn execute(
        &self,
        reader: Box<dyn VideoReader>,
        mut ctx: ScanContext<'_>,
        config: &ScanRunConfig,
    ) -> Result<ScanStats, Box<dyn std::error::Error>> {
        let (frame_tx, frame_rx) = crossbeam_channel::bounded::<Sampled>(self.channel_capacity);
        let reader_handle = spawn_reader(
            reader,
            frame_tx,
            config.skip_interval,
            config.cancelled.clone(),
        );

        let mut stats = ScanStats::default();
        let mut main_result = Ok(());
        for (sampled, frames_read) in frame_rx.iter() {
            ctx.logger.metric("reader_queue_depth", frame_rx.len() as f64);
            match process_sampled_frame(sampled, frames_read, &mut ctx, config, &mut stats) {
                Ok(true) => continue,
                Ok(false) => {}
                Err(e) => main_result = Err(e),
            }
            // Unblock the reader if it is waiting on a full channel
            config.cancelled.store(true, Ordering::Relaxed);
            break;
        }
        drop(frame_rx);

        match reader_handle.join() {
            Ok(reader_stats) => {
                // Frames the reader sampled but the main loop never took are
                // not counted as read
                if !stats.cancelled {
                    stats.frames_read = reader_stats.frames_read;
                }
                stats.cancelled |= reader_stats.cancelled;
            }
            Err(_) => {
                main_result = main_result.and(Err("Reader thread panicked".into()));
            }
        }
        main_result.map(|()| stats)
    }
}

/// What the reader thread saw before it stopped.
struct ReaderStats {
    frames_read: usize,
    /// The shared flag stopped it before the end of the stream.
    cancelled: bool,
}

/// Runs the sampler on its own thread.
fn spawn_reader(
    mut reader: Box<dyn VideoReader>,
    frame_tx: crossbeam_channel::Sender<Sampled>,
    skip_interval: usize,
    cancelled: Arc<AtomicBool>,
) -> std::thread::JoinHandle<ReaderStats> {
    std::thread::spawn(move || {
        let mut stopped = false;
        let frames_read = {
            let mut sampler = FrameSampler::new(reader.frames(), skip_interval);
            while let Some(sampled) = sampler.next() {
                if cancelled.load(Ordering::Relaxed) {
                    stopped = true;
                    break;
                }
                if frame_tx.send((sampled, sampler.frames_read())).is_err() {
                    break;
                }
            }
            sampler.frames_read()
        };
        reader.close();
        ReaderStats {
            frames_read,
            cancelled: stopped,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::infrastructure::sequential_scan_executor::SequentialScanExecutor;
    use crate::pipeline::scan_executor::tests::{harness, Harness, StubReader};

    #[test]
    fn test_matches_sequential_results() {
        let faces = [2, 5, 9, 14, 19];

        let config = Harness::config(3);

        let mut seq = harness(&faces);
        let expected = SequentialScanExecutor::new()
            .execute(Box::new(StubReader::new(23)), seq.ctx(), &config)
            .unwrap();

        let mut thr = harness(&faces);
        let actual = ThreadedScanExecutor::with_capacity(2)
            .execute(Box::new(StubReader::new(23)), thr.ctx(), &config)
            .unwrap();

        assert_eq!(actual, expected);
        assert_eq!(*thr.shown.lock().unwrap(), *seq.shown.lock().unwrap());
    }

    #[test]
    fn test_reader_closed_and_counted() {
        let mut h = harness(&[]);
        let reader = StubReader::new(12);
        let closed = reader.closed.clone();

        let config = Harness::config(5);

        let stats = ThreadedScanExecutor::new()
            .execute(Box::new(reader), h.ctx(), &config)
            .unwrap();

        assert!(!stats.cancelled);
        assert_eq!(stats.frames_read, 12);
        assert_eq!(stats.frames_classified, 2);
        assert!(*closed.lock().unwrap());
    }

    #[test]
    fn test_abort_mid_run_keeps_records_and_joins_reader() {
        for _ in 0..20 {
            let mut h = harness(&(0..1000).collect::<Vec<_>>());
            let reader = StubReader::new(1000);
            let closed = reader.closed.clone();
            let mut config = Harness::config(1);
            config.on_progress = Some(Box::new(|read, _| read < 3));

            let stats = ThreadedScanExecutor::with_capacity(1)
                .execute(Box::new(reader), h.ctx(), &config)
                .unwrap();

            assert!(stats.cancelled);
            let numbers: Vec<usize> = stats.records.iter().map(|r| r.frame_number).collect();
            assert_eq!(numbers, vec![1, 2, 3]);
            assert_eq!(stats.frames_read, 3);
            assert_eq!(*h.shown.lock().unwrap(), vec![1, 2, 3]);
            assert!(*closed.lock().unwrap());
        }
    }

    #[test]
    fn test_preset_cancel_flag_reports_cancelled() {
        let mut h = harness(&[]);
        let config = Harness::config(1);
        config.cancelled.store(true, Ordering::Relaxed);

        let stats = ThreadedScanExecutor::new()
            .execute(Box::new(StubReader::new(50)), h.ctx(), &config)
            .unwrap();

        assert!(stats.cancelled);
        assert_eq!(stats.frames_classified, 0);
        assert!(stats.records.is_empty());
    }
}
