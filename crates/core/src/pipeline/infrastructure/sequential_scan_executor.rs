use crate::classification::domain::frame_sampler::FrameSampler;
use crate::pipeline::scan_executor::{
    process_sampled_frame, ScanContext, ScanExecutor, ScanRunConfig, ScanStats,
};
use crate::video::domain::video_reader::VideoReader;

/// Decodes, samples and classifies on the calling thread.
#[derive(Default)]
pub struct SequentialScanExecutor;

impl SequentialScanExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl ScanExecutor for SequentialScanExecutor {
    fn execute(
        &self,
        mut reader: Box<dyn VideoReader>,
        mut ctx: ScanContext<'_>,
        config: &ScanRunConfig,
    ) -> Result<ScanStats, Box<dyn std::error::Error>> {
        let mut stats = ScanStats::default();

        let result = {
            let mut sampler = FrameSampler::new(reader.frames(), config.skip_interval);
            let mut outcome = Ok(());
            while let Some(sampled) = sampler.next() {
                let frames_read = sampler.frames_read();
                match process_sampled_frame(sampled, frames_read, &mut ctx, config, &mut stats) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => {
                        outcome = Err(e);
                        break;
                    }
                }
            }
            stats.frames_read = sampler.frames_read();
            outcome
        };

        reader.close();
        result.map(|()| stats)
    }
}
