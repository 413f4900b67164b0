use crate::shared::frame::Frame;
use crate::video::domain::video_reader::FrameResult;

/// A frame chosen for classification, tagged with its 1-based position in
/// the decoded stream.
#[derive(Clone, Debug)]
pub struct SampledFrame {
    pub number: usize,
    pub frame: Frame,
}

/// Lazily keeps every `skip_interval`-th frame of a decode stream.
///
/// Every item pulled from the underlying iterator advances the count,
/// including frames that fail to decode or have no pixels. Those are
/// dropped when their tick comes up instead of being classified.
pub struct FrameSampler<I> {
    frames: I,
    skip_interval: usize,
    frames_read: usize,
}

impl<I> FrameSampler<I>
where
    I: Iterator<Item = FrameResult>,
{
    /// `skip_interval` must be positive.
    pub fn new(frames: I, skip_interval: usize) -> Self {
        debug_assert!(skip_interval > 0, "skip interval must be positive");
        Self {
            frames,
            skip_interval: skip_interval.max(1),
            frames_read: 0,
        }
    }

    /// Number of frames pulled from the stream so far.
    pub fn frames_read(&self) -> usize {
        self.frames_read
    }
}

impl<I> Iterator for FrameSampler<I>
where
    I: Iterator<Item = FrameResult>,
{
    type Item = SampledFrame;

    fn next(&mut self) -> Option<SampledFrame> {
        loop {
            let item = self.frames.next()?;
            self.frames_read += 1;
            let number = self.frames_read;

            let frame = match item {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Skipping undecodable frame {number}: {e}");
                    continue;
                }
            };
            if number % self.skip_interval != 0 {
                continue;
            }
            if frame.is_empty() {
                log::debug!("Dropping empty frame {number}");
                continue;
            }
            return Some(SampledFrame { number, frame });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn frame(index: usize) -> FrameResult {
        Ok(Frame::new(vec![0u8; 4 * 4 * 3], 4, 4, 3, index))
    }

    fn stream(count: usize) -> impl Iterator<Item = FrameResult> {
        (0..count).map(frame)
    }

    #[test]
    fn test_every_fifth_of_twelve() {
        let mut sampler = FrameSampler::new(stream(12), 5);
        let numbers: Vec<usize> = sampler.by_ref().map(|s| s.number).collect();
        assert_eq!(numbers, vec![5, 10]);
        assert_eq!(sampler.frames_read(), 12);
    }

    #[test]
    fn test_sampled_frame_is_the_kth_decoded() {
        let sampled: Vec<SampledFrame> = FrameSampler::new(stream(12), 5).collect();
        assert_eq!(sampled[0].frame.index(), 4);
        assert_eq!(sampled[1].frame.index(), 9);
    }

    #[rstest]
    #[case::every_frame(1, 4, vec![1, 2, 3, 4])]
    #[case::interval_longer_than_stream(20, 19, vec![])]
    #[case::exact_multiple(3, 9, vec![3, 6, 9])]
    #[case::empty_stream(5, 0, vec![])]
    fn test_sampling(#[case] k: usize, #[case] count: usize, #[case] expected: Vec<usize>) {
        let numbers: Vec<usize> = FrameSampler::new(stream(count), k)
            .map(|s| s.number)
            .collect();
        assert_eq!(numbers, expected);
    }

    #[test]
    fn test_empty_frame_on_tick_is_dropped_but_counted() {
        let frames = vec![
            frame(0),
            Ok(Frame::new(Vec::new(), 0, 0, 3, 1)),
            frame(2),
            frame(3),
        ];
        let mut sampler = FrameSampler::new(frames.into_iter(), 2);
        let numbers: Vec<usize> = sampler.by_ref().map(|s| s.number).collect();
        assert_eq!(numbers, vec![4]);
        assert_eq!(sampler.frames_read(), 4);
    }

    #[test]
    fn test_decode_error_advances_counter() {
        let frames: Vec<FrameResult> = vec![
            frame(0),
            Err("corrupt packet".into()),
            frame(2),
            frame(3),
        ];
        let numbers: Vec<usize> = FrameSampler::new(frames.into_iter(), 2)
            .map(|s| s.number)
            .collect();
        // Frame 2 failed, frame 4 still lands on its tick
        assert_eq!(numbers, vec![4]);
    }

    #[test]
    fn test_is_lazy() {
        let pulled = std::cell::Cell::new(0);
        let source = (0..100).map(|i| {
            pulled.set(pulled.get() + 1);
            frame(i)
        });
        let first = FrameSampler::new(source, 3).next().unwrap();
        assert_eq!(first.number, 3);
        assert_eq!(pulled.get(), 3);
    }
}
