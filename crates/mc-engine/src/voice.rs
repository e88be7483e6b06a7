//! Click voice: streaming state of one triggered click.

use mc_ir::DecodedSample;

/// Which of the player's two sounds a voice plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClickSlot {
    /// The regular click.
    Primary,
    /// The accent click, played on downbeats when loaded.
    Accent,
}

/// A click being streamed out over successive callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClickVoice {
    slot: ClickSlot,
    /// Frames already emitted.
    cursor: usize,
}

impl ClickVoice {
    pub fn new(slot: ClickSlot) -> Self {
        Self { slot, cursor: 0 }
    }

    pub fn slot(&self) -> ClickSlot {
        self.slot
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self, sample: &DecodedSample) -> usize {
        sample.frames().saturating_sub(self.cursor)
    }

    pub fn is_finished(&self, sample: &DecodedSample) -> bool {
        self.remaining(sample) == 0
    }

    /// Copy the next frames of `sample` into both channels and advance.
    ///
    /// Copies `min(remaining, block)` frames and leaves the rest of the
    /// buffers untouched. Returns the number of frames copied.
    pub fn render(&mut self, sample: &DecodedSample, left: &mut [f32], right: &mut [f32]) -> usize {
        let block = left.len().min(right.len());
        let src = sample.window(self.cursor, block);
        let n = src.len();

        left[..n].copy_from_slice(src);
        right[..n].copy_from_slice(src);
        self.cursor += n;
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(frames: usize) -> DecodedSample {
        let data = (0..frames).map(|i| i as f32 / frames as f32).collect();
        DecodedSample::new("ramp", 44100, 16, data)
    }

    #[test]
    fn drains_in_ceil_blocks_with_exact_remainder() {
        for &(frames, block) in &[(1000usize, 256usize), (1024, 256), (4410, 512), (10, 512)] {
            let sample = ramp(frames);
            let mut voice = ClickVoice::new(ClickSlot::Primary);
            let mut left = vec![0.0; block];
            let mut right = vec![0.0; block];

            let mut calls = 0;
            let mut last = 0;
            while !voice.is_finished(&sample) {
                last = voice.render(&sample, &mut left, &mut right);
                calls += 1;
            }

            assert_eq!(calls, frames.div_ceil(block), "{} / {}", frames, block);
            let expected_last = if frames % block == 0 { block } else { frames % block };
            assert_eq!(last, expected_last);
            assert_eq!(voice.cursor(), frames);
        }
    }

    #[test]
    fn both_channels_receive_same_data() {
        let sample = ramp(8);
        let mut voice = ClickVoice::new(ClickSlot::Accent);
        let mut left = [0.0; 5];
        let mut right = [0.0; 5];
        voice.render(&sample, &mut left, &mut right);
        assert_eq!(left, right);
        assert_eq!(&left[..], &sample.data()[..5]);
    }

    #[test]
    fn short_tail_leaves_rest_of_buffer() {
        let sample = ramp(3);
        let mut voice = ClickVoice::new(ClickSlot::Primary);
        let mut left = [9.0; 4];
        let mut right = [9.0; 4];
        assert_eq!(voice.render(&sample, &mut left, &mut right), 3);
        assert_eq!(left[3], 9.0);
        assert_eq!(voice.render(&sample, &mut left, &mut right), 0);
    }

    #[test]
    fn remaining_saturates_when_sample_shrinks() {
        let mut voice = ClickVoice::new(ClickSlot::Primary);
        let long = ramp(100);
        let mut buf = [0.0; 64];
        let mut buf2 = [0.0; 64];
        voice.render(&long, &mut buf, &mut buf2);
        let short = ramp(10);
        assert_eq!(voice.remaining(&short), 0);
        assert!(voice.is_finished(&short));
    }
}
