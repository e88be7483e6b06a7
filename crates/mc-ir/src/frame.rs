//! Audio frame type.

/// A stereo audio frame in float format.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    pub left: f32,
    pub right: f32,
}

impl Frame {
    /// Create a silent frame.
    pub const fn silence() -> Self {
        Self { left: 0.0, right: 0.0 }
    }

    /// Read frames from an interleaved stereo buffer.
    pub fn from_interleaved(samples: &[f32]) -> impl Iterator<Item = Frame> + '_ {
        samples.chunks_exact(2).map(|c| Frame {
            left: c[0],
            right: c[1],
        })
    }

    /// Clamp both channels to [-1.0, 1.0] for device output.
    pub fn clamped(self) -> Self {
        Self {
            left: self.left.clamp(-1.0, 1.0),
            right: self.right.clamp(-1.0, 1.0),
        }
    }

    /// Quantize to 16-bit PCM (after clamping).
    pub fn to_pcm16(self) -> (i16, i16) {
        let f = self.clamped();
        ((f.left * 32767.0) as i16, (f.right * 32767.0) as i16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_interleaved_pairs_channels() {
        let frames: alloc::vec::Vec<Frame> = Frame::from_interleaved(&[0.1, 0.2, 0.3, 0.4, 0.5]).collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1], Frame { left: 0.3, right: 0.4 });
    }

    #[test]
    fn to_pcm16_clamps_overs() {
        assert_eq!(Frame { left: 3.0, right: 3.0 }.to_pcm16(), (32767, 32767));
        assert_eq!(Frame { left: -2.0, right: 0.0 }.to_pcm16(), (-32767, 0));
    }
}
