//! Decoded click sample data.

use alloc::vec::Vec;
use arrayvec::ArrayString;

/// Full-scale value of 16-bit PCM. Samples are normalized by this constant.
pub const FULL_SCALE: f32 = 32768.0;

/// A fully decoded mono sample held in memory.
///
/// Immutable after construction: the player only ever reads from it, and a
/// reload replaces the whole value.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedSample {
    name: ArrayString<32>,
    sample_rate: u32,
    bits_per_sample: u16,
    data: Vec<f32>,
}

impl DecodedSample {
    /// Only mono data is ever decoded.
    pub const CHANNELS: u16 = 1;

    /// Create a sample from already normalized mono data.
    ///
    /// Names longer than 32 bytes are truncated.
    pub fn new(name: &str, sample_rate: u32, bits_per_sample: u16, data: Vec<f32>) -> Self {
        let mut short = ArrayString::new();
        for c in name.chars() {
            if short.try_push(c).is_err() {
                break;
            }
        }
        Self {
            name: short,
            sample_rate,
            bits_per_sample,
            data,
        }
    }

    /// Create a sample from 16-bit integer PCM.
    pub fn from_pcm16(name: &str, sample_rate: u32, pcm: &[i16]) -> Self {
        let data = pcm.iter().map(|&s| s as f32 / FULL_SCALE).collect();
        Self::new(name, sample_rate, 16, data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    pub fn channels(&self) -> u16 {
        Self::CHANNELS
    }

    /// Number of frames (one sample per frame, since the data is mono).
    pub fn frames(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Normalized sample data, approximately in [-1.0, 1.0].
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Up to `len` frames starting at `start`. Empty past the end.
    pub fn window(&self, start: usize, len: usize) -> &[f32] {
        let start = start.min(self.data.len());
        let end = start.saturating_add(len).min(self.data.len());
        &self.data[start..end]
    }

    /// Playback length in milliseconds at the sample's own rate.
    pub fn duration_ms(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.data.len() as f64 * 1000.0 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn from_pcm16_normalizes_by_full_scale() {
        let s = DecodedSample::from_pcm16("click", 44100, &[0, 16384, -32768, 32767]);
        assert_eq!(s.frames(), 4);
        assert_eq!(s.data()[0], 0.0);
        assert_eq!(s.data()[1], 0.5);
        assert_eq!(s.data()[2], -1.0);
        assert!((s.data()[3] - 32767.0 / 32768.0).abs() < 1e-7);
        assert_eq!(s.bits_per_sample(), 16);
        assert_eq!(s.channels(), 1);
    }

    #[test]
    fn window_clamps_to_data() {
        let s = DecodedSample::new("w", 8000, 16, vec![0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(s.window(0, 2), &[0.1, 0.2]);
        assert_eq!(s.window(3, 10), &[0.4, 0.5]);
        assert!(s.window(5, 4).is_empty());
        assert!(s.window(99, 4).is_empty());
        assert_eq!(s.window(1, usize::MAX), &[0.2, 0.3, 0.4, 0.5]);
    }

    #[test]
    fn long_names_are_truncated() {
        let s = DecodedSample::new("a-rather-long-name-for-a-click-sample.wav", 44100, 16, vec![]);
        assert_eq!(s.name().len(), 32);
        assert!(s.is_empty());
    }

    #[test]
    fn duration_of_100ms_click() {
        let s = DecodedSample::new("c", 44100, 16, vec![0.0; 4410]);
        assert!((s.duration_ms() - 100.0).abs() < 1e-9);
        let zero_rate = DecodedSample::new("z", 0, 16, vec![0.0; 10]);
        assert_eq!(zero_rate.duration_ms(), 0.0);
    }
}
