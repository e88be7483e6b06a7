//! Player configuration.

use mc_ir::TimeSignature;
use thiserror::Error;

/// Attenuation applied after truncating a click sample to the 16-bit range.
///
/// Matches existing mixes bit-for-bit. Raise it for clicks that sit at a
/// normal level against float host content.
pub const REFERENCE_CLICK_GAIN: f32 = 0.0001;

/// Capacity of the per-player scratch arena, in frames.
///
/// Larger callbacks are mixed in sub-blocks of at most this size.
pub const MAX_BLOCK_FRAMES: usize = 4096;

/// Static settings for a [`ClickPlayer`](crate::ClickPlayer).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Decides which beat gets the accent click.
    pub signature: TimeSignature,
    /// Click gain, see [`REFERENCE_CLICK_GAIN`].
    pub gain: f32,
    /// Sub-block size used for mixing, at most [`MAX_BLOCK_FRAMES`].
    pub max_block_frames: usize,
}

impl PlayerConfig {
    pub fn new(sample_rate: u32, signature: TimeSignature) -> Self {
        Self {
            sample_rate,
            signature,
            ..Self::default()
        }
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    pub fn with_max_block_frames(mut self, frames: usize) -> Self {
        self.max_block_frames = frames;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::SampleRate);
        }
        if !self.signature.is_valid() {
            return Err(ConfigError::Signature(self.signature));
        }
        if !self.gain.is_finite() || self.gain < 0.0 {
            return Err(ConfigError::Gain(self.gain));
        }
        if self.max_block_frames == 0 || self.max_block_frames > MAX_BLOCK_FRAMES {
            return Err(ConfigError::BlockSize(self.max_block_frames));
        }
        Ok(())
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            signature: TimeSignature::FOUR_FOUR,
            gain: REFERENCE_CLICK_GAIN,
            max_block_frames: MAX_BLOCK_FRAMES,
        }
    }
}

/// Rejected player configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("sample rate must be non-zero")]
    SampleRate,

    #[error("invalid time signature {0}")]
    Signature(TimeSignature),

    #[error("click gain must be finite and non-negative, got {0}")]
    Gain(f32),

    #[error("block size must be between 1 and {max}, got {0}", max = MAX_BLOCK_FRAMES)]
    BlockSize(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(PlayerConfig::default().validate(), Ok(()));
        assert_eq!(PlayerConfig::default().gain, REFERENCE_CLICK_GAIN);
    }

    #[test]
    fn rejects_bad_values() {
        let base = PlayerConfig::default();
        assert_eq!(
            PlayerConfig { sample_rate: 0, ..base }.validate(),
            Err(ConfigError::SampleRate)
        );
        assert_eq!(
            PlayerConfig::new(48000, TimeSignature::new(0, 4)).validate(),
            Err(ConfigError::Signature(TimeSignature::new(0, 4)))
        );
        assert_eq!(base.with_gain(-1.0).validate(), Err(ConfigError::Gain(-1.0)));
        assert!(base.with_gain(f32::NAN).validate().is_err());
        assert_eq!(
            base.with_max_block_frames(0).validate(),
            Err(ConfigError::BlockSize(0))
        );
        assert_eq!(
            base.with_max_block_frames(MAX_BLOCK_FRAMES + 1).validate(),
            Err(ConfigError::BlockSize(MAX_BLOCK_FRAMES + 1))
        );
    }
}
