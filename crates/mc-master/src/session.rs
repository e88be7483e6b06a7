//! A click player paired with the beat clock that drives it.

use mc_engine::{BeatClock, ClickPlayer, PlayerConfig};
use mc_ir::{DecodedSample, Frame};

use crate::ControllerError;

/// Frames rendered per block, offline and on the audio thread.
pub const BLOCK_FRAMES: usize = 512;

/// Everything needed to build a [`Session`], cheap enough to clone onto the
/// audio thread before playback starts.
#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub config: PlayerConfig,
    pub primary: Option<DecodedSample>,
    pub secondary: Option<DecodedSample>,
    pub bpm: f64,
    pub first_beat_ms: f64,
    /// Relative tempo, scales `bpm`.
    pub tempo: f32,
    pub volume: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            config: PlayerConfig::default(),
            primary: None,
            secondary: None,
            bpm: 120.0,
            first_beat_ms: 0.0,
            tempo: 1.0,
            volume: 1.0,
        }
    }
}

/// A playing click track.
pub struct Session {
    player: ClickPlayer,
    clock: BeatClock,
    volume: f32,
    buffer: Vec<f32>,
}

impl Session {
    /// Build a playing session at `sample_rate`. Needs at least a primary click.
    pub fn new(settings: &SessionSettings, sample_rate: u32) -> Result<Self, ControllerError> {
        let primary = settings.primary.clone().ok_or(ControllerError::NoClickSound)?;
        let config = PlayerConfig {
            sample_rate,
            ..settings.config
        };

        let mut player = ClickPlayer::new(config)?;
        player.set_primary(primary);
        if let Some(accent) = settings.secondary.clone() {
            player.set_secondary(accent);
        }
        player.set_tempo(settings.tempo);
        player.set_first_beat_ms(settings.first_beat_ms as f32);

        let mut clock = BeatClock::new(
            settings.bpm * settings.tempo as f64,
            config.signature,
            sample_rate,
        );
        clock.set_first_beat_ms(settings.first_beat_ms);

        player.play();
        Ok(Self {
            player,
            clock,
            volume: settings.volume,
            buffer: vec![0.0; BLOCK_FRAMES * 2],
        })
    }

    /// Render up to [`BLOCK_FRAMES`] frames, returned interleaved.
    pub fn render_block(&mut self, frames: usize) -> &[f32] {
        let frames = frames.min(BLOCK_FRAMES);
        let out = &mut self.buffer[..frames * 2];
        let beat = self.clock.beat_index();
        self.player.process(out, false, frames, self.volume, beat);
        self.clock.advance(frames);
        out
    }

    /// Render `num_frames` frames into a new vector.
    pub fn render_frames(&mut self, num_frames: usize) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(num_frames);
        while frames.len() < num_frames {
            let n = (num_frames - frames.len()).min(BLOCK_FRAMES);
            frames.extend(Frame::from_interleaved(self.render_block(n)));
        }
        frames
    }

    pub fn player(&self) -> &ClickPlayer {
        &self.player
    }

    pub fn position_frames(&self) -> u64 {
        self.player.transport().elapsed_frames()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SessionSettings {
        SessionSettings {
            primary: Some(DecodedSample::new("p", 44100, 16, vec![0.5; 100])),
            secondary: Some(DecodedSample::new("a", 44100, 16, vec![-0.5; 100])),
            config: PlayerConfig::default().with_gain(1.0 / 32768.0),
            ..SessionSettings::default()
        }
    }

    #[test]
    fn needs_a_primary_click() {
        let s = SessionSettings::default();
        assert!(matches!(Session::new(&s, 44100), Err(ControllerError::NoClickSound)));
    }

    #[test]
    fn clicks_land_on_beats() {
        let mut session = Session::new(&settings(), 44100).unwrap();
        // 120 BPM: one beat every 22050 frames, rounded up to whole blocks.
        let frames = session.render_frames(44100 * 2);

        let onsets: Vec<usize> = frames
            .iter()
            .enumerate()
            .filter(|(i, f)| f.left != 0.0 && (*i == 0 || frames[i - 1].left == 0.0))
            .map(|(i, _)| i)
            .collect();

        let block_after = |beat: usize| (beat * 22050).div_ceil(BLOCK_FRAMES) * BLOCK_FRAMES;
        assert_eq!(onsets, vec![0, block_after(1), block_after(2), block_after(3)]);

        // Downbeat is the accent (negative), the rest regular (positive).
        assert!(frames[0].left < 0.0);
        assert!(frames[block_after(1)].left > 0.0);
        assert_eq!(frames[0].left, frames[0].right);
    }

    #[test]
    fn tempo_scales_clock() {
        let mut s = settings();
        s.tempo = 2.0;
        let mut session = Session::new(&s, 44100).unwrap();
        let frames = session.render_frames(22050);
        let sounding_blocks = frames
            .chunks(BLOCK_FRAMES)
            .filter(|b| b.iter().any(|f| f.left != 0.0))
            .count();
        assert_eq!(sounding_blocks, 2);
        assert_eq!(session.player().tempo(), 2.0);
    }
}
