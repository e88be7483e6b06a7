//! Transport and position tracking.

use mc_ir::BeatIndex;

/// Transport state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Playback state owned by a player.
///
/// Counters only move while playing. Tempo and the first-beat offset are
/// stored for the host and never rewrite what has already been emitted.
#[derive(Clone, Debug)]
pub struct Transport {
    state: TransportState,
    /// Elapsed playback time in milliseconds.
    position_ms: f64,
    /// Frames processed while playing.
    elapsed_frames: u64,
    /// Frames processed while a click was sounding.
    click_frames: u64,
    tempo: f32,
    first_beat_ms: f32,
    /// Last beat index the host reported.
    beat_index: BeatIndex,
    /// Last known (non-zero) integer beat.
    previous_beat: u32,
}

impl Transport {
    pub fn new() -> Self {
        Self {
            state: TransportState::Stopped,
            position_ms: 0.0,
            elapsed_frames: 0,
            click_frames: 0,
            tempo: 1.0,
            first_beat_ms: 0.0,
            beat_index: BeatIndex::UNKNOWN,
            previous_beat: 0,
        }
    }

    /// Start or resume. Starting from stopped begins at zero.
    pub fn play(&mut self) {
        if self.state == TransportState::Stopped {
            self.rewind();
        }
        self.state = TransportState::Playing;
    }

    /// Pause if playing. Position is kept.
    pub fn pause(&mut self) {
        if self.state == TransportState::Playing {
            self.state = TransportState::Paused;
        }
    }

    /// Stop from any state and zero the position.
    pub fn stop(&mut self) {
        self.state = TransportState::Stopped;
        self.rewind();
    }

    /// Zero the position, then either stop or (re)start playback.
    pub fn reset_position(&mut self, stop_after: bool) {
        self.rewind();
        self.state = if stop_after {
            TransportState::Stopped
        } else {
            TransportState::Playing
        };
    }

    fn rewind(&mut self) {
        self.position_ms = 0.0;
        self.elapsed_frames = 0;
        self.click_frames = 0;
        self.beat_index = BeatIndex::UNKNOWN;
        self.previous_beat = 0;
    }

    pub fn set_tempo(&mut self, tempo: f32) {
        self.tempo = tempo;
    }

    pub fn set_first_beat_ms(&mut self, first_beat_ms: f32) {
        self.first_beat_ms = first_beat_ms;
    }

    /// Move the position forward by one callback's worth of frames.
    pub(crate) fn advance(&mut self, frames: usize, sample_rate: u32) {
        self.elapsed_frames += frames as u64;
        self.position_ms += frames as f64 / sample_rate as f64 * 1000.0;
    }

    pub(crate) fn count_click_frames(&mut self, frames: usize) {
        self.click_frames += frames as u64;
    }

    /// Record the host's beat. On a crossing into a new known beat, returns
    /// the previously known beat (0 if there was none).
    pub(crate) fn cross_beat(&mut self, beat: BeatIndex) -> Option<u32> {
        self.beat_index = beat;
        let current = beat.beat();
        if !beat.is_known() || current == self.previous_beat {
            return None;
        }
        Some(core::mem::replace(&mut self.previous_beat, current))
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn position_ms(&self) -> f64 {
        self.position_ms
    }

    pub fn elapsed_frames(&self) -> u64 {
        self.elapsed_frames
    }

    pub fn click_frames(&self) -> u64 {
        self.click_frames
    }

    pub fn tempo(&self) -> f32 {
        self.tempo
    }

    pub fn first_beat_ms(&self) -> f32 {
        self.first_beat_ms
    }

    pub fn beat_index(&self) -> BeatIndex {
        self.beat_index
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}
