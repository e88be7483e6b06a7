//! Beat clock: derives a host-style beat index from a fixed BPM.
//!
//! The player never decides where beats are. Hosts without their own beat
//! tracking use this clock to produce the index they pass to
//! [`ClickPlayer::process`](crate::ClickPlayer::process).

use mc_ir::{BeatIndex, TimeSignature};

/// Fixed-tempo beat source.
///
/// Reports the downbeat of each measure as beat `signature.beats`, followed
/// by beats `1 .. signature.beats - 1`, which is the numbering the player's
/// accent rule expects. Before the first beat the index is unknown (0).
#[derive(Clone, Debug)]
pub struct BeatClock {
    bpm: f64,
    signature: TimeSignature,
    first_beat_ms: f64,
    sample_rate: u32,
    frames: u64,
}

impl BeatClock {
    pub fn new(bpm: f64, signature: TimeSignature, sample_rate: u32) -> Self {
        Self {
            bpm,
            signature,
            first_beat_ms: 0.0,
            sample_rate,
            frames: 0,
        }
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = bpm;
    }

    /// Offset of the first beat from position zero.
    pub fn set_first_beat_ms(&mut self, first_beat_ms: f64) {
        self.first_beat_ms = first_beat_ms;
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn signature(&self) -> TimeSignature {
        self.signature
    }

    pub fn advance(&mut self, frames: usize) {
        self.frames += frames as u64;
    }

    pub fn position_ms(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames as f64 * 1000.0 / self.sample_rate as f64
    }

    /// Beat index at the current position.
    pub fn beat_index(&self) -> BeatIndex {
        if !(self.bpm > 0.0) || self.sample_rate == 0 || !self.signature.is_valid() {
            return BeatIndex::UNKNOWN;
        }
        let since_first = self.position_ms() - self.first_beat_ms;
        if since_first < 0.0 {
            return BeatIndex::UNKNOWN;
        }

        let beats = since_first * self.bpm / 60_000.0;
        let whole = libm::floor(beats);
        // Keep the fraction short of 1.0 so the f32 cast can't round up
        // into the next beat.
        let frac = (beats - whole).min(0.999);

        let per_measure = self.signature.beats as f64;
        let in_measure = whole - libm::floor(whole / per_measure) * per_measure;
        let number = if in_measure == 0.0 { per_measure } else { in_measure };

        BeatIndex::new((number + frac) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 44100;
    /// One beat at 120 BPM.
    const BEAT: usize = 22050;

    #[test]
    fn measure_opens_on_numerator() {
        let mut clock = BeatClock::new(120.0, TimeSignature::FOUR_FOUR, RATE);
        let mut beats = Vec::new();
        for _ in 0..9 {
            beats.push(clock.beat_index().beat());
            clock.advance(BEAT);
        }
        assert_eq!(beats, vec![4, 1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn fraction_tracks_progress_through_beat() {
        let mut clock = BeatClock::new(120.0, TimeSignature::FOUR_FOUR, RATE);
        clock.advance(BEAT / 2);
        assert!((clock.beat_index().value() - 4.5).abs() < 1e-6);
        clock.advance(BEAT);
        assert!((clock.beat_index().value() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn index_stays_below_next_beat() {
        let mut clock = BeatClock::new(120.0, TimeSignature::new(3, 4), RATE);
        clock.advance(3 * BEAT - 1);
        let idx = clock.beat_index();
        assert_eq!(idx.beat(), 2);
        assert!(idx.value() < 3.0);
    }

    #[test]
    fn unknown_before_first_beat() {
        let mut clock = BeatClock::new(120.0, TimeSignature::FOUR_FOUR, RATE);
        clock.set_first_beat_ms(250.0);
        assert_eq!(clock.beat_index(), BeatIndex::UNKNOWN);
        clock.advance(RATE as usize / 4);
        assert_eq!(clock.beat_index().beat(), 4);
    }

    #[test]
    fn zero_bpm_is_unknown() {
        let mut clock = BeatClock::new(0.0, TimeSignature::FOUR_FOUR, RATE);
        clock.advance(RATE as usize);
        assert_eq!(clock.beat_index(), BeatIndex::UNKNOWN);
        clock.set_bpm(60.0);
        assert_eq!(clock.beat_index().beat(), 1);
    }
}
