//! Time signature.

/// Time signature of the track being clicked along to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeSignature {
    /// Beats per measure (numerator).
    pub beats: u8,
    /// Note value of one beat (denominator).
    pub unit: u8,
}

impl TimeSignature {
    pub const FOUR_FOUR: Self = Self { beats: 4, unit: 4 };

    pub const fn new(beats: u8, unit: u8) -> Self {
        Self { beats, unit }
    }

    /// True for the beat that opens a measure in the host's numbering,
    /// which reports the downbeat as the numerator.
    pub fn is_downbeat(&self, beat: u32) -> bool {
        beat == self.beats as u32
    }

    pub fn is_valid(&self) -> bool {
        self.beats > 0 && self.unit > 0
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::FOUR_FOUR
    }
}

impl core::fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.beats, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downbeat_is_numerator() {
        let sig = TimeSignature::new(3, 4);
        assert!(sig.is_downbeat(3));
        assert!(!sig.is_downbeat(1));
        assert!(!sig.is_downbeat(0));
    }

    #[test]
    fn zero_numerator_is_invalid() {
        assert!(TimeSignature::FOUR_FOUR.is_valid());
        assert!(!TimeSignature::new(0, 4).is_valid());
    }
}
