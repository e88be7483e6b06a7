//! Host-supplied beat position.

/// Which beat of the measure the host says has just happened.
///
/// The integer part names the beat, the fractional part is the progress
/// through it. Known beats lie in `[1.0, signature + 1.0)`; `0.0` means the
/// host does not know where it is.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct BeatIndex(f32);

impl BeatIndex {
    /// "Don't know" marker.
    pub const UNKNOWN: Self = Self(0.0);

    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Integer beat number. Zero for unknown, negative or NaN input.
    pub fn beat(self) -> u32 {
        if self.0 >= 1.0 {
            self.0 as u32
        } else {
            0
        }
    }

    pub fn is_known(self) -> bool {
        self.beat() != 0
    }
}

impl From<f32> for BeatIndex {
    fn from(value: f32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_part_truncates() {
        assert_eq!(BeatIndex::new(1.0).beat(), 1);
        assert_eq!(BeatIndex::new(1.999).beat(), 1);
        assert_eq!(BeatIndex::new(4.5).beat(), 4);
    }

    #[test]
    fn zero_and_garbage_are_unknown() {
        assert!(!BeatIndex::UNKNOWN.is_known());
        assert_eq!(BeatIndex::new(0.75).beat(), 0);
        assert_eq!(BeatIndex::new(-2.5).beat(), 0);
        assert_eq!(BeatIndex::new(f32::NAN).beat(), 0);
        assert!(BeatIndex::from(2.0).is_known());
    }
}
