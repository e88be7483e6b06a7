//! Fixed-capacity scratch space for the real-time path.

use heapless::Vec;

use crate::config::MAX_BLOCK_FRAMES;

/// Left/right mono scratch buffers reused across callbacks.
///
/// Storage is inline and sized at compile time, so preparing a block never
/// touches the allocator.
#[derive(Clone, Debug, Default)]
pub struct ScratchBuffer {
    left: Vec<f32, MAX_BLOCK_FRAMES>,
    right: Vec<f32, MAX_BLOCK_FRAMES>,
}

impl ScratchBuffer {
    pub const CAPACITY: usize = MAX_BLOCK_FRAMES;

    pub const fn new() -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    /// Zero `frames` samples per channel (clamped to capacity) and hand them out.
    pub fn prepare(&mut self, frames: usize) -> (&mut [f32], &mut [f32]) {
        let frames = frames.min(Self::CAPACITY);
        self.left.clear();
        self.right.clear();
        let resized = self
            .left
            .resize(frames, 0.0)
            .and(self.right.resize(frames, 0.0));
        debug_assert!(resized.is_ok(), "{} frames exceeds scratch capacity", frames);
        (self.left.as_mut_slice(), self.right.as_mut_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_zeroes_previous_contents() {
        let mut scratch = ScratchBuffer::new();
        {
            let (l, r) = scratch.prepare(4);
            l.fill(1.0);
            r.fill(-1.0);
        }
        let (l, r) = scratch.prepare(3);
        assert_eq!(l, &[0.0; 3]);
        assert_eq!(r, &[0.0; 3]);
    }

    #[test]
    fn prepare_clamps_to_capacity() {
        let mut scratch = ScratchBuffer::new();
        let (l, _) = scratch.prepare(ScratchBuffer::CAPACITY * 2);
        assert_eq!(l.len(), ScratchBuffer::CAPACITY);
    }
}
