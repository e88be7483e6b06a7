//! Click engine for metroclick.
//!
//! Reacts to host-supplied beat positions and mixes decoded click samples
//! into interleaved stereo output, one audio callback at a time.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod clock;
mod config;
mod player;
mod scratch;
mod transport;
mod voice;

pub use clock::BeatClock;
pub use config::{ConfigError, PlayerConfig, MAX_BLOCK_FRAMES, REFERENCE_CLICK_GAIN};
pub use player::{ClickPlayer, ProcessOutcome};
pub use scratch::ScratchBuffer;
pub use transport::{Transport, TransportState};
pub use voice::{ClickSlot, ClickVoice};
