//! Core types for the metroclick click engine.
//!
//! The decoder produces these types and the click player consumes them.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod beat;
mod frame;
mod sample;
mod signature;

pub use beat::BeatIndex;
pub use frame::Frame;
pub use sample::{DecodedSample, FULL_SCALE};
pub use signature::TimeSignature;
