//! Beat-triggered click player.
//!
//! The host tells the player which beat it is on every callback; the player
//! starts a click whenever the integer beat changes to a new known value and
//! streams that click's frames into the output until it runs out.

use mc_ir::{BeatIndex, DecodedSample, TimeSignature, FULL_SCALE};

use crate::config::{ConfigError, PlayerConfig};
use crate::scratch::ScratchBuffer;
use crate::transport::{Transport, TransportState};
use crate::voice::{ClickSlot, ClickVoice};

/// What one call to [`ClickPlayer::process_block`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Not playing, or volume is zero. Nothing advanced.
    Inactive,
    /// Playing, but no click is sounding.
    Silent,
    /// A beat boundary started a new click.
    Triggered(ClickSlot),
    /// An earlier click kept streaming.
    Streaming(ClickSlot),
    /// A beat boundary selected a sound that is not loaded; nothing was mixed.
    MissingSample(ClickSlot),
}

/// Metronome click player.
///
/// Owns its primary and accent sounds exclusively. Replacing a sound hands
/// the old one back to the caller, dropping it releases it.
pub struct ClickPlayer {
    config: PlayerConfig,
    transport: Transport,
    primary: Option<DecodedSample>,
    secondary: Option<DecodedSample>,
    voice: Option<ClickVoice>,
    scratch: ScratchBuffer,
}

impl ClickPlayer {
    /// Create a stopped player with no sounds loaded.
    pub fn new(config: PlayerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            transport: Transport::new(),
            primary: None,
            secondary: None,
            voice: None,
            scratch: ScratchBuffer::new(),
        })
    }

    // --- Transport ---

    pub fn play(&mut self) {
        if self.transport.state() == TransportState::Stopped {
            self.voice = None;
        }
        self.transport.play();
        log::debug!("click player: play");
    }

    pub fn pause(&mut self) {
        self.transport.pause();
        log::debug!("click player: pause at {:.1} ms", self.transport.position_ms());
    }

    pub fn stop(&mut self) {
        self.transport.stop();
        self.voice = None;
        log::debug!("click player: stop");
    }

    /// Zero the position. Stops playback if `stop_after`, otherwise plays.
    pub fn reset_position(&mut self, stop_after: bool) {
        self.transport.reset_position(stop_after);
        self.voice = None;
    }

    /// Relative playback tempo, 1.0 is original speed.
    pub fn set_tempo(&mut self, tempo: f32) {
        self.transport.set_tempo(tempo);
    }

    /// Where the beatgrid begins, for hosts that derive beats from it.
    pub fn set_first_beat_ms(&mut self, first_beat_ms: f32) {
        self.transport.set_first_beat_ms(first_beat_ms);
    }

    pub fn set_gain(&mut self, gain: f32) -> Result<(), ConfigError> {
        let config = self.config.with_gain(gain);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn state(&self) -> TransportState {
        self.transport.state()
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn position_ms(&self) -> f64 {
        self.transport.position_ms()
    }

    /// Frames processed while a click was sounding.
    pub fn total_frames(&self) -> u64 {
        self.transport.click_frames()
    }

    pub fn tempo(&self) -> f32 {
        self.transport.tempo()
    }

    pub fn first_beat_ms(&self) -> f32 {
        self.transport.first_beat_ms()
    }

    pub fn beat_index(&self) -> BeatIndex {
        self.transport.beat_index()
    }

    pub fn signature(&self) -> TimeSignature {
        self.config.signature
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// The click currently streaming, if any.
    pub fn voice(&self) -> Option<&ClickVoice> {
        self.voice.as_ref()
    }

    // --- Sounds ---

    pub fn primary(&self) -> Option<&DecodedSample> {
        self.primary.as_ref()
    }

    pub fn secondary(&self) -> Option<&DecodedSample> {
        self.secondary.as_ref()
    }

    pub fn sample(&self, slot: ClickSlot) -> Option<&DecodedSample> {
        slot_sample(&self.primary, &self.secondary, slot)
    }

    /// Replace the regular click, returning the previous one.
    pub fn set_primary(&mut self, sample: DecodedSample) -> Option<DecodedSample> {
        self.replace(ClickSlot::Primary, Some(sample))
    }

    /// Replace the accent click, returning the previous one.
    pub fn set_secondary(&mut self, sample: DecodedSample) -> Option<DecodedSample> {
        self.replace(ClickSlot::Accent, Some(sample))
    }

    /// Release both sounds.
    pub fn clear(&mut self) {
        self.replace(ClickSlot::Primary, None);
        self.replace(ClickSlot::Accent, None);
    }

    fn replace(&mut self, slot: ClickSlot, sample: Option<DecodedSample>) -> Option<DecodedSample> {
        if let Some(s) = &sample {
            if s.sample_rate() != self.config.sample_rate {
                log::warn!(
                    "click '{}' is {} Hz but output is {} Hz; it will play at the wrong pitch",
                    s.name(),
                    s.sample_rate(),
                    self.config.sample_rate
                );
            }
        }
        if self.voice.is_some_and(|v| v.slot() == slot) {
            self.voice = None;
        }
        match slot {
            ClickSlot::Primary => core::mem::replace(&mut self.primary, sample),
            ClickSlot::Accent => core::mem::replace(&mut self.secondary, sample),
        }
    }

    /// Pause, then decode `path` as the regular click.
    ///
    /// On failure the previous sound stays loaded.
    #[cfg(feature = "std")]
    pub fn load_primary_sound(
        &mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), mc_formats::DecodeError> {
        self.load(ClickSlot::Primary, path.as_ref())
    }

    /// Pause, then decode `path` as the accent click played on downbeats.
    ///
    /// On failure the previous sound stays loaded.
    #[cfg(feature = "std")]
    pub fn load_secondary_sound(
        &mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), mc_formats::DecodeError> {
        self.load(ClickSlot::Accent, path.as_ref())
    }

    #[cfg(feature = "std")]
    fn load(&mut self, slot: ClickSlot, path: &std::path::Path) -> Result<(), mc_formats::DecodeError> {
        self.pause();
        let sample = mc_formats::load_wav(path).map_err(|e| {
            log::error!("failed to load {:?} click from {}: {}", slot, path.display(), e);
            e
        })?;
        log::info!(
            "loaded {:?} click {} ({} frames)",
            slot,
            path.display(),
            sample.frames()
        );
        self.replace(slot, Some(sample));
        Ok(())
    }

    // --- Processing ---

    /// Mix clicks into an interleaved stereo buffer.
    ///
    /// `buffer` holds `frames` stereo frames. With `add` the clicks are summed
    /// into the existing contents, otherwise the buffer is overwritten.
    /// `beat` is the host's beat index for this callback. Returns `add`
    /// unchanged for the caller's downstream composition.
    pub fn process(
        &mut self,
        buffer: &mut [f32],
        add: bool,
        frames: usize,
        volume: f32,
        beat: impl Into<BeatIndex>,
    ) -> bool {
        self.process_block(buffer, add, frames, volume, beat.into());
        add
    }

    /// Like [`process`](Self::process), reporting what happened.
    pub fn process_block(
        &mut self,
        buffer: &mut [f32],
        add: bool,
        frames: usize,
        volume: f32,
        beat: BeatIndex,
    ) -> ProcessOutcome {
        #[cfg(feature = "alloc_check")]
        let outcome =
            assert_no_alloc::assert_no_alloc(|| self.render(buffer, add, frames, volume, beat));
        #[cfg(not(feature = "alloc_check"))]
        let outcome = self.render(buffer, add, frames, volume, beat);
        outcome
    }

    fn render(
        &mut self,
        buffer: &mut [f32],
        add: bool,
        frames: usize,
        volume: f32,
        beat: BeatIndex,
    ) -> ProcessOutcome {
        let frames = frames.min(buffer.len() / 2);
        let output = &mut buffer[..frames * 2];
        if !add {
            output.fill(0.0);
        }

        // NaN volume counts as silent.
        let audible = volume > 0.0;
        if !self.transport.is_playing() || !audible {
            return ProcessOutcome::Inactive;
        }

        self.transport.advance(frames, self.config.sample_rate);

        let mut triggered = false;
        if let Some(previous) = self.transport.cross_beat(beat) {
            let slot = self.select_slot(beat.beat(), previous);
            if self.sample(slot).is_none() {
                self.voice = None;
                return ProcessOutcome::MissingSample(slot);
            }
            self.voice = Some(ClickVoice::new(slot));
            triggered = true;
        }

        let Some(mut voice) = self.voice else {
            return ProcessOutcome::Silent;
        };
        let slot = voice.slot();
        let Some(sample) = slot_sample(&self.primary, &self.secondary, slot) else {
            self.voice = None;
            return ProcessOutcome::MissingSample(slot);
        };

        let gain = self.config.gain;
        let block = self.config.max_block_frames;
        let mut done = 0;
        while done < frames && !voice.is_finished(sample) {
            let n = (frames - done).min(block);
            let (left, right) = self.scratch.prepare(n);
            voice.render(sample, left, right);
            mix_click(&mut output[done * 2..(done + n) * 2], left, right, gain, volume);
            done += n;
        }

        self.transport.count_click_frames(frames);
        self.voice = if voice.is_finished(sample) { None } else { Some(voice) };

        if triggered {
            ProcessOutcome::Triggered(slot)
        } else {
            ProcessOutcome::Streaming(slot)
        }
    }

    /// The accent goes on the downbeat, and on beat 1 when it follows an
    /// unknown position, provided an accent sound is loaded. Joining mid-bar
    /// on any other beat gets the regular click.
    fn select_slot(&self, beat: u32, previous: u32) -> ClickSlot {
        let accent = self.config.signature.is_downbeat(beat) || (previous == 0 && beat == 1);
        if accent && self.secondary.is_some() {
            ClickSlot::Accent
        } else {
            ClickSlot::Primary
        }
    }
}

impl core::fmt::Debug for ClickPlayer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClickPlayer")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .field("primary", &self.primary.as_ref().map(|s| s.name()))
            .field("secondary", &self.secondary.as_ref().map(|s| s.name()))
            .field("voice", &self.voice)
            .finish()
    }
}

fn slot_sample<'a>(
    primary: &'a Option<DecodedSample>,
    secondary: &'a Option<DecodedSample>,
    slot: ClickSlot,
) -> Option<&'a DecodedSample> {
    match slot {
        ClickSlot::Primary => primary.as_ref(),
        ClickSlot::Accent => secondary.as_ref(),
    }
}

/// Sum one block of click audio into interleaved stereo output.
///
/// Each sample is truncated to the 16-bit integer range first, then scaled
/// by `gain` and `volume`.
fn mix_click(output: &mut [f32], left: &[f32], right: &[f32], gain: f32, volume: f32) {
    for ((frame, &l), &r) in output.chunks_exact_mut(2).zip(left).zip(right) {
        frame[0] += to_pcm16(l) * gain * volume;
        frame[1] += to_pcm16(r) * gain * volume;
    }
}

fn to_pcm16(sample: f32) -> f32 {
    (sample * FULL_SCALE) as i16 as f32
}
