//! Headless controller for metroclick.
//!
//! Loads click sounds, drives a click player from a beat clock, and either
//! plays the result through the default audio device or renders it offline.

mod session;

use mc_audio::{AudioError, AudioOutput, CpalOutput};
use mc_engine::ConfigError;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use thiserror::Error;

// Re-export common types so callers don't need the lower crates directly.
pub use mc_engine::{PlayerConfig, REFERENCE_CLICK_GAIN};
pub use mc_formats::DecodeError;
pub use mc_ir::{DecodedSample, Frame, TimeSignature};
pub use session::{Session, SessionSettings, BLOCK_FRAMES};

/// Error type for controller operations.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("failed to load click sound: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("no click sound loaded")]
    NoClickSound,
}

/// Headless metronome controller: owns the click settings and manages playback.
pub struct Controller {
    settings: SessionSettings,
    playback: Option<PlaybackHandle>,
}

struct PlaybackHandle {
    stop_signal: Arc<AtomicBool>,
    position_frames: Arc<AtomicU64>,
    sample_rate: Arc<AtomicU32>,
    finished: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn new(config: PlayerConfig) -> Result<Self, ControllerError> {
        config.validate()?;
        Ok(Self {
            settings: SessionSettings {
                config,
                ..SessionSettings::default()
            },
            playback: None,
        })
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    // --- Click sounds ---

    /// Decode `path` as the regular click. Stops playback first.
    pub fn load_primary_sound(&mut self, path: impl AsRef<Path>) -> Result<&DecodedSample, ControllerError> {
        self.stop();
        let sample = mc_formats::load_wav(path)?;
        log::info!("primary click: {} ({} frames)", sample.name(), sample.frames());
        Ok(&*self.settings.primary.insert(sample))
    }

    /// Decode `path` as the accent click. Stops playback first.
    pub fn load_secondary_sound(&mut self, path: impl AsRef<Path>) -> Result<&DecodedSample, ControllerError> {
        self.stop();
        let sample = mc_formats::load_wav(path)?;
        log::info!("accent click: {} ({} frames)", sample.name(), sample.frames());
        Ok(&*self.settings.secondary.insert(sample))
    }

    pub fn set_primary(&mut self, sample: DecodedSample) -> Option<DecodedSample> {
        self.stop();
        self.settings.primary.replace(sample)
    }

    pub fn set_secondary(&mut self, sample: DecodedSample) -> Option<DecodedSample> {
        self.stop();
        self.settings.secondary.replace(sample)
    }

    // --- Click parameters (applied on the next play or render) ---

    pub fn set_bpm(&mut self, bpm: f64) {
        self.settings.bpm = bpm;
    }

    pub fn set_first_beat_ms(&mut self, first_beat_ms: f64) {
        self.settings.first_beat_ms = first_beat_ms;
    }

    pub fn set_tempo(&mut self, tempo: f32) {
        self.settings.tempo = tempo;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.settings.volume = volume.clamp(0.0, 1.0);
    }

    pub fn set_gain(&mut self, gain: f32) -> Result<(), ControllerError> {
        let config = self.settings.config.with_gain(gain);
        config.validate()?;
        self.settings.config = config;
        Ok(())
    }

    // --- Real-time playback ---

    pub fn play(&mut self) -> Result<(), ControllerError> {
        self.stop();
        if self.settings.primary.is_none() {
            return Err(ControllerError::NoClickSound);
        }

        let settings = self.settings.clone();
        let stop_signal = Arc::new(AtomicBool::new(false));
        let position_frames = Arc::new(AtomicU64::new(0));
        let sample_rate = Arc::new(AtomicU32::new(settings.config.sample_rate));
        let finished = Arc::new(AtomicBool::new(false));

        let stop = stop_signal.clone();
        let position = position_frames.clone();
        let rate = sample_rate.clone();
        let done = finished.clone();

        let thread = std::thread::spawn(move || {
            audio_thread(settings, stop, position, rate, done);
        });

        self.playback = Some(PlaybackHandle {
            stop_signal,
            position_frames,
            sample_rate,
            finished,
            thread: Some(thread),
        });
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut pb) = self.playback.take() {
            pb.stop_signal.store(true, Ordering::Relaxed);
            if let Some(handle) = pb.thread.take() {
                let _ = handle.join();
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| !p.finished.load(Ordering::Relaxed))
    }

    pub fn is_finished(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| p.finished.load(Ordering::Relaxed))
    }

    pub fn position_ms(&self) -> Option<f64> {
        let pb = self.playback.as_ref()?;
        if pb.finished.load(Ordering::Relaxed) {
            return None;
        }
        let frames = pb.position_frames.load(Ordering::Relaxed);
        let rate = pb.sample_rate.load(Ordering::Relaxed).max(1);
        Some(frames as f64 * 1000.0 / rate as f64)
    }

    // --- Offline rendering ---

    pub fn render_frames(&self, num_frames: usize) -> Result<Vec<Frame>, ControllerError> {
        let mut session = Session::new(&self.settings, self.settings.config.sample_rate)?;
        Ok(session.render_frames(num_frames))
    }

    pub fn render_to_wav(&self, seconds: f64) -> Result<Vec<u8>, ControllerError> {
        let sample_rate = self.settings.config.sample_rate;
        let num_frames = (seconds.max(0.0) * sample_rate as f64) as usize;
        let frames = self.render_frames(num_frames)?;
        Ok(mc_formats::frames_to_wav(&frames, sample_rate))
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn audio_thread(
    settings: SessionSettings,
    stop_signal: Arc<AtomicBool>,
    position_frames: Arc<AtomicU64>,
    sample_rate: Arc<AtomicU32>,
    finished: Arc<AtomicBool>,
) {
    let (mut output, consumer) = match CpalOutput::new() {
        Ok(pair) => pair,
        Err(e) => {
            log::error!("cannot open audio output: {}", e);
            finished.store(true, Ordering::Relaxed);
            return;
        }
    };

    let rate = output.sample_rate();
    sample_rate.store(rate, Ordering::Relaxed);
    let mut session = match Session::new(&settings, rate) {
        Ok(session) => session,
        Err(e) => {
            log::error!("cannot start click session: {}", e);
            finished.store(true, Ordering::Relaxed);
            return;
        }
    };

    if let Err(e) = output.build_stream(consumer) {
        log::error!("cannot build audio stream: {}", e);
        finished.store(true, Ordering::Relaxed);
        return;
    }
    let _ = output.start();

    while !stop_signal.load(Ordering::Relaxed) {
        for frame in Frame::from_interleaved(session.render_block(BLOCK_FRAMES)) {
            output.write_spin(frame);
        }
        position_frames.store(session.position_frames(), Ordering::Relaxed);
    }

    let _ = output.stop();
    finished.store(true, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller_with_click() -> Controller {
        let mut ctrl = Controller::new(PlayerConfig::default()).unwrap();
        ctrl.set_primary(DecodedSample::from_pcm16("p", 44100, &[20000; 441]));
        ctrl
    }

    #[test]
    fn rejects_invalid_config() {
        let config = PlayerConfig {
            sample_rate: 0,
            ..PlayerConfig::default()
        };
        assert!(matches!(Controller::new(config), Err(ControllerError::Config(_))));
    }

    #[test]
    fn render_without_click_fails() {
        let ctrl = Controller::new(PlayerConfig::default()).unwrap();
        assert!(matches!(ctrl.render_frames(100), Err(ControllerError::NoClickSound)));
    }

    #[test]
    fn play_without_click_fails() {
        let mut ctrl = Controller::new(PlayerConfig::default()).unwrap();
        assert!(matches!(ctrl.play(), Err(ControllerError::NoClickSound)));
        assert!(!ctrl.is_playing());
        assert_eq!(ctrl.position_ms(), None);
    }

    #[test]
    fn render_to_wav_has_stereo_header_and_length() {
        let ctrl = controller_with_click();
        let wav = ctrl.render_to_wav(1.0).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 2);
        assert_eq!(wav.len(), 44 + 44100 * 4);
    }

    #[test]
    fn volume_is_clamped_and_gain_validated() {
        let mut ctrl = controller_with_click();
        ctrl.set_volume(3.0);
        assert_eq!(ctrl.settings().volume, 1.0);
        assert!(ctrl.set_gain(f32::INFINITY).is_err());
        assert!(ctrl.set_gain(0.5).is_ok());
    }

    #[test]
    fn reference_gain_click_level() {
        let ctrl = controller_with_click();
        let frames = ctrl.render_frames(BLOCK_FRAMES).unwrap();
        let expected = 20000.0 * REFERENCE_CLICK_GAIN;
        assert!((frames[0].left - expected).abs() < 1e-4);
        assert_eq!(frames[441], Frame::silence());
    }

    #[test]
    fn failed_load_keeps_previous_click() {
        let mut ctrl = controller_with_click();
        let missing = std::env::temp_dir().join("mc-master-no-such-click.wav");
        assert!(matches!(
            ctrl.load_primary_sound(&missing),
            Err(ControllerError::Decode(DecodeError::Io(_)))
        ));
        assert_eq!(ctrl.settings().primary.as_ref().map(|s| s.name()), Some("p"));
    }
}
