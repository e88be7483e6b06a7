//! metroclick CLI: play a click track live or render it to a WAV file.
//!
//! Usage:
//!   metroclick --click click.wav --bpm 100
//!   metroclick --click click.wav --accent accent.wav --wav out.wav --seconds 8

use anyhow::{Context, Result};
use clap::Parser;
use mc_ir::TimeSignature;
use mc_master::{Controller, DecodedSample, PlayerConfig, REFERENCE_CLICK_GAIN};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "metroclick", version, about = "Metronome click generator")]
struct Cli {
    /// Regular click sound (16-bit mono PCM WAV)
    #[arg(long)]
    click: PathBuf,

    /// Accent click sound, played on the downbeat
    #[arg(long)]
    accent: Option<PathBuf>,

    /// Beats per minute
    #[arg(long, default_value_t = 120.0)]
    bpm: f64,

    /// Beats per bar
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(2..=16))]
    beats: u8,

    /// Offset of the first beat in milliseconds
    #[arg(long, default_value_t = 0.0)]
    first_beat_ms: f64,

    /// Output volume, 0.0 to 1.0
    #[arg(long, default_value_t = 1.0)]
    volume: f32,

    /// Click gain applied on top of the volume
    #[arg(long, default_value_t = REFERENCE_CLICK_GAIN)]
    gain: f32,

    /// Render to this WAV file instead of playing
    #[arg(long)]
    wav: Option<PathBuf>,

    /// Length to render or play, in seconds
    #[arg(long, default_value_t = 8.0)]
    seconds: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = PlayerConfig::new(44100, TimeSignature::new(cli.beats, 4)).with_gain(cli.gain);
    let mut ctrl = Controller::new(config).context("invalid click settings")?;

    let click = ctrl
        .load_primary_sound(&cli.click)
        .with_context(|| format!("failed to load {}", cli.click.display()))?;
    print_sample("Click:", click);

    if let Some(accent) = &cli.accent {
        let accent_sample = ctrl
            .load_secondary_sound(accent)
            .with_context(|| format!("failed to load {}", accent.display()))?;
        print_sample("Accent:", accent_sample);
    }

    ctrl.set_bpm(cli.bpm);
    ctrl.set_first_beat_ms(cli.first_beat_ms);
    ctrl.set_volume(cli.volume);
    println!("Tempo:    {} BPM in {}/4", cli.bpm, cli.beats);
    println!();

    match &cli.wav {
        Some(path) => render_to_wav(&ctrl, path, cli.seconds),
        None => play_audio(&mut ctrl, cli.seconds),
    }
}

fn print_sample(label: &str, sample: &DecodedSample) {
    println!(
        "{:<9} {} ({} Hz, {} frames, {:.1} ms)",
        label,
        sample.name(),
        sample.sample_rate(),
        sample.frames(),
        sample.duration_ms()
    );
}

fn play_audio(ctrl: &mut Controller, seconds: f64) -> Result<()> {
    ctrl.play().context("failed to start playback")?;
    println!("Playing...");

    let limit_ms = seconds * 1000.0;
    while ctrl.is_playing() {
        if let Some(pos) = ctrl.position_ms() {
            print!("\rPosition: {:8.1} ms", pos);
            let _ = std::io::stdout().flush();
            if pos >= limit_ms {
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    let failed = ctrl.is_finished();
    ctrl.stop();
    if failed {
        anyhow::bail!("audio playback stopped unexpectedly");
    }
    println!("\rDone.                     ");
    Ok(())
}

fn render_to_wav(ctrl: &Controller, path: &PathBuf, seconds: f64) -> Result<()> {
    println!("Rendering {:.1} s to {}...", seconds, path.display());
    let wav = ctrl.render_to_wav(seconds)?;
    std::fs::write(path, &wav).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {} bytes.", wav.len());
    Ok(())
}
