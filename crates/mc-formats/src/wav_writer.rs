//! WAV encoding for 16-bit PCM.

use mc_ir::Frame;
use std::io::Write;

/// Write mono 16-bit PCM in the exact layout the decoder accepts.
pub fn write_wav_mono16(w: &mut impl Write, samples: &[i16], sample_rate: u32) -> std::io::Result<()> {
    let data_size = samples.len() as u32 * 2;

    write_riff_header(w, data_size)?;
    write_fmt_chunk(w, 1, sample_rate)?;
    w.write_all(b"data")?;
    w.write_all(&data_size.to_le_bytes())?;
    for s in samples {
        w.write_all(&s.to_le_bytes())?;
    }
    Ok(())
}

/// Write rendered stereo frames as 16-bit PCM, clamping overs.
pub fn write_wav_stereo16(w: &mut impl Write, frames: &[Frame], sample_rate: u32) -> std::io::Result<()> {
    let data_size = frames.len() as u32 * 4;

    write_riff_header(w, data_size)?;
    write_fmt_chunk(w, 2, sample_rate)?;
    w.write_all(b"data")?;
    w.write_all(&data_size.to_le_bytes())?;
    for frame in frames {
        let (left, right) = frame.to_pcm16();
        w.write_all(&left.to_le_bytes())?;
        w.write_all(&right.to_le_bytes())?;
    }
    Ok(())
}

pub fn mono16_to_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(44 + samples.len() * 2);
    write_wav_mono16(&mut buf, samples, sample_rate).expect("Vec<u8> write cannot fail");
    buf
}

pub fn frames_to_wav(frames: &[Frame], sample_rate: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(44 + frames.len() * 4);
    write_wav_stereo16(&mut buf, frames, sample_rate).expect("Vec<u8> write cannot fail");
    buf
}

fn write_riff_header(w: &mut impl Write, data_size: u32) -> std::io::Result<()> {
    w.write_all(b"RIFF")?;
    w.write_all(&(36 + data_size).to_le_bytes())?;
    w.write_all(b"WAVE")
}

fn write_fmt_chunk(w: &mut impl Write, num_channels: u16, sample_rate: u32) -> std::io::Result<()> {
    let bits_per_sample: u16 = 16;
    let block_align = num_channels * (bits_per_sample / 8);

    w.write_all(b"fmt ")?;
    w.write_all(&16u32.to_le_bytes())?;
    w.write_all(&1u16.to_le_bytes())?;
    w.write_all(&num_channels.to_le_bytes())?;
    w.write_all(&sample_rate.to_le_bytes())?;
    w.write_all(&(sample_rate * block_align as u32).to_le_bytes())?;
    w.write_all(&block_align.to_le_bytes())?;
    w.write_all(&bits_per_sample.to_le_bytes())
}
