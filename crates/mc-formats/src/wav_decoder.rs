//! Strict decoder for 16-bit mono PCM WAV files.
//!
//! The header is read section by section and each marker is checked before
//! the next section is touched. There is no chunk scanning and no fallback:
//! anything other than the canonical layout is rejected.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use binrw::BinRead;
use mc_ir::{DecodedSample, FULL_SCALE};

use crate::error::{DecodeError, FormatError, IntegrityError};

const PCM: u16 = 1;
const FMT_CHUNK_SIZE: u32 = 16;
const SUPPORTED_CHANNELS: u16 = 1;
const SUPPORTED_BITS: u16 = 16;

#[derive(BinRead, Debug)]
#[br(little)]
struct RiffHeader {
    tag: [u8; 4],
    _riff_size: u32,
    format: [u8; 4],
}

#[derive(BinRead, Debug)]
#[br(little)]
struct FmtChunk {
    size: u32,
    format_code: u16,
    channels: u16,
    sample_rate: u32,
    byte_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
}

#[derive(BinRead, Debug)]
#[br(little)]
struct DataChunkHeader {
    id: [u8; 4],
    size: u32,
}

/// Open and decode a WAV file. The sample is named after the file.
pub fn load_wav(path: impl AsRef<Path>) -> Result<DecodedSample, DecodeError> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    let mut reader = BufReader::new(File::open(path)?);
    let sample = decode_wav(&mut reader, &name)?;

    log::debug!(
        "decoded {}: {} frames at {} Hz ({:.1} ms)",
        path.display(),
        sample.frames(),
        sample.sample_rate(),
        sample.duration_ms()
    );
    Ok(sample)
}

/// Decode a WAV file held in memory.
pub fn decode_wav_bytes(data: &[u8], name: &str) -> Result<DecodedSample, DecodeError> {
    decode_wav(&mut Cursor::new(data), name)
}

/// Decode a complete WAV stream in one pass.
pub fn decode_wav<R: Read + Seek>(reader: &mut R, name: &str) -> Result<DecodedSample, DecodeError> {
    let riff = RiffHeader::read(reader).map_err(|e| DecodeError::from_binrw(e, "RIFF header"))?;
    expect_tag(riff.tag, "RIFF")?;
    expect_tag(riff.format, "WAVE")?;

    let fmt_id = <[u8; 4]>::read_le(reader).map_err(|e| DecodeError::from_binrw(e, "fmt chunk"))?;
    expect_tag(fmt_id, "fmt ")?;
    let fmt = FmtChunk::read(reader).map_err(|e| DecodeError::from_binrw(e, "fmt chunk"))?;
    validate_fmt(&fmt)?;

    let data = DataChunkHeader::read(reader).map_err(|e| DecodeError::from_binrw(e, "data header"))?;
    expect_tag(data.id, "data")?;
    if data.size % fmt.block_align as u32 != 0 {
        return Err(FormatError::DataSize {
            size: data.size,
            block_align: fmt.block_align,
        }
        .into());
    }

    let raw = read_payload(reader, data.size)?;
    let samples = pcm_to_float(&raw, fmt.bits_per_sample);

    Ok(DecodedSample::new(name, fmt.sample_rate, fmt.bits_per_sample, samples))
}

fn expect_tag(found: [u8; 4], expected: &'static str) -> Result<(), FormatError> {
    if found.as_slice() == expected.as_bytes() {
        Ok(())
    } else {
        Err(FormatError::BadTag { expected, found })
    }
}

fn validate_fmt(fmt: &FmtChunk) -> Result<(), DecodeError> {
    if fmt.size != FMT_CHUNK_SIZE {
        return Err(FormatError::FmtChunkSize(fmt.size).into());
    }
    if fmt.format_code != PCM {
        return Err(FormatError::NotPcm(fmt.format_code).into());
    }
    if fmt.channels != SUPPORTED_CHANNELS {
        return Err(FormatError::Channels(fmt.channels).into());
    }
    if fmt.bits_per_sample != SUPPORTED_BITS {
        return Err(FormatError::BitsPerSample(fmt.bits_per_sample).into());
    }
    if fmt.sample_rate == 0 {
        return Err(FormatError::SampleRate.into());
    }

    let bytes_per_sample = fmt.bits_per_sample / 8;
    let block_align = fmt.channels * bytes_per_sample;
    let byte_rate = fmt.sample_rate as u64 * block_align as u64;

    if byte_rate != fmt.byte_rate as u64 {
        return Err(IntegrityError::ByteRate {
            expected: byte_rate.min(u32::MAX as u64) as u32,
            found: fmt.byte_rate,
        }
        .into());
    }
    if block_align != fmt.block_align {
        return Err(IntegrityError::BlockAlign {
            expected: block_align,
            found: fmt.block_align,
        }
        .into());
    }
    Ok(())
}

/// Read exactly `size` payload bytes, checking the stream is long enough
/// before allocating.
fn read_payload<R: Read + Seek>(reader: &mut R, size: u32) -> Result<Vec<u8>, DecodeError> {
    let start = reader.stream_position()?;
    let end = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(start))?;
    if end.saturating_sub(start) < size as u64 {
        return Err(FormatError::Truncated("data chunk").into());
    }

    let mut raw = vec![0u8; size as usize];
    reader.read_exact(&mut raw)?;
    Ok(raw)
}

fn pcm_to_float(raw: &[u8], bits: u16) -> Vec<f32> {
    let width = (bits / 8) as usize;
    raw.chunks_exact(width)
        .map(|bytes| {
            let word = bytes.iter().rev().fold(0u32, |acc, &b| (acc << 8) | b as u32);
            sign_extend(word, bits) as f32 / FULL_SCALE
        })
        .collect()
}

/// Interpret the low `bits` bits of `raw` as a two's-complement value.
///
/// Values above `2^(bits-1) - 1` wrap by subtracting `2^bits`.
pub fn sign_extend(raw: u32, bits: u16) -> i32 {
    debug_assert!((1..=32).contains(&bits));
    let max = (1i64 << (bits - 1)) - 1;
    let raw = raw as i64;
    let value = if raw > max { raw - (1i64 << bits) } else { raw };
    value as i32
}
