//! Error types for WAV decoding.

use thiserror::Error;

/// The container or codec is not the one supported layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("expected '{expected}' tag, found {found:?}")]
    BadTag {
        expected: &'static str,
        found: [u8; 4],
    },

    #[error("fmt chunk size must be 16, found {0}")]
    FmtChunkSize(u32),

    #[error("audio format {0} is not PCM (1)")]
    NotPcm(u16),

    #[error("{0} channels, only mono is supported")]
    Channels(u16),

    #[error("{0} bits per sample, only 16 is supported")]
    BitsPerSample(u16),

    #[error("sample rate must be non-zero")]
    SampleRate,

    #[error("data size {size} is not a multiple of the block alignment {block_align}")]
    DataSize { size: u32, block_align: u16 },

    #[error("stream ends inside the {0}")]
    Truncated(&'static str),
}

/// A derived header field disagrees with the value the file declares.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("byte rate is {found}, expected {expected}")]
    ByteRate { expected: u32, found: u32 },

    #[error("block alignment is {found}, expected {expected}")]
    BlockAlign { expected: u16, found: u16 },
}

/// Any failure while decoding. None of these are recoverable.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported WAV file: {0}")]
    Format(#[from] FormatError),

    #[error("corrupt WAV header: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Map a header read failure. Running out of bytes is a format error.
    pub(crate) fn from_binrw(err: binrw::Error, section: &'static str) -> Self {
        if err.is_eof() {
            return FormatError::Truncated(section).into();
        }
        match err {
            binrw::Error::Io(e) => DecodeError::Io(e),
            other => DecodeError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                other.to_string(),
            )),
        }
    }
}
