//! WAV decoding and encoding for metroclick.
//!
//! The decoder accepts exactly one encoding (16-bit mono PCM in a canonical
//! 44-byte header) and rejects everything else. The writer emits that same
//! layout, plus 16-bit stereo for rendered output.

mod error;
mod wav_decoder;
mod wav_writer;

pub use error::{DecodeError, FormatError, IntegrityError};
pub use wav_decoder::{decode_wav, decode_wav_bytes, load_wav, sign_extend};
pub use wav_writer::{frames_to_wav, mono16_to_wav, write_wav_mono16, write_wav_stereo16};
