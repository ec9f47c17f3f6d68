//! RIFF/WAVE header parsing, strict pack-format validation and decoding.
//!
//! Parsing and validation never fail hard: a sample that breaks the rules is
//! still stored, it just carries its issues with it. Decoding tries the
//! native decoder first and falls back to reading the PCM16 `data` chunk
//! directly.

pub mod decode;
pub mod error;
pub mod metadata;
pub mod validate;

pub use decode::{decode_pcm16, decode_with_fallback, HoundDecoder, SampleBuffer, SampleDecoder};
pub use error::{DecodeError, WavError};
pub use metadata::{parse_wav_metadata, WavMetadata};
pub use validate::{validate_wav_metadata, ValidationReport};
