use std::io::Cursor;
use std::sync::Arc;

use hound::{SampleFormat, WavReader};
use tracing::{debug, warn};

use crate::wav::error::{DecodeError, WavError};
use crate::wav::metadata::{check_preamble, chunks, parse_wav_metadata};
use crate::wav::validate::{FORMAT_EXTENSIBLE, FORMAT_PCM};

/// A decoded, playable mono buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate: sample_rate.max(1),
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds.
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Turns container bytes into a playable buffer. May fail.
pub trait SampleDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer, DecodeError>;
}

/// Decoder backed by `hound`. Multichannel input is averaged to mono.
#[derive(Debug, Default, Clone, Copy)]
pub struct HoundDecoder;

impl SampleDecoder for HoundDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer, DecodeError> {
        let reader = WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
            SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|sample| sample.map(|s| s as f32 * scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let mono = downmix(&interleaved, channels);
        if mono.is_empty() {
            return Err(DecodeError::Empty);
        }
        Ok(SampleBuffer::new(mono, spec.sample_rate))
    }
}

fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    let gain = 1.0 / channels as f32;
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * gain)
        .collect()
}

/// Read the `data` chunk as signed 16-bit little-endian PCM.
///
/// Used when the native decoder rejects a file that still declares PCM16.
/// A truncated data chunk yields whatever whole frames are present.
pub fn decode_pcm16(bytes: &[u8]) -> Result<SampleBuffer, WavError> {
    check_preamble(bytes)?;
    let meta = parse_wav_metadata(bytes)?;
    let pcm = meta.audio_format == FORMAT_PCM || meta.audio_format == FORMAT_EXTENSIBLE;
    if !pcm || meta.bits_per_sample != 16 {
        return Err(WavError::UnsupportedEncoding {
            audio_format: meta.audio_format,
            bits_per_sample: meta.bits_per_sample,
        });
    }

    let data = chunks(bytes)
        .find(|chunk| &chunk.id == b"data")
        .ok_or(WavError::MissingData)?;

    let channels = meta.channels.max(1) as usize;
    let interleaved: Vec<f32> = data
        .data
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32_768.0)
        .collect();
    let whole = interleaved.len() - interleaved.len() % channels;
    let mono = downmix(&interleaved[..whole], channels);

    Ok(SampleBuffer::new(mono, meta.sample_rate))
}

/// Native decode, falling back to the manual PCM16 reader.
pub fn decode_with_fallback(decoder: &dyn SampleDecoder, bytes: &[u8]) -> Result<SampleBuffer, DecodeError> {
    match decoder.decode(bytes) {
        Ok(buffer) => Ok(buffer),
        Err(native) => {
            debug!(error = %native, "native decode failed, trying PCM16 fallback");
            match decode_pcm16(bytes) {
                Ok(buffer) if !buffer.is_empty() => Ok(buffer),
                Ok(_) => Err(DecodeError::Empty),
                Err(err) => {
                    warn!(native = %native, fallback = %err, "sample could not be decoded");
                    Err(DecodeError::Fallback(err))
                }
            }
        }
    }
}
