use crate::wav::error::WavError;

/// Smallest container that can hold a RIFF header, a fmt chunk and a data header.
pub const MIN_WAV_LEN: usize = 44;

/// `fmt ` fields the validator cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavMetadata {
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

/// A chunk located inside a RIFF body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Chunk<'a> {
    pub id: [u8; 4],
    /// Declared size, which may run past the end of a truncated file.
    pub declared_size: usize,
    /// Bytes actually present.
    pub data: &'a [u8],
}

/// Walk the chunks after the 12-byte RIFF/WAVE preamble.
///
/// Odd-sized chunks carry one pad byte. Iteration stops at the first header
/// that does not fit.
pub(crate) fn chunks(bytes: &[u8]) -> impl Iterator<Item = Chunk<'_>> {
    let mut offset = 12usize;
    std::iter::from_fn(move || {
        let header = bytes.get(offset..offset.checked_add(8)?)?;
        let id = [header[0], header[1], header[2], header[3]];
        let declared_size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
        let data_start = offset + 8;
        let data_end = data_start.saturating_add(declared_size).min(bytes.len());
        let chunk = Chunk {
            id,
            declared_size,
            data: &bytes[data_start..data_end],
        };
        offset = data_start
            .saturating_add(declared_size)
            .saturating_add(declared_size % 2);
        Some(chunk)
    })
}

pub(crate) fn check_preamble(bytes: &[u8]) -> Result<(), WavError> {
    if bytes.len() < MIN_WAV_LEN {
        return Err(WavError::TooShort);
    }
    if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(WavError::NotRiffWave);
    }
    Ok(())
}

fn read_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn read_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

/// Read the format fields of a RIFF/WAVE container.
pub fn parse_wav_metadata(bytes: &[u8]) -> Result<WavMetadata, WavError> {
    check_preamble(bytes)?;

    chunks(bytes)
        .find(|chunk| &chunk.id == b"fmt " && chunk.declared_size >= 16 && chunk.data.len() >= 16)
        .map(|fmt| WavMetadata {
            audio_format: read_u16(fmt.data, 0),
            channels: read_u16(fmt.data, 2),
            sample_rate: read_u32(fmt.data, 4),
            bits_per_sample: read_u16(fmt.data, 14),
        })
        .ok_or(WavError::MissingFmt)
}
