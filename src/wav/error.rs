/// Reasons a RIFF/WAVE header cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WavError {
    #[error("file too short")]
    TooShort,

    #[error("not a RIFF/WAVE file")]
    NotRiffWave,

    #[error("missing fmt chunk")]
    MissingFmt,

    #[error("missing data chunk")]
    MissingData,

    #[error("unsupported encoding: format {audio_format}, {bits_per_sample}-bit")]
    UnsupportedEncoding {
        audio_format: u16,
        bits_per_sample: u16,
    },
}

/// Both decode paths failed for a sample.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("native decode failed: {0}")]
    Native(#[from] hound::Error),

    #[error("fallback PCM16 decode failed: {0}")]
    Fallback(#[from] WavError),

    #[error("decoded buffer is empty")]
    Empty,
}
