use crate::wav::{error::WavError, metadata::WavMetadata};
use crate::REQUIRED_SAMPLE_RATE;

pub const FORMAT_PCM: u16 = 1;
pub const FORMAT_EXTENSIBLE: u16 = 65534;
pub const REQUIRED_CHANNELS: u16 = 1;
pub const REQUIRED_BITS: u16 = 16;

/// Outcome of checking a sample against the pack format (mono, 48 kHz, 16-bit PCM).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub metadata: Option<WavMetadata>,
    pub issues: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues joined the way they are shown next to a slot.
    pub fn summary(&self) -> String {
        self.issues.join("; ")
    }
}

/// One issue per violated constraint. A header that could not be parsed
/// yields its parse failure as the only issue.
pub fn validate_wav_metadata(parsed: &Result<WavMetadata, WavError>) -> ValidationReport {
    let meta = match parsed {
        Ok(meta) => *meta,
        Err(err) => {
            return ValidationReport {
                metadata: None,
                issues: vec![err.to_string()],
            }
        }
    };

    let mut issues = Vec::new();
    if meta.audio_format != FORMAT_PCM && meta.audio_format != FORMAT_EXTENSIBLE {
        issues.push(format!("unsupported WAV format {}", meta.audio_format));
    }
    if meta.channels != REQUIRED_CHANNELS {
        issues.push(format!("channels {} (must be mono)", meta.channels));
    }
    if meta.sample_rate != REQUIRED_SAMPLE_RATE {
        issues.push(format!(
            "sample rate {}Hz (must be {}Hz)",
            meta.sample_rate, REQUIRED_SAMPLE_RATE
        ));
    }
    if meta.bits_per_sample != REQUIRED_BITS {
        issues.push(format!("bit depth {} (must be 16-bit)", meta.bits_per_sample));
    }

    ValidationReport {
        metadata: Some(meta),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(audio_format: u16, channels: u16, sample_rate: u32, bits_per_sample: u16) -> Result<WavMetadata, WavError> {
        Ok(WavMetadata {
            audio_format,
            channels,
            sample_rate,
            bits_per_sample,
        })
    }

    #[test]
    fn compliant_header_has_no_issues() {
        assert!(validate_wav_metadata(&meta(1, 1, 48_000, 16)).is_ok());
        assert!(validate_wav_metadata(&meta(65534, 1, 48_000, 16)).is_ok());
    }

    #[test]
    fn stereo_is_flagged_by_channel_count() {
        let report = validate_wav_metadata(&meta(1, 2, 48_000, 16));
        assert_eq!(report.issues, vec!["channels 2 (must be mono)".to_string()]);
    }

    #[test]
    fn every_violation_gets_its_own_issue() {
        let report = validate_wav_metadata(&meta(3, 2, 44_100, 32));
        assert_eq!(
            report.issues,
            vec![
                "unsupported WAV format 3",
                "channels 2 (must be mono)",
                "sample rate 44100Hz (must be 48000Hz)",
                "bit depth 32 (must be 16-bit)",
            ]
        );
        assert!(report.summary().contains("; "));
    }

    #[test]
    fn parse_failure_becomes_single_issue() {
        let report = validate_wav_metadata(&Err(WavError::MissingFmt));
        assert_eq!(report.issues, vec!["missing fmt chunk".to_string()]);
        assert!(report.metadata.is_none());
    }
}
