use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::io::{FetchError, FetchTicket};
use crate::wav::{
    decode_with_fallback, parse_wav_metadata, validate_wav_metadata, SampleBuffer, SampleDecoder,
    ValidationReport, WavMetadata,
};

/// Progress of a path-backed sample's fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    InFlight(FetchTicket),
}

/// The playable form of a sample, if any.
///
/// Transitions only move forward:
///
/// ```text
/// ExternalPending{Idle} -> ExternalPending{InFlight} -> Decoded | Failed
/// RawPending                                         -> Decoded | Failed
/// ```
#[derive(Debug, Clone)]
pub enum SamplePayload {
    Decoded(SampleBuffer),
    RawPending(Arc<[u8]>),
    ExternalPending { path: PathBuf, fetch: FetchState },
    Failed(String),
}

/// What a trigger can do with a sample right now.
#[derive(Debug, Clone)]
pub enum Readiness {
    Ready(SampleBuffer),
    /// Decoding was just attempted and failed. This hit is silent.
    DecodeFailed,
    /// Path-backed and nothing requested yet. The caller should start a fetch.
    NeedsFetch(PathBuf),
    /// Path-backed with a fetch already under way.
    Fetching(PathBuf),
    Unavailable,
}

/// Fill state of a slot, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Empty,
    Ready,
    /// Raw bytes stored, decoded on first use.
    Pending,
    /// Path-backed, not fetched yet or fetch in flight.
    External,
    /// Stored, but its header breaks the pack format.
    Invalid,
    Failed,
}

#[derive(Debug, Clone)]
pub struct SampleRecord {
    name: String,
    source: Option<Arc<[u8]>>,
    report: ValidationReport,
    payload: SamplePayload,
}

impl SampleRecord {
    /// Wrap raw container bytes. The header is parsed and validated now,
    /// decoding waits until the sample is first played.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        let report = validate_wav_metadata(&parse_wav_metadata(&bytes));
        Self {
            name: name.into(),
            source: Some(bytes.clone()),
            report,
            payload: SamplePayload::RawPending(bytes),
        }
    }

    /// A sample that lives at `path` and is read on first use.
    pub fn external(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: None,
            report: ValidationReport {
                metadata: None,
                issues: Vec::new(),
            },
            payload: SamplePayload::ExternalPending {
                path: path.into(),
                fetch: FetchState::Idle,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Container bytes, once known.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.source.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.payload {
            SamplePayload::ExternalPending { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn metadata(&self) -> Option<WavMetadata> {
        self.report.metadata
    }

    pub fn issues(&self) -> &[String] {
        &self.report.issues
    }

    pub fn payload(&self) -> &SamplePayload {
        &self.payload
    }

    pub fn is_invalid(&self) -> bool {
        !self.report.is_ok()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.payload, SamplePayload::Failed(_))
    }

    /// Eligible for slot resolution: stored, compliant and not failed.
    pub fn is_playable(&self) -> bool {
        !self.is_invalid() && !self.is_failed()
    }

    pub fn status(&self) -> SlotStatus {
        match &self.payload {
            SamplePayload::Failed(_) => SlotStatus::Failed,
            _ if self.is_invalid() => SlotStatus::Invalid,
            SamplePayload::Decoded(_) => SlotStatus::Ready,
            SamplePayload::RawPending(_) => SlotStatus::Pending,
            SamplePayload::ExternalPending { .. } => SlotStatus::External,
        }
    }

    /// Advance the payload as far as can be done synchronously.
    ///
    /// Raw bytes are decoded here. A decode failure is permanent for this
    /// record.
    pub fn prepare(&mut self, decoder: &dyn SampleDecoder) -> Readiness {
        match &self.payload {
            SamplePayload::Decoded(buffer) => Readiness::Ready(buffer.clone()),
            SamplePayload::RawPending(bytes) => match decode_with_fallback(decoder, bytes) {
                Ok(buffer) => {
                    self.payload = SamplePayload::Decoded(buffer.clone());
                    Readiness::Ready(buffer)
                }
                Err(err) => {
                    self.payload = SamplePayload::Failed(err.to_string());
                    Readiness::DecodeFailed
                }
            },
            SamplePayload::ExternalPending { path, fetch } => match fetch {
                FetchState::Idle => Readiness::NeedsFetch(path.clone()),
                FetchState::InFlight(_) => Readiness::Fetching(path.clone()),
            },
            SamplePayload::Failed(_) => Readiness::Unavailable,
        }
    }

    /// Record that a fetch was issued. Only an idle external sample accepts it.
    pub fn mark_in_flight(&mut self, ticket: FetchTicket) -> bool {
        match &mut self.payload {
            SamplePayload::ExternalPending { fetch, .. } if *fetch == FetchState::Idle => {
                *fetch = FetchState::InFlight(ticket);
                true
            }
            _ => false,
        }
    }

    pub fn awaits(&self, ticket: FetchTicket) -> bool {
        matches!(
            self.payload,
            SamplePayload::ExternalPending {
                fetch: FetchState::InFlight(pending),
                ..
            } if pending == ticket
        )
    }

    /// Apply a finished fetch: validate, then decode straight away.
    pub fn finish_fetch(&mut self, result: Result<Vec<u8>, FetchError>, decoder: &dyn SampleDecoder) {
        match result {
            Ok(bytes) => {
                let bytes: Arc<[u8]> = bytes.into();
                self.report = validate_wav_metadata(&parse_wav_metadata(&bytes));
                self.payload = match decode_with_fallback(decoder, &bytes) {
                    Ok(buffer) => SamplePayload::Decoded(buffer),
                    Err(err) => SamplePayload::Failed(err.to_string()),
                };
                self.source = Some(bytes);
            }
            Err(err) => self.payload = SamplePayload::Failed(err.to_string()),
        }
    }
}
