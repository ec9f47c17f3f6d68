use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use thiserror::Error;
use tracing::{debug, warn};

/// Identifies one outstanding fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchTicket(pub u64);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no fetcher available for {0}")]
    Unavailable(PathBuf),
}

/// Result of one fetch, delivered back to the engine.
#[derive(Debug)]
pub struct FetchCompletion {
    pub ticket: FetchTicket,
    pub result: Result<Vec<u8>, FetchError>,
}

/// Reply handle given to a fetcher.
///
/// Dropping it without responding leaves the sample waiting. Every fetcher
/// answers exactly once; the first answer for a ticket is the one kept.
#[derive(Debug, Clone)]
pub struct FetchResponder {
    ticket: FetchTicket,
    tx: Sender<FetchCompletion>,
}

impl FetchResponder {
    pub fn new(ticket: FetchTicket, tx: Sender<FetchCompletion>) -> Self {
        Self { ticket, tx }
    }

    pub fn ticket(&self) -> FetchTicket {
        self.ticket
    }

    pub fn respond(self, result: Result<Vec<u8>, FetchError>) {
        let completion = FetchCompletion {
            ticket: self.ticket,
            result,
        };
        // the engine may already be gone
        if self.tx.send(completion).is_err() {
            debug!(ticket = self.ticket.0, "fetch completed after engine shutdown");
        }
    }
}

/// Reads path-backed sample bytes without blocking the caller.
pub trait SampleFetcher: Send {
    fn fetch(&self, path: &Path, responder: FetchResponder);
}

/// Reads files on a short-lived thread per request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFetcher;

impl SampleFetcher for FileFetcher {
    fn fetch(&self, path: &Path, responder: FetchResponder) {
        let owned = path.to_path_buf();
        let worker = responder.clone();
        let spawned = std::thread::Builder::new()
            .name("bullfrog-fetch".into())
            .spawn(move || {
                let result = std::fs::read(&owned).map_err(|source| FetchError::Io {
                    path: owned.clone(),
                    source,
                });
                worker.respond(result);
            });

        if let Err(source) = spawned {
            warn!(path = %path.display(), error = %source, "could not spawn fetch thread");
            responder.respond(Err(FetchError::Io {
                path: path.to_path_buf(),
                source,
            }));
        }
    }
}

/// Fetcher for hosts without file access. Every request fails immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFetcher;

impl SampleFetcher for NoFetcher {
    fn fetch(&self, path: &Path, responder: FetchResponder) {
        responder.respond(Err(FetchError::Unavailable(path.to_path_buf())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn file_fetcher_reads_bytes_off_thread() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"RIFF....WAVE").unwrap();

        let (tx, rx) = crossbeam_channel::unbounded();
        FileFetcher.fetch(file.path(), FetchResponder::new(FetchTicket(7), tx));

        let done = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(done.ticket, FetchTicket(7));
        assert_eq!(done.result.unwrap(), b"RIFF....WAVE");
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        FileFetcher.fetch(&dir.path().join("nope.wav"), FetchResponder::new(FetchTicket(1), tx));

        let done = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let err = done.result.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
        assert!(err.to_string().contains("nope.wav"));
    }

    #[test]
    fn no_fetcher_fails_synchronously() {
        let (tx, rx) = crossbeam_channel::unbounded();
        NoFetcher.fetch(Path::new("A/0.wav"), FetchResponder::new(FetchTicket(2), tx));
        let done = rx.try_recv().unwrap();
        assert!(matches!(done.result, Err(FetchError::Unavailable(_))));
    }
}
