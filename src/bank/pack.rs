//! A-G folder packs.
//!
//! A pack is a directory with one folder per voice letter, each holding
//! numbered WAV files:
//!
//! ```text
//! pack/
//!   A/0.wav A/1.wav ... A/9.wav
//!   B/0.wav ...
//!   ...
//!   G/0.wav ...
//! ```
//!
//! The file stem is the slot (0..63). Folder `H` is reserved for live
//! recordings and is skipped with a note. Hidden files are ignored outright.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::bank::slots::SampleBank;
use crate::voices::Voice;
use crate::{CORE_SLOTS, SLOTS_PER_VOICE};

#[derive(Debug, Error)]
pub enum PackError {
    #[error("failed to read pack directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One file that will be loaded into a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackEntry {
    pub voice: Voice,
    pub slot: usize,
    pub relative_path: String,
    pub path: PathBuf,
}

/// Files accepted from a pack plus the reasons others were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackPlan {
    pub entries: Vec<PackEntry>,
    pub issues: Vec<String>,
}

/// Where a relative pack path lands.
///
/// `Ok(None)` means the path is silently ignored (hidden files, files not
/// inside any folder). `Err` carries the user-facing skip reason.
pub fn parse_pack_path(relative_path: &str) -> Result<Option<(Voice, usize)>, String> {
    let normalized = relative_path.replace('\\', "/");
    let parts: Vec<&str> = normalized.split('/').filter(|p| !p.is_empty()).collect();
    let [.., folder, filename] = parts.as_slice() else {
        return Ok(None);
    };

    if filename.starts_with('.') {
        return Ok(None);
    }

    let skipped = |reason: &str| Err(format!("{normalized} skipped ({reason})."));

    let folder = folder.to_ascii_uppercase();
    if folder == "H" {
        return skipped("H is reserved for live-recorded samples");
    }
    let voice = match folder.chars().collect::<Vec<_>>().as_slice() {
        [letter] => Voice::from_letter(*letter),
        _ => None,
    };
    let Some(voice) = voice else {
        return skipped("unknown folder, expected A-G");
    };

    if !filename.to_ascii_lowercase().ends_with(".wav") {
        return skipped("must be .wav");
    }

    let stem = file_stem(filename);
    if !is_numeric(stem) {
        return skipped("filename must be numeric");
    }

    match stem.parse::<usize>() {
        Ok(slot) if slot < SLOTS_PER_VOICE => Ok(Some((voice, slot))),
        _ => skipped("slot must be 0..63"),
    }
}

/// Name with its last extension removed.
fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() => &name[..dot],
        _ => name,
    }
}

fn is_numeric(stem: &str) -> bool {
    !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit())
}

/// Map relative paths under `root` to slots. A later file for the same
/// slot replaces an earlier one.
pub fn plan_pack<I, S>(root: &Path, relative_paths: I) -> PackPlan
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut mapped = BTreeMap::new();
    let mut issues = Vec::new();

    for relative in relative_paths {
        let relative = relative.as_ref();
        match parse_pack_path(relative) {
            Ok(Some((voice, slot))) => {
                mapped.insert(
                    (voice, slot),
                    PackEntry {
                        voice,
                        slot,
                        relative_path: relative.replace('\\', "/"),
                        path: root.join(relative),
                    },
                );
            }
            Ok(None) => {}
            Err(issue) => issues.push(issue),
        }
    }

    PackPlan {
        entries: mapped.into_values().collect(),
        issues,
    }
}

/// Walk `root` and plan every file found beneath it.
pub fn scan_pack_dir(root: &Path) -> Result<PackPlan, PackError> {
    let mut relative = Vec::new();
    collect_files(root, root, &mut relative)?;
    relative.sort();
    debug!(root = %root.display(), files = relative.len(), "scanned pack directory");
    Ok(plan_pack(root, relative))
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<(), PackError> {
    let io_err = |source| PackError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if entry.file_type().map_err(io_err)?.is_dir() {
            collect_files(root, &path, out)?;
        } else if let Ok(relative) = path.strip_prefix(root) {
            out.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(())
}

/// Findings from checking a loaded bank against the pack rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackReport {
    pub issues: Vec<String>,
}

impl PackReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Every voice needs all ten core slots filled, every stored sample needs a
/// numeric name and a compliant header.
pub fn validate_pack(bank: &SampleBank) -> PackReport {
    let mut issues = Vec::new();

    for voice in Voice::ALL {
        let letter = voice.letter();
        let core = bank.stored_below(voice, CORE_SLOTS);
        if core < CORE_SLOTS {
            issues.push(format!(
                "{letter}: slots 0-9 have {core}/{CORE_SLOTS} (need {CORE_SLOTS})."
            ));
        }

        for (_, slot, record) in bank.iter().filter(|(v, _, _)| *v == voice) {
            if !is_numeric(file_stem(record.name())) {
                issues.push(format!(
                    "{letter}{slot}: filename \"{}\" is not numeric.",
                    record.name()
                ));
            }
            if record.is_invalid() {
                issues.push(format!("{letter}{slot}: {}.", record.report().summary()));
            }
        }
    }

    PackReport { issues }
}
