//! Kit files: the whole instrument state as one JSON document.
//!
//! ```json
//! {
//!   "format": "bullfrog-drums-web-kit-v2",
//!   "controls": { "tempo": 120, "volume": 0.84 },
//!   "voiceControls": [{ "pitch": 0, "decay": 0.36, ... }, ...],
//!   "trackLevels": [0.84, ...],
//!   "pattern": [[true, false, ...], ...],
//!   "voiceActiveSlots": [0, ...],
//!   "sampleBanks": [{ "voice": "A", "slot": 0, "name": "0.wav", "type": "audio/wav", "data": "<base64>" }]
//! }
//! ```
//!
//! Import is tolerant: anything missing keeps the engine's current value,
//! every number is clamped and snapped again, and pattern cells follow
//! loose truthiness (`1`, `"x"` and `true` are all hits). Older kits carry
//! one tone block in `controls` that applies to every voice, and a `samples`
//! list that fills slot 0.
//!
//! Bank entries need an exact voice letter (`"A"`..`"G"`) and a whole slot
//! number below 64. A sample whose payload is not valid base64 is skipped
//! with a warning and the rest of the kit still loads.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::bank::normalize_playback_slot;
use crate::engine::DrumEngine;
use crate::sequencing::Pattern;
use crate::tone::params::{ToneParam, ToneParams};
use crate::voices::Voice;
use crate::{SEQ_STEPS, SLOTS_PER_VOICE, VOICE_COUNT};

pub const KIT_FORMAT: &str = "bullfrog-drums-web-kit-v2";
const FORMAT_FAMILY: &str = "bullfrog-drums-web-kit";
const SAMPLE_TYPE: &str = "audio/wav";

#[derive(Debug, Error)]
pub enum KitError {
    #[error("kit is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sample {voice}{slot} has invalid base64 data: {source}")]
    Base64 {
        voice: char,
        slot: usize,
        #[source]
        source: base64::DecodeError,
    },

    #[error("unknown kit format \"{0}\"")]
    UnknownFormat(String),

    #[error("kit has no pattern")]
    MissingPattern,
}

/// One sample carried inside a kit.
#[derive(Debug, Clone, PartialEq)]
pub struct KitSample {
    pub voice: Voice,
    pub slot: usize,
    pub name: String,
    pub bytes: Vec<u8>,
}

/// A parsed kit, not yet applied. Absent values are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Kit {
    pub tempo: Option<f32>,
    pub volume: Option<f32>,
    /// Per voice, per [`ToneParam`] in declaration order.
    pub tones: [[Option<f32>; ToneParam::ALL.len()]; VOICE_COUNT],
    pub levels: [Option<f32>; VOICE_COUNT],
    pub pattern: Pattern,
    /// Playback slot per voice; `None` keeps the engine's current choice.
    pub active_slots: [Option<usize>; VOICE_COUNT],
    pub samples: Vec<KitSample>,
}

/// What an import changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KitSummary {
    pub samples: usize,
    /// Samples stored despite header issues.
    pub invalid: usize,
}

#[derive(Serialize)]
struct Controls {
    tempo: f32,
    volume: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SampleEntry {
    voice: String,
    slot: usize,
    name: String,
    #[serde(rename = "type")]
    mime: &'static str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KitFile {
    format: &'static str,
    controls: Controls,
    voice_controls: Vec<ToneParams>,
    track_levels: Vec<f32>,
    pattern: Vec<[bool; SEQ_STEPS]>,
    voice_active_slots: Vec<usize>,
    sample_banks: Vec<SampleEntry>,
}

impl Kit {
    /// Snapshot what the engine currently plays.
    pub fn capture(engine: &DrumEngine) -> Self {
        let samples = engine
            .samples()
            .iter()
            .filter_map(|(voice, slot, record)| {
                record.bytes().map(|bytes| KitSample {
                    voice,
                    slot,
                    name: record.name().to_string(),
                    bytes: bytes.to_vec(),
                })
            })
            .collect();

        Self {
            tempo: Some(engine.tempo()),
            volume: Some(engine.volume()),
            tones: Voice::ALL.map(|voice| {
                let tone = engine.tone(voice);
                ToneParam::ALL.map(|param| Some(tone.get(param)))
            }),
            levels: Voice::ALL.map(|voice| Some(engine.track_level(voice))),
            pattern: *engine.pattern(),
            active_slots: Voice::ALL.map(|voice| Some(engine.active_slot(voice))),
            samples,
        }
    }

    pub fn to_json(&self) -> Result<String, KitError> {
        let file = KitFile {
            format: KIT_FORMAT,
            controls: Controls {
                tempo: self.tempo.unwrap_or(crate::tone::params::TEMPO.default),
                volume: self.volume.unwrap_or(crate::tone::params::VOLUME.default),
            },
            voice_controls: self
                .tones
                .iter()
                .map(|values| {
                    let mut tone = ToneParams::default();
                    for (param, value) in ToneParam::ALL.into_iter().zip(values) {
                        if let Some(value) = value {
                            tone.set(param, *value);
                        }
                    }
                    tone
                })
                .collect(),
            track_levels: self
                .levels
                .iter()
                .map(|level| level.unwrap_or(crate::tone::params::TRACK_LEVEL.default))
                .collect(),
            pattern: self.pattern.rows().to_vec(),
            voice_active_slots: self.active_slots.iter().map(|slot| slot.unwrap_or(0)).collect(),
            sample_banks: self
                .samples
                .iter()
                .map(|sample| SampleEntry {
                    voice: sample.voice.letter().to_string(),
                    slot: sample.slot,
                    name: sample.name.clone(),
                    mime: SAMPLE_TYPE,
                    data: BASE64.encode(&sample.bytes),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Parse a kit document. Nothing about the engine changes here, so a
    /// kit that fails to parse leaves the instrument untouched.
    pub fn from_json(json: &str) -> Result<Self, KitError> {
        let root: Value = serde_json::from_str(json)?;
        let empty = Map::new();
        let root = root.as_object().unwrap_or(&empty);

        if let Some(format) = root.get("format").and_then(Value::as_str) {
            if !format.starts_with(FORMAT_FAMILY) {
                return Err(KitError::UnknownFormat(format.to_string()));
            }
        }

        let Some(rows) = root.get("pattern").and_then(Value::as_array) else {
            return Err(KitError::MissingPattern);
        };
        let rows: Vec<Vec<bool>> = rows
            .iter()
            .map(|row| row.as_array().map_or_else(Vec::new, |cells| cells.iter().map(truthy).collect()))
            .collect();

        let controls = root.get("controls").and_then(Value::as_object).unwrap_or(&empty);

        let tones = match root.get("voiceControls").and_then(Value::as_array) {
            Some(voices) => std::array::from_fn(|index| {
                let block = voices.get(index).and_then(Value::as_object).unwrap_or(&empty);
                tone_values(block)
            }),
            None => [tone_values(controls); VOICE_COUNT],
        };

        let levels = match root.get("trackLevels").and_then(Value::as_array) {
            Some(levels) => std::array::from_fn(|index| levels.get(index).and_then(finite)),
            None => [None; VOICE_COUNT],
        };

        let mut active_slots = match root.get("voiceActiveSlots").and_then(Value::as_array) {
            Some(slots) => std::array::from_fn(|index| slots.get(index).map(playback_slot)),
            None => [None; VOICE_COUNT],
        };

        let mut samples = Vec::new();
        if let Some(banks) = root.get("sampleBanks").and_then(Value::as_array) {
            for entry in banks.iter().filter_map(Value::as_object) {
                let voice = entry.get("voice").and_then(voice_of);
                let slot = entry.get("slot").and_then(bank_slot);
                match (voice, slot) {
                    (Some(voice), Some(slot)) => push_sample(&mut samples, entry, voice, slot),
                    _ => warn!(?voice, ?slot, "kit sample with unknown voice or slot skipped"),
                }
            }
        } else if let Some(legacy) = root.get("samples").and_then(Value::as_array) {
            for entry in legacy.iter().filter_map(Value::as_object) {
                let voice = entry
                    .get("track")
                    .and_then(Value::as_u64)
                    .filter(|&track| (track as usize) < VOICE_COUNT)
                    .map(|track| Voice::from_index(track as usize));
                match voice {
                    Some(voice) => push_sample(&mut samples, entry, voice, 0),
                    None => warn!("legacy kit sample with unknown track skipped"),
                }
            }
            // legacy kits play slot 0 unless they say otherwise
            if !root.contains_key("voiceActiveSlots") {
                active_slots = [Some(0); VOICE_COUNT];
            }
        }

        Ok(Self {
            tempo: controls.get("tempo").and_then(finite),
            volume: controls.get("volume").and_then(finite),
            tones,
            levels,
            pattern: Pattern::from_rows(rows),
            active_slots,
            samples,
        })
    }

    /// Load into the engine. The transport stops, automation is cleared and
    /// every sample bank is replaced by the kit's samples.
    pub fn apply(&self, engine: &mut DrumEngine) -> KitSummary {
        engine.stop();

        if let Some(tempo) = self.tempo {
            engine.set_tempo(tempo);
        }
        if let Some(volume) = self.volume {
            engine.set_volume(volume);
        }
        for voice in Voice::ALL {
            for (param, value) in ToneParam::ALL.into_iter().zip(self.tones[voice.index()]) {
                if let Some(value) = value {
                    engine.set_tone_param(voice, param, value);
                }
            }
            if let Some(level) = self.levels[voice.index()] {
                engine.set_track_level(voice, level);
            }
        }

        engine.replace_pattern(self.pattern);
        engine.clear_automation();

        engine.clear_samples();
        let mut summary = KitSummary::default();
        for sample in &self.samples {
            let report = engine.load_sample_bytes(sample.voice, sample.slot, sample.name.clone(), sample.bytes.clone());
            summary.samples += 1;
            if !report.is_ok() {
                summary.invalid += 1;
            }
        }
        for voice in Voice::ALL {
            if let Some(slot) = self.active_slots[voice.index()] {
                engine.assign_playback_slot(voice, slot);
            }
        }
        engine.select_track(Voice::Kick);

        info!(samples = summary.samples, invalid = summary.invalid, "kit loaded");
        summary
    }
}

pub fn export_kit(engine: &DrumEngine) -> Result<String, KitError> {
    let kit = Kit::capture(engine);
    let json = kit.to_json()?;
    info!(samples = kit.samples.len(), bytes = json.len(), "kit exported");
    Ok(json)
}

pub fn import_kit(engine: &mut DrumEngine, json: &str) -> Result<KitSummary, KitError> {
    Ok(Kit::from_json(json)?.apply(engine))
}

fn finite(value: &Value) -> Option<f32> {
    value.as_f64().filter(|v| v.is_finite()).map(|v| v as f32)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(on) => *on,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn tone_values(block: &Map<String, Value>) -> [Option<f32>; ToneParam::ALL.len()] {
    ToneParam::ALL.map(|param| block.get(param.id()).and_then(finite))
}

/// A voice given as its exact letter.
fn voice_of(value: &Value) -> Option<Voice> {
    let mut chars = value.as_str()?.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Voice::ALL.into_iter().find(|voice| voice.letter() == letter),
        _ => None,
    }
}

/// A number, or a string holding one.
fn numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// A bank slot must be a whole number inside the bank.
fn bank_slot(value: &Value) -> Option<usize> {
    numeric(value)
        .filter(|slot| slot.fract() == 0.0 && (0.0..SLOTS_PER_VOICE as f64).contains(slot))
        .map(|slot| slot as usize)
}

/// Playback slots round to the nearest core slot; junk means slot 0.
fn playback_slot(value: &Value) -> usize {
    let slot = numeric(value).map_or(0.0, f64::round);
    normalize_playback_slot(slot.max(0.0) as usize)
}

fn push_sample(samples: &mut Vec<KitSample>, entry: &Map<String, Value>, voice: Voice, slot: usize) {
    match decode_sample(entry, voice, slot) {
        Ok(Some(sample)) => samples.push(sample),
        Ok(None) => warn!(%voice, slot, "kit sample without data skipped"),
        Err(err) => warn!(%voice, slot, %err, "kit sample skipped"),
    }
}

fn decode_sample(entry: &Map<String, Value>, voice: Voice, slot: usize) -> Result<Option<KitSample>, KitError> {
    let Some(data) = entry.get("data").and_then(Value::as_str) else {
        return Ok(None);
    };
    // data URLs carry a "data:audio/wav;base64," prefix
    let data = data.rsplit_once(',').map_or(data, |(_, payload)| payload);
    let bytes = BASE64.decode(data.trim()).map_err(|source| KitError::Base64 {
        voice: voice.letter(),
        slot,
        source,
    })?;
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .map_or_else(|| format!("{slot}.wav"), str::to_string);
    Ok(Some(KitSample {
        voice,
        slot,
        name,
        bytes,
    }))
}
