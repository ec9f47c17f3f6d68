#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Range, snap step and home value of a knob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

impl ParamSpec {
    pub const fn new(min: f32, max: f32, step: f32, default: f32) -> Self {
        Self {
            min,
            max,
            step,
            default,
        }
    }

    /// Clamp into range, then snap to the step grid.
    ///
    /// Non-finite input falls back to the default.
    pub fn clamp_snap(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.default;
        }
        let clamped = value.clamp(self.min, self.max);
        let scale = 1.0 / self.step;
        let snapped = (clamped * scale).round() / scale;
        // snapping can step just past a bound that isn't a multiple of `step`
        snapped.clamp(self.min, self.max)
    }
}

pub const TEMPO: ParamSpec = ParamSpec::new(70.0, 180.0, 1.0, 120.0);
pub const VOLUME: ParamSpec = ParamSpec::new(0.0, 1.0, 0.01, 0.84);
pub const TRACK_LEVEL: ParamSpec = ParamSpec::new(0.0, 1.0, 0.01, 0.84);
pub const PROBABILITY: ParamSpec = ParamSpec::new(0.0, 1.0, 0.01, 1.0);
pub const ACCENT: ParamSpec = ParamSpec::new(0.0, 1.0, 0.01, 0.35);

/// Per-voice tone knobs.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToneParam {
    Pitch,
    Decay,
    LoopPoint,
    Cutoff,
    Resonance,
    Drive,
    Pan,
}

const TONE_SPECS: [ParamSpec; 7] = [
    ParamSpec::new(-12.0, 12.0, 0.1, 0.0),
    ParamSpec::new(0.05, 4.8, 0.01, 0.36),
    ParamSpec::new(0.0, 0.95, 0.01, 0.0),
    ParamSpec::new(60.0, 16_000.0, 1.0, 6_200.0),
    ParamSpec::new(0.0, 24.0, 0.1, 1.5),
    ParamSpec::new(0.0, 1.0, 0.01, 0.08),
    ParamSpec::new(-1.0, 1.0, 0.01, 0.0),
];

impl ToneParam {
    pub const ALL: [ToneParam; 7] = [
        ToneParam::Pitch,
        ToneParam::Decay,
        ToneParam::LoopPoint,
        ToneParam::Cutoff,
        ToneParam::Resonance,
        ToneParam::Drive,
        ToneParam::Pan,
    ];

    pub fn spec(self) -> &'static ParamSpec {
        &TONE_SPECS[self as usize]
    }

    /// Identifier used in kit files.
    pub fn id(self) -> &'static str {
        match self {
            ToneParam::Pitch => "pitch",
            ToneParam::Decay => "decay",
            ToneParam::LoopPoint => "loopPoint",
            ToneParam::Cutoff => "cutoff",
            ToneParam::Resonance => "resonance",
            ToneParam::Drive => "drive",
            ToneParam::Pan => "pan",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|param| param.id() == id)
    }
}

/// The tone tuple one voice owns.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneParams {
    pub pitch: f32,
    pub decay: f32,
    pub loop_point: f32,
    pub cutoff: f32,
    pub resonance: f32,
    pub drive: f32,
    pub pan: f32,
}

impl Default for ToneParams {
    fn default() -> Self {
        Self {
            pitch: ToneParam::Pitch.spec().default,
            decay: ToneParam::Decay.spec().default,
            loop_point: ToneParam::LoopPoint.spec().default,
            cutoff: ToneParam::Cutoff.spec().default,
            resonance: ToneParam::Resonance.spec().default,
            drive: ToneParam::Drive.spec().default,
            pan: ToneParam::Pan.spec().default,
        }
    }
}

impl ToneParams {
    pub fn get(&self, param: ToneParam) -> f32 {
        match param {
            ToneParam::Pitch => self.pitch,
            ToneParam::Decay => self.decay,
            ToneParam::LoopPoint => self.loop_point,
            ToneParam::Cutoff => self.cutoff,
            ToneParam::Resonance => self.resonance,
            ToneParam::Drive => self.drive,
            ToneParam::Pan => self.pan,
        }
    }

    /// Store a clamped, snapped value and return what was stored.
    pub fn set(&mut self, param: ToneParam, value: f32) -> f32 {
        let value = param.spec().clamp_snap(value);
        let slot = match param {
            ToneParam::Pitch => &mut self.pitch,
            ToneParam::Decay => &mut self.decay,
            ToneParam::LoopPoint => &mut self.loop_point,
            ToneParam::Cutoff => &mut self.cutoff,
            ToneParam::Resonance => &mut self.resonance,
            ToneParam::Drive => &mut self.drive,
            ToneParam::Pan => &mut self.pan,
        };
        *slot = value;
        value
    }

    /// Every field clamped and snapped.
    pub fn sanitized(mut self) -> Self {
        for param in ToneParam::ALL {
            let value = self.get(param);
            self.set(param, value);
        }
        self
    }

    /// Playback-rate multiplier for the pitch knob (semitones).
    pub fn pitch_ratio(&self) -> f32 {
        2.0_f32.powf(self.pitch / 12.0)
    }
}
