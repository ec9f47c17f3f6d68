//! Knob-to-DSP mapping for the per-voice tone chain.
//!
//! The chain for every hit is:
//!
//! ```text
//! input gain → pre-drive → LP ×4 (cascade) → peaking → post-drive → pan → master
//! ```
//!
//! This module turns a voice's [`ToneParams`] into the concrete corner
//! frequencies, Qs, shaper amounts and pan gains for that chain. The graph
//! node that runs it lives in [`crate::graph::tone_chain`].

use crate::dsp::pan::{equal_power, StereoGains};
use crate::tone::params::{ToneParam, ToneParams};
use crate::voices::Voice;

pub const CUTOFF_WARP: f32 = 2.05;
pub const MAPPED_CUTOFF_MIN: f32 = 38.0;
pub const MAPPED_CUTOFF_MAX: f32 = 12_600.0;

pub const RESONANCE_WARP: f32 = 1.28;
pub const LADDER_Q_MAX: f32 = 18.0;

pub const DRIVE_WARP: f32 = 1.8;

pub const CASCADE_CUTOFF_SCALE: [f32; 4] = [1.3, 1.08, 0.9, 0.72];
pub const CASCADE_Q_WEIGHT: [f32; 4] = [0.18, 0.30, 0.52, 0.84];
pub const STAGE_Q_MIN: f32 = 0.1;
pub const STAGE_Q_MAX: f32 = 28.0;
const STAGE_Q_BASE: f32 = 0.5;

pub const PEAK_CENTER_SCALE: f32 = 0.92;
pub const PEAK_GAIN_MIN_DB: f32 = -8.0;
pub const PEAK_GAIN_MAX_DB: f32 = 6.0;

const PRE_DRIVE_BASE: f32 = 0.04;

/// Lowest mapped cutoff a voice may reach. Hats and cymbals never fully close.
pub fn cutoff_floor(voice: Voice) -> f32 {
    match voice {
        Voice::HiHat => 4_800.0,
        Voice::Cymbal => 4_200.0,
        _ => MAPPED_CUTOFF_MIN,
    }
}

/// Perceptually warped cutoff: normalise, raise to 2.05, map into 38..12600 Hz.
pub fn mapped_cutoff(voice: Voice, cutoff: f32) -> f32 {
    let spec = ToneParam::Cutoff.spec();
    let norm = ((cutoff - spec.min) / (spec.max - spec.min)).clamp(0.0, 1.0);
    let warped = norm.powf(CUTOFF_WARP);
    let hz = MAPPED_CUTOFF_MIN + warped * (MAPPED_CUTOFF_MAX - MAPPED_CUTOFF_MIN);
    hz.max(cutoff_floor(voice))
}

/// Resonance knob to "ladder Q" in [0, 18].
pub fn ladder_q(resonance: f32) -> f32 {
    let spec = ToneParam::Resonance.spec();
    let norm = ((resonance - spec.min) / (spec.max - spec.min)).clamp(0.0, 1.0);
    norm.powf(RESONANCE_WARP) * LADDER_Q_MAX
}

/// Drive knob on the musical curve, in [0, 1].
pub fn drive_amount(drive: f32) -> f32 {
    drive.clamp(0.0, 1.0).powf(DRIVE_WARP)
}

/// Decay time the envelope actually uses.
///
/// The abstract voice stretches its decay for drones and textures.
pub fn effective_decay(voice: Voice, decay: f32) -> f32 {
    match voice {
        Voice::Abstract => (decay * 1.8).clamp(0.2, 8.0),
        _ => decay.max(0.04),
    }
}

/// One low-pass stage of the cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeStage {
    pub cutoff_hz: f32,
    pub q: f32,
}

/// Everything the tone chain needs for one hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainSettings {
    pub input_gain: f32,
    pub pre_drive: f32,
    pub cascade: [CascadeStage; 4],
    pub peak_hz: f32,
    pub peak_q: f32,
    pub peak_gain_db: f32,
    pub post_drive: f32,
    pub pan: StereoGains,
}

impl ChainSettings {
    pub fn new(voice: Voice, tone: &ToneParams, sample_rate: f32) -> Self {
        let cutoff = mapped_cutoff(voice, tone.cutoff);
        let q = ladder_q(tone.resonance);
        let q_norm = q / LADDER_Q_MAX;
        let drive = drive_amount(tone.drive);
        let ceiling = sample_rate * 0.45;

        let cascade = std::array::from_fn(|i| CascadeStage {
            cutoff_hz: (cutoff * CASCADE_CUTOFF_SCALE[i]).clamp(20.0, ceiling),
            q: (STAGE_Q_BASE + q * CASCADE_Q_WEIGHT[i]).clamp(STAGE_Q_MIN, STAGE_Q_MAX),
        });

        Self {
            input_gain: 1.0 / (1.0 + drive * 0.35),
            pre_drive: (PRE_DRIVE_BASE + q_norm * 0.06 + drive * 0.12).min(1.0),
            cascade,
            peak_hz: (cutoff * PEAK_CENTER_SCALE).clamp(20.0, ceiling),
            peak_q: (0.7 + q * 0.35).clamp(STAGE_Q_MIN, STAGE_Q_MAX),
            peak_gain_db: PEAK_GAIN_MIN_DB + (PEAK_GAIN_MAX_DB - PEAK_GAIN_MIN_DB) * q_norm,
            post_drive: drive * 0.88,
            pan: equal_power(tone.pan),
        }
    }
}
