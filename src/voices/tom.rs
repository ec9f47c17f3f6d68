//! Tom / percussion voice.
//!
//! A pitched drum: triangle body with a short downward pitch blip, so it
//! reads as a struck skin rather than a beep.
//!
//! # How It Works
//!
//! 1. Triangle oscillator at 260 Hz (times the pitch ratio)
//! 2. Starts 35% sharp and settles within 50 ms (or 40% of the decay)
//! 3. Amplitude at 58% of the hit level, decay at least 80 ms
//!
//! # Variations
//!
//! - Pitch knob down an octave = floor tom
//! - Short decay = woodblock-like percussion

use crate::dsp::oscillator::Waveform;
use crate::graph::{node::GraphNode, oscillator::OscNode};
use crate::voices::{Strike, SYNTH_ATTACK};

pub(crate) const TOM_BASE_HZ: f32 = 260.0;

/// Build a tom hit.
pub fn tom(strike: &Strike<'_>) -> impl GraphNode {
    pitched_perc(strike, TOM_BASE_HZ, 0.58)
}

/// Swept triangle shared by the tom and the cymbal bell.
pub(crate) fn pitched_perc(strike: &Strike<'_>, base_hz: f32, gain: f32) -> OscNode {
    let base = base_hz * strike.ratio();
    OscNode::new(Waveform::Triangle, strike.sample_rate)
        .with_sweep(base * 1.35, base, (strike.decay * 0.4).min(0.05))
        .with_envelope(strike.level * gain, SYNTH_ATTACK, (strike.decay * 0.72).max(0.08))
}
