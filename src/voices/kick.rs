//! Kick drum voice.
//!
//! A sine body whose pitch drops fast from a click-like start to a deep
//! fundamental, the classic electronic kick.
//!
//! # How It Works
//!
//! 1. Sine oscillator provides the body
//! 2. Pitch glides exponentially 145 Hz → 43 Hz (times the pitch ratio)
//!    over at most 220 ms, shorter for short decays
//! 3. Amplitude decays over at least 120 ms, stretching with the decay knob
//!
//! # Variations
//!
//! - Longer decay = boomy 808-style kick
//! - Pitch knob up = tighter, punchier kick

use crate::dsp::oscillator::Waveform;
use crate::graph::{node::GraphNode, oscillator::OscNode};
use crate::voices::{Strike, SYNTH_ATTACK};

/// Build a kick hit.
pub fn kick(strike: &Strike<'_>) -> impl GraphNode {
    let ratio = strike.ratio();
    OscNode::new(Waveform::Sine, strike.sample_rate)
        .with_sweep(145.0 * ratio, 43.0 * ratio, (strike.decay * 0.8).min(0.22))
        .with_envelope(strike.level, SYNTH_ATTACK, (strike.decay * 1.1).max(0.12))
}
