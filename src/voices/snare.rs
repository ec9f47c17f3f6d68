//! Snare drum voice.
//!
//! A band-limited noise rattle over a short triangle "shell" tone. Real
//! snares buzz because of the wires under the bottom head; the noise layer
//! stands in for them.
//!
//! # How It Works
//!
//! 1. Noise, band-limited to 1700-6200 Hz, at 85% of the hit level
//! 2. Triangle at 190 Hz (times the pitch ratio) at 26% for the body
//! 3. The body outlasts the rattle a little (0.65 vs 0.5 of the decay)
//!
//! # Variations
//!
//! - Lower cutoff on the tone chain = fatter, older-sounding snare
//! - Longer decay = looser wires

use crate::dsp::oscillator::Waveform;
use crate::graph::{extensions::NodeExt, node::GraphNode, noise::NoiseNode, oscillator::OscNode};
use crate::voices::{Strike, SYNTH_ATTACK};

/// Build a snare hit.
pub fn snare(strike: &Strike<'_>) -> impl GraphNode {
    let rattle = NoiseNode::new(strike.noise.clone(), strike.sample_rate)
        .with_rate(strike.noise_rate())
        .with_band(1_700.0, 6_200.0)
        .with_envelope(strike.level * 0.85, SYNTH_ATTACK, (strike.decay * 0.5).max(0.05));

    let body = OscNode::new(Waveform::Triangle, strike.sample_rate)
        .with_frequency(190.0 * strike.ratio())
        .with_envelope(strike.level * 0.26, SYNTH_ATTACK, (strike.decay * 0.65).max(0.1));

    rattle.layer(body)
}
