//! Hi-hat voice.
//!
//! A short burst of bright noise. The tone chain keeps its cutoff floor at
//! 4.8 kHz, so a hat can be darkened but never turned into a thud.
//!
//! # How It Works
//!
//! 1. Noise band-limited to 4500-14000 Hz
//! 2. 75% of the hit level
//! 3. Decay is 0.28 of the decay knob, at least 30 ms (closed hat); raise
//!    the knob for an open hat

use crate::graph::{node::GraphNode, noise::NoiseNode};
use crate::voices::{Strike, SYNTH_ATTACK};

/// Build a hi-hat hit.
pub fn hihat(strike: &Strike<'_>) -> impl GraphNode {
    NoiseNode::new(strike.noise.clone(), strike.sample_rate)
        .with_rate(strike.noise_rate())
        .with_band(4_500.0, 14_000.0)
        .with_envelope(strike.level * 0.75, SYNTH_ATTACK, (strike.decay * 0.28).max(0.03))
}
