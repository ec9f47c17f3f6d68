//! Abstract / FX voice.
//!
//! A falling square-wave zap with a layer of bright hiss. Its decay is
//! stretched (see `effective_decay`), so long decay settings turn it into a
//! drone.
//!
//! # How It Works
//!
//! 1. Square wave gliding 320 Hz → 90 Hz (times the pitch ratio) over 110 ms
//! 2. Noise band 2300-9000 Hz underneath at a quarter of the hit level
//! 3. The square carries 45% of the level and most of the decay

use crate::dsp::oscillator::Waveform;
use crate::graph::{extensions::NodeExt, node::GraphNode, noise::NoiseNode, oscillator::OscNode};
use crate::voices::{Strike, SYNTH_ATTACK};

/// Build an abstract/fx hit.
pub fn fx(strike: &Strike<'_>) -> impl GraphNode {
    let ratio = strike.ratio();
    let zap = OscNode::new(Waveform::Square, strike.sample_rate)
        .with_sweep(320.0 * ratio, 90.0 * ratio, 0.11)
        .with_envelope(strike.level * 0.45, SYNTH_ATTACK, (strike.decay * 0.9).max(0.11));

    let hiss = NoiseNode::new(strike.noise.clone(), strike.sample_rate)
        .with_rate(strike.noise_rate())
        .with_band(2_300.0, 9_000.0)
        .with_envelope(strike.level * 0.25, SYNTH_ATTACK, (strike.decay * 0.35).max(0.04));

    zap.layer(hiss)
}
