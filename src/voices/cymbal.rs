//! Cymbal voice.
//!
//! A high triangle "bell" on top of a long, bright noise wash.
//!
//! # How It Works
//!
//! 1. Swept triangle at 520 Hz (the tom recipe an octave up) for the bell
//! 2. Noise band 6000-16000 Hz for the wash, ringing longer than the bell
//!
//! # Variations
//!
//! - Long decay = crash
//! - Short decay, lower pitch = ride ping

use crate::graph::{extensions::NodeExt, node::GraphNode, noise::NoiseNode};
use crate::voices::{tom::pitched_perc, Strike, SYNTH_ATTACK};

const BELL_HZ: f32 = 520.0;

/// Build a cymbal hit.
pub fn cymbal(strike: &Strike<'_>) -> impl GraphNode {
    let bell = pitched_perc(strike, BELL_HZ, 0.3);

    let wash = NoiseNode::new(strike.noise.clone(), strike.sample_rate)
        .with_rate(strike.noise_rate())
        .with_band(6_000.0, 16_000.0)
        .with_envelope(strike.level * 0.5, SYNTH_ATTACK, (strike.decay * 1.2).max(0.15));

    bell.layer(wash)
}
