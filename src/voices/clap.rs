//! Clap voice.
//!
//! A hand clap is several hands hitting almost together. Three noise bursts
//! a few milliseconds apart give the smeared "clack-clack-CLAP" attack.
//!
//! # How It Works
//!
//! 1. Three bursts of 900-6800 Hz noise at 0, 12 and 27 ms
//! 2. The first two at 60% of the hit level, the last one at 90%
//! 3. Each burst decays over at least 40 ms (0.42 of the decay)

use crate::graph::{extensions::NodeExt, node::GraphNode, noise::NoiseNode};
use crate::voices::{Strike, SYNTH_ATTACK};

const BURST_OFFSETS: [f32; 3] = [0.0, 0.012, 0.027];
const BURST_LEVELS: [f32; 3] = [0.6, 0.6, 0.9];

fn burst(strike: &Strike<'_>, index: usize) -> NoiseNode {
    NoiseNode::new(strike.noise.clone(), strike.sample_rate)
        .with_rate(strike.noise_rate())
        .with_band(900.0, 6_800.0)
        .with_envelope(
            strike.level * BURST_LEVELS[index],
            SYNTH_ATTACK,
            (strike.decay * 0.42).max(0.04),
        )
        .starting_after(BURST_OFFSETS[index])
}

/// Build a clap hit.
pub fn clap(strike: &Strike<'_>) -> impl GraphNode {
    burst(strike, 0).layer(burst(strike, 1)).layer(burst(strike, 2))
}
