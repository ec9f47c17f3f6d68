//! Per-voice tone controls and how they map onto the signal chain.

/// Knob-to-filter/drive/pan mapping.
pub mod chain;
/// Tone knobs, ranges and the clamp/snap dispatch table.
pub mod params;

pub use chain::ChainSettings;
pub use params::{ParamSpec, ToneParam, ToneParams};
