//! Low-level DSP primitives used by the graph nodes.
//!
//! These blocks only do the signal math. Anything that allocates (drive
//! tables, noise) is built when a hit is created, never inside a render call.

/// Lookup-table waveshaper and master soft clip.
pub mod distortion;
/// Attack plus exponential-decay amplitude envelope.
pub mod envelope;
/// State-variable filter with low-pass, high-pass and peaking responses.
pub mod filter;
/// Shared white-noise table.
pub mod noise;
/// Phase-accumulator oscillators and exponential glides.
pub mod oscillator;
/// Equal-power stereo pan law.
pub mod pan;

pub use envelope::ENVELOPE_FLOOR;
