//! Composable building blocks for constructing audio-processing graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with what a drum hit
//! needs: one-shot sources, per-hit envelopes and block-based rendering.
//! The `extensions` module adds fluent helpers so voice recipes read as a
//! clear, chainable expression.

/// Fluent combinators (`.through()`, `.layer()`, `.boxed()`).
pub mod extensions;
/// Summing two sources into one.
pub mod mix;
/// Core traits shared by all graph nodes.
pub mod node;
/// Filtered noise bursts.
pub mod noise;
/// Enveloped oscillators with pitch glides.
pub mod oscillator;
/// Sample playback with loop-point start and zero-crossing snap.
pub mod sampler;
/// Serial chaining of two nodes (source → effect).
pub mod through;
/// The per-hit filter and drive chain.
pub mod tone_chain;
