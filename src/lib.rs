//! Seven-voice drum step sequencer engine.
//!
//! A [`DrumEngine`] owns a 16-step pattern, per-voice tone and trigger
//! settings, and a bank of up to 64 samples per voice. It schedules hits a
//! little ahead of an injected audio clock. The [`render`] layer turns those
//! hits into audio through the [`graph`] nodes, using a loaded sample where
//! one is playable and a synthesized fallback everywhere else.

pub mod bank; // Sample slots, packs and validation
pub mod config;
pub mod dsp;
pub mod engine; // Look-ahead scheduling and the engine context
pub mod graph; // Composable audio graph nodes
pub mod io;
#[cfg(feature = "serde")]
pub mod kit;
pub mod render;
pub mod sequencing; // Patterns, ranges and automation
pub mod tone;
pub mod voices;
pub mod wav;

pub use config::EngineConfig;
pub use engine::{DrumEngine, TransportState, TriggerEvent, TriggerSource};
pub use tone::{ToneParam, ToneParams};
pub use voices::Voice;

pub const MAX_BLOCK_SIZE: usize = 2048;

pub const SEQ_STEPS: usize = 16;
pub const VOICE_COUNT: usize = 7;
pub const PATTERN_BANKS: usize = 8;

pub const SLOTS_PER_VOICE: usize = 64;
/// Slots a voice plays from.
pub const CORE_SLOTS: usize = 10;
/// Slots reserved for factory content.
pub const FACTORY_SLOTS: usize = 20;

/// The only sample rate a pack sample may have.
pub const REQUIRED_SAMPLE_RATE: u32 = 48_000;
