//! The seven drum voices and their built-in synthesis recipes.
//!
//! Every voice can always make a sound. When no usable sample is loaded for
//! a voice, the engine falls back to that voice's recipe here. The recipe
//! output then goes through the same tone chain a sample would, so filter,
//! drive and pan shape both the same way.
//!
//! # Example
//!
//! ```ignore
//! use bullfrog_drums::voices::{self, Strike, Voice};
//!
//! let strike = Strike::new(&tone, 0.84, 48_000.0, &noise, Voice::Snare);
//! let hit = voices::internal_voice(Voice::Snare, &strike);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::noise::NoiseTable;
use crate::graph::{extensions::NodeExt, node::GraphNode};
use crate::tone::{chain::effective_decay, params::ToneParams};
use crate::VOICE_COUNT;

mod clap;
mod cymbal;
mod fx;
mod hihat;
mod kick;
mod snare;
mod tom;

pub use clap::clap;
pub use cymbal::cymbal;
pub use fx::fx;
pub use hihat::hihat;
pub use kick::kick;
pub use snare::snare;
pub use tom::tom;

/// Attack used by every synthesized layer.
pub const SYNTH_ATTACK: f32 = 0.002;

/// One of the seven fixed percussion roles, in track order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Voice {
    Kick,
    Snare,
    Perc,
    Clap,
    Abstract,
    HiHat,
    Cymbal,
}

impl Voice {
    pub const ALL: [Voice; VOICE_COUNT] = [
        Voice::Kick,
        Voice::Snare,
        Voice::Perc,
        Voice::Clap,
        Voice::Abstract,
        Voice::HiHat,
        Voice::Cymbal,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Out-of-range indices clamp to the nearest voice.
    pub fn from_index(index: usize) -> Voice {
        Self::ALL[index.min(VOICE_COUNT - 1)]
    }

    /// Pack folder letter, `A` through `G`.
    pub fn letter(self) -> char {
        (b'A' + self as u8) as char
    }

    /// Case-insensitive. `H` (live recordings) and anything else is `None`.
    pub fn from_letter(letter: char) -> Option<Voice> {
        let upper = letter.to_ascii_uppercase();
        Self::ALL.into_iter().find(|voice| voice.letter() == upper)
    }

    pub fn name(self) -> &'static str {
        match self {
            Voice::Kick => "Kick",
            Voice::Snare => "Snare",
            Voice::Perc => "Toms/Perc",
            Voice::Clap => "Claps",
            Voice::Abstract => "Abstract",
            Voice::HiHat => "HiHat",
            Voice::Cymbal => "Cymbal",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Voice::Kick => "kick drum",
            Voice::Snare => "snare drum",
            Voice::Perc => "toms and percussions",
            Voice::Clap => "claps and noise-based samples",
            Voice::Abstract => "abstract sounds and drones",
            Voice::HiHat => "open and closed hi-hats",
            Voice::Cymbal => "crash and ride cymbals",
        }
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.letter(), self.name())
    }
}

/// Everything a recipe needs to build one hit.
pub struct Strike<'a> {
    pub tone: &'a ToneParams,
    /// Peak level after track level, accent and ratchet compensation.
    pub level: f32,
    /// Decay after the per-voice adjustment.
    pub decay: f32,
    pub sample_rate: f32,
    pub noise: &'a NoiseTable,
}

impl<'a> Strike<'a> {
    pub fn new(tone: &'a ToneParams, level: f32, sample_rate: f32, noise: &'a NoiseTable, voice: Voice) -> Self {
        Self {
            tone,
            level,
            decay: effective_decay(voice, tone.decay),
            sample_rate,
            noise,
        }
    }

    /// Oscillator pitch multiplier (semitones).
    pub fn ratio(&self) -> f32 {
        self.tone.pitch_ratio()
    }

    /// Noise read rate, half as sensitive to pitch as the oscillators.
    pub fn noise_rate(&self) -> f32 {
        2.0_f32.powf(self.tone.pitch / 24.0)
    }
}

/// Build the fallback sound for a voice.
pub fn internal_voice(voice: Voice, strike: &Strike<'_>) -> Box<dyn GraphNode> {
    match voice {
        Voice::Kick => kick(strike).boxed(),
        Voice::Snare => snare(strike).boxed(),
        Voice::Perc => tom(strike).boxed(),
        Voice::Clap => clap(strike).boxed(),
        Voice::Abstract => fx(strike).boxed(),
        Voice::HiHat => hihat(strike).boxed(),
        Voice::Cymbal => cymbal(strike).boxed(),
    }
}
