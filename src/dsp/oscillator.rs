#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f32::consts::TAU;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
}

/// Naive phase-accumulator oscillator. Drum bodies are short and filtered
/// afterwards, so no band-limiting is applied.
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let value = match self.waveform {
            Waveform::Sine => (self.phase * TAU).sin(),
            Waveform::Triangle => 1.0 - 4.0 * (self.phase - 0.5).abs(),
            Waveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };

        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();
        value
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Exponential glide between two positive values, then hold at the target.
///
/// value(t) = from * (to / from) ^ (t / T)
#[derive(Debug, Clone, Copy)]
pub struct ExpRamp {
    from: f32,
    to: f32,
    frames: u32,
    position: u32,
}

impl ExpRamp {
    pub fn new(from: f32, to: f32, seconds: f32, sample_rate: f32) -> Self {
        let frames = (seconds.max(0.0) * sample_rate).round() as u32;
        Self {
            from: from.max(f32::MIN_POSITIVE),
            to: to.max(f32::MIN_POSITIVE),
            frames,
            position: 0,
        }
    }

    /// A ramp that never moves.
    pub fn hold(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            frames: 0,
            position: 0,
        }
    }

    #[inline]
    pub fn next_value(&mut self) -> f32 {
        if self.position >= self.frames {
            return self.to;
        }
        let t = self.position as f32 / self.frames as f32;
        self.position += 1;
        self.from * (self.to / self.from).powf(t)
    }
}
