//! Step ranges and per-voice trigger settings.
//!
//! Two ranges decide whether a hit can sound. The global [`SequenceRange`]
//! sets the loop length for everything. Each voice's [`VoiceTransport`]
//! narrows that further to its own window. A hit plays only when its step
//! is inside both.

use crate::tone::params::{ACCENT, PROBABILITY};
use crate::SEQ_STEPS;

pub const MAX_RATCHET: u8 = 4;

const LAST: usize = SEQ_STEPS - 1;

/// Global loop bounds, 0-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceRange {
    start: usize,
    end: usize,
}

impl Default for SequenceRange {
    fn default() -> Self {
        Self { start: 0, end: LAST }
    }
}

impl SequenceRange {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of the last step as shown to the user, `end + 1`.
    pub fn last_step(&self) -> usize {
        self.end + 1
    }

    pub fn contains(&self, step: usize) -> bool {
        (self.start..=self.end).contains(&step)
    }

    /// 1-based, clamped to 1..16 and never past the end.
    pub fn set_start(&mut self, number: i64) {
        self.start = one_based(number).min(self.end);
    }

    /// 1-based, clamped to 1..16 and never before the start.
    pub fn set_end(&mut self, number: i64) {
        self.end = one_based(number).max(self.start);
    }
}

fn one_based(number: i64) -> usize {
    (number.clamp(1, SEQ_STEPS as i64) - 1) as usize
}

/// How one voice fires: its step window and the trigger modifiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceTransport {
    start: usize,
    end: usize,
    probability: f32,
    ratchet: u8,
    accent: f32,
}

impl Default for VoiceTransport {
    fn default() -> Self {
        Self {
            start: 0,
            end: LAST,
            probability: PROBABILITY.default,
            ratchet: 1,
            accent: ACCENT.default,
        }
    }
}

impl VoiceTransport {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn probability(&self) -> f32 {
        self.probability
    }

    pub fn ratchet(&self) -> u8 {
        self.ratchet
    }

    pub fn accent(&self) -> f32 {
        self.accent
    }

    pub fn contains(&self, step: usize) -> bool {
        (self.start..=self.end).contains(&step)
    }

    /// Both ends clamp to 0..15. An end before the start is raised to it.
    pub fn set_window(&mut self, start: i64, end: i64) {
        self.start = clamp_step(start);
        self.end = clamp_step(end).max(self.start);
    }

    pub fn set_start(&mut self, start: i64) {
        self.start = clamp_step(start).min(self.end);
    }

    pub fn set_end(&mut self, end: i64) {
        self.end = clamp_step(end).max(self.start);
    }

    pub fn set_probability(&mut self, probability: f32) -> f32 {
        self.probability = PROBABILITY.clamp_snap(probability);
        self.probability
    }

    pub fn set_ratchet(&mut self, repeats: i64) -> u8 {
        self.ratchet = repeats.clamp(1, MAX_RATCHET as i64) as u8;
        self.ratchet
    }

    pub fn set_accent(&mut self, accent: f32) -> f32 {
        self.accent = ACCENT.clamp_snap(accent);
        self.accent
    }
}

fn clamp_step(step: i64) -> usize {
    step.clamp(0, LAST as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_stays_ordered_in_any_call_order() {
        let mut transport = VoiceTransport::default();
        transport.set_window(12, 3);
        assert_eq!((transport.start(), transport.end()), (12, 12));

        transport.set_start(-5);
        assert_eq!(transport.start(), 0);
        transport.set_end(99);
        assert_eq!(transport.end(), 15);

        transport.set_end(4);
        transport.set_start(9);
        assert_eq!((transport.start(), transport.end()), (4, 4));
    }

    #[test]
    fn modifiers_are_clamped() {
        let mut transport = VoiceTransport::default();
        assert_eq!(transport.set_ratchet(0), 1);
        assert_eq!(transport.set_ratchet(9), 4);
        assert_eq!(transport.set_probability(1.7), 1.0);
        assert_eq!(transport.set_accent(-0.5), 0.0);
        assert_eq!(transport.set_probability(f32::NAN), 1.0, "non-finite falls back to default");
    }

    #[test]
    fn sequence_range_uses_one_based_numbers() {
        let mut range = SequenceRange::default();
        range.set_end(8);
        assert_eq!(range.end(), 7);
        assert_eq!(range.last_step(), 8);

        range.set_start(12);
        assert_eq!(range.start(), 7, "start cannot pass the end");

        range.set_start(0);
        range.set_end(40);
        assert_eq!((range.start(), range.end()), (0, 15));

        range.set_start(5);
        range.set_end(2);
        assert_eq!((range.start(), range.end()), (4, 4));
        assert!(range.contains(4));
        assert!(!range.contains(5));
    }
}
