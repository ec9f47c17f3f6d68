//! Whether a voice fires on a step, and how loud each repeat is.
//!
//! # How It Works
//!
//! A voice is skipped when the step has no hit, the voice is muted, the
//! step lies outside the voice's window, or a uniform draw in `[0, 1)` lands
//! above the voice's probability. Otherwise it fires `repeats` times,
//! evenly spaced across the step:
//!
//! ```text
//! repeats      = max(1, ratchet)
//! spacing      = step_duration / repeats
//! accent       = 1 + accent_amount * 0.35   on steps 0, 4, 8, 12
//! compensation = 1 / sqrt(repeats)
//! level        = track_level * accent * compensation
//! ```
//!
//! Hits quieter than [`MIN_AUDIBLE_LEVEL`] are dropped.

use crate::sequencing::VoiceTransport;

pub const ACCENT_DEPTH: f32 = 0.35;
pub const ACCENT_EVERY: usize = 4;
pub const MIN_AUDIBLE_LEVEL: f32 = 0.001;

pub fn accent_scale(step: usize, accent_amount: f32) -> f32 {
    if step % ACCENT_EVERY == 0 {
        1.0 + accent_amount * ACCENT_DEPTH
    } else {
        1.0
    }
}

pub fn repeat_compensation(repeats: u8) -> f32 {
    1.0 / (repeats.max(1) as f32).sqrt()
}

/// Everything about a voice that decides whether it fires on a step.
#[derive(Debug, Clone, Copy)]
pub struct VoiceGate<'a> {
    pub hit: bool,
    pub muted: bool,
    pub transport: &'a VoiceTransport,
}

impl VoiceGate<'_> {
    /// Everything except the probability draw.
    pub fn eligible(&self, step: usize) -> bool {
        self.hit && !self.muted && self.transport.contains(step)
    }

    /// `draw` is uniform in `[0, 1)`. A draw equal to the probability passes.
    pub fn passes(&self, draw: f32) -> bool {
        draw <= self.transport.probability()
    }

    pub fn fires(&self, step: usize, draw: f32) -> bool {
        self.eligible(step) && self.passes(draw)
    }
}

/// The repeats one firing voice produces on one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepeatPlan {
    pub repeats: u8,
    pub spacing: f64,
    pub accent: f32,
    pub compensation: f32,
    pub level: f32,
}

impl RepeatPlan {
    pub fn new(step: usize, step_duration: f64, transport: &VoiceTransport, track_level: f32) -> Self {
        let repeats = transport.ratchet().max(1);
        let accent = accent_scale(step, transport.accent());
        let compensation = repeat_compensation(repeats);
        Self {
            repeats,
            spacing: step_duration / repeats as f64,
            accent,
            compensation,
            level: track_level * accent * compensation,
        }
    }

    pub fn is_audible(&self) -> bool {
        self.level > MIN_AUDIBLE_LEVEL
    }

    /// Absolute start time of each repeat.
    pub fn times(&self, step_time: f64) -> impl Iterator<Item = (u8, f64)> + '_ {
        (0..self.repeats).map(move |repeat| (repeat, step_time + repeat as f64 * self.spacing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_lands_on_quarter_notes() {
        assert!((accent_scale(0, 0.35) - 1.1225).abs() < 1e-6);
        assert!((accent_scale(8, 1.0) - 1.35).abs() < 1e-6);
        assert_eq!(accent_scale(3, 1.0), 1.0);
    }

    #[test]
    fn gate_checks_every_condition() {
        let mut transport = VoiceTransport::default();
        transport.set_window(2, 10);
        transport.set_probability(0.5);

        let gate = VoiceGate {
            hit: true,
            muted: false,
            transport: &transport,
        };
        assert!(gate.fires(4, 0.2));
        assert!(gate.fires(4, 0.5), "boundary draw still fires");
        assert!(!gate.fires(4, 0.7));
        assert!(!gate.fires(1, 0.0), "before the window");
        assert!(!gate.fires(11, 0.0), "after the window");
        assert!(!VoiceGate { muted: true, ..gate }.fires(4, 0.0));
        assert!(!VoiceGate { hit: false, ..gate }.fires(4, 0.0));
    }

    #[test]
    fn ratchet_of_four_at_120() {
        let mut transport = VoiceTransport::default();
        transport.set_ratchet(4);
        transport.set_accent(0.0);
        let plan = RepeatPlan::new(0, 0.125, &transport, 1.0);

        assert_eq!(plan.repeats, 4);
        assert!((plan.spacing - 0.03125).abs() < 1e-12);
        assert!((plan.compensation - 0.5).abs() < 1e-6);
        let times: Vec<_> = plan.times(2.0).map(|(_, t)| t).collect();
        assert_eq!(times, vec![2.0, 2.03125, 2.0625, 2.09375]);
    }

    #[test]
    fn silent_track_is_not_audible() {
        let transport = VoiceTransport::default();
        assert!(!RepeatPlan::new(1, 0.125, &transport, 0.0).is_audible());
        assert!(RepeatPlan::new(1, 0.125, &transport, 0.5).is_audible());
    }
}
