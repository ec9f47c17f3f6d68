use crate::dsp::{
    envelope::PercEnvelope,
    oscillator::{ExpRamp, Oscillator, Waveform},
};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Swept Oscillator
================

The tonal part of a drum hit: an oscillator whose pitch glides
exponentially from a start frequency to a resting one, gated by a
percussive envelope.

  freq  145 ┐╲
            │ ╲__
     43     │    ╲________________
            └──────────────────────→ t
             sweep

  amp   lvl ┐╱╲
            │  ╲__
            │     ╲____
            └──────────────────────→ t
             A  D

Waveform choice per recipe:
  Sine      kick body (clean sub)
  Triangle  tom, snare shell, cymbal ping (soft odd harmonics)
  Square    fx/abstract zaps (hollow, buzzy)

Example:
  OscNode::new(Waveform::Sine, sr)
      .with_sweep(145.0, 43.0, 0.22)
      .with_envelope(level, 0.002, 0.4)
*/

pub struct OscNode {
    osc: Oscillator,
    frequency: ExpRamp,
    envelope: PercEnvelope,
    sample_rate: f32,
}

impl OscNode {
    pub fn new(waveform: Waveform, sample_rate: f32) -> Self {
        Self {
            osc: Oscillator::new(waveform),
            frequency: ExpRamp::hold(440.0),
            envelope: PercEnvelope::new(1.0, 0.002, 0.3, sample_rate),
            sample_rate,
        }
    }

    /// Fixed pitch for the whole hit.
    pub fn with_frequency(mut self, hz: f32) -> Self {
        self.frequency = ExpRamp::hold(hz);
        self
    }

    /// Exponential glide from `start` to `end` over `seconds`, then hold.
    pub fn with_sweep(mut self, start: f32, end: f32, seconds: f32) -> Self {
        self.frequency = ExpRamp::new(start, end, seconds, self.sample_rate);
        self
    }

    pub fn with_envelope(mut self, peak: f32, attack: f32, decay: f32) -> Self {
        self.envelope = PercEnvelope::new(peak, attack, decay, self.sample_rate);
        self
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            if self.envelope.is_finished() {
                *sample = 0.0;
                continue;
            }
            let freq = self.frequency.next_value();
            *sample = self.osc.next_sample(freq, ctx.sample_rate) * self.envelope.next_level();
        }
    }

    fn is_active(&self) -> bool {
        !self.envelope.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_crossings(buffer: &[f32]) -> usize {
        buffer
            .windows(2)
            .filter(|w| (w[0] < 0.0) != (w[1] < 0.0))
            .count()
    }

    #[test]
    fn sweep_lowers_pitch_over_time() {
        let sr = 48_000.0;
        let ctx = RenderCtx::new(sr);
        let mut node = OscNode::new(Waveform::Sine, sr)
            .with_sweep(800.0, 100.0, 0.05)
            .with_envelope(1.0, 0.0, 1.0);

        let mut early = vec![0.0; 960];
        let mut skip = vec![0.0; 2400];
        let mut late = vec![0.0; 960];
        node.render_block(&mut early, &ctx);
        node.render_block(&mut skip, &ctx);
        node.render_block(&mut late, &ctx);

        assert!(
            zero_crossings(&early) > zero_crossings(&late) * 2,
            "start of hit should oscillate faster than the tail"
        );
    }

    #[test]
    fn goes_silent_when_envelope_ends() {
        let sr = 48_000.0;
        let ctx = RenderCtx::new(sr);
        let mut node = OscNode::new(Waveform::Triangle, sr)
            .with_frequency(260.0)
            .with_envelope(0.5, 0.002, 0.01);

        let mut buffer = vec![0.0; 1024];
        node.render_block(&mut buffer, &ctx);

        assert!(!node.is_active());
        assert!(buffer[600..].iter().all(|&s| s == 0.0));
        assert!(buffer[..200].iter().any(|&s| s.abs() > 0.1));
    }
}
