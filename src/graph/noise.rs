use crate::dsp::{envelope::PercEnvelope, filter::SVFilter, noise::NoiseTable};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Noise Burst
===========

Snare rattle, claps and hats are all short slices of the shared white-noise
table, band-limited by a high-pass / low-pass pair and gated by a
percussive envelope.

  noise table ──→ HP(low corner) ──→ LP(high corner) ──→ × env ──→ out

Typical bands:
  snare   1700 – 6200 Hz
  clap     900 – 6800 Hz  (three bursts, staggered)
  hat     4500 – 14000 Hz
  fx hiss 2300 – 9000 Hz

A burst can start late (`starting_after`), which is how the clap builds its
triple transient out of three bursts in one hit. The read rate follows pitch
at half the oscillator sensitivity: rate = 2^(pitch / 24).
*/

pub struct NoiseNode {
    noise: NoiseTable,
    position: f64,
    rate: f64,
    highpass: SVFilter,
    lowpass: SVFilter,
    envelope: PercEnvelope,
    delay_frames: u32,
    sample_rate: f32,
}

impl NoiseNode {
    pub fn new(noise: NoiseTable, sample_rate: f32) -> Self {
        Self {
            noise,
            position: 0.0,
            rate: 1.0,
            highpass: SVFilter::highpass(20.0),
            lowpass: SVFilter::lowpass(sample_rate * 0.45),
            envelope: PercEnvelope::new(1.0, 0.002, 0.1, sample_rate),
            delay_frames: 0,
            sample_rate,
        }
    }

    pub fn with_band(mut self, low_hz: f32, high_hz: f32) -> Self {
        self.highpass = SVFilter::highpass(low_hz);
        self.lowpass = SVFilter::lowpass(high_hz);
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate.max(0.01) as f64;
        self
    }

    pub fn with_envelope(mut self, peak: f32, attack: f32, decay: f32) -> Self {
        self.envelope = PercEnvelope::new(peak, attack, decay, self.sample_rate);
        self
    }

    pub fn starting_after(mut self, seconds: f32) -> Self {
        self.delay_frames = (seconds.max(0.0) * self.sample_rate).round() as u32;
        self
    }
}

impl GraphNode for NoiseNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let waiting = (self.delay_frames as usize).min(out.len());
        out[..waiting].fill(0.0);
        self.delay_frames -= waiting as u32;

        let active = &mut out[waiting..];
        for sample in active.iter_mut() {
            *sample = self.noise.read(self.position);
            self.position += self.rate;
        }

        self.highpass.render(active, ctx.sample_rate);
        self.lowpass.render(active, ctx.sample_rate);
        self.envelope.apply(active);
    }

    fn is_active(&self) -> bool {
        self.delay_frames > 0 || !self.envelope.is_finished()
    }
}
