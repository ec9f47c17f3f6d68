use crate::dsp::{distortion::DriveCurve, filter::SVFilter, ENVELOPE_FLOOR};
use crate::graph::node::{GraphNode, RenderCtx};
use crate::tone::chain::ChainSettings;

/*
Voice Tone Chain
================

The in-place processor every hit runs through:

  in ──→ (× input gain) ──→ [pre-drive] ──→ [LP 1.3fc] ──→ [LP 1.08fc]
     ──→ [LP 0.9fc] ──→ [LP 0.72fc] ──→ [peak 0.92fc] ──→ [post-drive] ──→ out

Four gentle 12dB stages with staggered corners and rising Q stack into a
steep, ladder-like rolloff without any single stage needing a dangerous Q.
The peaking stage then adds (or at low resonance, scoops) energy just under
the cutoff.

The pre-drive is always slightly on, so even a clean voice gets a little
grit going into the filters. Pan is not applied here: the renderer spreads
the mono result onto the stereo bus with the gains in `ChainSettings::pan`.

A resonant cascade keeps ringing after its source stops, so the chain stays
active while its last block still moves. Movement is measured against the
block's final sample: the asymmetric drive leaves a small constant offset on
silent input, and a settled offset is not a tail.
*/

pub struct ToneChainNode {
    input_gain: f32,
    pre_drive: DriveCurve,
    cascade: [SVFilter; 4],
    peak: SVFilter,
    post_drive: DriveCurve,
    tail: f32,
}

impl ToneChainNode {
    pub fn new(settings: &ChainSettings) -> Self {
        Self {
            input_gain: settings.input_gain,
            pre_drive: DriveCurve::new(settings.pre_drive),
            cascade: settings
                .cascade
                .map(|stage| SVFilter::lowpass(stage.cutoff_hz).with_q(stage.q)),
            peak: SVFilter::peaking(settings.peak_hz, settings.peak_q, settings.peak_gain_db),
            post_drive: DriveCurve::new(settings.post_drive),
            tail: 0.0,
        }
    }
}

impl GraphNode for ToneChainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if self.input_gain != 1.0 {
            for sample in out.iter_mut() {
                *sample *= self.input_gain;
            }
        }
        self.pre_drive.render(out);
        for stage in &mut self.cascade {
            stage.render(out, ctx.sample_rate);
        }
        self.peak.render(out, ctx.sample_rate);
        self.post_drive.render(out);

        if let Some(&settled) = out.last() {
            self.tail = out.iter().fold(0.0, |swing: f32, s| swing.max((s - settled).abs()));
        }
    }

    fn is_active(&self) -> bool {
        self.tail > ENVELOPE_FLOOR
    }
}
