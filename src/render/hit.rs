use std::path::Path;

use tracing::{debug, warn};

use crate::dsp::noise::NoiseTable;
use crate::dsp::pan::StereoGains;
use crate::engine::{TriggerEvent, TriggerSource};
use crate::graph::extensions::NodeExt;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::graph::sampler::SampleNode;
use crate::graph::through::Through;
use crate::graph::tone_chain::ToneChainNode;
use crate::tone::chain::{effective_decay, ChainSettings};
use crate::voices::{internal_voice, Strike, Voice};
use crate::wav::{decode_with_fallback, HoundDecoder, SampleBuffer};

/// One sounding (or about to sound) trigger: a source, its tone chain and
/// where it lands on the stereo bus.
pub struct Hit {
    voice: Voice,
    start_frame: u64,
    node: Through<Box<dyn GraphNode>, ToneChainNode>,
    pan: StereoGains,
    started: bool,
}

impl Hit {
    pub fn new(voice: Voice, start_frame: u64, source: Box<dyn GraphNode>, settings: &ChainSettings) -> Self {
        Self {
            voice,
            start_frame,
            node: source.through(ToneChainNode::new(settings)),
            pan: settings.pan,
            started: false,
        }
    }

    pub fn voice(&self) -> Voice {
        self.voice
    }

    pub fn start_frame(&self) -> u64 {
        self.start_frame
    }

    /// Finished once it has started and its source ran out.
    pub fn is_finished(&self) -> bool {
        self.started && !self.node.is_active()
    }

    /// Add this hit's share of the block starting at `block_start` into
    /// `left`/`right`. `scratch` must be at least as long as the block.
    pub fn mix_into(
        &mut self,
        block_start: u64,
        left: &mut [f32],
        right: &mut [f32],
        scratch: &mut [f32],
        ctx: &RenderCtx,
    ) {
        let frames = left.len().min(right.len());
        let block_end = block_start + frames as u64;
        if self.start_frame >= block_end {
            return;
        }

        // late hits start at the top of the block
        let offset = self.start_frame.saturating_sub(block_start) as usize;
        let out = &mut scratch[..frames - offset];
        self.node.render_block(out, ctx);
        self.started = true;

        for ((l, r), sample) in left[offset..frames]
            .iter_mut()
            .zip(&mut right[offset..frames])
            .zip(out.iter())
        {
            *l += sample * self.pan.left;
            *r += sample * self.pan.right;
        }
    }
}

/// Turns scheduled trigger events into renderable hits.
pub struct HitBuilder {
    sample_rate: f32,
    noise: NoiseTable,
}

impl HitBuilder {
    pub fn new(sample_rate: f32, noise_seed: u64) -> Self {
        Self {
            sample_rate,
            noise: NoiseTable::generate(sample_rate, noise_seed),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// `None` for triggers that are meant to be silent.
    pub fn build(&self, event: &TriggerEvent) -> Option<Hit> {
        let source = match &event.source {
            TriggerSource::Silence => return None,
            TriggerSource::Internal => self.synth(event),
            TriggerSource::Sample(buffer) => self.sampler(event, buffer.clone()),
            TriggerSource::ExternalPath(path) => match read_external(path) {
                Some(buffer) => self.sampler(event, buffer),
                None => self.synth(event),
            },
        };

        let start_frame = (event.time.max(0.0) * self.sample_rate as f64).round() as u64;
        let settings = ChainSettings::new(event.voice, &event.tone, self.sample_rate);
        Some(Hit::new(event.voice, start_frame, source, &settings))
    }

    fn synth(&self, event: &TriggerEvent) -> Box<dyn GraphNode> {
        let strike = Strike::new(&event.tone, event.level, self.sample_rate, &self.noise, event.voice);
        internal_voice(event.voice, &strike)
    }

    fn sampler(&self, event: &TriggerEvent, buffer: SampleBuffer) -> Box<dyn GraphNode> {
        Box::new(SampleNode::new(
            buffer,
            event.tone.loop_point,
            effective_decay(event.voice, event.tone.decay),
            event.tone.pitch_ratio(),
            event.level,
            self.sample_rate,
        ))
    }
}

/// Direct read for auditioning a sample whose fetch has not landed yet.
fn read_external(path: &Path) -> Option<SampleBuffer> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "audition read failed, using synth");
            return None;
        }
    };
    match decode_with_fallback(&HoundDecoder, &bytes) {
        Ok(buffer) => {
            debug!(path = %path.display(), frames = buffer.len(), "auditioning by path");
            Some(buffer)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "audition decode failed, using synth");
            None
        }
    }
}
