use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series: the source renders into the block,
then the processor transforms that block in place.

  Source renders:     [0.5, 0.8, -0.3, 0.9, ...]
  Processor (chain):  [0.4, 0.6, -0.2, 0.7, ...]

Every hit is built this way. Whatever the source is (sample player or
synth recipe), it is boxed and sent through that voice's tone chain:

  source.through(ToneChainNode::new(&settings))

so sampled and synthesized hits on the same voice share the same colour.

Signal Flow:
------------
  Through: [Source] ──→ [Processor] ──→ output
  Layer:   [A] ──┬──→ (+) ──→ output
           [B] ──┘
*/

pub struct Through<S, F> {
    source: S,
    processor: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, processor: F) -> Self {
        Self { source, processor }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.processor.render_block(out, ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active() || self.processor.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::Waveform;
    use crate::graph::{extensions::NodeExt, oscillator::OscNode};

    struct Halve;

    impl GraphNode for Halve {
        fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
            for sample in out.iter_mut() {
                *sample *= 0.5;
            }
        }

        fn is_active(&self) -> bool {
            false
        }
    }

    #[test]
    fn renders_source_then_processor() {
        let ctx = RenderCtx::new(48_000.0);
        let mut plain = OscNode::new(Waveform::Square, 48_000.0).with_frequency(100.0);
        let mut halved = OscNode::new(Waveform::Square, 48_000.0)
            .with_frequency(100.0)
            .through(Halve);

        let mut a = vec![0.0; 128];
        let mut b = vec![0.0; 128];
        plain.render_block(&mut a, &ctx);
        halved.render_block(&mut b, &ctx);

        for (x, y) in a.iter().zip(&b) {
            assert!((x * 0.5 - y).abs() < 1e-6);
        }
    }

    #[test]
    fn follows_source_activity() {
        let ctx = RenderCtx::new(48_000.0);
        let mut node = OscNode::new(Waveform::Sine, 48_000.0)
            .with_envelope(1.0, 0.0, 0.001)
            .through(Halve);

        assert!(node.is_active());
        let mut buffer = vec![0.0; 256];
        node.render_block(&mut buffer, &ctx);
        assert!(!node.is_active(), "chain should end with its source");
    }
}
