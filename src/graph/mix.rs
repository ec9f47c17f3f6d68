use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Parallel Layering
=================

Layer sums two sources at full level. Drum recipes stack independent parts
that each carry their own envelope and level:

  snare = noise rattle (level × 0.85)  +  triangle body (level × 0.26)
  fx    = square sweep (level × 0.45)  +  noise hiss    (level × 0.25)

Unlike a wet/dry crossfade there is no balance knob: each part is already
scaled by its recipe, so the layer just adds them.

How it works:
1. Render A into the output block
2. Render B into a scratch block
3. out += B

Blocks longer than the scratch buffer are processed in MAX_BLOCK_SIZE chunks.
*/

pub struct Layer<A, B> {
    pub source_a: A,
    pub source_b: B,
    temp_buffer: Vec<f32>,
}

impl<A, B> Layer<A, B> {
    pub fn new(source_a: A, source_b: B) -> Self {
        Layer {
            source_a,
            source_b,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<A: GraphNode, B: GraphNode> GraphNode for Layer<A, B> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.source_a.render_block(chunk, ctx);

            let frames = &mut self.temp_buffer[..chunk.len()];
            frames.fill(0.0);
            self.source_b.render_block(frames, ctx);

            for (o, b) in chunk.iter_mut().zip(frames.iter()) {
                *o += *b;
            }
        }
    }

    fn is_active(&self) -> bool {
        self.source_a.is_active() || self.source_b.is_active()
    }
}
