//! Benchmarks for the full per-hit tone chain (drive, 4-stage cascade, peak).

use std::hint::black_box;

use bullfrog_drums::graph::node::{GraphNode, RenderCtx};
use bullfrog_drums::graph::tone_chain::ToneChainNode;
use bullfrog_drums::tone::{ChainSettings, ToneParams};
use bullfrog_drums::Voice;
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_tone_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/tone_chain");
    let ctx = RenderCtx::new(SAMPLE_RATE);

    let mut driven = ToneParams::default();
    driven.drive = 0.7;
    driven.resonance = 12.0;

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| ((i as f32) * 0.07).sin() * 0.5).collect();

        for (name, tone) in [("default", ToneParams::default()), ("driven", driven)] {
            let mut chain = ToneChainNode::new(&ChainSettings::new(Voice::Snare, &tone, SAMPLE_RATE));
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    chain.render_block(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }
    }

    group.finish();
}
