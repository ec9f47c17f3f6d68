//! Benchmarks for the synthesized fallback voices.

use std::hint::black_box;

use bullfrog_drums::dsp::noise::NoiseTable;
use bullfrog_drums::graph::node::{GraphNode, RenderCtx};
use bullfrog_drums::voices::{internal_voice, Strike};
use bullfrog_drums::{ToneParams, Voice};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let ctx = RenderCtx::new(SAMPLE_RATE);
    let noise = NoiseTable::generate(SAMPLE_RATE, 7);
    let tone = ToneParams {
        decay: 4.0,
        ..ToneParams::default()
    };

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for voice in Voice::ALL {
            // long decay keeps the recipe busy for the whole measurement
            let strike = Strike::new(&tone, 0.8, SAMPLE_RATE, &noise, voice);
            let mut node = internal_voice(voice, &strike);
            group.bench_with_input(BenchmarkId::new(voice.name(), size), &size, |b, _| {
                b.iter(|| {
                    node.render_block(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }
    }

    group.finish();
}
