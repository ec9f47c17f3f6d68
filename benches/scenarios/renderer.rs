//! Benchmarks for mixing a busy bar through the master bus.

use std::collections::VecDeque;
use std::hint::black_box;

use bullfrog_drums::engine::{TriggerEvent, TriggerSource};
use bullfrog_drums::io::FrameClock;
use bullfrog_drums::render::{Hit, HitBuilder, MasterVolume, Renderer};
use bullfrog_drums::{ToneParams, Voice};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn trigger(voice: Voice) -> TriggerEvent {
    TriggerEvent {
        voice,
        step: Some(0),
        time: 0.0,
        repeat: 0,
        level: 0.8,
        accent: 1.0,
        compensation: 1.0,
        slot: 0,
        tone: ToneParams {
            decay: 4.0,
            ..ToneParams::default()
        },
        source: TriggerSource::Internal,
    }
}

pub fn bench_renderer(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/renderer");
    let builder = HitBuilder::new(SAMPLE_RATE, 3);

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // all seven voices sounding at once, twice over
        let mut renderer: Renderer<VecDeque<Hit>> =
            Renderer::new(VecDeque::new(), FrameClock::new(SAMPLE_RATE as f64), MasterVolume::default(), 64);
        for voice in Voice::ALL.into_iter().chain(Voice::ALL) {
            if let Some(hit) = builder.build(&trigger(voice)) {
                renderer.receiver_mut().push_back(hit);
            }
        }

        group.bench_with_input(BenchmarkId::new("fourteen_hits", size), &size, |b, _| {
            b.iter(|| {
                renderer.render(black_box(&mut left), black_box(&mut right));
            })
        });
    }

    group.finish();
}
