//! Benchmarks for the lookup-table waveshaper.

use std::hint::black_box;

use bullfrog_drums::dsp::distortion::DriveCurve;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_drive(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/drive");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| ((i as f32) * 0.03).sin() * 1.2).collect();

        for amount in [0.08_f32, 0.6] {
            let curve = DriveCurve::new(amount);
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("amount_{amount}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        curve.render(black_box(&mut buffer));
                    })
                },
            );
        }
    }

    group.finish();
}
