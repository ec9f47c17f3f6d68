//! Benchmarks for the look-ahead catch-up pass.

use std::hint::black_box;

use bullfrog_drums::io::ManualClock;
use bullfrog_drums::{DrumEngine, EngineConfig, Voice};
use criterion::Criterion;

pub fn bench_scheduler(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/scheduler");

    // One tick on a full grid with ratchets everywhere
    group.bench_function("tick_busy", |b| {
        let clock = ManualClock::new();
        let mut engine = DrumEngine::new(EngineConfig::default().with_seed(1), clock.clone());
        for voice in Voice::ALL {
            for step in 0..16 {
                engine.set_hit(voice, step, true);
            }
            engine.set_voice_ratchet(voice, 4);
        }
        engine.start();
        b.iter(|| {
            clock.advance(0.025);
            black_box(engine.tick());
            black_box(engine.take_triggers());
        })
    });

    // A stalled host catching up on two seconds at once
    group.bench_function("catch_up_2s", |b| {
        b.iter(|| {
            let clock = ManualClock::new();
            let mut engine = DrumEngine::new(EngineConfig::default().with_seed(1), clock.clone());
            engine.start();
            clock.set(2.0);
            black_box(engine.tick());
            black_box(engine.take_triggers())
        })
    });

    group.finish();
}
