#![allow(dead_code)]

use std::path::Path;

use bullfrog_drums::io::ManualClock;
use bullfrog_drums::{DrumEngine, EngineConfig};

/// Engine on a hand-driven clock with an empty pattern.
pub fn quiet_engine(seed: u64) -> (DrumEngine, ManualClock) {
    let clock = ManualClock::new();
    let mut engine = DrumEngine::new(EngineConfig::default().with_seed(seed), clock.clone());
    engine.clear_pattern();
    (engine, clock)
}

/// A short decaying tone, as 16-bit PCM.
pub fn tone_samples(frames: usize) -> Vec<i16> {
    (0..frames)
        .map(|i| {
            let t = i as f32 / 48_000.0;
            let env = (-t * 20.0).exp();
            ((t * 220.0 * std::f32::consts::TAU).sin() * env * 20_000.0) as i16
        })
        .collect()
}

/// Write a 16-bit WAV with `hound`, interleaving `channels` copies.
pub fn write_wav(path: &Path, channels: u16, sample_rate: u32, samples: &[i16]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &sample in samples {
        for _ in 0..channels {
            writer.write_sample(sample).unwrap();
        }
    }
    writer.finalize().unwrap();
}

/// The same file as bytes.
pub fn wav_bytes(channels: u16, sample_rate: u32, samples: &[i16]) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("s.wav");
    write_wav(&path, channels, sample_rate, samples);
    std::fs::read(path).unwrap()
}
