//! Whole-engine bounces, checked in the time and frequency domain.

mod common;

use bullfrog_drums::render::{bounce, OfflineSession, StereoBuffer};
use bullfrog_drums::{EngineConfig, ToneParam, Voice};
use common::wav_bytes;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

const FIRST_HIT: usize = 1_920;

fn session(seed: u64) -> OfflineSession {
    let mut session = OfflineSession::new(EngineConfig::default().with_seed(seed));
    session.engine_mut().clear_pattern();
    session
}

/// Share of spectral energy above `split_hz` in the first `n` frames of the hit.
fn high_band_share(audio: &StereoBuffer, split_hz: f32, n: usize) -> f32 {
    let mut buffer: Vec<Complex<f32>> = audio.left[FIRST_HIT..FIRST_HIT + n]
        .iter()
        .map(|&sample| Complex::new(sample, 0.0))
        .collect();
    FftPlanner::<f32>::new().plan_fft_forward(n).process(&mut buffer);

    let bin_hz = audio.sample_rate as f32 / n as f32;
    let mut total = 0.0;
    let mut high = 0.0;
    for (bin, value) in buffer.iter().take(n / 2).enumerate() {
        let energy = value.norm_sqr();
        total += energy;
        if bin as f32 * bin_hz >= split_hz {
            high += energy;
        }
    }
    high / total.max(f32::MIN_POSITIVE)
}

/// Frequency of the strongest bin in the first `n` frames of the hit.
fn dominant_hz(audio: &StereoBuffer, n: usize) -> f32 {
    let mut buffer: Vec<Complex<f32>> = audio.left[FIRST_HIT..FIRST_HIT + n]
        .iter()
        .map(|&sample| Complex::new(sample, 0.0))
        .collect();
    FftPlanner::<f32>::new().plan_fft_forward(n).process(&mut buffer);

    let peak = buffer
        .iter()
        .take(n / 2)
        .enumerate()
        .skip(1)
        .max_by(|a, b| a.1.norm_sqr().total_cmp(&b.1.norm_sqr()))
        .map_or(0, |(bin, _)| bin);
    peak as f32 * audio.sample_rate as f32 / n as f32
}

fn hihat_with_cutoff(cutoff: f32) -> StereoBuffer {
    let mut session = session(30);
    let engine = session.engine_mut();
    engine.set_hit(Voice::HiHat, 0, true);
    engine.set_tone_param(Voice::HiHat, ToneParam::Cutoff, cutoff);
    bounce(&mut session, 0.25)
}

#[test]
fn closing_the_filter_darkens_the_hihat() {
    let open = high_band_share(&hihat_with_cutoff(16_000.0), 4_000.0, 4_096);
    let closed = high_band_share(&hihat_with_cutoff(300.0), 4_000.0, 4_096);
    assert!(open > 0.2, "open hat share {open}");
    assert!(closed < open * 0.25, "closed {closed} vs open {open}");
}

#[test]
fn hard_left_pan_keeps_the_right_channel_quiet() {
    let mut session = session(31);
    let engine = session.engine_mut();
    engine.set_hit(Voice::Snare, 0, true);
    engine.set_tone_param(Voice::Snare, ToneParam::Pan, -1.0);
    let audio = bounce(&mut session, 0.25);

    let left: f32 = audio.left.iter().map(|s| s * s).sum();
    let right: f32 = audio.right.iter().map(|s| s * s).sum();
    assert!(left > 0.0);
    assert!(right < left * 0.01, "left {left} right {right}");
}

#[test]
fn zero_master_volume_is_silent() {
    let mut session = session(32);
    let engine = session.engine_mut();
    engine.set_hit(Voice::Kick, 0, true);
    engine.set_volume(0.0);
    assert_eq!(bounce(&mut session, 0.2).peak(), 0.0);
}

#[test]
fn a_loaded_sample_replaces_the_synth() {
    let kick = |sample: Option<Vec<u8>>| {
        let mut session = session(33);
        let engine = session.engine_mut();
        engine.set_hit(Voice::Kick, 0, true);
        engine.set_tone_param(Voice::Kick, ToneParam::Cutoff, 16_000.0);
        if let Some(bytes) = sample {
            engine.load_sample_bytes(Voice::Kick, 0, "0.wav", bytes);
        }
        bounce(&mut session, 0.25)
    };

    let synth = dominant_hz(&kick(None), 4_096);
    assert!(synth < 500.0, "synth kick peaks at {synth}Hz");

    let sine: Vec<i16> = (0..9_600)
        .map(|i| ((i as f32 * 3_000.0 / 48_000.0 * std::f32::consts::TAU).sin() * 16_000.0) as i16)
        .collect();
    let sampled = dominant_hz(&kick(Some(wav_bytes(1, 48_000, &sine))), 4_096);
    assert!((sampled - 3_000.0).abs() < 50.0, "sampled kick peaks at {sampled}Hz");
}

#[test]
fn output_never_exceeds_full_scale() {
    let mut session = session(34);
    let engine = session.engine_mut();
    for voice in Voice::ALL {
        for step in 0..16 {
            engine.set_hit(voice, step, true);
        }
        engine.set_voice_ratchet(voice, 4);
        engine.set_track_level(voice, 1.0);
        engine.set_tone_param(voice, ToneParam::Drive, 1.0);
    }
    engine.set_volume(1.0);

    let audio = bounce(&mut session, 1.0);
    assert!(audio.peak() > 0.5);
    assert!(audio.peak() <= 1.0);
}
