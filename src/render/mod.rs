//! Turning trigger events into sound.
//!
//! # How It Works
//!
//! ```text
//!  control side                         audio side
//!  ────────────                         ──────────
//!  DrumEngine::tick ─→ TriggerEvent
//!        HitBuilder ─→ Hit ──(rtrb)──→ Renderer ─→ stereo bus ─→ limiter
//!                                          │
//!  DrumEngine::now ◀──── FrameClock ◀──────┘ (frames rendered)
//! ```
//!
//! Hits are fully built (source node, tone chain, pan) before they cross to
//! the audio side, so the renderer only mixes. Every hit carries the frame it
//! starts on, so a hit scheduled 100ms ahead simply waits in the pool.
//!
//! [`OfflineSession`] wires the same pieces together without a device, for
//! bouncing to a file and for tests.

pub mod hit;
pub mod renderer;

use std::collections::VecDeque;

use tracing::debug;

use crate::config::EngineConfig;
use crate::engine::DrumEngine;
use crate::io::FrameClock;

pub use hit::{Hit, HitBuilder};
pub use renderer::{limit, HitReceiver, MasterVolume, Renderer};

/// Seed for the shared noise table when the config has none.
pub const DEFAULT_NOISE_SEED: u64 = 0x0b11_f709;

/// Rendered stereo audio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoBuffer {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
    pub sample_rate: u32,
}

impl StereoBuffer {
    pub fn frames(&self) -> usize {
        self.left.len()
    }

    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(&self.right)
            .fold(0.0, |peak, s| peak.max(s.abs()))
    }

    /// RMS of both channels over `start..end` frames.
    pub fn rms(&self, start: usize, end: usize) -> f32 {
        let end = end.min(self.frames());
        if start >= end {
            return 0.0;
        }
        let sum: f32 = self.left[start..end]
            .iter()
            .chain(&self.right[start..end])
            .map(|s| s * s)
            .sum();
        (sum / (2 * (end - start)) as f32).sqrt()
    }
}

/// An engine driven by a renderer's frame clock, with no device attached.
pub struct OfflineSession {
    engine: DrumEngine,
    builder: HitBuilder,
    renderer: Renderer<VecDeque<Hit>>,
    volume: MasterVolume,
    tick_frames: usize,
}

impl OfflineSession {
    pub fn new(config: EngineConfig) -> Self {
        let config = config.sanitized();
        let clock = FrameClock::new(config.sample_rate as f64);
        let engine = DrumEngine::new(config.clone(), clock.clone());
        Self::from_parts(engine, clock)
    }

    /// Wrap an engine that was built on `clock`.
    pub fn from_parts(engine: DrumEngine, clock: FrameClock) -> Self {
        let config = engine.config().clone();
        let volume = MasterVolume::new(engine.volume());
        let tick_frames = ((config.tick_interval * config.sample_rate as f64).round() as usize).max(1);
        Self {
            builder: HitBuilder::new(config.sample_rate as f32, config.seed.unwrap_or(DEFAULT_NOISE_SEED)),
            renderer: Renderer::new(VecDeque::new(), clock, volume.clone(), config.max_hits),
            volume,
            tick_frames,
            engine,
        }
    }

    pub fn engine(&self) -> &DrumEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DrumEngine {
        &mut self.engine
    }

    /// Move the engine's queued triggers into the renderer.
    fn dispatch(&mut self) {
        for event in self.engine.take_triggers() {
            if let Some(hit) = self.builder.build(&event) {
                self.renderer.receiver_mut().push_back(hit);
            }
        }
        self.volume.set(self.engine.volume());
    }

    /// Render `seconds` of audio, ticking the engine on its usual interval.
    pub fn bounce(&mut self, seconds: f64) -> StereoBuffer {
        let sample_rate = self.engine.config().sample_rate;
        let total = (seconds.max(0.0) * sample_rate as f64).round() as usize;
        let mut out = StereoBuffer {
            left: vec![0.0; total],
            right: vec![0.0; total],
            sample_rate,
        };

        let mut done = 0;
        while done < total {
            self.engine.tick();
            self.engine.poll_playhead();
            self.dispatch();

            let len = (total - done).min(self.tick_frames);
            self.renderer
                .render(&mut out.left[done..done + len], &mut out.right[done..done + len]);
            done += len;
        }

        // anything auditioned after the last tick still gets built
        self.dispatch();
        debug!(frames = total, peak = out.peak(), "bounce finished");
        out
    }
}

/// Bounce `seconds` of a freshly started engine.
pub fn bounce(session: &mut OfflineSession, seconds: f64) -> StereoBuffer {
    session.engine_mut().start();
    session.bounce(seconds)
}
