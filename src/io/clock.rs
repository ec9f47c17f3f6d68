use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic audio-domain time in seconds.
///
/// The scheduler reads this on every tick. All trigger times it produces are
/// absolute values on the same clock.
pub trait AudioClock: Send {
    fn now(&self) -> f64;
}

/// Hand-driven clock for tests and offline work.
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, seconds: f64) {
        self.bits.store(seconds.to_bits(), Ordering::Release);
    }

    pub fn advance(&self, seconds: f64) {
        self.set(self.now() + seconds);
    }
}

impl AudioClock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}

/// Clock advanced by the renderer, one block at a time.
///
/// The renderer owns the writing side. The engine reads the same counter, so
/// its notion of "now" is exactly the number of frames already rendered.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frames: Arc<AtomicU64>,
    sample_rate: f64,
}

impl FrameClock {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate: sample_rate.max(1.0),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    pub fn advance(&self, frames: usize) {
        self.frames.fetch_add(frames as u64, Ordering::AcqRel);
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

impl AudioClock for FrameClock {
    fn now(&self) -> f64 {
        self.frames() as f64 / self.sample_rate
    }
}
