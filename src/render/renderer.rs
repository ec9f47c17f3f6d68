use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::dsp::distortion::soft_clip;
use crate::graph::node::RenderCtx;
use crate::io::FrameClock;
use crate::render::hit::Hit;
use crate::tone::params::VOLUME;
use crate::MAX_BLOCK_SIZE;

/// Level above which the master limiter starts bending the signal.
const LIMITER_KNEE: f32 = 0.8;

pub trait HitReceiver {
    fn pop(&mut self) -> Option<Hit>;
}

#[cfg(feature = "rtrb")]
impl HitReceiver for Consumer<Hit> {
    fn pop(&mut self) -> Option<Hit> {
        Consumer::pop(self).ok()
    }
}

impl HitReceiver for VecDeque<Hit> {
    fn pop(&mut self) -> Option<Hit> {
        self.pop_front()
    }
}

/// Master volume shared between the control side and the renderer.
#[derive(Debug, Clone)]
pub struct MasterVolume {
    bits: Arc<AtomicU32>,
}

impl Default for MasterVolume {
    fn default() -> Self {
        Self::new(VOLUME.default)
    }
}

impl MasterVolume {
    pub fn new(volume: f32) -> Self {
        Self {
            bits: Arc::new(AtomicU32::new(volume.to_bits())),
        }
    }

    pub fn set(&self, volume: f32) {
        self.bits.store(volume.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// Pass quiet material untouched, bend anything over the knee smoothly
/// towards full scale.
#[inline]
pub fn limit(sample: f32) -> f32 {
    let magnitude = sample.abs();
    if magnitude <= LIMITER_KNEE {
        return sample;
    }
    let headroom = 1.0 - LIMITER_KNEE;
    let over = (magnitude - LIMITER_KNEE) / headroom;
    sample.signum() * (LIMITER_KNEE + headroom * soft_clip(over, 1.0))
}

/// Stereo mixer for hits, driving the shared frame clock.
///
/// Runs on the audio thread: it never allocates after construction and
/// never blocks. New hits arrive through the receiver.
pub struct Renderer<R: HitReceiver> {
    rx: R,
    hits: Vec<Hit>,
    max_hits: usize,
    clock: FrameClock,
    volume: MasterVolume,
    ctx: RenderCtx,
    scratch: Vec<f32>,
}

impl<R: HitReceiver> Renderer<R> {
    pub fn new(rx: R, clock: FrameClock, volume: MasterVolume, max_hits: usize) -> Self {
        let max_hits = max_hits.max(1);
        Self {
            rx,
            hits: Vec::with_capacity(max_hits),
            max_hits,
            ctx: RenderCtx::new(clock.sample_rate() as f32),
            clock,
            volume,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn receiver_mut(&mut self) -> &mut R {
        &mut self.rx
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Hits still held, started or not.
    pub fn active_hits(&self) -> usize {
        self.hits.len()
    }

    fn accept_hits(&mut self) {
        while let Some(hit) = self.rx.pop() {
            if self.hits.len() >= self.max_hits {
                // steal the oldest
                if let Some(oldest) = self
                    .hits
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, hit)| hit.start_frame())
                    .map(|(index, _)| index)
                {
                    self.hits.swap_remove(oldest);
                }
            }
            self.hits.push(hit);
        }
    }

    /// Render `left.len()` frames of the master bus, in blocks of at most
    /// [`MAX_BLOCK_SIZE`], advancing the clock as it goes.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        let mut done = 0;
        while done < frames {
            let len = (frames - done).min(MAX_BLOCK_SIZE);
            self.render_block(&mut left[done..done + len], &mut right[done..done + len]);
            done += len;
        }
    }

    fn render_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.accept_hits();

        left.fill(0.0);
        right.fill(0.0);
        let block_start = self.clock.frames();
        for hit in &mut self.hits {
            hit.mix_into(block_start, left, right, &mut self.scratch, &self.ctx);
        }
        self.hits.retain(|hit| !hit.is_finished());

        let volume = self.volume.get();
        for sample in left.iter_mut().chain(right.iter_mut()) {
            *sample = limit(*sample * volume);
        }

        self.clock.advance(left.len());
    }

    /// Fill an interleaved device buffer. Mono devices get the average of
    /// both sides, channels past the second stay silent. The device buffer
    /// is walked in pieces no longer than the shorter scratch side; empty
    /// scratch leaves `out` silent.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize, left: &mut [f32], right: &mut [f32]) {
        let channels = channels.max(1);
        let frames_per_chunk = MAX_BLOCK_SIZE.min(left.len()).min(right.len());
        if frames_per_chunk == 0 {
            out.fill(0.0);
            return;
        }
        for chunk in out.chunks_mut(channels * frames_per_chunk) {
            let frames = chunk.len() / channels;
            self.render(&mut left[..frames], &mut right[..frames]);

            for (frame, (l, r)) in chunk.chunks_mut(channels).zip(left.iter().zip(right.iter())) {
                match frame {
                    [mono] => *mono = (l + r) * 0.5,
                    [first, second, rest @ ..] => {
                        *first = *l;
                        *second = *r;
                        rest.fill(0.0);
                    }
                    [] => {}
                }
            }
        }
    }
}
