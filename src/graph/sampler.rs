use crate::dsp::envelope::PercEnvelope;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::wav::SampleBuffer;

/*
Sample Player
=============

Plays one slice of a decoded sample through a percussive envelope.

  buffer   |~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~|
                   ^ loop point (fraction of the length)
                  ^  snapped to the nearest zero crossing
                  [=========== played slice ===========]

Start offset:
  raw   = min(duration - 2ms, duration * loop_point)
  start = nearest zero crossing within ±1536 samples of raw

Slice length (buffer time):
  min(max(decay * 2.4, 50ms), max(3ms, duration - start))

Playback rate:
  2^(pitch / 12) * buffer_rate / output_rate

Reading is linearly interpolated. The hit ends when either the slice or
the envelope runs out.
*/

/// Attack of every sample hit, a little quicker than the synth layers.
pub const SAMPLE_ATTACK: f32 = 0.0016;
/// Zero-crossing search radius around the requested start, in samples.
pub const ZERO_CROSSING_RADIUS: usize = 1536;

const MIN_SLICE: f32 = 0.05;
const MIN_REMAINING: f32 = 0.003;
const END_GUARD: f32 = 0.002;
const DECAY_TO_SLICE: f32 = 2.4;

/// Index of the crossing nearest `center` within `radius` samples.
///
/// A crossing at `i` is a sign change between `i - 1` and `i`, or either of
/// them being exactly zero. The first crossing at the best distance wins.
/// Without any crossing in range, `center` comes back unchanged.
pub fn find_nearest_zero_crossing(data: &[f32], center: usize, radius: usize) -> usize {
    if data.len() < 4 {
        return center;
    }

    let min_index = center.saturating_sub(radius).max(1);
    let max_index = center.saturating_add(radius).min(data.len() - 2);
    let mut best = center;
    let mut best_distance = usize::MAX;

    for i in min_index..=max_index {
        let (a, b) = (data[i - 1], data[i]);
        let crossing = a == 0.0 || b == 0.0 || (a < 0.0 && b >= 0.0) || (a > 0.0 && b <= 0.0);
        if !crossing {
            continue;
        }
        let distance = i.abs_diff(center);
        if distance < best_distance {
            best_distance = distance;
            best = i;
            if distance == 0 {
                break;
            }
        }
    }

    best
}

/// Where a hit starts in the buffer and how many buffer frames it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSlice {
    pub start: usize,
    pub frames: usize,
}

impl SampleSlice {
    pub fn new(buffer: &SampleBuffer, loop_point: f32, decay: f32) -> Self {
        let rate = buffer.sample_rate() as f32;
        let duration = buffer.duration().max(MIN_REMAINING);
        let raw_start = (duration - END_GUARD).min(duration * loop_point.max(0.0)).max(0.0);
        let raw_index = (raw_start * rate).floor() as usize;
        let start = find_nearest_zero_crossing(buffer.samples(), raw_index, ZERO_CROSSING_RADIUS);

        let start_seconds = start as f32 / rate;
        let remaining = (duration - start_seconds).max(MIN_REMAINING);
        let seconds = (decay * DECAY_TO_SLICE).max(MIN_SLICE).min(remaining);
        let frames = ((seconds * rate).round() as usize).min(buffer.len().saturating_sub(start));

        Self { start, frames }
    }

    pub fn end(&self) -> usize {
        self.start + self.frames
    }
}

pub struct SampleNode {
    buffer: SampleBuffer,
    position: f64,
    end: f64,
    rate: f64,
    envelope: PercEnvelope,
}

impl SampleNode {
    /// `pitch_ratio` is the semitone multiplier. Buffer/output rate
    /// conversion is applied on top.
    pub fn new(
        buffer: SampleBuffer,
        loop_point: f32,
        decay: f32,
        pitch_ratio: f32,
        peak: f32,
        sample_rate: f32,
    ) -> Self {
        let slice = SampleSlice::new(&buffer, loop_point, decay);
        let rate = pitch_ratio as f64 * buffer.sample_rate() as f64 / sample_rate.max(1.0) as f64;

        Self {
            position: slice.start as f64,
            end: slice.end() as f64,
            rate: rate.max(0.0),
            envelope: PercEnvelope::new(peak, SAMPLE_ATTACK, decay, sample_rate),
            buffer,
        }
    }

    fn read(&self, position: f64) -> f32 {
        let data = self.buffer.samples();
        let index = position as usize;
        let frac = (position - index as f64) as f32;
        let a = data.get(index).copied().unwrap_or(0.0);
        let b = data.get(index + 1).copied().unwrap_or(0.0);
        a + (b - a) * frac
    }

    fn slice_finished(&self) -> bool {
        self.position >= self.end
    }
}

impl GraphNode for SampleNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            if self.slice_finished() || self.envelope.is_finished() {
                *sample = 0.0;
                continue;
            }
            *sample = self.read(self.position) * self.envelope.next_level();
            self.position += self.rate;
        }
    }

    fn is_active(&self) -> bool {
        !self.slice_finished() && !self.envelope.is_finished()
    }
}
