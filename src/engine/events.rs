use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::path::PathBuf;

use crate::tone::params::ToneParams;
use crate::voices::Voice;
use crate::wav::SampleBuffer;

/// What a trigger should sound.
#[derive(Debug, Clone)]
pub enum TriggerSource {
    Sample(SampleBuffer),
    /// The voice's built-in recipe.
    Internal,
    /// Direct playback of a path-backed sample that has not been decoded yet.
    /// Only produced for auditions.
    ExternalPath(PathBuf),
    /// A sample that failed to decode on this very hit.
    Silence,
}

/// One sound to start at an absolute clock time.
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    pub voice: Voice,
    /// `None` for auditions.
    pub step: Option<usize>,
    pub time: f64,
    /// Index within a ratchet, starting at 0.
    pub repeat: u8,
    /// Peak level: track level x accent x compensation.
    pub level: f32,
    pub accent: f32,
    pub compensation: f32,
    /// Slot the sample came from, after resolution.
    pub slot: usize,
    /// Live tone at the moment the step was scheduled.
    pub tone: ToneParams,
    pub source: TriggerSource,
}

struct Entry<T> {
    time: f64,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // reversed: BinaryHeap is a max-heap and the earliest entry must pop first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Items keyed by absolute time. Equal times pop in insertion order.
pub struct EventQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time: f64, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { time, seq, item });
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.time)
    }

    /// Pop the earliest item if it is due at or before `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<(f64, T)> {
        if self.peek_time()? > now {
            return None;
        }
        self.heap.pop().map(|entry| (entry.time, entry.item))
    }

    /// Everything, earliest first.
    pub fn drain(&mut self) -> Vec<T> {
        let mut items = Vec::with_capacity(self.heap.len());
        while let Some(entry) = self.heap.pop() {
            items.push(entry.item);
        }
        items
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
