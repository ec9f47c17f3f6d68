/*
Look-ahead Scheduler
====================

A coarse periodic tick drives a precise absolute timeline.

  tick      tick      tick      tick          (every ~25ms, jittery)
   │         │         │         │
   ▼         ▼         ▼         ▼
  ─┼────┬────┼───┬─────┼──┬──────┼───────────▶ audio clock
        │        │        │
      step 0   step 1   step 2                (exact absolute times)
   [──window──]
    now .. now + schedule_ahead

On each tick every step whose time falls before `now + schedule_ahead`
is scheduled, then `next_event_time` moves forward by one step duration:

  step_duration = 60 / tempo / 4
  next_event_time += max(2ms, step_duration + swing)
  swing = step_duration * 0.12   on odd steps with shuffle on, else 0

`next_event_time` is only ever advanced by adding, never recomputed from
"now", so late or early ticks never move the grid.

End of range:
  loop on   current step wraps to the range start
  loop off  current step stays on the range end and the transport stops
*/

use crate::sequencing::SequenceRange;

/// Swing added to odd steps when shuffle is on, as a share of a step.
pub const SWING_AMOUNT: f64 = 0.12;
/// Shortest allowed advance. Keeps a bad tempo from spinning the catch-up loop.
pub const MIN_STEP_ADVANCE: f64 = 0.002;

/// Sixteenth-note length in seconds.
pub fn step_duration(tempo: f64) -> f64 {
    60.0 / tempo / 4.0
}

pub fn swing_offset(step: usize, step_duration: f64, shuffle: bool) -> f64 {
    if shuffle && step % 2 == 1 {
        step_duration * SWING_AMOUNT
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Running,
}

/// What happened after a step was advanced past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Continue,
    /// Loop is off and the range end was just scheduled.
    Finished,
}

#[derive(Debug, Clone)]
pub struct LookaheadScheduler {
    schedule_ahead: f64,
    start_delay: f64,
    state: TransportState,
    next_event_time: f64,
    current_step: usize,
    last_scheduled: Option<usize>,
}

impl LookaheadScheduler {
    pub fn new(schedule_ahead: f64, start_delay: f64) -> Self {
        Self {
            schedule_ahead: schedule_ahead.max(0.0),
            start_delay: start_delay.max(0.0),
            state: TransportState::Stopped,
            next_event_time: 0.0,
            current_step: 0,
            last_scheduled: None,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TransportState::Running
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn last_scheduled(&self) -> Option<usize> {
        self.last_scheduled
    }

    pub fn next_event_time(&self) -> f64 {
        self.next_event_time
    }

    /// Begin at `first_step`, a short delay after `now`.
    pub fn start(&mut self, now: f64, first_step: usize) {
        self.state = TransportState::Running;
        self.current_step = first_step;
        self.next_event_time = now + self.start_delay;
    }

    pub fn pause(&mut self) {
        self.state = TransportState::Stopped;
    }

    /// Pause and rewind to step 0.
    pub fn stop(&mut self) {
        self.pause();
        self.current_step = 0;
        self.last_scheduled = None;
    }

    /// The step to schedule next, if it falls inside the window.
    pub fn due(&self, now: f64) -> Option<(usize, f64)> {
        if !self.is_running() || self.next_event_time >= now + self.schedule_ahead {
            return None;
        }
        Some((self.current_step, self.next_event_time))
    }

    /// Mark the current step scheduled and move past it.
    pub fn advance(&mut self, step_duration: f64, shuffle: bool, range: &SequenceRange, looping: bool) -> Advance {
        let step = self.current_step;
        self.last_scheduled = Some(step);
        self.next_event_time += (step_duration + swing_offset(step, step_duration, shuffle)).max(MIN_STEP_ADVANCE);

        if step >= range.end() {
            if looping {
                self.current_step = range.start();
            } else {
                self.pause();
                return Advance::Finished;
            }
        } else {
            self.current_step = step + 1;
        }
        Advance::Continue
    }

    /// Move the step cursor into `range` if it has fallen outside.
    pub fn clamp_into(&mut self, range: &SequenceRange) {
        if !range.contains(self.current_step) {
            self.current_step = range.start();
        }
    }
}
