/*
Step Pattern
============

A pattern is a fixed 7 x 16 grid of hit flags, one row per voice:

            0 1 2 3 4 5 6 7 8 9 A B C D E F
  A Kick    x . . . . . . x x . x . . . x .
  B Snare   . . . . x . . . . . . . x . . .
  ...
  G Cymbal  x . . . . . . . . . . . . . . .

The grid is a plain value (`Copy`), so storing it in a bank or swapping
banks always copies every row. Two patterns never share a row.

Banks
-----
Eight banks hold independent patterns. Exactly one is live. Switching
first writes the live grid back into the bank it came from, then loads
the target bank's copy:

  live ──store──> bank[current]
  bank[target] ──load──> live
*/

use rand::Rng;

use crate::voices::Voice;
use crate::{PATTERN_BANKS, SEQ_STEPS, VOICE_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pattern {
    hits: [[bool; SEQ_STEPS]; VOICE_COUNT],
}

impl Pattern {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from ragged rows. Rows are truncated or padded to 16 steps,
    /// missing rows stay empty and extra rows are ignored.
    pub fn from_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = S>,
        S: AsRef<[bool]>,
    {
        let mut pattern = Self::empty();
        for (row, source) in pattern.hits.iter_mut().zip(rows) {
            for (step, &hit) in row.iter_mut().zip(source.as_ref()) {
                *step = hit;
            }
        }
        pattern
    }

    /// Out-of-range steps read as no hit.
    pub fn get(&self, voice: Voice, step: usize) -> bool {
        self.hits[voice.index()].get(step).copied().unwrap_or(false)
    }

    /// Steps past the end clamp to the last step.
    pub fn set(&mut self, voice: Voice, step: usize, on: bool) {
        self.hits[voice.index()][step.min(SEQ_STEPS - 1)] = on;
    }

    pub fn toggle(&mut self, voice: Voice, step: usize) -> bool {
        let on = !self.get(voice, step.min(SEQ_STEPS - 1));
        self.set(voice, step, on);
        on
    }

    pub fn row(&self, voice: Voice) -> &[bool; SEQ_STEPS] {
        &self.hits[voice.index()]
    }

    pub fn rows(&self) -> &[[bool; SEQ_STEPS]; VOICE_COUNT] {
        &self.hits
    }

    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    /// Play every row backwards.
    pub fn reverse(&mut self) {
        self.hits.iter_mut().for_each(|row| row.reverse());
    }

    pub fn hit_count(&self) -> usize {
        self.hits.iter().flatten().filter(|&&hit| hit).count()
    }
}

/// The eight stored patterns and which one is live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternBanks {
    banks: [Pattern; PATTERN_BANKS],
    current: usize,
}

impl PatternBanks {
    /// Every bank starts as a copy of `initial`.
    pub fn new(initial: Pattern) -> Self {
        Self {
            banks: [initial; PATTERN_BANKS],
            current: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn bank(&self, index: usize) -> &Pattern {
        &self.banks[index.min(PATTERN_BANKS - 1)]
    }

    /// Write the live grid into the current bank.
    pub fn store(&mut self, live: &Pattern) {
        self.banks[self.current] = *live;
    }

    /// Store `live` into the current bank and return a copy of `index`.
    /// Indices past the last bank clamp.
    pub fn switch(&mut self, live: &Pattern, index: usize) -> Pattern {
        self.store(live);
        self.current = index.min(PATTERN_BANKS - 1);
        self.banks[self.current]
    }
}

/// Steps each voice plays in one of the stock grooves, in voice order.
struct GrooveTemplate {
    kick: &'static [usize],
    snare: &'static [usize],
    tom: &'static [usize],
    clap: &'static [usize],
    fx: &'static [usize],
    hihat: &'static [usize],
    cymbal: &'static [usize],
}

static GROOVES: [GrooveTemplate; 4] = [
    GrooveTemplate {
        kick: &[0, 7, 8, 10, 14],
        snare: &[4, 12],
        tom: &[6, 13],
        clap: &[12],
        fx: &[15],
        hihat: &[0, 2, 4, 6, 8, 10, 12, 14],
        cymbal: &[0],
    },
    GrooveTemplate {
        kick: &[0, 3, 8, 11, 14],
        snare: &[4, 12],
        tom: &[2, 9],
        clap: &[4, 12],
        fx: &[7, 15],
        hihat: &[0, 2, 3, 6, 8, 10, 11, 14],
        cymbal: &[0, 8],
    },
    GrooveTemplate {
        kick: &[0, 5, 8, 12, 14],
        snare: &[4, 12, 15],
        tom: &[6, 10],
        clap: &[12],
        fx: &[14],
        hihat: &[1, 3, 5, 7, 9, 11, 13, 15],
        cymbal: &[0],
    },
    GrooveTemplate {
        kick: &[0, 6, 8, 10, 13, 15],
        snare: &[4, 12],
        tom: &[2, 6, 10, 14],
        clap: &[4, 13],
        fx: &[11],
        hihat: &[0, 2, 4, 6, 8, 10, 12, 14],
        cymbal: &[0, 15],
    },
];

/// Pick a stock groove and thin it out a little.
///
/// Kick and snare always play their template. The other voices keep each
/// template step with a per-voice chance, then a few extra pickups are
/// sprinkled on top.
pub fn generate_groove<R: Rng>(rng: &mut R) -> Pattern {
    let groove = &GROOVES[rng.gen_range(0..GROOVES.len())];
    let mut pattern = Pattern::empty();

    let mut place = |voice: Voice, steps: &[usize], chance: f64, rng: &mut R| {
        for &step in steps {
            if chance >= 1.0 || rng.gen::<f64>() < chance {
                pattern.set(voice, step, true);
            }
        }
    };

    place(Voice::Kick, groove.kick, 1.0, rng);
    place(Voice::Snare, groove.snare, 1.0, rng);
    place(Voice::Perc, groove.tom, 0.85, rng);
    place(Voice::Clap, groove.clap, 0.9, rng);
    place(Voice::Abstract, groove.fx, 0.7, rng);
    place(Voice::HiHat, groove.hihat, 0.92, rng);
    place(Voice::Cymbal, groove.cymbal, 0.72, rng);

    place(Voice::Kick, &[15], 0.42, rng);
    place(Voice::Snare, &[11], 0.35, rng);
    place(Voice::HiHat, &[7], 0.55, rng);
    place(Voice::HiHat, &[15], 0.3, rng);

    pattern
}
