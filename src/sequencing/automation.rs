/*
Step Automation
===============

Knob moves recorded against the step that was playing when they
happened, then replayed each time that step comes round again.

  step   0      1      2      3     ...  15
         │      │      │      │
         ├ cutoff(A) = 900
         │      ├ tempo = 132
         │      │      │      ├ level(F) = 0.4
         │      │      │      ├ pan(F)   = -0.3

A target is a closed set of knobs, so replay is a match instead of a
lookup by name. Each step keeps at most one value per target; a later
recording on the same step replaces the earlier one. Entries are kept
in target order so replay is deterministic.
*/

use std::collections::BTreeMap;

use crate::tone::params::ToneParam;
use crate::voices::Voice;
use crate::SEQ_STEPS;

/// A knob whose moves can be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AutomationTarget {
    Tone { voice: Voice, param: ToneParam },
    Level { voice: Voice },
    Tempo,
    Volume,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepAutomation {
    steps: [BTreeMap<AutomationTarget, f32>; SEQ_STEPS],
}

impl StepAutomation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps outside the grid are ignored.
    pub fn record(&mut self, step: usize, target: AutomationTarget, value: f32) {
        if let Some(entries) = self.steps.get_mut(step) {
            entries.insert(target, value);
        }
    }

    pub fn entries(&self, step: usize) -> impl Iterator<Item = (AutomationTarget, f32)> + '_ {
        self.steps
            .get(step)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(target, value)| (*target, *value)))
    }

    pub fn value(&self, step: usize, target: AutomationTarget) -> Option<f32> {
        self.steps.get(step)?.get(&target).copied()
    }

    /// Mirror the steps, matching a reversed pattern.
    pub fn reverse(&mut self) {
        self.steps.reverse();
    }

    pub fn clear(&mut self) {
        self.steps.iter_mut().for_each(BTreeMap::clear);
    }

    pub fn len(&self) -> usize {
        self.steps.iter().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.iter().all(BTreeMap::is_empty)
    }
}
