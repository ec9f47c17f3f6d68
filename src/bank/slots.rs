use crate::bank::sample::{SampleRecord, SlotStatus};
use crate::voices::Voice;
use crate::{CORE_SLOTS, FACTORY_SLOTS, SLOTS_PER_VOICE, VOICE_COUNT};

/// Clamp a requested playback slot into the core range.
pub fn normalize_playback_slot(slot: usize) -> usize {
    slot.min(CORE_SLOTS - 1)
}

/// How full one voice's bank is, by slot region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotCounts {
    /// Stored in 0..10.
    pub core: usize,
    /// Stored in 0..20.
    pub factory: usize,
    /// Stored in 20..64.
    pub user: usize,
}

/// Per-voice sample storage, 64 slots each.
#[derive(Debug, Clone)]
pub struct SampleBank {
    slots: [Vec<Option<SampleRecord>>; VOICE_COUNT],
}

impl Default for SampleBank {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleBank {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| vec![None; SLOTS_PER_VOICE]),
        }
    }

    pub fn get(&self, voice: Voice, slot: usize) -> Option<&SampleRecord> {
        self.slots[voice.index()].get(slot)?.as_ref()
    }

    pub fn get_mut(&mut self, voice: Voice, slot: usize) -> Option<&mut SampleRecord> {
        self.slots[voice.index()].get_mut(slot)?.as_mut()
    }

    /// Store a record, returning whatever it replaced. Out-of-range slots are
    /// clamped to the last one.
    pub fn store(&mut self, voice: Voice, slot: usize, record: SampleRecord) -> Option<SampleRecord> {
        let slot = slot.min(SLOTS_PER_VOICE - 1);
        self.slots[voice.index()][slot].replace(record)
    }

    pub fn clear(&mut self, voice: Voice, slot: usize) -> Option<SampleRecord> {
        self.slots[voice.index()].get_mut(slot)?.take()
    }

    pub fn clear_all(&mut self) {
        for voice in &mut self.slots {
            voice.iter_mut().for_each(|slot| *slot = None);
        }
    }

    pub fn status(&self, voice: Voice, slot: usize) -> SlotStatus {
        self.get(voice, slot)
            .map_or(SlotStatus::Empty, SampleRecord::status)
    }

    pub fn is_playable(&self, voice: Voice, slot: usize) -> bool {
        self.get(voice, slot).is_some_and(SampleRecord::is_playable)
    }

    /// Number of stored records (valid or not) in `0..end`.
    pub fn stored_below(&self, voice: Voice, end: usize) -> usize {
        self.slots[voice.index()]
            .iter()
            .take(end)
            .filter(|slot| slot.is_some())
            .count()
    }

    pub fn counts(&self, voice: Voice) -> SlotCounts {
        let factory = self.stored_below(voice, FACTORY_SLOTS);
        SlotCounts {
            core: self.stored_below(voice, CORE_SLOTS),
            factory,
            user: self.stored_below(voice, SLOTS_PER_VOICE) - factory,
        }
    }

    /// Playable slots inside the core range, ascending.
    pub fn playable_core_slots(&self, voice: Voice) -> Vec<usize> {
        (0..CORE_SLOTS)
            .filter(|&slot| self.is_playable(voice, slot))
            .collect()
    }

    /// The slot that actually sounds when `requested` is asked for.
    ///
    /// The request is clamped into the core range. If that slot is not
    /// playable, the nearest playable core slot by index distance is used,
    /// the lower index winning a tie. With nothing playable the clamped
    /// request is returned unchanged.
    pub fn resolve_playback_slot(&self, voice: Voice, requested: usize) -> usize {
        let slot = normalize_playback_slot(requested);
        if self.is_playable(voice, slot) {
            return slot;
        }

        self.playable_core_slots(voice)
            .into_iter()
            .min_by_key(|candidate| candidate.abs_diff(slot))
            .unwrap_or(slot)
    }

    /// Every stored record with its location, voice-major.
    pub fn iter(&self) -> impl Iterator<Item = (Voice, usize, &SampleRecord)> + '_ {
        Voice::ALL.into_iter().flat_map(move |voice| {
            self.slots[voice.index()]
                .iter()
                .enumerate()
                .filter_map(move |(slot, record)| record.as_ref().map(|r| (voice, slot, r)))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Voice, usize, &mut SampleRecord)> + '_ {
        self.slots.iter_mut().enumerate().flat_map(|(index, slots)| {
            let voice = Voice::from_index(index);
            slots
                .iter_mut()
                .enumerate()
                .filter_map(move |(slot, record)| record.as_mut().map(|r| (voice, slot, r)))
        })
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::metadata::fixtures::wav_bytes;

    fn valid() -> SampleRecord {
        SampleRecord::from_bytes("s.wav", wav_bytes(1, 1, 48_000, 16, &[0, 1, 2, 3], &[]))
    }

    fn stereo() -> SampleRecord {
        SampleRecord::from_bytes("s.wav", wav_bytes(1, 2, 48_000, 16, &[0, 1, 2, 3], &[]))
    }

    #[test]
    fn populated_request_resolves_to_itself() {
        let mut bank = SampleBank::new();
        bank.store(Voice::Kick, 4, valid());
        assert_eq!(bank.resolve_playback_slot(Voice::Kick, 4), 4);
    }

    #[test]
    fn empty_request_snaps_to_nearest_loaded() {
        let mut bank = SampleBank::new();
        bank.store(Voice::Snare, 1, valid());
        bank.store(Voice::Snare, 8, valid());

        assert_eq!(bank.resolve_playback_slot(Voice::Snare, 3), 1);
        assert_eq!(bank.resolve_playback_slot(Voice::Snare, 6), 8);
        assert_eq!(bank.resolve_playback_slot(Voice::Snare, 63), 8, "request clamps to 9 first");
    }

    #[test]
    fn ties_go_to_the_lower_slot() {
        let mut bank = SampleBank::new();
        bank.store(Voice::Perc, 2, valid());
        bank.store(Voice::Perc, 6, valid());
        assert_eq!(bank.resolve_playback_slot(Voice::Perc, 4), 2);
    }

    #[test]
    fn nothing_playable_keeps_the_clamped_request() {
        let mut bank = SampleBank::new();
        bank.store(Voice::HiHat, 25, valid());
        assert_eq!(bank.resolve_playback_slot(Voice::HiHat, 40), 9);
        assert_eq!(bank.resolve_playback_slot(Voice::Clap, 3), 3);
    }

    #[test]
    fn invalid_samples_are_passed_over() {
        let mut bank = SampleBank::new();
        bank.store(Voice::Cymbal, 0, stereo());
        bank.store(Voice::Cymbal, 5, valid());
        assert_eq!(bank.resolve_playback_slot(Voice::Cymbal, 0), 5);
        assert_eq!(bank.status(Voice::Cymbal, 0), SlotStatus::Invalid);
        assert_eq!(bank.stored_below(Voice::Cymbal, CORE_SLOTS), 2);
    }

    #[test]
    fn counts_split_by_region() {
        let mut bank = SampleBank::new();
        for slot in [0, 9, 12, 19, 20, 63] {
            bank.store(Voice::Kick, slot, valid());
        }
        assert_eq!(
            bank.counts(Voice::Kick),
            SlotCounts {
                core: 2,
                factory: 4,
                user: 2
            }
        );
        assert_eq!(bank.counts(Voice::Snare), SlotCounts::default());
    }

    #[test]
    fn resolution_is_stable_without_mutation() {
        let mut bank = SampleBank::new();
        bank.store(Voice::Abstract, 7, valid());
        let first = bank.resolve_playback_slot(Voice::Abstract, 2);
        assert_eq!(first, bank.resolve_playback_slot(Voice::Abstract, 2));
    }

    #[test]
    fn store_clamps_and_iter_reports_locations() {
        let mut bank = SampleBank::new();
        assert!(bank.is_empty());
        bank.store(Voice::Kick, 999, valid());
        bank.store(Voice::Clap, 3, valid());

        let located: Vec<_> = bank.iter().map(|(v, s, _)| (v, s)).collect();
        assert_eq!(located, vec![(Voice::Kick, 63), (Voice::Clap, 3)]);

        assert!(bank.clear(Voice::Kick, 63).is_some());
        assert!(bank.clear(Voice::Kick, 500).is_none());
        bank.clear_all();
        assert_eq!(bank.len(), 0);
    }
}
