//! The drum engine: pattern, transport, tone state and sample slots in one
//! owned context.
//!
//! The engine never renders audio itself. The host calls [`DrumEngine::tick`]
//! roughly every 25ms. Each tick schedules every step that falls inside the
//! look-ahead window and queues one [`TriggerEvent`] per sound, stamped with
//! its absolute start time on the engine's [`AudioClock`]. The host takes
//! those with [`DrumEngine::take_triggers`] and hands them to a renderer.
//!
//! # Example
//!
//! ```ignore
//! use bullfrog_drums::{io::ManualClock, DrumEngine, EngineConfig, Voice};
//!
//! let clock = ManualClock::new();
//! let mut engine = DrumEngine::new(EngineConfig::default().with_seed(1), clock.clone());
//! engine.clear_pattern();
//! engine.set_hit(Voice::Kick, 0, true);
//! engine.start();
//! engine.tick();
//! let events = engine.take_triggers();
//! ```

pub mod events;
pub mod knob;
pub mod scheduler;
pub mod trigger;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::bank::{
    normalize_playback_slot, pack, PackError, PackReport, Readiness, SampleBank, SampleRecord, SlotStatus,
};
use crate::config::EngineConfig;
use crate::io::{AudioClock, FetchCompletion, FetchError, FetchResponder, FetchTicket, FileFetcher, SampleFetcher};
use crate::sequencing::{
    generate_groove, AutomationTarget, Pattern, PatternBanks, SequenceRange, StepAutomation, VoiceTransport,
};
use crate::tone::params::{ToneParam, ToneParams, TEMPO, TRACK_LEVEL, VOLUME};
use crate::voices::Voice;
use crate::wav::{HoundDecoder, SampleDecoder, ValidationReport};
use crate::{CORE_SLOTS, FACTORY_SLOTS, VOICE_COUNT};

use self::events::EventQueue;
use self::knob::Knob;
use self::scheduler::{step_duration, Advance, LookaheadScheduler};
use self::trigger::{RepeatPlan, VoiceGate};

pub use self::events::{TriggerEvent, TriggerSource};
pub use self::scheduler::TransportState;

/// Ranges `randomize_kit` draws tone values from, before clamping.
const KIT_TONE_RANGES: [(ToneParam, f32, f32); 7] = [
    (ToneParam::Pitch, -4.0, 4.0),
    (ToneParam::Decay, 0.12, 0.82),
    (ToneParam::LoopPoint, 0.0, 0.36),
    (ToneParam::Cutoff, 1800.0, 13_600.0),
    (ToneParam::Resonance, 0.7, 4.4),
    (ToneParam::Drive, 0.02, 0.24),
    (ToneParam::Pan, -0.35, 0.35),
];
const KIT_LEVEL_RANGE: (f32, f32) = (0.62, 0.96);
const RANDOM_TEMPO_RANGE: (f32, f32) = (96.0, 150.0);

/// Whether a trigger comes from the sequencer or from auditioning a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    Sequenced,
    Audition,
}

/// Outcome of loading a pack directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackImport {
    pub loaded: usize,
    /// Skipped paths, unreadable files and header problems, in that order.
    pub issues: Vec<String>,
}

pub struct DrumEngine {
    config: EngineConfig,
    clock: Box<dyn AudioClock>,
    rng: StdRng,

    scheduler: LookaheadScheduler,
    range: SequenceRange,
    looping: bool,
    shuffle: bool,
    rec_armed: bool,

    pattern: Pattern,
    banks: PatternBanks,
    automation: StepAutomation,
    transports: [VoiceTransport; VOICE_COUNT],

    tones: [Knob<ToneParams>; VOICE_COUNT],
    levels: [Knob<f32>; VOICE_COUNT],
    mutes: [bool; VOICE_COUNT],
    tempo: Knob<f32>,
    volume: Knob<f32>,
    selected: Voice,

    samples: SampleBank,
    active_slots: [usize; VOICE_COUNT],
    decoder: Box<dyn SampleDecoder>,
    fetcher: Box<dyn SampleFetcher>,
    fetch_tx: Sender<FetchCompletion>,
    fetch_rx: Receiver<FetchCompletion>,
    next_ticket: u64,

    triggers: EventQueue<TriggerEvent>,
    playheads: EventQueue<usize>,
    playhead: Option<usize>,
}

impl DrumEngine {
    pub fn new(config: EngineConfig, clock: impl AudioClock + 'static) -> Self {
        let config = config.sanitized();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let pattern = generate_groove(&mut rng);
        let (fetch_tx, fetch_rx) = crossbeam_channel::unbounded();

        info!(
            sample_rate = config.sample_rate,
            schedule_ahead = config.schedule_ahead,
            hits = pattern.hit_count(),
            "drum engine ready"
        );

        Self {
            scheduler: LookaheadScheduler::new(config.schedule_ahead, config.start_delay),
            config,
            clock: Box::new(clock),
            rng,
            range: SequenceRange::default(),
            looping: true,
            shuffle: false,
            rec_armed: false,
            pattern,
            banks: PatternBanks::new(pattern),
            automation: StepAutomation::new(),
            transports: [VoiceTransport::default(); VOICE_COUNT],
            tones: [Knob::new(ToneParams::default()); VOICE_COUNT],
            levels: [Knob::new(TRACK_LEVEL.default); VOICE_COUNT],
            mutes: [false; VOICE_COUNT],
            tempo: Knob::new(TEMPO.default),
            volume: Knob::new(VOLUME.default),
            selected: Voice::Kick,
            samples: SampleBank::new(),
            active_slots: [0; VOICE_COUNT],
            decoder: Box::new(HoundDecoder),
            fetcher: Box::new(FileFetcher),
            fetch_tx,
            fetch_rx,
            next_ticket: 0,
            triggers: EventQueue::new(),
            playheads: EventQueue::new(),
            playhead: None,
        }
    }

    pub fn with_fetcher(mut self, fetcher: impl SampleFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    pub fn with_decoder(mut self, decoder: impl SampleDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    // ── transport ───────────────────────────────────────────────────

    /// Start from the sequence start, a short delay from now.
    ///
    /// Raw samples are decoded and path-backed samples are requested up
    /// front so the first pass has as many real samples as possible.
    pub fn start(&mut self) {
        self.prepare_samples();
        let now = self.clock.now();
        self.playheads.clear();
        self.scheduler.start(now, self.range.start());
        info!(now, step = self.range.start(), tempo = self.tempo.live(), "transport started");
    }

    /// Halt scheduling and drop pending playhead updates. Already queued
    /// triggers stay queued.
    pub fn pause(&mut self) {
        self.scheduler.pause();
        self.playheads.clear();
        info!(step = self.scheduler.current_step(), "transport paused");
    }

    /// Pause, rewind to step 0 and return every automated value home.
    pub fn stop(&mut self) {
        self.pause();
        self.scheduler.stop();
        self.playhead = None;
        self.tones.iter_mut().for_each(Knob::restore);
        self.levels.iter_mut().for_each(Knob::restore);
        self.tempo.restore();
        self.volume.restore();
        info!("transport stopped");
    }

    pub fn state(&self) -> TransportState {
        self.scheduler.state()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Collect finished fetches, then schedule every step inside the
    /// look-ahead window. Returns the number of steps scheduled.
    pub fn tick(&mut self) -> usize {
        self.drain_fetches();

        let now = self.clock.now();
        let mut scheduled = 0;
        while let Some((step, time)) = self.scheduler.due(now) {
            self.apply_automation(step);
            let duration = step_duration(self.tempo.live() as f64);
            self.schedule_step(step, time, duration);
            self.playheads.push(time, step);
            scheduled += 1;

            if self.scheduler.advance(duration, self.shuffle, &self.range, self.looping) == Advance::Finished {
                info!(step, "reached the sequence end with loop off, pausing");
                break;
            }
        }
        scheduled
    }

    /// Move the visible playhead to the latest step whose time has come.
    pub fn poll_playhead(&mut self) -> Option<usize> {
        let now = self.clock.now();
        while let Some((_, step)) = self.playheads.pop_due(now) {
            self.playhead = Some(step);
        }
        self.playhead
    }

    pub fn playhead(&self) -> Option<usize> {
        self.playhead
    }

    /// Step the scheduler will schedule next.
    pub fn current_step(&self) -> usize {
        self.scheduler.current_step()
    }

    pub fn last_scheduled_step(&self) -> Option<usize> {
        self.scheduler.last_scheduled()
    }

    /// Every queued trigger, earliest first.
    pub fn take_triggers(&mut self) -> Vec<TriggerEvent> {
        self.triggers.drain()
    }

    pub fn pending_triggers(&self) -> usize {
        self.triggers.len()
    }

    fn schedule_step(&mut self, step: usize, time: f64, duration: f64) {
        if !self.range.contains(step) {
            return;
        }

        for voice in Voice::ALL {
            let index = voice.index();
            let transport = self.transports[index];
            let gate = VoiceGate {
                hit: self.pattern.get(voice, step),
                muted: self.mutes[index],
                transport: &transport,
            };
            if !gate.eligible(step) || !gate.passes(self.rng.gen::<f32>()) {
                continue;
            }

            let plan = RepeatPlan::new(step, duration, &transport, self.levels[index].live());
            if !plan.is_audible() {
                continue;
            }

            let (slot, source) = self.resolve_source(voice, Playback::Sequenced);
            let tone = self.tones[index].live();
            trace!(%voice, step, time, repeats = plan.repeats, level = plan.level, "voice fires");

            for (repeat, at) in plan.times(time) {
                self.triggers.push(
                    at,
                    TriggerEvent {
                        voice,
                        step: Some(step),
                        time: at,
                        repeat,
                        level: plan.level,
                        accent: plan.accent,
                        compensation: plan.compensation,
                        slot,
                        tone,
                        source: source.clone(),
                    },
                );
            }
        }
    }

    fn apply_automation(&mut self, step: usize) {
        for (target, value) in self.automation.entries(step) {
            match target {
                AutomationTarget::Tone { voice, param } => {
                    self.tones[voice.index()].live_mut().set(param, value);
                }
                AutomationTarget::Level { voice } => {
                    self.levels[voice.index()].set_live(TRACK_LEVEL.clamp_snap(value));
                }
                AutomationTarget::Tempo => self.tempo.set_live(TEMPO.clamp_snap(value)),
                AutomationTarget::Volume => self.volume.set_live(VOLUME.clamp_snap(value)),
            }
        }
    }

    /// Record a knob move against the current step while armed and playing.
    fn record(&mut self, target: AutomationTarget, value: f32) {
        if !self.rec_armed || !self.is_running() {
            return;
        }
        if let Some(step) = self.playhead.or(self.scheduler.last_scheduled()) {
            debug!(step, ?target, value, "automation recorded");
            self.automation.record(step, target, value);
        }
    }

    // ── pattern ─────────────────────────────────────────────────────

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn hit(&self, voice: Voice, step: usize) -> bool {
        self.pattern.get(voice, step)
    }

    pub fn set_hit(&mut self, voice: Voice, step: usize, on: bool) {
        self.pattern.set(voice, step, on);
    }

    pub fn toggle_hit(&mut self, voice: Voice, step: usize) -> bool {
        self.pattern.toggle(voice, step)
    }

    /// Replace the live grid and the current bank's copy of it.
    pub fn replace_pattern(&mut self, pattern: Pattern) {
        self.pattern = pattern;
        self.banks.store(&self.pattern);
    }

    pub fn pattern_bank(&self) -> usize {
        self.banks.current()
    }

    /// Save the live grid into the current bank and load `index`.
    pub fn set_pattern_bank(&mut self, index: usize) {
        let from = self.banks.current();
        self.pattern = self.banks.switch(&self.pattern, index);
        info!(from, to = self.banks.current(), "pattern bank switched");
    }

    pub fn clear_pattern(&mut self) {
        self.pattern.clear();
        self.banks.store(&self.pattern);
        self.automation.clear();
    }

    pub fn randomize_pattern(&mut self) {
        self.pattern = generate_groove(&mut self.rng);
        self.banks.store(&self.pattern);
        self.automation.clear();
        debug!(hits = self.pattern.hit_count(), "pattern randomized");
    }

    /// Reverse every row and the automation with it.
    pub fn reverse_pattern(&mut self) {
        self.pattern.reverse();
        self.automation.reverse();
    }

    pub fn automation(&self) -> &StepAutomation {
        &self.automation
    }

    pub fn clear_automation(&mut self) {
        self.automation.clear();
    }

    // ── windows and trigger modifiers ───────────────────────────────

    pub fn voice_transport(&self, voice: Voice) -> &VoiceTransport {
        &self.transports[voice.index()]
    }

    /// 0-based inclusive window, clamped to the grid and kept ordered.
    pub fn set_voice_window(&mut self, voice: Voice, start: i64, end: i64) {
        self.transports[voice.index()].set_window(start, end);
    }

    pub fn set_voice_probability(&mut self, voice: Voice, probability: f32) -> f32 {
        self.transports[voice.index()].set_probability(probability)
    }

    pub fn set_voice_ratchet(&mut self, voice: Voice, repeats: i64) -> u8 {
        self.transports[voice.index()].set_ratchet(repeats)
    }

    pub fn set_voice_accent(&mut self, voice: Voice, accent: f32) -> f32 {
        self.transports[voice.index()].set_accent(accent)
    }

    pub fn sequence_range(&self) -> SequenceRange {
        self.range
    }

    pub fn last_step(&self) -> usize {
        self.range.last_step()
    }

    /// 1-based step number, clamped to 1..16 and at most the end.
    pub fn set_sequence_start(&mut self, number: i64) {
        self.range.set_start(number);
        self.keep_cursor_in_range();
    }

    /// 1-based step number, clamped to 1..16 and at least the start.
    pub fn set_sequence_end(&mut self, number: i64) {
        self.range.set_end(number);
        self.keep_cursor_in_range();
    }

    fn keep_cursor_in_range(&mut self) {
        self.scheduler.clamp_into(&self.range);
        if self.playhead.is_some_and(|step| !self.range.contains(step)) {
            self.playhead = None;
        }
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn set_loop(&mut self, on: bool) {
        self.looping = on;
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.shuffle = on;
    }

    pub fn rec_armed(&self) -> bool {
        self.rec_armed
    }

    pub fn set_rec_armed(&mut self, on: bool) {
        self.rec_armed = on;
    }

    // ── mixer ───────────────────────────────────────────────────────

    /// Live tempo, including automation.
    pub fn tempo(&self) -> f32 {
        self.tempo.live()
    }

    pub fn set_tempo(&mut self, bpm: f32) -> f32 {
        let bpm = TEMPO.clamp_snap(bpm);
        self.tempo.set(bpm);
        self.record(AutomationTarget::Tempo, bpm);
        bpm
    }

    pub fn volume(&self) -> f32 {
        self.volume.live()
    }

    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let volume = VOLUME.clamp_snap(volume);
        self.volume.set(volume);
        self.record(AutomationTarget::Volume, volume);
        volume
    }

    pub fn track_level(&self, voice: Voice) -> f32 {
        self.levels[voice.index()].live()
    }

    pub fn set_track_level(&mut self, voice: Voice, level: f32) -> f32 {
        let level = TRACK_LEVEL.clamp_snap(level);
        self.levels[voice.index()].set(level);
        self.record(AutomationTarget::Level { voice }, level);
        level
    }

    pub fn is_muted(&self, voice: Voice) -> bool {
        self.mutes[voice.index()]
    }

    pub fn set_mute(&mut self, voice: Voice, muted: bool) {
        self.mutes[voice.index()] = muted;
    }

    // ── tone ────────────────────────────────────────────────────────

    /// Live tone, including automation.
    pub fn tone(&self, voice: Voice) -> ToneParams {
        self.tones[voice.index()].live()
    }

    /// Tone as last set explicitly.
    pub fn home_tone(&self, voice: Voice) -> ToneParams {
        self.tones[voice.index()].home()
    }

    /// Clamp, snap and store; returns the stored value.
    pub fn set_tone_param(&mut self, voice: Voice, param: ToneParam, value: f32) -> f32 {
        let knob = &mut self.tones[voice.index()];
        let stored = knob.home_mut().set(param, value);
        knob.live_mut().set(param, stored);
        self.record(AutomationTarget::Tone { voice, param }, stored);
        stored
    }

    /// Keep whatever automation left in the live tone as the new home.
    pub fn commit_live_tone(&mut self, voice: Voice) {
        self.tones[voice.index()].commit();
    }

    pub fn selected_track(&self) -> Voice {
        self.selected
    }

    pub fn select_track(&mut self, voice: Voice) {
        self.selected = voice;
    }

    pub fn selected_tone(&self) -> ToneParams {
        self.tone(self.selected)
    }

    // ── sample slots ────────────────────────────────────────────────

    pub fn samples(&self) -> &SampleBank {
        &self.samples
    }

    pub fn sample(&self, voice: Voice, slot: usize) -> Option<&SampleRecord> {
        self.samples.get(voice, slot)
    }

    pub fn slot_status(&self, voice: Voice, slot: usize) -> SlotStatus {
        self.samples.status(voice, slot)
    }

    /// The playback slot as assigned, always in the core range.
    pub fn active_slot(&self, voice: Voice) -> usize {
        self.active_slots[voice.index()]
    }

    /// The slot that would actually sound right now.
    pub fn resolved_slot(&self, voice: Voice) -> usize {
        self.samples.resolve_playback_slot(voice, self.active_slots[voice.index()])
    }

    pub fn assign_playback_slot(&mut self, voice: Voice, slot: usize) -> usize {
        let slot = normalize_playback_slot(slot);
        self.active_slots[voice.index()] = slot;
        slot
    }

    /// Store container bytes in a slot. The header is validated now;
    /// a sample that breaks the pack format is still stored, flagged invalid.
    pub fn load_sample_bytes(
        &mut self,
        voice: Voice,
        slot: usize,
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> ValidationReport {
        let bytes: Arc<[u8]> = bytes.into();
        let record = SampleRecord::from_bytes(name, bytes.clone());
        let report = record.report().clone();

        if report.is_ok() {
            info!(%voice, slot, bytes = bytes.len(), name = record.name(), "sample loaded");
        } else {
            warn!(%voice, slot, name = record.name(), issues = %report.summary(), "sample stored with issues");
        }
        self.samples.store(voice, slot, record);
        report
    }

    /// Store a sample that is read from `path` the first time it is needed.
    pub fn register_external_sample(&mut self, voice: Voice, slot: usize, name: impl Into<String>, path: impl Into<PathBuf>) {
        let record = SampleRecord::external(name, path);
        debug!(%voice, slot, path = ?record.path(), "external sample registered");
        self.samples.store(voice, slot, record);
    }

    pub fn clear_slot(&mut self, voice: Voice, slot: usize) {
        self.samples.clear(voice, slot);
    }

    pub fn clear_samples(&mut self) {
        self.samples.clear_all();
    }

    /// Decode every raw sample and request every path-backed one.
    pub fn prepare_samples(&mut self) {
        let decoder = self.decoder.as_ref();
        let mut wanted = Vec::new();
        for (voice, slot, record) in self.samples.iter_mut() {
            if !record.is_playable() {
                continue;
            }
            match record.prepare(decoder) {
                Readiness::NeedsFetch(path) => wanted.push((voice, slot, path)),
                Readiness::DecodeFailed => warn!(%voice, slot, "sample failed to decode"),
                _ => {}
            }
        }
        for (voice, slot, path) in wanted {
            self.start_fetch(voice, slot, &path);
        }
    }

    /// Play a voice right now, outside the sequence.
    ///
    /// A path-backed sample that is not decoded yet is auditioned by path
    /// rather than through the synth.
    pub fn audition(&mut self, voice: Voice) -> TriggerEvent {
        let (slot, source) = self.resolve_source(voice, Playback::Audition);
        let now = self.clock.now();
        let event = TriggerEvent {
            voice,
            step: None,
            time: now,
            repeat: 0,
            level: self.levels[voice.index()].live(),
            accent: 1.0,
            compensation: 1.0,
            slot,
            tone: self.tones[voice.index()].live(),
            source,
        };
        self.triggers.push(now, event.clone());
        event
    }

    fn resolve_source(&mut self, voice: Voice, playback: Playback) -> (usize, TriggerSource) {
        let slot = self.samples.resolve_playback_slot(voice, self.active_slots[voice.index()]);
        let readiness = match self.samples.get_mut(voice, slot) {
            Some(record) if record.is_playable() => record.prepare(self.decoder.as_ref()),
            _ => return (slot, TriggerSource::Internal),
        };

        let pending = |path: PathBuf| match playback {
            Playback::Sequenced => TriggerSource::Internal,
            Playback::Audition => TriggerSource::ExternalPath(path),
        };

        let source = match readiness {
            Readiness::Ready(buffer) => TriggerSource::Sample(buffer),
            Readiness::DecodeFailed => {
                warn!(%voice, slot, "sample failed to decode, hit is silent");
                TriggerSource::Silence
            }
            Readiness::NeedsFetch(path) => {
                self.start_fetch(voice, slot, &path);
                pending(path)
            }
            Readiness::Fetching(path) => pending(path),
            Readiness::Unavailable => TriggerSource::Internal,
        };
        (slot, source)
    }

    fn start_fetch(&mut self, voice: Voice, slot: usize, path: &Path) {
        let ticket = FetchTicket(self.next_ticket);
        let marked = self
            .samples
            .get_mut(voice, slot)
            .is_some_and(|record| record.mark_in_flight(ticket));
        if !marked {
            return;
        }
        self.next_ticket += 1;
        debug!(%voice, slot, ticket = ticket.0, path = %path.display(), "fetching sample");
        self.fetcher.fetch(path, FetchResponder::new(ticket, self.fetch_tx.clone()));
    }

    fn drain_fetches(&mut self) {
        while let Ok(completion) = self.fetch_rx.try_recv() {
            self.complete_fetch(completion.ticket, completion.result);
        }
    }

    /// Apply a finished fetch. Returns `false` for tickets nothing waits on,
    /// such as a fetch for a slot that has since been replaced.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<u8>, FetchError>) -> bool {
        let decoder = self.decoder.as_ref();
        let Some((voice, slot, record)) = self.samples.iter_mut().find(|(_, _, record)| record.awaits(ticket)) else {
            debug!(ticket = ticket.0, "fetch result for a sample that is gone");
            return false;
        };

        if let Err(err) = &result {
            warn!(%voice, slot, error = %err, "sample fetch failed");
        }
        record.finish_fetch(result, decoder);
        match record.status() {
            SlotStatus::Ready => info!(%voice, slot, name = record.name(), "external sample ready"),
            status => warn!(%voice, slot, ?status, issues = %record.report().summary(), "external sample unusable"),
        }
        true
    }

    // ── packs ───────────────────────────────────────────────────────

    /// Read every file of an A-G pack into its slot.
    pub fn import_pack_dir(&mut self, root: &Path) -> Result<PackImport, PackError> {
        let plan = pack::scan_pack_dir(root)?;
        let mut result = PackImport {
            loaded: 0,
            issues: plan.issues,
        };

        for entry in plan.entries {
            let bytes = match std::fs::read(&entry.path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    result.issues.push(format!("{}: {}", entry.relative_path, err));
                    continue;
                }
            };
            let name = entry
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| entry.relative_path.clone());
            let report = self.load_sample_bytes(entry.voice, entry.slot, name, bytes);
            if !report.is_ok() {
                result.issues.push(format!(
                    "{}: Invalid WAV for {}{}: {}",
                    entry.relative_path,
                    entry.voice.letter(),
                    entry.slot,
                    report.summary()
                ));
            }
            result.loaded += 1;
        }

        info!(root = %root.display(), loaded = result.loaded, issues = result.issues.len(), "pack imported");
        Ok(result)
    }

    /// Register the factory-range files of a pack as path-backed. Nothing is
    /// read until a sample is first played or the transport starts.
    pub fn register_factory_pack(&mut self, root: &Path) -> Result<usize, PackError> {
        let plan = pack::scan_pack_dir(root)?;
        for issue in &plan.issues {
            debug!(issue = %issue, "factory pack entry skipped");
        }
        let mut count = 0;
        for entry in plan.entries {
            if entry.slot >= FACTORY_SLOTS {
                debug!(path = %entry.relative_path, "outside the factory slots, skipped");
                continue;
            }
            count += 1;
            let name = entry
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| entry.relative_path.clone());
            self.register_external_sample(entry.voice, entry.slot, name, entry.path);
        }
        info!(root = %root.display(), samples = count, "factory pack registered");
        Ok(count)
    }

    pub fn validate_pack(&self) -> PackReport {
        pack::validate_pack(&self.samples)
    }

    // ── randomizers ─────────────────────────────────────────────────

    /// New playback slots, levels and tone for every voice.
    pub fn randomize_kit(&mut self) {
        for voice in Voice::ALL {
            let index = voice.index();
            let loaded = self.samples.playable_core_slots(voice);
            self.active_slots[index] = if loaded.is_empty() {
                self.rng.gen_range(0..CORE_SLOTS)
            } else {
                loaded[self.rng.gen_range(0..loaded.len())]
            };

            let (low, high) = KIT_LEVEL_RANGE;
            self.levels[index].set(TRACK_LEVEL.clamp_snap(self.rng.gen_range(low..=high)));

            let mut tone = self.tones[index].home();
            for (param, low, high) in KIT_TONE_RANGES {
                tone.set(param, self.rng.gen_range(low..=high));
            }
            self.tones[index].set(tone);
        }
        debug!(slots = ?self.active_slots, "kit randomized");
    }

    /// Fresh groove, fresh kit and a new tempo. Probability, ratchet and
    /// shuffle go back to plain.
    pub fn randomize_all(&mut self) {
        for transport in &mut self.transports {
            transport.set_probability(1.0);
            transport.set_ratchet(1);
        }
        self.shuffle = false;
        self.randomize_pattern();
        self.randomize_kit();
        let (low, high) = RANDOM_TEMPO_RANGE;
        let bpm = self.rng.gen_range(low..=high).round();
        self.tempo.set(TEMPO.clamp_snap(bpm));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{ManualClock, NoFetcher};
    use crate::wav::metadata::fixtures::wav_bytes;

    fn engine() -> (DrumEngine, ManualClock) {
        let clock = ManualClock::new();
        let mut engine = DrumEngine::new(EngineConfig::default().with_seed(9), clock.clone());
        engine.clear_pattern();
        (engine, clock)
    }

    fn pcm(samples: usize) -> Vec<u8> {
        let body: Vec<i16> = (0..samples).map(|i| ((i % 50) as i16 - 25) * 800).collect();
        wav_bytes(1, 1, 48_000, 16, &body, &[])
    }

    #[test]
    fn default_pattern_is_a_groove_copied_to_every_bank() {
        let clock = ManualClock::new();
        let mut engine = DrumEngine::new(EngineConfig::default().with_seed(4), clock);
        let groove = *engine.pattern();
        assert!(groove.get(Voice::Kick, 0));
        for bank in 0..crate::PATTERN_BANKS {
            engine.set_pattern_bank(bank);
            assert_eq!(*engine.pattern(), groove);
        }
    }

    #[test]
    fn first_tick_schedules_inside_window() {
        let (mut engine, _clock) = engine();
        engine.set_hit(Voice::Kick, 0, true);
        engine.start();
        assert_eq!(engine.tick(), 1);

        let events = engine.take_triggers();
        assert_eq!(events.len(), 1);
        assert!((events[0].time - 0.04).abs() < 1e-12);
        assert!(matches!(events[0].source, TriggerSource::Internal));
    }

    #[test]
    fn muted_voice_is_skipped() {
        let (mut engine, _clock) = engine();
        engine.set_hit(Voice::Snare, 0, true);
        engine.set_mute(Voice::Snare, true);
        engine.start();
        engine.tick();
        assert_eq!(engine.pending_triggers(), 0);
    }

    #[test]
    fn zero_probability_never_fires() {
        let (mut engine, clock) = engine();
        for step in 0..16 {
            engine.set_hit(Voice::HiHat, step, true);
        }
        engine.set_voice_probability(Voice::HiHat, 0.0);
        engine.start();
        for _ in 0..80 {
            clock.advance(0.025);
            engine.tick();
        }
        assert!(engine.take_triggers().iter().all(|e| e.voice != Voice::HiHat));
    }

    #[test]
    fn pause_stops_scheduling_and_clears_playheads() {
        let (mut engine, clock) = engine();
        engine.start();
        engine.tick();
        engine.pause();
        clock.advance(1.0);
        assert_eq!(engine.tick(), 0);
        assert_eq!(engine.poll_playhead(), None);
    }

    #[test]
    fn playhead_follows_the_clock() {
        let (mut engine, clock) = engine();
        engine.start();
        engine.tick();
        assert_eq!(engine.poll_playhead(), None, "first step is 40ms away");
        clock.set(0.05);
        engine.tick();
        assert_eq!(engine.poll_playhead(), Some(0));
        clock.set(0.2);
        engine.tick();
        assert_eq!(engine.poll_playhead(), Some(1));
    }

    #[test]
    fn automation_records_and_replays_live_only() {
        let (mut engine, clock) = engine();
        engine.set_rec_armed(true);
        engine.start();
        clock.set(0.05);
        engine.tick();
        engine.poll_playhead();

        engine.set_tone_param(Voice::Kick, ToneParam::Cutoff, 900.0);
        assert_eq!(
            engine.automation().value(0, AutomationTarget::Tone { voice: Voice::Kick, param: ToneParam::Cutoff }),
            Some(900.0)
        );

        engine.set_rec_armed(false);
        engine.set_tone_param(Voice::Kick, ToneParam::Cutoff, 4000.0);
        // next pass over step 0 replays the recorded value into the live tone
        for _ in 0..100 {
            clock.advance(0.025);
            engine.tick();
        }
        assert_eq!(engine.tone(Voice::Kick).cutoff, 900.0);
        assert_eq!(engine.home_tone(Voice::Kick).cutoff, 4000.0);

        engine.stop();
        assert_eq!(engine.tone(Voice::Kick).cutoff, 4000.0);
    }

    #[test]
    fn nothing_is_recorded_when_stopped() {
        let (mut engine, _clock) = engine();
        engine.set_rec_armed(true);
        engine.set_tempo(140.0);
        assert!(engine.automation().is_empty());
    }

    #[test]
    fn commit_keeps_automated_tone() {
        let (mut engine, _clock) = engine();
        engine.tones[0].live_mut().set(ToneParam::Drive, 0.5);
        engine.commit_live_tone(Voice::Kick);
        assert_eq!(engine.home_tone(Voice::Kick).drive, 0.5);
    }

    #[test]
    fn sequence_bounds_move_the_cursor() {
        let (mut engine, _clock) = engine();
        engine.set_sequence_start(5);
        assert_eq!(engine.current_step(), 4);
        engine.set_sequence_end(2);
        assert_eq!(engine.sequence_range().end(), 4);
        assert_eq!(engine.last_step(), 5);
    }

    #[test]
    fn raw_sample_decodes_at_trigger_time() {
        let (mut engine, _clock) = engine();
        engine.load_sample_bytes(Voice::Clap, 0, "0.wav", pcm(4_800));
        engine.set_hit(Voice::Clap, 0, true);
        assert_eq!(engine.slot_status(Voice::Clap, 0), SlotStatus::Pending);

        engine.scheduler.start(0.0, 0);
        engine.tick();
        let events = engine.take_triggers();
        assert!(matches!(events[0].source, TriggerSource::Sample(ref b) if b.len() == 4_800));
        assert_eq!(engine.slot_status(Voice::Clap, 0), SlotStatus::Ready);
    }

    #[test]
    fn failed_decode_is_silent_once_then_synth() {
        let (mut engine, _clock) = engine();
        let mut broken = pcm(16);
        broken[36..40].copy_from_slice(b"junk");
        engine.load_sample_bytes(Voice::Kick, 0, "0.wav", broken);

        let first = engine.audition(Voice::Kick);
        assert!(matches!(first.source, TriggerSource::Silence));
        let second = engine.audition(Voice::Kick);
        assert!(matches!(second.source, TriggerSource::Internal));
        assert_eq!(engine.slot_status(Voice::Kick, 0), SlotStatus::Failed);
    }

    #[test]
    fn external_sample_falls_back_while_fetching() {
        let clock = ManualClock::new();
        let mut engine = DrumEngine::new(EngineConfig::default().with_seed(1), clock).with_fetcher(NoFetcher);
        engine.clear_pattern();
        engine.register_external_sample(Voice::Cymbal, 0, "0.wav", "factory/G/0.wav");

        let audition = engine.audition(Voice::Cymbal);
        assert!(matches!(audition.source, TriggerSource::ExternalPath(_)));

        // NoFetcher answers with a failure, applied on the next tick
        engine.tick();
        assert_eq!(engine.slot_status(Voice::Cymbal, 0), SlotStatus::Failed);
        assert!(matches!(engine.audition(Voice::Cymbal).source, TriggerSource::Internal));
    }

    #[test]
    fn manual_fetch_completion_decodes() {
        struct Parked;
        impl SampleFetcher for Parked {
            fn fetch(&self, _path: &Path, _responder: FetchResponder) {}
        }

        let clock = ManualClock::new();
        let mut engine = DrumEngine::new(EngineConfig::default().with_seed(1), clock).with_fetcher(Parked);
        engine.register_external_sample(Voice::Perc, 3, "3.wav", "p/C/3.wav");
        engine.assign_playback_slot(Voice::Perc, 3);
        engine.audition(Voice::Perc);

        assert!(!engine.complete_fetch(FetchTicket(99), Ok(pcm(8))));
        assert!(engine.complete_fetch(FetchTicket(0), Ok(pcm(480))));
        assert_eq!(engine.slot_status(Voice::Perc, 3), SlotStatus::Ready);
        assert!(matches!(engine.audition(Voice::Perc).source, TriggerSource::Sample(_)));
    }

    #[test]
    fn invalid_sample_is_stored_but_skipped() {
        let (mut engine, _clock) = engine();
        let report = engine.load_sample_bytes(Voice::Snare, 0, "0.wav", wav_bytes(1, 2, 48_000, 16, &[0; 64], &[]));
        assert!(!report.is_ok());
        assert_eq!(engine.slot_status(Voice::Snare, 0), SlotStatus::Invalid);
        assert!(matches!(engine.audition(Voice::Snare).source, TriggerSource::Internal));

        engine.load_sample_bytes(Voice::Snare, 2, "2.wav", pcm(100));
        assert_eq!(engine.resolved_slot(Voice::Snare), 2);
    }

    #[test]
    fn randomize_kit_prefers_loaded_slots() {
        let (mut engine, _clock) = engine();
        engine.load_sample_bytes(Voice::HiHat, 6, "6.wav", pcm(100));
        engine.randomize_kit();
        assert_eq!(engine.active_slot(Voice::HiHat), 6);
        for voice in Voice::ALL {
            let level = engine.track_level(voice);
            assert!((0.62..=0.96).contains(&level));
            let tone = engine.tone(voice);
            assert!((-4.0..=4.0).contains(&tone.pitch));
            assert!((1800.0..=13_600.0).contains(&tone.cutoff));
            assert!(engine.active_slot(voice) < CORE_SLOTS);
        }
    }

    #[test]
    fn randomize_all_resets_modifiers() {
        let (mut engine, _clock) = engine();
        engine.set_voice_ratchet(Voice::Kick, 3);
        engine.set_shuffle(true);
        engine.randomize_all();
        assert_eq!(engine.voice_transport(Voice::Kick).ratchet(), 1);
        assert!(!engine.shuffle());
        assert!((96.0..=150.0).contains(&engine.tempo()));
        assert!(engine.pattern().get(Voice::Kick, 0));
    }
}
