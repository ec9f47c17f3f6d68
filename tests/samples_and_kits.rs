mod common;

use std::time::{Duration, Instant};

use bullfrog_drums::bank::SlotStatus;
use bullfrog_drums::io::ManualClock;
use bullfrog_drums::kit::{export_kit, import_kit, KitError};
use bullfrog_drums::{DrumEngine, EngineConfig, ToneParam, TriggerSource, Voice};
use common::{quiet_engine, tone_samples, wav_bytes, write_wav};

#[test]
fn pack_directory_fills_slots_and_reports_skips() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let mono = tone_samples(960);
    write_wav(&root.join("A/0.wav"), 1, 48_000, &mono);
    write_wav(&root.join("A/5.wav"), 1, 48_000, &mono);
    write_wav(&root.join("B/2.wav"), 1, 44_100, &mono);
    write_wav(&root.join("H/0.wav"), 1, 48_000, &mono);
    write_wav(&root.join("G/kick.wav"), 1, 48_000, &mono);

    let (mut engine, _clock) = quiet_engine(20);
    let import = engine.import_pack_dir(root).unwrap();

    assert_eq!(import.loaded, 3);
    assert_eq!(engine.slot_status(Voice::Kick, 0), SlotStatus::Pending);
    assert_eq!(engine.slot_status(Voice::Kick, 5), SlotStatus::Pending);
    assert_eq!(engine.slot_status(Voice::Snare, 2), SlotStatus::Invalid);
    assert!(engine.sample(Voice::Cymbal, 0).is_none());

    let issues = import.issues.join("\n");
    assert!(issues.contains("H/0.wav skipped (H is reserved for live-recorded samples)."), "{issues}");
    assert!(issues.contains("G/kick.wav skipped (filename must be numeric)."), "{issues}");
    assert!(issues.contains("B/2.wav: Invalid WAV for B2: sample rate 44100Hz (must be 48000Hz)"), "{issues}");

    let report = engine.validate_pack();
    assert!(report.issues.contains(&"A: slots 0-9 have 2/10 (need 10).".to_string()));
}

#[test]
fn imported_samples_decode_on_start() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(&dir.path().join("C/4.wav"), 1, 48_000, &tone_samples(960));

    let (mut engine, clock) = quiet_engine(21);
    engine.import_pack_dir(dir.path()).unwrap();
    engine.assign_playback_slot(Voice::Perc, 4);
    engine.set_hit(Voice::Perc, 0, true);
    engine.start();
    assert_eq!(engine.slot_status(Voice::Perc, 4), SlotStatus::Ready);

    clock.set(0.05);
    engine.tick();
    let events = engine.take_triggers();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].slot, 4);
    match &events[0].source {
        TriggerSource::Sample(buffer) => assert_eq!(buffer.len(), 960),
        other => panic!("expected the sample, got {other:?}"),
    }
}

#[test]
fn factory_samples_load_lazily_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(&dir.path().join("F/1.wav"), 1, 48_000, &tone_samples(480));
    write_wav(&dir.path().join("F/30.wav"), 1, 48_000, &tone_samples(480));

    let clock = ManualClock::new();
    let mut engine = DrumEngine::new(EngineConfig::default().with_seed(22), clock);
    engine.clear_pattern();
    assert_eq!(engine.register_factory_pack(dir.path()).unwrap(), 1);
    assert_eq!(engine.slot_status(Voice::HiHat, 1), SlotStatus::External);
    assert!(engine.sample(Voice::HiHat, 30).is_none(), "user range is left alone");

    engine.assign_playback_slot(Voice::HiHat, 1);
    match engine.audition(Voice::HiHat).source {
        TriggerSource::ExternalPath(path) => assert!(path.ends_with("F/1.wav")),
        other => panic!("expected a path audition, got {other:?}"),
    }

    let deadline = Instant::now() + Duration::from_secs(5);
    while engine.slot_status(Voice::HiHat, 1) != SlotStatus::Ready {
        assert!(Instant::now() < deadline, "fetch never completed");
        std::thread::sleep(Duration::from_millis(5));
        engine.tick();
    }
    assert!(matches!(engine.audition(Voice::HiHat).source, TriggerSource::Sample(_)));
}

#[test]
fn kit_round_trip_restores_the_instrument() {
    let (mut source, _clock) = quiet_engine(23);
    source.set_tempo(133.0);
    source.set_volume(0.5);
    source.set_hit(Voice::Kick, 0, true);
    source.set_hit(Voice::Cymbal, 15, true);
    source.set_track_level(Voice::Snare, 0.4);
    source.set_tone_param(Voice::Clap, ToneParam::Cutoff, 2400.0);
    source.load_sample_bytes(Voice::Abstract, 3, "3.wav", wav_bytes(1, 48_000, &tone_samples(240)));
    source.load_sample_bytes(Voice::Abstract, 41, "41.wav", wav_bytes(2, 48_000, &tone_samples(240)));
    source.assign_playback_slot(Voice::Abstract, 3);
    let json = export_kit(&source).unwrap();

    let (mut target, _clock) = quiet_engine(24);
    target.load_sample_bytes(Voice::Kick, 0, "0.wav", wav_bytes(1, 48_000, &tone_samples(240)));
    let summary = import_kit(&mut target, &json).unwrap();

    assert_eq!(summary.samples, 2);
    assert_eq!(summary.invalid, 1);
    assert_eq!(target.tempo(), 133.0);
    assert!((target.volume() - 0.5).abs() < 1e-6);
    assert_eq!(target.pattern(), source.pattern());
    assert!((target.track_level(Voice::Snare) - 0.4).abs() < 1e-6);
    assert_eq!(target.tone(Voice::Clap).get(ToneParam::Cutoff), 2400.0);
    assert_eq!(target.active_slot(Voice::Abstract), 3);
    assert!(target.sample(Voice::Kick, 0).is_none(), "banks are replaced, not merged");
    assert_eq!(target.slot_status(Voice::Abstract, 41), SlotStatus::Invalid);
    assert_eq!(
        target.sample(Voice::Abstract, 3).and_then(|s| s.bytes()),
        source.sample(Voice::Abstract, 3).and_then(|s| s.bytes())
    );
}

#[test]
fn broken_kits_leave_the_engine_untouched() {
    let (mut engine, _clock) = quiet_engine(25);
    engine.set_tempo(101.0);
    engine.set_hit(Voice::Snare, 4, true);

    assert!(matches!(import_kit(&mut engine, "{ nope"), Err(KitError::Json(_))));
    assert!(matches!(
        import_kit(&mut engine, r#"{"format": "someone-else-v1", "pattern": []}"#),
        Err(KitError::UnknownFormat(_))
    ));
    assert!(matches!(import_kit(&mut engine, r#"{"controls": {}}"#), Err(KitError::MissingPattern)));

    assert_eq!(engine.tempo(), 101.0);
    assert!(engine.hit(Voice::Snare, 4));
}

#[test]
fn undecodable_sample_is_dropped_and_the_kit_still_loads() {
    let (mut engine, _clock) = quiet_engine(25);
    engine.set_tempo(101.0);

    let bad_sample = r#"{
        "format": "bullfrog-drums-web-kit-v2",
        "controls": {"tempo": 160},
        "pattern": [[true]],
        "sampleBanks": [{"voice": "A", "slot": 0, "name": "0.wav", "data": "%%% not base64 %%%"}]
    }"#;
    let summary = import_kit(&mut engine, bad_sample).unwrap();
    assert_eq!(summary.samples, 0);
    assert!(engine.sample(Voice::Kick, 0).is_none());
    assert_eq!(engine.tempo(), 160.0);
    assert!(engine.hit(Voice::Kick, 0));
}

#[test]
fn legacy_kit_shares_one_tone_block() {
    let (mut engine, _clock) = quiet_engine(26);
    let legacy = r#"{
        "controls": {"tempo": 90, "volume": 0.7, "cutoff": 1200},
        "pattern": [[1, 0, 0, 0], [], [], [], [], [], [0, 0, "yes"]]
    }"#;
    let summary = import_kit(&mut engine, legacy).unwrap();

    assert_eq!(summary.samples, 0);
    assert_eq!(engine.tempo(), 90.0);
    assert!(engine.hit(Voice::Kick, 0));
    assert!(engine.hit(Voice::Cymbal, 2));
    for voice in Voice::ALL {
        assert_eq!(engine.tone(voice).get(ToneParam::Cutoff), 1200.0, "{voice:?}");
    }
}
