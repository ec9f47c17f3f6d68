//! Real-time playback through cpal.
//!
//! The audio callback owns the renderer and never locks. The main thread
//! runs the engine: every tick it schedules ahead, builds hits and pushes
//! them through an rtrb ring buffer.

use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, info, warn};

use bullfrog_drums::{
    io::FrameClock,
    render::{Hit, HitBuilder, MasterVolume, Renderer, DEFAULT_NOISE_SEED},
    DrumEngine, MAX_BLOCK_SIZE,
};

use super::{setup, KitArgs};

const HIT_QUEUE: usize = 512;

pub fn run(args: &KitArgs, seconds: Option<f64>) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let stream_config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = stream_config.sample_rate().0;
    let channels = stream_config.channels() as usize;
    let config = setup::load_config(args)?.with_sample_rate(sample_rate);

    let clock = FrameClock::new(sample_rate as f64);
    let mut engine = DrumEngine::new(config.clone(), clock.clone());
    setup::prepare(&mut engine, args)?;

    let volume = MasterVolume::new(engine.volume());
    let (mut producer, consumer) = rtrb::RingBuffer::<Hit>::new(HIT_QUEUE);
    let mut renderer = Renderer::new(consumer, clock, volume.clone(), config.max_hits);
    let builder = HitBuilder::new(sample_rate as f32, config.seed.unwrap_or(DEFAULT_NOISE_SEED));

    let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut right = vec![0.0f32; MAX_BLOCK_SIZE];
    let stream = device.build_output_stream(
        &stream_config.into(),
        move |data: &mut [f32], _| renderer.render_interleaved(data, channels, &mut left, &mut right),
        |err| eprintln!("Audio error: {}", err),
        None,
    )?;
    stream.play()?;

    info!(sample_rate, channels, tempo = engine.tempo(), "playing, press Ctrl+C to stop");
    engine.start();

    let started = Instant::now();
    let tick = config.tick_duration();
    let mut last_step = None;
    loop {
        engine.tick();
        for event in engine.take_triggers() {
            let Some(hit) = builder.build(&event) else {
                continue;
            };
            if producer.push(hit).is_err() {
                warn!(voice = %event.voice, "hit queue full, dropping hit");
            }
        }
        volume.set(engine.volume());

        let step = engine.poll_playhead();
        if step != last_step {
            debug!(?step, "playhead");
            last_step = step;
        }

        if !engine.is_running() && engine.pending_triggers() == 0 && !engine.looping() {
            info!("sequence finished");
            // let the last hits ring out
            std::thread::sleep(Duration::from_secs(2));
            break;
        }
        if seconds.is_some_and(|limit| started.elapsed().as_secs_f64() >= limit) {
            break;
        }
        std::thread::sleep(tick);
    }

    engine.stop();
    Ok(())
}
