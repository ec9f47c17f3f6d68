//! bullfrog - drum machine from the command line
//!
//! Run with: cargo run -- play --pack path/to/pack

mod live;
mod setup;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use bullfrog_drums::{render::OfflineSession, EngineConfig, Voice, REQUIRED_SAMPLE_RATE};

#[derive(Parser)]
#[clap(version, about = "Seven-voice drum step sequencer.")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

/// Where the instrument state comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct KitArgs {
    /// Engine settings as TOML.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Kit JSON to load.
    #[arg(short, long)]
    pub kit: Option<PathBuf>,
    /// A-G pack directory to read into the sample banks.
    #[arg(short, long)]
    pub pack: Option<PathBuf>,
    /// A-G pack directory whose samples are read lazily.
    #[arg(long)]
    pub factory: Option<PathBuf>,
    /// Tempo override in BPM.
    #[arg(short, long)]
    pub tempo: Option<f32>,
    /// RNG seed for the groove and probability draws.
    #[arg(short, long)]
    pub seed: Option<u64>,
    /// Turn swing on.
    #[arg(long)]
    pub shuffle: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plays the pattern through the default audio output.
    Play {
        #[command(flatten)]
        kit: KitArgs,
        /// Stop after this many seconds. Plays until interrupted otherwise.
        #[arg(long)]
        seconds: Option<f64>,
    },
    /// Renders the pattern to a 48kHz 16-bit stereo WAV file.
    Render {
        #[command(flatten)]
        kit: KitArgs,
        /// Output file.
        output: PathBuf,
        /// Length of the render.
        #[arg(long, default_value_t = 8.0)]
        seconds: f64,
    },
    /// Checks a pack directory against the A-G pack rules.
    Validate {
        /// The pack directory.
        path: PathBuf,
    },
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play { kit, seconds } => live::run(&kit, seconds),
        Commands::Render { kit, output, seconds } => render(&kit, &output, seconds),
        Commands::Validate { path } => validate(&path),
    }
}

fn render(args: &KitArgs, output: &std::path::Path, seconds: f64) -> EyreResult<()> {
    let config = setup::load_config(args)?.with_sample_rate(REQUIRED_SAMPLE_RATE);
    let mut session = OfflineSession::new(config);
    setup::prepare(session.engine_mut(), args)?;

    let audio = bullfrog_drums::render::bounce(&mut session, seconds);

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(output, spec)
        .wrap_err_with(|| format!("failed to create {}", output.display()))?;
    for (l, r) in audio.left.iter().zip(&audio.right) {
        writer.write_sample((l.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
        writer.write_sample((r.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize().wrap_err("failed to finish the WAV file")?;

    println!(
        "Rendered {:.2}s at {} BPM to {} (peak {:.3})",
        seconds,
        session.engine().tempo(),
        output.display(),
        audio.peak()
    );
    Ok(())
}

fn validate(path: &std::path::Path) -> EyreResult<()> {
    let mut engine = bullfrog_drums::DrumEngine::new(EngineConfig::default(), bullfrog_drums::io::ManualClock::new());
    let import = engine
        .import_pack_dir(path)
        .wrap_err_with(|| format!("failed to read pack {}", path.display()))?;

    println!("Loaded {} samples from {}", import.loaded, path.display());
    for voice in Voice::ALL {
        let counts = engine.samples().counts(voice);
        println!(
            "  {:<12} core {}/{}  factory {}/{}  user {}/{}",
            voice.to_string(),
            counts.core,
            bullfrog_drums::CORE_SLOTS,
            counts.factory,
            bullfrog_drums::FACTORY_SLOTS,
            counts.user,
            bullfrog_drums::SLOTS_PER_VOICE - bullfrog_drums::FACTORY_SLOTS
        );
    }

    let report = engine.validate_pack();
    let issues: Vec<&String> = import.issues.iter().chain(&report.issues).collect();
    if issues.is_empty() {
        println!("Pack validation OK: A-G folders comply with mono WAV / 48kHz / 16-bit and slots 0-9 are filled per voice.");
        return Ok(());
    }

    println!("Validation issues ({}):", issues.len());
    for issue in issues {
        println!("- {issue}");
    }
    std::process::exit(1);
}
