//! Shared engine preparation for every subcommand.

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing::{info, warn};

use bullfrog_drums::{kit, DrumEngine, EngineConfig};

use super::KitArgs;

pub fn load_config(args: &KitArgs) -> EyreResult<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
            EngineConfig::from_toml_str(&text).wrap_err("invalid engine config")?
        }
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

/// Load kit, packs and overrides, then log where the engine stands.
pub fn prepare(engine: &mut DrumEngine, args: &KitArgs) -> EyreResult<()> {
    if let Some(path) = &args.factory {
        engine
            .register_factory_pack(path)
            .wrap_err_with(|| format!("failed to read factory pack {}", path.display()))?;
    }

    if let Some(path) = &args.kit {
        let json = std::fs::read_to_string(path).wrap_err_with(|| format!("failed to read kit {}", path.display()))?;
        kit::import_kit(engine, &json).wrap_err_with(|| format!("failed to load kit {}", path.display()))?;
    }

    if let Some(path) = &args.pack {
        let import = engine
            .import_pack_dir(path)
            .wrap_err_with(|| format!("failed to read pack {}", path.display()))?;
        for issue in &import.issues {
            warn!(issue = %issue, "pack import");
        }
    }

    if let Some(tempo) = args.tempo {
        engine.set_tempo(tempo);
    }
    engine.set_shuffle(args.shuffle);

    info!(
        tempo = engine.tempo(),
        hits = engine.pattern().hit_count(),
        samples = engine.samples().len(),
        "engine prepared"
    );
    Ok(())
}
