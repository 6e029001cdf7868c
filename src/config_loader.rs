use crate::config::SimulationConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse a simulation configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<SimulationConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open config file '{}'", config_path.display()))?;

    let config: SimulationConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse config file '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub node_count: Option<usize>,
    pub hub_count: Option<usize>,
    pub hub_fixation: Option<f64>,
    pub aggression_level: Option<f64>,
    pub seed: Option<u64>,
    pub multi_run: Option<bool>,
}

/// Apply CLI overrides to a configuration and re-validate
pub fn apply_cli_overrides(
    config: &mut SimulationConfig,
    overrides: &CliOverrides,
) -> Result<()> {
    if let Some(node_count) = overrides.node_count {
        info!("Overriding node_count: {}", node_count);
        config.node_count = node_count;
    }
    if let Some(hub_count) = overrides.hub_count {
        info!("Overriding hub_count: {}", hub_count);
        config.hub_count = hub_count;
    }
    if let Some(hub_fixation) = overrides.hub_fixation {
        info!("Overriding hub_fixation: {}", hub_fixation);
        config.hub_fixation = hub_fixation;
    }
    if let Some(aggression_level) = overrides.aggression_level {
        info!("Overriding aggression_level: {}", aggression_level);
        config.aggression_level = aggression_level;
    }
    if let Some(seed) = overrides.seed {
        info!("Overriding seed: {}", seed);
        config.seed = Some(seed);
    }
    if let Some(multi_run) = overrides.multi_run {
        info!("Overriding multi_run: {}", multi_run);
        config.multi_run = multi_run;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
