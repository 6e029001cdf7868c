use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

use hubsim::config::SimulationConfig;
use hubsim::config_loader::{self, CliOverrides};
use hubsim::driver::{RandomLayout, SimulationDriver, SimulationObserver};
use hubsim::export;
use hubsim::topology::Edge;

/// Snapshot output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Pajek,
}

/// Hub-biased network topology simulator with an adversarial attacker node
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the simulation configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run (defaults to the configured tick_limit)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Override the number of nodes
    #[arg(long)]
    nodes: Option<usize>,

    /// Override the number of hubs
    #[arg(long)]
    hubs: Option<usize>,

    /// Override the hub fixation probability [0, 1]
    #[arg(long)]
    hub_fixation: Option<f64>,

    /// Override the attacker aggression level [0, 1]
    #[arg(long)]
    aggression: Option<f64>,

    /// Override the RNG seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override multi-run mode (auto-restart at tick_limit)
    #[arg(long)]
    multi_run: Option<bool>,

    /// Output path for the final topology snapshot (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Snapshot output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

/// Observer logging edge activity and run events
#[derive(Debug, Default)]
struct LoggingObserver {
    restarts: usize,
}

impl SimulationObserver for LoggingObserver {
    fn on_edge_updated(&mut self, edge: &Edge) {
        debug!(
            "Edge updated: {} -> {} (weight {:.2})",
            edge.source, edge.target, edge.weight
        );
    }

    fn on_history_threshold(&mut self) {
        info!("Run history reached the configured notification threshold");
    }

    fn on_run_restarted(&mut self) {
        self.restarts += 1;
        info!("Run restarted (restart #{})", self.restarts);
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting hubsim network topology simulator");

    // Load configuration from YAML or fall back to defaults
    let mut config = match &args.config {
        Some(path) => config_loader::load_config(path)?,
        None => {
            info!("No configuration file given, using defaults");
            SimulationConfig::default()
        }
    };

    // Apply CLI overrides on top of the file configuration
    let overrides = CliOverrides {
        node_count: args.nodes,
        hub_count: args.hubs,
        hub_fixation: args.hub_fixation,
        aggression_level: args.aggression,
        seed: args.seed,
        multi_run: args.multi_run,
    };
    config_loader::apply_cli_overrides(&mut config, &overrides)?;

    let ticks = args.ticks.unwrap_or(config.tick_limit);
    info!(
        "Simulating {} ticks over {} nodes ({} hubs, hub_fixation {}, aggression {})",
        ticks, config.node_count, config.hub_count, config.hub_fixation, config.aggression_level
    );

    // Run the simulation under a logging observer
    let mut driver = SimulationDriver::with_observer(
        config,
        Box::new(RandomLayout),
        Box::new(LoggingObserver::default()),
    )?;
    driver.start()?;
    for _ in 0..ticks {
        driver.tick()?;
    }

    let topology = driver
        .topology()
        .ok_or_else(|| color_eyre::eyre::eyre!("driver has no topology after start"))?;
    let snapshot = topology.snapshot();
    info!(
        "Simulation finished: {} edges resolved across {} nodes",
        snapshot.edges.len(),
        snapshot.nodes.len()
    );

    // Export the final snapshot
    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&export::to_json(&snapshot))
            .wrap_err("Failed to serialize snapshot")?,
        OutputFormat::Pajek => {
            export::to_pajek(&snapshot, topology.hubs(), topology.attacker())
        }
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .wrap_err_with(|| format!("Failed to write snapshot to '{}'", path.display()))?;
            info!("Snapshot written to {:?}", path);
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
