//! Simulation driver.
//!
//! This module coordinates the tick loop: it asks the connection selector
//! for the next edge, resolves it against the topology state, records a
//! snapshot in the bounded run history, and enforces run-length limits.
//! Ticks are invoked serially by an external scheduler; all mutation
//! happens inside one `tick()` call.

use std::collections::VecDeque;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{SimulationConfig, ValidationError};
use crate::topology::{
    select_connection, NormalSampler, Position, SelectorParams, TopologySnapshot, TopologyState,
};

/// Driver lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No run has been started yet
    Idle,
    /// A run is active and accepting ticks
    Running,
    /// A run was explicitly stopped
    Stopped,
}

/// Errors surfaced by the driver
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ValidationError),
    #[error("tick() called while the driver is in state {0:?}")]
    NotRunning(RunState),
}

/// Supplies one 2D position per node identity at run start.
///
/// Layout is an external concern; the simulation core only consumes the
/// resulting coordinates for distance ranking.
pub trait PositionProvider {
    fn positions(&mut self, node_count: usize, rng: &mut StdRng) -> Vec<Position>;
}

/// Uniform random layout over the unit square
#[derive(Debug, Default)]
pub struct RandomLayout;

impl PositionProvider for RandomLayout {
    fn positions(&mut self, node_count: usize, rng: &mut StdRng) -> Vec<Position> {
        (0..node_count)
            .map(|_| Position { x: rng.gen::<f64>(), y: rng.gen::<f64>() })
            .collect()
    }
}

/// Observer callbacks fired synchronously from within `tick()`/`start()`.
///
/// All methods have no-op defaults, so implementors only override what
/// they care about.
pub trait SimulationObserver {
    fn on_edge_updated(&mut self, _edge: &crate::topology::Edge) {}
    fn on_history_threshold(&mut self) {}
    fn on_run_restarted(&mut self) {}
}

/// Observer that ignores every event
#[derive(Debug, Default)]
pub struct NullObserver;

impl SimulationObserver for NullObserver {}

/// Tick-driven simulation driver owning the topology state, the bounded
/// snapshot history, and the RNG stream for one or more runs.
pub struct SimulationDriver {
    config: SimulationConfig,
    state: RunState,
    rng: StdRng,
    sampler: NormalSampler,
    topology: Option<TopologyState>,
    history: VecDeque<TopologySnapshot>,
    tick_count: u64,
    threshold_notified: bool,
    position_provider: Box<dyn PositionProvider>,
    observer: Box<dyn SimulationObserver>,
}

impl SimulationDriver {
    /// Create an idle driver. The configuration is validated eagerly so a
    /// degenerate setup is rejected before any run starts.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::with_observer(config, Box::new(RandomLayout), Box::new(NullObserver))
    }

    /// Create an idle driver with an explicit position provider and
    /// observer.
    pub fn with_observer(
        config: SimulationConfig,
        position_provider: Box<dyn PositionProvider>,
        observer: Box<dyn SimulationObserver>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            state: RunState::Idle,
            rng,
            sampler: NormalSampler::new(),
            topology: None,
            history: VecDeque::new(),
            tick_count: 0,
            threshold_notified: false,
            position_provider,
            observer,
        })
    }

    /// Start a fresh run: new topology, cleared history, tick counter at
    /// zero. Subsequent calls restart with a fresh hub/attacker draw and
    /// fire `on_run_restarted`.
    pub fn start(&mut self) -> Result<(), SimulationError> {
        self.config.validate()?;

        let positions = self
            .position_provider
            .positions(self.config.node_count, &mut self.rng);
        if positions.len() != self.config.node_count {
            return Err(ValidationError::InvalidTopology(format!(
                "position provider returned {} positions for {} nodes",
                positions.len(),
                self.config.node_count
            ))
            .into());
        }

        let restarting = self.topology.is_some();
        self.topology = Some(TopologyState::initialize(
            &positions,
            self.config.hub_count,
            self.config.attacker_from_hub,
            &mut self.rng,
        )?);
        self.history.clear();
        self.tick_count = 0;
        self.threshold_notified = false;
        self.state = RunState::Running;

        if restarting {
            info!("Simulation restarted");
            self.observer.on_run_restarted();
        } else {
            info!("Simulation started");
        }
        Ok(())
    }

    /// Restart with the same configuration; callable in any state.
    pub fn restart(&mut self) -> Result<(), SimulationError> {
        self.start()
    }

    /// Stop the current run. The topology and history remain readable.
    pub fn stop(&mut self) {
        info!("Simulation stopped after {} ticks", self.tick_count);
        self.state = RunState::Stopped;
    }

    /// Advance the simulation by one tick, resolving exactly one
    /// connection. Valid only while `Running`.
    pub fn tick(&mut self) -> Result<(), SimulationError> {
        if self.state != RunState::Running {
            return Err(SimulationError::NotRunning(self.state));
        }
        let topology = self
            .topology
            .as_mut()
            .ok_or(SimulationError::NotRunning(RunState::Idle))?;

        let params = SelectorParams {
            hub_fixation: self.config.hub_fixation,
            aggression_level: self.config.aggression_level,
        };
        let connection = select_connection(topology, &mut self.sampler, &params, &mut self.rng);
        let edge = topology
            .resolve_connection(
                connection.source,
                connection.target,
                self.config.reinforcement_delta,
            )
            .clone();
        debug!(
            "Tick {}: edge {} -> {} (weight {:.2})",
            self.tick_count, edge.source, edge.target, edge.weight
        );
        self.observer.on_edge_updated(&edge);

        self.history.push_back(topology.snapshot());
        while self.history.len() > self.config.history_capacity {
            // Oldest-first eviction keeps the history bounded.
            self.history.pop_front();
        }
        if let Some(threshold) = self.config.history_threshold {
            if !self.threshold_notified && self.history.len() >= threshold {
                self.threshold_notified = true;
                self.observer.on_history_threshold();
            }
        }

        self.tick_count += 1;

        if self.config.multi_run && self.tick_count >= self.config.tick_limit {
            info!(
                "Tick limit {} reached, restarting with a fresh topology",
                self.config.tick_limit
            );
            self.start()?;
        }
        Ok(())
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn topology(&self) -> Option<&TopologyState> {
        self.topology.as_ref()
    }

    pub fn history(&self) -> &VecDeque<TopologySnapshot> {
        &self.history
    }

    /// Snapshot of the current topology, if a run has been started
    pub fn snapshot(&self) -> Option<TopologySnapshot> {
        self.topology.as_ref().map(TopologyState::snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(node_count: usize) -> SimulationConfig {
        SimulationConfig {
            node_count,
            hub_count: 3,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_before_start_is_rejected() {
        let mut driver = SimulationDriver::new(config(10)).unwrap();
        assert_eq!(driver.state(), RunState::Idle);
        assert!(matches!(driver.tick(), Err(SimulationError::NotRunning(RunState::Idle))));
    }

    #[test]
    fn test_tick_after_stop_is_rejected() {
        let mut driver = SimulationDriver::new(config(10)).unwrap();
        driver.start().unwrap();
        driver.tick().unwrap();
        driver.stop();
        assert!(matches!(
            driver.tick(),
            Err(SimulationError::NotRunning(RunState::Stopped))
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected_at_construction() {
        let bad = SimulationConfig { node_count: 2, hub_count: 5, ..Default::default() };
        assert!(SimulationDriver::new(bad).is_err());
    }

    #[test]
    fn test_start_resets_tick_counter_and_history() {
        let mut driver = SimulationDriver::new(config(10)).unwrap();
        driver.start().unwrap();
        for _ in 0..4 {
            driver.tick().unwrap();
        }
        assert_eq!(driver.tick_count(), 4);
        assert_eq!(driver.history().len(), 4);

        driver.restart().unwrap();
        assert_eq!(driver.tick_count(), 0);
        assert!(driver.history().is_empty());
        assert_eq!(driver.state(), RunState::Running);
    }

    #[test]
    fn test_history_respects_capacity_fifo() {
        let mut cfg = config(10);
        cfg.history_capacity = 3;
        let mut driver = SimulationDriver::new(cfg).unwrap();
        driver.start().unwrap();
        for _ in 0..10 {
            driver.tick().unwrap();
        }
        assert_eq!(driver.history().len(), 3);
        // The retained snapshots are the newest ones; edge weight sums grow
        // monotonically, so the front must not exceed the back.
        let front: f64 = driver.history().front().unwrap().edges.iter().map(|e| e.weight).sum();
        let back: f64 = driver.history().back().unwrap().edges.iter().map(|e| e.weight).sum();
        assert!(front <= back);
    }

    #[test]
    fn test_weights_never_decrease_across_ticks() {
        let mut driver = SimulationDriver::new(config(10)).unwrap();
        driver.start().unwrap();
        let mut last_total = 0.0;
        for _ in 0..50 {
            driver.tick().unwrap();
            let total: f64 = driver
                .snapshot()
                .unwrap()
                .edges
                .iter()
                .map(|e| e.weight)
                .sum();
            assert!(total >= last_total);
            last_total = total;
        }
    }

    #[test]
    fn test_single_run_scenario() {
        // nodeCount=10, hubCount=3, attackerFromHub=false, tickLimit=5,
        // multiRun=false: after 5 ticks the driver is still running and
        // between 1 and 5 edges exist.
        let cfg = SimulationConfig {
            node_count: 10,
            hub_count: 3,
            attacker_from_hub: false,
            tick_limit: 5,
            multi_run: false,
            seed: Some(7),
            ..Default::default()
        };
        let mut driver = SimulationDriver::new(cfg).unwrap();
        driver.start().unwrap();
        for _ in 0..5 {
            driver.tick().unwrap();
        }
        assert_eq!(driver.tick_count(), 5);
        assert_eq!(driver.state(), RunState::Running);
        let edges = driver.topology().unwrap().edge_count();
        assert!((1..=5).contains(&edges), "unexpected edge count {}", edges);
    }

    #[test]
    fn test_multi_run_restarts_at_tick_limit() {
        let cfg = SimulationConfig {
            node_count: 10,
            hub_count: 3,
            tick_limit: 5,
            multi_run: true,
            seed: Some(11),
            ..Default::default()
        };
        let mut driver = SimulationDriver::new(cfg).unwrap();
        driver.start().unwrap();
        for _ in 0..5 {
            driver.tick().unwrap();
        }
        // The fifth tick hit the limit and restarted the run.
        assert_eq!(driver.tick_count(), 0);
        assert_eq!(driver.state(), RunState::Running);
        assert!(driver.history().is_empty());
        assert_eq!(driver.topology().unwrap().edge_count(), 0);
    }
}
