use serde::{Deserialize, Serialize};

/// Simulation configuration consumed at `start`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of nodes created at run start
    #[serde(default = "default_node_count")]
    pub node_count: usize,
    /// Size of the fixed hub subset; must stay below node_count
    #[serde(default = "default_hub_count")]
    pub hub_count: usize,
    /// Probability weight pulling connections toward hubs, in [0, 1]
    #[serde(default = "default_probability")]
    pub hub_fixation: f64,
    /// Probability weight for attacker deviation, in [0, 1]
    #[serde(default = "default_probability")]
    pub aggression_level: f64,
    /// Draw the attacker from the hub pool instead of the non-hub pool
    #[serde(default)]
    pub attacker_from_hub: bool,
    /// Tick count after which a multi-run simulation restarts
    #[serde(default = "default_tick_limit")]
    pub tick_limit: u64,
    /// Bounded-FIFO capacity of the per-tick snapshot history
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Optional history length at which a one-shot non-fatal notification
    /// fires; the run continues
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub history_threshold: Option<usize>,
    /// Automatically restart with a fresh topology at tick_limit
    #[serde(default)]
    pub multi_run: bool,
    /// Weight added on reinforcement; also the base weight of new edges
    #[serde(default = "default_reinforcement_delta")]
    pub reinforcement_delta: f64,
    /// RNG seed for reproducible runs; entropy-seeded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_node_count() -> usize {
    40
}

fn default_hub_count() -> usize {
    3
}

fn default_probability() -> f64 {
    0.5
}

fn default_tick_limit() -> u64 {
    100
}

fn default_history_capacity() -> usize {
    50
}

fn default_reinforcement_delta() -> f64 {
    0.2
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            node_count: default_node_count(),
            hub_count: default_hub_count(),
            hub_fixation: default_probability(),
            aggression_level: default_probability(),
            attacker_from_hub: false,
            tick_limit: default_tick_limit(),
            history_capacity: default_history_capacity(),
            history_threshold: None,
            multi_run: false,
            reinforcement_delta: default_reinforcement_delta(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Validate the configuration
    ///
    /// Configuration errors are fatal and block the run before any tick
    /// executes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.node_count < 2 {
            // A one-node topology can never produce a valid source/target
            // pair.
            return Err(ValidationError::InvalidGeneral(format!(
                "node_count must be at least 2, got {}",
                self.node_count
            )));
        }
        if self.hub_count >= self.node_count {
            return Err(ValidationError::InvalidTopology(format!(
                "hub_count ({}) must be less than node_count ({})",
                self.hub_count, self.node_count
            )));
        }
        if self.attacker_from_hub && self.hub_count == 0 {
            return Err(ValidationError::InvalidTopology(
                "attacker_from_hub requires hub_count > 0".to_string(),
            ));
        }
        Self::validate_probability("hub_fixation", self.hub_fixation)?;
        Self::validate_probability("aggression_level", self.aggression_level)?;
        if self.tick_limit == 0 {
            return Err(ValidationError::InvalidGeneral(
                "tick_limit must be greater than zero".to_string(),
            ));
        }
        if self.history_capacity == 0 {
            return Err(ValidationError::InvalidGeneral(
                "history_capacity must be greater than zero".to_string(),
            ));
        }
        if self.reinforcement_delta <= 0.0 || self.reinforcement_delta.is_nan() {
            return Err(ValidationError::InvalidGeneral(
                "reinforcement_delta must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_probability(name: &str, value: f64) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::InvalidGeneral(format!(
                "{} must be in [0, 1], got {}",
                name, value
            )));
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid topology configuration: {0}")]
    InvalidTopology(String),
}
