//! # Hubsim - Hub-biased network topology simulator
//!
//! This library simulates the evolving topology of a communication network
//! under adversarial influence. Each tick, one pair of nodes becomes
//! connected, shaped by three competing forces: random baseline traffic,
//! gravitational pull toward a small fixed set of hub nodes, and a single
//! designated attacker whose connection pattern deviates from normal
//! distance-biased behaviour.
//!
//! ## Overview
//!
//! A run starts from a fixed node set with externally supplied 2D
//! positions. Hub identities and the attacker are drawn once per run and
//! never reselected while the run is active. Repeated connections between
//! the same node pair reinforce the existing edge's weight instead of
//! creating a duplicate, so hub-biased traffic leaves a recoverable
//! signature in the weighted edge set.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `config`: Type-safe configuration structure and validation
//! - `config_loader`: YAML configuration loading and CLI overrides
//! - `topology`: Per-run topology state, connection selection, and the
//!   distribution utilities biasing target choice
//! - `driver`: Tick-driven simulation driver with bounded run history and
//!   observer callbacks
//! - `export`: Pure snapshot export (JSON structure, Pajek text)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use hubsim::config::SimulationConfig;
//! use hubsim::driver::SimulationDriver;
//!
//! let config = SimulationConfig { node_count: 40, seed: Some(42), ..Default::default() };
//! let mut driver = SimulationDriver::new(config)?;
//! driver.start()?;
//! for _ in 0..100 {
//!     driver.tick()?;
//! }
//! let snapshot = driver.snapshot().unwrap();
//! println!("{}", hubsim::export::to_json(&snapshot));
//! # Ok::<(), hubsim::driver::SimulationError>(())
//! ```
//!
//! ## Concurrency model
//!
//! Single-threaded and tick-driven: exactly one connection is resolved per
//! tick, and ticks are invoked serially by an external scheduler. The
//! driver exposes a synchronous `tick()` and never suspends internally.

pub mod config;
pub mod config_loader;
pub mod driver;
pub mod export;
pub mod topology;
