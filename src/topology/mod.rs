//! Network topology module.
//!
//! This module contains the per-run topology state (nodes, hubs, attacker,
//! weighted edges), the connection selector that proposes the next edge,
//! and the distribution utilities that bias target selection.

pub mod connections;
pub mod distribution;
pub mod state;
pub mod types;

// Re-export key types and functions for easier access
pub use types::{Edge, EdgeKey, Node, NodeId, Position, TopologySnapshot};
pub use state::{CandidatePool, TopologyState};
pub use distribution::NormalSampler;
pub use connections::{select_connection, Connection, SelectorParams};
