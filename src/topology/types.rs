//! Topology type definitions.
//!
//! This file contains the core data types for the simulated network:
//! nodes with fixed 2D positions, weighted undirected edges keyed by an
//! unordered node pair, and the snapshot structure recorded per tick.

use serde::{Deserialize, Serialize};

/// Node identity: an index in `[0, node_count)`.
pub type NodeId = usize;

/// 2D position of a node, supplied by an external layout provider at
/// initialization. The simulation only uses it for distance ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Euclidean distance to another position
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A network node with its fixed position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
}

/// Canonical undirected edge identity.
///
/// The constructor normalizes the pair so that `(a, b)` and `(b, a)` map to
/// the same key, which is what makes reinforcement direction-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    lo: NodeId,
    hi: NodeId,
}

impl EdgeKey {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.lo, self.hi)
    }
}

/// A weighted undirected connection between two nodes.
///
/// `source` and `target` preserve the orientation of the first resolution
/// for logging purposes; the edge identity itself is unordered. Weight is
/// monotonically non-decreasing for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
}

/// An independent copy of the topology at one tick: nodes plus edges.
///
/// Snapshots hold copies, not live references, so later reinforcement of
/// the live edge set cannot retroactively alter recorded history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologySnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}
