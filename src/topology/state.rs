//! Topology state for one simulation run.
//!
//! This file owns the node set, hub assignment, attacker identity, and the
//! weighted edge map for a single run. Hubs and the attacker are drawn once
//! at initialization and never reselected while the run is active; a
//! restart builds a fresh `TopologyState`.

use std::collections::HashMap;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::ValidationError;
use crate::topology::types::{Edge, EdgeKey, Node, NodeId, Position, TopologySnapshot};

/// Candidate pool used for distance ranking and target selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidatePool {
    /// The fixed hub subset
    Hubs,
    /// All nodes outside the hub subset
    NonHubs,
}

/// Mutable topology of one run: nodes, hubs, attacker, and weighted edges.
///
/// The distance cache memoizes per-source ascending rankings and is lazily
/// rebuilt whenever the cached entry count no longer matches the current
/// candidate-pool size.
#[derive(Debug)]
pub struct TopologyState {
    nodes: Vec<Node>,
    hubs: Vec<NodeId>,
    non_hubs: Vec<NodeId>,
    attacker: NodeId,
    edges: HashMap<EdgeKey, Edge>,
    distance_cache: HashMap<(NodeId, CandidatePool), Vec<NodeId>>,
}

impl TopologyState {
    /// Initialize a fresh topology for one run.
    ///
    /// Hub identities are sampled without replacement from the node set,
    /// the non-hub complement is derived, and the attacker is drawn from
    /// the hub pool or the non-hub pool depending on `attacker_from_hub`.
    ///
    /// Fails only on the degenerate configuration `hub_count >= node_count`
    /// (or an empty node set), reported as a configuration error.
    pub fn initialize<R: Rng>(
        positions: &[Position],
        hub_count: usize,
        attacker_from_hub: bool,
        rng: &mut R,
    ) -> Result<Self, ValidationError> {
        let node_count = positions.len();
        if node_count == 0 {
            return Err(ValidationError::InvalidTopology(
                "node_count must be greater than zero".to_string(),
            ));
        }
        if hub_count >= node_count {
            return Err(ValidationError::InvalidTopology(format!(
                "hub_count ({}) must be less than node_count ({})",
                hub_count, node_count
            )));
        }

        let nodes: Vec<Node> = positions
            .iter()
            .enumerate()
            .map(|(id, position)| Node { id, position: *position })
            .collect();

        let all_ids: Vec<NodeId> = (0..node_count).collect();
        let mut hubs: Vec<NodeId> = all_ids
            .choose_multiple(rng, hub_count)
            .copied()
            .collect();
        hubs.sort_unstable();

        let non_hubs: Vec<NodeId> = all_ids
            .iter()
            .copied()
            .filter(|id| !hubs.contains(id))
            .collect();

        let attacker = if attacker_from_hub {
            *hubs.choose(rng).ok_or_else(|| {
                ValidationError::InvalidTopology(
                    "attacker_from_hub requires hub_count > 0".to_string(),
                )
            })?
        } else {
            // non_hubs is non-empty because hub_count < node_count
            *non_hubs.choose(rng).expect("non-hub pool is non-empty")
        };

        info!(
            "Initialized topology: {} nodes, hubs {:?}, attacker {}",
            node_count, hubs, attacker
        );

        Ok(Self {
            nodes,
            hubs,
            non_hubs,
            attacker,
            edges: HashMap::new(),
            distance_cache: HashMap::new(),
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn hubs(&self) -> &[NodeId] {
        &self.hubs
    }

    pub fn non_hubs(&self) -> &[NodeId] {
        &self.non_hubs
    }

    pub fn attacker(&self) -> NodeId {
        self.attacker
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up an edge regardless of direction
    pub fn edge(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        self.edges.get(&EdgeKey::new(a, b))
    }

    /// Resolve a proposed connection against the existing edge set.
    ///
    /// The lookup is direction-independent: `(a, b)` and `(b, a)` resolve
    /// to the same edge. An existing edge has its weight reinforced by
    /// `delta`; otherwise a new edge is inserted with base weight `delta`.
    /// Returns the updated edge.
    pub fn resolve_connection(&mut self, source: NodeId, target: NodeId, delta: f64) -> &Edge {
        let key = EdgeKey::new(source, target);
        let edge = self.edges.entry(key).or_insert_with(|| {
            debug!("New edge {} -> {}", source, target);
            Edge { source, target, weight: 0.0 }
        });
        edge.weight += delta;
        edge
    }

    /// Rank a candidate pool by ascending Euclidean distance to `source`.
    ///
    /// The ranking excludes `source` itself and is memoized per
    /// (source, pool). A cached entry is rebuilt when its length no longer
    /// matches the expected candidate count, so a stale cache self-heals.
    /// Zero-distance ties keep the pool's original order (stable sort).
    pub fn ranked_candidates(&mut self, pool: CandidatePool, source: NodeId) -> &[NodeId] {
        let members = match pool {
            CandidatePool::Hubs => &self.hubs,
            CandidatePool::NonHubs => &self.non_hubs,
        };
        let expected = members.iter().filter(|&&id| id != source).count();

        let entry = self.distance_cache.entry((source, pool)).or_default();
        if entry.len() != expected {
            let origin = self.nodes[source].position;
            let mut ranked: Vec<NodeId> = members
                .iter()
                .copied()
                .filter(|&id| id != source)
                .collect();
            ranked.sort_by(|&a, &b| {
                let da = self.nodes[a].position.distance_to(&origin);
                let db = self.nodes[b].position.distance_to(&origin);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            });
            *entry = ranked;
        }
        entry
    }

    /// Produce an independent snapshot of the current topology.
    ///
    /// Edges are emitted in deterministic key order so snapshots of equal
    /// topologies compare equal.
    pub fn snapshot(&self) -> TopologySnapshot {
        let mut keys: Vec<&EdgeKey> = self.edges.keys().collect();
        keys.sort_unstable();
        TopologySnapshot {
            nodes: self.nodes.clone(),
            edges: keys.iter().map(|key| self.edges[key].clone()).collect(),
        }
    }
}
