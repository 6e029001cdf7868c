//! Snapshot export.
//!
//! Pure functions turning a topology snapshot into serializable output:
//! a JSON `{nodes, edges}` value for downstream tooling, and Pajek-style
//! text for graph-analysis packages. No file I/O happens here; callers
//! decide where the output goes.

use serde_json::{json, Value};

use crate::topology::{NodeId, TopologySnapshot};

/// Serialize a snapshot as a `{nodes, edges}` JSON value
pub fn to_json(snapshot: &TopologySnapshot) -> Value {
    json!({
        "nodes": snapshot.nodes,
        "edges": snapshot.edges,
    })
}

/// Serialize a snapshot in Pajek format.
///
/// The header comment records the hub assignment and the attacker
/// identity so an analysis run can recover the ground truth. Node
/// identifiers are shifted to 1-based as Pajek expects.
pub fn to_pajek(snapshot: &TopologySnapshot, hubs: &[NodeId], attacker: NodeId) -> String {
    let mut lines = Vec::with_capacity(snapshot.nodes.len() + snapshot.edges.len() + 3);

    let hubs_string = hubs
        .iter()
        .map(|hub| hub.to_string())
        .collect::<Vec<_>>()
        .join(",");
    lines.push(format!("# hubs: [{}], attacker: {}", hubs_string, attacker));

    lines.push(format!("*Vertices {}", snapshot.nodes.len()));
    for node in &snapshot.nodes {
        lines.push(format!("{} \"{}\"", node.id + 1, node.id));
    }

    lines.push(format!("*Edges {}", snapshot.edges.len()));
    for edge in &snapshot.edges {
        lines.push(format!("{} {} {}", edge.source + 1, edge.target + 1, edge.weight));
    }

    lines.join("\n")
}
