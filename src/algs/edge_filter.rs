//! Circular and duplicate edge removal.
//!
//! Two edges are *similar* when they reference the same unordered
//! vertex pair; an edge is *circular* when both endpoints are equal.
//! Cleaning removes every circular edge, then every similar edge
//! except the lowest-index member of its group, and reindexes the edge
//! dimension so indices stay dense.

use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::graph_error::GraphError;
use crate::topology::graph::PlanarGraph;
use crate::topology::remap;

/// Per-category removal counts from [`clean_edges`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EdgeFilterReport {
    /// Edges whose endpoints were equal.
    pub circular: usize,
    /// Later members of similarity groups.
    pub duplicate: usize,
}

/// Remove circular then duplicate edges. A graph that needs neither is
/// untouched (and keeps its derived arrays); otherwise derived arrays
/// are discarded as stale cache.
pub(crate) fn clean_edges(graph: &mut PlanarGraph) -> Result<EdgeFilterReport, GraphError> {
    let circular: Vec<usize> = graph
        .edges_vertices
        .iter()
        .enumerate()
        .filter(|&(_, &[u, v])| u == v)
        .map(|(i, _)| i)
        .collect();
    if !circular.is_empty() {
        graph.discard_derived();
        remap::remove_edges(graph, &circular)?;
    }

    let mut first_of_pair: HashMap<(usize, usize), usize> = HashMap::new();
    let mut doomed: Vec<usize> = Vec::new();
    for (i, &[u, v]) in graph.edges_vertices.iter().enumerate() {
        let key = (u.min(v), u.max(v));
        match first_of_pair.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(i);
            }
            Entry::Occupied(_) => doomed.push(i),
        }
    }
    if !doomed.is_empty() {
        graph.discard_derived();
        remap::remove_edges(graph, &doomed)?;
    }

    let report = EdgeFilterReport {
        circular: circular.len(),
        duplicate: doomed.len(),
    };
    if report.circular + report.duplicate > 0 {
        debug!(
            "edge filter: removed {} circular, {} duplicate",
            report.circular, report.duplicate
        );
    }
    Ok(report)
}
