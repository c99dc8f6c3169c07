//! Epsilon-tolerant vertex deduplication.
//!
//! Vertices are partitioned into equivalence classes under the
//! *transitive closure* of "distance <= epsilon": chained merges may
//! collapse endpoints farther apart than epsilon. That is deliberate
//! policy, made explicit by running a union-find over every
//! epsilon-close pair instead of repeated pairwise scans. Each class
//! collapses to its lowest-index member.

use hashbrown::HashMap;
use log::debug;

use crate::geometry::{self, Point, distance};
use crate::graph_error::GraphError;
use crate::topology::graph::PlanarGraph;
use crate::topology::remap;
use crate::topology::validation;

/// Union-find keyed so that a class root is always the lowest index in
/// the class.
#[derive(Debug, Clone)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    pub(crate) fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // path halving
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Union by minimum root, so `find` of any member yields the
    /// lowest index of its class.
    pub(crate) fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        if ra < rb {
            self.parent[rb] = ra;
        } else {
            self.parent[ra] = rb;
        }
    }
}

/// Uniform grid over 2D points for epsilon-neighborhood candidate
/// lookup: cell size 2*epsilon, probe the 3x3 neighborhood.
pub(crate) struct PointGrid {
    cells: HashMap<(i64, i64), Vec<(usize, Point)>>,
    cell_size: f64,
    epsilon: f64,
}

impl PointGrid {
    pub(crate) fn new(epsilon: f64) -> Self {
        // any positive cell size works for epsilon == 0 (exact match)
        let cell_size = if epsilon > 0.0 { epsilon * 2.0 } else { 1.0 };
        Self {
            cells: HashMap::new(),
            cell_size,
            epsilon,
        }
    }

    #[inline]
    fn cell_of(&self, p: Point) -> (i64, i64) {
        (
            (p[0] / self.cell_size).floor() as i64,
            (p[1] / self.cell_size).floor() as i64,
        )
    }

    /// Indices of previously inserted points within epsilon of `p`,
    /// sorted ascending so callers pick deterministically.
    pub(crate) fn within_epsilon(&self, p: Point) -> Vec<usize> {
        let (cx, cy) = self.cell_of(p);
        let mut hits = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) {
                    for &(idx, q) in bucket {
                        if distance(p, q) <= self.epsilon {
                            hits.push(idx);
                        }
                    }
                }
            }
        }
        hits.sort_unstable();
        hits
    }

    pub(crate) fn insert(&mut self, idx: usize, p: Point) {
        self.cells.entry(self.cell_of(p)).or_default().push((idx, p));
    }
}

/// Collapse epsilon-equivalent vertices onto their lowest-index
/// representatives and remove the rest. Returns the removed count.
///
/// Derived arrays are discarded when anything merges (they are
/// regenerable cache); an already-merged graph is untouched. Callers
/// wanting the edge filter chained run it afterwards, as
/// [`PlanarGraph::merge_duplicate_vertices`] and
/// [`PlanarGraph::clean`] do.
pub(crate) fn merge_core(graph: &mut PlanarGraph, epsilon: f64) -> Result<usize, GraphError> {
    geometry::check_epsilon(epsilon)?;
    validation::validate_seed(graph).or_else(|e| remap::refuse("merge_duplicate_vertices", e))?;

    let n = graph.vertices_count();
    if n == 0 {
        return Ok(0);
    }

    let mut classes = DisjointSet::new(n);
    let mut grid = PointGrid::new(epsilon);
    for (i, &p) in graph.vertices_coords.iter().enumerate() {
        for j in grid.within_epsilon(p) {
            classes.union(i, j);
        }
        grid.insert(i, p);
    }

    let representative: Vec<usize> = (0..n).map(|i| classes.find(i)).collect();
    let doomed: Vec<usize> = (0..n).filter(|&i| representative[i] != i).collect();
    if doomed.is_empty() {
        return Ok(0);
    }

    graph.discard_derived();
    for pair in &mut graph.edges_vertices {
        pair[0] = representative[pair[0]];
        pair[1] = representative[pair[1]];
    }
    remap::remove_vertices(graph, &doomed)?;
    debug!("merge: collapsed {} vertices at epsilon {epsilon}", doomed.len());
    Ok(doomed.len())
}
