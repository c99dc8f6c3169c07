//! Planarization: split crossing edges at their intersection points.
//!
//! Every pair of edges that does not already share an endpoint is
//! intersected. A crossing strictly interior to both segments inserts
//! a vertex (deduplicated against all existing and previously inserted
//! points within epsilon) and splits both edges there; a crossing
//! within epsilon of a segment endpoint counts as *at* that endpoint
//! and does not split that segment, which is how T-junctions resolve.
//! An edge crossed several times becomes an ordered chain sorted by
//! parametric position; chain edges inherit the parent assignment.
//!
//! The pairwise scan is O(n^2); documents here are a few hundred edges
//! and the constant factors stay small.

use log::debug;
use serde::Serialize;

use crate::algs::edge_filter::{self, EdgeFilterReport};
use crate::algs::merge::{self, PointGrid};
use crate::geometry::{self, distance};
use crate::geometry::intersect::segment_intersection;
use crate::graph_error::GraphError;
use crate::topology::graph::PlanarGraph;
use crate::topology::remap;
use crate::topology::validation;

/// What [`fragment`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FragmentReport {
    /// Pre-existing vertices welded by the geometric merge.
    pub merged_vertices: usize,
    /// Intersection vertices inserted (after epsilon deduplication).
    pub crossing_vertices: usize,
    /// Edges that were split into chains.
    pub split_edges: usize,
    /// Result of the edge filter run on the split arrays.
    pub filtered: EdgeFilterReport,
}

/// Planarize the graph's edges in place. Derived arrays are discarded;
/// the seed arrays come back with no non-endpoint crossings.
///
/// Coincident input vertices are welded first (concatenated documents
/// routinely duplicate shared endpoints), then every non-adjacent edge
/// pair is intersected and split.
pub(crate) fn fragment(graph: &mut PlanarGraph, epsilon: f64) -> Result<FragmentReport, GraphError> {
    geometry::check_epsilon(epsilon)?;
    validation::validate_seed(graph).or_else(|e| remap::refuse("fragment", e))?;
    let merged_vertices = merge::merge_core(graph, epsilon)?;
    graph.discard_derived();

    let edge_count = graph.edges_count();
    let mut coords = std::mem::take(&mut graph.vertices_coords);
    let mut grid = PointGrid::new(epsilon);
    for (i, &p) in coords.iter().enumerate() {
        grid.insert(i, p);
    }

    // (parametric position, vertex) cut list per edge
    let mut cuts: Vec<Vec<(f64, usize)>> = vec![Vec::new(); edge_count];
    let original_vertex_count = coords.len();

    for i in 0..edge_count {
        let [iu, iv] = graph.edges_vertices[i];
        for j in (i + 1)..edge_count {
            let [ju, jv] = graph.edges_vertices[j];
            if iu == ju || iu == jv || iv == ju || iv == jv {
                continue;
            }
            let (a0, a1) = (coords[iu], coords[iv]);
            let (b0, b1) = (coords[ju], coords[jv]);
            let Some(crossing) = segment_intersection(a0, a1, b0, b1, epsilon) else {
                continue;
            };
            let p = crossing.point;
            let interior_i = distance(p, a0) > epsilon && distance(p, a1) > epsilon;
            let interior_j = distance(p, b0) > epsilon && distance(p, b1) > epsilon;
            if !interior_i && !interior_j {
                continue;
            }
            let vertex = match grid.within_epsilon(p).first() {
                Some(&existing) => existing,
                None => {
                    coords.push(p);
                    grid.insert(coords.len() - 1, p);
                    coords.len() - 1
                }
            };
            if interior_i && vertex != iu && vertex != iv {
                cuts[i].push((crossing.t, vertex));
            }
            if interior_j && vertex != ju && vertex != jv {
                cuts[j].push((crossing.u, vertex));
            }
        }
    }

    let split_edges = cuts.iter().filter(|c| !c.is_empty()).count();
    let crossing_vertices = coords.len() - original_vertex_count;

    let mut edges_vertices = Vec::with_capacity(edge_count + 2 * crossing_vertices);
    let mut edges_assignment = Vec::with_capacity(edges_vertices.capacity());
    for (e, &[u, v]) in graph.edges_vertices.iter().enumerate() {
        let assignment = graph.edges_assignment[e];
        let chain = &mut cuts[e];
        if chain.is_empty() {
            edges_vertices.push([u, v]);
            edges_assignment.push(assignment);
            continue;
        }
        chain.sort_by(|a, b| a.0.total_cmp(&b.0));
        chain.dedup_by_key(|&mut (_, vertex)| vertex);
        let mut previous = u;
        for &(_, vertex) in chain.iter() {
            if vertex != previous {
                edges_vertices.push([previous, vertex]);
                edges_assignment.push(assignment);
                previous = vertex;
            }
        }
        if previous != v {
            edges_vertices.push([previous, v]);
            edges_assignment.push(assignment);
        }
    }

    graph.vertices_coords = coords;
    graph.edges_vertices = edges_vertices;
    graph.edges_assignment = edges_assignment;

    let filtered = edge_filter::clean_edges(graph)?;
    debug!(
        "fragment: {crossing_vertices} crossing vertices, {split_edges} edges split, \
         {} edges total",
        graph.edges_count()
    );
    Ok(FragmentReport {
        merged_vertices,
        crossing_vertices,
        split_edges,
        filtered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::topology::assignment::EdgeAssignment;

    fn graph(coords: Vec<Point>, edges: Vec<[usize; 2]>) -> PlanarGraph {
        let assignments = vec![EdgeAssignment::Unassigned; edges.len()];
        PlanarGraph::from_seed(coords, edges, assignments).unwrap()
    }

    #[test]
    fn crossing_diagonals_insert_center_vertex() {
        let mut g = graph(
            vec![[0.0, 0.0], [1.0, 1.0], [0.0, 1.0], [1.0, 0.0]],
            vec![[0, 1], [2, 3]],
        );
        let report = fragment(&mut g, 1e-6).unwrap();
        assert_eq!(report.crossing_vertices, 1);
        assert_eq!(report.split_edges, 2);
        assert_eq!(g.vertices_count(), 5);
        assert_eq!(g.edges_count(), 4);
        let center = g.vertices_coords()[4];
        assert!(distance(center, [0.5, 0.5]) < 1e-9);
        // every edge touches the center vertex
        assert!(g.edges_vertices().iter().all(|pair| pair.contains(&4)));
    }

    #[test]
    fn t_junction_splits_only_the_crossed_edge() {
        let mut g = graph(
            vec![[0.0, 0.0], [2.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
            vec![[0, 1], [2, 3]],
        );
        // vertex 2 sits on the interior of edge 0; the vertical edge
        // must stay whole, the horizontal one splits at vertex 2.
        let report = fragment(&mut g, 1e-6).unwrap();
        assert_eq!(report.crossing_vertices, 0);
        assert_eq!(report.split_edges, 1);
        assert_eq!(g.vertices_count(), 4);
        let mut edges: Vec<[usize; 2]> = g.edges_vertices().to_vec();
        edges.iter_mut().for_each(|e| e.sort_unstable());
        edges.sort_unstable();
        assert_eq!(edges, vec![[0, 2], [1, 2], [2, 3]]);
    }

    #[test]
    fn multiple_crossings_split_into_ordered_chain() {
        // one long horizontal edge crossed by two verticals
        let mut g = graph(
            vec![
                [0.0, 0.0],
                [3.0, 0.0],
                [1.0, -1.0],
                [1.0, 1.0],
                [2.0, -1.0],
                [2.0, 1.0],
            ],
            vec![[0, 1], [2, 3], [4, 5]],
        );
        let report = fragment(&mut g, 1e-6).unwrap();
        assert_eq!(report.crossing_vertices, 2);
        assert_eq!(g.vertices_count(), 8);
        assert_eq!(g.edges_count(), 7);
        // chain order follows the parametric position along the edge
        assert!(distance(g.vertices_coords()[6], [1.0, 0.0]) < 1e-9);
        assert!(distance(g.vertices_coords()[7], [2.0, 0.0]) < 1e-9);
        assert!(g.edges_vertices().contains(&[0, 6]));
        assert!(g.edges_vertices().contains(&[6, 7]));
        assert!(g.edges_vertices().contains(&[7, 1]));
    }

    #[test]
    fn edges_sharing_an_endpoint_are_not_split() {
        let mut g = graph(
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
            vec![[0, 1], [1, 2], [2, 0]],
        );
        let report = fragment(&mut g, 1e-6).unwrap();
        assert_eq!(report.crossing_vertices, 0);
        assert_eq!(report.split_edges, 0);
        assert_eq!(g.edges_count(), 3);
    }

    #[test]
    fn split_edges_inherit_parent_assignment() {
        let mut g = PlanarGraph::from_seed(
            vec![[0.0, 0.0], [1.0, 1.0], [0.0, 1.0], [1.0, 0.0]],
            vec![[0, 1], [2, 3]],
            vec![EdgeAssignment::Mountain, EdgeAssignment::Valley],
        )
        .unwrap();
        fragment(&mut g, 1e-6).unwrap();
        let mountains = g
            .edges_assignment()
            .iter()
            .filter(|&&a| a == EdgeAssignment::Mountain)
            .count();
        let valleys = g
            .edges_assignment()
            .iter()
            .filter(|&&a| a == EdgeAssignment::Valley)
            .count();
        assert_eq!((mountains, valleys), (2, 2));
    }

    #[test]
    fn fragment_is_stable_once_planar() {
        let mut g = graph(
            vec![[0.0, 0.0], [1.0, 1.0], [0.0, 1.0], [1.0, 0.0]],
            vec![[0, 1], [2, 3]],
        );
        fragment(&mut g, 1e-6).unwrap();
        let vertices = g.vertices_coords().to_vec();
        let edges = g.edges_vertices().to_vec();
        let report = fragment(&mut g, 1e-6).unwrap();
        assert_eq!(report.crossing_vertices, 0);
        assert_eq!(g.vertices_coords(), &vertices[..]);
        assert_eq!(g.edges_vertices(), &edges[..]);
    }
}
