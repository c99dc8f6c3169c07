//! Regenerate every derived array from the seed arrays.
//!
//! Pipeline: planarize (fragment + edge filter), then per-vertex
//! adjacency sorted counter-clockwise by angle, then face tracing.
//! Face tracing walks every directed half-edge, turning at each
//! destination to the most-clockwise neighbor (one step clockwise in
//! the counter-clockwise ring); each closed traversal is one face.
//! The unbounded outer walk comes back clockwise and is excluded by
//! its non-positive signed area. Every step is deterministic for
//! identical input and epsilon: neighbors sort by angle with index
//! tiebreak, and walks start from directed edges in index order.

use hashbrown::HashMap;
use itertools::Itertools;
use log::debug;
use std::collections::HashSet;

use crate::algs::fragment;
use crate::geometry::polygon::signed_area;
use crate::graph_error::GraphError;
use crate::topology::graph::PlanarGraph;

/// Rebuild the graph's derived arrays in place.
pub(crate) fn rebuild(graph: &mut PlanarGraph, epsilon: f64) -> Result<(), GraphError> {
    // fragment validates the seed, discards stale derived arrays, and
    // leaves a planar edge set behind
    fragment::fragment(graph, epsilon)?;

    let (vertices_vertices, vertices_edges) = sorted_adjacency(graph);
    let faces_vertices = trace_faces(graph, &vertices_vertices)?;
    let faces_edges = face_edge_loops(graph, &faces_vertices);

    let mut vertices_faces: Vec<Vec<usize>> = vec![Vec::new(); graph.vertices_count()];
    for (f, face) in faces_vertices.iter().enumerate() {
        for &v in face {
            if !vertices_faces[v].contains(&f) {
                vertices_faces[v].push(f);
            }
        }
    }

    let mut edges_faces: Vec<Vec<usize>> = vec![Vec::new(); graph.edges_count()];
    for (f, loop_edges) in faces_edges.iter().enumerate() {
        for &e in loop_edges {
            if !edges_faces[e].contains(&f) {
                edges_faces[e].push(f);
            }
        }
    }

    let mut faces_faces: Vec<Vec<usize>> = vec![Vec::new(); faces_vertices.len()];
    for incident in &edges_faces {
        if let [f, g] = incident[..] {
            if !faces_faces[f].contains(&g) {
                faces_faces[f].push(g);
            }
            if !faces_faces[g].contains(&f) {
                faces_faces[g].push(f);
            }
        }
    }

    debug!(
        "rebuild: {} vertices, {} edges, {} faces",
        graph.vertices_count(),
        graph.edges_count(),
        faces_vertices.len()
    );

    graph.vertices_vertices = Some(vertices_vertices);
    graph.vertices_edges = Some(vertices_edges);
    graph.vertices_faces = Some(vertices_faces);
    graph.edges_faces = Some(edges_faces);
    graph.faces_vertices = Some(faces_vertices);
    graph.faces_edges = Some(faces_edges);
    graph.faces_faces = Some(faces_faces);
    graph.invalidate_views();
    Ok(())
}

/// Per-vertex neighbor and edge lists, sorted counter-clockwise by
/// `atan2` angle with index as tiebreak. Face tracing depends on this
/// consistent rotational order, not on any arbitrary order.
fn sorted_adjacency(graph: &PlanarGraph) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
    let n = graph.vertices_count();
    let mut incident: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    for (e, &[u, v]) in graph.edges_vertices.iter().enumerate() {
        incident[u].push((v, e));
        incident[v].push((u, e));
    }
    let coords = &graph.vertices_coords;
    for (v, ring) in incident.iter_mut().enumerate() {
        let origin = coords[v];
        ring.sort_by(|&(a, ea), &(b, eb)| {
            let angle_a = (coords[a][1] - origin[1]).atan2(coords[a][0] - origin[0]);
            let angle_b = (coords[b][1] - origin[1]).atan2(coords[b][0] - origin[0]);
            angle_a
                .total_cmp(&angle_b)
                .then(a.cmp(&b))
                .then(ea.cmp(&eb))
        });
    }
    let vertices_vertices = incident
        .iter()
        .map(|ring| ring.iter().map(|&(w, _)| w).collect())
        .collect();
    let vertices_edges = incident
        .iter()
        .map(|ring| ring.iter().map(|&(_, e)| e).collect())
        .collect();
    (vertices_vertices, vertices_edges)
}

/// Walk every directed half-edge into closed loops and keep the
/// counter-clockwise (interior) ones.
fn trace_faces(
    graph: &PlanarGraph,
    vertices_vertices: &[Vec<usize>],
) -> Result<Vec<Vec<usize>>, GraphError> {
    // position of each directed edge inside the destination ring
    let mut ring_position: HashMap<(usize, usize), usize> = HashMap::new();
    for (v, ring) in vertices_vertices.iter().enumerate() {
        for (slot, &w) in ring.iter().enumerate() {
            ring_position.insert((v, w), slot);
        }
    }

    let step_limit = 2 * graph.edges_count() + 2;
    let mut visited: HashSet<(usize, usize)> = HashSet::new();
    let mut faces = Vec::new();
    for u in 0..vertices_vertices.len() {
        for &w in &vertices_vertices[u] {
            let start = (u, w);
            if visited.contains(&start) {
                continue;
            }
            let mut walk = Vec::new();
            let mut current = start;
            loop {
                visited.insert(current);
                walk.push(current.0);
                let (from, at) = current;
                let ring = &vertices_vertices[at];
                let Some(&slot) = ring_position.get(&(at, from)) else {
                    return Err(GraphError::UnclosedFaceWalk(start.0, start.1));
                };
                // one step clockwise in the CCW ring: the tightest
                // clockwise turn out of `at`
                let next = ring[(slot + ring.len() - 1) % ring.len()];
                current = (at, next);
                if current == start {
                    break;
                }
                if walk.len() > step_limit {
                    return Err(GraphError::UnclosedFaceWalk(start.0, start.1));
                }
            }
            let loop_coords: Vec<_> = walk.iter().map(|&v| graph.vertices_coords[v]).collect();
            if signed_area(&loop_coords) > 0.0 {
                faces.push(walk);
            }
        }
    }
    Ok(faces)
}

/// Match consecutive face-vertex pairs back to edge indices.
fn face_edge_loops(graph: &PlanarGraph, faces_vertices: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut edge_of_pair: HashMap<(usize, usize), usize> = HashMap::new();
    for (e, &[u, v]) in graph.edges_vertices.iter().enumerate() {
        edge_of_pair.insert((u.min(v), u.max(v)), e);
    }
    faces_vertices
        .iter()
        .map(|face| {
            face.iter()
                .circular_tuple_windows()
                .filter_map(|(&a, &b)| edge_of_pair.get(&(a.min(b), a.max(b))).copied())
                .collect()
        })
        .collect()
}
