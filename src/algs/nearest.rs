//! Nearest-element queries.
//!
//! Linear scans; ties break to the lowest index so repeated queries
//! are reproducible. Pure reads: no caches are touched.

use crate::geometry::Point;
use crate::geometry::intersect::point_segment_distance;
use crate::geometry::polygon::point_in_polygon;
use crate::geometry::distance;
use crate::topology::graph::PlanarGraph;

/// Index of the vertex closest to `point`.
pub(crate) fn nearest_vertex(graph: &PlanarGraph, point: Point) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &p) in graph.vertices_coords.iter().enumerate() {
        let d = distance(p, point);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the edge closest to `point` by point-to-segment distance.
pub(crate) fn nearest_edge(graph: &PlanarGraph, point: Point) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &[u, v]) in graph.edges_vertices.iter().enumerate() {
        let (a, b) = (
            *graph.vertices_coords.get(u)?,
            *graph.vertices_coords.get(v)?,
        );
        let d = point_segment_distance(point, a, b);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Lowest-index face whose polygon contains `point`, if faces exist.
pub(crate) fn face_containing_point(graph: &PlanarGraph, point: Point) -> Option<usize> {
    let faces = graph.faces_vertices.as_ref()?;
    faces.iter().position(|face| {
        let polygon: Vec<Point> = face
            .iter()
            .filter_map(|&v| graph.vertices_coords.get(v).copied())
            .collect();
        polygon.len() == face.len() && point_in_polygon(point, &polygon)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::assignment::EdgeAssignment;

    fn square_with_faces() -> PlanarGraph {
        let mut g = PlanarGraph::from_seed(
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            vec![[0, 1], [1, 2], [2, 3], [3, 0]],
            vec![EdgeAssignment::Boundary; 4],
        )
        .unwrap();
        g.rebuild(1e-6).unwrap();
        g
    }

    #[test]
    fn nearest_vertex_breaks_ties_low() {
        let g = square_with_faces();
        assert_eq!(g.nearest_vertex([0.1, 0.1]), Some(0));
        // center is equidistant from all four corners
        assert_eq!(g.nearest_vertex([0.5, 0.5]), Some(0));
        assert_eq!(PlanarGraph::new().nearest_vertex([0.0, 0.0]), None);
    }

    #[test]
    fn nearest_edge_uses_segment_distance() {
        let g = square_with_faces();
        assert_eq!(g.nearest_edge([0.5, -0.2]), Some(0));
        assert_eq!(g.nearest_edge([1.3, 0.5]), Some(1));
    }

    #[test]
    fn containing_face_found_only_inside() {
        let g = square_with_faces();
        assert_eq!(g.face_containing_point([0.5, 0.5]), Some(0));
        assert_eq!(g.face_containing_point([1.5, 0.5]), None);
    }

    #[test]
    fn no_faces_means_no_containing_face() {
        let g = PlanarGraph::from_seed(
            vec![[0.0, 0.0], [1.0, 0.0]],
            vec![[0, 1]],
            vec![EdgeAssignment::Unassigned],
        )
        .unwrap();
        assert_eq!(g.face_containing_point([0.5, 0.0]), None);
    }
}
