//! Fail-closed structural checks run before mutating operations.
//!
//! A malformed or inconsistent document is refused with a structured
//! error naming the offending array and index; the graph is never
//! partially mutated.

use crate::graph_error::GraphError;
use crate::topology::graph::PlanarGraph;

/// Check the seed arrays: `edges_assignment` correlated 1:1 with
/// `edges_vertices`, and every edge endpoint in range.
///
/// Self-loops and duplicate edges are legal here; the edge filter
/// exists to remove them.
pub fn validate_seed(graph: &PlanarGraph) -> Result<(), GraphError> {
    let vertices = graph.vertices_count();
    let edges = graph.edges_count();
    if graph.edges_assignment.len() != edges {
        return Err(GraphError::SeedLengthMismatch {
            array: "edges_assignment",
            expected: edges,
            found: graph.edges_assignment.len(),
        });
    }
    check_pairs(&graph.edges_vertices, "edges_vertices", vertices)?;
    Ok(())
}

/// Check seed arrays plus every present derived array: row counts must
/// match their entity dimension and every stored index must be in
/// bounds.
pub fn validate_consistency(graph: &PlanarGraph) -> Result<(), GraphError> {
    validate_seed(graph)?;
    let vertices = graph.vertices_count();
    let edges = graph.edges_count();
    let faces = graph.faces_count();

    check_parallel(&graph.vertices_vertices, "vertices_vertices", vertices)?;
    check_parallel(&graph.vertices_edges, "vertices_edges", vertices)?;
    check_parallel(&graph.vertices_faces, "vertices_faces", vertices)?;
    check_parallel(&graph.edges_faces, "edges_faces", edges)?;
    check_parallel(&graph.faces_edges, "faces_edges", faces)?;
    check_parallel(&graph.faces_faces, "faces_faces", faces)?;

    check_values(&graph.vertices_vertices, "vertices_vertices", vertices)?;
    check_values(&graph.vertices_edges, "vertices_edges", edges)?;
    check_values(&graph.vertices_faces, "vertices_faces", faces)?;
    check_values(&graph.edges_faces, "edges_faces", faces)?;
    check_values(&graph.faces_vertices, "faces_vertices", vertices)?;
    check_values(&graph.faces_edges, "faces_edges", edges)?;
    check_values(&graph.faces_faces, "faces_faces", faces)?;
    Ok(())
}

fn check_pairs(rows: &[[usize; 2]], array: &'static str, len: usize) -> Result<(), GraphError> {
    for (row, pair) in rows.iter().enumerate() {
        for &v in pair {
            if v >= len {
                return Err(GraphError::InvalidReference {
                    array,
                    row,
                    index: v,
                    len,
                });
            }
        }
    }
    Ok(())
}

fn check_parallel(
    rows: &Option<Vec<Vec<usize>>>,
    array: &'static str,
    expected: usize,
) -> Result<(), GraphError> {
    if let Some(rows) = rows {
        if rows.len() != expected {
            return Err(GraphError::SeedLengthMismatch {
                array,
                expected,
                found: rows.len(),
            });
        }
    }
    Ok(())
}

fn check_values(
    rows: &Option<Vec<Vec<usize>>>,
    array: &'static str,
    len: usize,
) -> Result<(), GraphError> {
    if let Some(rows) = rows {
        for (row, list) in rows.iter().enumerate() {
            for &v in list {
                if v >= len {
                    return Err(GraphError::InvalidReference {
                        array,
                        row,
                        index: v,
                        len,
                    });
                }
            }
        }
    }
    Ok(())
}
