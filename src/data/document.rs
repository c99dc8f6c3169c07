//! The in-memory document shape consumed and produced by the graph.
//!
//! `GraphDocument` mirrors the FOLD-style key set: seed arrays plus
//! optional derived cross-reference arrays. Conversion into a
//! [`PlanarGraph`] is fail-closed: coordinate arity, reference bounds,
//! and array correlation are checked before anything is built, and a
//! malformed document never half-loads. Serialization itself stays in
//! memory; file persistence is out of scope.

use serde::{Deserialize, Serialize};

use crate::graph_error::GraphError;
use crate::topology::assignment::EdgeAssignment;
use crate::topology::graph::PlanarGraph;
use crate::topology::validation;

/// FOLD-style document: seed arrays plus optional derived arrays.
///
/// `vertices_coords` rows carry two or three components; the third is
/// dropped on conversion (the engine is planar). A missing
/// `edges_assignment` is filled with `Unassigned`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphDocument {
    pub vertices_coords: Vec<Vec<f64>>,
    pub edges_vertices: Vec<[usize; 2]>,
    pub edges_assignment: Vec<EdgeAssignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertices_vertices: Option<Vec<Vec<usize>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertices_edges: Option<Vec<Vec<usize>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertices_faces: Option<Vec<Vec<usize>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges_faces: Option<Vec<Vec<usize>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faces_vertices: Option<Vec<Vec<usize>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faces_edges: Option<Vec<Vec<usize>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faces_faces: Option<Vec<Vec<usize>>>,
}

impl GraphDocument {
    /// Document holding only seed arrays.
    pub fn from_seed(
        vertices_coords: Vec<Vec<f64>>,
        edges_vertices: Vec<[usize; 2]>,
        edges_assignment: Vec<EdgeAssignment>,
    ) -> Self {
        Self {
            vertices_coords,
            edges_vertices,
            edges_assignment,
            ..Self::default()
        }
    }

    /// Validate and convert into a graph. The document is untouched;
    /// the graph owns fresh arrays.
    pub fn to_graph(&self) -> Result<PlanarGraph, GraphError> {
        if self.vertices_coords.is_empty() && !self.edges_vertices.is_empty() {
            return Err(GraphError::MissingSeedArray("vertices_coords"));
        }
        let mut coords = Vec::with_capacity(self.vertices_coords.len());
        for (vertex, row) in self.vertices_coords.iter().enumerate() {
            if row.len() < 2 {
                return Err(GraphError::MalformedCoordinate {
                    vertex,
                    components: row.len(),
                });
            }
            coords.push([row[0], row[1]]);
        }
        let edges_assignment = if self.edges_assignment.is_empty() {
            vec![EdgeAssignment::Unassigned; self.edges_vertices.len()]
        } else {
            self.edges_assignment.clone()
        };

        let mut graph = PlanarGraph::new();
        graph.vertices_coords = coords;
        graph.edges_vertices = self.edges_vertices.clone();
        graph.edges_assignment = edges_assignment;
        graph.vertices_vertices = self.vertices_vertices.clone();
        graph.vertices_edges = self.vertices_edges.clone();
        graph.vertices_faces = self.vertices_faces.clone();
        graph.edges_faces = self.edges_faces.clone();
        graph.faces_vertices = self.faces_vertices.clone();
        graph.faces_edges = self.faces_edges.clone();
        graph.faces_faces = self.faces_faces.clone();
        validation::validate_consistency(&graph)?;
        Ok(graph)
    }
}

impl From<&PlanarGraph> for GraphDocument {
    fn from(graph: &PlanarGraph) -> Self {
        Self {
            vertices_coords: graph
                .vertices_coords()
                .iter()
                .map(|p| p.to_vec())
                .collect(),
            edges_vertices: graph.edges_vertices().to_vec(),
            edges_assignment: graph.edges_assignment().to_vec(),
            vertices_vertices: graph.vertices_vertices().map(<[_]>::to_vec),
            vertices_edges: graph.vertices_edges().map(<[_]>::to_vec),
            vertices_faces: graph.vertices_faces().map(<[_]>::to_vec),
            edges_faces: graph.edges_faces().map(<[_]>::to_vec),
            faces_vertices: graph.faces_vertices().map(<[_]>::to_vec),
            faces_edges: graph.faces_edges().map(<[_]>::to_vec),
            faces_faces: graph.faces_faces().map(<[_]>::to_vec),
        }
    }
}

impl PlanarGraph {
    /// Export every present array as a document.
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument::from(self)
    }
}
