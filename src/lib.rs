//! # crease-graph
//!
//! crease-graph is a planar-graph topology engine for crease-pattern
//! style documents. A graph is a set of index-correlated arrays
//! (vertex coordinates, edge connectivity, edge assignments, and
//! optional derived cross-reference arrays) plus the mutating
//! algorithms that keep those arrays consistent:
//!
//! - **clean**: epsilon-tolerant vertex merging and circular/duplicate
//!   edge removal
//! - **fragment**: planarize crossing segments by inserting
//!   intersection vertices
//! - **rebuild**: regenerate every derived array from vertex
//!   coordinates and edge connectivity alone
//! - **removal**: delete vertices/edges/faces while rewriting every
//!   dependent array through one shift table
//!
//! ## Determinism
//!
//! Rebuilding is fully deterministic for identical input and epsilon:
//! adjacency sorts by angle with index tiebreaks, face walks start in
//! index order, and proximity ties break to the lowest index. Tests
//! rely on this.
//!
//! ## Usage
//!
//! ```rust
//! use crease_graph::prelude::*;
//!
//! let document = GraphDocument::from_seed(
//!     vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 1.0], vec![1.0, 0.0]],
//!     vec![[0, 1], [2, 3]],
//!     vec![],
//! );
//! let mut graph = document.to_graph().unwrap();
//! graph.rebuild(EPSILON).unwrap();
//! // the crossing diagonals were split at their intersection
//! assert_eq!(graph.vertices_count(), 5);
//! assert_eq!(graph.edges_count(), 4);
//! ```
//!
//! Every operation runs to completion synchronously; a document has a
//! single writer. Concurrent reads are safe only while no writer is
//! active.

pub mod algs;
pub mod data;
pub mod geometry;
pub mod graph_error;
pub mod notify;
pub mod topology;

pub use graph_error::GraphError;
pub use topology::graph::PlanarGraph;

/// A convenient prelude importing the most-used types.
pub mod prelude {
    pub use crate::algs::edge_filter::EdgeFilterReport;
    pub use crate::algs::fragment::FragmentReport;
    pub use crate::data::document::GraphDocument;
    pub use crate::geometry::{BoundingRect, EPSILON, Point};
    pub use crate::graph_error::GraphError;
    pub use crate::notify::{ChangeEvent, SubscriptionId};
    pub use crate::topology::assignment::EdgeAssignment;
    pub use crate::topology::graph::{
        CleanOptions, CleanReport, GraphViews, LoadOptions, PlanarGraph,
    };
    pub use crate::topology::remap::ShiftTable;
}
