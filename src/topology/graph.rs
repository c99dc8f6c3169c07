//! `PlanarGraph`: the planar-graph document and its operation facade.
//!
//! The graph is a fixed struct of index-correlated arrays. Vertex
//! coordinates, edge connectivity, and edge assignments are the seed
//! state; every other array is regenerable cache and therefore
//! optional. Mutating operations keep the seed arrays consistent even
//! while derived arrays are stale or absent, invalidate the lazy view
//! cache, and fire change notifications.

use log::debug;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt;

use crate::algs::edge_filter;
use crate::algs::{fragment, merge, nearest, rebuild};
use crate::data::document::GraphDocument;
use crate::geometry::{self, BoundingRect, EPSILON, Point};
use crate::graph_error::GraphError;
use crate::notify::{ChangeEvent, ChangeNotifier, SubscriptionId};
use crate::topology::assignment::EdgeAssignment;
use crate::topology::remap::{self, ShiftTable};
use crate::topology::validation;

/// Options for [`PlanarGraph::clean`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanOptions {
    /// Tolerance for the duplicate-vertex merge.
    pub epsilon: f64,
    /// Run the geometric merge before the edge filter.
    pub merge_duplicates: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            merge_duplicates: true,
        }
    }
}

/// Options for [`PlanarGraph::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Append the incoming document (indices offset past the current
    /// arrays) instead of replacing the graph.
    pub append: bool,
}

/// What [`PlanarGraph::clean`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub merged_vertices: usize,
    pub circular_edges: usize,
    pub duplicate_edges: usize,
}

/// Read-only views derived from the current arrays by
/// [`PlanarGraph::populate`]. Never a source of truth.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphViews {
    /// Number of incident edge endpoints per vertex.
    pub vertices_degree: Vec<usize>,
    /// Endpoint coordinates per edge.
    pub edges_coords: Vec<[Point; 2]>,
    /// Euclidean length per edge.
    pub edges_length: Vec<f64>,
    /// Coordinate loop per face; empty when no faces are present.
    pub faces_coords: Vec<Vec<Point>>,
    /// Whether each face visits no vertex twice.
    pub faces_simple: Vec<bool>,
    /// Bounding rectangle of all vertices; `None` when empty.
    pub bounds: Option<BoundingRect>,
}

/// A planar graph stored as index-correlated arrays.
pub struct PlanarGraph {
    // Seed arrays: the only persisted state.
    pub(crate) vertices_coords: Vec<Point>,
    pub(crate) edges_vertices: Vec<[usize; 2]>,
    pub(crate) edges_assignment: Vec<EdgeAssignment>,

    // Derived arrays: regenerable cache, present only after rebuild or
    // when supplied by a loaded document.
    pub(crate) vertices_vertices: Option<Vec<Vec<usize>>>,
    pub(crate) vertices_edges: Option<Vec<Vec<usize>>>,
    pub(crate) vertices_faces: Option<Vec<Vec<usize>>>,
    pub(crate) edges_faces: Option<Vec<Vec<usize>>>,
    pub(crate) faces_vertices: Option<Vec<Vec<usize>>>,
    pub(crate) faces_edges: Option<Vec<Vec<usize>>>,
    pub(crate) faces_faces: Option<Vec<Vec<usize>>>,

    views: OnceCell<GraphViews>,
    notifier: ChangeNotifier,
}

impl Default for PlanarGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanarGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self {
            vertices_coords: Vec::new(),
            edges_vertices: Vec::new(),
            edges_assignment: Vec::new(),
            vertices_vertices: None,
            vertices_edges: None,
            vertices_faces: None,
            edges_faces: None,
            faces_vertices: None,
            faces_edges: None,
            faces_faces: None,
            views: OnceCell::new(),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Build a graph from seed arrays, validating them fail-closed.
    pub fn from_seed(
        vertices_coords: Vec<Point>,
        edges_vertices: Vec<[usize; 2]>,
        edges_assignment: Vec<EdgeAssignment>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        graph.vertices_coords = vertices_coords;
        graph.edges_vertices = edges_vertices;
        graph.edges_assignment = edges_assignment;
        validation::validate_seed(&graph)?;
        Ok(graph)
    }

    // -------------------------------------------------------------------
    // Counts and read access
    // -------------------------------------------------------------------

    #[inline]
    pub fn vertices_count(&self) -> usize {
        self.vertices_coords.len()
    }

    #[inline]
    pub fn edges_count(&self) -> usize {
        self.edges_vertices.len()
    }

    #[inline]
    pub fn faces_count(&self) -> usize {
        self.faces_vertices.as_ref().map_or(0, Vec::len)
    }

    pub fn vertices_coords(&self) -> &[Point] {
        &self.vertices_coords
    }

    pub fn edges_vertices(&self) -> &[[usize; 2]] {
        &self.edges_vertices
    }

    pub fn edges_assignment(&self) -> &[EdgeAssignment] {
        &self.edges_assignment
    }

    pub fn vertices_vertices(&self) -> Option<&[Vec<usize>]> {
        self.vertices_vertices.as_deref()
    }

    pub fn vertices_edges(&self) -> Option<&[Vec<usize>]> {
        self.vertices_edges.as_deref()
    }

    pub fn vertices_faces(&self) -> Option<&[Vec<usize>]> {
        self.vertices_faces.as_deref()
    }

    pub fn edges_faces(&self) -> Option<&[Vec<usize>]> {
        self.edges_faces.as_deref()
    }

    pub fn faces_vertices(&self) -> Option<&[Vec<usize>]> {
        self.faces_vertices.as_deref()
    }

    pub fn faces_edges(&self) -> Option<&[Vec<usize>]> {
        self.faces_edges.as_deref()
    }

    pub fn faces_faces(&self) -> Option<&[Vec<usize>]> {
        self.faces_faces.as_deref()
    }

    /// The lowest-index edge connecting `u` and `v` in either order.
    ///
    /// Duplicate edges only exist before [`clean`](Self::clean); when
    /// they do, the lowest index wins. Use
    /// [`edges_between`](Self::edges_between) to see them all.
    pub fn edge_between(&self, u: usize, v: usize) -> Option<usize> {
        self.edges_vertices
            .iter()
            .position(|&[a, b]| (a == u && b == v) || (a == v && b == u))
    }

    /// Every edge connecting `u` and `v`, in index order.
    pub fn edges_between(&self, u: usize, v: usize) -> Vec<usize> {
        self.edges_vertices
            .iter()
            .enumerate()
            .filter(|&(_, &[a, b])| (a == u && b == v) || (a == v && b == u))
            .map(|(i, _)| i)
            .collect()
    }

    // -------------------------------------------------------------------
    // Cache and notification plumbing
    // -------------------------------------------------------------------

    #[inline]
    pub(crate) fn invalidate_views(&mut self) {
        self.views.take();
    }

    /// Drop every derived array and the view cache, keeping the seed.
    ///
    /// Derived arrays are regenerable; discarding them is a cache
    /// operation, not a mutation, so no change event fires.
    pub fn discard_derived(&mut self) {
        self.vertices_vertices = None;
        self.vertices_edges = None;
        self.vertices_faces = None;
        self.edges_faces = None;
        self.faces_vertices = None;
        self.faces_edges = None;
        self.faces_faces = None;
        self.invalidate_views();
    }

    /// Register a change subscriber.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(ChangeEvent) + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// Remove a change subscriber.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // -------------------------------------------------------------------
    // Mutating operations
    // -------------------------------------------------------------------

    /// Discard every array, leaving an empty graph.
    pub fn clear(&mut self) {
        self.vertices_coords.clear();
        self.edges_vertices.clear();
        self.edges_assignment.clear();
        self.discard_derived();
        self.notifier.notify(ChangeEvent::Clear);
    }

    /// Replace (or append to) the graph from a document, then run
    /// [`clean`](Self::clean) with default options and warm the views.
    pub fn load(
        &mut self,
        document: &GraphDocument,
        options: LoadOptions,
    ) -> Result<CleanReport, GraphError> {
        let incoming = Self::try_from(document)?;
        if options.append {
            self.append(incoming);
        } else {
            self.replace(incoming);
        }
        let report = self.clean_inner(CleanOptions::default())?;
        self.populate()?;
        self.notifier.notify(ChangeEvent::Load);
        Ok(report)
    }

    /// Planar union: append `document` with offset indices, then
    /// [`rebuild`](Self::rebuild) to planarize the result.
    pub fn join(&mut self, document: &GraphDocument, epsilon: f64) -> Result<(), GraphError> {
        geometry::check_epsilon(epsilon)?;
        let incoming = Self::try_from(document)?;
        self.append(incoming);
        rebuild::rebuild(self, epsilon)?;
        self.notifier.notify(ChangeEvent::Join);
        Ok(())
    }

    /// Optional geometric merge, then the edge filter, then cache
    /// invalidation.
    pub fn clean(&mut self, options: CleanOptions) -> Result<CleanReport, GraphError> {
        let report = self.clean_inner(options)?;
        self.notifier.notify(ChangeEvent::Clean);
        Ok(report)
    }

    fn clean_inner(&mut self, options: CleanOptions) -> Result<CleanReport, GraphError> {
        geometry::check_epsilon(options.epsilon)?;
        validation::validate_seed(self).or_else(|e| remap::refuse("clean", e))?;
        let merged_vertices = if options.merge_duplicates {
            merge::merge_core(self, options.epsilon)?
        } else {
            0
        };
        let edges = edge_filter::clean_edges(self)?;
        self.invalidate_views();
        debug!(
            "clean: merged {merged_vertices} vertices, removed {} circular / {} duplicate edges",
            edges.circular, edges.duplicate
        );
        Ok(CleanReport {
            merged_vertices,
            circular_edges: edges.circular,
            duplicate_edges: edges.duplicate,
        })
    }

    /// Lazily compute (or fetch) the read-only views. Does not mutate
    /// seed arrays; the first call after a mutation recomputes.
    pub fn populate(&self) -> Result<&GraphViews, GraphError> {
        self.views.get_or_try_init(|| self.compute_views())
    }

    /// Planarize crossing edges in place. See [`crate::algs::fragment`].
    pub fn fragment(&mut self, epsilon: f64) -> Result<fragment::FragmentReport, GraphError> {
        let report = fragment::fragment(self, epsilon)?;
        self.notifier.notify(ChangeEvent::Fragment);
        Ok(report)
    }

    /// Regenerate every derived array from the seed arrays. See
    /// [`crate::algs::rebuild`].
    pub fn rebuild(&mut self, epsilon: f64) -> Result<(), GraphError> {
        rebuild::rebuild(self, epsilon)?;
        self.notifier.notify(ChangeEvent::Rebuild);
        Ok(())
    }

    /// Collapse every epsilon-equivalence class of vertices to its
    /// lowest-index member, then filter the edges that collapsed.
    /// Returns the number of removed vertices.
    pub fn merge_duplicate_vertices(&mut self, epsilon: f64) -> Result<usize, GraphError> {
        let merged = merge::merge_core(self, epsilon)?;
        edge_filter::clean_edges(self)?;
        self.notifier.notify(ChangeEvent::Merge);
        Ok(merged)
    }

    /// Remove vertices by index, rewriting every dependent array.
    pub fn remove_vertices(&mut self, indices: &[usize]) -> Result<ShiftTable, GraphError> {
        let table = remap::remove_vertices(self, indices)
            .or_else(|e| remap::refuse("remove_vertices", e))?;
        self.notifier.notify(ChangeEvent::Removal);
        Ok(table)
    }

    /// Remove edges by index, rewriting every dependent array.
    pub fn remove_edges(&mut self, indices: &[usize]) -> Result<ShiftTable, GraphError> {
        let table =
            remap::remove_edges(self, indices).or_else(|e| remap::refuse("remove_edges", e))?;
        self.notifier.notify(ChangeEvent::Removal);
        Ok(table)
    }

    /// Remove faces by index, rewriting every dependent array.
    pub fn remove_faces(&mut self, indices: &[usize]) -> Result<ShiftTable, GraphError> {
        let table =
            remap::remove_faces(self, indices).or_else(|e| remap::refuse("remove_faces", e))?;
        self.notifier.notify(ChangeEvent::Removal);
        Ok(table)
    }

    /// Drop every vertex no edge references. Returns the removed count.
    pub fn remove_isolated_vertices(&mut self) -> Result<usize, GraphError> {
        validation::validate_seed(self).or_else(|e| remap::refuse("remove_isolated_vertices", e))?;
        let mut used = vec![false; self.vertices_count()];
        for &[u, v] in &self.edges_vertices {
            used[u] = true;
            used[v] = true;
        }
        let isolated: Vec<usize> = (0..used.len()).filter(|&i| !used[i]).collect();
        if isolated.is_empty() {
            return Ok(0);
        }
        let table = remap::remove_vertices(self, &isolated)?;
        self.notifier.notify(ChangeEvent::Removal);
        Ok(table.removed_len())
    }

    /// Remove every edge carrying one of `assignments`. Returns the
    /// removed count. Derived arrays are discarded (faces may no longer
    /// be valid without the removed edges).
    pub fn remove_edges_with_assignment(
        &mut self,
        assignments: &[EdgeAssignment],
    ) -> Result<usize, GraphError> {
        validation::validate_seed(self)
            .or_else(|e| remap::refuse("remove_edges_with_assignment", e))?;
        let doomed: Vec<usize> = self
            .edges_assignment
            .iter()
            .enumerate()
            .filter(|(_, a)| assignments.contains(a))
            .map(|(i, _)| i)
            .collect();
        if doomed.is_empty() {
            return Ok(0);
        }
        self.discard_derived();
        let table = remap::remove_edges(self, &doomed)?;
        self.notifier.notify(ChangeEvent::Removal);
        Ok(table.removed_len())
    }

    /// Translate every vertex by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.vertices_coords {
            p[0] += dx;
            p[1] += dy;
        }
        self.invalidate_views();
        self.notifier.notify(ChangeEvent::Transform);
    }

    /// Scale every vertex about the origin.
    pub fn scale(&mut self, factor: f64) {
        for p in &mut self.vertices_coords {
            p[0] *= factor;
            p[1] *= factor;
        }
        self.invalidate_views();
        self.notifier.notify(ChangeEvent::Transform);
    }

    // -------------------------------------------------------------------
    // Proximity queries
    // -------------------------------------------------------------------

    /// Index of the vertex closest to `point`; ties break low.
    pub fn nearest_vertex(&self, point: Point) -> Option<usize> {
        nearest::nearest_vertex(self, point)
    }

    /// Index of the edge closest to `point`; ties break low.
    pub fn nearest_edge(&self, point: Point) -> Option<usize> {
        nearest::nearest_edge(self, point)
    }

    /// Lowest-index face whose polygon contains `point`, if any.
    pub fn face_containing_point(&self, point: Point) -> Option<usize> {
        nearest::face_containing_point(self, point)
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn replace(&mut self, incoming: PlanarGraph) {
        self.vertices_coords = incoming.vertices_coords;
        self.edges_vertices = incoming.edges_vertices;
        self.edges_assignment = incoming.edges_assignment;
        self.vertices_vertices = incoming.vertices_vertices;
        self.vertices_edges = incoming.vertices_edges;
        self.vertices_faces = incoming.vertices_faces;
        self.edges_faces = incoming.edges_faces;
        self.faces_vertices = incoming.faces_vertices;
        self.faces_edges = incoming.faces_edges;
        self.faces_faces = incoming.faces_faces;
        self.invalidate_views();
    }

    /// Concatenate `incoming` with every index offset past the current
    /// counts. Derived arrays are discarded; the mixed adjacency would
    /// be stale.
    fn append(&mut self, incoming: PlanarGraph) {
        let vertex_offset = self.vertices_count();
        self.discard_derived();
        self.vertices_coords.extend(incoming.vertices_coords);
        self.edges_vertices.extend(
            incoming
                .edges_vertices
                .into_iter()
                .map(|[u, v]| [u + vertex_offset, v + vertex_offset]),
        );
        self.edges_assignment.extend(incoming.edges_assignment);
    }

    fn compute_views(&self) -> Result<GraphViews, GraphError> {
        validation::validate_consistency(self)?;
        let mut vertices_degree = vec![0usize; self.vertices_count()];
        for &[u, v] in &self.edges_vertices {
            vertices_degree[u] += 1;
            vertices_degree[v] += 1;
        }
        let edges_coords: Vec<[Point; 2]> = self
            .edges_vertices
            .iter()
            .map(|&[u, v]| [self.vertices_coords[u], self.vertices_coords[v]])
            .collect();
        let edges_length = edges_coords
            .iter()
            .map(|&[a, b]| geometry::distance(a, b))
            .collect();
        let face_rows: &[Vec<usize>] = self.faces_vertices.as_deref().unwrap_or(&[]);
        let faces_coords: Vec<Vec<Point>> = face_rows
            .iter()
            .map(|face| face.iter().map(|&v| self.vertices_coords[v]).collect())
            .collect();
        let faces_simple = face_rows
            .iter()
            .map(|face| {
                let mut seen = face.clone();
                seen.sort_unstable();
                seen.windows(2).all(|w| w[0] != w[1])
            })
            .collect();
        let bounds = BoundingRect::from_points(self.vertices_coords.iter());
        Ok(GraphViews {
            vertices_degree,
            edges_coords,
            edges_length,
            faces_coords,
            faces_simple,
            bounds,
        })
    }
}

impl TryFrom<&GraphDocument> for PlanarGraph {
    type Error = GraphError;

    fn try_from(document: &GraphDocument) -> Result<Self, Self::Error> {
        document.to_graph()
    }
}

impl Clone for PlanarGraph {
    /// Deep copy of every array. Subscribers and the view cache stay
    /// behind; the copy starts with a cold cache and no subscribers.
    fn clone(&self) -> Self {
        Self {
            vertices_coords: self.vertices_coords.clone(),
            edges_vertices: self.edges_vertices.clone(),
            edges_assignment: self.edges_assignment.clone(),
            vertices_vertices: self.vertices_vertices.clone(),
            vertices_edges: self.vertices_edges.clone(),
            vertices_faces: self.vertices_faces.clone(),
            edges_faces: self.edges_faces.clone(),
            faces_vertices: self.faces_vertices.clone(),
            faces_edges: self.faces_edges.clone(),
            faces_faces: self.faces_faces.clone(),
            views: OnceCell::new(),
            notifier: ChangeNotifier::new(),
        }
    }
}

impl fmt::Debug for PlanarGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanarGraph")
            .field("vertices", &self.vertices_count())
            .field("edges", &self.edges_count())
            .field("faces", &self.faces_count())
            .field("derived", &self.vertices_vertices.is_some())
            .finish()
    }
}
