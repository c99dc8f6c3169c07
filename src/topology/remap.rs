//! Tombstone-and-shift index remapping for batch removal.
//!
//! Removing entries from one entity array invalidates every stored
//! index into it. A [`ShiftTable`] records, for each original index,
//! either its post-removal position or a tombstone. Removal then runs
//! one uniform algorithm over the explicitly enumerated field set:
//! arrays whose *values* index the removed dimension are rewritten
//! through the table, arrays *parallel* to it are filtered, and the
//! whole rewrite is atomic: a validation pass refuses (leaving the
//! document untouched) if any surviving array still references a
//! tombstoned index.

use log::warn;

use crate::graph_error::GraphError;
use crate::topology::graph::PlanarGraph;

/// Shift table for one entity dimension.
///
/// Survivors map to `old - |{r in R : r <= old}|`; removed indices are
/// tombstoned. Relative order of survivors is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftTable {
    target: Vec<Option<usize>>,
    removed: usize,
}

impl ShiftTable {
    /// Build the table for an array of length `len` with `removed`
    /// indices deleted. Duplicate removal indices are tolerated;
    /// out-of-range ones are refused before anything else happens.
    pub fn from_removed(
        len: usize,
        removed: &[usize],
        dimension: &'static str,
    ) -> Result<Self, GraphError> {
        let mut tombstone = vec![false; len];
        for &r in removed {
            if r >= len {
                return Err(GraphError::RemovalOutOfBounds {
                    dimension,
                    index: r,
                    len,
                });
            }
            tombstone[r] = true;
        }
        let mut target = Vec::with_capacity(len);
        let mut dropped = 0usize;
        for dead in tombstone {
            if dead {
                dropped += 1;
                target.push(None);
            } else {
                target.push(Some(target.len() - dropped));
            }
        }
        Ok(Self {
            target,
            removed: dropped,
        })
    }

    /// Length of the original (pre-removal) array.
    #[inline]
    pub fn original_len(&self) -> usize {
        self.target.len()
    }

    /// Number of surviving entries.
    #[inline]
    pub fn survivor_len(&self) -> usize {
        self.target.len() - self.removed
    }

    /// Number of removed entries.
    #[inline]
    pub fn removed_len(&self) -> usize {
        self.removed
    }

    /// An empty removal set leaves every index in place.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.removed == 0
    }

    /// Post-removal index of `old`, or `None` if tombstoned or out of
    /// range.
    #[inline]
    pub fn target(&self, old: usize) -> Option<usize> {
        self.target.get(old).copied().flatten()
    }

    /// Signed shift applied to a surviving index: `new = old + shift`.
    #[inline]
    pub fn offset(&self, old: usize) -> Option<isize> {
        self.target(old).map(|new| new as isize - old as isize)
    }

    /// Validation pass over an array of index lists: every value must
    /// survive. No mutation.
    pub fn check_lists(&self, rows: &[Vec<usize>], array: &'static str) -> Result<(), GraphError> {
        for (row, list) in rows.iter().enumerate() {
            for &v in list {
                if self.target(v).is_none() {
                    return Err(GraphError::DanglingReference {
                        array,
                        row,
                        index: v,
                    });
                }
            }
        }
        Ok(())
    }

    /// Validation pass over an array of index pairs.
    pub fn check_pairs(&self, rows: &[[usize; 2]], array: &'static str) -> Result<(), GraphError> {
        for (row, pair) in rows.iter().enumerate() {
            for &v in pair {
                if self.target(v).is_none() {
                    return Err(GraphError::DanglingReference {
                        array,
                        row,
                        index: v,
                    });
                }
            }
        }
        Ok(())
    }

    /// Rewrite every value through the table. Callers must have run the
    /// matching check pass first.
    pub fn apply_lists(&self, rows: &mut [Vec<usize>]) {
        for list in rows.iter_mut() {
            for v in list.iter_mut() {
                debug_assert!(self.target(*v).is_some(), "unchecked dangling reference");
                if let Some(new) = self.target(*v) {
                    *v = new;
                }
            }
        }
    }

    /// Rewrite every pair through the table. Callers must have run the
    /// matching check pass first.
    pub fn apply_pairs(&self, rows: &mut [[usize; 2]]) {
        for pair in rows.iter_mut() {
            for v in pair.iter_mut() {
                debug_assert!(self.target(*v).is_some(), "unchecked dangling reference");
                if let Some(new) = self.target(*v) {
                    *v = new;
                }
            }
        }
    }

    /// Drop the rows of a parallel array whose index is tombstoned,
    /// preserving survivor order.
    pub fn retain_rows<T>(&self, rows: &mut Vec<T>) {
        let mut index = 0usize;
        rows.retain(|_| {
            let keep = self.target(index).is_some();
            index += 1;
            keep
        });
    }

    /// Rewrite incidence lists: tombstoned entries are dropped (the
    /// entity they pointed at no longer exists), survivors remapped.
    pub fn prune_lists(&self, rows: &mut [Vec<usize>]) {
        for list in rows.iter_mut() {
            list.retain(|&v| self.target(v).is_some());
            for v in list.iter_mut() {
                if let Some(new) = self.target(*v) {
                    *v = new;
                }
            }
        }
    }
}

/// Remove vertices and rewrite every dependent array.
///
/// Vertices sit at the bottom of the dependency chain, so structural
/// references to a removed vertex (from a surviving edge or face)
/// are refused with the document left in its pre-operation state.
/// Incidence caches drop their tombstoned entries instead.
pub(crate) fn remove_vertices(
    graph: &mut PlanarGraph,
    removed: &[usize],
) -> Result<ShiftTable, GraphError> {
    let table = ShiftTable::from_removed(graph.vertices_count(), removed, "vertex")?;
    if table.is_identity() {
        return Ok(table);
    }

    table.check_pairs(&graph.edges_vertices, "edges_vertices")?;
    if let Some(rows) = &graph.faces_vertices {
        table.check_lists(rows, "faces_vertices")?;
    }

    table.apply_pairs(&mut graph.edges_vertices);
    if let Some(rows) = &mut graph.faces_vertices {
        table.apply_lists(rows);
    }
    if let Some(rows) = &mut graph.vertices_vertices {
        table.prune_lists(rows);
    }

    table.retain_rows(&mut graph.vertices_coords);
    if let Some(rows) = &mut graph.vertices_vertices {
        table.retain_rows(rows);
    }
    if let Some(rows) = &mut graph.vertices_edges {
        table.retain_rows(rows);
    }
    if let Some(rows) = &mut graph.vertices_faces {
        table.retain_rows(rows);
    }

    graph.invalidate_views();
    Ok(table)
}

/// Remove edges and rewrite every dependent array.
///
/// Refuses while a face's edge loop still references a removed edge;
/// remove (or rebuild) the face first. Per-vertex edge lists drop the
/// removed entries.
pub(crate) fn remove_edges(
    graph: &mut PlanarGraph,
    removed: &[usize],
) -> Result<ShiftTable, GraphError> {
    let table = ShiftTable::from_removed(graph.edges_count(), removed, "edge")?;
    if table.is_identity() {
        return Ok(table);
    }

    if let Some(rows) = &graph.faces_edges {
        table.check_lists(rows, "faces_edges")?;
    }

    if let Some(rows) = &mut graph.faces_edges {
        table.apply_lists(rows);
    }
    if let Some(rows) = &mut graph.vertices_edges {
        table.prune_lists(rows);
    }

    table.retain_rows(&mut graph.edges_vertices);
    table.retain_rows(&mut graph.edges_assignment);
    if let Some(rows) = &mut graph.edges_faces {
        table.retain_rows(rows);
    }

    graph.invalidate_views();
    Ok(table)
}

/// Remove faces and rewrite every dependent array.
///
/// Nothing structural references a face, so this never refuses beyond
/// an out-of-range index: every incidence list simply forgets the
/// removed faces.
pub(crate) fn remove_faces(
    graph: &mut PlanarGraph,
    removed: &[usize],
) -> Result<ShiftTable, GraphError> {
    let table = ShiftTable::from_removed(graph.faces_count(), removed, "face")?;
    if table.is_identity() {
        return Ok(table);
    }

    if let Some(rows) = &mut graph.vertices_faces {
        table.prune_lists(rows);
    }
    if let Some(rows) = &mut graph.edges_faces {
        table.prune_lists(rows);
    }
    if let Some(rows) = &mut graph.faces_faces {
        table.prune_lists(rows);
    }

    if let Some(rows) = &mut graph.faces_vertices {
        table.retain_rows(rows);
    }
    if let Some(rows) = &mut graph.faces_edges {
        table.retain_rows(rows);
    }
    if let Some(rows) = &mut graph.faces_faces {
        table.retain_rows(rows);
    }

    graph.invalidate_views();
    Ok(table)
}

/// Log-and-return helper for fail-closed refusals.
pub(crate) fn refuse<T>(op: &'static str, err: GraphError) -> Result<T, GraphError> {
    warn!("{op} refused: {err}");
    Err(err)
}
