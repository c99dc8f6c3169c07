//! Property-based checks for the remapper, merge, clean, and fragment.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crease_graph::prelude::*;

fn doc(coords: Vec<Vec<f64>>, edges: Vec<[usize; 2]>) -> GraphDocument {
    GraphDocument::from_seed(coords, edges, vec![])
}

proptest! {
    #[test]
    fn shift_table_matches_prefix_counts(
        len in 1usize..64,
        raw_removals in prop::collection::vec(0usize..64, 0..12),
    ) {
        let mut removed: Vec<usize> = raw_removals.into_iter().filter(|&r| r < len).collect();
        let table = ShiftTable::from_removed(len, &removed, "vertex").unwrap();
        removed.sort_unstable();
        removed.dedup();

        let mut next = 0usize;
        for old in 0..len {
            if removed.binary_search(&old).is_ok() {
                prop_assert_eq!(table.target(old), None);
            } else {
                // new = old - |{r in R : r <= old}|
                let prefix = removed.iter().filter(|&&r| r <= old).count();
                prop_assert_eq!(table.target(old), Some(old - prefix));
                prop_assert_eq!(table.target(old), Some(next));
                next += 1;
            }
        }
        prop_assert_eq!(table.survivor_len(), next);
        prop_assert_eq!(table.removed_len(), removed.len());
    }

    #[test]
    fn merge_count_equals_equivalence_classes(
        points in prop::collection::vec((0.0f64..1.0, 0.0f64..1.0), 0..32),
        eps in prop::sample::select(vec![0.0, 1e-6, 0.01, 0.05, 0.2]),
    ) {
        let n = points.len();
        // brute-force transitive closure over "distance <= eps"
        let mut class = (0..n).collect::<Vec<_>>();
        loop {
            let mut changed = false;
            for i in 0..n {
                for j in 0..n {
                    let d = ((points[i].0 - points[j].0).powi(2)
                        + (points[i].1 - points[j].1).powi(2))
                    .sqrt();
                    if d <= eps && class[j] < class[i] {
                        class[i] = class[j];
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
        let mut roots: Vec<usize> = class.clone();
        roots.sort_unstable();
        roots.dedup();

        let coords = points.iter().map(|&(x, y)| vec![x, y]).collect();
        let mut graph = doc(coords, vec![]).to_graph().unwrap();
        let removed = graph.merge_duplicate_vertices(eps).unwrap();

        prop_assert_eq!(removed, n - roots.len());
        prop_assert_eq!(graph.vertices_count(), roots.len());
        // fixed point: every surviving pair is separated by more than eps
        let survivors = graph.vertices_coords();
        for i in 0..survivors.len() {
            for j in (i + 1)..survivors.len() {
                let d = ((survivors[i][0] - survivors[j][0]).powi(2)
                    + (survivors[i][1] - survivors[j][1]).powi(2))
                .sqrt();
                prop_assert!(d > eps);
            }
        }
        prop_assert_eq!(graph.merge_duplicate_vertices(eps).unwrap(), 0);
    }

    #[test]
    fn clean_is_idempotent_on_arbitrary_graphs(
        n in 1usize..8,
        raw_edges in prop::collection::vec((0usize..8, 0usize..8), 0..16),
    ) {
        // few vertices, many random endpoints: circular and duplicate
        // edges occur often
        let coords: Vec<Vec<f64>> = (0..n)
            .map(|i| vec![(i % 3) as f64 * 0.5, (i / 3) as f64 * 0.5])
            .collect();
        let edges: Vec<[usize; 2]> = raw_edges
            .into_iter()
            .map(|(u, v)| [u % n, v % n])
            .collect();
        let mut graph = doc(coords, edges).to_graph().unwrap();

        graph.clean(CleanOptions::default()).unwrap();
        let settled = graph.to_document();
        let second = graph.clean(CleanOptions::default()).unwrap();
        prop_assert_eq!(second, CleanReport::default());
        prop_assert_eq!(graph.to_document(), settled);
    }

    #[test]
    fn fragment_leaves_no_interior_crossings_on_grid_segments(
        raw_segments in prop::collection::vec(
            ((0usize..5, 0usize..5), (0usize..5, 0usize..5)),
            1..8,
        ),
    ) {
        let mut coords = Vec::new();
        let mut edges = Vec::new();
        for ((ax, ay), (bx, by)) in raw_segments {
            if (ax, ay) == (bx, by) {
                continue;
            }
            let a = coords.len();
            coords.push(vec![ax as f64 * 0.25, ay as f64 * 0.25]);
            coords.push(vec![bx as f64 * 0.25, by as f64 * 0.25]);
            edges.push([a, a + 1]);
        }
        prop_assume!(!edges.is_empty());

        let mut graph = doc(coords, edges).to_graph().unwrap();
        graph.fragment(EPSILON).unwrap();
        prop_assert!(planar_violation(&graph, EPSILON).is_none());

        // planarization settles in one pass
        let settled = graph.to_document();
        graph.fragment(EPSILON).unwrap();
        prop_assert_eq!(graph.to_document(), settled);
    }
}

#[test]
fn fragment_handles_a_seeded_random_tangle() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut coords = Vec::new();
    let mut edges = Vec::new();
    for _ in 0..24 {
        let a = coords.len();
        coords.push(vec![rng.r#gen::<f64>(), rng.r#gen::<f64>()]);
        coords.push(vec![rng.r#gen::<f64>(), rng.r#gen::<f64>()]);
        edges.push([a, a + 1]);
    }
    let mut graph = doc(coords, edges).to_graph().unwrap();
    graph.fragment(EPSILON).unwrap();
    // epsilon-merging crossing points can perturb split chains off the
    // original lines by up to epsilon, so allow a proportional slack
    assert!(planar_violation(&graph, 10.0 * EPSILON).is_none());
}

/// Returns the first pair of edges that still cross strictly between
/// their endpoints (outside `tolerance` of every endpoint).
fn planar_violation(graph: &PlanarGraph, tolerance: f64) -> Option<(usize, usize)> {
    let coords = graph.vertices_coords();
    let edges = graph.edges_vertices();
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            let [a, b] = edges[i];
            let [c, d] = edges[j];
            if a == c || a == d || b == c || b == d {
                continue;
            }
            let (pa, pb, pc, pd) = (coords[a], coords[b], coords[c], coords[d]);
            let r = [pb[0] - pa[0], pb[1] - pa[1]];
            let s = [pd[0] - pc[0], pd[1] - pc[1]];
            let denom = r[0] * s[1] - r[1] * s[0];
            if denom.abs() < 1e-12 {
                continue;
            }
            let qp = [pc[0] - pa[0], pc[1] - pa[1]];
            let t = (qp[0] * s[1] - qp[1] * s[0]) / denom;
            let u = (qp[0] * r[1] - qp[1] * r[0]) / denom;
            if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
                continue;
            }
            let p = [pa[0] + t * r[0], pa[1] + t * r[1]];
            let clear_of_endpoints = [pa, pb, pc, pd].iter().all(|q| {
                ((p[0] - q[0]).powi(2) + (p[1] - q[1]).powi(2)).sqrt() > tolerance
            });
            if clear_of_endpoints {
                return Some((i, j));
            }
        }
    }
    None
}
