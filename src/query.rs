//! ## Query engine
//!
//! Stateless traversal functions over a built `Node<L>`: a stack-based depth-first walk for
//! `range`/`circle_range`/`circle_range_conj` (§4.3–§4.5), and a best-first priority-queue walk
//! for the three `kNN` overloads (§4.6). None of these hold or mutate shared state, so
//! concurrent queries against the same tree are safe as long as the geometry contract's own
//! methods are pure (§4.7, §5).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::geometry::{Mbr, Point, Shape};
use crate::node::{Child, LeafGeometry, Node};

/// Depth-first range query: point leaves use `contains`, MBR leaves use `intersects` (§4.3).
pub fn range<L: LeafGeometry>(root: &Node<L>, query: &Mbr) -> Vec<(Shape, u64)> {
    let mut out = Vec::new();
    if root.is_empty() || !root.mbr.intersects(query) {
        return out;
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_leaf {
            for child in &node.children {
                if let Child::Leaf(leaf) = child {
                    if leaf.matches_range(query) {
                        out.push((leaf.shape(), leaf.id()));
                    }
                }
            }
        } else {
            for child in &node.children {
                if let Child::Internal { mbr, child } = child {
                    if mbr.intersects(query) {
                        stack.push(child);
                    }
                }
            }
        }
    }
    debug!(hits = out.len(), "range query complete");
    out
}

/// Depth-first circular range query: pruning and inclusion both use `min_dist(origin) <= r`
/// (§4.4). `origin` may be any shape the geometry contract supports.
pub fn circle_range<L: LeafGeometry>(root: &Node<L>, origin: &Shape, r: f64) -> Vec<(Shape, u64)> {
    let mut out = Vec::new();
    if root.is_empty() || root.mbr.min_dist_point_or_mbr(origin) > r {
        return out;
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_leaf {
            for child in &node.children {
                if let Child::Leaf(leaf) = child {
                    if leaf.min_dist(origin) <= r {
                        out.push((leaf.shape(), leaf.id()));
                    }
                }
            }
        } else {
            for child in &node.children {
                if let Child::Internal { mbr, child } = child {
                    if mbr.min_dist_point_or_mbr(origin) <= r {
                        stack.push(child);
                    }
                }
            }
        }
    }
    out
}

/// Conjunctive circular range query: a subtree or leaf passes iff it is within every given
/// circle, short-circuiting on the first failing center (§4.5).
pub fn circle_range_conj<L: LeafGeometry>(
    root: &Node<L>,
    queries: &[(Point, f64)],
) -> Vec<(Shape, u64)> {
    let passes_all = |mbr: &Mbr| -> bool {
        queries
            .iter()
            .all(|(center, r)| mbr.min_dist_point(center) <= *r)
    };

    let mut out = Vec::new();
    if root.is_empty() || queries.is_empty() || !passes_all(&root.mbr) {
        return out;
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_leaf {
            for child in &node.children {
                if let Child::Leaf(leaf) = child {
                    let ok = queries.iter().all(|(center, r)| {
                        leaf.min_dist(&Shape::Point(center.clone())) <= *r
                    });
                    if ok {
                        out.push((leaf.shape(), leaf.id()));
                    }
                }
            }
        } else {
            for child in &node.children {
                if let Child::Internal { mbr, child } = child {
                    if passes_all(mbr) {
                        stack.push(child);
                    }
                }
            }
        }
    }
    out
}

/// An element queued during a kNN search: either a subtree awaiting expansion or a leaf ready
/// to be reported on its next dequeue. Keeping both variants in one key-ordered queue (rather
/// than erasing types through a cast) is what lets "smallest key wins" hold across levels.
enum KnnItem<'a, L: LeafGeometry> {
    Node(&'a Node<L>),
    Leaf(&'a L),
}

struct KnnCandidate<'a, L: LeafGeometry> {
    dist: OrderedFloat<f64>,
    item: KnnItem<'a, L>,
}

impl<L: LeafGeometry> PartialEq for KnnCandidate<'_, L> {
    fn eq(&self, other: &Self) -> bool {
        self.dist == other.dist
    }
}
impl<L: LeafGeometry> Eq for KnnCandidate<'_, L> {}
impl<L: LeafGeometry> PartialOrd for KnnCandidate<'_, L> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<L: LeafGeometry> Ord for KnnCandidate<'_, L> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the smallest distance pops first.
        other.dist.cmp(&self.dist)
    }
}

/// Shared best-first kNN skeleton (§4.6). `node_key` and `leaf_key` compute the priority-queue
/// key for an internal node's MBR and a leaf's geometry respectively — in overload (a) both
/// delegate to the built-in Euclidean `min_dist`; in overloads (b)/(c) both delegate to the
/// same user-supplied distance function, which is what keeps distance ordering monotone across
/// levels. `leaf_count` turns a reported leaf into its contribution toward `k` (1 for points,
/// the stored `size` for MBR overloads).
fn knn_search<L: LeafGeometry>(
    root: &Node<L>,
    k: usize,
    keep_same: bool,
    node_key: impl Fn(&Mbr) -> f64,
    leaf_key: impl Fn(&L) -> f64,
) -> Vec<(Shape, u64)> {
    let mut out = Vec::new();
    if k == 0 || root.is_empty() {
        return out;
    }

    let mut heap: BinaryHeap<KnnCandidate<L>> = BinaryHeap::new();
    heap.push(KnnCandidate {
        dist: OrderedFloat(node_key(&root.mbr)),
        item: KnnItem::Node(root),
    });

    let mut count: u64 = 0;
    let mut last_reported_distance = f64::NEG_INFINITY;

    while let Some(KnnCandidate { dist, item }) = heap.pop() {
        let d = dist.0;
        if count as usize >= k && (!keep_same || d > last_reported_distance) {
            break;
        }

        match item {
            KnnItem::Node(node) => {
                for child in &node.children {
                    match child {
                        Child::Leaf(leaf) => {
                            heap.push(KnnCandidate {
                                dist: OrderedFloat(leaf_key(leaf)),
                                item: KnnItem::Leaf(leaf),
                            });
                        }
                        Child::Internal { mbr, child } => {
                            heap.push(KnnCandidate {
                                dist: OrderedFloat(node_key(mbr)),
                                item: KnnItem::Node(child),
                            });
                        }
                    }
                }
            }
            KnnItem::Leaf(leaf) => {
                out.push((leaf.shape(), leaf.id()));
                count += leaf.size();
                last_reported_distance = d;
            }
        }
    }

    out
}

/// Overload (a): `kNN(query: Point, k, keep_same)` — built-in Euclidean distance, one unit of
/// count per reported leaf.
pub fn knn_point<L: LeafGeometry>(
    root: &Node<L>,
    query: &Point,
    k: usize,
    keep_same: bool,
) -> Vec<(Shape, u64)> {
    let query_shape = Shape::Point(query.clone());
    knn_search(
        root,
        k,
        keep_same,
        |mbr| mbr.min_dist_point(query),
        |leaf| leaf.min_dist(&query_shape),
    )
}

/// Overload (b): `kNN(query: Point, dist_fn: Fn(&Point, &Mbr) -> f64, k, keep_same)` — only
/// meaningful over an MBR-leaf tree. The same `dist_fn` keys both internal-node pruning and
/// leaf reporting.
pub fn knn_point_with<L: LeafGeometry>(
    root: &Node<L>,
    query: &Point,
    dist_fn: impl Fn(&Point, &Mbr) -> f64,
    k: usize,
    keep_same: bool,
) -> Vec<(Shape, u64)> {
    knn_search(
        root,
        k,
        keep_same,
        |mbr| dist_fn(query, mbr),
        |leaf| dist_fn(query, &leaf.envelope()),
    )
}

/// Overload (c): `kNN(query: Mbr, dist_fn: Fn(&Mbr, &Mbr) -> f64, k, keep_same)` — only
/// meaningful over an MBR-leaf tree.
pub fn knn_mbr_with<L: LeafGeometry>(
    root: &Node<L>,
    query: &Mbr,
    dist_fn: impl Fn(&Mbr, &Mbr) -> f64,
    k: usize,
    keep_same: bool,
) -> Vec<(Shape, u64)> {
    knn_search(
        root,
        k,
        keep_same,
        |mbr| dist_fn(query, mbr),
        |leaf| dist_fn(query, &leaf.envelope()),
    )
}

/// Small helper so `circle_range`'s pruning reads the same whether `origin` is a point or
/// an MBR, without re-matching on the enum at every call site.
trait MbrDistToShape {
    fn min_dist_point_or_mbr(&self, shape: &Shape) -> f64;
}

impl MbrDistToShape for Mbr {
    fn min_dist_point_or_mbr(&self, shape: &Shape) -> f64 {
        match shape {
            Shape::Point(p) => self.min_dist_point(p),
            Shape::Mbr(m) => self.min_dist_mbr(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::node::PointLeaf;

    fn sample_points() -> Vec<PointLeaf> {
        vec![
            PointLeaf { point: Point::new(vec![0.0, 0.0]), id: 1 },
            PointLeaf { point: Point::new(vec![1.0, 1.0]), id: 2 },
            PointLeaf { point: Point::new(vec![2.0, 2.0]), id: 3 },
            PointLeaf { point: Point::new(vec![3.0, 3.0]), id: 4 },
        ]
    }

    #[test]
    fn range_matches_scenario_s1() {
        let root = build(sample_points(), 2, 2);
        let query = Mbr::new(vec![0.5, 0.5], vec![2.5, 2.5]);
        let mut ids: Vec<u64> = range(&root, &query).into_iter().map(|(_, id)| id).collect();
        ids.sort();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn circle_range_matches_scenario_s2() {
        let root = build(sample_points(), 2, 2);
        let origin = Shape::Point(Point::new(vec![0.0, 0.0]));
        let mut ids: Vec<u64> = circle_range(&root, &origin, 1.5)
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn knn_matches_scenario_s3() {
        let root = build(sample_points(), 2, 2);
        let query = Point::new(vec![0.0, 0.0]);
        let ids: Vec<u64> = knn_point(&root, &query, 2, false)
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn knn_keep_same_includes_ties() {
        let mut points = sample_points();
        // distance sqrt(2) from origin, same as id 2
        points.push(PointLeaf { point: Point::new(vec![1.0, -1.0]), id: 5 });
        let root = build(points, 2, 2);
        let query = Point::new(vec![0.0, 0.0]);
        let mut ids: Vec<u64> = knn_point(&root, &query, 2, true)
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 5]);
    }

    #[test]
    fn knn_without_keep_same_breaks_ties_at_k() {
        let mut points = sample_points();
        points.push(PointLeaf { point: Point::new(vec![1.0, -1.0]), id: 5 });
        let root = build(points, 2, 2);
        let query = Point::new(vec![0.0, 0.0]);
        let ids: Vec<u64> = knn_point(&root, &query, 2, false)
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], 1);
    }
}
