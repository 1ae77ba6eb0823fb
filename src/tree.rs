//! ## Tree
//!
//! `Tree` is the public handle returned by the builder and consumed by every query. It is
//! immutable once built (§3 lifecycle) and holds no synchronization primitives of its own,
//! because nothing in the core ever mutates it after construction (§5).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::builder;
use crate::exceptions::StrtreeError;
use crate::geometry::{uniform_mbr_dim, uniform_point_dim, Mbr, Point, Shape};
use crate::node::{LeafGeometry, MbrLeaf, Node, PointLeaf};
use crate::query;

/// A static, bulk-loaded R-tree over point entries.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointTree {
    root: Node<PointLeaf>,
}

impl PointTree {
    /// Builds a tree from `(Point, id)` entries via STR bulk loading (§4.2, §6 `build_points`).
    ///
    /// # Errors
    ///
    /// Returns [`StrtreeError::EmptyInput`] if `entries` is empty, [`StrtreeError::DimensionMismatch`]
    /// if the points don't share one dimension, or [`StrtreeError::InvalidFanout`] if `m < 2`.
    pub fn build(entries: Vec<(Point, u64)>, m: usize) -> Result<Self, StrtreeError> {
        if m < 2 {
            return Err(StrtreeError::InvalidFanout { m });
        }
        let points: Vec<Point> = entries.iter().map(|(p, _)| p.clone()).collect();
        let dims = uniform_point_dim(&points)?;

        let leaves: Vec<PointLeaf> = entries
            .into_iter()
            .map(|(point, id)| PointLeaf { point, id })
            .collect();
        info!(count = leaves.len(), m, dims, "building PointTree");
        Ok(PointTree {
            root: builder::build(leaves, m, dims),
        })
    }

    pub fn range(&self, query_mbr: &Mbr) -> Vec<(Shape, u64)> {
        query::range(&self.root, query_mbr)
    }

    pub fn circle_range(&self, origin: &Shape, r: f64) -> Vec<(Shape, u64)> {
        query::circle_range(&self.root, origin, r)
    }

    pub fn circle_range_conj(&self, queries: &[(Point, f64)]) -> Vec<(Shape, u64)> {
        query::circle_range_conj(&self.root, queries)
    }

    /// kNN overload (a): built-in Euclidean distance, one unit of count per result (§4.6).
    pub fn knn(&self, q: &Point, k: usize, keep_same: bool) -> Vec<(Shape, u64)> {
        query::knn_point(&self.root, q, k, keep_same)
    }

    pub fn root(&self) -> &Node<PointLeaf> {
        &self.root
    }
}

/// A static, bulk-loaded R-tree over pre-aggregated MBR entries, each carrying a `size` count.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MbrTree {
    root: Node<MbrLeaf>,
}

impl MbrTree {
    /// Builds a tree from `(Mbr, id, size)` entries via STR bulk loading (§4.2, §6 `build_mbrs`).
    ///
    /// # Errors
    ///
    /// Same as [`PointTree::build`], checked against MBR dimension instead of point dimension.
    pub fn build(entries: Vec<(Mbr, u64, u64)>, m: usize) -> Result<Self, StrtreeError> {
        if m < 2 {
            return Err(StrtreeError::InvalidFanout { m });
        }
        let mbrs: Vec<Mbr> = entries.iter().map(|(mbr, _, _)| mbr.clone()).collect();
        let dims = uniform_mbr_dim(&mbrs)?;

        let leaves: Vec<MbrLeaf> = entries
            .into_iter()
            .map(|(mbr, id, size)| MbrLeaf { mbr, id, size })
            .collect();
        info!(count = leaves.len(), m, dims, "building MbrTree");
        Ok(MbrTree {
            root: builder::build(leaves, m, dims),
        })
    }

    pub fn range(&self, query_mbr: &Mbr) -> Vec<(Shape, u64)> {
        query::range(&self.root, query_mbr)
    }

    pub fn circle_range(&self, origin: &Shape, r: f64) -> Vec<(Shape, u64)> {
        query::circle_range(&self.root, origin, r)
    }

    pub fn circle_range_conj(&self, queries: &[(Point, f64)]) -> Vec<(Shape, u64)> {
        query::circle_range_conj(&self.root, queries)
    }

    /// kNN overload (b): `query: Point`, user-supplied `dist_fn(Point, Mbr)`, count by `size` (§4.6).
    pub fn knn_point_with(
        &self,
        q: &Point,
        dist_fn: impl Fn(&Point, &Mbr) -> f64,
        k: usize,
        keep_same: bool,
    ) -> Vec<(Shape, u64)> {
        query::knn_point_with(&self.root, q, dist_fn, k, keep_same)
    }

    /// kNN overload (c): `query: Mbr`, user-supplied `dist_fn(Mbr, Mbr)`, count by `size` (§4.6).
    pub fn knn_mbr_with(
        &self,
        q: &Mbr,
        dist_fn: impl Fn(&Mbr, &Mbr) -> f64,
        k: usize,
        keep_same: bool,
    ) -> Vec<(Shape, u64)> {
        query::knn_mbr_with(&self.root, q, dist_fn, k, keep_same)
    }

    pub fn root(&self) -> &Node<MbrLeaf> {
        &self.root
    }
}

/// Checks the fanout bound (§8 property 2): every non-root node has `1..=m` children.
/// Exposed for tests and host-side validation; not used internally since the builder already
/// guarantees this by construction.
pub fn check_fanout_bound<L: LeafGeometry>(root: &Node<L>, m: usize) -> bool {
    fn walk<L: LeafGeometry>(node: &Node<L>, m: usize, is_root: bool) -> bool {
        let len = node.len();
        if !is_root && (len == 0 || len > m) {
            return false;
        }
        node.children.iter().all(|child| match child {
            crate::node::Child::Leaf(_) => true,
            crate::node::Child::Internal { child, .. } => walk(child, m, false),
        })
    }
    walk(root, m, true)
}

/// Checks covering-MBR soundness (§8 property 1): every node's MBR tightly contains every
/// descendant's geometry, recomputed bottom-up from the leaves.
pub fn check_covering_mbr_soundness<L: LeafGeometry>(node: &Node<L>) -> bool {
    if node.is_leaf {
        let envelopes: Vec<Mbr> = node
            .children
            .iter()
            .map(|c| match c {
                crate::node::Child::Leaf(l) => l.envelope(),
                crate::node::Child::Internal { .. } => {
                    panic!("leaf node held an internal child")
                }
            })
            .collect();
        Mbr::union_all(envelopes.iter()).as_ref() == Some(&node.mbr)
    } else {
        let child_mbrs: Vec<&Mbr> = node
            .children
            .iter()
            .map(|c| match c {
                crate::node::Child::Internal { mbr, .. } => mbr,
                crate::node::Child::Leaf(_) => panic!("internal node held a leaf child"),
            })
            .collect();
        let sound_here = Mbr::union_all(child_mbrs.into_iter()).as_ref() == Some(&node.mbr);
        sound_here
            && node.children.iter().all(|c| match c {
                crate::node::Child::Internal { child, .. } => check_covering_mbr_soundness(child),
                crate::node::Child::Leaf(_) => unreachable!(),
            })
    }
}
