//! ## Node & entry model
//!
//! A node is a tagged `{Leaf, Internal}` variant carrying a covering MBR and a fixed child
//! array (§4.1). A child is one of three shapes: a point leaf, an MBR leaf, or an internal
//! pointer to a subtree. The two kinds of leaf child are not mixed within one leaf node — the
//! builder only ever produces one kind per tree, driven by whichever of `build_points` /
//! `build_mbrs` was called — so the tree itself is generic over the leaf-child type `L`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Mbr, Point, Shape};

/// Everything the builder and the query engine need from a leaf child, regardless of whether
/// it wraps a point or an MBR. Implemented by `PointLeaf` and `MbrLeaf` below.
pub trait LeafGeometry: Clone + std::fmt::Debug {
    /// The tight MBR enclosing this leaf's geometry.
    fn envelope(&self) -> Mbr;

    /// STR sort key along `dim`: the coordinate itself for points, the center-proxy for MBRs.
    fn sort_key(&self, dim: usize) -> f64;

    /// The geometry to hand back to callers.
    fn shape(&self) -> Shape;

    /// The payload identifier.
    fn id(&self) -> u64;

    /// How much this leaf counts toward a kNN result budget: 1 for points, the stored size
    /// for MBR leaves (§4.6).
    fn size(&self) -> u64;

    /// Euclidean distance from this leaf's geometry to `other`.
    fn min_dist(&self, other: &Shape) -> f64;

    /// Inclusion predicate for `range`: `contains` for points, `intersects` for MBRs (§4.3).
    fn matches_range(&self, query: &Mbr) -> bool;
}

/// A leaf child wrapping a single point payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointLeaf {
    pub point: Point,
    pub id: u64,
}

impl LeafGeometry for PointLeaf {
    fn envelope(&self) -> Mbr {
        Mbr::from_point(&self.point)
    }

    fn sort_key(&self, dim: usize) -> f64 {
        self.point.coords[dim]
    }

    fn shape(&self) -> Shape {
        Shape::Point(self.point.clone())
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn size(&self) -> u64 {
        1
    }

    fn min_dist(&self, other: &Shape) -> f64 {
        Shape::Point(self.point.clone()).min_dist(other)
    }

    fn matches_range(&self, query: &Mbr) -> bool {
        query.contains(&self.point)
    }
}

/// A leaf child wrapping a pre-aggregated MBR payload with an explicit `size` count.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MbrLeaf {
    pub mbr: Mbr,
    pub id: u64,
    pub size: u64,
}

impl LeafGeometry for MbrLeaf {
    fn envelope(&self) -> Mbr {
        self.mbr.clone()
    }

    fn sort_key(&self, dim: usize) -> f64 {
        self.mbr.center_key(dim)
    }

    fn shape(&self) -> Shape {
        Shape::Mbr(self.mbr.clone())
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn min_dist(&self, other: &Shape) -> f64 {
        Shape::Mbr(self.mbr.clone()).min_dist(other)
    }

    fn matches_range(&self, query: &Mbr) -> bool {
        query.intersects(&self.mbr)
    }
}

/// A child of a node: either a reportable leaf or a pointer to an internal subtree.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Child<L: LeafGeometry> {
    Leaf(L),
    Internal { mbr: Mbr, child: Box<Node<L>> },
}

/// A node in the tree: a covering MBR plus a homogeneous child array (§3, §4.1).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node<L: LeafGeometry> {
    pub mbr: Mbr,
    pub children: Vec<Child<L>>,
    pub is_leaf: bool,
}

impl<L: LeafGeometry> Node<L> {
    /// Number of children. Every non-root node must have `1..=M`; the root is exempt (§3).
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
