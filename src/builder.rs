//! ## STR bulk loading
//!
//! This module implements Sort-Tile-Recursive packing (§4.2): it computes a vector of
//! per-dimension slab counts from the current level's item count, partitions recursively
//! along each dimension in turn, and repeats the grouping on the resulting nodes until a
//! single level fits under one parent. The loop's termination can leave the root with more
//! than `M` children — an intentional exception to the fanout bound at the top level only
//! (§4.2, §8 open questions).

use tracing::{debug, info};

use crate::geometry::Mbr;
use crate::node::{Child, LeafGeometry, Node};

/// Anything the STR partitioner can sort and union: a leaf child directly, or a
/// not-yet-wrapped subtree produced by the previous level-up pass.
trait Packable {
    fn sort_key(&self, dim: usize) -> f64;
    fn envelope(&self) -> Mbr;
}

impl<L: LeafGeometry> Packable for L {
    fn sort_key(&self, dim: usize) -> f64 {
        LeafGeometry::sort_key(self, dim)
    }
    fn envelope(&self) -> Mbr {
        LeafGeometry::envelope(self)
    }
}

/// An already-built subtree awaiting a parent, carried alongside its covering MBR so the
/// next level-up pass can sort and union without re-deriving it from the node's children.
struct PackedNode<L: LeafGeometry> {
    mbr: Mbr,
    node: Box<Node<L>>,
}

impl<L: LeafGeometry> Packable for PackedNode<L> {
    fn sort_key(&self, dim: usize) -> f64 {
        self.mbr.center_key(dim)
    }
    fn envelope(&self) -> Mbr {
        self.mbr.clone()
    }
}

/// Computes the per-dimension slab counts `s[0..D-1]` for `n` items at fanout `m` (§4.2's
/// slicing formula). When `n <= m`, every slab count is 1.
fn slab_counts(n: usize, m: usize, dims: usize) -> Vec<usize> {
    let mut remaining = n as f64 / m as f64;
    let mut s = Vec::with_capacity(dims);
    for i in 0..dims {
        let exponent = 1.0 / (dims - i) as f64;
        let si = remaining.powf(exponent).ceil().max(1.0) as usize;
        s.push(si);
        remaining /= si as f64;
    }
    s
}

/// Recursively slices `items` by sorting along `dim`, cutting into `ceil(len / s[dim])`-sized
/// contiguous groups, and recursing into dimension `dim + 1` until `dims - 1` is reached.
fn partition_recursive<T: Packable>(items: Vec<T>, dim: usize, dims: usize, s: &[usize]) -> Vec<Vec<T>> {
    let mut items = items;
    items.sort_by(|a, b| a.sort_key(dim).partial_cmp(&b.sort_key(dim)).unwrap());

    let slice_size = ((items.len() as f64) / (s[dim] as f64)).ceil().max(1.0) as usize;
    let groups: Vec<Vec<T>> = items
        .into_iter()
        .fold(Vec::new(), |mut acc: Vec<Vec<T>>, item| {
            match acc.last_mut() {
                Some(last) if last.len() < slice_size => last.push(item),
                _ => acc.push(vec![item]),
            }
            acc
        });

    if dim + 1 == dims {
        groups
    } else {
        groups
            .into_iter()
            .flat_map(|group| partition_recursive(group, dim + 1, dims, s))
            .collect()
    }
}

/// Groups `items` into STR tiles: computes the slab counts for this level, then recursively
/// partitions dimension by dimension.
fn str_group<T: Packable>(items: Vec<T>, m: usize, dims: usize) -> Vec<Vec<T>> {
    let s = slab_counts(items.len(), m, dims);
    partition_recursive(items, 0, dims, &s)
}

fn union_envelope<T: Packable>(group: &[T]) -> Mbr {
    group
        .iter()
        .map(|item| item.envelope())
        .reduce(|acc, e| acc.union(&e))
        .expect("STR groups are never empty")
}

/// Builds a tree from a flat list of leaf children via STR bulk loading (§4.2). `dims` is the
/// dimension established by the caller from the first entry; `m` is the fanout, already
/// validated to be `>= 2`.
pub fn build<L: LeafGeometry>(leaves: Vec<L>, m: usize, dims: usize) -> Node<L> {
    info!(count = leaves.len(), m, dims, "building tree via STR packing");

    let leaf_groups = str_group(leaves, m, dims);
    debug!(groups = leaf_groups.len(), "packed leaf level");

    let mut current: Vec<PackedNode<L>> = leaf_groups
        .into_iter()
        .map(|group| {
            let mbr = union_envelope(&group);
            let node = Node {
                mbr: mbr.clone(),
                children: group.into_iter().map(Child::Leaf).collect(),
                is_leaf: true,
            };
            PackedNode {
                mbr,
                node: Box::new(node),
            }
        })
        .collect();

    loop {
        let n = current.len();
        let s = slab_counts(n, m, dims);
        if s.iter().all(|&x| x == 1) {
            break;
        }

        let groups = str_group(current, m, dims);
        debug!(level_nodes = n, groups = groups.len(), "packed internal level");
        current = groups
            .into_iter()
            .map(|group| {
                let mbr = union_envelope(&group);
                let children = group
                    .into_iter()
                    .map(|p| Child::Internal {
                        mbr: p.mbr,
                        child: p.node,
                    })
                    .collect();
                let node = Node {
                    mbr: mbr.clone(),
                    children,
                    is_leaf: false,
                };
                PackedNode {
                    mbr,
                    node: Box::new(node),
                }
            })
            .collect();
    }

    if current.len() == 1 {
        *current.into_iter().next().unwrap().node
    } else {
        // Root wrap: the final level may legitimately exceed `m` children (§4.2, §8).
        let mbr = union_envelope(&current);
        let root_children = current.len();
        let children = current
            .into_iter()
            .map(|p| Child::Internal {
                mbr: p.mbr,
                child: p.node,
            })
            .collect();
        info!(root_children, "wrapping final level into root");
        Node {
            mbr,
            children,
            is_leaf: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slab_counts_for_n_le_m_are_all_one() {
        assert_eq!(slab_counts(4, 2, 2), vec![1, 1]);
        assert_eq!(slab_counts(1, 10, 3), vec![1, 1, 1]);
    }

    #[test]
    fn slab_counts_product_approximates_leaf_count() {
        // N=4, M=2, D=2: remaining=2, s0=ceil(sqrt(2))=2, remaining=1, s1=ceil(1)=1
        assert_eq!(slab_counts(4, 2, 2), vec![2, 1]);
    }

    #[test]
    fn slab_counts_distributes_across_dimensions() {
        // N=1000, M=25, D=2: remaining=40, s0=ceil(sqrt(40))=7, remaining=40/7≈5.71,
        // s1=ceil(5.71)=6
        let s = slab_counts(1000, 25, 2);
        assert_eq!(s.len(), 2);
        assert!(s[0] * s[1] >= (1000_f64 / 25.0).ceil() as usize);
    }
}
