//! # strtree
//!
//! A static, bulk-loaded, multi-dimensional R-tree: build once via Sort-Tile-Recursive
//! packing, then query with range, circular, and k-nearest-neighbor searches. There is no
//! insert or delete after construction — see `builder` for how a tree is built and
//! [`query`] for how it is searched.
//!
//! ```
//! use strtree::geometry::{Mbr, Point};
//! use strtree::tree::PointTree;
//!
//! let entries = vec![
//!     (Point::new(vec![0.0, 0.0]), 1),
//!     (Point::new(vec![1.0, 1.0]), 2),
//!     (Point::new(vec![2.0, 2.0]), 3),
//! ];
//! let tree = PointTree::build(entries, 2).unwrap();
//! let hits = tree.range(&Mbr::new(vec![0.5, 0.5], vec![2.5, 2.5]));
//! assert_eq!(hits.len(), 2);
//! ```

mod builder;
pub mod exceptions;
pub mod geometry;
mod logging;
pub mod node;
pub mod query;
pub mod tree;
