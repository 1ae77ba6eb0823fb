#![cfg(feature = "serde")]

#[path = "shared.rs"]
mod shared;
use shared::*;

use strtree::geometry::{Mbr, Point};
use strtree::tree::{MbrTree, PointTree};

#[test]
fn point_tree_round_trips_through_bincode() -> anyhow::Result<()> {
    let tree = PointTree::build(diagonal_points(), CAPACITY)?;

    let encoded: Vec<u8> = bincode::serialize(&tree)?;
    let decoded: PointTree = bincode::deserialize(&encoded[..])?;

    let query = Mbr::new(vec![0.5, 0.5], vec![2.5, 2.5]);
    assert_eq!(tree.range(&query), decoded.range(&query));

    let knn_query = Point::new(vec![0.0, 0.0]);
    assert_eq!(
        tree.knn(&knn_query, 2, false),
        decoded.knn(&knn_query, 2, false)
    );
    Ok(())
}

#[test]
fn mbr_tree_round_trips_through_bincode() -> anyhow::Result<()> {
    let tree = MbrTree::build(mbr_entries(), CAPACITY)?;

    let encoded: Vec<u8> = bincode::serialize(&tree)?;
    let decoded: MbrTree = bincode::deserialize(&encoded[..])?;

    let query = Mbr::new(vec![-1.0, -1.0], vec![4.0, 4.0]);
    assert_eq!(tree.range(&query), decoded.range(&query));
    Ok(())
}
