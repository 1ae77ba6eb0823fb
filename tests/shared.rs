#![allow(dead_code)]

//! Shared test fixtures for strtree's integration tests.

use strtree::geometry::{Mbr, Point};

pub const CAPACITY: usize = 2;

/// The four points from spec scenarios S1–S3: `(0,0)/1, (1,1)/2, (2,2)/3, (3,3)/4`.
pub fn diagonal_points() -> Vec<(Point, u64)> {
    vec![
        (Point::new(vec![0.0, 0.0]), 1),
        (Point::new(vec![1.0, 1.0]), 2),
        (Point::new(vec![2.0, 2.0]), 3),
        (Point::new(vec![3.0, 3.0]), 4),
    ]
}

/// `diagonal_points` plus the extra tie point from scenario S4: `(1,-1)/5`, distance 1 from
/// the origin (id 2 is at distance sqrt(2)).
pub fn diagonal_points_with_tie() -> Vec<(Point, u64)> {
    let mut points = diagonal_points();
    points.push((Point::new(vec![1.0, -1.0]), 5));
    points
}

/// The two MBR entries from scenario S5.
pub fn mbr_entries() -> Vec<(Mbr, u64, u64)> {
    vec![
        (Mbr::new(vec![0.0, 0.0], vec![1.0, 1.0]), 10, 3),
        (Mbr::new(vec![2.0, 2.0], vec![3.0, 3.0]), 20, 5),
    ]
}

pub fn euclidean_mbr_center_dist(query: &Point, mbr: &Mbr) -> f64 {
    let center: Vec<f64> = (0..mbr.dims())
        .map(|i| (mbr.low[i] + mbr.high[i]) / 2.0)
        .collect();
    let center = Point::new(center);
    query.distance(&center)
}
