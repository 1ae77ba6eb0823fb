//! ## Geometry contract
//!
//! This module provides the minimal geometry primitives the rest of the crate builds on:
//! a `D`-dimensional `Point`, an axis-aligned `Mbr` (minimum bounding rectangle/box), and a
//! `Shape` enum unifying the two so that queries can be phrased against either. Dimension is
//! not a compile-time parameter; it is fixed per tree at build time and checked at runtime,
//! the way a bulk-loaded index discovers its dimensionality from the first entry it sees.

use crate::exceptions::StrtreeError;

/// A point in `D`-dimensional space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub coords: Vec<f64>,
}

impl Point {
    pub fn new(coords: Vec<f64>) -> Self {
        Point { coords }
    }

    pub fn dims(&self) -> usize {
        self.coords.len()
    }

    /// Squared Euclidean distance to another point of the same dimension.
    pub fn distance_sq(&self, other: &Point) -> f64 {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum()
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_sq(other).sqrt()
    }
}

/// An axis-aligned minimum bounding rectangle (or box, in higher dimensions):
/// `low[i] <= high[i]` for every dimension `i`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mbr {
    pub low: Vec<f64>,
    pub high: Vec<f64>,
}

impl Mbr {
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> Self {
        Mbr { low, high }
    }

    pub fn dims(&self) -> usize {
        self.low.len()
    }

    /// The degenerate box tightly enclosing a single point.
    pub fn from_point(point: &Point) -> Self {
        Mbr {
            low: point.coords.clone(),
            high: point.coords.clone(),
        }
    }

    /// STR sort key along `dim`: twice the center, kept as a monotone proxy for
    /// `(low + high) / 2` so dividing by two can be skipped entirely.
    pub fn center_key(&self, dim: usize) -> f64 {
        self.low[dim] + self.high[dim]
    }

    pub fn contains(&self, point: &Point) -> bool {
        (0..self.dims()).all(|i| point.coords[i] >= self.low[i] && point.coords[i] <= self.high[i])
    }

    pub fn intersects(&self, other: &Mbr) -> bool {
        (0..self.dims()).all(|i| self.low[i] <= other.high[i] && other.low[i] <= self.high[i])
    }

    /// The tight union of `self` and `other`.
    pub fn union(&self, other: &Mbr) -> Mbr {
        let low = (0..self.dims())
            .map(|i| self.low[i].min(other.low[i]))
            .collect();
        let high = (0..self.dims())
            .map(|i| self.high[i].max(other.high[i]))
            .collect();
        Mbr { low, high }
    }

    /// Minimum Euclidean distance from this box to a point (0 if the point is inside).
    pub fn min_dist_point(&self, point: &Point) -> f64 {
        self.min_dist_sq_point(point).sqrt()
    }

    fn min_dist_sq_point(&self, point: &Point) -> f64 {
        (0..self.dims())
            .map(|i| {
                let c = point.coords[i];
                let d = if c < self.low[i] {
                    self.low[i] - c
                } else if c > self.high[i] {
                    c - self.high[i]
                } else {
                    0.0
                };
                d * d
            })
            .sum()
    }

    /// Minimum Euclidean distance between two boxes (0 if they intersect).
    pub fn min_dist_mbr(&self, other: &Mbr) -> f64 {
        self.min_dist_sq_mbr(other).sqrt()
    }

    fn min_dist_sq_mbr(&self, other: &Mbr) -> f64 {
        (0..self.dims())
            .map(|i| {
                let d = if other.high[i] < self.low[i] {
                    self.low[i] - other.high[i]
                } else if other.low[i] > self.high[i] {
                    other.low[i] - self.high[i]
                } else {
                    0.0
                };
                d * d
            })
            .sum()
    }

    pub fn union_all<'a, I: IntoIterator<Item = &'a Mbr>>(mbrs: I) -> Option<Mbr> {
        let mut iter = mbrs.into_iter();
        let first = iter.next()?.clone();
        Some(iter.fold(first, |acc, m| acc.union(m)))
    }
}

/// A shape consumed and returned by queries: either a point or an MBR.
///
/// The spec allows `circle_range`'s origin and `kNN`'s point-query overloads to be any shape
/// the geometry contract supports; a point and an axis-aligned box are the two shapes this
/// crate's leaves and queries actually need.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    Point(Point),
    Mbr(Mbr),
}

impl Shape {
    pub fn dims(&self) -> usize {
        match self {
            Shape::Point(p) => p.dims(),
            Shape::Mbr(m) => m.dims(),
        }
    }

    /// Minimum Euclidean distance between this shape and another (0 if they intersect/touch).
    pub fn min_dist(&self, other: &Shape) -> f64 {
        match (self, other) {
            (Shape::Point(a), Shape::Point(b)) => a.distance(b),
            (Shape::Point(p), Shape::Mbr(m)) | (Shape::Mbr(m), Shape::Point(p)) => {
                m.min_dist_point(p)
            }
            (Shape::Mbr(a), Shape::Mbr(b)) => a.min_dist_mbr(b),
        }
    }

    pub fn is_intersect(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Point(a), Shape::Point(b)) => a == b,
            (Shape::Point(p), Shape::Mbr(m)) | (Shape::Mbr(m), Shape::Point(p)) => m.contains(p),
            (Shape::Mbr(a), Shape::Mbr(b)) => a.intersects(b),
        }
    }

    /// The tight MBR enclosing this shape.
    pub fn envelope(&self) -> Mbr {
        match self {
            Shape::Point(p) => Mbr::from_point(p),
            Shape::Mbr(m) => m.clone(),
        }
    }
}

/// Checks that every coordinate vector in `points` shares the dimension of the first one.
pub(crate) fn uniform_point_dim(points: &[Point]) -> Result<usize, StrtreeError> {
    let expected = points.first().map(|p| p.dims()).ok_or(StrtreeError::EmptyInput)?;
    for p in points {
        if p.dims() != expected {
            return Err(StrtreeError::DimensionMismatch {
                expected,
                actual: p.dims(),
            });
        }
    }
    Ok(expected)
}

/// Checks that every MBR in `mbrs` shares the dimension of the first one.
pub(crate) fn uniform_mbr_dim(mbrs: &[Mbr]) -> Result<usize, StrtreeError> {
    let expected = mbrs.first().map(|m| m.dims()).ok_or(StrtreeError::EmptyInput)?;
    for m in mbrs {
        if m.dims() != expected {
            return Err(StrtreeError::DimensionMismatch {
                expected,
                actual: m.dims(),
            });
        }
    }
    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance_is_euclidean() {
        let a = Point::new(vec![0.0, 0.0]);
        let b = Point::new(vec![3.0, 4.0]);
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn mbr_contains_and_intersects() {
        let m = Mbr::new(vec![0.0, 0.0], vec![10.0, 10.0]);
        assert!(m.contains(&Point::new(vec![5.0, 5.0])));
        assert!(!m.contains(&Point::new(vec![11.0, 0.0])));

        let other = Mbr::new(vec![5.0, 5.0], vec![15.0, 15.0]);
        assert!(m.intersects(&other));

        let disjoint = Mbr::new(vec![20.0, 20.0], vec![30.0, 30.0]);
        assert!(!m.intersects(&disjoint));
    }

    #[test]
    fn mbr_union_is_tight() {
        let a = Mbr::new(vec![0.0, 0.0], vec![1.0, 1.0]);
        let b = Mbr::new(vec![2.0, -1.0], vec![3.0, 0.5]);
        let u = a.union(&b);
        assert_eq!(u.low, vec![0.0, -1.0]);
        assert_eq!(u.high, vec![3.0, 1.0]);
    }

    #[test]
    fn mbr_min_dist_point_is_zero_when_inside() {
        let m = Mbr::new(vec![0.0, 0.0], vec![10.0, 10.0]);
        assert_eq!(m.min_dist_point(&Point::new(vec![5.0, 5.0])), 0.0);
        assert_eq!(m.min_dist_point(&Point::new(vec![15.0, 0.0])), 5.0);
    }

    #[test]
    fn mbr_min_dist_mbr_is_zero_when_touching() {
        let a = Mbr::new(vec![0.0, 0.0], vec![1.0, 1.0]);
        let b = Mbr::new(vec![1.0, 0.0], vec![2.0, 1.0]);
        assert_eq!(a.min_dist_mbr(&b), 0.0);
        let c = Mbr::new(vec![4.0, 0.0], vec![5.0, 1.0]);
        assert_eq!(a.min_dist_mbr(&c), 3.0);
    }

    #[test]
    fn uniform_point_dim_rejects_mismatch() {
        let points = vec![Point::new(vec![0.0, 0.0]), Point::new(vec![1.0, 1.0, 1.0])];
        assert!(matches!(
            uniform_point_dim(&points),
            Err(StrtreeError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn uniform_point_dim_rejects_empty() {
        assert!(matches!(uniform_point_dim(&[]), Err(StrtreeError::EmptyInput)));
    }
}
