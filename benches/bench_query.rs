use shared::*;

use criterion::{criterion_group, Criterion};
use std::hint::black_box;
use strtree::geometry::{Mbr, Point, Shape};
use strtree::tree::PointTree;
use tracing::info;

fn benchmark_range_points_2d(_c: &mut Criterion) {
    info!("Setting up benchmark_range_points_2d");
    let points = generate_2d_points(BENCH_NUM_POINTS);
    let tree = PointTree::build(points, BENCH_FANOUT).unwrap();
    let query = Mbr::new(vec![400.0, 400.0], vec![600.0, 600.0]);
    let mut cc = configure_criterion();
    cc.bench_function("range_points_2d", |b| {
        b.iter(|| black_box(tree.range(&query)))
    });
}

fn benchmark_circle_range_points_2d(_c: &mut Criterion) {
    info!("Setting up benchmark_circle_range_points_2d");
    let points = generate_2d_points(BENCH_NUM_POINTS);
    let tree = PointTree::build(points, BENCH_FANOUT).unwrap();
    let origin = Shape::Point(Point::new(vec![500.0, 500.0]));
    let mut cc = configure_criterion();
    cc.bench_function("circle_range_points_2d", |b| {
        b.iter(|| black_box(tree.circle_range(&origin, BENCH_RANGE_RADIUS)))
    });
}

fn benchmark_knn_points_2d(_c: &mut Criterion) {
    info!("Setting up benchmark_knn_points_2d");
    let points = generate_2d_points(BENCH_NUM_POINTS);
    let tree = PointTree::build(points, BENCH_FANOUT).unwrap();
    let query = Point::new(vec![500.0, 500.0]);
    let mut cc = configure_criterion();
    cc.bench_function("knn_points_2d", |b| {
        b.iter(|| black_box(tree.knn(&query, BENCH_KNN_SIZE, false)))
    });
}

criterion_group!(
    benches,
    benchmark_range_points_2d,
    benchmark_circle_range_points_2d,
    benchmark_knn_points_2d,
);
