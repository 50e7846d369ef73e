use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geodiagram_core::{ArcType, Circle, DetectedCircle, DetectionMethod, Line, Point};
use geodiagram_primitives::PrimitiveSet;
use geodiagram_resolve::{cluster_points, CoreResolver, ResolveParams};

/// A fan of chords through a circle, with slightly jittered endpoints.
fn make_fixture(n_lines: usize) -> PrimitiveSet {
    let center = Point::new(400.0, 300.0);
    let lines = (0..n_lines)
        .map(|i| {
            let a = i as f64 * std::f64::consts::PI / n_lines as f64;
            let jitter = (i % 3) as f64 * 0.7;
            let d = nalgebra::Vector2::new(a.cos(), a.sin()) * (180.0 + jitter);
            Line::new(center - d, center + d)
        })
        .collect();
    let circles = vec![DetectedCircle::new(
        Circle::new(center, 150.0),
        ArcType::FullCircle,
        DetectionMethod::Hough,
        1.0,
    )];
    PrimitiveSet::new(lines, circles)
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = CoreResolver::new(ResolveParams::default());
    let small = make_fixture(6);
    let large = make_fixture(16);

    c.bench_function("resolve_6_chords", |b| {
        b.iter(|| {
            let parse = resolver.resolve(black_box(&small), Some((800.0, 600.0)));
            black_box(parse.points.len())
        })
    });

    c.bench_function("resolve_16_chords", |b| {
        b.iter(|| {
            let parse = resolver.resolve(black_box(&large), Some((800.0, 600.0)));
            black_box(parse.points.len())
        })
    });
}

fn bench_cluster(c: &mut Criterion) {
    let points: Vec<Point> = (0..200)
        .map(|i| {
            let g = (i % 12) as f64;
            Point::new(60.0 * g + (i % 5) as f64 * 0.9, 40.0 * (g % 4.0) + (i % 7) as f64 * 0.6)
        })
        .collect();

    c.bench_function("cluster_200_points_12_groups", |b| {
        b.iter(|| black_box(cluster_points(black_box(&points), 15.0, 20, 100).len()))
    });
}

criterion_group!(resolve, bench_resolve, bench_cluster);
criterion_main!(resolve);
