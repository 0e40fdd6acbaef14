use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::Vec3;
use rift_collision::*;

/// A grid of pillar walls roughly the density of a cluttered arena.
fn pillar_field(n: i32) -> AabbGeometry {
    let mut walls = Vec::new();
    for i in -n..n {
        for j in -n..n {
            let base = Vec3::new(i as f32 * 10.0, 0.0, j as f32 * 10.0);
            walls.push(Aabb::new(base, base + Vec3::new(1.5, 6.0, 1.5)));
        }
    }
    let bounds = walls.iter().fold(walls[0], |acc, w| acc.union(w));
    AabbGeometry::new(walls, bounds)
}

fn bench_default_perimeter_segment(c: &mut Criterion) {
    let geometry = AabbGeometry::default_perimeter();
    let from = black_box(Vec3::new(0.0, 1.0, -200.0));
    let to = black_box(Vec3::new(0.0, 1.0, 200.0));
    c.bench_function("perimeter_segment", |bencher| {
        bencher.iter(|| black_box(raycast_segment(from, to, &geometry)))
    });
}

fn bench_pillar_field_diagonal(c: &mut Criterion) {
    let geometry = pillar_field(12);
    let from = black_box(Vec3::new(-130.0, 1.0, -125.0));
    let to = black_box(Vec3::new(130.0, 1.0, 121.0));
    c.bench_function("pillar_field_diagonal", |bencher| {
        bencher.iter(|| black_box(raycast_segment(from, to, &geometry)))
    });
}

fn bench_service_line_of_sight(c: &mut Criterion) {
    let mut service = CollisionService::with_enforcement(true);
    service.initialize(None);
    let eye = black_box(Vec3::new(-40.0, 1.6, 10.0));
    let target = black_box(Vec3::new(60.0, 1.0, -30.0));
    c.bench_function("service_line_of_sight", |bencher| {
        bencher.iter(|| black_box(service.line_of_sight_blocked(eye, target)))
    });
}

criterion_group!(
    benches,
    bench_default_perimeter_segment,
    bench_pillar_field_diagonal,
    bench_service_line_of_sight,
);
criterion_main!(benches);
