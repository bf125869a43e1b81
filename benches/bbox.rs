use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use yologen::geom::{ProjectedPoint, yolo_box};

fn synthetic_cloud(n: usize) -> Vec<ProjectedPoint> {
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            // Mix of on-screen, off-screen and behind-camera points.
            let depth = if i % 5 == 0 { -1.0 } else { 1.0 };
            ProjectedPoint::new(1.3 * t - 0.1, (t * 7.3).fract(), depth)
        })
        .collect()
}

fn bench_bbox(c: &mut Criterion) {
    let points = synthetic_cloud(10_000);

    c.bench_function("yolo_box_10k", |b| {
        b.iter_batched(
            || points.clone(),
            |pts| black_box(yolo_box(&pts)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_bbox);
criterion_main!(benches);
