//! Per-frame cost of the headless assembly tick.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use motorviz::assembly::AssemblyScene;
use motorviz::options::Options;

const FRAME: f32 = 1.0 / 60.0;

fn running_tick_benchmark(c: &mut Criterion) {
    let options = Options::default();
    let mut scene = AssemblyScene::reference(7, &options);
    c.bench_function("tick_running", |b| {
        b.iter(|| black_box(scene.tick(black_box(FRAME))));
    });
}

fn stage_toggle_benchmark(c: &mut Criterion) {
    let options = Options::default();
    let mut scene = AssemblyScene::reference(0, &options);
    let mut stage = 0_i64;
    c.bench_function("tick_with_stage_toggle", |b| {
        b.iter(|| {
            stage = (stage + 3) % 8;
            scene.request_stage(stage);
            black_box(scene.tick(black_box(FRAME)))
        });
    });
}

fn world_transforms_benchmark(c: &mut Criterion) {
    let options = Options::default();
    let mut scene = AssemblyScene::reference(7, &options);
    for _ in 0..30 {
        let _ = scene.tick(FRAME);
    }
    c.bench_function("world_transforms", |b| {
        b.iter(|| black_box(scene.world_transforms().count()));
    });
}

criterion_group!(
    benches,
    running_tick_benchmark,
    stage_toggle_benchmark,
    world_transforms_benchmark
);
criterion_main!(benches);
