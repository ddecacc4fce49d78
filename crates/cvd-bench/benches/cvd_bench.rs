//! Benchmarks for color-vision-deficiency simulation.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use cvd_bench::{flat_image, noise_image};
use cvd_core::Rgba8;
use cvd_math::Mat3;
use cvd_vision::{LmsColor, VisionCondition, VisionSimulator, simulate_color};

/// Single colors: raw round trip, uncached and cached simulation.
fn bench_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("color");
    let colors: Vec<Rgba8> = (0..10_000u32)
        .map(|i| Rgba8::opaque(i as u8, (i >> 8) as u8, (i * 7) as u8))
        .collect();
    group.throughput(Throughput::Elements(colors.len() as u64));

    group.bench_function("lms_round_trip", |b| {
        b.iter(|| {
            colors
                .iter()
                .map(|&px| {
                    let mut lms = LmsColor::from_rgb(black_box(px)).unwrap();
                    lms.apply_transform(&Mat3::IDENTITY).unwrap();
                    lms.to_rgb()
                })
                .collect::<Vec<_>>()
        })
    });

    group.bench_function("uncached", |b| {
        b.iter(|| {
            colors
                .iter()
                .map(|&px| simulate_color(black_box(px), VisionCondition::Deuteranopia).unwrap())
                .collect::<Vec<_>>()
        })
    });

    let mut sim = VisionSimulator::new();
    group.bench_function("cached", |b| {
        b.iter(|| {
            colors
                .iter()
                .map(|&px| sim.simulate_rgba8(black_box(px), VisionCondition::Deuteranopia).unwrap())
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

/// Full-HD images, sequential vs parallel, flat vs noisy content.
fn bench_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_1080p");
    group.sample_size(10);
    let (w, h) = (1920, 1080);
    group.throughput(Throughput::Elements(w as u64 * h as u64));

    let inputs = [("flat", flat_image(w, h, 16)), ("noise", noise_image(w, h))];
    for (name, src) in &inputs {
        for parallel in [false, true] {
            let mode = if parallel { "parallel" } else { "sequential" };
            let mut sim = VisionSimulator::new().with_parallel(parallel);
            group.bench_with_input(BenchmarkId::new(*name, mode), src, |b, src| {
                b.iter(|| {
                    let mut img = src.clone();
                    sim.simulate_image(&mut img, VisionCondition::Protanopia).unwrap();
                    img
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_color, bench_image);
criterion_main!(benches);
