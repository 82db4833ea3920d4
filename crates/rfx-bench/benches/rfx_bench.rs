//! Benchmarks for rfx effects.
//!
//! Run with: `cargo bench -p rfx-bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rfx_core::{ColorBgra, Surface};
use rfx_ops::effects::{MedianData, MedianEffect, PosterizeData, PosterizeEffect, SoftenPortraitEffect};
use rfx_ops::pixel_ops::Desaturate;
use rfx_ops::{BlendOp, BinaryPixelOp, Effect, RenderContext, UnaryPixelOp};
use std::hint::black_box;

fn pattern(width: i32, height: i32) -> Surface {
    Surface::from_fn(width, height, |x, y| {
        let v = (x * 7 + y * 13) ^ (x * y);
        ColorBgra::from_bgra(v as u8, (v >> 3) as u8, (v >> 5) as u8, 255)
    })
}

/// Median cost against radius; the incremental sweep should grow roughly
/// linearly in radius, not quadratically.
fn bench_median(c: &mut Criterion) {
    let mut group = c.benchmark_group("median");
    let src = pattern(256, 256);
    let rois = [src.bounds()];
    group.throughput(Throughput::Elements(256 * 256));

    for radius in [1, 4, 16, 32] {
        let effect = MedianEffect::new(MedianData { radius, percentile: 50 });
        let mut dst = Surface::new(256, 256);
        group.bench_with_input(BenchmarkId::new("radius", radius), &radius, |b, _| {
            b.iter(|| effect.render(black_box(&src), &mut dst, &rois))
        });
    }

    group.finish();
}

/// Row-parallel against sequential driver.
fn bench_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("median_r8_512");
    let src = pattern(512, 512);
    let rois = src.bounds().split_grid(4, 4);
    let effect = MedianEffect::new(MedianData { radius: 8, percentile: 50 });
    group.throughput(Throughput::Elements(512 * 512));

    for (name, ctx) in [("parallel", RenderContext::default()), ("sequential", RenderContext::sequential())] {
        let mut dst = Surface::new(512, 512);
        group.bench_function(name, |b| b.iter(|| effect.render_with(black_box(&src), &mut dst, &rois, &ctx)));
    }

    group.finish();
}

/// Per-pixel operators.
fn bench_pixel_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("pixel_ops");
    let src = pattern(1024, 1024);
    let rois = [src.bounds()];
    group.throughput(Throughput::Elements(1024 * 1024));

    let posterize = PosterizeEffect::new(PosterizeData::uniform(6));
    let mut dst = Surface::new(1024, 1024);
    group.bench_function("posterize", |b| b.iter(|| posterize.render(black_box(&src), &mut dst, &rois)));

    let overlay = BlendOp::overlay();
    group.bench_function("desaturate_overlay", |b| {
        b.iter(|| {
            src.data()
                .iter()
                .map(|&c| overlay.apply(Desaturate.apply(c), c))
                .fold(0u32, |acc, c| acc.wrapping_add(c.r as u32))
        })
    });

    group.finish();
}

/// Full three-stage pipeline.
fn bench_soften_portrait(c: &mut Criterion) {
    let src = pattern(256, 256);
    let rois = [src.bounds()];
    let effect = SoftenPortraitEffect::default();
    let mut dst = Surface::new(256, 256);
    c.bench_function("soften_portrait_256", |b| b.iter(|| effect.render(black_box(&src), &mut dst, &rois)));
}

criterion_group!(benches, bench_median, bench_parallel, bench_pixel_ops, bench_soften_portrait);
criterion_main!(benches);
