//! Behavioral properties of the effects and operators.

use crate::{checkerboard, noise, noise_with_alpha};
use rfx_core::{ColorBgra, Rect, Surface};
use rfx_ops::blend::overlay_channel;
use rfx_ops::effects::{GaussianBlurData, GaussianBlurEffect, MedianData, MedianEffect};
use rfx_ops::pixel_ops::PosterizePixel;
use rfx_ops::{
    BinaryPixelOp, BlendOp, Effect, EffectKind, HistogramState, KernelShape, LocalHistogramEngine, ParamValue,
    RenderContext, UnaryPixelOp,
};
use std::collections::BTreeSet;

fn render(effect: &dyn Effect, src: &Surface, rois: &[Rect]) -> Surface {
    let mut dst = Surface::new(src.width(), src.height());
    effect.render_with(src, &mut dst, rois, &RenderContext::sequential()).unwrap();
    dst
}

fn small(kind: EffectKind) -> Box<dyn Effect> {
    let overrides: Vec<(String, ParamValue)> = match kind {
        EffectKind::Median => vec![("radius".into(), ParamValue::Int(3)), ("percentile".into(), ParamValue::Int(35))],
        EffectKind::ReduceNoise => vec![("radius".into(), ParamValue::Int(4))],
        EffectKind::GaussianBlur => vec![("radius".into(), ParamValue::Int(3))],
        EffectKind::SoftenPortrait => vec![("softness".into(), ParamValue::Int(1))],
        _ => Vec::new(),
    };
    kind.create_with(&overrides).unwrap()
}

/// Hand-made partition of a 40x30 surface with ragged seams.
fn ragged_partition() -> Vec<Rect> {
    vec![
        Rect::from_ltrb(0, 0, 12, 9),
        Rect::from_ltrb(13, 0, 39, 9),
        Rect::from_ltrb(0, 10, 39, 10),
        Rect::from_ltrb(0, 11, 5, 29),
        Rect::from_ltrb(6, 11, 39, 29),
    ]
}

#[test]
fn test_partition_invariance_every_effect() {
    let src = noise_with_alpha(40, 30, 99);
    let whole = [src.bounds()];
    let partitions = [
        src.bounds().split_rows(7),
        src.bounds().split_grid(3, 4),
        src.bounds().split_grid(40, 1),
        ragged_partition(),
    ];

    for kind in EffectKind::ALL {
        let effect = small(kind);
        let expected = render(effect.as_ref(), &src, &whole);
        for rois in &partitions {
            let covered: u64 = rois.iter().map(|r| r.area()).sum();
            assert_eq!(covered, src.bounds().area());
            assert_eq!(render(effect.as_ref(), &src, rois), expected, "{kind} over {} regions", rois.len());
        }
    }
}

#[test]
fn test_partial_regions_leave_rest_untouched() {
    let src = noise(24, 24, 5);
    let sentinel = ColorBgra::from_bgra(1, 2, 3, 4);
    let roi = Rect::from_ltrb(5, 6, 15, 17);

    for kind in EffectKind::ALL {
        let effect = small(kind);
        let mut dst = Surface::filled(24, 24, sentinel);
        effect.render(&src, &mut dst, &[roi]).unwrap();
        for (x, y) in dst.bounds().iter_coords() {
            if !roi.contains(x, y) {
                assert_eq!(dst.pixel(x, y), sentinel, "{kind} wrote ({x}, {y})");
            }
        }
    }
}

#[test]
fn test_constant_image_invariance() {
    for color in [ColorBgra::from_bgra(12, 200, 77, 255), ColorBgra::from_bgra(90, 90, 10, 180)] {
        let src = Surface::filled(9, 7, color);
        for radius in [1, 2, 5, 8] {
            for percentile in [0, 25, 50, 100] {
                let median = MedianEffect::new(MedianData { radius, percentile });
                assert_eq!(render(&median, &src, &[src.bounds()]), src, "r={radius} p={percentile}");
            }
            let blur = GaussianBlurEffect::new(GaussianBlurData { radius });
            assert_eq!(render(&blur, &src, &[src.bounds()]), src, "blur r={radius}");
        }
    }
}

#[test]
fn test_radius_larger_than_surface() {
    let src = noise(3, 2, 11);
    let median = MedianEffect::new(MedianData { radius: 50, percentile: 50 });
    let out = render(&median, &src, &[src.bounds()]);
    // Every footprint covers the whole surface, so every output is the same.
    assert!(out.data().iter().all(|&c| c == out.pixel(0, 0)));

    let one = Surface::filled(1, 1, ColorBgra::from_bgra(5, 6, 7, 8));
    assert_eq!(render(&median, &one, &[one.bounds()]), one);
}

fn brute_force(src: &Surface, kernel: &KernelShape, x: i32, y: i32) -> HistogramState {
    let mut hist = HistogramState::new();
    let r = kernel.radius();
    for dy in -r..=r {
        for dx in -r..=r {
            if kernel.contains(dx, dy) {
                if let Some(c) = src.get_pixel(x + dx, y + dy) {
                    hist.add(c);
                }
            }
        }
    }
    hist
}

#[test]
fn test_histogram_area_conservation_during_sweep() {
    let src = noise(19, 13, 3);
    for radius in [1, 3, 6, 12] {
        let engine = LocalHistogramEngine::with_radius(radius);
        let mut hist = HistogramState::new();
        for y in [0, 4, 12] {
            engine.build(&src, 0, y, &mut hist);
            for x in 0..src.width() {
                if x > 0 {
                    engine.slide(&src, x, y, &mut hist);
                }
                let expected = brute_force(&src, engine.kernel(), x, y);
                assert!(hist.is_consistent(), "r={radius} ({x}, {y})");
                assert_eq!(hist.area(), expected.area(), "r={radius} ({x}, {y})");
                for ch in 0..4 {
                    assert_eq!(hist.counts(ch), expected.counts(ch), "r={radius} ({x}, {y}) ch={ch}");
                }
            }
        }
    }
}

#[test]
fn test_posterize_level_count() {
    for n in 2..=64u32 {
        let op = PosterizePixel::uniform(n);
        let outputs: BTreeSet<u8> = (0..=255u8).map(|v| op.apply(ColorBgra::gray(v)).g).collect();
        let expected: BTreeSet<u8> = (0..n).map(|k| (k * 255 / (n - 1)) as u8).collect();

        assert_eq!(outputs.len(), n as usize, "N={n}");
        assert_eq!(outputs, expected, "N={n}");
        assert!(outputs.contains(&0) && outputs.contains(&255));

        let levels: Vec<u8> = outputs.into_iter().collect();
        let gaps: Vec<u8> = levels.windows(2).map(|w| w[1] - w[0]).collect();
        let (lo, hi) = (gaps.iter().min().copied(), gaps.iter().max().copied());
        assert!(hi.zip(lo).is_some_and(|(h, l)| h - l <= 1), "N={n} gaps {gaps:?}");
    }
}

#[test]
fn test_overlay_fixed_point_and_order() {
    assert_eq!(overlay_channel(128, 128), 128);

    let a = ColorBgra::from_rgba(200, 50, 100, 255);
    let b = ColorBgra::from_rgba(30, 220, 128, 255);
    let overlay = BlendOp::overlay();
    assert_ne!(overlay.apply(a, b), overlay.apply(b, a));
    assert_eq!(overlay.apply(a, b).r, 158);
    assert_eq!(overlay.apply(b, a).r, 47);

    let dark = ColorBgra::gray(50);
    assert_ne!(overlay.apply(dark, dark), dark);
    assert_eq!(overlay.apply(ColorBgra::gray(128), ColorBgra::gray(128)), ColorBgra::gray(128));
}

#[test]
fn test_checkerboard_median_radius_one() {
    let src = checkerboard(5, 5);
    let median = MedianEffect::new(MedianData { radius: 1, percentile: 50 });
    let out = render(&median, &src, &[src.bounds()]);
    let kernel = KernelShape::new(1);

    for (x, y) in src.bounds().iter_coords() {
        let hist = brute_force(&src, &kernel, x, y);
        let corner = (x == 0 || x == 4) && (y == 0 || y == 4);
        let edge = !corner && (x == 0 || x == 4 || y == 0 || y == 4);
        let expected_area = if corner { 3 } else if edge { 4 } else { 5 };
        assert_eq!(hist.area(), expected_area, "({x}, {y})");

        let white = hist.counts(0)[255];
        let majority = if white * 2 > hist.area() { ColorBgra::WHITE } else { ColorBgra::BLACK };
        assert_eq!(out.pixel(x, y), majority, "({x}, {y})");

        // The radius-1 disc has no diagonals, so the board inverts.
        let inverted = if src.pixel(x, y) == ColorBgra::WHITE { ColorBgra::BLACK } else { ColorBgra::WHITE };
        assert_eq!(out.pixel(x, y), inverted, "({x}, {y})");
    }
}
