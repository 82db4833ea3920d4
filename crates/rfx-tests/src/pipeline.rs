//! Multi-stage effects: ordering, source access and presets.

use crate::noise;
use rfx_core::{ColorBgra, Rect, Surface};
use rfx_ops::effects::{
    BrightnessContrastData, BrightnessContrastEffect, GaussianBlurEffect, MedianData, MedianEffect, PosterizeData,
    PosterizeEffect, SoftenPortraitData, SoftenPortraitEffect,
};
use rfx_ops::pixel_ops::{ChannelMultiply, Chain, Desaturate};
use rfx_ops::{BinaryPixelOp, BlendOp, Effect, EffectParameters, Pipeline, RenderContext, Stage, UnaryPixelOp};

fn run(pipeline: &Pipeline, src: &Surface) -> Surface {
    let mut dst = Surface::new(src.width(), src.height());
    pipeline.render_with(src, &mut dst, &[src.bounds()], &RenderContext::default()).unwrap();
    dst
}

#[test]
fn test_stage_order_is_respected() {
    let px = ColorBgra::from_rgba(200, 60, 30, 255);
    let src = Surface::filled(3, 3, px);

    let posterize = || PosterizeEffect::new(PosterizeData::uniform(2));
    let forward = Pipeline::new()
        .from_source(posterize())
        .blend_source(Desaturate, BlendOp::overlay());
    let reversed = Pipeline::new()
        .blend_source(Desaturate, BlendOp::overlay())
        .from_source(posterize());

    let a = run(&forward, &src);
    let b = run(&reversed, &src);
    assert_ne!(a, b);

    let posterized = ColorBgra::from_rgba(255, 0, 0, 255);
    assert_eq!(b.pixel(1, 1), posterized);
    assert_eq!(a.pixel(1, 1), BlendOp::overlay().apply(Desaturate.apply(px), posterized));
}

#[test]
fn test_from_previous_reads_stage_output() {
    let src = noise(16, 12, 21);
    let blur = || GaussianBlurEffect::with_radius(2);
    let tone = || BrightnessContrastEffect::new(BrightnessContrastData { brightness: 10, contrast: -20 });

    // Stage 2 reading the blurred image differs from stage 2 reading the source.
    let chained = Pipeline::new().from_source(blur()).from_previous(tone());
    let restarted = Pipeline::new().from_source(blur()).from_source(tone());
    let only_tone = Pipeline::new().from_source(tone());

    assert_ne!(run(&chained, &src), run(&restarted, &src));
    assert_eq!(run(&restarted, &src), run(&only_tone, &src));

    let mut blurred = Surface::new(16, 12);
    blur().render(&src, &mut blurred, &[src.bounds()]).unwrap();
    let mut expected = Surface::new(16, 12);
    tone().render(&blurred, &mut expected, &[src.bounds()]).unwrap();
    assert_eq!(run(&chained, &src), expected);
}

fn blur_then_median() -> Pipeline {
    Pipeline::new()
        .from_source(GaussianBlurEffect::with_radius(1))
        .from_previous(MedianEffect::new(MedianData { radius: 2, percentile: 50 }))
}

#[test]
fn test_neighborhood_chain_tiles_match_whole() {
    let src = noise(16, 16, 9);
    let pipeline = blur_then_median();
    let whole = run(&pipeline, &src);

    for tiles in [src.bounds().split_rows(2), src.bounds().split_grid(3, 3), src.bounds().split_grid(16, 1)] {
        for ctx in [RenderContext::sequential(), RenderContext::default()] {
            let mut tiled = Surface::new(16, 16);
            for tile in &tiles {
                pipeline.render_with(&src, &mut tiled, &[*tile], &ctx).unwrap();
            }
            let differing = (0..16 * 16).filter(|&i| tiled.data()[i] != whole.data()[i]).count();
            assert_eq!(differing, 0, "{} tiles", tiles.len());
        }
    }

    let mut blurred = Surface::new(16, 16);
    GaussianBlurEffect::with_radius(1).render(&src, &mut blurred, &[src.bounds()]).unwrap();
    let mut expected = Surface::new(16, 16);
    MedianEffect::new(MedianData { radius: 2, percentile: 50 })
        .render(&blurred, &mut expected, &[src.bounds()])
        .unwrap();
    assert_eq!(whole, expected);
}

#[test]
fn test_chained_stages_write_only_inside_regions() {
    let src = noise(20, 14, 17);
    let sentinel = ColorBgra::from_bgra(3, 1, 4, 1);
    let rois = [Rect::from_ltrb(2, 3, 7, 6), Rect::from_ltrb(12, 8, 18, 13)];
    let pipelines = [
        blur_then_median(),
        Pipeline::new()
            .from_source(PosterizeEffect::new(PosterizeData::uniform(4)))
            .from_previous(MedianEffect::new(MedianData { radius: 3, percentile: 30 }))
            .blend_source(Desaturate, BlendOp::overlay()),
    ];

    for pipeline in &pipelines {
        let whole = run(pipeline, &src);
        let mut dst = Surface::filled(20, 14, sentinel);
        pipeline.render_with(&src, &mut dst, &rois, &RenderContext::default()).unwrap();
        for (x, y) in dst.bounds().iter_coords() {
            if rois.iter().any(|r| r.contains(x, y)) {
                assert_eq!(dst.pixel(x, y), whole.pixel(x, y), "({x}, {y})");
            } else {
                assert_eq!(dst.pixel(x, y), sentinel, "({x}, {y})");
            }
        }
    }
}

#[test]
fn test_soften_portrait_matches_manual_stages() {
    let src = noise(24, 20, 3);
    let data = SoftenPortraitData { softness: 2, lighting: 5, warmth: 12 };
    let mut actual = Surface::new(24, 20);
    SoftenPortraitEffect::new(data).render(&src, &mut actual, &[src.bounds()]).unwrap();

    let manual = Pipeline::new()
        .then(Stage::FromSource(Box::new(GaussianBlurEffect::with_radius(6))))
        .then(Stage::FromPrevious(Box::new(BrightnessContrastEffect::new(BrightnessContrastData {
            brightness: 5,
            contrast: -4,
        }))))
        .then(Stage::BlendSource {
            source_op: Box::new(Chain::new().then(Desaturate).then(ChannelMultiply::warmth(12.0))),
            blend: Box::new(BlendOp::overlay()),
        });
    assert_eq!(actual, run(&manual, &src));
}

#[test]
fn test_source_untouched() {
    let src = noise(12, 12, 42);
    let copy = src.clone();
    let mut dst = Surface::new(12, 12);
    SoftenPortraitEffect::default().render(&src, &mut dst, &[src.bounds()]).unwrap();
    assert_eq!(src, copy);
}

#[test]
fn test_preset_yaml_roundtrip() {
    let data = SoftenPortraitData { softness: 3, lighting: -7, warmth: 0 };
    let yaml = serde_yaml::to_string(&data).unwrap();
    let back: SoftenPortraitData = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, data);

    // Missing fields take their defaults.
    let partial: SoftenPortraitData = serde_yaml::from_str("lighting: 4\n").unwrap();
    assert_eq!(partial, SoftenPortraitData { lighting: 4, ..SoftenPortraitData::default() });
    assert!(partial.validate().is_ok());

    let out_of_range: SoftenPortraitData = serde_yaml::from_str("warmth: 99\n").unwrap();
    assert!(out_of_range.validate().is_err());
}
