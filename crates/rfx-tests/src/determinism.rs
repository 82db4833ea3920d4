//! Same inputs, same bytes: threading, tiling, cancellation and input errors.

use crate::noise;
use rfx_core::{ColorBgra, Rect, Surface};
use rfx_ops::effects::{LevelsData, LevelsEffect, MedianData, MedianEffect};
use rfx_ops::{CancelToken, Effect, EffectKind, OpsError, RenderContext, RenderStatus};

fn hash(effect: &dyn Effect, src: &Surface, rois: &[Rect], ctx: &RenderContext) -> String {
    let mut dst = Surface::new(src.width(), src.height());
    let status = effect.render_with(src, &mut dst, rois, ctx).unwrap();
    assert_eq!(status, RenderStatus::Completed);
    dst.digest()
}

#[test]
fn test_parallel_matches_sequential() {
    let src = noise(64, 48, 1234);
    for kind in EffectKind::ALL {
        let effect = kind.create_default();
        let seq = hash(effect.as_ref(), &src, &[src.bounds()], &RenderContext::sequential());
        let par = hash(effect.as_ref(), &src, &src.bounds().split_grid(4, 3), &RenderContext::default());
        let rows = hash(effect.as_ref(), &src, &src.bounds().split_rows(5), &RenderContext::default());
        assert_eq!(seq, par, "{kind}");
        assert_eq!(seq, rows, "{kind}");
    }
}

#[test]
fn test_repeat_renders_identical() {
    let src = noise(32, 32, 77);
    let effect = MedianEffect::new(MedianData { radius: 5, percentile: 70 });
    let ctx = RenderContext::default();
    let first = hash(&effect, &src, &[src.bounds()], &ctx);
    for _ in 0..3 {
        assert_eq!(hash(&effect, &src, &[src.bounds()], &ctx), first);
    }
}

#[test]
fn test_render_in_place_matches_separate_buffers() {
    let src = noise(20, 20, 8);
    let roi = Rect::from_ltrb(3, 4, 16, 12);
    let effect = MedianEffect::new(MedianData { radius: 2, percentile: 50 });

    let mut separate = src.clone();
    effect.render(&src, &mut separate, &[roi]).unwrap();

    let mut in_place = src.clone();
    effect.render_in_place(&mut in_place, &[roi], &RenderContext::default()).unwrap();
    assert_eq!(in_place, separate);
}

#[test]
fn test_cancelled_render_writes_nothing() {
    let src = noise(40, 40, 5);
    let sentinel = ColorBgra::from_bgra(9, 9, 9, 9);
    let cancel = CancelToken::new();
    cancel.cancel();

    for ctx in [RenderContext::default(), RenderContext::sequential()] {
        let ctx = ctx.with_cancel(cancel.clone());
        for kind in EffectKind::ALL {
            let mut dst = Surface::filled(40, 40, sentinel);
            let status = kind.create_default().render_with(&src, &mut dst, &[src.bounds()], &ctx).unwrap();
            assert_eq!(status, RenderStatus::Cancelled, "{kind}");
            assert!(dst.data().iter().all(|&c| c == sentinel), "{kind}");
        }
    }
}

#[test]
fn test_cancel_is_shared_between_clones() {
    let token = CancelToken::new();
    let ctx = RenderContext::sequential().with_cancel(token.clone());
    assert!(!ctx.cancel.is_cancelled());
    token.cancel();
    assert!(ctx.cancel.is_cancelled());
}

#[test]
fn test_invalid_inputs_are_errors() {
    let src = noise(10, 10, 2);
    let effect = LevelsEffect::new(LevelsData::default());

    let mut wrong_size = Surface::new(10, 11);
    let err = effect.render(&src, &mut wrong_size, &[src.bounds()]).unwrap_err();
    assert!(matches!(err, OpsError::Core(_)), "{err}");

    let mut dst = Surface::new(10, 10);
    let err = effect.render(&src, &mut dst, &[Rect::from_ltrb(5, 5, 10, 9)]).unwrap_err();
    assert!(matches!(err, OpsError::Core(_)), "{err}");
    assert!(!err.is_not_implemented());
    assert!(dst.data().iter().all(|&c| c == ColorBgra::TRANSPARENT));
}

#[test]
fn test_configuration_unavailable_is_distinct() {
    for kind in EffectKind::ALL {
        let mut effect = kind.create_default();
        let err = effect.launch_configuration(None).unwrap_err();
        assert!(err.is_not_implemented(), "{kind}: {err}");
    }
}

#[test]
fn test_invalid_parameters_rejected_before_rendering() {
    let src = noise(8, 8, 4);
    let mut dst = Surface::new(8, 8);
    let effect = MedianEffect::new(MedianData { radius: 0, percentile: 50 });
    let err = effect.render(&src, &mut dst, &[src.bounds()]).unwrap_err();
    assert!(matches!(err, OpsError::InvalidParameter(_)), "{err}");
}
