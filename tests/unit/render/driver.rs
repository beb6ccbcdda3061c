use std::sync::atomic::AtomicUsize;

use super::*;
use crate::foundation::core::PixelComponents;
use crate::render::buffer::{PixelData, PixelDataMut};

fn rect(x1: i32, y1: i32, x2: i32, y2: i32) -> RectI {
    RectI::new(x1, y1, x2, y2).unwrap()
}

fn small_params() -> EffectParameters {
    EffectParameters {
        radius: 20.0,
        min_depth: -1,
        max_depth: 1,
        ..EffectParameters::default()
    }
}

#[test]
fn status_merge_prefers_canceled() {
    use RenderStatus::*;
    assert_eq!(Completed.merge(Completed), Completed);
    assert_eq!(Completed.merge(Canceled), Canceled);
    assert_eq!(Canceled.merge(Completed), Canceled);
}

#[test]
fn cancel_token_is_shared_between_clones() {
    let a = CancelToken::new();
    let b = a.clone();
    assert!(!b.should_abort());
    a.cancel();
    assert!(b.should_abort());
    assert!(!NeverAbort.should_abort());
    assert!((|| true).should_abort());
}

#[test]
fn request_builders_set_resolution() {
    let r = RenderRequest::new(rect(0, 0, 4, 4))
        .with_render_scale(Vec2::new(0.5, 0.25))
        .with_pixel_aspect_ratio(2.0);
    assert_eq!(r.render_scale, Vec2::new(0.5, 0.25));
    assert_eq!(r.pixel_aspect_ratio, 2.0);
    assert!(r.coord_space().is_ok());
    assert!(r.with_pixel_aspect_ratio(0.0).coord_space().is_err());
}

#[test]
fn writes_only_inside_the_window() {
    let bounds = rect(-16, -16, 16, 16);
    let src_data = [255u8; 32 * 32];
    let src =
        PixelBuffer::packed(PixelData::U8(&src_data), PixelComponents::Alpha, bounds).unwrap();
    let mut dst_data = vec![7u8; 32 * 32];
    let mut dst =
        PixelBufferMut::packed(PixelDataMut::U8(&mut dst_data), PixelComponents::Alpha, bounds)
            .unwrap();

    let request = RenderRequest::new(rect(-4, 2, 6, 9));
    let status = render_droste(&small_params(), &request, &src, &mut dst, &NeverAbort).unwrap();
    assert_eq!(status, RenderStatus::Completed);

    for y in -16..16 {
        for x in -16..16 {
            let v = dst_data[((y + 16) * 32 + (x + 16)) as usize];
            if request.window.contains(x, y) {
                assert_ne!(v, 7, "({x}, {y}) not written");
            } else {
                assert_eq!(v, 7, "({x}, {y}) written outside the window");
            }
        }
    }
}

#[test]
fn empty_window_completes_without_writing() {
    let src_data = [1.0f32; 16];
    let src = PixelBuffer::packed(
        PixelData::F32(&src_data),
        PixelComponents::Rgba,
        rect(0, 0, 2, 2),
    )
    .unwrap();
    let mut dst_data = vec![0.5f32; 16];
    let mut dst = PixelBufferMut::packed(
        PixelDataMut::F32(&mut dst_data),
        PixelComponents::Rgba,
        rect(0, 0, 2, 2),
    )
    .unwrap();
    let calls = AtomicUsize::new(0);
    let abort = || {
        calls.fetch_add(1, Ordering::Relaxed);
        false
    };
    let status = render_droste(
        &small_params(),
        &RenderRequest::new(rect(1, 1, 1, 2)),
        &src,
        &mut dst,
        &abort,
    )
    .unwrap();
    assert_eq!(status, RenderStatus::Completed);
    assert_eq!(calls.load(Ordering::Relaxed), 0);
    assert!(dst_data.iter().all(|&v| v == 0.5));
}

#[test]
fn rejects_bad_inputs_before_writing() {
    let src_data = [0u8; 4 * 4];
    let src =
        PixelBuffer::packed(PixelData::U8(&src_data), PixelComponents::Rgba, rect(0, 0, 2, 2))
            .unwrap();
    let mut dst_data = vec![9u8; 4 * 4];
    let mut dst = PixelBufferMut::packed(
        PixelDataMut::U8(&mut dst_data),
        PixelComponents::Rgba,
        rect(0, 0, 2, 2),
    )
    .unwrap();

    let outside = RenderRequest::new(rect(0, 0, 3, 2));
    assert!(matches!(
        render_droste(&small_params(), &outside, &src, &mut dst, &NeverAbort),
        Err(DrosteError::Validation(_))
    ));

    let bad = EffectParameters {
        ratio: 1.5,
        ..small_params()
    };
    let full = RenderRequest::new(rect(0, 0, 2, 2));
    assert!(render_droste(&bad, &full, &src, &mut dst, &NeverAbort).is_err());

    let scaled = full.with_render_scale(Vec2::new(f64::NAN, 1.0));
    assert!(render_droste(&small_params(), &scaled, &src, &mut dst, &NeverAbort).is_err());

    drop(dst);
    assert!(dst_data.iter().all(|&v| v == 9));
}

#[test]
fn format_is_checked_first() {
    let src_data = [0u16; 4];
    let src =
        PixelBuffer::packed(PixelData::U16(&src_data), PixelComponents::Alpha, rect(0, 0, 2, 2))
            .unwrap();
    let mut dst_data = vec![3u8; 4];
    let mut dst =
        PixelBufferMut::packed(PixelDataMut::U8(&mut dst_data), PixelComponents::Alpha, rect(0, 0, 2, 2))
            .unwrap();
    // the params are invalid too, but the format mismatch wins
    let bad = EffectParameters {
        radius: -1.0,
        ..small_params()
    };
    let err = render_droste(
        &bad,
        &RenderRequest::new(rect(0, 0, 2, 2)),
        &src,
        &mut dst,
        &NeverAbort,
    )
    .unwrap_err();
    assert!(matches!(err, DrosteError::FormatMismatch { .. }), "{err}");
    drop(dst);
    assert_eq!(dst_data, vec![3u8; 4]);
}

#[test]
fn abort_is_polled_once_per_row() {
    let bounds = rect(0, 0, 5, 6);
    let src_data = [1.0f32; 5 * 6];
    let src =
        PixelBuffer::packed(PixelData::F32(&src_data), PixelComponents::Alpha, bounds).unwrap();
    let mut dst_data = vec![-1.0f32; 5 * 6];
    let mut dst =
        PixelBufferMut::packed(PixelDataMut::F32(&mut dst_data), PixelComponents::Alpha, bounds)
            .unwrap();

    let polls = AtomicUsize::new(0);
    let abort = || polls.fetch_add(1, Ordering::Relaxed) >= 2;
    let status = render_droste(
        &small_params(),
        &RenderRequest::new(bounds),
        &src,
        &mut dst,
        &abort,
    )
    .unwrap();
    assert_eq!(status, RenderStatus::Canceled);
    assert_eq!(polls.load(Ordering::Relaxed), 3);
    drop(dst);
    assert!(dst_data[..10].iter().all(|&v| v != -1.0));
    assert!(dst_data[10..].iter().all(|&v| v == -1.0));
}
