use super::*;
use crate::{
    foundation::core::{Canvas, THUMBNAIL_CANVAS},
    render::compile::OVERLAY_RGBA,
};

fn near(a: [u8; 4], b: [u8; 4], tol: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tol)
}

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> Background {
    let data = rgba.repeat((w * h) as usize);
    Background::from_straight_rgba8(w, h, data).unwrap()
}

fn plan(canvas: Canvas, ops: Vec<DrawOp>) -> RenderPlan {
    RenderPlan {
        canvas,
        ops,
        text_block: None,
    }
}

#[test]
fn clear_fill_covers_every_pixel() {
    let canvas = Canvas::new(64, 36).unwrap();
    let p = plan(
        canvas,
        vec![DrawOp::FillRect {
            rect: canvas.rect(),
            color: Rgba8::new(10, 20, 30, 255),
        }],
    );
    let frame = CpuRenderer::new().render(&p, 1.0).unwrap();
    assert_eq!((frame.width, frame.height), (64, 36));
    assert!(frame.premultiplied);
    assert!(
        frame
            .data
            .chunks_exact(4)
            .all(|px| px == [10, 20, 30, 255])
    );
}

#[test]
fn empty_plan_is_transparent() {
    let frame = CpuRenderer::new()
        .render(&plan(Canvas::new(8, 8).unwrap(), vec![]), 1.0)
        .unwrap();
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn background_image_covers_the_frame() {
    let canvas = Canvas::new(64, 36).unwrap();
    let bg = solid(10, 10, [0, 128, 255, 255]);
    let p = plan(
        canvas,
        vec![DrawOp::Image {
            dest: crate::compose::cover::cover_fit(canvas, 10, 10).unwrap(),
            image: bg,
        }],
    );
    let frame = CpuRenderer::new().render(&p, 1.0).unwrap();
    for (x, y) in [(0, 0), (63, 0), (0, 35), (63, 35), (32, 18)] {
        let px = frame.pixel(x, y).unwrap();
        assert!(near(px, [0, 128, 255, 255], 1), "pixel ({x},{y}) = {px:?}");
    }
}

#[test]
fn dimming_overlay_darkens_background() {
    let canvas = Canvas::new(32, 18).unwrap();
    let p = plan(
        canvas,
        vec![
            DrawOp::FillRect {
                rect: canvas.rect(),
                color: Rgba8::new(255, 255, 255, 255),
            },
            DrawOp::FillRect {
                rect: canvas.rect(),
                color: OVERLAY_RGBA,
            },
        ],
    );
    let frame = CpuRenderer::new().render(&p, 1.0).unwrap();
    let expected = 255 - u8::try_from((255u16 * u16::from(OVERLAY_RGBA.a) + 127) / 255).unwrap();
    let px = frame.pixel(16, 9).unwrap();
    assert!(near(px, [expected, expected, expected, 255], 2), "{px:?}");
}

#[test]
fn rounded_box_leaves_corners_untouched() {
    let canvas = Canvas::new(100, 100).unwrap();
    let p = plan(
        canvas,
        vec![DrawOp::FillRoundedRect {
            rect: Rect::new(10.0, 10.0, 90.0, 90.0),
            radius: 20.0,
            color: Rgba8::new(255, 0, 0, 255),
        }],
    );
    let frame = CpuRenderer::new().render(&p, 1.0).unwrap();
    assert_eq!(frame.pixel(11, 11).unwrap(), [0, 0, 0, 0]);
    assert_eq!(frame.pixel(50, 50).unwrap(), [255, 0, 0, 255]);
    assert_eq!(frame.pixel(5, 50).unwrap(), [0, 0, 0, 0]);
}

#[test]
fn scale_shrinks_the_surface() {
    let p = plan(
        THUMBNAIL_CANVAS,
        vec![DrawOp::FillRect {
            rect: THUMBNAIL_CANVAS.rect(),
            color: Rgba8::new(1, 2, 3, 255),
        }],
    );
    let frame = CpuRenderer::new().render(&p, 0.5).unwrap();
    assert_eq!((frame.width, frame.height), (640, 360));
    assert_eq!(frame.pixel(639, 359).unwrap(), [1, 2, 3, 255]);
}

#[test]
fn invalid_scale_is_rejected() {
    let p = plan(THUMBNAIL_CANVAS, vec![]);
    assert!(CpuRenderer::new().render(&p, 0.0).is_err());
    assert!(CpuRenderer::new().render(&p, f64::NAN).is_err());
}
