use super::*;
use crate::{
    assets::fonts::{FontBook, FontSettings},
    foundation::core::{Rgb8, THUMBNAIL_CANVAS},
};

fn solid_background(w: u32, h: u32) -> Background {
    Background::from_straight_rgba8(w, h, vec![200; (w * h * 4) as usize]).unwrap()
}

fn inputs<'a>(background: Option<&'a Background>, overlay: &'a TextOverlay) -> SceneInputs<'a> {
    SceneInputs {
        frame: THUMBNAIL_CANVAS,
        background,
        overlay,
        clear_rgba: Rgba8::new(0, 0, 0, 255),
    }
}

fn op_names(plan: &RenderPlan) -> Vec<&'static str> {
    plan.ops
        .iter()
        .map(|op| match op {
            DrawOp::FillRect { .. } => "fill_rect",
            DrawOp::FillRoundedRect { .. } => "rounded_rect",
            DrawOp::Image { .. } => "image",
            DrawOp::Text { .. } => "text",
        })
        .collect()
}

#[test]
fn blank_text_compiles_without_fonts() {
    let mut shaper = TextShaper::new(FontBook::empty());
    let bg = solid_background(1920, 1080);
    for text in ["", "   \n   ", "\t\r\n \u{3000}"] {
        let mut overlay = TextOverlay::styled(text);
        overlay.full_overlay = true;
        let plan = compile_scene(&inputs(Some(&bg), &overlay), &mut shaper).unwrap();
        assert_eq!(op_names(&plan), vec!["fill_rect", "image", "fill_rect"]);
        assert!(plan.text_block.is_none());
    }
}

#[test]
fn background_is_placed_by_cover_fit() {
    let mut shaper = TextShaper::new(FontBook::empty());
    let bg = solid_background(1000, 1000);
    let overlay = TextOverlay::auto_fit("");
    let plan = compile_scene(&inputs(Some(&bg), &overlay), &mut shaper).unwrap();
    let Some(DrawOp::Image { dest, .. }) = plan.ops.get(1) else {
        panic!("expected image op, got {:?}", op_names(&plan));
    };
    assert_eq!(*dest, Rect::new(0.0, -280.0, 1280.0, 1000.0));
}

#[test]
fn transparent_clear_emits_no_fill() {
    let mut shaper = TextShaper::new(FontBook::empty());
    let overlay = TextOverlay::auto_fit("");
    let mut scene = inputs(None, &overlay);
    scene.clear_rgba = Rgba8::new(0, 0, 0, 0);
    let plan = compile_scene(&scene, &mut shaper).unwrap();
    assert!(plan.ops.is_empty());
}

#[test]
fn invalid_overlay_is_rejected_before_drawing() {
    let mut shaper = TextShaper::new(FontBook::empty());
    let mut overlay = TextOverlay::styled("hi");
    overlay.sizing = FontSizing::Fixed { size_px: 500.0 };
    assert!(compile_scene(&inputs(None, &overlay), &mut shaper).is_err());
}

#[test]
fn text_without_fonts_is_a_render_error() {
    let mut shaper = TextShaper::new(FontBook::empty());
    let overlay = TextOverlay::styled("Hello");
    let err = compile_scene(&inputs(None, &overlay), &mut shaper).unwrap_err();
    assert!(err.to_string().contains("no font available"));
}

#[test]
fn styled_text_orders_box_beneath_lines() {
    let book = FontBook::from_settings(&FontSettings::default());
    if book.face_count() == 0 {
        eprintln!("no system fonts installed; skipping");
        return;
    }
    let mut shaper = TextShaper::new(book);
    let bg = solid_background(64, 36);
    let mut overlay = TextOverlay::styled("First line\nSecond line");
    overlay.full_overlay = true;
    overlay.color = Rgb8::parse_hex("#ffcc00").unwrap();

    let plan = compile_scene(&inputs(Some(&bg), &overlay), &mut shaper).unwrap();
    assert_eq!(
        op_names(&plan),
        vec!["fill_rect", "image", "fill_rect", "rounded_rect", "text", "text"]
    );
    let block = plan.text_block.as_ref().unwrap();
    assert_eq!(block.font_size, 80.0);
    assert!(block.layer.x0 >= 0.0 && block.layer.x1 <= 1280.0);

    let Some(DrawOp::Text { fill, outline, .. }) = plan.ops.last() else {
        unreachable!();
    };
    assert_eq!(*fill, Rgba8::new(0xff, 0xcc, 0x00, 255));
    assert!(outline.is_none());
}

#[test]
fn auto_fit_text_is_outlined_and_within_bounds() {
    let book = FontBook::from_settings(&FontSettings::default());
    if book.face_count() == 0 {
        eprintln!("no system fonts installed; skipping");
        return;
    }
    let mut shaper = TextShaper::new(book);
    let overlay = TextOverlay::auto_fit("A fairly long headline that has to shrink to fit");
    let plan = compile_scene(&inputs(None, &overlay), &mut shaper).unwrap();

    let block = plan.text_block.as_ref().unwrap();
    assert!((36.0..=96.0).contains(&block.font_size));
    let Some(DrawOp::Text { outline, .. }) = plan.ops.last() else {
        unreachable!();
    };
    let outline = outline.expect("auto-fit preset draws an outline");
    assert!(outline.width >= OUTLINE_MIN_WIDTH);
}
