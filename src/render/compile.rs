use crate::{
    assets::decode::Background,
    compose::cover::cover_fit,
    composition::model::{FontSizing, TextOverlay},
    foundation::{
        core::{Canvas, Point, Rect, Rgba8},
        error::ThumbkitResult,
    },
    layout::{
        block::{BlockLayout, arrange, split_lines},
        fit::{FIT_WIDTH_RATIO, fit_font_size},
        shape::{ShapedLine, TextBrushRgba8, TextShaper},
    },
};

/// Full-frame dimming drawn between the background and the text.
pub const OVERLAY_RGBA: Rgba8 = Rgba8::new(0, 0, 0, 102);
/// Box drawn behind the text layer.
pub const BOX_RGBA: Rgba8 = Rgba8::new(0, 0, 0, 153);
pub const BOX_RADIUS: f64 = 12.0;
/// Stroke beneath outlined text.
pub const OUTLINE_RGBA: Rgba8 = Rgba8::new(0, 0, 0, 255);
/// Stroke width as a fraction of the font size.
pub const OUTLINE_WIDTH_RATIO: f64 = 0.08;
pub const OUTLINE_MIN_WIDTH: f64 = 2.0;

/// Everything a render depends on.
#[derive(Clone, Copy, Debug)]
pub struct SceneInputs<'a> {
    pub frame: Canvas,
    pub background: Option<&'a Background>,
    pub overlay: &'a TextOverlay,
    pub clear_rgba: Rgba8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outline {
    pub width: f64,
    pub color: Rgba8,
}

/// Backend-agnostic draw operation in frame coordinates.
#[derive(Clone, Debug)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Rgba8,
    },
    FillRoundedRect {
        rect: Rect,
        radius: f64,
        color: Rgba8,
    },
    Image {
        image: Background,
        dest: Rect,
    },
    Text {
        line: ShapedLine,
        /// Top-left of the line's layout box.
        origin: Point,
        fill: Rgba8,
        outline: Option<Outline>,
    },
}

/// Ordered draw operations for one frame.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    pub canvas: Canvas,
    pub ops: Vec<DrawOp>,
    /// Text block placement, when any text survived trimming.
    pub text_block: Option<BlockLayout>,
}

/// Compile the scene into draw operations: clear, background, dimming, text box, text.
///
/// Pure in its inputs; shaping state in `shaper` only caches font registration.
#[tracing::instrument(level = "debug", skip_all, fields(has_background = inputs.background.is_some()))]
pub fn compile_scene(
    inputs: &SceneInputs<'_>,
    shaper: &mut TextShaper,
) -> ThumbkitResult<RenderPlan> {
    let SceneInputs {
        frame,
        background,
        overlay,
        clear_rgba,
    } = *inputs;
    overlay.validate()?;

    let mut ops = Vec::new();
    if !clear_rgba.is_transparent() {
        ops.push(DrawOp::FillRect {
            rect: frame.rect(),
            color: clear_rgba,
        });
    }

    if let Some(bg) = background {
        ops.push(DrawOp::Image {
            image: bg.clone(),
            dest: cover_fit(frame, bg.width, bg.height)?,
        });
    }

    if overlay.full_overlay {
        ops.push(DrawOp::FillRect {
            rect: frame.rect(),
            color: OVERLAY_RGBA,
        });
    }

    if overlay.is_blank() {
        return Ok(RenderPlan {
            canvas: frame,
            ops,
            text_block: None,
        });
    }
    let lines = split_lines(&overlay.text);

    let size_px = match overlay.sizing {
        FontSizing::AutoFit {
            max_px,
            min_px,
            step_px,
        } => fit_font_size(
            shaper,
            &lines,
            overlay.font_family,
            max_px,
            min_px,
            step_px,
            frame.width_f64() * FIT_WIDTH_RATIO,
        )?,
        FontSizing::Fixed { size_px } => size_px,
    };

    let fill = overlay.color.with_alpha(255);
    let brush = TextBrushRgba8 {
        r: fill.r,
        g: fill.g,
        b: fill.b,
        a: fill.a,
    };
    let shaped = lines
        .iter()
        .map(|line| shaper.shape_line(line, overlay.font_family, size_px, brush))
        .collect::<ThumbkitResult<Vec<_>>>()?;
    let widths: Vec<f64> = shaped.iter().map(|s| s.width).collect();
    let block = arrange(frame, size_px, &widths, overlay.align, overlay.position);

    if overlay.background_box {
        ops.push(DrawOp::FillRoundedRect {
            rect: block.layer,
            radius: BOX_RADIUS,
            color: BOX_RGBA,
        });
    }

    let outline = overlay.outline.then(|| Outline {
        width: (f64::from(size_px) * OUTLINE_WIDTH_RATIO).max(OUTLINE_MIN_WIDTH),
        color: OUTLINE_RGBA,
    });
    for (slot, line) in block.lines.iter().zip(shaped) {
        let origin = Point::new(slot.x, slot.top + (block.line_height - line.height) / 2.0);
        ops.push(DrawOp::Text {
            line,
            origin,
            fill,
            outline,
        });
    }

    tracing::debug!(size_px, lines = lines.len(), ops = ops.len(), "scene compiled");
    Ok(RenderPlan {
        canvas: frame,
        ops,
        text_block: Some(block),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/compile.rs"]
mod tests;
