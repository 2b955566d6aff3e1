use crate::{
    composition::model::{TextAlign, TextPosition},
    foundation::{
        core::{Canvas, Point, Rect, Size, Vec2},
        error::{ThumbkitError, ThumbkitResult},
    },
    layout::fit::{FIT_WIDTH_RATIO, LINE_HEIGHT_FACTOR},
};

/// Space between the text block and the edge of its layer (and background box).
pub const LAYER_PADDING: Vec2 = Vec2::new(24.0, 12.0);

/// Split raw overlay text into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// One line's slot within the block, in frame pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSlot {
    /// Left edge of the line's ink box.
    pub x: f64,
    /// Top of the line slot; slots are `line_height` tall.
    pub top: f64,
    pub width: f64,
}

/// Placement of a multi-line text block inside the frame.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockLayout {
    pub font_size: f32,
    pub line_height: f64,
    pub lines: Vec<LineSlot>,
    /// Union of the line slots.
    pub text_bounds: Rect,
    /// Text bounds grown by [`LAYER_PADDING`]; the background box and drag target.
    pub layer: Rect,
}

/// Position lines of the given widths.
///
/// `Centered` centers the block vertically. Horizontally it is centered, or flush with the
/// matching edge of the centered `FIT_WIDTH_RATIO` budget for left/right alignment. `At`
/// places the layer's top-left corner and clamps it so the layer stays inside the frame.
pub fn arrange(
    frame: Canvas,
    font_size: f32,
    line_widths: &[f64],
    align: TextAlign,
    position: TextPosition,
) -> BlockLayout {
    let line_height = f64::from(font_size) * LINE_HEIGHT_FACTOR;
    let block = Size::new(
        line_widths.iter().copied().fold(0.0, f64::max),
        line_height * line_widths.len() as f64,
    );
    let layer_size = Size::new(
        block.width + 2.0 * LAYER_PADDING.x,
        block.height + 2.0 * LAYER_PADDING.y,
    );

    let block_origin = match position {
        TextPosition::Centered => {
            let budget = frame.width_f64() * FIT_WIDTH_RATIO;
            let budget_x0 = (frame.width_f64() - budget) / 2.0;
            let x = match align {
                TextAlign::Left => budget_x0,
                TextAlign::Center => (frame.width_f64() - block.width) / 2.0,
                TextAlign::Right => budget_x0 + budget - block.width,
            };
            Point::new(x, (frame.height_f64() - block.height) / 2.0)
        }
        TextPosition::At { x, y } => {
            clamp_layer_origin(Point::new(x, y), layer_size, frame) + LAYER_PADDING
        }
    };

    let lines = line_widths
        .iter()
        .enumerate()
        .map(|(i, &width)| {
            let x = match align {
                TextAlign::Left => block_origin.x,
                TextAlign::Center => block_origin.x + (block.width - width) / 2.0,
                TextAlign::Right => block_origin.x + block.width - width,
            };
            LineSlot {
                x,
                top: block_origin.y + line_height * i as f64,
                width,
            }
        })
        .collect();

    let text_bounds = Rect::from_origin_size(block_origin, block);
    BlockLayout {
        font_size,
        line_height,
        lines,
        text_bounds,
        layer: text_bounds.inflate(LAYER_PADDING.x, LAYER_PADDING.y),
    }
}

/// Keep a layer of `layer` size fully inside `frame`; pinned to the top-left edge when it is
/// larger than the frame.
pub fn clamp_layer_origin(origin: Point, layer: Size, frame: Canvas) -> Point {
    let max_x = (frame.width_f64() - layer.width).max(0.0);
    let max_y = (frame.height_f64() - layer.height).max(0.0);
    Point::new(origin.x.clamp(0.0, max_x), origin.y.clamp(0.0, max_y))
}

/// New layer origin after a pointer drag of `pointer_delta` screen pixels on a preview shown
/// at `display_scale`.
pub fn drag_position(
    start: Point,
    pointer_delta: Vec2,
    display_scale: f64,
    layer: Size,
    frame: Canvas,
) -> ThumbkitResult<Point> {
    if !display_scale.is_finite() || display_scale <= 0.0 {
        return Err(ThumbkitError::validation("display scale must be > 0"));
    }
    Ok(clamp_layer_origin(
        start + pointer_delta / display_scale,
        layer,
        frame,
    ))
}

/// Largest preview scale (never above 1) that fits the frame into the available area.
pub fn fit_display_scale(available_w: f64, available_h: f64, frame: Canvas) -> ThumbkitResult<f64> {
    if !(available_w.is_finite() && available_h.is_finite())
        || available_w <= 0.0
        || available_h <= 0.0
    {
        return Err(ThumbkitError::validation(
            "preview area must have positive width and height",
        ));
    }
    Ok((available_w / frame.width_f64())
        .min(available_h / frame.height_f64())
        .min(1.0))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/block.rs"]
mod tests;
