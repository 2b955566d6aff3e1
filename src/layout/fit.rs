use crate::{
    composition::model::{AUTO_FIT_MAX_PX, AUTO_FIT_MIN_STEP_PX, FontFamily},
    foundation::error::{ThumbkitError, ThumbkitResult},
};

/// Share of the frame width the widest auto-fit line may occupy.
pub const FIT_WIDTH_RATIO: f64 = 0.9;

/// Line advance as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.15;

/// Horizontal extent of a single line of text.
///
/// Implemented by the Parley-backed shaper; any metric that is monotone in `size_px` works
/// for auto-fit.
pub trait MeasureText {
    fn line_width(&mut self, line: &str, family: FontFamily, size_px: f32)
    -> ThumbkitResult<f64>;
}

/// Widest of `lines` at `size_px`. Zero for no lines.
pub fn widest_line<M: MeasureText + ?Sized>(
    measure: &mut M,
    lines: &[&str],
    family: FontFamily,
    size_px: f32,
) -> ThumbkitResult<f64> {
    let mut widest = 0.0f64;
    for line in lines {
        widest = widest.max(measure.line_width(line, family, size_px)?);
    }
    Ok(widest)
}

/// Largest size in `max_px, max_px - step_px, ...` (not below `min_px`) whose widest line fits
/// within `budget_px`; `min_px` when none fits.
#[tracing::instrument(level = "debug", skip(measure, lines), fields(lines = lines.len()))]
pub fn fit_font_size<M: MeasureText + ?Sized>(
    measure: &mut M,
    lines: &[&str],
    family: FontFamily,
    max_px: f32,
    min_px: f32,
    step_px: f32,
    budget_px: f64,
) -> ThumbkitResult<f32> {
    let bounds_ok = step_px.is_finite()
        && step_px >= AUTO_FIT_MIN_STEP_PX
        && min_px.is_finite()
        && min_px > 0.0
        && min_px <= max_px
        && max_px <= AUTO_FIT_MAX_PX;
    if !bounds_ok {
        return Err(ThumbkitError::validation(format!(
            "auto-fit requires step_px >= {AUTO_FIT_MIN_STEP_PX} and \
             0 < min_px <= max_px <= {AUTO_FIT_MAX_PX}"
        )));
    }
    if lines.is_empty() {
        return Ok(max_px);
    }

    // Sizes are derived from an integer index so the sequence always terminates.
    let steps = ((max_px - min_px) / step_px).floor() as u32;
    for k in 0..=steps {
        let size = (max_px - k as f32 * step_px).max(min_px);
        let widest = widest_line(measure, lines, family, size)?;
        if widest <= budget_px {
            tracing::debug!(size, widest, budget_px, "auto-fit size chosen");
            return Ok(size);
        }
    }

    tracing::debug!(min_px, budget_px, "no tested size fits, using floor");
    Ok(min_px)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
