use crate::foundation::{
    core::{Canvas, Rect},
    error::{ThumbkitError, ThumbkitResult},
};

/// Destination rectangle that scales an `image_w` x `image_h` bitmap to cover `frame`.
///
/// Aspect ratio is preserved; the overflowing axis is cropped symmetrically, so the rectangle
/// may extend past the frame on one axis and always spans it exactly on the other.
pub fn cover_fit(frame: Canvas, image_w: u32, image_h: u32) -> ThumbkitResult<Rect> {
    if image_w == 0 || image_h == 0 {
        return Err(ThumbkitError::validation(
            "cover fit requires an image with non-zero dimensions",
        ));
    }
    if frame.width == 0 || frame.height == 0 {
        return Err(ThumbkitError::validation(
            "cover fit requires a frame with non-zero dimensions",
        ));
    }

    let frame_w = frame.width_f64();
    let frame_h = frame.height_f64();
    let image_ratio = f64::from(image_w) / f64::from(image_h);

    let (dx, dy, dw, dh) = if image_ratio > frame.aspect_ratio() {
        let dh = frame_h;
        let dw = dh * image_ratio;
        ((frame_w - dw) / 2.0, 0.0, dw, dh)
    } else {
        let dw = frame_w;
        let dh = dw / image_ratio;
        (0.0, (frame_h - dh) / 2.0, dw, dh)
    };

    Ok(Rect::new(dx, dy, dx + dw, dy + dh))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/cover.rs"]
mod tests;
