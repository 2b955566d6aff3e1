use std::sync::Arc;

use anyhow::Context;

use crate::foundation::{
    core::Canvas,
    error::{ThumbkitError, ThumbkitResult},
};

/// Largest raster edge accepted for a background, in pixels.
const MAX_DIM: u32 = 16_384;

/// Decoded background bitmap. Immutable once built; swapped wholesale on a new load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Background {
    /// Width in pixels, always > 0.
    pub width: u32,
    /// Height in pixels, always > 0.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Background {
    /// Build from straight (non-premultiplied) RGBA8 pixels.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> ThumbkitResult<Self> {
        check_dims(width, height)?;
        if rgba.len() != width as usize * height as usize * 4 {
            return Err(ThumbkitError::validation(
                "background byte length does not match its dimensions",
            ));
        }
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba),
        })
    }
}

/// Decode uploaded or fetched bytes. Raster formats go through `image`; SVG documents are
/// rasterized large enough to cover `frame` without upscaling.
pub fn decode_background(bytes: &[u8], frame: Canvas) -> ThumbkitResult<Background> {
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes, frame);
    }
    decode_image(bytes)
}

pub fn decode_image(bytes: &[u8]) -> ThumbkitResult<Background> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Background::from_straight_rgba8(width, height, rgba.into_raw())
}

pub(crate) fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    (text.starts_with("<?xml") || text.starts_with("<svg") || text.starts_with("<!--"))
        && text.contains("<svg")
}

fn rasterize_svg(bytes: &[u8], frame: Canvas) -> ThumbkitResult<Background> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    let (sw, sh) = (f64::from(size.width()), f64::from(size.height()));
    if !(sw.is_finite() && sh.is_finite()) || sw <= 0.0 || sh <= 0.0 {
        return Err(ThumbkitError::validation("svg has invalid width/height"));
    }

    let scale = (frame.width_f64() / sw)
        .max(frame.height_f64() / sh)
        .max(1.0);
    let w = (sw * scale).ceil() as u32;
    let h = (sh * scale).ceil() as u32;
    check_dims(w, h)?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| ThumbkitError::render("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        w as f32 / size.width(),
        h as f32 / size.height(),
    );
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    Ok(Background {
        width: w,
        height: h,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

fn check_dims(width: u32, height: u32) -> ThumbkitResult<()> {
    if width == 0 || height == 0 {
        return Err(ThumbkitError::validation(
            "image has zero width or height",
        ));
    }
    if width > MAX_DIM || height > MAX_DIM {
        return Err(ThumbkitError::validation(format!(
            "image too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok(())
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
