use std::sync::Arc;

use crate::{
    assets::decode::Background,
    foundation::{
        core::{Affine, Point, Rect, Rgba8},
        error::{ThumbkitError, ThumbkitResult},
    },
    render::{
        backend::FrameRGBA,
        compile::{DrawOp, Outline, RenderPlan},
    },
};

/// Rasterizes [`RenderPlan`]s with `vello_cpu`.
///
/// Holds no state between renders: every call builds a fresh surface and context, so output
/// depends only on the plan and the scale.
#[derive(Debug, Default)]
pub struct CpuRenderer;

impl CpuRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render `plan` with every coordinate multiplied by `scale`.
    ///
    /// The surface is `ceil(W * scale)` x `ceil(H * scale)`; scale 1 yields the native frame.
    #[tracing::instrument(level = "debug", skip(self, plan), fields(ops = plan.ops.len()))]
    pub fn render(&mut self, plan: &RenderPlan, scale: f64) -> ThumbkitResult<FrameRGBA> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ThumbkitError::render(format!(
                "render scale must be finite and > 0, got {scale}"
            )));
        }

        let (width, height) = plan.canvas.scaled_size(scale);
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| ThumbkitError::render("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| ThumbkitError::render("surface height exceeds u16"))?;

        let base = Affine::scale(scale);
        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
        for op in &plan.ops {
            draw_op(&mut ctx, op, base)?;
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn draw_op(ctx: &mut vello_cpu::RenderContext, op: &DrawOp, base: Affine) -> ThumbkitResult<()> {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    match op {
        DrawOp::FillRect { rect, color } => {
            ctx.set_transform(affine_to_cpu(base));
            ctx.set_paint(color_to_cpu(*color));
            ctx.fill_rect(&rect_to_cpu(*rect));
            Ok(())
        }
        DrawOp::FillRoundedRect {
            rect,
            radius,
            color,
        } => {
            use vello_cpu::kurbo::Shape;

            ctx.set_transform(affine_to_cpu(base));
            ctx.set_paint(color_to_cpu(*color));
            let rounded = vello_cpu::kurbo::RoundedRect::from_rect(rect_to_cpu(*rect), *radius);
            ctx.fill_path(&rounded.to_path(0.1));
            Ok(())
        }
        DrawOp::Image { image, dest } => {
            let paint = image_paint(image)?;
            let (w, h) = (f64::from(image.width), f64::from(image.height));
            let placement = Affine::translate(dest.origin().to_vec2())
                * Affine::scale_non_uniform(dest.width() / w, dest.height() / h);

            ctx.set_transform(affine_to_cpu(base * placement));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            Ok(())
        }
        DrawOp::Text {
            line,
            origin,
            fill,
            outline,
        } => {
            ctx.set_transform(affine_to_cpu(base * translate_to(*origin)));

            for layout_line in line.layout.lines() {
                for item in layout_line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let font_size = run.run().font_size();
                    let glyphs = || {
                        run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        })
                    };

                    if let Some(Outline { width, color }) = outline {
                        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                        ctx.set_paint(color_to_cpu(*color));
                        ctx.glyph_run(&line.font)
                            .font_size(font_size)
                            .stroke_glyphs(glyphs());
                    }

                    ctx.set_paint(color_to_cpu(*fill));
                    ctx.glyph_run(&line.font)
                        .font_size(font_size)
                        .fill_glyphs(glyphs());
                }
            }
            Ok(())
        }
    }
}

fn translate_to(p: Point) -> Affine {
    Affine::translate(p.to_vec2())
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn image_paint(image: &Background) -> ThumbkitResult<vello_cpu::Image> {
    let pixmap = image_premul_bytes_to_pixmap(image.rgba8_premul.as_slice(), image.width, image.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ThumbkitResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ThumbkitError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ThumbkitError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ThumbkitError::render("background byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
