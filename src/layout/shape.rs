use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::fonts::FontBook,
    composition::model::FontFamily,
    foundation::error::{ThumbkitError, ThumbkitResult},
    layout::fit::MeasureText,
};

/// RGBA8 brush color carried through Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// One shaped line ready for drawing.
#[derive(Clone)]
pub struct ShapedLine {
    pub layout: Arc<parley::Layout<TextBrushRgba8>>,
    pub font: vello_cpu::peniko::FontData,
    pub size_px: f32,
    pub width: f64,
    pub height: f64,
}

impl std::fmt::Debug for ShapedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedLine")
            .field("layout_ptr", &Arc::as_ptr(&self.layout))
            .field("size_px", &self.size_px)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

struct RegisteredFont {
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

/// Shapes single lines of overlay text with Parley, using faces from a [`FontBook`].
///
/// Only fonts registered from the book are visible to Parley, so layout does not depend on
/// whatever the system font fallback would pick.
pub struct TextShaper {
    fonts: FontBook,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: HashMap<FontFamily, RegisteredFont>,
}

impl TextShaper {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    fn register(&mut self, family: FontFamily) -> ThumbkitResult<&RegisteredFont> {
        if !self.registered.contains_key(&family) {
            let face = self.fonts.resolve(family)?;
            let families = self.font_ctx.collection.register_fonts(
                parley::fontique::Blob::from(face.bytes.as_ref().clone()),
                None,
            );
            let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
                ThumbkitError::render("no font families registered from font bytes")
            })?;
            let family_name = self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| ThumbkitError::render("registered font family has no name"))?
                .to_string();

            let font = vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
                face.index,
            );
            self.registered
                .insert(family, RegisteredFont { family_name, font });
        }

        self.registered
            .get(&family)
            .ok_or_else(|| ThumbkitError::render("font registration failed"))
    }

    /// Shape `line` on a single unbroken row.
    pub fn shape_line(
        &mut self,
        line: &str,
        family: FontFamily,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> ThumbkitResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ThumbkitError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let (family_name, font) = {
            let reg = self.register(family)?;
            (reg.family_name.clone(), reg.font.clone())
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, line, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(line);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        Ok(ShapedLine {
            width: f64::from(layout.width()),
            height: f64::from(layout.height()),
            layout: Arc::new(layout),
            font,
            size_px,
        })
    }
}

impl MeasureText for TextShaper {
    fn line_width(
        &mut self,
        line: &str,
        family: FontFamily,
        size_px: f32,
    ) -> ThumbkitResult<f64> {
        Ok(self
            .shape_line(line, family, size_px, TextBrushRgba8::default())?
            .width)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/shape.rs"]
mod tests;
