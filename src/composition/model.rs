use std::path::Path;

use anyhow::Context;

use crate::foundation::{
    core::{Point, Rgb8},
    error::{ThumbkitError, ThumbkitResult},
};

/// Smallest font size the styled slider allows.
pub const FIXED_SIZE_MIN_PX: f32 = 20.0;
/// Largest font size the styled slider allows.
pub const FIXED_SIZE_MAX_PX: f32 = 200.0;
/// Upper bound for the auto-fit starting size.
pub const AUTO_FIT_MAX_PX: f32 = 200.0;
/// Smallest auto-fit decrement; bounds the number of sizes tried.
pub const AUTO_FIT_MIN_STEP_PX: f32 = 0.5;

/// Default anchor of a styled text layer before it is dragged.
pub const DEFAULT_ANCHOR: Point = Point::new(64.0, 300.0);

/// Font families offered by the overlay editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    #[default]
    Inter,
    Roboto,
    Oswald,
    Anton,
    Lobster,
    PlayfairDisplay,
}

impl FontFamily {
    pub const ALL: [FontFamily; 6] = [
        FontFamily::Inter,
        FontFamily::Roboto,
        FontFamily::Oswald,
        FontFamily::Anton,
        FontFamily::Lobster,
        FontFamily::PlayfairDisplay,
    ];

    /// Family name as registered in font files.
    pub fn family_name(self) -> &'static str {
        match self {
            FontFamily::Inter => "Inter",
            FontFamily::Roboto => "Roboto",
            FontFamily::Oswald => "Oswald",
            FontFamily::Anton => "Anton",
            FontFamily::Lobster => "Lobster",
            FontFamily::PlayfairDisplay => "Playfair Display",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// How the overlay font size is chosen.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSizing {
    /// Shrink from `max_px` in `step_px` decrements until the widest line fits, never below
    /// `min_px`.
    AutoFit {
        max_px: f32,
        min_px: f32,
        step_px: f32,
    },
    /// Use `size_px` as-is.
    Fixed { size_px: f32 },
}

impl Default for FontSizing {
    fn default() -> Self {
        Self::AutoFit {
            max_px: 96.0,
            min_px: 36.0,
            step_px: 4.0,
        }
    }
}

/// Where the text layer sits in the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPosition {
    /// Block centered in the frame.
    #[default]
    Centered,
    /// Top-left corner of the text layer, in frame pixels. Clamped into the frame at layout.
    At { x: f64, y: f64 },
}

impl TextPosition {
    pub fn at(p: Point) -> Self {
        Self::At { x: p.x, y: p.y }
    }
}

/// Text overlay settings, replaced as a whole value whenever the editor changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextOverlay {
    pub text: String,
    pub sizing: FontSizing,
    pub color: Rgb8,
    pub font_family: FontFamily,
    pub align: TextAlign,
    /// Semi-opaque box behind the text block.
    pub background_box: bool,
    /// Full-frame dimming between the background and the text.
    pub full_overlay: bool,
    /// Dark stroke drawn beneath the fill.
    pub outline: bool,
    pub position: TextPosition,
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self::auto_fit("")
    }
}

impl TextOverlay {
    /// Centered, auto-sized, outlined white text.
    pub fn auto_fit(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sizing: FontSizing::default(),
            color: Rgb8::WHITE,
            font_family: FontFamily::Inter,
            align: TextAlign::Center,
            background_box: false,
            full_overlay: false,
            outline: true,
            position: TextPosition::Centered,
        }
    }

    /// Fixed-size text on a background box, anchored where a drag would start.
    pub fn styled(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sizing: FontSizing::Fixed { size_px: 80.0 },
            color: Rgb8::WHITE,
            font_family: FontFamily::Inter,
            align: TextAlign::Center,
            background_box: true,
            full_overlay: false,
            outline: false,
            position: TextPosition::at(DEFAULT_ANCHOR),
        }
    }

    pub fn from_json_str(s: &str) -> ThumbkitResult<Self> {
        let overlay: Self =
            serde_json::from_str(s).map_err(|e| ThumbkitError::serde(e.to_string()))?;
        overlay.validate()?;
        Ok(overlay)
    }

    pub fn from_path(path: &Path) -> ThumbkitResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read overlay json '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> ThumbkitResult<()> {
        match self.sizing {
            FontSizing::AutoFit {
                max_px,
                min_px,
                step_px,
            } => {
                if !(max_px.is_finite() && min_px.is_finite() && step_px.is_finite()) {
                    return Err(ThumbkitError::validation(
                        "auto-fit sizes must be finite numbers",
                    ));
                }
                if min_px <= 0.0 || min_px > max_px || max_px > AUTO_FIT_MAX_PX {
                    return Err(ThumbkitError::validation(format!(
                        "auto-fit requires 0 < min_px <= max_px <= {AUTO_FIT_MAX_PX}"
                    )));
                }
                if step_px < AUTO_FIT_MIN_STEP_PX {
                    return Err(ThumbkitError::validation(format!(
                        "auto-fit step_px must be >= {AUTO_FIT_MIN_STEP_PX}"
                    )));
                }
            }
            FontSizing::Fixed { size_px } => {
                if !(FIXED_SIZE_MIN_PX..=FIXED_SIZE_MAX_PX).contains(&size_px) {
                    return Err(ThumbkitError::validation(format!(
                        "font size must be within {FIXED_SIZE_MIN_PX}..={FIXED_SIZE_MAX_PX} px"
                    )));
                }
            }
        }

        if let TextPosition::At { x, y } = self.position
            && !(x.is_finite() && y.is_finite())
        {
            return Err(ThumbkitError::validation("text position must be finite"));
        }
        Ok(())
    }

    /// True when no line survives trimming, i.e. nothing would be drawn.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
