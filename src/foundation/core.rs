use crate::foundation::error::{ThumbkitError, ThumbkitResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Output frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// The fixed 1280x720 thumbnail frame.
pub const THUMBNAIL_CANVAS: Canvas = Canvas {
    width: 1280,
    height: 720,
};

impl Canvas {
    pub fn new(width: u32, height: u32) -> ThumbkitResult<Self> {
        if width == 0 || height == 0 {
            return Err(ThumbkitError::validation("canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    pub fn aspect_ratio(self) -> f64 {
        self.width_f64() / self.height_f64()
    }

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width_f64(), self.height_f64())
    }

    /// Pixel size of a surface showing this canvas at `scale`.
    pub fn scaled_size(self, scale: f64) -> (u32, u32) {
        let w = (self.width_f64() * scale).ceil().max(1.0) as u32;
        let h = (self.height_f64() * scale).ceil().max(1.0) as u32;
        (w, h)
    }
}

/// Straight (non-premultiplied) sRGB color, written as `#RRGGBB` in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    pub fn parse_hex(s: &str) -> ThumbkitResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> ThumbkitResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| ThumbkitError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        match s.len() {
            3 if s.is_ascii() => {
                let expand = |i: usize| hex_byte(&s[i..i + 1].repeat(2));
                Ok(Self {
                    r: expand(0)?,
                    g: expand(1)?,
                    b: expand(2)?,
                })
            }
            6 if s.is_ascii() => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
            }),
            _ => Err(ThumbkitError::validation(
                "hex color must be #RGB or #RRGGBB (case-insensitive)",
            )),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn with_alpha(self, a: u8) -> Rgba8 {
        Rgba8::new(self.r, self.g, self.b, a)
    }
}

impl std::str::FromStr for Rgb8 {
    type Err = ThumbkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl serde::Serialize for Rgb8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgb8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Straight-alpha RGBA8 paint color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Premultiplied bytes, as they appear in rendered frames.
    pub fn premultiplied(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
