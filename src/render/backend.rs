use crate::foundation::{core::Rgba8, math::Fnv1a64, math::unpremultiply_rgba8};

/// Rasterized frame, row-major RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Stable content hash of dimensions and pixels.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_bytes(&self.data);
        h.finish()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data
            .get(i..i + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&unpremultiply_rgba8([px[0], px[1], px[2], px[3]]));
        }
        out
    }

    /// RGB copy with alpha composited over black.
    pub fn to_rgb8_over_black(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() / 4 * 3);
        for px in self.data.chunks_exact(4) {
            if self.premultiplied {
                out.extend_from_slice(&px[..3]);
            } else {
                let a = u16::from(px[3]);
                for &c in &px[..3] {
                    out.push(((u16::from(c) * a + 127) / 255) as u8);
                }
            }
        }
        out
    }
}

/// Settings shared by every render of a session.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Frame color before the background is drawn (straight alpha).
    pub clear_rgba: Rgba8,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_rgba: Rgba8::new(0, 0, 0, 255),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
