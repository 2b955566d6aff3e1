use std::path::{Path, PathBuf};

use anyhow::Context;
use image::ImageEncoder;

use crate::{
    foundation::error::{ThumbkitError, ThumbkitResult},
    render::backend::FrameRGBA,
};

pub const DEFAULT_JPEG_QUALITY: u8 = 92;
pub const DEFAULT_JPEG_FILE_NAME: &str = "youtube-thumbnail.jpg";
pub const DEFAULT_PNG_FILE_NAME: &str = "thumbnail-generated.png";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Jpeg,
    Png,
}

impl ExportFormat {
    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Png => "image/png",
        }
    }

    pub fn default_file_name(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => DEFAULT_JPEG_FILE_NAME,
            ExportFormat::Png => DEFAULT_PNG_FILE_NAME,
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ThumbkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "png" => Ok(ExportFormat::Png),
            other => Err(ThumbkitError::validation(format!(
                "unsupported export format '{other}' (expected jpeg or png)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub format: ExportFormat,
    /// JPEG quality in 1..=100; ignored for PNG.
    pub jpeg_quality: u8,
    /// Overrides the format's default file name.
    pub file_name: Option<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Jpeg,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            file_name: None,
        }
    }
}

impl ExportSettings {
    pub fn validate(&self) -> ThumbkitResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ThumbkitError::validation("jpeg_quality must be within 1..=100"));
        }
        if let Some(name) = &self.file_name
            && (name.trim().is_empty() || name.contains(['/', '\\']))
        {
            return Err(ThumbkitError::validation(
                "export file_name must be a plain, non-empty file name",
            ));
        }
        Ok(())
    }

    pub fn file_name(&self) -> &str {
        self.file_name
            .as_deref()
            .unwrap_or_else(|| self.format.default_file_name())
    }
}

/// Encoded image ready to be handed to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime: &'static str,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// Write into `dir` under [`ExportedFile::file_name`], creating `dir` if needed.
    pub fn write_to_dir(&self, dir: &Path) -> ThumbkitResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))
            .map_err(|e| ThumbkitError::export(format!("{e:#}")))?;
        let path = dir.join(&self.file_name);
        self.write_to(&path)?;
        Ok(path)
    }

    pub fn write_to(&self, path: &Path) -> ThumbkitResult<()> {
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("write export '{}'", path.display()))
            .map_err(|e| ThumbkitError::export(format!("{e:#}")))
    }
}

/// Encode a rendered frame. JPEG output composites transparency over black.
#[tracing::instrument(level = "debug", skip(frame), fields(width = frame.width, height = frame.height))]
pub fn encode_frame(frame: &FrameRGBA, settings: &ExportSettings) -> ThumbkitResult<ExportedFile> {
    settings.validate()?;
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(ThumbkitError::export(format!(
            "frame byte length {} does not match {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let mut bytes = Vec::new();
    match settings.format {
        ExportFormat::Jpeg => {
            let rgb = frame.to_rgb8_over_black();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, settings.jpeg_quality)
                .encode(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
                .map_err(|e| ThumbkitError::export(format!("encode jpeg: {e}")))?;
        }
        ExportFormat::Png => {
            let rgba = frame.to_straight_rgba8();
            image::codecs::png::PngEncoder::new(&mut bytes)
                .write_image(&rgba, frame.width, frame.height, image::ExtendedColorType::Rgba8)
                .map_err(|e| ThumbkitError::export(format!("encode png: {e}")))?;
        }
    }

    tracing::debug!(bytes = bytes.len(), format = ?settings.format, "frame encoded");
    Ok(ExportedFile {
        file_name: settings.file_name().to_string(),
        mime: settings.format.mime(),
        width: frame.width,
        height: frame.height,
        bytes,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
