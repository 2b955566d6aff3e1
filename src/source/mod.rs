pub(crate) mod loader;
pub(crate) mod youtube;

use base64::Engine;
use url::Url;

use crate::{
    assets::decode::looks_like_svg,
    foundation::error::{ThumbkitError, ThumbkitResult},
};

/// Reference to a background image, produced before any bytes are decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// `data:<mime>;base64,<payload>` built from uploaded bytes.
    DataUrl(String),
    /// Remote image fetched over HTTP(S).
    Remote(Url),
}

impl ImageSource {
    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::DataUrl(_) => "data_url",
            ImageSource::Remote(_) => "remote",
        }
    }
}

/// Turn uploaded file bytes into an [`ImageSource::DataUrl`].
pub fn resolve_upload(bytes: Option<Vec<u8>>) -> ThumbkitResult<ImageSource> {
    match bytes {
        Some(bytes) if !bytes.is_empty() => Ok(ImageSource::DataUrl(data_url_from_bytes(&bytes))),
        _ => Err(ThumbkitError::validation("Please select an image file.")),
    }
}

/// Turn a video page URL into the remote thumbnail reference.
pub fn resolve_video_url(url: &str) -> ThumbkitResult<ImageSource> {
    let id = youtube::extract_video_id(url)
        .ok_or_else(|| ThumbkitError::validation("Enter a valid YouTube URL."))?;
    Ok(ImageSource::Remote(youtube::thumbnail_url(&id)?))
}

pub fn data_url_from_bytes(bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{payload}", sniff_mime(bytes))
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    if looks_like_svg(bytes) {
        return "image/svg+xml";
    }
    match image::guess_format(bytes) {
        Ok(format) => format.to_mime_type(),
        Err(_) => "application/octet-stream",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/mod.rs"]
mod tests;
