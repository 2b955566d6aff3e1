use url::Url;

use crate::foundation::error::{ThumbkitError, ThumbkitResult};

const VIDEO_ID_LEN: usize = 11;

/// Eleven-character YouTube video identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn parse(s: &str) -> Option<Self> {
        let valid = s.len() == VIDEO_ID_LEN
            && s
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        valid.then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video id from short links, watch pages, embed and legacy `/v/` URLs.
///
/// Anything else, including ids that are not exactly 11 URL-safe characters, is `None`.
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let url = Url::parse(input.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?.to_ascii_lowercase();

    if host == "youtu.be" || host == "www.youtu.be" {
        let first = url.path_segments()?.next()?;
        return VideoId::parse(first);
    }

    if host != "youtube.com" && !host.ends_with(".youtube.com") {
        return None;
    }

    if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v")
        && !v.is_empty()
    {
        return VideoId::parse(&v);
    }

    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["embed", id, ..] | ["v", id, ..] => VideoId::parse(id),
        _ => None,
    }
}

/// Highest-resolution thumbnail published for a video.
pub fn thumbnail_url(id: &VideoId) -> ThumbkitResult<Url> {
    Url::parse(&format!(
        "https://img.youtube.com/vi/{}/maxresdefault.jpg",
        id.as_str()
    ))
    .map_err(|e| ThumbkitError::validation(format!("thumbnail url for '{id}': {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/source/youtube.rs"]
mod tests;
