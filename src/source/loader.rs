use std::future::Future;

use anyhow::Context;
use base64::Engine;
use url::Url;

use crate::{
    assets::decode::{Background, decode_background},
    foundation::{
        core::{Canvas, THUMBNAIL_CANVAS},
        error::{LoadOrigin, ThumbkitError, ThumbkitResult},
    },
    source::ImageSource,
};

/// Byte transport for remote image sources.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> impl Future<Output = anyhow::Result<Vec<u8>>> + Send;
}

/// [`Fetch`] over HTTP(S) with `reqwest`. No timeout is configured.
#[derive(Clone, Debug, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> anyhow::Result<Vec<u8>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("GET {url} returned {status}");
        }
        let body = response.bytes().await.context("read response body")?;
        Ok(body.to_vec())
    }
}

/// Resolves an [`ImageSource`] into a decoded [`Background`].
#[derive(Clone, Debug)]
pub struct ImageLoader<F = HttpFetcher> {
    fetcher: F,
    frame: Canvas,
}

impl Default for ImageLoader<HttpFetcher> {
    fn default() -> Self {
        Self::new(HttpFetcher::new())
    }
}

impl<F: Fetch> ImageLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            frame: THUMBNAIL_CANVAS,
        }
    }

    /// Frame used to size rasterized SVG backgrounds.
    pub fn with_frame(mut self, frame: Canvas) -> Self {
        self.frame = frame;
        self
    }

    #[tracing::instrument(level = "debug", skip(self, source), fields(kind = source.kind()))]
    pub async fn load(&self, source: &ImageSource) -> ThumbkitResult<Background> {
        match source {
            ImageSource::DataUrl(data_url) => {
                let bytes = decode_data_url(data_url)
                    .map_err(|e| ThumbkitError::load(LoadOrigin::Upload, format!("{e:#}")))?;
                decode_background(&bytes, self.frame)
                    .map_err(|e| ThumbkitError::load(LoadOrigin::Upload, e.to_string()))
            }
            ImageSource::Remote(url) => {
                let bytes = self
                    .fetcher
                    .fetch(url)
                    .await
                    .map_err(|e| ThumbkitError::load(LoadOrigin::Remote, format!("{e:#}")))?;
                tracing::debug!(bytes = bytes.len(), %url, "remote image fetched");
                decode_background(&bytes, self.frame)
                    .map_err(|e| ThumbkitError::load(LoadOrigin::Remote, e.to_string()))
            }
        }
    }
}

fn decode_data_url(data_url: &str) -> anyhow::Result<Vec<u8>> {
    let rest = data_url
        .strip_prefix("data:")
        .context("data url must start with 'data:'")?;
    let (header, payload) = rest.split_once(',').context("data url has no payload")?;
    if !header.ends_with(";base64") {
        anyhow::bail!("data url is not base64 encoded");
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .context("decode base64 payload")
}

#[cfg(test)]
#[path = "../../tests/unit/source/loader.rs"]
mod tests;
