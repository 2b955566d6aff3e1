use std::{collections::HashMap, time::Duration};

use url::Url;

use super::*;
use crate::source::resolve_upload;

/// Serves fixed bodies after a per-URL delay.
#[derive(Default)]
struct DelayedFetcher {
    routes: HashMap<String, (Duration, Vec<u8>)>,
}

impl DelayedFetcher {
    fn route(mut self, url: &Url, delay_ms: u64, body: Vec<u8>) -> Self {
        self.routes
            .insert(url.to_string(), (Duration::from_millis(delay_ms), body));
        self
    }
}

impl Fetch for DelayedFetcher {
    async fn fetch(&self, url: &Url) -> anyhow::Result<Vec<u8>> {
        let Some((delay, body)) = self.routes.get(url.as_str()) else {
            anyhow::bail!("GET {url} returned 404 Not Found");
        };
        tokio::time::sleep(*delay).await;
        Ok(body.clone())
    }
}

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn thumb(id: &str) -> Url {
    Url::parse(&format!("https://img.youtube.com/vi/{id}/maxresdefault.jpg")).unwrap()
}

fn session() -> Session {
    Session::new(FontBook::empty())
}

#[test]
fn new_session_waits_for_input() {
    let s = session();
    assert_eq!(s.status(), Status::WaitingForInput);
    assert_eq!(s.status().to_string(), "Waiting for input…");
    assert!(s.background().is_none());
    assert!(s.error().is_none());
    assert_eq!(s.frame(), THUMBNAIL_CANVAS);
}

#[test]
fn begin_load_reports_progress_by_source_kind() {
    let mut s = session();
    let upload = resolve_upload(Some(png(2, 2, [0, 0, 0, 255]))).unwrap();
    let t = s.begin_load(&upload);
    assert_eq!(t.origin(), LoadOrigin::Upload);
    assert_eq!(s.status().message(), "Processing image…");

    let t2 = s.begin_load(&ImageSource::Remote(thumb("dQw4w9WgXcQ")));
    assert_eq!(t2.origin(), LoadOrigin::Remote);
    assert!(t2.generation() > t.generation());
    assert_eq!(s.status().message(), "Fetching YouTube thumbnail…");
}

#[tokio::test(start_paused = true)]
async fn slower_earlier_load_cannot_overwrite_a_newer_one() {
    let first = thumb("aaaaaaaaaaa");
    let second = thumb("bbbbbbbbbbb");
    let fetcher = DelayedFetcher::default()
        .route(&first, 500, png(4, 4, [255, 0, 0, 255]))
        .route(&second, 10, png(8, 8, [0, 0, 255, 255]));
    let loader = ImageLoader::new(fetcher);
    let mut s = session();

    let first_src = ImageSource::Remote(first);
    let second_src = ImageSource::Remote(second);
    let t1 = s.begin_load(&first_src);
    let t2 = s.begin_load(&second_src);
    let (r1, r2) = tokio::join!(loader.load(&first_src), loader.load(&second_src));

    assert_eq!(s.finish_load(t2, r2), LoadOutcome::Applied);
    assert_eq!(s.finish_load(t1, r1), LoadOutcome::Superseded);
    assert_eq!(s.background().map(|bg| bg.width), Some(8));
    assert_eq!(s.status(), Status::PreviewReady);
}

#[tokio::test]
async fn stale_failure_does_not_clear_a_newer_background() {
    let good = thumb("ccccccccccc");
    let loader = ImageLoader::new(DelayedFetcher::default().route(&good, 0, png(4, 4, [1, 2, 3, 255])));
    let mut s = session();

    let bad_src = ImageSource::Remote(thumb("ddddddddddd"));
    let good_src = ImageSource::Remote(good);
    let stale = s.begin_load(&bad_src);
    let outcome = s.load(&loader, &good_src).await;
    assert_eq!(outcome, LoadOutcome::Applied);

    let late = loader.load(&bad_src).await;
    assert!(late.is_err());
    assert_eq!(s.finish_load(stale, late), LoadOutcome::Superseded);
    assert!(s.background().is_some());
    assert!(s.error().is_none());
}

#[tokio::test]
async fn failed_load_clears_background_and_reports_message() {
    let good = thumb("eeeeeeeeeee");
    let loader = ImageLoader::new(DelayedFetcher::default().route(&good, 0, png(4, 4, [1, 2, 3, 255])));
    let mut s = session();
    s.load(&loader, &ImageSource::Remote(good)).await;
    assert!(s.background().is_some());

    let outcome = s
        .load(&loader, &ImageSource::Remote(thumb("fffffffffff")))
        .await;
    let expected = "Thumbnail could not be loaded. Try a different video URL.";
    assert_eq!(outcome, LoadOutcome::Failed(expected.to_string()));
    assert!(s.background().is_none());
    assert_eq!(s.status(), Status::WaitingForInput);
    assert_eq!(s.error(), Some(expected));
}

#[tokio::test]
async fn rejected_input_supersedes_in_flight_loads() {
    let url = thumb("ggggggggggg");
    let loader = ImageLoader::new(DelayedFetcher::default().route(&url, 0, png(4, 4, [1, 2, 3, 255])));
    let mut s = session();
    let src = ImageSource::Remote(url);
    let ticket = s.begin_load(&src);

    let err = crate::source::resolve_video_url("https://example.com/video").unwrap_err();
    s.reject_input(&err);
    assert_eq!(s.error(), Some("Enter a valid YouTube URL."));

    let result = loader.load(&src).await;
    assert_eq!(s.finish_load(ticket, result), LoadOutcome::Superseded);
    assert!(s.background().is_none());
    assert_eq!(s.status(), Status::WaitingForInput);
}

#[test]
fn invalid_settings_are_rejected_without_side_effects() {
    let mut s = session();
    assert!(s.set_preview_scale(0.0).is_err());
    assert!(s.set_preview_scale(1.5).is_err());
    assert!(s.set_preview_scale(f64::NAN).is_err());
    assert_eq!(s.preview_scale(), 1.0);
    s.set_preview_scale(0.25).unwrap();
    assert_eq!(s.preview_scale(), 0.25);

    let mut bad = TextOverlay::styled("hi");
    bad.sizing = crate::composition::model::FontSizing::Fixed { size_px: 1000.0 };
    assert!(s.set_overlay(bad).is_err());
    assert_eq!(s.overlay(), &TextOverlay::default());
}

#[test]
fn preview_uses_display_scale_and_export_stays_native() {
    let mut s = session();
    let ticket = s.begin_load(&resolve_upload(Some(png(16, 9, [9, 9, 9, 255]))).unwrap());
    let bg = Background::from_straight_rgba8(16, 9, [40, 80, 120, 255].repeat(16 * 9)).unwrap();
    assert_eq!(s.finish_load(ticket, Ok(bg)), LoadOutcome::Applied);

    s.set_preview_scale(0.5).unwrap();
    let preview = s.render_preview().unwrap();
    assert_eq!((preview.width, preview.height), (640, 360));

    let export = s.render_export().unwrap();
    assert_eq!((export.width, export.height), (1280, 720));
    s.set_preview_scale(1.0).unwrap();
    assert_eq!(s.render_export().unwrap(), export);
}

#[test]
fn export_without_background_is_a_black_jpeg() {
    let mut s = session();
    let file = s.export().unwrap();
    assert_eq!(file.file_name, "youtube-thumbnail.jpg");
    assert_eq!((file.width, file.height), (1280, 720));
    let decoded = image::load_from_memory(&file.bytes).unwrap().to_rgb8();
    assert!(decoded.pixels().all(|p| p.0.iter().all(|&c| c < 8)));
    assert_eq!(s.status(), Status::WaitingForInput);
}
