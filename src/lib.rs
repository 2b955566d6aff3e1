//! thumbkit composes 1280×720 video thumbnails from a background image and a text overlay.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: uploaded bytes or a video URL become an [`ImageSource`]
//! 2. **Load**: [`ImageLoader`] fetches and decodes the source into a [`Background`]
//! 3. **Compile**: background, overlay and frame become a backend-agnostic [`RenderPlan`]
//! 4. **Render**: [`CpuRenderer`] rasterizes the plan at any scale into a [`FrameRGBA`]
//! 5. **Export**: [`encode_frame`] produces a JPEG or PNG [`ExportedFile`]
//!
//! A [`Session`] ties the steps together: it keeps the current background and overlay,
//! applies only the most recently started load, and renders previews at a display scale
//! while exports always render at native size.
//!
//! Constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs produce byte-identical frames and files.
//! - **Premultiplied RGBA8**: renderers output premultiplied pixels; export un-premultiplies.
#![forbid(unsafe_code)]

mod assets;
mod compose;
mod composition;
mod config;
mod foundation;
mod layout;
mod logging;
mod render;
mod session;
mod source;

pub use assets::decode::{Background, decode_background, decode_image};
pub use assets::fonts::{FontBook, FontFace, FontSettings};
pub use compose::cover::cover_fit;
pub use composition::model::{
    AUTO_FIT_MAX_PX, AUTO_FIT_MIN_STEP_PX, DEFAULT_ANCHOR, FIXED_SIZE_MAX_PX, FIXED_SIZE_MIN_PX, FontFamily, FontSizing, TextAlign,
    TextOverlay, TextPosition,
};
pub use config::{AppConfig, LoggingConfig};
pub use foundation::core::{
    Affine, Canvas, Point, Rect, Rgb8, Rgba8, Size, THUMBNAIL_CANVAS, Vec2,
};
pub use foundation::error::{LoadOrigin, ThumbkitError, ThumbkitResult};
pub use layout::block::{
    BlockLayout, LAYER_PADDING, LineSlot, arrange, clamp_layer_origin, drag_position,
    fit_display_scale, split_lines,
};
pub use layout::fit::{FIT_WIDTH_RATIO, LINE_HEIGHT_FACTOR, MeasureText, fit_font_size, widest_line};
pub use layout::shape::{ShapedLine, TextBrushRgba8, TextShaper};
pub use logging::init_logging;
pub use render::backend::{FrameRGBA, RenderSettings};
pub use render::compile::{
    BOX_RADIUS, BOX_RGBA, DrawOp, OVERLAY_RGBA, Outline, RenderPlan, SceneInputs, compile_scene,
};
pub use render::cpu::CpuRenderer;
pub use render::export::{
    DEFAULT_JPEG_FILE_NAME, DEFAULT_JPEG_QUALITY, DEFAULT_PNG_FILE_NAME, ExportFormat,
    ExportSettings, ExportedFile, encode_frame,
};
pub use session::{LoadOutcome, LoadTicket, Session, Status};
pub use source::loader::{Fetch, HttpFetcher, ImageLoader};
pub use source::youtube::{VideoId, extract_video_id, thumbnail_url};
pub use source::{ImageSource, data_url_from_bytes, resolve_upload, resolve_video_url};
