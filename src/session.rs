use crate::{
    assets::{decode::Background, fonts::FontBook},
    composition::model::TextOverlay,
    foundation::{
        core::{Canvas, THUMBNAIL_CANVAS},
        error::{LoadOrigin, ThumbkitError, ThumbkitResult},
    },
    layout::shape::TextShaper,
    render::{
        backend::{FrameRGBA, RenderSettings},
        compile::{RenderPlan, SceneInputs, compile_scene},
        cpu::CpuRenderer,
        export::{ExportSettings, ExportedFile, encode_frame},
    },
    source::{
        ImageSource,
        loader::{Fetch, ImageLoader},
    },
};

/// User-visible progress of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    WaitingForInput,
    ProcessingImage,
    FetchingThumbnail,
    PreviewReady,
}

impl Status {
    pub fn message(self) -> &'static str {
        match self {
            Status::WaitingForInput => "Waiting for input…",
            Status::ProcessingImage => "Processing image…",
            Status::FetchingThumbnail => "Fetching YouTube thumbnail…",
            Status::PreviewReady => "Preview ready.",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Handle for one started load. Only the ticket of the most recent load can apply a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use = "a load ticket must be passed back to `Session::finish_load`"]
pub struct LoadTicket {
    generation: u64,
    origin: LoadOrigin,
}

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }

    pub fn origin(self) -> LoadOrigin {
        self.origin
    }
}

/// What [`Session::finish_load`] did with a result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The background was replaced.
    Applied,
    /// A newer load had started; the result was dropped.
    Superseded,
    /// The load failed; the background was cleared. Carries the user-facing message.
    Failed(String),
}

/// Mutable state behind one thumbnail editor.
///
/// Background and overlay are replaced as whole values. Rendering reads them and never
/// writes back, so a preview can be taken at any scale without affecting the export.
pub struct Session {
    frame: Canvas,
    background: Option<Background>,
    overlay: TextOverlay,
    render_settings: RenderSettings,
    export_settings: ExportSettings,
    preview_scale: f64,
    generation: u64,
    status: Status,
    error: Option<String>,
    shaper: TextShaper,
    renderer: CpuRenderer,
}

impl Session {
    pub fn new(fonts: FontBook) -> Self {
        Self::with_settings(fonts, RenderSettings::default(), ExportSettings::default())
    }

    pub fn with_settings(
        fonts: FontBook,
        render_settings: RenderSettings,
        export_settings: ExportSettings,
    ) -> Self {
        Self {
            frame: THUMBNAIL_CANVAS,
            background: None,
            overlay: TextOverlay::default(),
            render_settings,
            export_settings,
            preview_scale: 1.0,
            generation: 0,
            status: Status::WaitingForInput,
            error: None,
            shaper: TextShaper::new(fonts),
            renderer: CpuRenderer::new(),
        }
    }

    pub fn frame(&self) -> Canvas {
        self.frame
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    pub fn overlay(&self) -> &TextOverlay {
        &self.overlay
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Last user-facing error, cleared when a new load starts or succeeds.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn preview_scale(&self) -> f64 {
        self.preview_scale
    }

    pub fn export_settings(&self) -> &ExportSettings {
        &self.export_settings
    }

    /// Replace the overlay after validating it. On error the previous overlay is kept.
    pub fn set_overlay(&mut self, overlay: TextOverlay) -> ThumbkitResult<()> {
        overlay.validate()?;
        self.overlay = overlay;
        Ok(())
    }

    /// Display scale for [`Session::render_preview`], in (0, 1].
    pub fn set_preview_scale(&mut self, scale: f64) -> ThumbkitResult<()> {
        if !scale.is_finite() || scale <= 0.0 || scale > 1.0 {
            return Err(ThumbkitError::validation(format!(
                "preview scale must be within (0, 1], got {scale}"
            )));
        }
        self.preview_scale = scale;
        Ok(())
    }

    /// Start a load for `source`. Any load started earlier becomes stale.
    pub fn begin_load(&mut self, source: &ImageSource) -> LoadTicket {
        self.generation += 1;
        let origin = match source {
            ImageSource::DataUrl(_) => {
                self.status = Status::ProcessingImage;
                LoadOrigin::Upload
            }
            ImageSource::Remote(_) => {
                self.status = Status::FetchingThumbnail;
                LoadOrigin::Remote
            }
        };
        self.error = None;
        tracing::debug!(generation = self.generation, kind = source.kind(), "load started");
        LoadTicket {
            generation: self.generation,
            origin,
        }
    }

    /// Apply the result of the load identified by `ticket`, unless a newer load has started.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: ThumbkitResult<Background>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "stale load result dropped"
            );
            return LoadOutcome::Superseded;
        }
        match result {
            Ok(background) => {
                tracing::info!(
                    width = background.width,
                    height = background.height,
                    "background loaded"
                );
                self.background = Some(background);
                self.status = Status::PreviewReady;
                self.error = None;
                LoadOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(error = %err, "background load failed");
                let message = err.user_message();
                self.clear_with_error(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Record input that was rejected before any load could start (missing file, bad URL).
    ///
    /// Counts as a request: in-flight loads become stale and the background is cleared.
    pub fn reject_input(&mut self, err: &ThumbkitError) {
        self.generation += 1;
        self.clear_with_error(err.user_message());
    }

    /// Resolve and apply `source` in one step.
    pub async fn load<F: Fetch>(
        &mut self,
        loader: &ImageLoader<F>,
        source: &ImageSource,
    ) -> LoadOutcome {
        let ticket = self.begin_load(source);
        let result = loader.load(source).await;
        self.finish_load(ticket, result)
    }

    fn clear_with_error(&mut self, message: String) {
        self.background = None;
        self.status = Status::WaitingForInput;
        self.error = Some(message);
    }

    pub fn compile(&mut self) -> ThumbkitResult<RenderPlan> {
        let inputs = SceneInputs {
            frame: self.frame,
            background: self.background.as_ref(),
            overlay: &self.overlay,
            clear_rgba: self.render_settings.clear_rgba,
        };
        compile_scene(&inputs, &mut self.shaper)
    }

    /// Render at the current preview scale.
    pub fn render_preview(&mut self) -> ThumbkitResult<FrameRGBA> {
        let plan = self.compile()?;
        self.renderer.render(&plan, self.preview_scale)
    }

    /// Render at native frame size, ignoring the preview scale.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn render_export(&mut self) -> ThumbkitResult<FrameRGBA> {
        let plan = self.compile()?;
        let frame = self.renderer.render(&plan, 1.0)?;
        tracing::debug!(fingerprint = frame.fingerprint(), "export frame rendered");
        Ok(frame)
    }

    /// Render and encode the export file. Failures are recorded as the session error; the
    /// background and overlay are left untouched so the export can be retried.
    pub fn export(&mut self) -> ThumbkitResult<ExportedFile> {
        let result = self
            .render_export()
            .and_then(|frame| encode_frame(&frame, &self.export_settings));
        if let Err(err) = &result {
            tracing::warn!(error = %err, "export failed");
            self.error = Some(err.user_message());
        }
        result
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("frame", &self.frame)
            .field("has_background", &self.background.is_some())
            .field("overlay", &self.overlay)
            .field("preview_scale", &self.preview_scale)
            .field("generation", &self.generation)
            .field("status", &self.status)
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
