use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "thumbkit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the video id and thumbnail URL for a YouTube link.
    VideoId {
        url: String,
    },
    /// Compose a 1280x720 thumbnail and write it to a directory.
    Export(ExportArgs),
    /// Write a scaled PNG preview of the composed thumbnail.
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Local image file (raster or SVG).
    #[arg(long)]
    upload: Option<PathBuf>,

    /// YouTube video URL whose thumbnail becomes the background.
    #[arg(long)]
    youtube: Option<String>,
}

#[derive(Args, Debug)]
struct ComposeArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Text overlay configuration JSON.
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Overlay text; replaces the text from `--overlay`.
    #[arg(long)]
    text: Option<String>,

    /// Application config JSON (render, export, fonts, logging).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print which font face each overlay family resolves to.
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    compose: ComposeArgs,

    /// Output format; defaults to the config value (jpeg).
    #[arg(long)]
    format: Option<thumbkit::ExportFormat>,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    compose: ComposeArgs,

    /// Display scale in (0, 1].
    #[arg(long, default_value_t = 0.5)]
    scale: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::VideoId { url } => cmd_video_id(&url),
        Command::Export(args) => cmd_export(args).await,
        Command::Preview(args) => cmd_preview(args).await,
    }
}

fn cmd_video_id(url: &str) -> anyhow::Result<()> {
    let id = thumbkit::extract_video_id(url).context("Enter a valid YouTube URL.")?;
    println!("{id}");
    println!("{}", thumbkit::thumbnail_url(&id)?);
    Ok(())
}

async fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.compose.config.as_deref())?;
    if let Some(format) = args.format {
        config.export.format = format;
    }
    let mut session = compose(&args.compose, &config).await?;

    let file = session.export().map_err(user_facing)?;
    let path = file.write_to_dir(&args.out)?;
    eprintln!("wrote {} ({}x{})", path.display(), file.width, file.height);
    Ok(())
}

async fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let config = load_config(args.compose.config.as_deref())?;
    let mut session = compose(&args.compose, &config).await?;
    session.set_preview_scale(args.scale)?;

    let frame = session.render_preview()?;
    let settings = thumbkit::ExportSettings {
        format: thumbkit::ExportFormat::Png,
        ..thumbkit::ExportSettings::default()
    };
    let file = thumbkit::encode_frame(&frame, &settings)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    file.write_to(&args.out)?;
    eprintln!("wrote {} ({}x{})", args.out.display(), frame.width, frame.height);
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<thumbkit::AppConfig> {
    let config = match path {
        Some(path) => thumbkit::AppConfig::from_path(path)?,
        None => thumbkit::AppConfig::default(),
    };
    thumbkit::init_logging(&config.logging);
    Ok(config)
}

/// Build a session with the requested background and overlay applied.
async fn compose(
    args: &ComposeArgs,
    config: &thumbkit::AppConfig,
) -> anyhow::Result<thumbkit::Session> {
    let mut overlay = match &args.overlay {
        Some(path) => thumbkit::TextOverlay::from_path(path)?,
        None => thumbkit::TextOverlay::default(),
    };
    if let Some(text) = &args.text {
        overlay.text = text.clone();
    }

    let mut fonts = thumbkit::FontBook::from_settings(&config.fonts);
    if args.dump_fonts {
        dump_font_diagnostics(&mut fonts);
    }

    let mut session = thumbkit::Session::with_settings(
        fonts,
        config.render.clone(),
        config.export.clone(),
    );
    session.set_overlay(overlay)?;

    let source = match resolve_source(&args.source) {
        Ok(source) => source,
        Err(err) => {
            session.reject_input(&err);
            return Err(user_facing(err));
        }
    };

    let loader = thumbkit::ImageLoader::default();
    let ticket = session.begin_load(&source);
    eprintln!("{}", session.status());
    let result = loader.load(&source).await;
    match session.finish_load(ticket, result) {
        thumbkit::LoadOutcome::Applied => {
            eprintln!("{}", session.status());
            Ok(session)
        }
        thumbkit::LoadOutcome::Failed(message) => anyhow::bail!(message),
        thumbkit::LoadOutcome::Superseded => anyhow::bail!("load was superseded (bug)"),
    }
}

fn resolve_source(args: &SourceArgs) -> thumbkit::ThumbkitResult<thumbkit::ImageSource> {
    match (&args.upload, &args.youtube) {
        (Some(path), _) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read upload '{}'", path.display()))?;
            thumbkit::resolve_upload(Some(bytes))
        }
        (None, Some(url)) => thumbkit::resolve_video_url(url),
        (None, None) => thumbkit::resolve_upload(None),
    }
}

fn user_facing(err: thumbkit::ThumbkitError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

fn dump_font_diagnostics(fonts: &mut thumbkit::FontBook) {
    eprintln!("font diagnostics ({} faces):", fonts.face_count());
    for family in thumbkit::FontFamily::ALL {
        match fonts.resolve(family) {
            Ok(face) => eprintln!(
                "- {} -> '{}' (index {}, {} bytes)",
                family.family_name(),
                face.resolved_name,
                face.index,
                face.bytes.len()
            ),
            Err(err) => eprintln!("- {} -> unavailable: {err}", family.family_name()),
        }
    }
}
