//! Palette-driven spirograph renderer.
//!
//! Draws a hypotrochoid as a long run of short segments, colors segment `i`
//! from the chosen palette and exports the result:
//! - PNG, JPEG or PDF output
//! - Step, linear or sigmoid palette interpolation
//! - Optional progress frames written in the background
//! - Optional app icon built from the final image

mod config;
mod spiro;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use render_common::{Color, RenderError};
use renderer::{
    Canvas, ColorCalculator, FileWriter, Image, ImageRenderer, Interpolation, MultiImageRenderer,
    Rect, RenderFormat, Size, DEFAULT_EXPORT_NAME, DEFAULT_SIGMOID_SATURATION,
};
use serde::Serialize;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use spiro::Hypotrochoid;

/// Subdirectory of the user's documents used when no output dir is given.
const OUTPUT_SUBDIR: &str = "palette-render";

#[derive(Parser, Debug)]
#[command(name = "palette-render")]
#[command(about = "Render palette-colored spirographs to PNG, JPEG or PDF")]
struct Args {
    /// Palette file (JSON or YAML); built-in palettes are used without one
    #[arg(long, env = "PALETTE_FILE")]
    palettes: Option<PathBuf>,

    /// Palette name (case-insensitive)
    #[arg(long, env = "PALETTE_NAME", default_value = config::DEFAULT_PALETTE)]
    palette: String,

    /// Palette interpolation: step, linear or sigmoid
    #[arg(long, default_value = "linear")]
    interpolation: Interpolation,

    /// Saturation bound of the sigmoid blend
    #[arg(long, default_value_t = DEFAULT_SIGMOID_SATURATION)]
    saturation: f64,

    /// Number of segments drawn (the palette's iteration budget)
    #[arg(long, default_value = "5000")]
    iterations: usize,

    /// Output width in pixels (points for PDF)
    #[arg(long, default_value = "1024")]
    width: u32,

    /// Output height in pixels (points for PDF)
    #[arg(long, default_value = "1024")]
    height: u32,

    /// Output format: png, jpg or pdf
    #[arg(long, default_value = "png")]
    format: RenderFormat,

    /// Background color as #RRGGBB or #RRGGBBAA
    #[arg(long, default_value = "#ffffff")]
    background: Color,

    /// Stroke width of every segment
    #[arg(long, default_value = "2.0")]
    line_width: f64,

    /// Radius of the fixed circle
    #[arg(long, default_value = "5")]
    outer: u32,

    /// Radius of the rolling circle
    #[arg(long, default_value = "3")]
    inner: u32,

    /// Distance of the pen from the rolling circle's center
    #[arg(long, default_value = "5.0")]
    offset: f64,

    /// Image drawn under the curve, stretched to the output size
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Output directory (default: <Documents>/palette-render)
    #[arg(long, env = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Output file name without extension
    #[arg(long)]
    name: Option<String>,

    /// Write this many progress frames while drawing (raster formats only)
    #[arg(long, default_value = "1")]
    frames: usize,

    /// Also export a 1024x1024 app icon of the result
    #[arg(long)]
    app_icon: bool,

    /// Print a JSON summary to stdout
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

/// What was rendered and where it went.
#[derive(Debug, Serialize)]
struct RenderSummary {
    palette: String,
    interpolation: Interpolation,
    format: RenderFormat,
    width: u32,
    height: u32,
    iterations: usize,
    frames: usize,
    output: PathBuf,
    bytes: usize,
    icon: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    info!(
        palette = %args.palette,
        interpolation = ?args.interpolation,
        format = %args.format,
        "Starting palette render"
    );

    let summary = run(&args).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!(
            output = %summary.output.display(),
            bytes = summary.bytes,
            frames = summary.frames,
            "Render complete"
        );
    }

    Ok(())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

async fn run(args: &Args) -> Result<RenderSummary> {
    let palette = config::load_palette(args.palettes.as_deref(), &args.palette)?;
    let calc = ColorCalculator::from_palette(&palette, args.iterations, args.interpolation)
        .with_saturation(args.saturation);
    debug!(
        colors = palette.len(),
        steps_per_segment = calc.steps_per_segment(),
        "Palette ready"
    );

    let curve = Hypotrochoid::new(args.outer, args.inner, args.offset)?;
    let size = Size::new(args.width, args.height);
    let points = curve.points(args.iterations, size);

    let writer = match &args.output_dir {
        Some(dir) => FileWriter::with_base(dir, None),
        None => FileWriter::documents(Some(OUTPUT_SUBDIR)),
    }
    .context("Failed to prepare output directory")?;

    let seed = args.seed.as_deref().map(load_seed).transpose()?;
    let stem = args.name.as_deref().unwrap_or(DEFAULT_EXPORT_NAME);

    let frames = if args.frames > 1 && args.format == RenderFormat::Pdf {
        warn!("Progress frames need a raster format; rendering a single PDF page");
        1
    } else {
        args.frames.max(1)
    };

    let data = if frames > 1 {
        render_frames(args, &writer, stem, frames, seed.as_ref(), |canvas, range| {
            spiro::draw_segments(canvas, &points, &calc, range, args.line_width)
        })
        .await?
    } else {
        ImageRenderer::new()
            .with_background(args.background)
            .data(args.format, size, |canvas| {
                if let Some(seed) = &seed {
                    canvas.draw_image(seed, Rect::from_size(size));
                }
                spiro::draw_segments(canvas, &points, &calc, 0..args.iterations, args.line_width);
            })
            .ok_or_else(|| anyhow!("Failed to render {}x{} {}", size.width, size.height, args.format))?
    };

    let output = writer.export_format(args.format, Some(stem), Some(data.as_slice()));

    let icon = if args.app_icon {
        export_app_icon(&writer, stem, &data)
    } else {
        None
    };

    Ok(RenderSummary {
        palette: palette.name().to_string(),
        interpolation: args.interpolation,
        format: args.format,
        width: size.width,
        height: size.height,
        iterations: args.iterations,
        frames,
        output,
        bytes: data.len(),
        icon,
    })
}

/// Draw in `frames` passes on one surface, writing each intermediate state
/// in the background. Returns the encoded final state.
async fn render_frames<F>(
    args: &Args,
    writer: &FileWriter,
    stem: &str,
    frames: usize,
    seed: Option<&Image>,
    mut draw: F,
) -> Result<Vec<u8>>
where
    F: FnMut(&mut dyn Canvas, std::ops::Range<usize>),
{
    let size = Size::new(args.width, args.height);
    let mut multi = MultiImageRenderer::new(size, Some(args.background), 1.0, seed).ok_or(
        RenderError::SurfaceAllocation {
            width: size.width,
            height: size.height,
        },
    )?;

    let per_frame = args.iterations.div_ceil(frames).max(1);
    let mut pending = Vec::with_capacity(frames);

    for frame in 0..frames {
        let start = (frame * per_frame).min(args.iterations);
        let end = ((frame + 1) * per_frame).min(args.iterations);
        multi.raster(|canvas| draw(canvas, start..end));

        let path = writer.file_path(
            args.format.extension(),
            Some(&format!("{}-{:03}", stem, frame)),
        );
        pending.push(FileWriter::async_write(
            path,
            multi.data(args.format),
            move || debug!(frame, "Progress frame written"),
        ));
    }

    for handle in pending {
        handle.await.context("Frame writer task failed")?;
    }

    multi
        .data(args.format)
        .ok_or_else(|| anyhow!("Failed to encode final {} frame", args.format))
}

fn load_seed(path: &Path) -> Result<Image> {
    ImageRenderer::decode_file(path)
        .into_iter()
        .next()
        .ok_or_else(|| RenderError::Decode(format!("no image in {}", path.display())))
        .context("Failed to load seed image")
}

fn export_app_icon(writer: &FileWriter, stem: &str, data: &[u8]) -> Option<PathBuf> {
    let Some(image) = ImageRenderer::decode(data).into_iter().next() else {
        warn!("Rendered output could not be decoded for the app icon");
        return None;
    };

    let icon = image.app_icon()?.data()?;
    let path = writer.export(
        RenderFormat::Png.extension(),
        Some(&format!("{}-icon", stem)),
        Some(icon.as_slice()),
    );
    Some(path)
}
