use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use viewmark::config::{Config, LogFormat};
use viewmark::raster::{
    convert_to_format, encode_image_with_quality, load_image, Color, OutputFormat,
};
use viewmark::render::{render_to_image, StaticPicture};
use viewmark::watermark::{apply_watermark_with_quality, tile_grid};

/// Viewmark - render embedded pictures and tile watermarks onto images
#[derive(Parser, Debug)]
#[command(name = "viewmark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to an optional YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log output format (overrides the configuration file)
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tile a watermark across an image
    Watermark {
        /// Base image
        #[arg(short, long)]
        image: PathBuf,

        /// Watermark image
        #[arg(short, long)]
        watermark: PathBuf,

        /// Output format (default: from the output extension, then config)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Re-encode an image in another format
    Convert {
        #[arg(short, long)]
        image: PathBuf,

        #[arg(short, long)]
        format: Option<OutputFormat>,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render an image file as an embedded picture object
    Render {
        /// Picture to embed
        #[arg(short, long)]
        image: PathBuf,

        /// Destination width (default: from config)
        #[arg(long)]
        width: Option<u32>,

        /// Destination height (default: from config)
        #[arg(long)]
        height: Option<u32>,

        /// Background color as hex (default: from config)
        #[arg(long)]
        background: Option<Color>,

        #[arg(short, long)]
        format: Option<OutputFormat>,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the tile grid for a base and watermark size
    Tiles {
        /// Base size as WIDTHxHEIGHT
        #[arg(long, value_parser = parse_size)]
        base: (u32, u32),

        /// Watermark size as WIDTHxHEIGHT
        #[arg(long, value_parser = parse_size)]
        watermark: (u32, u32),
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogFormatArg {
    Json,
    Pretty,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Pretty => LogFormat::Pretty,
        }
    }
}

fn parse_size(s: &str) -> std::result::Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let w = w.trim().parse().map_err(|e| format!("bad width '{}': {}", w, e))?;
    let h = h.trim().parse().map_err(|e| format!("bad height '{}': {}", h, e))?;
    Ok((w, h))
}

fn output_format(explicit: Option<OutputFormat>, output: &Path, config: &Config) -> OutputFormat {
    explicit
        .or_else(|| OutputFormat::from_path(output))
        .unwrap_or(config.watermark.format)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write output to {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(format) = args.log_format {
        config.logging.format = format.into();
    }
    config.validate().context("Invalid configuration")?;

    viewmark::logging::init_subscriber(&config.logging)
        .context("Failed to initialize logging subsystem")?;

    match args.command {
        Command::Watermark {
            image,
            watermark,
            format,
            output,
        } => {
            let format = output_format(format, &output, &config);
            let base = load_image(&image)?;
            let mark = load_image(&watermark)?;
            let bytes =
                apply_watermark_with_quality(base, &mark, format, config.watermark.jpeg_quality)?;
            write_output(&output, &bytes)?;
            tracing::info!(
                image = %image.display(),
                watermark = %watermark.display(),
                output = %output.display(),
                format = %format,
                bytes = bytes.len(),
                "Watermark applied"
            );
        }
        Command::Convert {
            image,
            format,
            output,
        } => {
            let format = output_format(format, &output, &config);
            let bytes = convert_to_format(&image, format)?;
            write_output(&output, &bytes)?;
            tracing::info!(
                image = %image.display(),
                output = %output.display(),
                format = %format,
                bytes = bytes.len(),
                "Image converted"
            );
        }
        Command::Render {
            image,
            width,
            height,
            background,
            format,
            output,
        } => {
            let format = output_format(format, &output, &config);
            let background = match background {
                Some(color) => color,
                None => config.render.background_color()?,
            };
            let width = width.unwrap_or(config.render.width);
            let height = height.unwrap_or(config.render.height);

            let name = image.display().to_string();
            let picture = StaticPicture::new(load_image(&image)?).with_name(name);
            let rendered = render_to_image(&picture, width, height, background)?;
            let bytes =
                encode_image_with_quality(rendered, format, config.watermark.jpeg_quality)?;
            write_output(&output, &bytes)?;
            tracing::info!(
                image = %image.display(),
                output = %output.display(),
                width,
                height,
                format = %format,
                "Picture rendered"
            );
        }
        Command::Tiles { base, watermark } => {
            let grid = tile_grid(base.0, base.1, watermark.0, watermark.1);
            println!("{}", grid);
            for at in grid.positions() {
                println!("{},{}", at.x, at.y);
            }
        }
    }

    Ok(())
}
