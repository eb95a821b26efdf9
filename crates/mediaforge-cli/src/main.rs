//! Mediaforge CLI - convert and watermark media files.
//!
//! Set RUST_LOG to control log output. The converter binary for document
//! formats is discovered automatically or via MEDIAFORGE_SOFFICE_PATH.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mediaforge_cli::init_tracing;
use mediaforge_core::ConverterConfig;
use mediaforge_processing::{
    apply_watermark_batch, BatchInput, ConversionOptions, FileConverter, Watermarker,
    WatermarkPosition, WatermarkSpec,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediaforge", about = "Media conversion and watermarking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a file to another format
    Convert {
        /// Input file
        input: PathBuf,
        /// Target format (e.g. webp, pdf, txt)
        format: String,
        #[command(flatten)]
        options: ConvertFlags,
    },
    /// Convert many files, reading a JSON manifest of inputs
    Batch {
        /// JSON manifest: [{"path": "...", "format": "...", "options": {...}}, ...]
        manifest: PathBuf,
        /// Default target format for items without one
        #[arg(long)]
        format: String,
        #[command(flatten)]
        options: ConvertFlags,
    },
    /// Apply a watermark to an image
    Watermark {
        /// Input image
        input: PathBuf,
        #[command(flatten)]
        mark: WatermarkFlags,
    },
    /// Apply the same watermark to many images
    WatermarkBatch {
        /// Input images
        inputs: Vec<PathBuf>,
        #[command(flatten)]
        mark: WatermarkFlags,
    },
    /// Extract plain text from a document
    ExtractText {
        /// Input document
        input: PathBuf,
    },
}

#[derive(Args)]
struct ConvertFlags {
    /// Quality for lossy codecs (1-100, default 80)
    #[arg(long)]
    quality: Option<u8>,
    /// Output width in pixels
    #[arg(long)]
    width: Option<u32>,
    /// Output height in pixels
    #[arg(long)]
    height: Option<u32>,
    /// Rasterization DPI for vector sources (default 96)
    #[arg(long)]
    density: Option<u32>,
}

impl ConvertFlags {
    fn into_options(self) -> ConversionOptions {
        ConversionOptions {
            quality: self.quality,
            width: self.width,
            height: self.height,
            density: self.density,
        }
    }
}

#[derive(Args)]
struct WatermarkFlags {
    /// Watermark text (text mark)
    #[arg(long, conflicts_with = "image")]
    text: Option<String>,
    /// Watermark image path (image mark)
    #[arg(long)]
    image: Option<PathBuf>,
    /// center, top-left, top-right, bottom-left, bottom-right, or tile
    #[arg(long, default_value = "center")]
    position: String,
    /// Opacity in [0, 1] (default 0.5)
    #[arg(long)]
    opacity: Option<f32>,
    /// Rotation in degrees (default 0)
    #[arg(long)]
    rotate: Option<f32>,
    /// Image-mark width as a fraction of the base width (default 0.2)
    #[arg(long)]
    scale: Option<f32>,
    /// Text fill color (default #000000)
    #[arg(long)]
    color: Option<String>,
    /// Text font size in pixels (default 5% of the base width)
    #[arg(long)]
    font_size: Option<f32>,
}

impl WatermarkFlags {
    fn into_spec(self) -> anyhow::Result<WatermarkSpec> {
        let mut spec = match (self.text, self.image) {
            (Some(text), None) => WatermarkSpec::text(text),
            (None, Some(path)) => WatermarkSpec::image(path),
            _ => anyhow::bail!("pass exactly one of --text or --image"),
        };
        spec.position = WatermarkPosition::parse(&self.position)?;
        spec.opacity = self.opacity;
        spec.rotation_degrees = self.rotate;
        spec.scale = self.scale;
        spec.color = self.color;
        spec.font_size = self.font_size;
        Ok(spec)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = ConverterConfig::from_env();

    match cli.command {
        Commands::Convert {
            input,
            format,
            options,
        } => {
            let converter = FileConverter::new(config);
            let output = converter
                .convert(&input, &format, &options.into_options())
                .await?;
            println!("{}", output.display());
        }
        Commands::Batch {
            manifest,
            format,
            options,
        } => {
            let data = std::fs::read_to_string(&manifest)
                .with_context(|| format!("reading manifest {}", manifest.display()))?;
            let inputs: Vec<BatchInput> =
                serde_json::from_str(&data).context("parsing batch manifest")?;
            let converter = FileConverter::new(config);
            let results = converter
                .convert_batch(&inputs, &format, &options.into_options())
                .await;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Watermark { input, mark } => {
            let spec = mark.into_spec()?;
            let output = Watermarker::apply(&input, &spec)?;
            println!("{}", output.display());
        }
        Commands::WatermarkBatch { inputs, mark } => {
            let spec = mark.into_spec()?;
            let results = apply_watermark_batch(&inputs, &spec);
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::ExtractText { input } => {
            let converter = FileConverter::new(config);
            let text = converter.extract_text(&input).await?;
            print!("{text}");
        }
    }

    Ok(())
}
