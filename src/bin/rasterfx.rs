use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rasterfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Downscale (or rescale) an image to an exact size.
    Resample(ResampleArgs),
    /// Run a convolution kernel over an image.
    Filter(FilterArgs),
}

#[derive(Parser, Debug)]
struct ResampleArgs {
    /// Input image (any format the `image` crate decodes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Target width in pixels.
    #[arg(long)]
    width: u32,

    /// Target height in pixels.
    #[arg(long)]
    height: u32,

    /// Global opacity applied to the output alpha.
    #[arg(long, default_value_t = 1.0)]
    opacity: f32,

    /// Filter for the final resample step.
    #[arg(long, value_enum, default_value_t = FilterChoice::Bilinear)]
    filter: FilterChoice,
}

#[derive(Parser, Debug)]
struct FilterArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Built-in kernel, ignored when `--kernel` is given.
    #[arg(long, value_enum, default_value_t = PresetChoice::Sharpen)]
    preset: PresetChoice,

    /// JSON file with `{ "weights": [...], "mix": f }`.
    #[arg(long)]
    kernel: Option<PathBuf>,

    /// Override the blend factor.
    #[arg(long)]
    mix: Option<f32>,

    /// Convolve rows in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads when `--parallel` is set.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterChoice {
    Nearest,
    Bilinear,
    CatmullRom,
    Lanczos3,
}

impl From<FilterChoice> for rasterfx::ResampleFilter {
    fn from(c: FilterChoice) -> Self {
        match c {
            FilterChoice::Nearest => Self::Nearest,
            FilterChoice::Bilinear => Self::Bilinear,
            FilterChoice::CatmullRom => Self::CatmullRom,
            FilterChoice::Lanczos3 => Self::Lanczos3,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetChoice {
    Sharpen,
    Blur,
    Identity,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Resample(args) => cmd_resample(args),
        Command::Filter(args) => cmd_filter(args),
    }
}

fn read_image(path: &Path) -> anyhow::Result<rasterfx::RasterBuffer> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    Ok(rasterfx::decode_image(&bytes)?)
}

fn write_png(path: &Path, buffer: &rasterfx::RasterBuffer) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let bytes = rasterfx::encode_png(buffer)?;
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn read_filter_options(path: &Path) -> anyhow::Result<rasterfx::FilterOptions> {
    let f = File::open(path).with_context(|| format!("open kernel '{}'", path.display()))?;
    let opts = serde_json::from_reader(BufReader::new(f)).with_context(|| "parse kernel JSON")?;
    Ok(opts)
}

fn cmd_resample(args: ResampleArgs) -> anyhow::Result<()> {
    let src = read_image(&args.in_path)?;
    tracing::info!(
        src_width = src.width(),
        src_height = src.height(),
        levels = rasterfx::halving_steps(src.width(), src.height(), args.width, args.height),
        "resampling"
    );

    let request = rasterfx::ResampleRequest::new(Some(&src), args.width, args.height)
        .with_opacity(args.opacity);
    let out = rasterfx::Downsampler::with_filter(args.filter.into())
        .resample(&request)?
        .context("resample produced no output")?;

    write_png(&args.out, &out)
}

fn cmd_filter(args: FilterArgs) -> anyhow::Result<()> {
    let src = read_image(&args.in_path)?;

    let mut kernel = match (&args.kernel, args.preset) {
        (Some(path), _) => rasterfx::ConvolutionKernel::try_from(read_filter_options(path)?)?,
        (None, PresetChoice::Sharpen) => rasterfx::ConvolutionKernel::sharpen(1.0)?,
        (None, PresetChoice::Blur) => rasterfx::ConvolutionKernel::box_blur(1.0)?,
        (None, PresetChoice::Identity) => rasterfx::ConvolutionKernel::identity(),
    };
    if let Some(mix) = args.mix {
        kernel = kernel.with_mix(mix)?;
    }

    let filter = rasterfx::ConvolutionFilter::with_threading(rasterfx::FilterThreading {
        parallel: args.parallel,
        threads: args.threads,
    });
    let out = filter.apply(&src, &kernel)?;

    write_png(&args.out, &out)
}
