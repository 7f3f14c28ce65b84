mod codec;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use interpbench::{HarnessConfig, Kernel, PixelBuffer, Report, Stopwatch};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compare nearest-neighbor and bilinear reconstruction of an image.
///
/// Without a subcommand, runs `compare` with its default file names.
#[derive(Parser, Debug)]
#[command(version, about)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    compare: CompareArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shrink the input, grow it back with both kernels and report MSE/PSNR and timing
    Compare(CompareArgs),
    /// Resize a single image with one kernel
    Resize(ResizeArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
struct CompareArgs {
    /// Source image
    #[arg(long, default_value = "input2.png")]
    input: PathBuf,
    /// Where to write the nearest-neighbor reconstruction
    #[arg(long, default_value = "output_nearest.png")]
    nearest_output: PathBuf,
    /// Where to write the bilinear reconstruction
    #[arg(long, default_value = "output_bilinear.png")]
    bilinear_output: PathBuf,
    /// Divide width and height by this factor to build the degraded reference
    #[arg(long, default_value_t = 2)]
    shrink_factor: usize,
}

#[derive(Args, Debug, Clone, PartialEq)]
struct ResizeArgs {
    /// Source image
    #[arg(long, default_value = "input2.png")]
    input: PathBuf,
    /// Resized image
    #[arg(long, default_value = "output2.png")]
    output: PathBuf,
    /// Target width in pixels (requires --height)
    #[arg(long, requires = "height", conflicts_with = "scale")]
    width: Option<usize>,
    /// Target height in pixels (requires --width)
    #[arg(long, requires = "width", conflicts_with = "scale")]
    height: Option<usize>,
    /// Scale factor applied to both dimensions
    #[arg(long, default_value_t = 2.0)]
    scale: f64,
    /// Reconstruction kernel: nearest or bilinear
    #[arg(long, default_value_t = Kernel::Bilinear)]
    kernel: Kernel,
}

impl ResizeArgs {
    fn target_size(&self, src: &PixelBuffer) -> Result<(usize, usize)> {
        if let (Some(width), Some(height)) = (self.width, self.height) {
            return Ok((width, height));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            bail!("scale must be a positive number, got {}", self.scale);
        }
        let scaled = |dim: usize| (dim as f64 * self.scale).round() as usize;
        Ok((scaled(src.width()), scaled(src.height())))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Some(Command::Compare(args)) => compare(&args),
        Some(Command::Resize(args)) => resize(&args),
        None => compare(&cli.compare),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn compare(args: &CompareArgs) -> Result<()> {
    let source = codec::load(&args.input)?;
    info!(path = %args.input.display(), "loaded source");

    let config = HarnessConfig::default().with_shrink_factor(args.shrink_factor);
    let run = interpbench::run(&source, &config)
        .with_context(|| format!("benchmark failed for {}", args.input.display()))?;
    drop(source);

    codec::save_all(&[
        (args.nearest_output.as_path(), &run.nearest),
        (args.bilinear_output.as_path(), &run.bilinear),
    ])?;

    println!("{}", Report::from_record(&run.record));
    println!();
    print_output("Nearest Neighbor", &args.nearest_output);
    print_output("Bilinear Interpolation", &args.bilinear_output);
    Ok(())
}

fn resize(args: &ResizeArgs) -> Result<()> {
    let source = codec::load(&args.input)?;
    let (width, height) = args.target_size(&source)?;

    let resampler = args.kernel.resampler();
    let (resized, timing) = Stopwatch::measure(|| resampler.resize(&source, width, height));
    let resized = resized.with_context(|| {
        format!(
            "{} resize of {} to {}x{} failed",
            args.kernel,
            args.input.display(),
            width,
            height
        )
    })?;

    codec::save(&args.output, &resized)?;

    println!(
        "Source image: {}x{} ({} channels)",
        source.width(),
        source.height(),
        source.channels()
    );
    println!(
        "{}: {}x{} in {:.6} seconds (CPU {:.6} seconds)",
        resampler.name(),
        width,
        height,
        timing.wall_seconds(),
        timing.cpu_seconds()
    );
    print_output("Result", &args.output);
    Ok(())
}

fn print_output(label: &str, path: &Path) {
    println!("{} output: {}", label, path.display());
}
