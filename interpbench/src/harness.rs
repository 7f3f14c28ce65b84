//! Shrink, reconstruct, score: the nearest-neighbor vs. bilinear experiment.
//!
//! [`run`] degrades the source with a bilinear shrink, grows the result back
//! to the original size with each kernel, times both reconstructions and
//! scores them against the original and against each other. [`Report`] turns
//! the collected [`BenchmarkRecord`] into the comparative summary without
//! touching any pixel data.

use std::fmt;

use tracing::{debug, info};

use crate::metrics::{MetricResult, MseReference};
use crate::resample::{resize_bilinear, Kernel};
use crate::timing::{Stopwatch, Timing};
use crate::{Error, PixelBuffer};

/// Harness settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    /// The source is shrunk to `width / shrink_factor` x `height / shrink_factor`
    /// before reconstruction.
    pub shrink_factor: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self { shrink_factor: 2 }
    }
}

impl HarnessConfig {
    #[must_use]
    pub fn with_shrink_factor(mut self, shrink_factor: usize) -> Self {
        self.shrink_factor = shrink_factor;
        self
    }

    /// # Errors
    /// [`Error::InvalidConfig`] if the shrink factor is zero.
    pub fn validate(&self) -> Result<(), Error> {
        if self.shrink_factor == 0 {
            return Err(Error::InvalidConfig("shrink factor must be non-zero"));
        }
        Ok(())
    }
}

/// Timing and quality of one kernel's reconstruction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelRecord {
    pub kernel: Kernel,
    pub wall_time_seconds: f64,
    pub cpu_time_seconds: f64,
    pub vs_original: MetricResult,
}

impl KernelRecord {
    fn new(kernel: Kernel, timing: Timing, vs_original: MetricResult) -> Self {
        Self {
            kernel,
            wall_time_seconds: timing.wall_seconds(),
            cpu_time_seconds: timing.cpu_seconds(),
            vs_original,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kernel.resampler().name()
    }
}

/// Everything measured in one harness run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchmarkRecord {
    /// `(width, height, channels)` of the original.
    pub source: (usize, usize, usize),
    /// `(width, height)` of the degraded intermediate.
    pub shrunk: (usize, usize),
    pub nearest: KernelRecord,
    pub bilinear: KernelRecord,
    /// The two reconstructions scored against each other.
    pub cross: MetricResult,
}

/// Result of [`run`]: the record plus both reconstructions, so a caller can
/// persist them once the whole run has succeeded.
#[derive(Clone, Debug)]
pub struct BenchmarkRun {
    pub record: BenchmarkRecord,
    pub nearest: PixelBuffer,
    pub bilinear: PixelBuffer,
}

/// Runs the experiment on `source`.
///
/// # Errors
/// - [`Error::InvalidConfig`] if `config` is invalid
/// - [`Error::InvalidDimensions`] if the shrunk size would be below 2x2
/// - [`Error::AllocationFailure`] if any intermediate cannot be allocated
///
/// Nothing is returned unless every stage succeeds.
pub fn run(source: &PixelBuffer, config: &HarnessConfig) -> Result<BenchmarkRun, Error> {
    config.validate()?;

    let (width, height, channels) = source.dimensions();
    let small_w = width / config.shrink_factor;
    let small_h = height / config.shrink_factor;
    info!(width, height, channels, small_w, small_h, "shrinking source");

    let small = resize_bilinear(source, small_w, small_h)?;

    let (nearest, nearest_timing) = reconstruct(Kernel::Nearest, &small, width, height)?;
    let (bilinear, bilinear_timing) = reconstruct(Kernel::Bilinear, &small, width, height)?;
    drop(small);

    let reference = MseReference::new(source);
    let nearest_score = reference.compare(&nearest)?;
    let bilinear_score = reference.compare(&bilinear)?;
    let cross = MetricResult::between(&nearest, &bilinear)?;
    info!(
        nearest_mse = nearest_score.mse,
        bilinear_mse = bilinear_score.mse,
        cross_mse = cross.mse,
        "scored reconstructions"
    );

    Ok(BenchmarkRun {
        record: BenchmarkRecord {
            source: (width, height, channels),
            shrunk: (small_w, small_h),
            nearest: KernelRecord::new(Kernel::Nearest, nearest_timing, nearest_score),
            bilinear: KernelRecord::new(Kernel::Bilinear, bilinear_timing, bilinear_score),
            cross,
        },
        nearest,
        bilinear,
    })
}

fn reconstruct(
    kernel: Kernel,
    small: &PixelBuffer,
    width: usize,
    height: usize,
) -> Result<(PixelBuffer, Timing), Error> {
    let resampler = kernel.resampler();
    let (out, timing) = Stopwatch::measure(|| resampler.resize(small, width, height));
    let out = out?;
    debug!(
        kernel = resampler.name(),
        wall = timing.wall_seconds(),
        cpu = timing.cpu_seconds(),
        "reconstructed"
    );
    Ok((out, timing))
}

/// Comparative summary derived from a [`BenchmarkRecord`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Report {
    pub record: BenchmarkRecord,
    /// Bilinear wall time over nearest-neighbor wall time: how many times
    /// faster nearest-neighbor ran.
    pub speedup: f64,
    /// How much lower the bilinear MSE is, as a percentage of the
    /// nearest-neighbor MSE.
    pub mse_improvement_percent: f64,
    /// Bilinear PSNR minus nearest-neighbor PSNR.
    pub psnr_gain_db: f64,
}

impl Report {
    #[must_use]
    pub fn from_record(record: &BenchmarkRecord) -> Self {
        let nn = &record.nearest;
        let bi = &record.bilinear;

        let speedup = if nn.wall_time_seconds > 0.0 {
            bi.wall_time_seconds / nn.wall_time_seconds
        } else if bi.wall_time_seconds > 0.0 {
            f64::INFINITY
        } else {
            1.0
        };

        let nn_mse = nn.vs_original.mse;
        let mse_improvement_percent = if nn_mse > 0.0 {
            (nn_mse - bi.vs_original.mse) / nn_mse * 100.0
        } else {
            0.0
        };

        // inf - inf when both reconstructions are exact
        let psnr_gain_db = match bi.vs_original.psnr - nn.vs_original.psnr {
            gain if gain.is_nan() => 0.0,
            gain => gain,
        };

        Self {
            record: *record,
            speedup,
            mse_improvement_percent,
            psnr_gain_db,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.record;
        let (width, height, channels) = r.source;

        writeln!(f, "Source image: {}x{} ({} channels)", width, height, channels)?;
        writeln!(f, "Shrunk reference: {}x{}", r.shrunk.0, r.shrunk.1)?;
        writeln!(f)?;

        for k in [&r.nearest, &r.bilinear] {
            writeln!(f, "=== {} ===", k.name())?;
            writeln!(f, "Wall Time: {:.6} seconds", k.wall_time_seconds)?;
            writeln!(f, "CPU Time: {:.6} seconds", k.cpu_time_seconds)?;
            writeln!(f, "MSE vs Original: {:.2}", k.vs_original.mse)?;
            writeln!(f, "PSNR: {:.2} dB", k.vs_original.psnr)?;
            writeln!(f)?;
        }

        writeln!(f, "=== Mean Squared Error (MSE) ===")?;
        writeln!(
            f,
            "MSE between {} and {}: {:.2}",
            r.nearest.name(),
            r.bilinear.name(),
            r.cross.mse
        )?;
        writeln!(f, "PSNR: {:.2} dB", r.cross.psnr)?;
        writeln!(f)?;

        writeln!(f, "=== Comparison ===")?;
        writeln!(f, "Speed:")?;
        writeln!(f, "  {} is faster: {:.2}x", r.nearest.name(), self.speedup)?;
        writeln!(f)?;
        writeln!(f, "Quality vs Original:")?;
        writeln!(f, "  {}:", r.nearest.name())?;
        writeln!(f, "    - MSE: {:.2}", r.nearest.vs_original.mse)?;
        writeln!(f, "    - PSNR: {:.2} dB", r.nearest.vs_original.psnr)?;
        writeln!(f, "  {}:", r.bilinear.name())?;
        writeln!(
            f,
            "    - MSE: {:.2} ({:.2}% better)",
            r.bilinear.vs_original.mse, self.mse_improvement_percent
        )?;
        writeln!(
            f,
            "    - PSNR: {:.2} dB ({:.2} dB higher)",
            r.bilinear.vs_original.psnr, self.psnr_gain_db
        )?;
        writeln!(f)?;
        writeln!(f, "Conclusion:")?;
        writeln!(f, "  - {}: faster, jagged result", r.nearest.name())?;
        write!(f, "  - {}: slower, smoother and more accurate result", r.bilinear.name())
    }
}
