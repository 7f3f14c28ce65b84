//! Nearest-neighbor vs. bilinear resampling, scored with MSE and PSNR.
//!
//! The crate shrinks a source image with the bilinear kernel, reconstructs it
//! back to full size with both kernels and reports how far each
//! reconstruction is from the original, together with how long it took.
//!
//! # Example
//!
//! ```
//! use interpbench::{run, HarnessConfig, PixelBuffer, Report};
//!
//! let source = PixelBuffer::from_fn(64, 48, 3, |row, col, ch| {
//!     ((row * 3 + col * 5 + ch * 40) % 256) as u8
//! })
//! .unwrap();
//!
//! let run = run(&source, &HarnessConfig::default()).unwrap();
//! let report = Report::from_record(&run.record);
//! println!("{report}");
//! ```

mod buffer;
mod harness;
mod metrics;
mod resample;
mod timing;

use thiserror::Error;

pub use buffer::PixelBuffer;
pub use harness::{run, BenchmarkRecord, BenchmarkRun, HarnessConfig, KernelRecord, Report};
pub use metrics::{mse, psnr, MetricResult, MseReference, MAX_SAMPLE_VALUE};
pub use resample::{resize_bilinear, resize_nearest, Bilinear, Kernel, NearestNeighbor, Resampler};
pub use timing::{Stopwatch, Timing};

/// Errors that can occur while resampling or scoring images.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Failed to allocate {bytes} bytes for output buffer")]
    AllocationFailure { bytes: usize },

    #[error("Invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        reason: &'static str,
    },

    #[error(
        "Buffers must have the same shape: {}x{}x{} vs {}x{}x{}",
        .left.0, .left.1, .left.2, .right.0, .right.1, .right.2
    )]
    ShapeMismatch {
        left: (usize, usize, usize),
        right: (usize, usize, usize),
    },

    #[error("Sample count mismatch: expected {expected}, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    #[error("Sample ({row}, {col}, {channel}) is outside the buffer")]
    OutOfBounds {
        row: usize,
        col: usize,
        channel: usize,
    },

    #[error("Invalid harness configuration: {0}")]
    InvalidConfig(&'static str),
}

impl Error {
    /// Whether the error belongs to the recoverable dimension class: a bad
    /// target size or two buffers that cannot be compared.
    #[must_use]
    pub fn is_invalid_dimensions(&self) -> bool {
        matches!(
            self,
            Error::InvalidDimensions { .. } | Error::ShapeMismatch { .. }
        )
    }
}
