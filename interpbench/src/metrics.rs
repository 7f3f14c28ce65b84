//! Mean squared error and peak signal-to-noise ratio between 8-bit buffers.
//!
//! # Example
//!
//! ```
//! use interpbench::{MseReference, PixelBuffer};
//!
//! let original = PixelBuffer::filled(8, 8, 3, 200).unwrap();
//! let reference = MseReference::new(&original);
//!
//! let darker = PixelBuffer::filled(8, 8, 3, 190).unwrap();
//! let result = reference.compare(&darker).unwrap();
//! assert_eq!(result.mse, 100.0);
//! println!("{result}");
//! ```

use std::fmt;

use crate::{Error, PixelBuffer};

/// Largest representable sample value, the "peak" in PSNR.
pub const MAX_SAMPLE_VALUE: f64 = 255.0;

/// Mean squared per-sample difference between two equally-shaped buffers.
///
/// The sum is accumulated in `f64` so large images cannot overflow.
///
/// # Errors
/// [`Error::ShapeMismatch`] if width, height or channel count differ.
pub fn mse(a: &PixelBuffer, b: &PixelBuffer) -> Result<f64, Error> {
    if !a.same_shape(b) {
        return Err(Error::ShapeMismatch {
            left: a.dimensions(),
            right: b.dimensions(),
        });
    }

    let sum: f64 = a
        .samples()
        .iter()
        .zip(b.samples())
        .map(|(&x, &y)| {
            let diff = f64::from(x) - f64::from(y);
            diff * diff
        })
        .sum();

    Ok(sum / a.len() as f64)
}

/// PSNR in dB for a given MSE; `+inf` when the MSE is zero.
#[must_use]
pub fn psnr(mse: f64) -> f64 {
    if mse == 0.0 {
        return f64::INFINITY;
    }
    10.0 * ((MAX_SAMPLE_VALUE * MAX_SAMPLE_VALUE) / mse).log10()
}

/// MSE together with the PSNR derived from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricResult {
    pub mse: f64,
    /// `f64::INFINITY` iff `mse == 0`.
    pub psnr: f64,
}

impl MetricResult {
    #[must_use]
    pub fn from_mse(mse: f64) -> Self {
        Self {
            mse,
            psnr: psnr(mse),
        }
    }

    /// Scores `a` against `b`.
    ///
    /// # Errors
    /// [`Error::ShapeMismatch`] if the buffers differ in shape.
    pub fn between(a: &PixelBuffer, b: &PixelBuffer) -> Result<Self, Error> {
        mse(a, b).map(Self::from_mse)
    }

    /// Whether the two compared buffers were bit-identical.
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.mse == 0.0
    }
}

impl fmt::Display for MetricResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MSE {:.2}, PSNR {:.2} dB", self.mse, self.psnr)
    }
}

/// A fixed reference image that candidates are scored against.
///
/// Checks the candidate shape against the reference once per comparison and
/// keeps the reference borrowed, so scoring several reconstructions against
/// the same original does not copy it.
#[derive(Clone, Copy, Debug)]
pub struct MseReference<'a> {
    reference: &'a PixelBuffer,
}

impl<'a> MseReference<'a> {
    #[must_use]
    pub fn new(reference: &'a PixelBuffer) -> Self {
        Self { reference }
    }

    /// Score `candidate` against the reference.
    ///
    /// # Errors
    /// [`Error::ShapeMismatch`] if the candidate shape differs from the reference.
    pub fn compare(&self, candidate: &PixelBuffer) -> Result<MetricResult, Error> {
        MetricResult::between(candidate, self.reference)
    }

    #[must_use]
    pub fn reference(&self) -> &'a PixelBuffer {
        self.reference
    }
}
