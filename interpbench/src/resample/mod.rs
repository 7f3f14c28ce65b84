mod bilinear;
mod nearest;

use std::fmt;
use std::str::FromStr;

use crate::{Error, PixelBuffer};

pub use bilinear::{resize_bilinear, Bilinear};
pub use nearest::{resize_nearest, NearestNeighbor};

/// A reconstruction kernel that maps a source raster onto a new grid.
///
/// Implementations never alias their input: every call returns a freshly
/// allocated buffer with the source's channel count.
pub trait Resampler {
    /// Short human-readable name, used in reports.
    fn name(&self) -> &'static str;

    /// Resample `src` to `new_width` x `new_height`.
    ///
    /// # Errors
    /// - [`Error::InvalidDimensions`] if the target size is not supported by the kernel
    /// - [`Error::AllocationFailure`] if the output cannot be allocated
    fn resize(
        &self,
        src: &PixelBuffer,
        new_width: usize,
        new_height: usize,
    ) -> Result<PixelBuffer, Error>;
}

/// Runtime selection of a [`Resampler`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Kernel {
    Nearest,
    #[default]
    Bilinear,
}

impl Kernel {
    pub const ALL: [Kernel; 2] = [Kernel::Nearest, Kernel::Bilinear];

    #[must_use]
    pub fn resampler(self) -> &'static dyn Resampler {
        match self {
            Kernel::Nearest => &NearestNeighbor,
            Kernel::Bilinear => &Bilinear,
        }
    }

    /// Smallest target width/height the kernel accepts.
    #[must_use]
    pub fn min_target_dimension(self) -> usize {
        match self {
            Kernel::Nearest => 1,
            Kernel::Bilinear => 2,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Kernel::Nearest => "nearest",
            Kernel::Bilinear => "bilinear",
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kernel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" | "nn" | "nearest-neighbor" => Ok(Kernel::Nearest),
            "bilinear" | "linear" => Ok(Kernel::Bilinear),
            other => Err(format!(
                "unknown kernel '{other}', expected 'nearest' or 'bilinear'"
            )),
        }
    }
}
