//! Owned 8-bit raster used as input and output of every resampler.
//!
//! Samples are stored row-major with interleaved channels, so the sample at
//! `(row, col, channel)` lives at `(row * width + col) * channels + channel`.

use crate::Error;

/// An owned image of `width * height` pixels with `channels` bytes each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: usize,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps existing samples.
    ///
    /// # Errors
    /// - If any dimension is zero or the sample count overflows `usize`
    /// - If `samples.len()` is not `width * height * channels`
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        samples: Vec<u8>,
    ) -> Result<Self, Error> {
        let expected = sample_count(width, height, channels)?;
        if samples.len() != expected {
            return Err(Error::SampleCountMismatch {
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Creates a buffer where every sample is `value`.
    ///
    /// # Errors
    /// Same as [`PixelBuffer::zeroed`].
    pub fn filled(width: usize, height: usize, channels: usize, value: u8) -> Result<Self, Error> {
        let mut buf = Self::zeroed(width, height, channels)?;
        if value != 0 {
            buf.samples.fill(value);
        }
        Ok(buf)
    }

    /// Creates a buffer by evaluating `f(row, col, channel)` for every sample.
    ///
    /// # Errors
    /// Same as [`PixelBuffer::zeroed`].
    pub fn from_fn<F>(width: usize, height: usize, channels: usize, mut f: F) -> Result<Self, Error>
    where
        F: FnMut(usize, usize, usize) -> u8,
    {
        let mut buf = Self::zeroed(width, height, channels)?;
        for (row, line) in buf.samples.chunks_exact_mut(width * channels).enumerate() {
            for (col, pixel) in line.chunks_exact_mut(channels).enumerate() {
                for (channel, sample) in pixel.iter_mut().enumerate() {
                    *sample = f(row, col, channel);
                }
            }
        }
        Ok(buf)
    }

    /// Allocates an all-zero buffer, reporting allocation failure instead of
    /// aborting the process.
    ///
    /// # Errors
    /// - [`Error::InvalidDimensions`] if any dimension is zero or the size overflows
    /// - [`Error::AllocationFailure`] if the samples cannot be allocated
    pub fn zeroed(width: usize, height: usize, channels: usize) -> Result<Self, Error> {
        let len = sample_count(width, height, channels)?;
        let mut samples = try_with_capacity(len)?;
        samples.resize(len, 0);

        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Returns the image width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of interleaved channels per pixel.
    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns `(width, height, channels)`.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.channels)
    }

    /// Total number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; a valid buffer holds at least one sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    #[must_use]
    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    /// Whether `other` has the same width, height and channel count.
    #[must_use]
    pub fn same_shape(&self, other: &PixelBuffer) -> bool {
        self.dimensions() == other.dimensions()
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        (row * self.width + col) * self.channels
    }

    /// Returns the sample at `(row, col, channel)`, or `None` outside the raster.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<u8> {
        if row >= self.height || col >= self.width || channel >= self.channels {
            return None;
        }
        self.samples.get(self.offset(row, col) + channel).copied()
    }

    /// Returns all channels of the pixel at `(row, col)`.
    #[inline]
    #[must_use]
    pub fn pixel(&self, row: usize, col: usize) -> Option<&[u8]> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let start = self.offset(row, col);
        self.samples.get(start..start + self.channels)
    }

    /// Mutable access to the pixel at `(row, col)`.
    #[inline]
    pub fn pixel_mut(&mut self, row: usize, col: usize) -> Option<&mut [u8]> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let start = self.offset(row, col);
        let channels = self.channels;
        self.samples.get_mut(start..start + channels)
    }

    /// Overwrites one sample.
    ///
    /// # Errors
    /// [`Error::OutOfBounds`] if the position is outside the raster.
    pub fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) -> Result<(), Error> {
        if channel >= self.channels {
            return Err(Error::OutOfBounds { row, col, channel });
        }
        let pixel = self
            .pixel_mut(row, col)
            .ok_or(Error::OutOfBounds { row, col, channel })?;
        pixel[channel] = value;
        Ok(())
    }
}

fn sample_count(width: usize, height: usize, channels: usize) -> Result<usize, Error> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions {
            width,
            height,
            reason: "width and height must be non-zero",
        });
    }
    if channels == 0 {
        return Err(Error::InvalidDimensions {
            width,
            height,
            reason: "channel count must be non-zero",
        });
    }
    width
        .checked_mul(height)
        .and_then(|px| px.checked_mul(channels))
        .ok_or(Error::InvalidDimensions {
            width,
            height,
            reason: "sample count overflows usize",
        })
}

/// Empty vector with room for exactly `len` elements, or
/// [`Error::AllocationFailure`] if the reservation is refused.
pub(crate) fn try_with_capacity<T>(len: usize) -> Result<Vec<T>, Error> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailure {
            bytes: len.saturating_mul(std::mem::size_of::<T>()),
        })?;
    Ok(v)
}
