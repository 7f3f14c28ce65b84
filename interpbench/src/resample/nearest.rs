use tracing::debug;

use super::Resampler;
use crate::buffer::try_with_capacity;
use crate::{Error, PixelBuffer};

/// Copies the closest source pixel for every destination pixel.
///
/// The scale ratio is the plain `src / new` ratio, so destination pixel `j`
/// reads source column `floor(j * src_w / new_w)`. Unlike [`Bilinear`] the
/// grid is not edge-aligned: the last destination column generally does not
/// land on the last source column.
///
/// [`Bilinear`]: super::Bilinear
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestNeighbor;

impl Resampler for NearestNeighbor {
    fn name(&self) -> &'static str {
        "Nearest Neighbor"
    }

    fn resize(
        &self,
        src: &PixelBuffer,
        new_width: usize,
        new_height: usize,
    ) -> Result<PixelBuffer, Error> {
        resize_nearest(src, new_width, new_height)
    }
}

/// Nearest-neighbor resize of `src` to `new_width` x `new_height`.
///
/// # Errors
/// - [`Error::InvalidDimensions`] if either target dimension is zero
/// - [`Error::AllocationFailure`] if the output cannot be allocated
pub fn resize_nearest(
    src: &PixelBuffer,
    new_width: usize,
    new_height: usize,
) -> Result<PixelBuffer, Error> {
    let (src_w, src_h, channels) = src.dimensions();
    let mut dst = PixelBuffer::zeroed(new_width, new_height, channels)?;

    let x_ratio = src_w as f64 / new_width as f64;
    let y_ratio = src_h as f64 / new_height as f64;
    debug!(src_w, src_h, new_width, new_height, x_ratio, y_ratio, "nearest-neighbor resize");

    // Precompute the column mapping; it is identical for every row.
    let mut src_cols = try_with_capacity(new_width)?;
    src_cols.extend((0..new_width).map(|j| source_index(j, x_ratio, src_w)));

    let src_samples = src.samples();
    let src_stride = src_w * channels;
    for (i, dst_row) in dst
        .samples_mut()
        .chunks_exact_mut(new_width * channels)
        .enumerate()
    {
        let src_y = source_index(i, y_ratio, src_h);
        let src_row = &src_samples[src_y * src_stride..(src_y + 1) * src_stride];

        for (dst_px, &src_x) in dst_row.chunks_exact_mut(channels).zip(&src_cols) {
            let start = src_x * channels;
            dst_px.copy_from_slice(&src_row[start..start + channels]);
        }
    }

    Ok(dst)
}

/// `floor(index * ratio)`, bounded to the last valid source index.
///
/// Algebraically the product is always below `len`, the bound only guards
/// against floating-point error.
#[inline]
fn source_index(index: usize, ratio: f64, len: usize) -> usize {
    ((index as f64 * ratio) as usize).min(len - 1)
}
