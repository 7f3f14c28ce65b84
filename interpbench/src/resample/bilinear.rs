use tracing::debug;

use super::Resampler;
use crate::buffer::try_with_capacity;
use crate::{Error, PixelBuffer};

/// Blends the four source pixels surrounding each fractional source position.
///
/// The scale ratio is edge-aligned, `(src - 1) / (new - 1)`, so the first and
/// last destination pixels of every row and column land exactly on the first
/// and last source pixels. The same routine is used for shrinking and growing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bilinear;

impl Resampler for Bilinear {
    fn name(&self) -> &'static str {
        "Bilinear Interpolation"
    }

    fn resize(
        &self,
        src: &PixelBuffer,
        new_width: usize,
        new_height: usize,
    ) -> Result<PixelBuffer, Error> {
        resize_bilinear(src, new_width, new_height)
    }
}

/// Corner indices and fractional offset along one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
struct AxisSample {
    lo: usize,
    hi: usize,
    frac: f64,
}

impl AxisSample {
    #[inline]
    fn new(index: usize, ratio: f64, len: usize) -> Self {
        let pos = index as f64 * ratio;
        let lo = (pos as usize).min(len - 1);
        // Clamp the second corner on the final row/column.
        let hi = if lo == len - 1 { lo } else { lo + 1 };
        Self {
            lo,
            hi,
            frac: pos - lo as f64,
        }
    }
}

/// Bilinear resize of `src` to `new_width` x `new_height`.
///
/// # Errors
/// - [`Error::InvalidDimensions`] if `new_width <= 1` or `new_height <= 1`;
///   the edge-aligned ratio divides by `new - 1`
/// - [`Error::AllocationFailure`] if the output cannot be allocated
pub fn resize_bilinear(
    src: &PixelBuffer,
    new_width: usize,
    new_height: usize,
) -> Result<PixelBuffer, Error> {
    if new_width <= 1 || new_height <= 1 {
        return Err(Error::InvalidDimensions {
            width: new_width,
            height: new_height,
            reason: "bilinear target must be at least 2x2",
        });
    }

    let (src_w, src_h, channels) = src.dimensions();
    let mut dst = PixelBuffer::zeroed(new_width, new_height, channels)?;

    let x_ratio = (src_w - 1) as f64 / (new_width - 1) as f64;
    let y_ratio = (src_h - 1) as f64 / (new_height - 1) as f64;
    debug!(src_w, src_h, new_width, new_height, x_ratio, y_ratio, "bilinear resize");

    let mut cols = try_with_capacity(new_width)?;
    cols.extend((0..new_width).map(|j| AxisSample::new(j, x_ratio, src_w)));

    let src_samples = src.samples();
    let src_stride = src_w * channels;
    for (i, dst_row) in dst
        .samples_mut()
        .chunks_exact_mut(new_width * channels)
        .enumerate()
    {
        let y = AxisSample::new(i, y_ratio, src_h);
        let top = &src_samples[y.lo * src_stride..(y.lo + 1) * src_stride];
        let bottom = &src_samples[y.hi * src_stride..(y.hi + 1) * src_stride];

        for (dst_px, x) in dst_row.chunks_exact_mut(channels).zip(&cols) {
            let (l, r) = (x.lo * channels, x.hi * channels);
            for (c, out) in dst_px.iter_mut().enumerate() {
                let value = interpolate(
                    x.frac,
                    y.frac,
                    f64::from(top[l + c]),
                    f64::from(top[r + c]),
                    f64::from(bottom[l + c]),
                    f64::from(bottom[r + c]),
                );
                *out = to_u8(value);
            }
        }
    }

    Ok(dst)
}

/// Interpolate along x on the top and bottom rows, then along y.
///
/// `q11`/`q21` are top-left/top-right, `q12`/`q22` bottom-left/bottom-right.
#[inline]
fn interpolate(dx: f64, dy: f64, q11: f64, q21: f64, q12: f64, q22: f64) -> f64 {
    let fx1 = q11 + (q21 - q11) * dx;
    let fx2 = q12 + (q22 - q12) * dx;
    fx1 + (fx2 - fx1) * dy
}

/// Clamp to `[0, 255]` first, then round half up by adding 0.5 and truncating.
/// Swapping the two steps changes results at saturation.
#[inline]
fn to_u8(value: f64) -> u8 {
    (value.clamp(0.0, 255.0) + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_degenerate_targets() {
        let src = PixelBuffer::filled(4, 4, 1, 100).unwrap();

        for (w, h) in [(1, 4), (4, 1), (0, 4), (1, 1)] {
            let err = resize_bilinear(&src, w, h).unwrap_err();
            assert!(
                matches!(err, Error::InvalidDimensions { width, height, .. } if width == w && height == h),
                "{w}x{h}: {err:?}"
            );
        }
    }

    #[test]
    fn test_ramp_downscale() {
        let src = PixelBuffer::new(4, 4, 1, [0, 10, 20, 30].repeat(4)).unwrap();

        let out = resize_bilinear(&src, 2, 2).unwrap();
        // x_ratio = 3: columns 0 and 3 are sampled exactly
        assert_eq!(out.samples(), &[0, 30, 0, 30]);
    }

    #[test]
    fn test_midpoint_blend_rounds_half_up() {
        let src = PixelBuffer::new(2, 2, 1, vec![0, 1, 0, 1]).unwrap();
        let out = resize_bilinear(&src, 3, 2).unwrap();

        // Middle column is exactly 0.5, which rounds up.
        assert_eq!(out.samples(), &[0, 1, 1, 0, 1, 1]);
    }

    #[test]
    fn test_corners_preserved_multichannel() {
        let src = PixelBuffer::from_fn(7, 5, 3, |row, col, ch| {
            ((row * 37 + col * 11 + ch * 71) % 256) as u8
        })
        .unwrap();

        for (w, h) in [(2, 2), (3, 9), (13, 4), (21, 15)] {
            let out = resize_bilinear(&src, w, h).unwrap();
            assert_eq!(out.dimensions(), (w, h, 3));
            assert_eq!(out.pixel(0, 0), src.pixel(0, 0));
            assert_eq!(out.pixel(h - 1, w - 1), src.pixel(4, 6));
            assert_eq!(out.pixel(0, w - 1), src.pixel(0, 6));
            assert_eq!(out.pixel(h - 1, 0), src.pixel(4, 0));
        }
    }

    #[test]
    fn test_single_column_source() {
        let src = PixelBuffer::new(1, 2, 1, vec![0, 200]).unwrap();
        let out = resize_bilinear(&src, 3, 3).unwrap();

        assert_eq!(out.samples(), &[0, 0, 0, 100, 100, 100, 200, 200, 200]);
    }

    #[test]
    fn test_axis_sample_clamps_last_index() {
        let last = AxisSample::new(3, 1.0, 4);
        assert_eq!(
            last,
            AxisSample {
                lo: 3,
                hi: 3,
                frac: 0.0
            }
        );

        let inner = AxisSample::new(1, 1.5, 4);
        assert_eq!(inner.lo, 1);
        assert_eq!(inner.hi, 2);
        assert!((inner.frac - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_to_u8_clamps_before_rounding() {
        assert_eq!(to_u8(-0.4), 0);
        assert_eq!(to_u8(255.3), 255);
        assert_eq!(to_u8(254.5), 255);
        assert_eq!(to_u8(254.49), 254);
        assert_eq!(to_u8(0.5), 1);
    }
}
