//! File I/O for [`PixelBuffer`]s via the `image` crate.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{DynamicImage, ExtendedColorType, ImageReader};
use interpbench::PixelBuffer;
use tracing::{debug, warn};

/// Decodes `path`, keeping its native channel count for 8-bit gray, gray+alpha,
/// RGB and RGBA images. Deeper images are converted to the 8-bit type with the
/// same channels.
pub fn load(path: &Path) -> Result<PixelBuffer> {
    let img = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .with_context(|| format!("failed to read {}", path.display()))?
        .decode()
        .with_context(|| format!("failed to decode {}", path.display()))?;

    let (width, height) = (img.width() as usize, img.height() as usize);
    let (channels, samples) = match img {
        DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
        other => {
            let color = other.color();
            debug!(?color, "converting to 8 bits per channel");
            match (color.has_color(), color.has_alpha()) {
                (false, false) => (1, other.to_luma8().into_raw()),
                (false, true) => (2, other.to_luma_alpha8().into_raw()),
                (true, false) => (3, other.to_rgb8().into_raw()),
                (true, true) => (4, other.to_rgba8().into_raw()),
            }
        }
    };

    PixelBuffer::new(width, height, channels, samples)
        .with_context(|| format!("failed to decode {}", path.display()))
}

/// Encodes `buf` to `path`; the format follows the file extension.
///
/// A file the encoder created before failing is removed again.
pub fn save(path: &Path, buf: &PixelBuffer) -> Result<()> {
    let color = match buf.channels() {
        1 => ExtendedColorType::L8,
        2 => ExtendedColorType::La8,
        3 => ExtendedColorType::Rgb8,
        4 => ExtendedColorType::Rgba8,
        n => bail!(
            "failed to encode {}: unsupported channel count {}",
            path.display(),
            n
        ),
    };
    let width = u32::try_from(buf.width())
        .with_context(|| format!("failed to encode {}: width too large", path.display()))?;
    let height = u32::try_from(buf.height())
        .with_context(|| format!("failed to encode {}: height too large", path.display()))?;

    let result = image::save_buffer(path, buf.samples(), width, height, color)
        .with_context(|| format!("failed to encode {}", path.display()));
    if result.is_err() {
        remove_output(path);
    }
    result
}

fn remove_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed partial output"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!(path = %path.display(), error = %err, "could not remove partial output"),
    }
}

/// Saves every output in order. If one fails, the files already written by
/// this call are removed so no output is left behind for a failed run.
pub fn save_all(outputs: &[(&Path, &PixelBuffer)]) -> Result<()> {
    for (idx, (path, buf)) in outputs.iter().enumerate() {
        if let Err(err) = save(path, buf) {
            for (written, _) in &outputs[..idx] {
                remove_output(written);
            }
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("interpbench-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_png_roundtrip_keeps_channels() {
        for channels in 1..=4 {
            let buf = PixelBuffer::from_fn(5, 3, channels, |row, col, ch| {
                (row * 50 + col * 10 + ch) as u8
            })
            .unwrap();
            let path = temp_path(&format!("roundtrip-{channels}.png"));

            save(&path, &buf).unwrap();
            let loaded = load(&path).unwrap();
            fs::remove_file(&path).unwrap();

            assert_eq!(loaded, buf);
        }
    }

    #[test]
    fn test_missing_file_names_path() {
        let path = temp_path("does-not-exist.png");
        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("does-not-exist.png"));
    }

    #[test]
    fn test_failed_save_removes_earlier_outputs() {
        let buf = PixelBuffer::filled(4, 4, 3, 128).unwrap();
        let first = temp_path("partial-first.png");
        let second = temp_path("no-such-dir").join("second.png");

        let err = save_all(&[(first.as_path(), &buf), (second.as_path(), &buf)]).unwrap_err();

        assert!(format!("{err:#}").contains("second.png"));
        assert!(!first.exists());
    }

    #[test]
    fn test_failed_encode_leaves_no_file() {
        // JPEG has no alpha channel, so the encoder rejects RGBA after creating the file.
        let rgba = PixelBuffer::filled(4, 4, 4, 200).unwrap();
        let path = temp_path("rgba.jpg");

        let err = save(&path, &rgba).unwrap_err();

        assert!(format!("{err:#}").contains("rgba.jpg"));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_save_all_leaves_no_outputs() {
        let rgba = PixelBuffer::filled(4, 4, 4, 200).unwrap();
        let first = temp_path("all-first.png");
        let second = temp_path("all-second.jpg");

        save_all(&[(first.as_path(), &rgba), (second.as_path(), &rgba)]).unwrap_err();

        assert!(!first.exists());
        assert!(!second.exists());
    }

    #[test]
    fn test_sixteen_bit_gray_loads_as_one_channel() {
        let path = temp_path("gray16.png");
        let img = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_fn(3, 2, |x, _| {
            image::Luma([if x == 0 { 0 } else { u16::MAX }])
        });
        img.save(&path).unwrap();

        let loaded = load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded.dimensions(), (3, 2, 1));
        assert_eq!(loaded.get(1, 0, 0), Some(0));
        assert_eq!(loaded.get(1, 2, 0), Some(255));
    }
}
