//! Randomized checks of the resampler and metric invariants.
//!
//! Buffers are generated from a fixed seed so failures are reproducible.

use interpbench::{mse, psnr, resize_bilinear, resize_nearest, Error, PixelBuffer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CASES: usize = 200;

fn random_buffer(rng: &mut StdRng, max_dim: usize) -> PixelBuffer {
    let width = rng.gen_range(1..=max_dim);
    let height = rng.gen_range(1..=max_dim);
    let channels = rng.gen_range(1..=4);
    let samples: Vec<u8> = (0..width * height * channels).map(|_| rng.gen()).collect();
    PixelBuffer::new(width, height, channels, samples).expect("valid buffer")
}

#[test]
fn test_nearest_output_has_requested_shape() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0001);

    for _ in 0..CASES {
        let src = random_buffer(&mut rng, 24);
        let new_w = rng.gen_range(1..=48);
        let new_h = rng.gen_range(1..=48);

        let out = resize_nearest(&src, new_w, new_h).unwrap();
        assert_eq!(out.dimensions(), (new_w, new_h, src.channels()));
        assert_eq!(out.len(), new_w * new_h * src.channels());
        // The top-left pixel always maps to the top-left source pixel.
        assert_eq!(out.pixel(0, 0), src.pixel(0, 0));
    }
}

#[test]
fn test_nearest_only_copies_existing_pixels() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0002);

    for _ in 0..50 {
        let src = random_buffer(&mut rng, 12);
        let out = resize_nearest(&src, rng.gen_range(1..=30), rng.gen_range(1..=30)).unwrap();

        for row in 0..out.height() {
            for col in 0..out.width() {
                let px = out.pixel(row, col).unwrap();
                let found = (0..src.height())
                    .flat_map(|r| (0..src.width()).map(move |c| (r, c)))
                    .any(|(r, c)| src.pixel(r, c) == Some(px));
                assert!(found, "pixel ({row}, {col}) = {px:?} is not a source pixel");
            }
        }
    }
}

#[test]
fn test_bilinear_reproduces_corner_pixels() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0003);

    for _ in 0..CASES {
        let src = random_buffer(&mut rng, 24);
        let new_w = rng.gen_range(2..=48);
        let new_h = rng.gen_range(2..=48);
        let (src_w, src_h, channels) = src.dimensions();

        let out = resize_bilinear(&src, new_w, new_h).unwrap();
        assert_eq!(out.dimensions(), (new_w, new_h, channels));

        for c in 0..channels {
            let first = i16::from(out.get(0, 0, c).unwrap()) - i16::from(src.get(0, 0, c).unwrap());
            let last = i16::from(out.get(new_h - 1, new_w - 1, c).unwrap())
                - i16::from(src.get(src_h - 1, src_w - 1, c).unwrap());
            assert!(first.abs() <= 1, "first corner off by {first}");
            assert!(last.abs() <= 1, "last corner off by {last}");
        }
    }
}

#[test]
fn test_bilinear_stays_within_neighbour_range() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0004);

    for _ in 0..50 {
        let src = random_buffer(&mut rng, 10);
        let out = resize_bilinear(&src, rng.gen_range(2..=25), rng.gen_range(2..=25)).unwrap();

        for c in 0..src.channels() {
            let channel = |buf: &PixelBuffer| {
                buf.samples()
                    .iter()
                    .skip(c)
                    .step_by(buf.channels())
                    .copied()
                    .collect::<Vec<u8>>()
            };
            let src_c = channel(&src);
            let out_c = channel(&out);
            let lo = *src_c.iter().min().unwrap();
            let hi = *src_c.iter().max().unwrap();
            assert!(out_c.iter().all(|&v| v >= lo && v <= hi));
        }
    }
}

#[test]
fn test_bilinear_rejects_single_pixel_targets() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0005);

    for _ in 0..20 {
        let src = random_buffer(&mut rng, 16);
        let other = rng.gen_range(1..=32);

        for (w, h) in [(1, other), (other, 1), (0, other)] {
            match resize_bilinear(&src, w, h) {
                Err(Error::InvalidDimensions { width, height, .. }) => {
                    assert_eq!((width, height), (w, h));
                }
                other => panic!("expected InvalidDimensions for {w}x{h}, got {other:?}"),
            }
        }
    }
}

#[test]
fn test_mse_is_zero_on_self_and_symmetric() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0006);

    for _ in 0..CASES {
        let a = random_buffer(&mut rng, 20);
        let noise: Vec<u8> = (0..a.len()).map(|_| rng.gen()).collect();
        let (w, h, c) = a.dimensions();
        let b = PixelBuffer::new(w, h, c, noise).unwrap();

        let self_mse = mse(&a, &a).unwrap();
        assert_eq!(self_mse, 0.0);
        assert_eq!(psnr(self_mse), f64::INFINITY);

        let ab = mse(&a, &b).unwrap();
        assert_eq!(ab, mse(&b, &a).unwrap());
        assert!(ab >= 0.0);
        assert!(ab <= 65025.0);
    }
}
