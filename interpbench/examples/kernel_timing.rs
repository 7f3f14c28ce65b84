//! Per-size timing of both reconstruction kernels.
//!
//! Run with: cargo run --release --example kernel_timing

use interpbench::{run, HarnessConfig, PixelBuffer, Report};

fn main() {
    let sizes = [(256, 256), (512, 512), (1024, 1024), (1920, 1080)];
    let config = HarnessConfig::default();

    println!("Nearest Neighbor vs Bilinear reconstruction\n");
    println!(
        "{:>11} {:>12} {:>12} {:>9} {:>10} {:>10} {:>9}",
        "Size", "NN wall", "BI wall", "Speedup", "NN MSE", "BI MSE", "Better"
    );
    println!("{:-<79}", "");

    for (width, height) in sizes {
        // Diagonal bands with a little high-frequency texture.
        let source = PixelBuffer::from_fn(width, height, 3, |row, col, ch| {
            let band = (row + col) * 255 / (width + height);
            let texture = (row * 31 + col * 17 + ch * 7) % 23;
            (band + texture).min(255) as u8
        })
        .unwrap();

        let result = run(&source, &config).unwrap();
        let report = Report::from_record(&result.record);
        let nn = &result.record.nearest;
        let bi = &result.record.bilinear;

        println!(
            "{:>5}x{:<5} {:>10.3}ms {:>10.3}ms {:>8.2}x {:>10.2} {:>10.2} {:>8.2}%",
            width,
            height,
            nn.wall_time_seconds * 1000.0,
            bi.wall_time_seconds * 1000.0,
            report.speedup,
            nn.vs_original.mse,
            bi.vs_original.mse,
            report.mse_improvement_percent
        );
    }

    println!("\nNote: timings cover the reconstruction call only, not the shrink or scoring.");
}
