use dctwave_rs::GrayImage;
use dctwave_rs::dct::BlockCodec;
use dctwave_rs::dwt::WaveletCodec;
use std::time::Instant;

fn main() {
    env_logger::init();
    println!("Benchmarking codec implementations...");

    // 512x512 matches the size the comparison is usually run at
    let image = match GrayImage::from_fn(512, 512, |x, y| {
        let wave = ((x as f64 / 9.0).sin() + (y as f64 / 13.0).cos()) * 60.0;
        (128.0 + wave + ((x * y) % 17) as f64) as u8
    }) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let iterations = 20;

    let sequential = BlockCodec::new();
    let parallel = BlockCodec::new().parallel(true);

    // Benchmark sequential DCT
    let mut output_sequential = None;
    let start = Instant::now();
    for _ in 0..iterations {
        output_sequential = std::hint::black_box(sequential.compress(&image).ok());
    }
    let duration_sequential = start.elapsed();
    println!("Sequential DCT: {:?} for {} iterations", duration_sequential, iterations);

    // Benchmark parallel DCT
    let mut output_parallel = None;
    let start = Instant::now();
    for _ in 0..iterations {
        output_parallel = std::hint::black_box(parallel.compress(&image).ok());
    }
    let duration_parallel = start.elapsed();
    println!("Parallel DCT: {:?} for {} iterations", duration_parallel, iterations);

    let speedup = duration_sequential.as_secs_f64() / duration_parallel.as_secs_f64();
    println!("Speedup: {:.2}x", speedup);

    // Benchmark DWT for reference
    let wavelet = WaveletCodec::default();
    let start = Instant::now();
    for _ in 0..iterations {
        std::hint::black_box(wavelet.compress(&image).ok());
    }
    println!("Sequential DWT: {:?} for {} iterations", start.elapsed(), iterations);

    // Verify the two DCT paths agree
    if output_sequential.is_some() && output_sequential == output_parallel {
        println!("Determinism: PASSED (parallel output identical)");
    } else {
        println!("Determinism: FAILED (parallel output differs)");
    }
}
