//! dctwave CLI - compare block DCT and Haar wavelet compression of a
//! grayscale image.
//!
//! Reads PGM (P5/P2) or raw 8-bit grayscale input, runs the codecs and
//! reports MSE/PSNR, optionally writing the reconstructions as PGM.

use clap::{Args, Parser, Subcommand};
use dctwave_rs::dct::BlockCodec;
use dctwave_rs::dct::QuantizationTable;
use dctwave_rs::dwt::WaveletCodec;
use dctwave_rs::{GrayImage, metrics, netpbm};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Lossy grayscale transform coding with block DCT and Haar wavelets
#[derive(Parser)]
#[command(name = "dctwave")]
#[command(author = "dctwave-rs contributors")]
#[command(version)]
#[command(about = "Compare block DCT and Haar wavelet compression of grayscale images", long_about = None)]
#[command(after_help = "EXAMPLES:
    dctwave compare -i lena.pgm
    dctwave compare -i lena.pgm -b 8 -t 0.1 -o out/
    dctwave dct -i pixels.raw -w 512 -H 512 -o dct.pgm -q 75
    dctwave dwt -i lena.pgm -o dwt.pgm -t 20
    dctwave metrics -a lena.pgm -b dct.pgm

INPUT:
    PGM files (P5 binary or P2 ASCII) are detected by their magic number.
    Anything else is read as raw 8-bit grayscale and needs --width/--height.

Set RUST_LOG=debug for codec diagnostics.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run both codecs and report their fidelity
    ///
    /// Prints compression time, MSE and PSNR for the DCT and DWT
    /// reconstructions of the same input.
    #[command(visible_alias = "c")]
    Compare {
        #[command(flatten)]
        input: InputArgs,

        /// Block size for the DCT codec (8 uses the luminance table, other
        /// sizes a uniform table with its DC step)
        #[arg(short, long, default_value = "8")]
        block_size: usize,

        /// Quality level for the DCT table (1-100, 50 = standard table)
        #[arg(short, long, default_value = "50")]
        quality: u32,

        /// Hard threshold for the wavelet detail subbands
        #[arg(short, long, default_value = "0.1")]
        threshold: f64,

        /// Directory to write dct.pgm and dwt.pgm into
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Process blocks and rows on all cores
        #[arg(long)]
        parallel: bool,
    },

    /// Block DCT round trip of a single image
    #[command(visible_alias = "d")]
    Dct {
        #[command(flatten)]
        input: InputArgs,

        /// Output PGM path
        #[arg(short, long)]
        output: PathBuf,

        /// Block size (8 uses the luminance table, other sizes a uniform
        /// table with its DC step)
        #[arg(short, long, default_value = "8")]
        block_size: usize,

        /// Quality level for the table (1-100, 50 = standard table)
        #[arg(short, long, default_value = "50")]
        quality: u32,

        #[arg(long)]
        parallel: bool,
    },

    /// Haar wavelet round trip of a single image
    #[command(visible_alias = "w")]
    Dwt {
        #[command(flatten)]
        input: InputArgs,

        /// Output PGM path
        #[arg(short, long)]
        output: PathBuf,

        /// Hard threshold for the detail subbands
        #[arg(short, long, default_value = "0.1")]
        threshold: f64,

        #[arg(long)]
        parallel: bool,
    },

    /// MSE and PSNR between two images of the same size
    #[command(visible_alias = "m")]
    Metrics {
        /// Reference image (PGM)
        #[arg(short = 'a', long)]
        original: PathBuf,

        /// Image to compare against the reference (PGM)
        #[arg(short = 'b', long)]
        reconstructed: PathBuf,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input image (PGM or raw 8-bit grayscale)
    #[arg(short, long, help = "Path to the input image file")]
    input: PathBuf,

    /// Width of a raw input image
    #[arg(short, long)]
    width: Option<usize>,

    /// Height of a raw input image
    #[arg(short = 'H', long)]
    height: Option<usize>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compare {
            input,
            block_size,
            quality,
            threshold,
            output,
            parallel,
        } => compare(&input, block_size, quality, threshold, output.as_deref(), parallel),
        Commands::Dct {
            input,
            output,
            block_size,
            quality,
            parallel,
        } => run_dct(&input, &output, block_size, quality, parallel),
        Commands::Dwt {
            input,
            output,
            threshold,
            parallel,
        } => run_dwt(&input, &output, threshold, parallel),
        Commands::Metrics {
            original,
            reconstructed,
        } => show_metrics(&original, &reconstructed),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn compare(
    input: &InputArgs,
    block_size: usize,
    quality: u32,
    threshold: f64,
    output: Option<&Path>,
    parallel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = load_image(input)?;
    let dct = build_block_codec(block_size, quality)?.parallel(parallel);
    let dwt = WaveletCodec::new(threshold)?.parallel(parallel);

    let start = Instant::now();
    let dct_image = dct.compress(&image)?;
    let dct_time = start.elapsed();

    let start = Instant::now();
    let dwt_image = dwt.compress(&image)?;
    let dwt_time = start.elapsed();

    let dct_fidelity = metrics::evaluate(&image, &dct_image)?;
    let dwt_fidelity = metrics::evaluate(&image, &dwt_image)?;

    println!("Image: {}x{}", image.width, image.height);
    println!();
    println!("  DCT ({}x{} blocks, quality {})", block_size, block_size, quality);
    println!("    Time: {:?}", dct_time);
    println!("    MSE:  {:.4}", dct_fidelity.mse);
    println!("    PSNR: {:.2} dB", dct_fidelity.psnr);
    println!();
    println!("  DWT (Haar, threshold {})", threshold);
    println!("    Time: {:?}", dwt_time);
    println!("    MSE:  {:.4}", dwt_fidelity.mse);
    println!("    PSNR: {:.2} dB", dwt_fidelity.psnr);

    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
        let dct_path = dir.join("dct.pgm");
        let dwt_path = dir.join("dwt.pgm");
        fs::write(&dct_path, netpbm::write_pgm(&dct_image))?;
        fs::write(&dwt_path, netpbm::write_pgm(&dwt_image))?;
        println!();
        println!("✓ Wrote {:?} and {:?}", dct_path, dwt_path);
    }
    Ok(())
}

fn run_dct(
    input: &InputArgs,
    output: &Path,
    block_size: usize,
    quality: u32,
    parallel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = load_image(input)?;
    let codec = build_block_codec(block_size, quality)?.parallel(parallel);
    let reconstructed = codec.compress(&image)?;
    let fidelity = metrics::evaluate(&image, &reconstructed)?;

    fs::write(output, netpbm::write_pgm(&reconstructed))?;
    println!(
        "✓ DCT {}x{} image to {:?}: MSE {:.4}, PSNR {:.2} dB",
        image.width, image.height, output, fidelity.mse, fidelity.psnr
    );
    Ok(())
}

fn run_dwt(
    input: &InputArgs,
    output: &Path,
    threshold: f64,
    parallel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = load_image(input)?;
    let codec = WaveletCodec::new(threshold)?.parallel(parallel);
    let reconstructed = codec.compress(&image)?;
    let fidelity = metrics::evaluate(&image, &reconstructed)?;

    fs::write(output, netpbm::write_pgm(&reconstructed))?;
    println!(
        "✓ DWT {}x{} image to {:?}: MSE {:.4}, PSNR {:.2} dB",
        image.width, image.height, output, fidelity.mse, fidelity.psnr
    );
    Ok(())
}

fn show_metrics(original: &Path, reconstructed: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let a = netpbm::read_pgm(&fs::read(original)?)?;
    let b = netpbm::read_pgm(&fs::read(reconstructed)?)?;
    let fidelity = metrics::evaluate(&a, &b)?;
    println!("MSE:  {:.4}", fidelity.mse);
    println!("PSNR: {:.2} dB", fidelity.psnr);
    Ok(())
}

// Internal helpers

fn build_block_codec(
    block_size: usize,
    quality: u32,
) -> Result<BlockCodec<QuantizationTable>, Box<dyn std::error::Error>> {
    let table = QuantizationTable::for_block_size(block_size, quality)?;
    Ok(BlockCodec::with_quantizer(block_size, table)?)
}

fn load_image(args: &InputArgs) -> Result<GrayImage, Box<dyn std::error::Error>> {
    let data = fs::read(&args.input)?;
    let image = if netpbm::is_pgm(&data) {
        netpbm::read_pgm(&data)?
    } else {
        match (args.width, args.height) {
            (Some(w), Some(h)) => netpbm::read_raw(&data, w, h)?,
            _ => return Err("raw input needs --width and --height".into()),
        }
    };
    info!("loaded {:?}: {}x{}", args.input, image.width, image.height);
    Ok(image)
}
