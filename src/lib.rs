//! Lossy grayscale transform coding.
//!
//! Two independent codecs take a [`GrayImage`] and return a reconstructed
//! image of the same size:
//!
//! - [`dct`]: block DCT-II with table quantization (JPEG-style, no entropy coding).
//! - [`dwt`]: one-level Haar decomposition with hard thresholding of the
//!   detail subbands.
//!
//! [`metrics`] compares a reconstruction against its original (MSE/PSNR).
//!
//! ```no_run
//! use dctwave_rs::{GrayImage, dct, dwt, metrics};
//!
//! let image = GrayImage::from_fn(64, 64, |x, y| (x ^ y) as u8)?;
//! let dct_out = dct::compress_dct(&image)?;
//! let dwt_out = dwt::compress_dwt(&image, 0.1)?;
//! println!("DCT PSNR {:.2}", metrics::psnr(&image, &dct_out)?);
//! println!("DWT PSNR {:.2}", metrics::psnr(&image, &dwt_out)?);
//! # Ok::<(), dctwave_rs::CodecError>(())
//! ```

pub mod dct;
pub mod dwt;
pub mod error;
pub mod image;
pub mod metrics;
pub mod netpbm;
pub mod wasm;

pub use error::CodecError;
pub use image::GrayImage;
pub use metrics::Fidelity;
