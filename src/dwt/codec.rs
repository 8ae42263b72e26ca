//! Wavelet subband codec: one-level Haar decomposition with hard
//! thresholding of the detail bands.

use log::debug;

use crate::dwt::haar::{self, Subbands};
use crate::error::CodecError;
use crate::image::{GrayImage, check_raw, round_to_sample};

pub const DEFAULT_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveletCodec {
    threshold: f64,
    parallel: bool,
}

impl WaveletCodec {
    /// Fails with [`CodecError::InvalidArgument`] for a negative or NaN threshold.
    pub fn new(threshold: f64) -> Result<Self, CodecError> {
        if threshold.is_nan() || threshold < 0.0 {
            return Err(CodecError::invalid_argument(format!(
                "threshold must be non-negative, got {}",
                threshold
            )));
        }
        Ok(Self {
            threshold,
            parallel: false,
        })
    }

    /// Run the row and column passes on the rayon pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Forward transform only, before thresholding.
    pub fn decompose(&self, image: &GrayImage) -> Result<Subbands, CodecError> {
        haar::decompose(&image.to_f64(), image.width, image.height, self.parallel)
    }

    pub fn compress(&self, image: &GrayImage) -> Result<GrayImage, CodecError> {
        self.compress_raw(image.pixels(), image.width, image.height)
    }

    /// Same as [`Self::compress`] over a borrowed row-major buffer.
    pub fn compress_raw(&self, pixels: &[u8], width: usize, height: usize) -> Result<GrayImage, CodecError> {
        check_raw(pixels, width, height)?;

        let source: Vec<f64> = pixels.iter().map(|&p| p as f64).collect();
        let mut bands = haar::decompose(&source, width, height, self.parallel)?;
        let before = bands.retained_details();
        bands.threshold(self.threshold);
        debug!(
            "DWT codec: {}x{} image, threshold {}, kept {} of {} detail coefficients",
            width,
            height,
            self.threshold,
            bands.retained_details(),
            before
        );

        let restored = haar::reconstruct(&bands, self.parallel)?;
        let pixels = restored.into_iter().map(round_to_sample).collect();
        GrayImage::new(width, height, pixels)
    }
}

impl Default for WaveletCodec {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            parallel: false,
        }
    }
}

/// Runs the Haar codec with the given threshold.
pub fn compress_dwt(image: &GrayImage, threshold: f64) -> Result<GrayImage, CodecError> {
    WaveletCodec::new(threshold)?.compress(image)
}
