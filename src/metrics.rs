//! Fidelity metrics between an original image and its reconstruction.

use crate::error::CodecError;
use crate::image::GrayImage;

/// Peak sample value of an 8-bit image.
pub const MAX_SAMPLE: f64 = 255.0;

/// PSNR reported for identical images, where the true value is infinite.
pub const PSNR_IDENTICAL: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fidelity {
    pub mse: f64,
    /// Decibels; [`PSNR_IDENTICAL`] when `mse == 0`.
    pub psnr: f64,
}

/// Mean squared error over all pixels.
pub fn mse(original: &GrayImage, reconstructed: &GrayImage) -> Result<f64, CodecError> {
    if original.dimensions() != reconstructed.dimensions() {
        return Err(CodecError::DimensionMismatch {
            expected: original.dimensions(),
            actual: reconstructed.dimensions(),
        });
    }
    let sum: f64 = original
        .pixels()
        .iter()
        .zip(reconstructed.pixels())
        .map(|(&a, &b)| {
            let d = a as f64 - b as f64;
            d * d
        })
        .sum();
    Ok(sum / original.pixels().len() as f64)
}

pub fn psnr(original: &GrayImage, reconstructed: &GrayImage) -> Result<f64, CodecError> {
    Ok(psnr_from_mse(mse(original, reconstructed)?))
}

pub fn psnr_from_mse(mse: f64) -> f64 {
    if mse == 0.0 {
        return PSNR_IDENTICAL;
    }
    10.0 * (MAX_SAMPLE * MAX_SAMPLE / mse).log10()
}

/// MSE and PSNR in a single pass.
pub fn evaluate(original: &GrayImage, reconstructed: &GrayImage) -> Result<Fidelity, CodecError> {
    let mse = mse(original, reconstructed)?;
    Ok(Fidelity {
        mse,
        psnr: psnr_from_mse(mse),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_images() {
        let image = GrayImage::from_fn(5, 4, |x, y| (x * y) as u8).unwrap();
        let fidelity = evaluate(&image, &image).unwrap();
        assert_eq!(fidelity.mse, 0.0);
        assert_eq!(fidelity.psnr, 100.0);
    }

    #[test]
    fn test_constant_offset() {
        let original = GrayImage::filled(6, 6, 100).unwrap();
        let shifted = GrayImage::filled(6, 6, 103).unwrap();
        assert_eq!(mse(&original, &shifted).unwrap(), 9.0);
        assert_eq!(mse(&shifted, &original).unwrap(), 9.0);
    }

    #[test]
    fn test_psnr_value() {
        // MSE 1 -> 20 * log10(255)
        let expected = 20.0 * 255.0f64.log10();
        assert!((psnr_from_mse(1.0) - expected).abs() < 1e-12);
        assert!((psnr_from_mse(255.0 * 255.0)).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = GrayImage::filled(10, 10, 0).unwrap();
        let b = GrayImage::filled(12, 10, 0).unwrap();
        assert_eq!(
            mse(&a, &b),
            Err(CodecError::DimensionMismatch {
                expected: (10, 10),
                actual: (12, 10),
            })
        );
        assert!(psnr(&a, &b).is_err());
    }
}
