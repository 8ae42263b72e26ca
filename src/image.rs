//! Grayscale pixel grid shared by both codecs and the metrics.

use crate::error::CodecError;

/// An owned 8-bit grayscale image stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    /// Width of the image in pixels.
    pub width: usize,
    /// Height of the image in pixels.
    pub height: usize,
    pixels: Vec<u8>,
}

impl GrayImage {
    /// Wraps a row-major pixel buffer.
    ///
    /// Fails with [`CodecError::InvalidInput`] if either dimension is zero or
    /// the buffer length is not `width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::invalid_input(format!(
                "image dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        let expected = width
            .checked_mul(height)
            .ok_or_else(|| CodecError::invalid_input("image dimensions overflow"))?;
        if pixels.len() != expected {
            return Err(CodecError::invalid_input(format!(
                "pixel buffer holds {} samples, {}x{} image needs {}",
                pixels.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> u8,
    ) -> Result<Self, CodecError> {
        let mut pixels = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    /// Image filled with a single intensity.
    pub fn filled(width: usize, height: usize, value: u8) -> Result<Self, CodecError> {
        Self::new(width, height, vec![value; width.saturating_mul(height)])
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixels widened to `f64`, the working precision of both codecs.
    pub(crate) fn to_f64(&self) -> Vec<f64> {
        self.pixels.iter().map(|&p| p as f64).collect()
    }
}

/// Validates a borrowed row-major buffer against its claimed dimensions.
pub(crate) fn check_raw(pixels: &[u8], width: usize, height: usize) -> Result<(), CodecError> {
    if width == 0 || height == 0 || pixels.is_empty() {
        return Err(CodecError::invalid_input("image is empty"));
    }
    let expected = width.checked_mul(height).ok_or_else(|| {
        CodecError::invalid_input(format!("image dimensions {}x{} overflow", width, height))
    })?;
    if pixels.len() != expected {
        return Err(CodecError::invalid_input(format!(
            "pixel buffer holds {} samples, {}x{} image needs {}",
            pixels.len(),
            width,
            height,
            expected
        )));
    }
    Ok(())
}

/// Rounds to nearest (ties away from zero) and clamps into `[0, 255]`.
#[inline]
pub(crate) fn round_to_sample(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(
            GrayImage::new(0, 4, vec![]),
            Err(CodecError::InvalidInput(_))
        ));
        assert!(matches!(
            GrayImage::new(4, 0, vec![]),
            Err(CodecError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_new_rejects_short_buffer() {
        let err = GrayImage::new(4, 4, vec![0u8; 15]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidInput(_)));
    }

    #[test]
    fn test_from_fn_row_major() {
        let image = GrayImage::from_fn(3, 2, |x, y| (y * 10 + x) as u8).unwrap();
        assert_eq!(image.pixels(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(image.row(1), &[10, 11, 12]);
        assert_eq!(image.get(2, 1), Some(12));
        assert_eq!(image.get(3, 0), None);
    }

    #[test]
    fn test_round_to_sample() {
        assert_eq!(round_to_sample(-3.2), 0);
        assert_eq!(round_to_sample(300.0), 255);
        assert_eq!(round_to_sample(127.5), 128);
        assert_eq!(round_to_sample(127.49), 127);
        assert_eq!(round_to_sample(f64::NAN), 0);
    }
}
