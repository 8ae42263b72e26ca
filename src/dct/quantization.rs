//! Quantization tables and the quantization of DCT coefficients.

use crate::error::CodecError;

/// Block size the standard table is defined for.
pub const STD_TABLE_SIZE: usize = 8;

/// Standard JPEG luminance quantization table (Quality 50).
pub const STD_LUMINANCE_QUANT_TABLE: [u16; STD_TABLE_SIZE * STD_TABLE_SIZE] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Lossy step applied to a block of transform coefficients between the
/// forward and inverse transforms.
pub trait Quantizer: Sync {
    /// Whether this quantizer can serve blocks of `block_size x block_size`.
    fn supports_block_size(&self, block_size: usize) -> bool;

    /// Quantizes and dequantizes a `rows x cols` coefficient block in place.
    ///
    /// `rows` and `cols` may be smaller than the block size for edge blocks.
    fn round_trip(&self, coeffs: &mut [f64], rows: usize, cols: usize);
}

/// Square table of positive quantizer step sizes, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationTable {
    size: usize,
    steps: Vec<u16>,
}

impl QuantizationTable {
    /// The standard 8x8 luminance table.
    pub fn standard_luminance() -> Self {
        Self {
            size: STD_TABLE_SIZE,
            steps: STD_LUMINANCE_QUANT_TABLE.to_vec(),
        }
    }

    /// The standard luminance table scaled by a quality factor (1-100).
    ///
    /// Quality 50 yields the unscaled table; lower qualities coarsen the steps.
    pub fn scaled_luminance(quality: u32) -> Result<Self, CodecError> {
        if !(1..=100).contains(&quality) {
            return Err(CodecError::invalid_argument(format!(
                "quality must be within 1..=100, got {}",
                quality
            )));
        }
        let s = if quality < 50 { 5000 / quality } else { 200 - 2 * quality };

        let steps = STD_LUMINANCE_QUANT_TABLE
            .iter()
            .map(|&base| ((base as u32 * s + 50) / 100).clamp(1, 255) as u16)
            .collect();
        Ok(Self {
            size: STD_TABLE_SIZE,
            steps,
        })
    }

    /// Table for `block_size x block_size` blocks at a quality level.
    ///
    /// Size 8 gets [`Self::scaled_luminance`]. Any other size gets a uniform
    /// table whose step is the DC step of the scaled luminance table.
    pub fn for_block_size(block_size: usize, quality: u32) -> Result<Self, CodecError> {
        let luminance = Self::scaled_luminance(quality)?;
        if block_size == STD_TABLE_SIZE {
            return Ok(luminance);
        }
        Self::uniform(block_size, luminance.step(0, 0))
    }

    /// A `size x size` table with the same step everywhere.
    pub fn uniform(size: usize, step: u16) -> Result<Self, CodecError> {
        let len = size
            .checked_mul(size)
            .ok_or_else(|| CodecError::invalid_argument(format!("table size {} is too large", size)))?;
        Self::from_values(size, vec![step; len])
    }

    pub fn from_values(size: usize, steps: Vec<u16>) -> Result<Self, CodecError> {
        if size == 0 {
            return Err(CodecError::invalid_argument("table size must be positive"));
        }
        if size.checked_mul(size) != Some(steps.len()) {
            return Err(CodecError::invalid_argument(format!(
                "a {}x{} table needs {} steps, got {}",
                size,
                size,
                size.saturating_mul(size),
                steps.len()
            )));
        }
        if steps.contains(&0) {
            return Err(CodecError::invalid_argument("quantizer steps must be positive"));
        }
        Ok(Self { size, steps })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn step(&self, row: usize, col: usize) -> u16 {
        self.steps[row * self.size + col]
    }

    pub fn steps(&self) -> &[u16] {
        &self.steps
    }

    /// Quantizes a `rows x cols` coefficient block against the top-left
    /// `rows x cols` corner of this table.
    ///
    /// Rounds half away from zero.
    pub fn quantize_block(&self, coeffs: &[f64], rows: usize, cols: usize, output: &mut [i32]) {
        for r in 0..rows {
            for c in 0..cols {
                let i = r * cols + c;
                output[i] = (coeffs[i] / self.step(r, c) as f64).round() as i32;
            }
        }
    }

    /// De-quantizes a `rows x cols` block produced by [`Self::quantize_block`].
    pub fn dequantize_block(&self, quantized: &[i32], rows: usize, cols: usize, output: &mut [f64]) {
        for r in 0..rows {
            for c in 0..cols {
                let i = r * cols + c;
                output[i] = quantized[i] as f64 * self.step(r, c) as f64;
            }
        }
    }
}

impl Default for QuantizationTable {
    fn default() -> Self {
        Self::standard_luminance()
    }
}

impl Quantizer for QuantizationTable {
    fn supports_block_size(&self, block_size: usize) -> bool {
        block_size == self.size
    }

    fn round_trip(&self, coeffs: &mut [f64], rows: usize, cols: usize) {
        let mut quantized = [0i32; STD_TABLE_SIZE * STD_TABLE_SIZE];
        let mut heap;
        let quantized: &mut [i32] = if rows * cols <= quantized.len() {
            &mut quantized[..rows * cols]
        } else {
            heap = vec![0i32; rows * cols];
            &mut heap
        };
        self.quantize_block(coeffs, rows, cols, quantized);
        self.dequantize_block(quantized, rows, cols, coeffs);
    }
}

/// Leaves coefficients untouched, turning the block codec into a pure
/// transform round trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Passthrough;

impl Quantizer for Passthrough {
    fn supports_block_size(&self, _block_size: usize) -> bool {
        true
    }

    fn round_trip(&self, _coeffs: &mut [f64], _rows: usize, _cols: usize) {}
}
