//! Block transform codec: tile, transform, quantize, and reconstruct.

use log::{debug, trace};
use rayon::prelude::*;

use crate::dct::basis::{BasisSet, forward_2d, inverse_2d};
use crate::dct::quantization::{QuantizationTable, Quantizer, STD_TABLE_SIZE};
use crate::error::CodecError;
use crate::image::{GrayImage, check_raw, round_to_sample};

/// Default block edge length.
pub const DEFAULT_BLOCK_SIZE: usize = STD_TABLE_SIZE;

/// Lossy round trip of a grayscale image through a block-wise DCT and a
/// quantizer.
///
/// Blocks are visited row-major from the top-left. Blocks on the right and
/// bottom edges are truncated to the pixels that exist; a truncated block
/// is transformed with bases of its own extents and quantized against the
/// top-left corner of the table. No padding is introduced.
#[derive(Debug, Clone)]
pub struct BlockCodec<Q = QuantizationTable> {
    block_size: usize,
    quantizer: Q,
    parallel: bool,
}

impl BlockCodec<QuantizationTable> {
    /// 8x8 blocks quantized with the standard luminance table.
    pub fn new() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            quantizer: QuantizationTable::standard_luminance(),
            parallel: false,
        }
    }

    /// 8x8 blocks quantized with the luminance table scaled to `quality`.
    pub fn with_quality(quality: u32) -> Result<Self, CodecError> {
        Self::with_quantizer(DEFAULT_BLOCK_SIZE, QuantizationTable::scaled_luminance(quality)?)
    }
}

impl Default for BlockCodec<QuantizationTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: Quantizer> BlockCodec<Q> {
    /// Pairs a block size with a quantizer able to serve it.
    ///
    /// A table sized for a different block size is rejected rather than
    /// resized.
    pub fn with_quantizer(block_size: usize, quantizer: Q) -> Result<Self, CodecError> {
        if block_size == 0 {
            return Err(CodecError::invalid_argument("block size must be positive"));
        }
        if !quantizer.supports_block_size(block_size) {
            return Err(CodecError::invalid_argument(format!(
                "quantizer does not support {}x{} blocks",
                block_size, block_size
            )));
        }
        Ok(Self {
            block_size,
            quantizer,
            parallel: false,
        })
    }

    /// Process bands of blocks on the rayon pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn quantizer(&self) -> &Q {
        &self.quantizer
    }

    /// Number of blocks the image is tiled into.
    pub fn block_count(&self, width: usize, height: usize) -> usize {
        width.div_ceil(self.block_size) * height.div_ceil(self.block_size)
    }

    pub fn compress(&self, image: &GrayImage) -> Result<GrayImage, CodecError> {
        self.compress_raw(image.pixels(), image.width, image.height)
    }

    /// Same as [`Self::compress`] over a borrowed row-major buffer.
    pub fn compress_raw(&self, pixels: &[u8], width: usize, height: usize) -> Result<GrayImage, CodecError> {
        check_raw(pixels, width, height)?;

        let n = self.block_size;
        let bases = BasisSet::for_image(n, width, height)?;
        debug!(
            "DCT codec: {}x{} image, {}x{} blocks, {} blocks, parallel={}",
            width,
            height,
            n,
            n,
            self.block_count(width, height),
            self.parallel
        );

        let source: Vec<f64> = pixels.iter().map(|&p| p as f64).collect();
        let mut output = vec![0u8; width * height];
        let band_len = n.min(height) * width;

        // Each band is `n` full image rows; bands never overlap.
        if self.parallel {
            output
                .par_chunks_mut(band_len)
                .enumerate()
                .for_each(|(band, out)| self.code_band(&source, width, height, band * n, &bases, out));
        } else {
            output
                .chunks_mut(band_len)
                .enumerate()
                .for_each(|(band, out)| self.code_band(&source, width, height, band * n, &bases, out));
        }

        GrayImage::new(width, height, output)
    }

    /// Codes every block whose top edge is at image row `y0`, writing into
    /// `out`, the band of rows `y0..y0 + rows`.
    fn code_band(
        &self,
        source: &[f64],
        width: usize,
        height: usize,
        y0: usize,
        bases: &BasisSet,
        out: &mut [u8],
    ) {
        let n = self.block_size;
        let rows = n.min(height - y0);
        let rows_basis = bases.get(rows);

        let capacity = rows * n.min(width);
        let mut block = vec![0.0f64; capacity];
        let mut scratch = vec![0.0f64; capacity];
        let mut coeffs = vec![0.0f64; capacity];

        for x0 in (0..width).step_by(n) {
            let cols = n.min(width - x0);
            let cols_basis = bases.get(cols);
            let len = rows * cols;

            for r in 0..rows {
                let src = &source[(y0 + r) * width + x0..(y0 + r) * width + x0 + cols];
                block[r * cols..(r + 1) * cols].copy_from_slice(src);
            }

            forward_2d(rows_basis, cols_basis, &block[..len], &mut scratch[..len], &mut coeffs[..len]);
            self.quantizer.round_trip(&mut coeffs[..len], rows, cols);
            inverse_2d(rows_basis, cols_basis, &coeffs[..len], &mut scratch[..len], &mut block[..len]);

            for r in 0..rows {
                let dst = &mut out[r * width + x0..r * width + x0 + cols];
                for (d, &v) in dst.iter_mut().zip(&block[r * cols..(r + 1) * cols]) {
                    *d = round_to_sample(v);
                }
            }
        }
        trace!("DCT codec: band at row {} done", y0);
    }
}

/// Runs the default codec (8x8 blocks, standard luminance table).
pub fn compress_dct(image: &GrayImage) -> Result<GrayImage, CodecError> {
    BlockCodec::new().compress(image)
}
