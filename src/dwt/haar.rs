//! Single-level separable Haar transform.
//!
//! Filters are `h0 = [1/sqrt2, 1/sqrt2]` and `h1 = [1/sqrt2, -1/sqrt2]` applied
//! with stride 2. A signal of odd length is extended by repeating its last
//! sample (half-sample symmetric extension), so it yields `ceil(len / 2)`
//! low and high coefficients and the final high coefficient is zero. The
//! inverse drops the extension sample again.

use std::f64::consts::FRAC_1_SQRT_2;

use rayon::prelude::*;

use crate::error::CodecError;

/// The four subbands of a one-level 2D decomposition.
///
/// ```text
/// LL: low along rows,  low along columns   (approximation)
/// LH: low along rows,  high along columns
/// HL: high along rows, low along columns
/// HH: high along rows, high along columns
/// ```
///
/// Each band is `width x height`, i.e. `ceil(W/2) x ceil(H/2)` of the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Subbands {
    pub ll: Vec<f64>,
    pub lh: Vec<f64>,
    pub hl: Vec<f64>,
    pub hh: Vec<f64>,
    /// Width of each subband.
    pub width: usize,
    /// Height of each subband.
    pub height: usize,
    /// Width of the decomposed image.
    pub source_width: usize,
    /// Height of the decomposed image.
    pub source_height: usize,
}

impl Subbands {
    /// Hard-thresholds the detail bands, zeroing every coefficient with
    /// `|c| <= threshold`. `LL` is left untouched.
    pub fn threshold(&mut self, threshold: f64) {
        for band in [&mut self.lh, &mut self.hl, &mut self.hh] {
            for c in band.iter_mut() {
                if c.abs() <= threshold {
                    *c = 0.0;
                }
            }
        }
    }

    /// Number of non-zero coefficients across `LH`, `HL` and `HH`.
    pub fn retained_details(&self) -> usize {
        [&self.lh, &self.hl, &self.hh]
            .iter()
            .map(|band| band.iter().filter(|&&c| c != 0.0).count())
            .sum()
    }
}

/// Forward 1D Haar step.
///
/// `low` and `high` must both hold `ceil(signal.len() / 2)` values.
pub fn forward(signal: &[f64], low: &mut [f64], high: &mut [f64]) {
    for (k, (l, h)) in low.iter_mut().zip(high.iter_mut()).enumerate() {
        let a = signal[2 * k];
        let b = signal.get(2 * k + 1).copied().unwrap_or(a);
        *l = (a + b) * FRAC_1_SQRT_2;
        *h = (a - b) * FRAC_1_SQRT_2;
    }
}

/// Inverse 1D Haar step, writing `output.len()` samples.
pub fn inverse(low: &[f64], high: &[f64], output: &mut [f64]) {
    let len = output.len();
    for (k, (&l, &h)) in low.iter().zip(high).enumerate() {
        if 2 * k < len {
            output[2 * k] = (l + h) * FRAC_1_SQRT_2;
        }
        if 2 * k + 1 < len {
            output[2 * k + 1] = (l - h) * FRAC_1_SQRT_2;
        }
    }
}

/// Forward 2D transform of a row-major `width x height` grid: rows first,
/// then columns.
///
/// Fails with [`CodecError::InvalidInput`] for an empty grid or when `data`
/// does not hold `width * height` values.
pub fn decompose(
    data: &[f64],
    width: usize,
    height: usize,
    parallel: bool,
) -> Result<Subbands, CodecError> {
    check_grid("grid", data.len(), width, height)?;
    let sub_w = width.div_ceil(2);
    let sub_h = height.div_ceil(2);

    // Row pass: each is height x sub_w
    let (row_low, row_high) = split_rows(data, width, sub_w, parallel);

    // Column pass
    let (ll, lh) = split_columns(&row_low, sub_w, height, sub_h, parallel);
    let (hl, hh) = split_columns(&row_high, sub_w, height, sub_h, parallel);

    Ok(Subbands {
        ll,
        lh,
        hl,
        hh,
        width: sub_w,
        height: sub_h,
        source_width: width,
        source_height: height,
    })
}

/// Inverse 2D transform back to a `source_width x source_height` grid.
///
/// Fails with [`CodecError::InvalidInput`] when the band sizes do not match
/// a decomposition of the source dimensions.
pub fn reconstruct(bands: &Subbands, parallel: bool) -> Result<Vec<f64>, CodecError> {
    if bands.source_width == 0 || bands.source_height == 0 {
        return Err(CodecError::invalid_input("source image is empty"));
    }
    if bands.width != bands.source_width.div_ceil(2) || bands.height != bands.source_height.div_ceil(2) {
        return Err(CodecError::invalid_input(format!(
            "{}x{} subbands cannot rebuild a {}x{} image",
            bands.width, bands.height, bands.source_width, bands.source_height
        )));
    }
    for (name, band) in [("LL", &bands.ll), ("LH", &bands.lh), ("HL", &bands.hl), ("HH", &bands.hh)] {
        check_grid(name, band.len(), bands.width, bands.height)?;
    }
    let height = bands.source_height;

    // Inverse column pass: each is height x sub_w
    let row_low = merge_columns(&bands.ll, &bands.lh, bands.width, bands.height, height, parallel);
    let row_high = merge_columns(&bands.hl, &bands.hh, bands.width, bands.height, height, parallel);

    // Inverse row pass
    Ok(merge_rows(&row_low, &row_high, bands.width, bands.source_width, parallel))
}

fn check_grid(name: &str, len: usize, width: usize, height: usize) -> Result<(), CodecError> {
    if width == 0 || height == 0 {
        return Err(CodecError::invalid_input(format!("{} is empty", name)));
    }
    match width.checked_mul(height) {
        Some(expected) if expected == len => Ok(()),
        _ => Err(CodecError::invalid_input(format!(
            "{} holds {} values, expected {}x{}",
            name, len, width, height
        ))),
    }
}

/// Applies [`forward`] to every `len`-sample row of `src`.
fn split_rows(src: &[f64], len: usize, half: usize, parallel: bool) -> (Vec<f64>, Vec<f64>) {
    let count = src.len() / len;
    let mut low = vec![0.0f64; count * half];
    let mut high = vec![0.0f64; count * half];

    if parallel {
        src.par_chunks(len)
            .zip(low.par_chunks_mut(half))
            .zip(high.par_chunks_mut(half))
            .for_each(|((s, l), h)| forward(s, l, h));
    } else {
        src.chunks(len)
            .zip(low.chunks_mut(half))
            .zip(high.chunks_mut(half))
            .for_each(|((s, l), h)| forward(s, l, h));
    }
    (low, high)
}

/// Applies [`inverse`] to every row pair, producing rows of `len` samples.
fn merge_rows(low: &[f64], high: &[f64], half: usize, len: usize, parallel: bool) -> Vec<f64> {
    let count = low.len() / half;
    let mut output = vec![0.0f64; count * len];

    if parallel {
        output
            .par_chunks_mut(len)
            .zip(low.par_chunks(half))
            .zip(high.par_chunks(half))
            .for_each(|((o, l), h)| inverse(l, h, o));
    } else {
        output
            .chunks_mut(len)
            .zip(low.chunks(half))
            .zip(high.chunks(half))
            .for_each(|((o, l), h)| inverse(l, h, o));
    }
    output
}

/// Column analogue of [`split_rows`] on a `width x height` grid.
///
/// Columns are transposed into rows so both passes share the same
/// contiguous, independently parallel inner loop.
fn split_columns(
    src: &[f64],
    width: usize,
    height: usize,
    half: usize,
    parallel: bool,
) -> (Vec<f64>, Vec<f64>) {
    let columns = transpose(src, width, height);
    let (low, high) = split_rows(&columns, height, half, parallel);
    (transpose(&low, half, width), transpose(&high, half, width))
}

/// Column analogue of [`merge_rows`]: `half`-row bands back to `height` rows.
fn merge_columns(
    low: &[f64],
    high: &[f64],
    width: usize,
    half: usize,
    height: usize,
    parallel: bool,
) -> Vec<f64> {
    let low_t = transpose(low, width, half);
    let high_t = transpose(high, width, half);
    let merged = merge_rows(&low_t, &high_t, half, height, parallel);
    transpose(&merged, height, width)
}

/// Transposes a row-major `width x height` grid into `height x width`.
fn transpose(src: &[f64], width: usize, height: usize) -> Vec<f64> {
    let mut out = vec![0.0f64; width * height];
    for y in 0..height {
        for x in 0..width {
            out[x * height + y] = src[y * width + x];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haar_roundtrip_even() {
        let input = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0];
        let mut l = vec![0.0f64; 4];
        let mut h = vec![0.0f64; 4];
        forward(&input, &mut l, &mut h);

        let mut output = vec![0.0f64; 8];
        inverse(&l, &h, &mut output);

        for i in 0..8 {
            assert!(
                (input[i] - output[i]).abs() < 1e-12,
                "Mismatch at {}: {} vs {}",
                i,
                input[i],
                output[i]
            );
        }
    }

    #[test]
    fn test_haar_odd_length_extension() {
        let input = [10.0, 20.0, 30.0, 40.0, 50.0];
        let mut l = vec![0.0f64; 3];
        let mut h = vec![0.0f64; 3];
        forward(&input, &mut l, &mut h);

        // The last pair is (50, 50)
        assert!((l[2] - 100.0 * FRAC_1_SQRT_2).abs() < 1e-12);
        assert_eq!(h[2], 0.0);

        let mut output = vec![0.0f64; 5];
        inverse(&l, &h, &mut output);
        for i in 0..5 {
            assert!((input[i] - output[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_haar_pair_values() {
        let mut l = [0.0f64; 1];
        let mut h = [0.0f64; 1];
        forward(&[3.0, 1.0], &mut l, &mut h);
        assert!((l[0] - 4.0 * FRAC_1_SQRT_2).abs() < 1e-12);
        assert!((h[0] - 2.0 * FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_subband_dimensions() {
        let data = vec![1.0f64; 7 * 5];
        let bands = decompose(&data, 7, 5, false).unwrap();
        assert_eq!((bands.width, bands.height), (4, 3));
        assert_eq!(bands.ll.len(), 12);
        assert_eq!(bands.hh.len(), 12);
    }

    #[test]
    fn test_constant_image_has_no_detail() {
        let data = vec![42.0f64; 6 * 4];
        let bands = decompose(&data, 6, 4, false).unwrap();
        assert_eq!(bands.retained_details(), 0);
        for &c in &bands.ll {
            // Two passes of 1/sqrt2 scaling over a 2x2 block
            assert!((c - 84.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_detail_orientation() {
        // Columns alternate, rows are constant: only the row-high bands react.
        let width = 4;
        let height = 4;
        let data: Vec<f64> = (0..width * height)
            .map(|i| if (i % width) % 2 == 0 { 10.0 } else { 0.0 })
            .collect();
        let bands = decompose(&data, width, height, false).unwrap();
        assert!(bands.hl.iter().all(|&c| c.abs() > 1.0));
        assert!(bands.lh.iter().all(|&c| c.abs() < 1e-12));
        assert!(bands.hh.iter().all(|&c| c.abs() < 1e-12));
    }

    #[test]
    fn test_decompose_reconstruct_odd() {
        let (width, height) = (9, 7);
        let data: Vec<f64> = (0..width * height).map(|i| ((i * 37) % 251) as f64).collect();
        let bands = decompose(&data, width, height, false).unwrap();
        let output = reconstruct(&bands, false).unwrap();
        assert_eq!(output.len(), data.len());
        for i in 0..data.len() {
            assert!((data[i] - output[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_parallel_passes_match() {
        let (width, height) = (33, 18);
        let data: Vec<f64> = (0..width * height).map(|i| ((i * 11) % 256) as f64).collect();
        let sequential = decompose(&data, width, height, false).unwrap();
        let parallel = decompose(&data, width, height, true).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(
            reconstruct(&sequential, false).unwrap(),
            reconstruct(&parallel, true).unwrap()
        );
    }

    #[test]
    fn test_threshold_leaves_ll() {
        let data: Vec<f64> = (0..16).map(|i| (i * 3 % 7) as f64).collect();
        let mut bands = decompose(&data, 4, 4, false).unwrap();
        let ll = bands.ll.clone();
        bands.threshold(1e9);
        assert_eq!(bands.ll, ll);
        assert_eq!(bands.retained_details(), 0);
    }

    #[test]
    fn test_decompose_rejects_bad_grid() {
        assert!(matches!(decompose(&[], 0, 0, false), Err(CodecError::InvalidInput(_))));
        assert!(matches!(decompose(&[1.0; 5], 2, 3, false), Err(CodecError::InvalidInput(_))));
        assert!(matches!(
            decompose(&[1.0], usize::MAX / 2 + 1, 2, false),
            Err(CodecError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_reconstruct_rejects_mismatched_bands() {
        let data = vec![1.0f64; 6 * 4];
        let bands = decompose(&data, 6, 4, false).unwrap();

        let mut short = bands.clone();
        short.hh.pop();
        assert!(matches!(reconstruct(&short, false), Err(CodecError::InvalidInput(_))));

        let mut resized = bands.clone();
        resized.source_width = 9;
        assert!(matches!(reconstruct(&resized, false), Err(CodecError::InvalidInput(_))));

        let mut empty = bands;
        empty.source_height = 0;
        assert!(matches!(reconstruct(&empty, false), Err(CodecError::InvalidInput(_))));
    }
}
