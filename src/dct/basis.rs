//! Orthonormal DCT-II basis matrices and the separable 2D transforms built on them.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use crate::error::CodecError;

/// An `N x N` orthonormal DCT-II basis stored row-major.
///
/// `B[i][j] = alpha(i) * cos(PI / N * (j + 0.5) * i)` with `alpha(0) = sqrt(1/N)`
/// and `alpha(i) = sqrt(2/N)` otherwise. Since the basis is orthonormal its
/// transpose is its inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformBasis {
    size: usize,
    matrix: Vec<f64>,
}

impl TransformBasis {
    pub fn new(size: usize) -> Result<Self, CodecError> {
        if size == 0 {
            return Err(CodecError::invalid_argument("transform size must be positive"));
        }
        let n = size as f64;
        let mut matrix = vec![0.0f64; size * size];
        for i in 0..size {
            let alpha = if i == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            for j in 0..size {
                matrix[i * size + j] = alpha * (PI / n * (j as f64 + 0.5) * i as f64).cos();
            }
        }
        Ok(Self { size, matrix })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.matrix[row * self.size + col]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.matrix
    }

    /// Largest absolute deviation of `B * B^T` from the identity matrix.
    pub fn orthonormality_error(&self) -> f64 {
        let n = self.size;
        let mut worst = 0.0f64;
        for i in 0..n {
            for j in 0..n {
                let dot: f64 = (0..n).map(|k| self.get(i, k) * self.get(j, k)).sum();
                let target = if i == j { 1.0 } else { 0.0 };
                worst = worst.max((dot - target).abs());
            }
        }
        worst
    }
}

/// `output = rows_basis * input * cols_basis^T` for a `rows x cols` block.
///
/// `scratch` and `output` must hold at least `rows * cols` values, where
/// `rows` and `cols` are the sizes of the two bases.
pub fn forward_2d(
    rows_basis: &TransformBasis,
    cols_basis: &TransformBasis,
    input: &[f64],
    scratch: &mut [f64],
    output: &mut [f64],
) {
    let rows = rows_basis.size();
    let cols = cols_basis.size();

    // scratch = B_r * X
    for i in 0..rows {
        for j in 0..cols {
            let mut sum = 0.0f64;
            for k in 0..rows {
                sum += rows_basis.get(i, k) * input[k * cols + j];
            }
            scratch[i * cols + j] = sum;
        }
    }
    // output = scratch * B_c^T
    for i in 0..rows {
        for j in 0..cols {
            let mut sum = 0.0f64;
            for k in 0..cols {
                sum += scratch[i * cols + k] * cols_basis.get(j, k);
            }
            output[i * cols + j] = sum;
        }
    }
}

/// `output = rows_basis^T * input * cols_basis`, the inverse of [`forward_2d`].
pub fn inverse_2d(
    rows_basis: &TransformBasis,
    cols_basis: &TransformBasis,
    input: &[f64],
    scratch: &mut [f64],
    output: &mut [f64],
) {
    let rows = rows_basis.size();
    let cols = cols_basis.size();

    // scratch = B_r^T * C
    for i in 0..rows {
        for j in 0..cols {
            let mut sum = 0.0f64;
            for k in 0..rows {
                sum += rows_basis.get(k, i) * input[k * cols + j];
            }
            scratch[i * cols + j] = sum;
        }
    }
    // output = scratch * B_c
    for i in 0..rows {
        for j in 0..cols {
            let mut sum = 0.0f64;
            for k in 0..cols {
                sum += scratch[i * cols + k] * cols_basis.get(k, j);
            }
            output[i * cols + j] = sum;
        }
    }
}

/// Bases for every block extent that occurs when tiling one image.
///
/// Holds the full block size plus the truncated extents of the right and
/// bottom edge blocks, so each basis is built once per image.
#[derive(Debug, Clone)]
pub struct BasisSet {
    bases: BTreeMap<usize, TransformBasis>,
}

impl BasisSet {
    pub fn for_image(block_size: usize, width: usize, height: usize) -> Result<Self, CodecError> {
        let mut bases = BTreeMap::new();
        // Full-size blocks only exist when the image spans a whole block.
        let full = if width >= block_size || height >= block_size { block_size } else { 0 };
        for extent in [full, width % block_size, height % block_size] {
            if extent != 0 && !bases.contains_key(&extent) {
                bases.insert(extent, TransformBasis::new(extent)?);
            }
        }
        Ok(Self { bases })
    }

    /// Basis for a block extent produced by tiling the image this set was built for.
    pub fn get(&self, extent: usize) -> &TransformBasis {
        // for_image inserts every extent the tiling can produce
        &self.bases[&extent]
    }

    pub fn extents(&self) -> impl Iterator<Item = usize> + '_ {
        self.bases.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_rejects_zero() {
        assert!(matches!(
            TransformBasis::new(0),
            Err(CodecError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_basis_orthonormal() {
        for n in [1, 2, 3, 4, 5, 8, 16] {
            let basis = TransformBasis::new(n).unwrap();
            assert!(
                basis.orthonormality_error() < 1e-6,
                "basis {} deviates by {}",
                n,
                basis.orthonormality_error()
            );
        }
    }

    #[test]
    fn test_basis_first_row_constant() {
        let basis = TransformBasis::new(8).unwrap();
        let expected = (1.0f64 / 8.0).sqrt();
        for j in 0..8 {
            assert!((basis.get(0, j) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_forward_inverse_rectangular() {
        let rows = TransformBasis::new(3).unwrap();
        let cols = TransformBasis::new(5).unwrap();
        let input: Vec<f64> = (0..15).map(|v| (v * 17 % 29) as f64).collect();
        let mut scratch = vec![0.0; 15];
        let mut coeffs = vec![0.0; 15];
        let mut output = vec![0.0; 15];

        forward_2d(&rows, &cols, &input, &mut scratch, &mut coeffs);
        inverse_2d(&rows, &cols, &coeffs, &mut scratch, &mut output);

        for i in 0..15 {
            assert!(
                (input[i] - output[i]).abs() < 1e-9,
                "Mismatch at {}: {} vs {}",
                i,
                input[i],
                output[i]
            );
        }
    }

    #[test]
    fn test_dc_coefficient_of_constant_block() {
        let basis = TransformBasis::new(8).unwrap();
        let input = [128.0f64; 64];
        let mut scratch = [0.0f64; 64];
        let mut coeffs = [0.0f64; 64];
        forward_2d(&basis, &basis, &input, &mut scratch, &mut coeffs);

        assert!((coeffs[0] - 1024.0).abs() < 1e-9);
        for (i, c) in coeffs.iter().enumerate().skip(1) {
            assert!(c.abs() < 1e-9, "AC coefficient {} is {}", i, c);
        }
    }

    #[test]
    fn test_basis_set_extents() {
        let set = BasisSet::for_image(8, 21, 16).unwrap();
        assert_eq!(set.extents().collect::<Vec<_>>(), vec![5, 8]);
        assert_eq!(set.get(5).size(), 5);

        let set = BasisSet::for_image(8, 3, 3).unwrap();
        assert_eq!(set.extents().collect::<Vec<_>>(), vec![3]);

        let set = BasisSet::for_image(1 << 40, 4, 6).unwrap();
        assert_eq!(set.extents().collect::<Vec<_>>(), vec![4, 6]);
    }
}
