//! Block DCT codec.
//!
//! - `basis`: orthonormal DCT-II basis matrices and separable 2D transforms.
//! - `quantization`: the standard luminance table, quality scaling and the
//!   `Quantizer` seam.
//! - `codec`: tiling, per-block transform/quantize round trip and reassembly.

pub mod basis;
pub mod codec;
pub mod quantization;

pub use basis::TransformBasis;
pub use codec::{BlockCodec, compress_dct};
pub use quantization::{Passthrough, QuantizationTable, Quantizer};
