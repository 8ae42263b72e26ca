//! Haar wavelet subband codec.
//!
//! - `haar`: 1D/2D single-level Haar analysis and synthesis, `Subbands`.
//! - `codec`: detail thresholding and the 8-bit round trip.

pub mod codec;
pub mod haar;

pub use codec::{WaveletCodec, compress_dwt};
pub use haar::Subbands;
