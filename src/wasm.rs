//! WebAssembly bindings for dctwave-rs.
//!
//! This module provides JavaScript-compatible functions via wasm-bindgen
//! for use in browsers and Node.js. Pixels are row-major 8-bit grayscale.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
fn to_js(e: crate::CodecError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Block DCT round trip at quality 50.
///
/// # Arguments
/// * `pixels` - Grayscale samples, `width * height` bytes
/// * `block_size` - 8 uses the standard luminance table, other sizes a
///   uniform table with its DC step
///
/// # Returns
/// Reconstructed pixels as Uint8Array
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn compress_dct(pixels: &[u8], width: u32, height: u32, block_size: u32) -> Result<Vec<u8>, JsValue> {
    let table = crate::dct::QuantizationTable::for_block_size(block_size as usize, 50).map_err(to_js)?;
    let codec = crate::dct::BlockCodec::with_quantizer(block_size as usize, table).map_err(to_js)?;
    codec
        .compress_raw(pixels, width as usize, height as usize)
        .map(crate::GrayImage::into_pixels)
        .map_err(to_js)
}

/// Haar wavelet round trip with hard thresholding of the detail bands.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn compress_dwt(pixels: &[u8], width: u32, height: u32, threshold: f64) -> Result<Vec<u8>, JsValue> {
    crate::dwt::WaveletCodec::new(threshold)
        .and_then(|codec| codec.compress_raw(pixels, width as usize, height as usize))
        .map(crate::GrayImage::into_pixels)
        .map_err(to_js)
}

/// PSNR in decibels between two equally sized images (100 when identical).
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn psnr(original: &[u8], reconstructed: &[u8], width: u32, height: u32) -> Result<f64, JsValue> {
    let a = crate::GrayImage::new(width as usize, height as usize, original.to_vec()).map_err(to_js)?;
    let b = crate::GrayImage::new(width as usize, height as usize, reconstructed.to_vec()).map_err(to_js)?;
    crate::metrics::psnr(&a, &b).map_err(to_js)
}
