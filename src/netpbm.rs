//! Minimal PGM (P2/P5) and raw 8-bit grayscale I/O.

use crate::error::CodecError;
use crate::image::GrayImage;

/// Returns true if `data` starts with a PGM magic number.
pub fn is_pgm(data: &[u8]) -> bool {
    data.starts_with(b"P5") || data.starts_with(b"P2")
}

/// Parses a binary (P5) or ASCII (P2) PGM with a maximum value up to 255.
///
/// Samples are rescaled to the 0-255 range when the maximum value is lower.
pub fn read_pgm(data: &[u8]) -> Result<GrayImage, CodecError> {
    let binary = match data.get(..2) {
        Some(b"P5") => true,
        Some(b"P2") => false,
        _ => return Err(CodecError::Format("missing P5/P2 magic number".into())),
    };

    let mut pos = 2;
    let width = read_header_value(data, &mut pos)?;
    let height = read_header_value(data, &mut pos)?;
    let maxval = read_header_value(data, &mut pos)?;
    if maxval == 0 || maxval > 255 {
        return Err(CodecError::Format(format!(
            "unsupported maximum value {}",
            maxval
        )));
    }

    let count = width
        .checked_mul(height)
        .ok_or_else(|| CodecError::Format("dimensions overflow".into()))?;

    let mut pixels = if binary {
        // Exactly one whitespace byte separates the header from the raster.
        let truncated =
            || CodecError::Format(format!("raster truncated, expected {} samples", count));
        let start = pos + 1;
        let end = start.checked_add(count).ok_or_else(truncated)?;
        data.get(start..end).ok_or_else(truncated)?.to_vec()
    } else {
        // Every sample takes at least one byte, so the header cannot claim more.
        let mut samples = Vec::with_capacity(count.min(data.len().saturating_sub(pos)));
        for _ in 0..count {
            let v = read_header_value(data, &mut pos)?;
            if v > maxval {
                return Err(CodecError::Format(format!(
                    "sample {} exceeds maximum value {}",
                    v, maxval
                )));
            }
            samples.push(v as u8);
        }
        samples
    };

    if maxval != 255 {
        for p in pixels.iter_mut() {
            *p = ((*p as usize * 255 + maxval / 2) / maxval).min(255) as u8;
        }
    }

    GrayImage::new(width, height, pixels)
}

/// Encodes an image as binary PGM (P5).
pub fn write_pgm(image: &GrayImage) -> Vec<u8> {
    let header = format!("P5\n{} {}\n255\n", image.width, image.height);
    let mut out = Vec::with_capacity(header.len() + image.pixels().len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(image.pixels());
    out
}

/// Wraps headerless 8-bit samples.
pub fn read_raw(data: &[u8], width: usize, height: usize) -> Result<GrayImage, CodecError> {
    GrayImage::new(width, height, data.to_vec())
}

/// Reads one unsigned decimal, skipping whitespace and `#` comments.
/// Leaves `pos` on the byte right after the number.
fn read_header_value(data: &[u8], pos: &mut usize) -> Result<usize, CodecError> {
    loop {
        match data.get(*pos) {
            Some(b'#') => {
                while let Some(&c) = data.get(*pos) {
                    if c == b'\n' {
                        break;
                    }
                    *pos += 1;
                }
            }
            Some(c) if c.is_ascii_whitespace() => *pos += 1,
            Some(_) => break,
            None => return Err(CodecError::Format("unexpected end of header".into())),
        }
    }

    let start = *pos;
    while data.get(*pos).is_some_and(|c| c.is_ascii_digit()) {
        *pos += 1;
    }
    if start == *pos {
        return Err(CodecError::Format(format!("expected a number at byte {}", start)));
    }
    std::str::from_utf8(&data[start..*pos])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| CodecError::Format(format!("number out of range at byte {}", start)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pgm_roundtrip() {
        let image = GrayImage::from_fn(5, 3, |x, y| (x * 40 + y) as u8).unwrap();
        let encoded = write_pgm(&image);
        assert!(encoded.starts_with(b"P5\n5 3\n255\n"));
        assert_eq!(read_pgm(&encoded).unwrap(), image);
    }

    #[test]
    fn test_ascii_pgm_with_comment() {
        let data = b"P2\n# a comment\n3 2\n255\n0 10 20\n30 40 255\n";
        let image = read_pgm(data).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.pixels(), &[0, 10, 20, 30, 40, 255]);
    }

    #[test]
    fn test_low_maxval_rescaled() {
        let data = b"P2 2 1 15 0 15";
        let image = read_pgm(data).unwrap();
        assert_eq!(image.pixels(), &[0, 255]);
    }

    #[test]
    fn test_truncated_raster() {
        let mut data = b"P5\n4 4\n255\n".to_vec();
        data.extend_from_slice(&[0u8; 10]);
        assert!(matches!(read_pgm(&data), Err(CodecError::Format(_))));
    }

    #[test]
    fn test_huge_header_without_samples() {
        let data = b"P2 100000000 100000000 255 0";
        assert!(matches!(read_pgm(data), Err(CodecError::Format(_))));
    }

    #[test]
    fn test_raster_end_overflow() {
        let data = format!("P5 {} 1 255 ", usize::MAX);
        assert!(matches!(read_pgm(data.as_bytes()), Err(CodecError::Format(_))));
    }

    #[test]
    fn test_rejects_wide_samples() {
        let data = b"P5\n1 1\n65535\n\0\0";
        assert!(matches!(read_pgm(data), Err(CodecError::Format(_))));
    }

    #[test]
    fn test_rejects_other_magic() {
        assert!(!is_pgm(b"P6\n"));
        assert!(matches!(read_pgm(b"P6\n1 1\n255\n\0\0\0"), Err(CodecError::Format(_))));
    }

    #[test]
    fn test_read_raw() {
        let image = read_raw(&[1, 2, 3, 4, 5, 6], 3, 2).unwrap();
        assert_eq!(image.row(1), &[4, 5, 6]);
        assert!(matches!(read_raw(&[1, 2, 3], 2, 2), Err(CodecError::InvalidInput(_))));
    }
}
