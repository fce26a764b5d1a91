//! Minimal PNG encoding for RGBA pixel buffers.
//!
//! Writes truecolor-with-alpha PNGs (color type 6, bit depth 8) with no
//! scanline filtering. Tiles are small and uniform enough that filter
//! heuristics buy little over plain zlib.

use crc32fast::Hasher;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PngError {
    #[error("pixel buffer is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        expected: usize,
        actual: usize,
        width: usize,
        height: usize,
    },

    #[error("compression failed: {0}")]
    Compression(#[from] std::io::Error),
}

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Encode an RGBA pixel buffer as a PNG image.
pub fn encode_png(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, PngError> {
    let expected = width * height * 4;
    if pixels.len() != expected {
        return Err(PngError::BufferSize {
            expected,
            actual: pixels.len(),
            width,
            height,
        });
    }

    // IHDR: dimensions, 8-bit depth, color type 6 (RGBA), no interlace.
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);

    // IDAT: zlib-compressed scanlines, each prefixed with filter type 0.
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    let stride = width * 4;
    for row in pixels.chunks_exact(stride) {
        encoder.write_all(&[0])?;
        encoder.write_all(row)?;
    }
    let idat = encoder.finish()?;

    let mut out = Vec::with_capacity(idat.len() + 64);
    out.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut out, b"IHDR", &ihdr);
    write_chunk(&mut out, b"IDAT", &idat);
    write_chunk(&mut out, b"IEND", &[]);
    Ok(out)
}

fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);

    let mut hasher = Hasher::new();
    hasher.update(kind);
    hasher.update(data);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
}
