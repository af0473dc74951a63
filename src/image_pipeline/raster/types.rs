//! Raster buffer types shared by every fusion stage

use crate::image_pipeline::common::error::{FusionError, Result};

/// 8-bit interleaved RGB raster, as delivered by a camera or a pole-mask file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<u8>,
}

impl RgbImageData {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        check_len(width, height, 3, data.len())?;
        Ok(Self { width, height, data })
    }

    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        Self {
            width,
            height,
            data: rgb.repeat(width * height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * 3;
        self.data[i..i + 3].copy_from_slice(&rgb);
    }
}

/// 8-bit interleaved RGBA working image.
///
/// The alpha channel carries per-pixel validity: 255 is a fully trusted
/// pixel, 0 is a pixel that must not contribute to the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// RGBA pixel data interleaved [R, G, B, A, R, G, B, A, ...]
    pub data: Vec<u8>,
}

impl RgbaImageData {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        check_len(width, height, 4, data.len())?;
        Ok(Self { width, height, data })
    }

    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            data: rgba.repeat(width * height),
        }
    }

    /// Zero-sized image, used where no previous frame exists.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// Adds a fully opaque alpha channel to an RGB image.
    pub fn from_rgb_opaque(rgb: &RgbImageData) -> Self {
        let data = rgb
            .data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
            .collect();
        Self {
            width: rgb.width,
            height: rgb.height,
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn same_size(&self, other: &RgbaImageData) -> bool {
        self.dimensions() == other.dimensions()
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let i = (y * self.width + x) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    pub fn alpha(&self, x: usize, y: usize) -> u8 {
        self.data[(y * self.width + x) * 4 + 3]
    }

    /// Rotates the image by 180°, i.e. flips both axes.
    pub fn rotate_180(&mut self) {
        let pixels = self.width * self.height;
        for i in 0..pixels / 2 {
            let j = pixels - 1 - i;
            for c in 0..4 {
                self.data.swap(i * 4 + c, j * 4 + c);
            }
        }
    }
}

fn check_len(width: usize, height: usize, channels: usize, actual: usize) -> Result<()> {
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| FusionError::Decode(format!("image size overflow: {}x{}", width, height)))?;
    if expected != actual {
        return Err(FusionError::Decode(format!(
            "buffer length {} does not match {}x{}x{}",
            actual, width, height, channels
        )));
    }
    Ok(())
}

/// TIFF compression methods used for persisted artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}
