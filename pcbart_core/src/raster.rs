//! Pixel buffers exchanged with the image loading and export layers.

use crate::{Color, Error, Result};

/// A decoded source image, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl SourceImage {
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self> {
        let expected = pixel_count(width, height);
        if pixels.len() != expected {
            return Err(Error::PixelCountMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// An image filled with a single color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; pixel_count(width, height)],
        }
    }

    /// Packed RGB, three bytes per pixel.
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        Self::from_packed(width, height, bytes, 3)
    }

    /// Packed RGBA, four bytes per pixel. Alpha is ignored.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        Self::from_packed(width, height, bytes, 4)
    }

    fn from_packed(width: u32, height: u32, bytes: &[u8], stride: usize) -> Result<Self> {
        if bytes.len() % stride != 0 {
            return Err(Error::PixelCountMismatch {
                expected: pixel_count(width, height),
                actual: bytes.len() / stride,
            });
        }
        let pixels = bytes
            .chunks_exact(stride)
            .map(|px| Color::rgb(px[0], px[1], px[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// A row-major RGBA8 raster handed to the export layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RgbaBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbaBuffer {
    pub const CHANNELS: usize = 4;

    /// A fully transparent black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; pixel_count(width, height) * Self::CHANNELS],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        let px = &self.data[i..i + Self::CHANNELS];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub(crate) fn row_len(&self) -> usize {
        self.width as usize * Self::CHANNELS
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

pub(crate) fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}
