//! PNG decoding into tightly packed RGBA8 pixels

use std::path::Path;

use image::DynamicImage;

use crate::assets::AssetError;
use crate::render::Rgba8;

/// Decoded pixels, four bytes each, rows top to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Pixel bytes
    pub data: Vec<u8>,
    /// Columns
    pub width: u32,
    /// Rows
    pub height: u32,
}

impl ImageData {
    /// Decode `path`, converting any source layout to RGBA8
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|e| AssetError::LoadFailed(format!("{}: {e}", path.display())))?;
        let image = Self::from_decoded(decoded);
        log::debug!("Decoded {} ({}x{})", path.display(), image.width, image.height);
        Ok(image)
    }

    /// Decode an encoded image already in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        image::load_from_memory(bytes)
            .map(Self::from_decoded)
            .map_err(|e| AssetError::LoadFailed(format!("in-memory image: {e}")))
    }

    fn from_decoded(decoded: DynamicImage) -> Self {
        let rgba = decoded.into_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            data: rgba.into_raw(),
            width,
            height,
        }
    }

    /// `width` x `height` image of a single colour
    pub fn solid_color(width: u32, height: u32, color: Rgba8) -> Self {
        let texel = [color.r, color.g, color.b, color.a];
        Self {
            data: texel.repeat(width as usize * height as usize),
            width,
            height,
        }
    }

    /// Colour at column `x`, row `y` counted from the top
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * 4;
        match self.data.get(start..start + 4)? {
            &[r, g, b, a] => Some(Rgba8::new(r, g, b, a)),
            _ => None,
        }
    }
}
