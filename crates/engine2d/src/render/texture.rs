//! Texture handles and sprite sheets

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Vec2, Vec2i};

/// Opaque texture identity issued by the graphics backend
///
/// The batcher only ever compares these for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u64);

/// Sampling filter used when uploading a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFilter {
    /// Bilinear filtering
    Linear,
    /// Nearest-neighbour filtering, for pixel art
    Nearest,
}

/// A texture uploaded to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Texture2D {
    /// Backend identity
    pub id: TextureId,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Texture2D {
    /// Size in pixels as a float vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// A texture split into a regular grid of equally sized sprites
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSet {
    texture: Texture2D,
    columns: u32,
    rows: u32,
    sprite_width: u32,
    sprite_height: u32,
}

impl TileSet {
    /// Split `texture` into `columns` x `rows` tiles
    pub fn new(texture: Texture2D, columns: u32, rows: u32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            texture,
            columns,
            rows,
            sprite_width: texture.width / columns,
            sprite_height: texture.height / rows,
        }
    }

    /// Underlying texture
    pub fn texture(&self) -> &Texture2D {
        &self.texture
    }

    /// Number of tile columns
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Size of one sprite in pixels
    pub fn sprite_size(&self) -> Vec2 {
        Vec2::new(self.sprite_width as f32, self.sprite_height as f32)
    }

    /// UV rectangle `(uv1, uv2)` of the tile at `(column, row)`
    pub fn uv_rect(&self, tile: Vec2i) -> (Vec2, Vec2) {
        let uv1 = Vec2::new(
            tile.x as f32 / self.columns as f32,
            tile.y as f32 / self.rows as f32,
        );
        let uv2 = uv1
            + Vec2::new(
                self.sprite_width as f32 / self.texture.width.max(1) as f32,
                self.sprite_height as f32 / self.texture.height.max(1) as f32,
            );
        (uv1, uv2)
    }
}
