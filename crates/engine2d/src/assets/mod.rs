//! Texture loading
//!
//! PNG files are decoded with the `image` crate into RGBA8 and uploaded to
//! the graphics backend. Loaded textures are cached by the path they were
//! requested with.

mod image_loader;

pub use image_loader::ImageData;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::render::{GraphicsBackend, RenderError, Rgba8, Texture2D, TextureFilter, TextureId};

/// Asset loading errors
#[derive(Debug, Error)]
pub enum AssetError {
    /// No file at the path or under any search path
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The file could not be decoded
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// The backend rejected the upload
    #[error("Texture upload failed: {0}")]
    Upload(#[from] RenderError),
}

/// Texture loader with search paths and a path-keyed cache
#[derive(Debug, Default)]
pub struct AssetManager {
    search_paths: Vec<PathBuf>,
    textures: HashMap<PathBuf, Texture2D>,
    placeholder: Option<Texture2D>,
}

impl AssetManager {
    /// Manager resolving paths as given
    pub fn new() -> Self {
        Self::default()
    }

    /// Also look for relative paths under `dir`
    pub fn add_search_path(&mut self, dir: impl Into<PathBuf>) {
        self.search_paths.push(dir.into());
    }

    /// Locate `path` directly or under a search path, in insertion order
    pub fn resolve(&self, path: impl AsRef<Path>) -> Option<PathBuf> {
        let path = path.as_ref();
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        if path.is_absolute() {
            return None;
        }
        self.search_paths
            .iter()
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.is_file())
    }

    /// Decode and upload a PNG with linear filtering
    ///
    /// Repeated loads of the same path return the cached texture.
    pub fn load_png(&mut self, backend: &mut dyn GraphicsBackend, path: impl AsRef<Path>) -> Result<Texture2D, AssetError> {
        let path = path.as_ref();
        if let Some(texture) = self.textures.get(path) {
            return Ok(*texture);
        }

        let resolved = self
            .resolve(path)
            .ok_or_else(|| AssetError::NotFound(path.display().to_string()))?;
        let image = ImageData::from_file(&resolved)?;
        let texture = upload(backend, &image, TextureFilter::Linear)?;
        self.textures.insert(path.to_path_buf(), texture);
        Ok(texture)
    }

    /// Upload an in-memory image with nearest filtering, uncached
    pub fn texture_from_image(&mut self, backend: &mut dyn GraphicsBackend, image: &ImageData) -> Result<Texture2D, AssetError> {
        upload(backend, image, TextureFilter::Nearest)
    }

    /// Load a PNG, falling back to a 1x1 white texture on failure
    pub fn load_texture_or_placeholder(&mut self, backend: &mut dyn GraphicsBackend, path: impl AsRef<Path>) -> Texture2D {
        let path = path.as_ref();
        match self.load_png(backend, path) {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("Using placeholder for {}: {}", path.display(), e);
                self.placeholder(backend)
            }
        }
    }

    /// Shared 1x1 white texture
    pub fn placeholder(&mut self, backend: &mut dyn GraphicsBackend) -> Texture2D {
        if let Some(texture) = self.placeholder {
            return texture;
        }
        let texture = match upload(backend, &ImageData::solid_color(1, 1, Rgba8::WHITE), TextureFilter::Nearest) {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("Placeholder texture upload failed: {}", e);
                Texture2D {
                    id: TextureId(0),
                    width: 1,
                    height: 1,
                }
            }
        };
        self.placeholder = Some(texture);
        texture
    }

    /// Cached texture for `path`
    pub fn cached(&self, path: impl AsRef<Path>) -> Option<Texture2D> {
        self.textures.get(path.as_ref()).copied()
    }

    /// Number of cached textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

fn upload(backend: &mut dyn GraphicsBackend, image: &ImageData, filter: TextureFilter) -> Result<Texture2D, AssetError> {
    let id = backend.create_texture(image.width, image.height, &image.data, filter)?;
    Ok(Texture2D {
        id,
        width: image.width,
        height: image.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_load_png_uploads_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "crate.png", 3, 2);
        let mut backend = HeadlessBackend::new(100, 100);
        let recorder = backend.recorder();
        let mut assets = AssetManager::new();

        let first = assets.load_png(&mut backend, &path).unwrap();
        assert_eq!((first.width, first.height), (3, 2));
        let info = recorder.texture(first.id).unwrap();
        assert_eq!(info.filter, TextureFilter::Linear);

        let second = assets.load_png(&mut backend, &path).unwrap();
        assert_eq!(first, second);
        assert_eq!(assets.texture_count(), 1);
    }

    #[test]
    fn test_search_paths_resolve_relative_names() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "logo.png", 1, 1);
        let mut assets = AssetManager::new();
        assert_eq!(assets.resolve("logo.png"), None);

        assets.add_search_path(dir.path());
        assert_eq!(assets.resolve("logo.png"), Some(dir.path().join("logo.png")));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let mut backend = HeadlessBackend::new(100, 100);
        let mut assets = AssetManager::new();
        let result = assets.load_png(&mut backend, "definitely/not/here.png");
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_placeholder_is_white_and_shared() {
        let mut backend = HeadlessBackend::new(100, 100);
        let recorder = backend.recorder();
        let mut assets = AssetManager::new();

        let a = assets.load_texture_or_placeholder(&mut backend, "missing.png");
        let b = assets.load_texture_or_placeholder(&mut backend, "also-missing.png");
        assert_eq!(a, b);
        assert_eq!((a.width, a.height), (1, 1));
        assert_eq!(recorder.texture(a.id).unwrap().filter, TextureFilter::Nearest);
    }

    #[test]
    fn test_texture_from_image_uses_nearest_filtering() {
        let mut backend = HeadlessBackend::new(100, 100);
        let recorder = backend.recorder();
        let mut assets = AssetManager::new();
        let texture = assets
            .texture_from_image(&mut backend, &ImageData::solid_color(2, 2, Rgba8::BLACK))
            .unwrap();
        assert_eq!(recorder.texture(texture.id).unwrap().filter, TextureFilter::Nearest);
        assert_eq!(assets.texture_count(), 0);
    }
}
