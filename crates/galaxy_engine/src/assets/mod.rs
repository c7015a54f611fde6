//! Asset management system
//!
//! Sprites reference textures by file name. [`TextureCache`] decodes each
//! file once and hands out the backend handle on every later request.

pub mod image_loader;

pub use image_loader::ImageData;

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::render::{RenderBackend, TextureHandle};

/// Texture handles keyed by file name, relative to one directory
#[derive(Debug, Clone)]
pub struct TextureCache {
    root: PathBuf,
    entries: HashMap<String, Option<TextureHandle>>,
}

impl TextureCache {
    /// Cache resolving names against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), entries: HashMap::new() }
    }

    /// Load a texture, or return the cached handle
    ///
    /// Failures are logged and remembered, so a missing file is reported
    /// once and resolves to `None` afterwards.
    pub fn load(&mut self, backend: &mut dyn RenderBackend, name: &str) -> Option<TextureHandle> {
        if let Some(entry) = self.entries.get(name) {
            return *entry;
        }

        let path = self.root.join(name);
        let handle = match ImageData::from_file(&path)
            .map_err(|e| e.to_string())
            .and_then(|image| backend.create_texture(&image).map_err(|e| e.to_string()))
        {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::error!("Texture {} unavailable: {}", path.display(), err);
                None
            }
        };
        self.entries.insert(name.to_string(), handle);
        handle
    }

    /// Cached handle without loading
    pub fn get(&self, name: &str) -> Option<TextureHandle> {
        self.entries.get(name).copied().flatten()
    }

    /// Number of names requested so far, loaded or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been requested
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;

    #[test]
    fn test_missing_file_is_cached_as_none() {
        let mut backend = HeadlessBackend::new();
        let mut cache = TextureCache::new("definitely/not/a/dir");
        assert_eq!(cache.load(&mut backend, "ghost.png"), None);
        assert_eq!(cache.load(&mut backend, "ghost.png"), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(backend.texture_count(), 0);
    }

    #[test]
    fn test_png_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("galaxy_textures_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        image::RgbaImage::from_pixel(2, 3, image::Rgba([1, 2, 3, 4]))
            .save(dir.join("pixel.png"))
            .unwrap();

        let mut backend = HeadlessBackend::new();
        let mut cache = TextureCache::new(&dir);
        let handle = cache.load(&mut backend, "pixel.png");
        let again = cache.load(&mut backend, "pixel.png");
        std::fs::remove_dir_all(&dir).ok();

        assert!(handle.is_some());
        assert_eq!(again, handle);
        assert_eq!(cache.get("pixel.png"), handle);
        assert_eq!(backend.texture_count(), 1);
    }
}
