//! Material system for sprites

use crate::render::backend::{RenderBackend, TextureHandle};
use crate::render::shader::ShaderProgram;

/// Default tint for sprites without a texture
pub const DEFAULT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Surface description for a sprite
///
/// A material without a texture falls back to uploading its flat color. The
/// sprite programs do not declare a color uniform, so that path only logs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Whole texture
    Textured {
        /// Texture to sample, if it loaded
        texture: Option<TextureHandle>,
        /// Fallback color
        color: [f32; 4],
    },
    /// Sprite-sheet texture split into a `dimension x dimension` grid
    Animated {
        /// Texture to sample, if it loaded
        texture: Option<TextureHandle>,
        /// Fallback color
        color: [f32; 4],
        /// Cells per row and column
        dimension: i32,
    },
}

impl Material {
    /// Plain textured material
    pub fn textured(texture: Option<TextureHandle>) -> Self {
        Self::Textured { texture, color: DEFAULT_COLOR }
    }

    /// Sprite-sheet material
    pub fn animated(texture: Option<TextureHandle>, dimension: i32) -> Self {
        Self::Animated { texture, color: DEFAULT_COLOR, dimension }
    }

    /// Texture, if any
    pub fn texture(&self) -> Option<TextureHandle> {
        match self {
            Self::Textured { texture, .. } | Self::Animated { texture, .. } => *texture,
        }
    }

    /// Bind the texture and sheet layout, or upload the fallback color
    pub fn upload_attributes(&self, backend: &mut dyn RenderBackend, shader: &ShaderProgram) {
        match *self {
            Self::Textured { texture: Some(texture), .. } => {
                shader.upload_sampler(backend);
                backend.bind_texture(0, texture);
            }
            Self::Animated { texture: Some(texture), dimension, .. } => {
                shader.upload_sampler(backend);
                backend.bind_texture(0, texture);
                shader.upload_dimension(backend, dimension);
            }
            Self::Textured { texture: None, color } | Self::Animated { texture: None, color, .. } => {
                shader.upload_color(backend, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{HeadlessBackend, ShaderLibrary};

    #[test]
    fn test_animated_uploads_dimension() {
        let mut backend = HeadlessBackend::new();
        let library = ShaderLibrary::compile(&mut backend).unwrap();
        let material = Material::animated(Some(TextureHandle(3)), 6);
        material.upload_attributes(&mut backend, &library.animated);

        assert_eq!(backend.uniform_int(library.animated.handle(), "dim"), Some(6));
        assert_eq!(backend.uniform_int(library.animated.handle(), "samplerUnit"), Some(0));
    }

    #[test]
    fn test_missing_texture_falls_back_to_color() {
        let mut backend = HeadlessBackend::new();
        let library = ShaderLibrary::compile(&mut backend).unwrap();
        let material = Material::textured(None);
        material.upload_attributes(&mut backend, &library.textured);

        assert_eq!(material.texture(), None);
        assert_eq!(backend.uniform_int(library.textured.handle(), "samplerUnit"), None);
    }
}
