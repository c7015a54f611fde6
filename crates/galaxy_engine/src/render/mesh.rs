//! Drawable pairing of geometry and material

use crate::render::backend::RenderBackend;
use crate::render::geometry::Geometry;
use crate::render::material::Material;
use crate::render::shader::ShaderProgram;
use crate::render::RenderResult;

/// Geometry drawn with a material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    /// Shared vertex data
    pub geometry: Geometry,
    /// Per-sprite surface
    pub material: Material,
}

impl Mesh {
    /// Pair a geometry with a material
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self { geometry, material }
    }

    /// Upload material attributes, then draw the geometry
    pub fn draw(&self, backend: &mut dyn RenderBackend, shader: &ShaderProgram) -> RenderResult<()> {
        self.material.upload_attributes(backend, shader);
        self.geometry.draw(backend)
    }
}
