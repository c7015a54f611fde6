//! Sprite geometry
//!
//! Three fixed vertex layouts: a unit triangle, a centered unit quad, and the
//! same quad with texture coordinates. Attribute location 0 carries positions,
//! location 1 carries texture coordinates.

use bytemuck::{Pod, Zeroable};

use crate::render::backend::{GeometryHandle, RenderBackend, Topology, VertexBuffer};
use crate::render::RenderResult;

/// Tightly packed 2D vertex attribute
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex2 {
    /// First component
    pub x: f32,
    /// Second component
    pub y: f32,
}

impl Vertex2 {
    /// Create a vertex attribute
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

const TRIANGLE_POSITIONS: [Vertex2; 3] = [
    Vertex2::new(0.0, 0.0),
    Vertex2::new(1.0, 0.0),
    Vertex2::new(0.0, 1.0),
];

const QUAD_POSITIONS: [Vertex2; 4] = [
    Vertex2::new(-0.5, -0.5),
    Vertex2::new(0.5, -0.5),
    Vertex2::new(-0.5, 0.5),
    Vertex2::new(0.5, 0.5),
];

const QUAD_TEX_COORDS: [Vertex2; 4] = [
    Vertex2::new(0.0, 0.0),
    Vertex2::new(1.0, 0.0),
    Vertex2::new(0.0, 1.0),
    Vertex2::new(1.0, 1.0),
];

/// Which fixed layout a geometry uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    /// Single triangle drawn as a list
    Triangle,
    /// Untextured quad drawn as a strip
    Quad,
    /// Quad with texture coordinates, drawn with alpha blending
    TexturedQuad,
}

impl GeometryKind {
    /// Vertex positions
    pub fn positions(self) -> &'static [Vertex2] {
        match self {
            Self::Triangle => &TRIANGLE_POSITIONS,
            Self::Quad | Self::TexturedQuad => &QUAD_POSITIONS,
        }
    }

    /// Texture coordinates, if the layout has them
    pub fn tex_coords(self) -> Option<&'static [Vertex2]> {
        match self {
            Self::TexturedQuad => Some(&QUAD_TEX_COORDS),
            Self::Triangle | Self::Quad => None,
        }
    }

    /// Primitive assembly mode
    pub fn topology(self) -> Topology {
        match self {
            Self::Triangle => Topology::Triangles,
            Self::Quad | Self::TexturedQuad => Topology::TriangleStrip,
        }
    }

    /// Number of vertices per draw
    pub fn vertex_count(self) -> u32 {
        self.positions().len() as u32
    }

    /// Whether transparent pixels need blending
    pub fn blended(self) -> bool {
        matches!(self, Self::TexturedQuad)
    }
}

/// Uploaded geometry
///
/// Cheap to copy; every sprite shares the one textured quad created at scene
/// start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    kind: GeometryKind,
    handle: GeometryHandle,
}

impl Geometry {
    /// Upload the vertex streams for a layout
    pub fn create(backend: &mut dyn RenderBackend, kind: GeometryKind) -> RenderResult<Self> {
        let positions: &[u8] = bytemuck::cast_slice(kind.positions());
        let mut buffers = vec![VertexBuffer { location: 0, components: 2, data: positions }];
        if let Some(tex_coords) = kind.tex_coords() {
            buffers.push(VertexBuffer { location: 1, components: 2, data: bytemuck::cast_slice(tex_coords) });
        }

        let handle = backend.create_geometry(&buffers)?;
        log::debug!("Created {:?} geometry {:?}", kind, handle);
        Ok(Self { kind, handle })
    }

    /// Layout of this geometry
    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    /// Backend handle
    pub fn handle(&self) -> GeometryHandle {
        self.handle
    }

    /// Issue the draw call
    pub fn draw(&self, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        backend.draw(self.handle, self.kind.topology(), self.kind.vertex_count(), self.kind.blended())
    }
}
