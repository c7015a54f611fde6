//! Backend abstraction traits for the rendering system
//!
//! This module defines the contract a graphics backend must implement so the
//! sprite layer can compile programs, upload resources and issue draws.

use std::fmt;

use crate::assets::ImageData;
use crate::foundation::math::Mat4;
use crate::render::RenderResult;

/// Handle to a linked shader program stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Handle to a 2D texture stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Handle to uploaded vertex data (a vertex array object and its buffers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u32);

/// Shader pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage
    Vertex,
    /// Fragment stage
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "Vertex"),
            Self::Fragment => write!(f, "Fragment"),
        }
    }
}

/// Primitive assembly mode for a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Independent triangles, three vertices each
    Triangles,
    /// Triangle strip
    TriangleStrip,
}

/// One tightly packed float attribute stream
#[derive(Debug, Clone, Copy)]
pub struct VertexBuffer<'a> {
    /// Attribute location the stream feeds
    pub location: u32,
    /// Float components per vertex
    pub components: u32,
    /// Raw little-endian float data
    pub data: &'a [u8],
}

impl VertexBuffer<'_> {
    /// Number of vertices in the stream
    pub fn vertex_count(&self) -> usize {
        let stride = self.components as usize * std::mem::size_of::<f32>();
        if stride == 0 {
            0
        } else {
            self.data.len() / stride
        }
    }
}

/// Main rendering backend trait
///
/// Uniform uploads look the uniform up by name in the given program and fail
/// with [`crate::render::RenderError::UniformBinding`] when it does not exist.
pub trait RenderBackend {
    /// Start a frame by clearing the color target
    fn clear(&mut self, color: [f32; 4]);

    /// Compile both stages and link them into a program
    fn compile_program(&mut self, vertex_source: &str, fragment_source: &str) -> RenderResult<ProgramHandle>;

    /// Make a program current for subsequent uploads and draws
    fn use_program(&mut self, program: ProgramHandle);

    /// Upload RGBA pixel data as a 2D texture
    fn create_texture(&mut self, image: &ImageData) -> RenderResult<TextureHandle>;

    /// Bind a texture to a texture unit
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    /// Upload vertex attribute streams
    fn create_geometry(&mut self, buffers: &[VertexBuffer<'_>]) -> RenderResult<GeometryHandle>;

    /// Set a 4x4 matrix uniform
    fn upload_mat4(&mut self, program: ProgramHandle, name: &str, value: &Mat4) -> RenderResult<()>;

    /// Set an integer uniform
    fn upload_int(&mut self, program: ProgramHandle, name: &str, value: i32) -> RenderResult<()>;

    /// Set a vec4 uniform
    fn upload_vec4(&mut self, program: ProgramHandle, name: &str, value: [f32; 4]) -> RenderResult<()>;

    /// Draw `vertex_count` vertices of a geometry with the current program
    fn draw(&mut self, geometry: GeometryHandle, topology: Topology, vertex_count: u32, blend: bool) -> RenderResult<()>;
}
