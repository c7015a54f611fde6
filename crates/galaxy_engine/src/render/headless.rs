//! In-memory render backend
//!
//! Records every draw call instead of rasterizing. Uniform lookup mirrors a
//! real driver closely enough for the sprite layer: uniform names are parsed
//! out of the shader sources, so uploading a uniform a program does not
//! declare fails the same way it would on a GPU.

use std::collections::HashMap;

use crate::assets::ImageData;
use crate::foundation::math::Mat4;
use crate::render::backend::{
    GeometryHandle, ProgramHandle, RenderBackend, ShaderStage, TextureHandle, Topology, VertexBuffer,
};
use crate::render::{RenderError, RenderResult};

/// A draw call as the backend saw it
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Program current at draw time
    pub program: Option<ProgramHandle>,
    /// Texture bound to unit 0
    pub texture: Option<TextureHandle>,
    /// Geometry drawn
    pub geometry: GeometryHandle,
    /// Primitive assembly mode
    pub topology: Topology,
    /// Vertices submitted
    pub vertex_count: u32,
    /// Whether alpha blending was enabled
    pub blend: bool,
    /// Value of the `M` uniform in the current program
    pub transform: Option<Mat4>,
    /// Value of the `subTextureID` uniform in the current program
    pub sub_texture: Option<i32>,
}

#[derive(Debug, Default)]
struct ProgramRecord {
    uniforms: Vec<String>,
    mat4s: HashMap<String, Mat4>,
    ints: HashMap<String, i32>,
    vec4s: HashMap<String, [f32; 4]>,
}

#[derive(Debug)]
struct GeometryRecord {
    streams: usize,
    vertices: usize,
}

/// Recording backend for tests and the headless driver
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    programs: Vec<ProgramRecord>,
    textures: Vec<(u32, u32)>,
    geometries: Vec<GeometryRecord>,
    current_program: Option<ProgramHandle>,
    bound_textures: HashMap<u32, TextureHandle>,
    draw_calls: Vec<DrawCall>,
    clear_color: Option<[f32; 4]>,
    frames: u64,
    failing_stage: Option<ShaderStage>,
}

impl HeadlessBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose compiler rejects every source for the given stage
    pub fn failing_compilation(stage: ShaderStage) -> Self {
        Self { failing_stage: Some(stage), ..Self::default() }
    }

    /// Draw calls recorded since the last [`Self::take_draw_calls`]
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    /// Drain the recorded draw calls
    pub fn take_draw_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.draw_calls)
    }

    /// Number of frames started with [`RenderBackend::clear`]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Color of the most recent clear
    pub fn clear_color(&self) -> Option<[f32; 4]> {
        self.clear_color
    }

    /// Number of textures created
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of programs linked
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// Active uniform names of a program
    pub fn program_uniforms(&self, program: ProgramHandle) -> Option<&[String]> {
        self.programs.get(program.0 as usize).map(|record| record.uniforms.as_slice())
    }

    /// Last integer uploaded to a program uniform
    pub fn uniform_int(&self, program: ProgramHandle, name: &str) -> Option<i32> {
        self.programs.get(program.0 as usize)?.ints.get(name).copied()
    }

    /// Last matrix uploaded to a program uniform
    pub fn uniform_mat4(&self, program: ProgramHandle, name: &str) -> Option<Mat4> {
        self.programs.get(program.0 as usize)?.mat4s.get(name).copied()
    }

    /// Last vec4 uploaded to a program uniform
    pub fn uniform_vec4(&self, program: ProgramHandle, name: &str) -> Option<[f32; 4]> {
        self.programs.get(program.0 as usize)?.vec4s.get(name).copied()
    }

    /// Attribute stream count of a geometry
    pub fn geometry_streams(&self, geometry: GeometryHandle) -> Option<usize> {
        self.geometries.get(geometry.0 as usize).map(|record| record.streams)
    }

    fn compile_stage(&self, stage: ShaderStage, source: &str) -> RenderResult<()> {
        if self.failing_stage == Some(stage) {
            return Err(RenderError::ShaderCompile { stage, log: "compiler rejected source".to_string() });
        }
        if !source.contains("void main") {
            return Err(RenderError::ShaderCompile { stage, log: "no entry point `main`".to_string() });
        }
        Ok(())
    }

    fn program_mut(&mut self, program: ProgramHandle, name: &str) -> RenderResult<&mut ProgramRecord> {
        let record = self
            .programs
            .get_mut(program.0 as usize)
            .ok_or_else(|| RenderError::InvalidHandle(format!("{program:?}")))?;
        if record.uniforms.iter().any(|uniform| uniform == name) {
            Ok(record)
        } else {
            Err(RenderError::UniformBinding { uniform: name.to_string() })
        }
    }
}

/// Names declared with a storage qualifier, e.g. every `uniform` in a source
fn declarations(source: &str, qualifier: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.as_slice() {
                [q, _ty, name, ..] if *q == qualifier => {
                    let name = name.trim_end_matches(';');
                    Some(name.split('[').next().unwrap_or(name).to_string())
                }
                _ => None,
            }
        })
        .collect()
}

impl RenderBackend for HeadlessBackend {
    fn clear(&mut self, color: [f32; 4]) {
        self.clear_color = Some(color);
        self.frames += 1;
    }

    fn compile_program(&mut self, vertex_source: &str, fragment_source: &str) -> RenderResult<ProgramHandle> {
        self.compile_stage(ShaderStage::Vertex, vertex_source)?;
        self.compile_stage(ShaderStage::Fragment, fragment_source)?;

        let outputs = declarations(vertex_source, "out");
        if let Some(missing) = declarations(fragment_source, "in")
            .into_iter()
            .find(|input| !outputs.contains(input))
        {
            return Err(RenderError::ShaderLink(format!(
                "fragment input `{missing}` has no matching vertex output"
            )));
        }

        let mut uniforms = declarations(vertex_source, "uniform");
        for uniform in declarations(fragment_source, "uniform") {
            if !uniforms.contains(&uniform) {
                uniforms.push(uniform);
            }
        }

        let handle = ProgramHandle(self.programs.len() as u32);
        log::trace!("Linked program {:?} with uniforms {:?}", handle, uniforms);
        self.programs.push(ProgramRecord { uniforms, ..ProgramRecord::default() });
        Ok(handle)
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.current_program = Some(program);
    }

    fn create_texture(&mut self, image: &ImageData) -> RenderResult<TextureHandle> {
        let expected = image.width as usize * image.height as usize * 4;
        if image.channels != 4 || image.data.len() != expected {
            return Err(RenderError::AssetLoad(format!(
                "expected {}x{} RGBA pixels, got {} bytes",
                image.width,
                image.height,
                image.data.len()
            )));
        }
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push((image.width, image.height));
        Ok(handle)
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        self.bound_textures.insert(unit, texture);
    }

    fn create_geometry(&mut self, buffers: &[VertexBuffer<'_>]) -> RenderResult<GeometryHandle> {
        let vertices = buffers.first().map_or(0, VertexBuffer::vertex_count);
        if vertices == 0 || buffers.iter().any(|buffer| buffer.vertex_count() != vertices) {
            return Err(RenderError::AssetLoad("vertex streams are empty or mismatched".to_string()));
        }
        let handle = GeometryHandle(self.geometries.len() as u32);
        self.geometries.push(GeometryRecord { streams: buffers.len(), vertices });
        Ok(handle)
    }

    fn upload_mat4(&mut self, program: ProgramHandle, name: &str, value: &Mat4) -> RenderResult<()> {
        self.program_mut(program, name)?.mat4s.insert(name.to_string(), *value);
        Ok(())
    }

    fn upload_int(&mut self, program: ProgramHandle, name: &str, value: i32) -> RenderResult<()> {
        self.program_mut(program, name)?.ints.insert(name.to_string(), value);
        Ok(())
    }

    fn upload_vec4(&mut self, program: ProgramHandle, name: &str, value: [f32; 4]) -> RenderResult<()> {
        self.program_mut(program, name)?.vec4s.insert(name.to_string(), value);
        Ok(())
    }

    fn draw(&mut self, geometry: GeometryHandle, topology: Topology, vertex_count: u32, blend: bool) -> RenderResult<()> {
        let record = self
            .geometries
            .get(geometry.0 as usize)
            .ok_or_else(|| RenderError::InvalidHandle(format!("{geometry:?}")))?;
        if vertex_count as usize > record.vertices {
            return Err(RenderError::InvalidHandle(format!(
                "{geometry:?} has {} vertices, draw asked for {vertex_count}",
                record.vertices
            )));
        }

        let program = self.current_program;
        let record = program.and_then(|handle| self.programs.get(handle.0 as usize));
        self.draw_calls.push(DrawCall {
            program,
            texture: self.bound_textures.get(&0).copied(),
            geometry,
            topology,
            vertex_count,
            blend,
            transform: record.and_then(|r| r.mat4s.get("M").copied()),
            sub_texture: record.and_then(|r| r.ints.get("subTextureID").copied()),
        });
        Ok(())
    }
}
