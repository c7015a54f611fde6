//! Sprite shader programs
//!
//! Two GLSL 4.10 programs cover every sprite: a plain textured quad and a
//! sprite-sheet variant that samples one cell of a `dim x dim` atlas. Uniform
//! uploads never fail the frame; a missing uniform is logged and skipped.

use crate::foundation::math::Mat4;
use crate::render::backend::{ProgramHandle, RenderBackend};
use crate::render::{RenderError, RenderResult};

/// Frames in a sprite-sheet animation cycle
pub const ANIMATION_FRAMES: i32 = 36;

/// Animation frames advanced per time unit
pub const FRAMES_PER_TIME_UNIT: f32 = 10.0;

const SPRITE_VERTEX_SOURCE: &str = r"
#version 410
precision highp float;

in vec2 vertexPosition;
in vec2 vertexTexCoord;
uniform mat4 M;
out vec2 texCoord;

void main()
{
    texCoord = vertexTexCoord;
    gl_Position = vec4(vertexPosition.x, vertexPosition.y, 0, 1) * M;
}
";

const TEXTURED_FRAGMENT_SOURCE: &str = r"
#version 410
precision highp float;

uniform sampler2D samplerUnit;
in vec2 texCoord;
out vec4 fragmentColor;

void main()
{
    fragmentColor = texture(samplerUnit, texCoord);
}
";

const ANIMATED_FRAGMENT_SOURCE: &str = r"
#version 410
precision highp float;

uniform sampler2D samplerUnit;
uniform int subTextureID;
uniform int dim;
in vec2 texCoord;
out vec4 fragmentColor;

void main()
{
    int i = subTextureID % dim;
    int j = subTextureID / dim;
    fragmentColor = texture(samplerUnit, (vec2(i, j) + texCoord) / dim);
}
";

/// Sprite frame for a clock value: `floor(10 t) mod 36`
pub fn animation_frame(time: f32) -> i32 {
    ((time * FRAMES_PER_TIME_UNIT).floor() as i32).rem_euclid(ANIMATION_FRAMES)
}

/// Which sprite program to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Whole texture on a quad
    Textured,
    /// One cell of a sprite-sheet, selected by time
    Animated,
}

impl ShaderKind {
    /// Vertex and fragment sources
    pub fn sources(self) -> (&'static str, &'static str) {
        match self {
            Self::Textured => (SPRITE_VERTEX_SOURCE, TEXTURED_FRAGMENT_SOURCE),
            Self::Animated => (SPRITE_VERTEX_SOURCE, ANIMATED_FRAGMENT_SOURCE),
        }
    }
}

/// A linked sprite program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram {
    kind: ShaderKind,
    handle: ProgramHandle,
}

impl ShaderProgram {
    /// Compile and link the program for a kind
    pub fn compile(backend: &mut dyn RenderBackend, kind: ShaderKind) -> RenderResult<Self> {
        let (vertex, fragment) = kind.sources();
        match backend.compile_program(vertex, fragment) {
            Ok(handle) => {
                log::debug!("Compiled {:?} shader as {:?}", kind, handle);
                Ok(Self { kind, handle })
            }
            Err(err) => {
                log::error!("{:?} shader: {}", kind, err);
                Err(err)
            }
        }
    }

    /// Program kind
    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    /// Backend handle
    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    /// Make this program current
    pub fn bind(&self, backend: &mut dyn RenderBackend) {
        backend.use_program(self.handle);
    }

    /// Upload the model-view matrix `M`
    pub fn upload_transform(&self, backend: &mut dyn RenderBackend, transform: &Mat4) {
        report(backend.upload_mat4(self.handle, "M", transform));
    }

    /// Point the sampler at texture unit 0
    pub fn upload_sampler(&self, backend: &mut dyn RenderBackend) {
        report(backend.upload_int(self.handle, "samplerUnit", 0));
    }

    /// Upload a flat color; neither sprite program declares one
    pub fn upload_color(&self, backend: &mut dyn RenderBackend, color: [f32; 4]) {
        report(backend.upload_vec4(self.handle, "vertexColor", color));
    }

    /// Select a sprite-sheet cell
    pub fn upload_sub_texture(&self, backend: &mut dyn RenderBackend, index: i32) {
        if self.kind == ShaderKind::Animated {
            report(backend.upload_int(self.handle, "subTextureID", index));
        }
    }

    /// Upload the sprite-sheet grid dimension
    pub fn upload_dimension(&self, backend: &mut dyn RenderBackend, dim: i32) {
        if self.kind == ShaderKind::Animated {
            report(backend.upload_int(self.handle, "dim", dim));
        }
    }

    /// Advance the animation to the frame for `time`
    pub fn upload_time(&self, backend: &mut dyn RenderBackend, time: f32) {
        if self.kind == ShaderKind::Animated {
            self.upload_sub_texture(backend, animation_frame(time));
        }
    }
}

fn report(result: RenderResult<()>) {
    match result {
        Ok(()) => {}
        Err(err @ RenderError::UniformBinding { .. }) => log::warn!("{}", err),
        Err(err) => log::error!("Uniform upload failed: {}", err),
    }
}

/// The programs shared by every sprite in a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderLibrary {
    /// Plain textured program
    pub textured: ShaderProgram,
    /// Sprite-sheet program
    pub animated: ShaderProgram,
}

impl ShaderLibrary {
    /// Compile both programs; any failure is fatal to the caller
    pub fn compile(backend: &mut dyn RenderBackend) -> RenderResult<Self> {
        Ok(Self {
            textured: ShaderProgram::compile(backend, ShaderKind::Textured)?,
            animated: ShaderProgram::compile(backend, ShaderKind::Animated)?,
        })
    }

    /// Program for a kind
    pub fn get(&self, kind: ShaderKind) -> &ShaderProgram {
        match kind {
            ShaderKind::Textured => &self.textured,
            ShaderKind::Animated => &self.animated,
        }
    }
}
