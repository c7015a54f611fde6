//! # Rendering System
//!
//! A thin sprite layer over a fixed-function style graphics backend. The
//! game never talks to a graphics API directly; it hands the backend:
//!
//! - shader programs compiled from a vertex and a fragment source,
//! - textures decoded by the asset layer,
//! - tightly packed vertex buffers,
//! - per-draw uniforms (a 4x4 transform, integers for sprite-sheet frames),
//! - draw calls for triangle lists and strips.
//!
//! ## Error policy
//!
//! Shader compilation, linking and program creation failures are fatal and
//! are returned to the caller. Missing uniforms are reported through `log`
//! and the draw continues, so a broken material degrades instead of stopping
//! the frame.

pub mod backend;
pub mod headless;
pub mod geometry;
pub mod shader;
pub mod material;
pub mod mesh;
pub mod camera;

pub use backend::{
    GeometryHandle, ProgramHandle, RenderBackend, ShaderStage, TextureHandle, Topology, VertexBuffer,
};
pub use camera::Camera2D;
pub use geometry::{Geometry, GeometryKind};
pub use headless::{DrawCall, HeadlessBackend};
pub use material::Material;
pub use mesh::Mesh;
pub use shader::{ShaderKind, ShaderLibrary, ShaderProgram};

use thiserror::Error;

/// High-level rendering error types
///
/// Backend implementations translate their native failures into these
/// variants so callers can apply one error policy regardless of the API
/// underneath.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A texture or other GPU resource could not be created from asset data
    #[error("Asset load failed: {0}")]
    AssetLoad(String),

    /// A shader stage failed to compile
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile {
        /// Stage that failed
        stage: ShaderStage,
        /// Compiler output
        log: String,
    },

    /// The program object could not be created
    #[error("Shader program creation failed: {0}")]
    ProgramCreation(String),

    /// The compiled stages could not be linked into a program
    #[error("Failed to link shader program: {0}")]
    ShaderLink(String),

    /// A uniform does not exist in the bound program
    #[error("uniform {uniform} cannot be set")]
    UniformBinding {
        /// Name of the uniform that was looked up
        uniform: String,
    },

    /// A handle does not refer to a live backend resource
    #[error("Invalid resource handle: {0}")]
    InvalidHandle(String),
}

impl RenderError {
    /// Whether this error must stop the application
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ShaderCompile { .. } | Self::ProgramCreation(_) | Self::ShaderLink(_)
        )
    }
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(RenderError::ShaderLink("x".into()).is_fatal());
        assert!(RenderError::ProgramCreation("x".into()).is_fatal());
        assert!(!RenderError::UniformBinding { uniform: "M".into() }.is_fatal());
        assert!(!RenderError::AssetLoad("boom.png".into()).is_fatal());
    }

    #[test]
    fn test_uniform_message_matches_diagnostic() {
        let err = RenderError::UniformBinding { uniform: "vertexColor".into() };
        assert_eq!(err.to_string(), "uniform vertexColor cannot be set");
    }
}
