//! Material and uniform values for galaxy point clouds.
//!
//! The renderer owns shaders and pipelines; this module only produces the
//! values it needs: the `uTime`/`uSize` uniforms, the blend mode and the fixed
//! point-cloud render state (no depth writes, per-vertex colors).
//!
//! # Uniform Layout
//!
//! [`GalaxyUniforms`] is `#[repr(C)]` and padded to 16 bytes so it can be
//! uploaded as-is into a uniform buffer. The matching WGSL declaration is
//! [`GalaxyUniforms::WGSL_STRUCT`].

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// How overlapping particles are composited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Additive blending (default).
    ///
    /// Particle colors are added together, so dense regions glow.
    #[default]
    Additive,

    /// Standard alpha blending.
    Alpha,
}

/// Uniform block shared by both galaxy models.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GalaxyUniforms {
    /// Accumulated animation time in seconds.
    pub u_time: f32,
    /// Point size in physical pixels.
    pub u_size: f32,
    _pad: [f32; 2],
}

impl GalaxyUniforms {
    /// WGSL declaration matching the memory layout of this struct.
    pub const WGSL_STRUCT: &'static str = "struct GalaxyUniforms {
    u_time: f32,
    u_size: f32,
    _pad0: f32,
    _pad1: f32,
}";

    pub fn new(u_size: f32) -> Self {
        Self {
            u_time: 0.0,
            u_size,
            _pad: [0.0; 2],
        }
    }

    /// Raw bytes for GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Render state and uniforms for one galaxy.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub uniforms: GalaxyUniforms,
    pub blending: BlendMode,
    /// Always `false` for point clouds.
    pub depth_write: bool,
    /// Always `true`: colors come from the particle buffer.
    pub vertex_colors: bool,
}

impl Material {
    /// Build a material for a base point `size`, scaled by the display's
    /// pixel ratio.
    pub fn new(size: f32, pixel_ratio: f32, blending: BlendMode) -> Self {
        Self {
            uniforms: GalaxyUniforms::new(size * pixel_ratio),
            blending,
            depth_write: false,
            vertex_colors: true,
        }
    }

    /// Advance `uTime` by a frame delta given in milliseconds.
    #[inline]
    pub fn advance(&mut self, delta_ms: f32) {
        self.uniforms.u_time += delta_ms * 0.001;
    }

    /// Current `uTime` in seconds.
    #[inline]
    pub fn time(&self) -> f32 {
        self.uniforms.u_time
    }

    /// Current `uSize` in physical pixels.
    #[inline]
    pub fn size(&self) -> f32 {
        self.uniforms.u_size
    }
}
