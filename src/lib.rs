//! # stargen - procedural galaxy point clouds
//!
//! Generates the per-particle data (position, color, scale, random offsets)
//! for a stylized galaxy and manages the lifecycle of whichever galaxy is on
//! screen. Rendering stays with the host application: stargen hands it plain
//! attribute arrays, a small uniform block and add/remove calls on a scene.
//!
//! ## Quick Start
//!
//! ```ignore
//! use stargen::prelude::*;
//!
//! fn main() -> Result<(), LifecycleError> {
//!     let mut universe = Universe::new(Scene::new()).with_pixel_ratio(2.0)?;
//!     let spiral = universe.add_galaxy(Galaxy::new(SpiralParameters::default()));
//!     let advanced = universe.add_galaxy(Galaxy::new(AdvancedParameters::default()));
//!
//!     universe.set_active(spiral)?;
//!     universe.tick(16.6)?;
//!
//!     // Swap galaxies: the spiral is disposed first
//!     universe.set_active(advanced)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Models
//!
//! | Model | Parameters | Layout |
//! |-------|------------|--------|
//! | Spiral | [`SpiralParameters`] | random radius along `branches` rays, gradient by radius |
//! | Advanced | [`AdvancedParameters`] | deterministic rings, log-normal scatter, per-branch axis tilt |
//!
//! Both are generated through [`GalaxyModel::generate`] into a
//! [`ParticleBuffer`].
//!
//! ### Parameters
//!
//! Every field has a getter and a validated setter. Rejected values leave the
//! previous value in place. Committed UI edits arrive as JSON objects and go
//! through [`Parameters::apply_partial`], which is all-or-nothing.
//!
//! ### Lifecycle
//!
//! A [`Galaxy`] moves between `Uninitialized`, `Active` and `Disposed`.
//! [`Universe`] keeps at most one galaxy active, disposing the previous one
//! before initializing the next.

// Lets `#[derive(Parameters)]` refer to `::stargen` from inside this crate.
extern crate self as stargen;

pub mod color;
mod error;
pub mod galaxy;
pub mod geometry;
pub mod material;
pub mod params;
pub mod sampler;
pub mod scene;
pub mod universe;

pub use color::Color;
pub use error::{LifecycleError, ParameterError};
pub use galaxy::{Galaxy, GalaxyController, LifecycleState, Points};
pub use geometry::{BufferStats, GalaxyModel, ParticleBuffer, VertexAttribute};
pub use glam::Vec3;
pub use material::{BlendMode, GalaxyUniforms, Material};
pub use params::{
    AdvancedParameters, ParameterField, ParameterRange, ParameterSet, Parameters, RandomnessMode,
    SpiralParameters,
};
pub use scene::{DrawableHandle, DrawableInfo, RenderContext, Scene, SceneGraph};
pub use stargen_derive::Parameters;
pub use universe::{GalaxyId, Universe};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use stargen::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::error::{LifecycleError, ParameterError};
    pub use crate::galaxy::{Galaxy, GalaxyController, LifecycleState};
    pub use crate::geometry::{GalaxyModel, ParticleBuffer};
    pub use crate::material::{BlendMode, Material};
    pub use crate::params::{AdvancedParameters, ParameterSet, Parameters, RandomnessMode, SpiralParameters};
    pub use crate::scene::{RenderContext, Scene, SceneGraph};
    pub use crate::universe::{GalaxyId, Universe};
    pub use crate::Vec3;
    pub use stargen_derive::Parameters;
}
