//! Scene graph seam.
//!
//! Galaxies never own the scene. They register one drawable on `init` and
//! remove it on `dispose`, through the [`SceneGraph`] trait, so any renderer
//! can plug in its own scene. [`Scene`] is a minimal in-memory implementation
//! that only tracks what is registered.
//!
//! The scene holds [`DrawableHandle`]s, not particle data. A renderer looks the
//! data up through the owning galaxy while the handle is registered.

use crate::error::ParameterError;
use crate::params::check;

/// Opaque id of a drawable registered with a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawableHandle(pub u64);

/// What a galaxy tells the scene about its drawable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawableInfo {
    /// Model name, e.g. `"spiral"`.
    pub model: &'static str,
    /// Number of points.
    pub particles: usize,
}

/// Scene mutation primitives consumed by the galaxy lifecycle.
pub trait SceneGraph {
    /// Register a drawable and return its handle.
    fn add(&mut self, info: DrawableInfo) -> DrawableHandle;

    /// Unregister a drawable. Returns `false` if the handle was not registered.
    fn remove(&mut self, handle: DrawableHandle) -> bool;

    /// Number of registered drawables.
    fn drawable_count(&self) -> usize;
}

/// In-memory scene that records registered drawables.
#[derive(Debug, Default)]
pub struct Scene {
    drawables: Vec<(DrawableHandle, DrawableInfo)>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered drawables, in insertion order.
    pub fn drawables(&self) -> impl Iterator<Item = (DrawableHandle, &DrawableInfo)> {
        self.drawables.iter().map(|(h, info)| (*h, info))
    }

    /// Whether `handle` is currently registered.
    pub fn contains(&self, handle: DrawableHandle) -> bool {
        self.drawables.iter().any(|(h, _)| *h == handle)
    }
}

impl SceneGraph for Scene {
    fn add(&mut self, info: DrawableInfo) -> DrawableHandle {
        let handle = DrawableHandle(self.next_id);
        self.next_id += 1;
        self.drawables.push((handle, info));
        handle
    }

    fn remove(&mut self, handle: DrawableHandle) -> bool {
        let before = self.drawables.len();
        self.drawables.retain(|(h, _)| *h != handle);
        self.drawables.len() != before
    }

    fn drawable_count(&self) -> usize {
        self.drawables.len()
    }
}

/// Everything a galaxy needs from its surroundings while (re)initializing.
///
/// Built by the application loop and passed down by reference; nothing in the
/// crate reaches for global state.
pub struct RenderContext<'a> {
    pub scene: &'a mut dyn SceneGraph,
    pixel_ratio: f32,
}

impl<'a> RenderContext<'a> {
    /// Fails unless `pixel_ratio` is finite and positive.
    pub fn new(scene: &'a mut dyn SceneGraph, pixel_ratio: f32) -> Result<Self, ParameterError> {
        check::positive("pixel_ratio", &pixel_ratio)?;
        Ok(Self { scene, pixel_ratio })
    }

    /// Device pixel ratio used to scale point size.
    #[inline]
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> DrawableInfo {
        DrawableInfo {
            model: "spiral",
            particles: 10,
        }
    }

    #[test]
    fn test_add_remove() {
        let mut scene = Scene::new();
        let a = scene.add(info());
        let b = scene.add(info());
        assert_ne!(a, b);
        assert_eq!(scene.drawable_count(), 2);

        assert!(scene.remove(a));
        assert!(!scene.contains(a));
        assert!(scene.contains(b));
        assert_eq!(scene.drawable_count(), 1);
    }

    #[test]
    fn test_render_context_rejects_bad_pixel_ratio() {
        let mut scene = Scene::new();
        for ratio in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(RenderContext::new(&mut scene, ratio).is_err(), "accepted {}", ratio);
        }
        let ctx = RenderContext::new(&mut scene, 2.0).unwrap();
        assert_eq!(ctx.pixel_ratio(), 2.0);
    }

    #[test]
    fn test_remove_unknown_handle() {
        let mut scene = Scene::new();
        assert!(!scene.remove(DrawableHandle(42)));
    }
}
