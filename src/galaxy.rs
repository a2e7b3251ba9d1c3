//! Galaxy lifecycle management.
//!
//! A [`Galaxy`] owns one parameter set and, while active, the generated
//! particle buffer, its material and the drawable registered with the scene.
//!
//! # States
//!
//! ```text
//! Uninitialized --init--> Active --dispose--> Disposed --init--> Active ...
//!                           |                    ^
//!                           +----regenerate------+ (dispose, apply, init)
//! ```
//!
//! | Call | Uninitialized | Active | Disposed |
//! |------|---------------|--------|----------|
//! | `init` | generate, register | dispose, then generate, register | generate, register |
//! | `update` | `Err(NotActive)` | advance `uTime` | `Err(NotActive)` |
//! | `dispose` | no-op | release, unregister | no-op |
//!
//! # Example
//!
//! ```ignore
//! let mut scene = Scene::new();
//! let mut ctx = RenderContext::new(&mut scene, 2.0)?;
//!
//! let mut galaxy = Galaxy::create(SpiralParameters::default(), &mut ctx);
//! galaxy.update(16.6)?;
//!
//! // Committed UI edit
//! let edit = serde_json::json!({ "branches": 5 });
//! galaxy.regenerate(&mut ctx, edit.as_object())?;
//! ```

use crate::error::{LifecycleError, ParameterError};
use crate::geometry::{GalaxyModel, ParticleBuffer};
use crate::material::Material;
use crate::params::{
    AdvancedParameters, Map, ParameterField, ParameterSet, Parameters, SpiralParameters, Value,
};
use crate::scene::{DrawableHandle, DrawableInfo, RenderContext, SceneGraph};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Instant;

/// Everything a galaxy owns while it is active.
#[derive(Debug)]
pub struct Points {
    /// Handle of the drawable registered with the scene.
    pub handle: DrawableHandle,
    pub geometry: ParticleBuffer,
    pub material: Material,
}

/// Observable lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Active,
    Disposed,
}

#[derive(Debug)]
enum State {
    Uninitialized,
    Active(Points),
    Disposed,
}

/// Lifecycle controller for one galaxy model.
///
/// Not thread-safe by itself: drive it from the thread that owns the scene.
/// Generation can still be done elsewhere and handed in through
/// [`init_with_buffer`](Galaxy::init_with_buffer).
#[derive(Debug)]
pub struct Galaxy<M: GalaxyModel> {
    params: M,
    state: State,
    rng: SmallRng,
}

impl<M: GalaxyModel> Galaxy<M> {
    /// Create an uninitialized galaxy. Nothing is generated until [`init`](Galaxy::init).
    pub fn new(params: M) -> Self {
        Self {
            params,
            state: State::Uninitialized,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Create a galaxy and initialize it right away.
    pub fn create(params: M, ctx: &mut RenderContext<'_>) -> Self {
        let mut galaxy = Self::new(params);
        galaxy.init(ctx);
        galaxy
    }

    /// Use a fixed RNG seed, making generation reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Current parameters.
    pub fn params(&self) -> &M {
        &self.params
    }

    /// Mutable parameters. Edits take effect on the next `init`/`regenerate`.
    pub fn params_mut(&mut self) -> &mut M {
        &mut self.params
    }

    pub fn state(&self) -> LifecycleState {
        match self.state {
            State::Uninitialized => LifecycleState::Uninitialized,
            State::Active(_) => LifecycleState::Active,
            State::Disposed => LifecycleState::Disposed,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active(_))
    }

    /// Geometry, material and drawable handle, if active.
    pub fn points(&self) -> Option<&Points> {
        match &self.state {
            State::Active(points) => Some(points),
            _ => None,
        }
    }

    /// Generate geometry, build the material and register with the scene.
    ///
    /// An active galaxy is disposed first, so at most one drawable per galaxy
    /// is ever registered.
    pub fn init(&mut self, ctx: &mut RenderContext<'_>) {
        // Release the old buffer before allocating the new one
        self.dispose(&mut *ctx.scene);

        let start = Instant::now();
        let geometry = self.params.generate(&mut self.rng);
        log::debug!(
            "Generated {} {} particles in {:.1?}",
            geometry.len(),
            M::NAME,
            start.elapsed()
        );
        self.init_with_buffer(ctx, geometry);
    }

    /// Like [`init`](Galaxy::init), with a buffer generated elsewhere.
    ///
    /// The buffer should come from `self.params().generate(..)`, typically run
    /// on a worker thread. An active galaxy is disposed before the new buffer
    /// is registered.
    pub fn init_with_buffer(&mut self, ctx: &mut RenderContext<'_>, geometry: ParticleBuffer) {
        if self.is_active() {
            self.dispose(&mut *ctx.scene);
        }
        debug_assert_eq!(geometry.len(), self.params.particle_count() as usize);

        let material = Material::new(self.params.point_size(), ctx.pixel_ratio(), self.params.blend_mode());
        let handle = ctx.scene.add(DrawableInfo {
            model: M::NAME,
            particles: geometry.len(),
        });
        log::info!(
            "{} galaxy active: {} particles, point size {}",
            M::NAME,
            geometry.len(),
            material.size()
        );

        self.state = State::Active(Points {
            handle,
            geometry,
            material,
        });
    }

    /// Advance the time uniform by `delta_ms` milliseconds.
    pub fn update(&mut self, delta_ms: f32) -> Result<(), LifecycleError> {
        match &mut self.state {
            State::Active(points) => {
                points.material.advance(delta_ms);
                Ok(())
            }
            _ => Err(LifecycleError::NotActive),
        }
    }

    /// Release buffers and unregister the drawable. No-op unless active.
    pub fn dispose(&mut self, scene: &mut dyn SceneGraph) {
        if !self.is_active() {
            return;
        }
        if let State::Active(points) = std::mem::replace(&mut self.state, State::Disposed) {
            if !scene.remove(points.handle) {
                log::warn!("{} galaxy drawable {:?} was not in the scene", M::NAME, points.handle);
            }
            log::debug!("{} galaxy disposed", M::NAME);
        }
    }

    /// Dispose, apply `update` (if any), then initialize again.
    ///
    /// An invalid update is rejected as a whole: parameters keep their previous
    /// values, the galaxy stays disposed and the error is returned. Call
    /// [`init`](Galaxy::init) to bring it back with the old parameters.
    pub fn regenerate(
        &mut self,
        ctx: &mut RenderContext<'_>,
        update: Option<&Map<String, Value>>,
    ) -> Result<Vec<&'static str>, LifecycleError> {
        self.dispose(&mut *ctx.scene);

        let applied = match update {
            Some(update) => self.params.apply_partial(update).map_err(|e| {
                log::warn!("Rejected {} galaxy update: {}", M::NAME, e);
                e
            })?,
            None => Vec::new(),
        };

        self.init(ctx);
        Ok(applied)
    }
}

/// Object-safe view of a [`Galaxy`], so controllers of different models can
/// live side by side in a [`Universe`](crate::Universe).
pub trait GalaxyController {
    /// Model name, e.g. `"spiral"`.
    fn model(&self) -> &'static str;
    fn state(&self) -> LifecycleState;
    fn init(&mut self, ctx: &mut RenderContext<'_>);
    fn update(&mut self, delta_ms: f32) -> Result<(), LifecycleError>;
    fn dispose(&mut self, scene: &mut dyn SceneGraph);
    fn regenerate(
        &mut self,
        ctx: &mut RenderContext<'_>,
        update: Option<&Map<String, Value>>,
    ) -> Result<Vec<&'static str>, LifecycleError>;
    fn points(&self) -> Option<&Points>;
    /// Apply a partial update without regenerating. Takes effect on the next `init`.
    fn apply(&mut self, update: &Map<String, Value>) -> Result<Vec<&'static str>, ParameterError>;
    /// Editable fields, for building a parameter panel.
    fn parameter_fields(&self) -> &'static [ParameterField];
    /// Current parameters as a JSON object.
    fn parameters_json(&self) -> Value;
}

impl<M: GalaxyModel> GalaxyController for Galaxy<M> {
    fn model(&self) -> &'static str {
        M::NAME
    }

    fn state(&self) -> LifecycleState {
        Galaxy::state(self)
    }

    fn init(&mut self, ctx: &mut RenderContext<'_>) {
        Galaxy::init(self, ctx)
    }

    fn update(&mut self, delta_ms: f32) -> Result<(), LifecycleError> {
        Galaxy::update(self, delta_ms)
    }

    fn dispose(&mut self, scene: &mut dyn SceneGraph) {
        Galaxy::dispose(self, scene)
    }

    fn regenerate(
        &mut self,
        ctx: &mut RenderContext<'_>,
        update: Option<&Map<String, Value>>,
    ) -> Result<Vec<&'static str>, LifecycleError> {
        Galaxy::regenerate(self, ctx, update)
    }

    fn points(&self) -> Option<&Points> {
        Galaxy::points(self)
    }

    fn apply(&mut self, update: &Map<String, Value>) -> Result<Vec<&'static str>, ParameterError> {
        self.params.apply_partial(update)
    }

    fn parameter_fields(&self) -> &'static [ParameterField] {
        M::FIELDS
    }

    fn parameters_json(&self) -> Value {
        serde_json::to_value(&self.params).unwrap_or(Value::Null)
    }
}

impl ParameterSet {
    /// Wrap these parameters in an uninitialized controller.
    pub fn into_controller(self) -> Box<dyn GalaxyController> {
        match self {
            ParameterSet::Spiral(p) => Box::new(Galaxy::<SpiralParameters>::new(p)),
            ParameterSet::Advanced(p) => Box::new(Galaxy::<AdvancedParameters>::new(p)),
        }
    }
}
