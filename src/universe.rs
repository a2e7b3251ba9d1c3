//! Active-galaxy switching.
//!
//! A [`Universe`] owns the scene, the display pixel ratio and any number of
//! galaxy controllers, of which at most one is active. The application loop
//! owns the universe and drives it explicitly:
//!
//! ```ignore
//! let mut universe = Universe::new(Scene::new()).with_pixel_ratio(2.0)?;
//! let spiral = universe.add_galaxy(Galaxy::new(SpiralParameters::default()));
//! let advanced = universe.add_galaxy(Galaxy::new(AdvancedParameters::default()));
//!
//! universe.set_active(spiral)?;
//! loop {
//!     universe.tick(frame_delta_ms)?;
//!     if let Some((id, edit)) = committed_edit() {
//!         universe.edit(id, &edit)?;
//!     }
//! }
//! ```
//!
//! Switching disposes the previous galaxy before the next one initializes,
//! so the scene never holds more than one galaxy drawable.

use crate::error::{LifecycleError, ParameterError};
use crate::galaxy::GalaxyController;
use crate::params::{check, Map, Value};
use crate::scene::{RenderContext, Scene, SceneGraph};

/// Index of a galaxy within its [`Universe`].
pub type GalaxyId = usize;

/// Owner of the scene and the galaxy controllers.
pub struct Universe<S: SceneGraph = Scene> {
    scene: S,
    pixel_ratio: f32,
    galaxies: Vec<Box<dyn GalaxyController>>,
    active: Option<GalaxyId>,
}

impl<S: SceneGraph> Universe<S> {
    /// Create an empty universe around `scene`, with a pixel ratio of 1.
    pub fn new(scene: S) -> Self {
        Self {
            scene,
            pixel_ratio: 1.0,
            galaxies: Vec::new(),
            active: None,
        }
    }

    /// Set the display pixel ratio used when galaxies build their materials.
    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Result<Self, ParameterError> {
        self.set_pixel_ratio(pixel_ratio)?;
        Ok(self)
    }

    /// Change the pixel ratio. Applies from the next `init`/`regenerate`.
    ///
    /// Rejects ratios that are not finite and positive, keeping the old one.
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) -> Result<(), ParameterError> {
        check::positive("pixel_ratio", &pixel_ratio)?;
        self.pixel_ratio = pixel_ratio;
        Ok(())
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Register a galaxy. It stays idle until activated.
    pub fn add_galaxy<G: GalaxyController + 'static>(&mut self, galaxy: G) -> GalaxyId {
        self.add_boxed(Box::new(galaxy))
    }

    /// Register a boxed galaxy, e.g. from [`ParameterSet::into_controller`](crate::ParameterSet::into_controller).
    pub fn add_boxed(&mut self, galaxy: Box<dyn GalaxyController>) -> GalaxyId {
        self.galaxies.push(galaxy);
        self.galaxies.len() - 1
    }

    pub fn len(&self) -> usize {
        self.galaxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.galaxies.is_empty()
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn galaxy(&self, id: GalaxyId) -> Option<&dyn GalaxyController> {
        self.galaxies.get(id).map(|g| g.as_ref())
    }

    /// Id of the active galaxy.
    pub fn active(&self) -> Option<GalaxyId> {
        self.active
    }

    pub fn active_galaxy(&self) -> Option<&dyn GalaxyController> {
        self.active.and_then(|id| self.galaxy(id))
    }

    /// Make `id` the active galaxy.
    ///
    /// Disposes the current active galaxy if it is a different one, then
    /// initializes `id`. Activating the already-active galaxy regenerates it
    /// with its current parameters.
    pub fn set_active(&mut self, id: GalaxyId) -> Result<(), LifecycleError> {
        if id >= self.galaxies.len() {
            return Err(LifecycleError::UnknownGalaxy(id));
        }

        if let Some(previous) = self.active.filter(|&prev| prev != id) {
            self.galaxies[previous].dispose(&mut self.scene);
        }

        self.active = Some(id);
        let mut ctx = RenderContext::new(&mut self.scene, self.pixel_ratio)?;
        self.galaxies[id].init(&mut ctx);
        log::info!("Active galaxy: #{} ({})", id, self.galaxies[id].model());
        Ok(())
    }

    /// Dispose the active galaxy and leave none active.
    pub fn deactivate(&mut self) {
        if let Some(id) = self.active.take() {
            self.galaxies[id].dispose(&mut self.scene);
        }
    }

    /// Forward a frame delta to the active galaxy. No-op when none is active.
    pub fn tick(&mut self, delta_ms: f32) -> Result<(), LifecycleError> {
        match self.active {
            Some(id) => self.galaxies[id].update(delta_ms),
            None => Ok(()),
        }
    }

    /// Route a committed parameter edit to galaxy `id`.
    ///
    /// The active galaxy is regenerated in place. If the edit is rejected it
    /// is re-initialized with its unchanged parameters, so the scene keeps
    /// showing it, and the error is returned. Inactive galaxies only record
    /// the new parameters.
    pub fn edit(&mut self, id: GalaxyId, update: &Map<String, Value>) -> Result<Vec<&'static str>, LifecycleError> {
        let galaxy = self
            .galaxies
            .get_mut(id)
            .ok_or(LifecycleError::UnknownGalaxy(id))?;

        if self.active != Some(id) {
            return Ok(galaxy.apply(update)?);
        }

        let mut ctx = RenderContext::new(&mut self.scene, self.pixel_ratio)?;
        match galaxy.regenerate(&mut ctx, Some(update)) {
            Ok(applied) => Ok(applied),
            Err(e) => {
                galaxy.init(&mut ctx);
                Err(e)
            }
        }
    }
}
