//! Headless galaxy demo.
//!
//! Builds both galaxy models, switches between them and applies a few
//! parameter edits, logging what ends up in the scene. Run with
//! `RUST_LOG=debug cargo run` for generation timings.
//!
//! An optional argument names a JSON file holding a tagged parameter set
//! (`{ "model": "spiral", ... }`) to use as a third galaxy.

use stargen::prelude::*;
use stargen::params::Value;
use std::error::Error;

const FRAME_MS: f32 = 1000.0 / 60.0;

fn log_active(universe: &Universe) {
    let Some(galaxy) = universe.active_galaxy() else {
        log::info!("No active galaxy");
        return;
    };
    let Some(points) = galaxy.points() else {
        return;
    };
    if let Some(stats) = points.geometry.stats() {
        log::info!(
            "{}: {} points, radius {:.2}, scale {:.2}..{:.2} (mean {:.2}), uTime {:.3}s",
            galaxy.model(),
            stats.count,
            stats.max_planar_radius,
            stats.scale_min,
            stats.scale_max,
            stats.scale_mean,
            points.material.time(),
        );
    }
}

fn run_frames(universe: &mut Universe, frames: u32) -> Result<(), LifecycleError> {
    for _ in 0..frames {
        universe.tick(FRAME_MS)?;
    }
    Ok(())
}

fn edit(universe: &mut Universe, id: GalaxyId, update: Value) {
    let Value::Object(update) = update else {
        return;
    };
    match universe.edit(id, &update) {
        Ok(applied) => log::info!("Applied {:?} to galaxy #{}", applied, id),
        Err(e) => log::warn!("Edit rejected for galaxy #{}: {}", id, e),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut universe = Universe::new(Scene::new()).with_pixel_ratio(2.0)?;
    let spiral = universe.add_galaxy(Galaxy::new(SpiralParameters::default()));
    let advanced = universe.add_galaxy(Galaxy::new(AdvancedParameters::default()));

    let custom = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            let set = ParameterSet::from_json(&json)?;
            log::info!("Loaded {} parameters from {}", set.kind(), path);
            Some(universe.add_boxed(set.into_controller()))
        }
        None => None,
    };

    universe.set_active(spiral)?;
    run_frames(&mut universe, 60)?;
    log_active(&universe);

    edit(&mut universe, spiral, serde_json::json!({ "branches": 5, "spin": -1.5 }));
    edit(&mut universe, spiral, serde_json::json!({ "count": 50_000, "radius": -1.0 }));
    log_active(&universe);

    // Recorded now, generated on activation
    edit(&mut universe, advanced, serde_json::json!({ "branches": 12, "insideColor": "#ffd7a0" }));

    universe.set_active(advanced)?;
    run_frames(&mut universe, 120)?;
    log_active(&universe);

    if let Some(id) = custom {
        universe.set_active(id)?;
        run_frames(&mut universe, 30)?;
        log_active(&universe);
    }

    universe.deactivate();
    log::info!("Scene drawables after shutdown: {}", universe.scene().drawable_count());
    Ok(())
}
