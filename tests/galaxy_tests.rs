//! End-to-end tests for generation, lifecycle and galaxy switching through
//! the public API.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::json;
use stargen::params::{Map, Value};
use stargen::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI};

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn four_ray_spiral() -> SpiralParameters {
    let mut params = SpiralParameters::default();
    params
        .apply_partial(&object(json!({
            "count": 100,
            "branches": 4,
            "radius": 5.0,
            "randomness": 0.0,
            "randomnessPower": 3.0,
            "insideColor": [1.0, 0.0, 0.0],
            "outsideColor": [0.0, 0.0, 1.0],
        })))
        .unwrap();
    params
}

#[test]
fn test_zero_randomness_lies_on_rays() {
    let params = four_ray_spiral();
    let buffer = params.generate(&mut SmallRng::seed_from_u64(2024));
    assert_eq!(buffer.len(), 100);

    let rays = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2];
    for (i, p) in buffer.positions.iter().enumerate() {
        assert_eq!(p.y, 0.0);
        assert_eq!(buffer.randomness[i], Vec3::ZERO);

        let distance = (p.x * p.x + p.z * p.z).sqrt();
        assert!(distance < 5.0, "particle {} at distance {}", i, distance);

        let ray = rays[i % 4];
        let expected = Vec3::new(ray.cos(), 0.0, ray.sin()) * distance;
        assert!((*p - expected).length() < 1e-4, "particle {} off its ray: {:?}", i, p);

        // Gradient from red at the core to blue at the rim
        let c = buffer.colors[i];
        let t = distance / 5.0;
        assert!((c.x - (1.0 - t)).abs() < 1e-4);
        assert_eq!(c.y, 0.0);
        assert!((c.z - t).abs() < 1e-4);
    }
}

#[test]
fn test_buffer_invariants_both_models() {
    let mut rng = SmallRng::seed_from_u64(9);

    let set = ParameterSet::from_json(r#"{ "model": "spiral", "count": 2000, "branches": 7 }"#).unwrap();
    let ParameterSet::Spiral(spiral) = set else {
        panic!("expected a spiral set");
    };
    let set = ParameterSet::from_json(r#"{ "model": "advanced", "count": 2000, "branches": 9 }"#).unwrap();
    let ParameterSet::Advanced(advanced) = set else {
        panic!("expected an advanced set");
    };

    for buffer in [spiral.generate(&mut rng), advanced.generate(&mut rng)] {
        assert_eq!(buffer.len(), 2000);
        for attr in buffer.attributes() {
            assert_eq!(attr.data.len(), 2000 * attr.components as usize, "{}", attr.name);
        }
        assert!(buffer
            .colors
            .iter()
            .all(|c| (0.0..=1.0).contains(&c.x) && (0.0..=1.0).contains(&c.y) && (0.0..=1.0).contains(&c.z)));
        assert!(buffer.scales.iter().all(|s| (0.0..1.0).contains(s)));
    }
}

#[test]
fn test_advanced_tilts_are_exact() {
    let mut params = AdvancedParameters::default();
    params.set_count(1000).unwrap();
    params.set_branches(6).unwrap();

    let buffer = params.generate(&mut SmallRng::seed_from_u64(3));
    let tilts = buffer.axis_tilts.unwrap();
    for (i, tilt) in tilts.iter().enumerate() {
        assert_eq!(*tilt, (i % 6) as f32 * std::f32::consts::TAU / 6.0);
    }
}

#[test]
fn test_universe_walkthrough() {
    let mut spiral = SpiralParameters::default();
    spiral.set_count(1_000).unwrap();
    let mut advanced = AdvancedParameters::default();
    advanced.set_count(1_000).unwrap();

    let mut universe = Universe::new(Scene::new()).with_pixel_ratio(1.5).unwrap();
    let a = universe.add_galaxy(Galaxy::new(spiral).with_seed(1));
    let b = universe.add_boxed(ParameterSet::from(advanced).into_controller());

    // Nothing drawn until a galaxy is activated
    assert_eq!(universe.scene().drawable_count(), 0);
    assert!(universe.tick(16.0).is_ok());

    universe.set_active(a).unwrap();
    universe.tick(500.0).unwrap();
    let points = universe.active_galaxy().unwrap().points().unwrap();
    assert!((points.material.time() - 0.5).abs() < 1e-6);
    assert_eq!(points.material.size(), 45.0);

    universe.edit(a, &object(json!({ "size": 10.0, "branches": 2 }))).unwrap();
    let points = universe.galaxy(a).unwrap().points().unwrap();
    assert_eq!(points.material.size(), 15.0);
    assert_eq!(points.material.time(), 0.0);

    for _ in 0..3 {
        universe.set_active(b).unwrap();
        assert_eq!(universe.scene().drawable_count(), 1);
        universe.set_active(a).unwrap();
        assert_eq!(universe.scene().drawable_count(), 1);
    }

    assert_eq!(universe.galaxy(b).unwrap().state(), LifecycleState::Disposed);
    universe.deactivate();
    assert_eq!(universe.scene().drawable_count(), 0);
    assert_eq!(universe.galaxy(a).unwrap().state(), LifecycleState::Disposed);
}

#[test]
fn test_render_context_drives_a_standalone_galaxy() {
    let mut scene = Scene::new();
    let mut galaxy = {
        let mut ctx = RenderContext::new(&mut scene, 1.0).unwrap();
        Galaxy::create(four_ray_spiral(), &mut ctx)
    };
    assert!(galaxy.is_active());

    galaxy.dispose(&mut scene);
    galaxy.dispose(&mut scene);
    assert_eq!(scene.drawable_count(), 0);
    assert_eq!(galaxy.update(16.0), Err(LifecycleError::NotActive));
}
