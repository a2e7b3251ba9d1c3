//! Particle geometry generation.
//!
//! [`GalaxyModel::generate`] turns a validated parameter set into a
//! [`ParticleBuffer`]: parallel per-particle arrays ready to upload as vertex
//! attributes.
//!
//! # Models
//!
//! | Model | Placement | Offsets | Extra attributes |
//! |-------|-----------|---------|------------------|
//! | Spiral | random distance along one of `branches` rays | `U^power · ±randomness · r` | – |
//! | Advanced | deterministic rings keyed by index and branch | log-normal distance | `aRadii`, `axisTilt` |
//!
//! Generation is a pure function of the parameters and the RNG, so it can run
//! on a worker thread; only the finished buffer needs to travel back.
//!
//! # Example
//!
//! ```ignore
//! let mut rng = SmallRng::from_entropy();
//! let buffer = SpiralParameters::default().generate(&mut rng);
//! assert_eq!(buffer.len(), 200_000);
//! ```

use crate::color::Color;
use crate::params::{AdvancedParameters, Parameters, RandomnessMode, SpiralParameters};
use crate::sampler::{random_sign, sample_log_normal_distance};
use crate::Vec3;
use rand::Rng;
use serde::Serialize;
use std::f32::consts::TAU;

/// Per-particle attribute arrays for one galaxy.
///
/// All arrays have exactly [`len`](ParticleBuffer::len) elements. `radii` and
/// `axis_tilts` are only produced by the advanced model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleBuffer {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub scales: Vec<f32>,
    pub randomness: Vec<Vec3>,
    pub radii: Option<Vec<f32>>,
    pub axis_tilts: Option<Vec<f32>>,
}

/// One vertex attribute view into a [`ParticleBuffer`].
#[derive(Clone, Copy, Debug)]
pub struct VertexAttribute<'a> {
    /// Shader attribute name.
    pub name: &'static str,
    /// Floats per particle (1 or 3).
    pub components: u32,
    /// Flattened data, `len() * components` floats.
    pub data: &'a [f32],
}

impl VertexAttribute<'_> {
    /// Raw bytes for GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.data)
    }
}

/// Summary statistics over a [`ParticleBuffer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferStats {
    pub count: usize,
    /// Lowest color channel value across all particles.
    pub color_min: f32,
    /// Highest color channel value across all particles.
    pub color_max: f32,
    pub scale_min: f32,
    pub scale_max: f32,
    pub scale_mean: f32,
    /// Largest distance from the Y axis.
    pub max_planar_radius: f32,
}

impl ParticleBuffer {
    /// Allocate empty arrays with room for `count` particles.
    fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
            scales: Vec::with_capacity(count),
            randomness: Vec::with_capacity(count),
            radii: None,
            axis_tilts: None,
        }
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the buffer holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex attribute views, named as the galaxy shaders expect them.
    pub fn attributes(&self) -> Vec<VertexAttribute<'_>> {
        let mut attrs = vec![
            VertexAttribute {
                name: "position",
                components: 3,
                data: bytemuck::cast_slice(&self.positions),
            },
            VertexAttribute {
                name: "color",
                components: 3,
                data: bytemuck::cast_slice(&self.colors),
            },
            VertexAttribute {
                name: "aScale",
                components: 1,
                data: &self.scales,
            },
            VertexAttribute {
                name: "aRandomness",
                components: 3,
                data: bytemuck::cast_slice(&self.randomness),
            },
        ];
        if let Some(radii) = &self.radii {
            attrs.push(VertexAttribute {
                name: "aRadii",
                components: 1,
                data: radii,
            });
        }
        if let Some(tilts) = &self.axis_tilts {
            attrs.push(VertexAttribute {
                name: "axisTilt",
                components: 1,
                data: tilts,
            });
        }
        attrs
    }

    /// Compute summary statistics. Returns `None` for an empty buffer.
    pub fn stats(&self) -> Option<BufferStats> {
        if self.is_empty() {
            return None;
        }

        let (color_min, color_max) = self
            .colors
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), c| {
                (lo.min(c.min_element()), hi.max(c.max_element()))
            });
        let (scale_min, scale_max, scale_sum) = self.scales.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY, 0.0f64),
            |(lo, hi, sum), &s| (lo.min(s), hi.max(s), sum + s as f64),
        );
        let max_planar_radius = self
            .positions
            .iter()
            .map(|p| (p.x * p.x + p.z * p.z).sqrt())
            .fold(0.0, f32::max);

        Some(BufferStats {
            count: self.len(),
            color_min,
            color_max,
            scale_min,
            scale_max,
            scale_mean: (scale_sum / self.len() as f64) as f32,
            max_planar_radius,
        })
    }
}

/// A galaxy model that can fill a [`ParticleBuffer`].
///
/// Implemented by both parameter sets. The associated constants and
/// accessors are what the lifecycle controller needs beyond generation.
pub trait GalaxyModel: Parameters + Serialize + Send + Sync + 'static {
    /// Model name for logs and JSON tags.
    const NAME: &'static str;

    /// Generate one buffer. Buffers are allocated once, at full size.
    ///
    /// # Panics
    ///
    /// Panics if the particle count is zero. Parameter setters reject zero,
    /// so this only fires on a bypassed validation.
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> ParticleBuffer;

    /// Number of particles `generate` produces.
    fn particle_count(&self) -> u32;

    /// Base point size before pixel-ratio scaling.
    fn point_size(&self) -> f32;

    /// Blend mode for the material.
    fn blend_mode(&self) -> crate::material::BlendMode;
}

/// Angle of branch `i mod branches`, in `[0, 2π)`.
#[inline]
pub fn branch_angle(i: u32, branches: u32) -> f32 {
    (i % branches) as f32 / branches as f32 * TAU
}

impl GalaxyModel for SpiralParameters {
    const NAME: &'static str = "spiral";

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> ParticleBuffer {
        let count = self.count();
        assert!(count > 0, "spiral galaxy generated with zero particles");

        let max_radius = self.radius();
        let branches = self.branches();
        let spread = self.randomness();
        let power = self.randomness_power();
        let inside = self.inside_color();
        let outside = self.outside_color();
        let folded = self.randomness_mode() == RandomnessMode::Folded;

        let mut buffer = ParticleBuffer::with_capacity(count as usize);

        for i in 0..count {
            let radius = rng.gen::<f32>() * max_radius;
            let angle = branch_angle(i, branches);

            let mut offset_axis =
                || rng.gen::<f32>().powf(power) * random_sign(&mut *rng) * spread * radius;
            let offset = Vec3::new(offset_axis(), offset_axis(), offset_axis());

            let mut position = Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);
            if folded {
                position += offset;
            }

            buffer.positions.push(position);
            buffer.randomness.push(offset);
            buffer
                .colors
                .push(inside.lerp(outside, radius / max_radius).into());
            buffer.scales.push(rng.gen::<f32>());
        }

        buffer
    }

    fn particle_count(&self) -> u32 {
        self.count()
    }

    fn point_size(&self) -> f32 {
        self.size()
    }

    fn blend_mode(&self) -> crate::material::BlendMode {
        self.blending()
    }
}

impl GalaxyModel for AdvancedParameters {
    const NAME: &'static str = "advanced";

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> ParticleBuffer {
        let count = self.count();
        assert!(count > 0, "advanced galaxy generated with zero particles");

        let branches = self.branches();
        let spread = self.randomness();
        let (mu, sigma) = (self.mu(), self.sigma());
        let lerp = self.lerp();
        let inside = self.inside_color();
        let outside = self.outside_color();

        let tilts: Vec<f32> = (0..branches)
            .map(|k| k as f32 * TAU / branches as f32)
            .collect();

        let mut buffer = ParticleBuffer::with_capacity(count as usize);
        let mut radii = Vec::with_capacity(count as usize);
        let mut axis_tilts = Vec::with_capacity(count as usize);

        for i in 0..count {
            let branch = (i % branches) as usize;
            let radius = branch as f32 / 10.0;
            // Index doubles as the ring angle, in radians
            let theta = i as f32;

            buffer
                .positions
                .push(Vec3::new(1.5 * theta.sin() * radius, 0.0, theta.cos() * radius));
            radii.push(radius);
            axis_tilts.push(tilts[branch]);

            let mut offset_axis = || sample_log_normal_distance(&mut *rng, mu, sigma) * spread;
            buffer
                .randomness
                .push(Vec3::new(offset_axis(), offset_axis(), offset_axis()));

            let t = (radius / lerp).clamp(0.0, 1.0);
            buffer.colors.push(mix(inside, outside, t));
            buffer.scales.push(rng.gen::<f32>());
        }

        buffer.radii = Some(radii);
        buffer.axis_tilts = Some(axis_tilts);
        buffer
    }

    fn particle_count(&self) -> u32 {
        self.count()
    }

    fn point_size(&self) -> f32 {
        self.size()
    }

    fn blend_mode(&self) -> crate::material::BlendMode {
        self.blending()
    }
}

#[inline]
fn mix(a: Color, b: Color, t: f32) -> Vec3 {
    a.lerp(b, t).into()
}
