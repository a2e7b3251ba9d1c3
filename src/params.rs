//! Galaxy parameter sets.
//!
//! A parameter set describes the shape and look of one galaxy. Two models
//! exist, [`SpiralParameters`] and [`AdvancedParameters`], with overlapping
//! but not identical fields. Both are validated on every assignment: a rejected
//! value leaves the previous value in place, so a parameter set is never
//! partially invalid.
//!
//! # Editing
//!
//! ```ignore
//! let mut params = SpiralParameters::default();
//! params.set_radius(8.0)?;
//! assert!(params.set_branches(0).is_err()); // still 3
//!
//! // Committed edits from a UI arrive as JSON objects
//! let update = serde_json::json!({ "randomnessPower": 2.5, "insideColor": "#ffffff" });
//! params.apply_partial(update.as_object().unwrap())?;
//! ```
//!
//! # Partial Updates
//!
//! [`Parameters::apply_partial`] is all-or-nothing. Unknown keys are skipped.
//! Every known key is validated against a working copy, and the copy only
//! replaces `self` if all of them pass. The first invalid value aborts the
//! update and is returned as the error.

use crate::color::Color;
use crate::error::ParameterError;
use crate::material::BlendMode;
use crate::sampler::{log_normal_exponent_bound, LOG_NORMAL_MAX_EXPONENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use serde_json::{Map, Value};

/// Advisory editor bounds for a numeric field.
///
/// These mirror the slider limits a parameter panel would offer. They are
/// metadata only; validity is decided by the field's checks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
}

/// Description of one editable field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterField {
    /// Canonical snake_case key.
    pub key: &'static str,
    /// camelCase alias accepted in updates.
    pub alias: &'static str,
    /// Display label for a parameter panel.
    pub label: Option<&'static str>,
    /// Suggested widget range.
    pub range: Option<ParameterRange>,
}

impl ParameterField {
    /// Whether `key` names this field, either form.
    pub fn matches(&self, key: &str) -> bool {
        self.key == key || self.alias == key
    }
}

/// Trait automatically implemented by `#[derive(Parameters)]`.
///
/// # Do Not Implement Manually
///
/// The derive macro generates the key table and keeps [`set_value`] in sync
/// with the per-field setters. The provided methods build on those two.
///
/// [`set_value`]: Parameters::set_value
pub trait Parameters: Clone {
    /// Every editable field, in declaration order.
    const FIELDS: &'static [ParameterField];

    /// Assign one field by key through its validated setter.
    ///
    /// Returns `Ok(false)` when `key` is not a known field.
    fn set_value(&mut self, key: &str, value: &Value) -> Result<bool, ParameterError>;

    /// Re-run every field check against the current values.
    fn validate(&self) -> Result<(), ParameterError>;

    /// Look up a field by canonical key or alias.
    fn field(key: &str) -> Option<&'static ParameterField> {
        Self::FIELDS.iter().find(|f| f.matches(key))
    }

    /// Apply the recognized keys of `updates`, all or nothing.
    ///
    /// Returns the canonical keys that were applied.
    fn apply_partial(&mut self, updates: &Map<String, Value>) -> Result<Vec<&'static str>, ParameterError> {
        let mut staged = self.clone();
        let mut applied = Vec::new();

        for (key, value) in updates {
            match Self::field(key) {
                Some(field) => {
                    staged.set_value(key, value)?;
                    applied.push(field.key);
                }
                None => log::debug!("Ignoring unknown parameter key '{}'", key),
            }
        }

        *self = staged;
        Ok(applied)
    }

    /// Build a parameter set from defaults plus a JSON object.
    fn from_json(json: &str) -> Result<Self, ParameterError>
    where
        Self: Default,
    {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ParameterError::InvalidConfig(e.to_string()))?;
        let map = value
            .as_object()
            .ok_or_else(|| ParameterError::InvalidConfig("expected a JSON object".into()))?;
        let mut params = Self::default();
        params.apply_partial(map)?;
        Ok(params)
    }
}

/// Decode one JSON value for the field `key`.
pub fn decode<T: DeserializeOwned>(key: &'static str, value: &Value) -> Result<T, ParameterError> {
    T::deserialize(value).map_err(|e| ParameterError::InvalidValue {
        key,
        reason: e.to_string(),
    })
}

/// Field checks referenced by `#[param(...)]`.
pub mod check {
    use crate::color::Color;
    use crate::error::ParameterError;

    /// Numeric field types that can be range-checked.
    pub trait Scalar: Copy {
        fn to_f64(self) -> f64;
    }

    impl Scalar for u32 {
        fn to_f64(self) -> f64 {
            self as f64
        }
    }

    impl Scalar for f32 {
        fn to_f64(self) -> f64 {
            self as f64
        }
    }

    impl Scalar for f64 {
        fn to_f64(self) -> f64 {
            self
        }
    }

    pub fn finite<T: Scalar>(key: &'static str, value: &T) -> Result<(), ParameterError> {
        if value.to_f64().is_finite() {
            Ok(())
        } else {
            Err(ParameterError::NotFinite { key })
        }
    }

    pub fn positive<T: Scalar>(key: &'static str, value: &T) -> Result<(), ParameterError> {
        finite(key, value)?;
        let value = value.to_f64();
        if value > 0.0 {
            Ok(())
        } else {
            Err(ParameterError::NotPositive { key, value })
        }
    }

    pub fn non_negative<T: Scalar>(key: &'static str, value: &T) -> Result<(), ParameterError> {
        finite(key, value)?;
        let value = value.to_f64();
        if value >= 0.0 {
            Ok(())
        } else {
            Err(ParameterError::Negative { key, value })
        }
    }

    pub fn at_most<T: Scalar>(key: &'static str, value: &T, limit: f64) -> Result<(), ParameterError> {
        let value = value.to_f64();
        if value <= limit {
            Ok(())
        } else {
            Err(ParameterError::TooLarge { key, value, limit })
        }
    }

    pub fn color(key: &'static str, value: &Color) -> Result<(), ParameterError> {
        value.validate(key)
    }
}

/// Largest particle count either model accepts.
pub const MAX_PARTICLES: u32 = 1_000_000;

/// How the spiral model treats its per-particle randomness offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomnessMode {
    /// Offsets are stored in their own attribute and left out of `position`.
    #[default]
    Separate,
    /// Offsets are stored and also added to `position`.
    Folded,
}

/// Parameters for the spiral-branch model.
///
/// Particles are placed at a random distance along one of `branches` rays,
/// colored by distance from the center.
#[derive(stargen_derive::Parameters, Clone, Debug, PartialEq, Serialize)]
pub struct SpiralParameters {
    #[param(positive, limit = MAX_PARTICLES, min = 100, max = 1_000_000, step = 100, label = "Number of Stars")]
    count: u32,
    #[param(positive, label = "Star Size")]
    size: f32,
    #[param(positive, min = 0.01, max = 20.0, step = 0.1, label = "Galaxy Size")]
    radius: f32,
    #[param(positive, min = 2, max = 20, step = 1, label = "Number of Arms")]
    branches: u32,
    #[param(finite, min = -5.0, max = 5.0, step = 0.1, label = "Arm Twist")]
    spin: f32,
    #[param(non_negative, min = 0.0, max = 2.0, step = 0.001, label = "Star Spread")]
    randomness: f32,
    #[param(positive, min = 1.0, max = 10.0, step = 0.001, label = "Spread Intensity")]
    randomness_power: f32,
    #[param(color, label = "Center Color")]
    inside_color: Color,
    #[param(color, label = "Outer Color")]
    outside_color: Color,
    #[param(label = "Blending")]
    blending: BlendMode,
    #[param(label = "Randomness Mode")]
    randomness_mode: RandomnessMode,
}

impl Default for SpiralParameters {
    fn default() -> Self {
        Self {
            count: 200_000,
            size: 30.0,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.5,
            randomness_power: 3.0,
            inside_color: Color::new(1.0, 0x60 as f32 / 255.0, 0x30 as f32 / 255.0),
            outside_color: Color::new(0x1b as f32 / 255.0, 0x39 as f32 / 255.0, 0x84 as f32 / 255.0),
            blending: BlendMode::Additive,
            randomness_mode: RandomnessMode::Separate,
        }
    }
}

/// Parameters for the advanced (log-normal) model.
///
/// Particles sit on deterministic rings keyed by index and branch, and carry
/// log-normally scattered offsets for the shader to animate.
#[derive(stargen_derive::Parameters, Clone, Debug, PartialEq, Serialize)]
#[param(validate_with = Self::check_offset_exponent)]
pub struct AdvancedParameters {
    #[param(positive, limit = MAX_PARTICLES, min = 100, max = 1_000_000, step = 100, label = "Number of Stars")]
    count: u32,
    #[param(positive, min = 1.0, max = 100.0, step = 1.0, label = "Star Size")]
    size: f32,
    #[param(positive, min = 2, max = 100, step = 1, label = "Elliptical spread")]
    branches: u32,
    #[param(non_negative, min = 0.0, max = 10.0, step = 0.1, label = "Star Spread")]
    randomness: f32,
    #[param(positive, min = 0.1, max = 10.0, step = 0.1, label = "Color offset")]
    lerp: f32,
    #[param(positive, min = 0.001, max = 5.0, step = 0.001, label = "Distribution μ")]
    mu: f32,
    #[param(positive, min = 0.001, max = 2.0, step = 0.001, label = "Distribution σ")]
    sigma: f32,
    #[param(color, label = "Center Color")]
    inside_color: Color,
    #[param(color, label = "Outer Color")]
    outside_color: Color,
    #[param(label = "Blending")]
    blending: BlendMode,
}

impl Default for AdvancedParameters {
    fn default() -> Self {
        let spiral = SpiralParameters::default();
        Self {
            count: 300_000,
            size: 40.0,
            branches: 20,
            randomness: 2.0,
            lerp: 2.0,
            mu: 1.0,
            sigma: 0.5,
            inside_color: spiral.inside_color,
            outside_color: spiral.outside_color,
            blending: BlendMode::Additive,
        }
    }
}

impl AdvancedParameters {
    /// Keeps every log-normal offset finite and nonzero: the largest exponent
    /// the sampler can reach for `mu`/`sigma` must stay within f32 range.
    fn check_offset_exponent(&self) -> Result<(), String> {
        let exponent = log_normal_exponent_bound(self.mu, self.sigma);
        if exponent <= LOG_NORMAL_MAX_EXPONENT {
            Ok(())
        } else {
            Err(format!(
                "mu {} and sigma {} reach an exponent of {:.1}, above {}",
                self.mu, self.sigma, exponent, LOG_NORMAL_MAX_EXPONENT
            ))
        }
    }
}

/// A parameter set of either model, tagged by `"model"` in JSON.
///
/// ```ignore
/// let set = ParameterSet::from_json(r#"{ "model": "advanced", "branches": 12 }"#)?;
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum ParameterSet {
    Spiral(SpiralParameters),
    Advanced(AdvancedParameters),
}

impl ParameterSet {
    /// Model name as used in the `"model"` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            ParameterSet::Spiral(_) => "spiral",
            ParameterSet::Advanced(_) => "advanced",
        }
    }

    /// Parse a tagged configuration, starting from the model's defaults.
    ///
    /// Keys other than `"model"` go through [`Parameters::apply_partial`].
    pub fn from_json(json: &str) -> Result<Self, ParameterError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ParameterError::InvalidConfig(e.to_string()))?;
        let mut map = match value {
            Value::Object(map) => map,
            _ => return Err(ParameterError::InvalidConfig("expected a JSON object".into())),
        };
        let kind = match map.remove("model") {
            Some(Value::String(kind)) => kind,
            _ => return Err(ParameterError::InvalidConfig("missing \"model\" tag".into())),
        };

        match kind.as_str() {
            "spiral" => {
                let mut params = SpiralParameters::default();
                params.apply_partial(&map)?;
                Ok(ParameterSet::Spiral(params))
            }
            "advanced" => {
                let mut params = AdvancedParameters::default();
                params.apply_partial(&map)?;
                Ok(ParameterSet::Advanced(params))
            }
            other => Err(ParameterError::InvalidConfig(format!("unknown model '{}'", other))),
        }
    }

    /// Serialize to a tagged JSON object.
    pub fn to_json(&self) -> String {
        // Serializing plain numbers, strings and arrays cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl From<SpiralParameters> for ParameterSet {
    fn from(p: SpiralParameters) -> Self {
        ParameterSet::Spiral(p)
    }
}

impl From<AdvancedParameters> for ParameterSet {
    fn from(p: AdvancedParameters) -> Self {
        ParameterSet::Advanced(p)
    }
}
