//! Solver tuning knobs
//!
//! `SolverConfig` is the full set; `SolverPatch` is what callers send at
//! runtime. A patch is merged into a copy of the current config and the copy
//! is validated before it replaces the live one, so a rejected patch changes
//! nothing.

use serde::{Deserialize, Serialize};

use crate::core::{ConfigError, ConfigResult, Vector};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverConfig {
    /// World gravity, overridden per body by `Body::gravity`.
    pub gravity: Vector,
    /// Sequential-impulse passes per step; 0 skips the solve.
    pub iterations: u32,
    pub warm_start: bool,
    /// Share of last step's impulses reapplied when warm starting.
    pub warm_start_factor: f64,
    /// Closing speed below which contacts do not bounce.
    pub restitution_threshold: f64,
    /// Fraction of penetration corrected per step.
    pub baumgarte: f64,
    /// Tolerated penetration.
    pub slop: f64,
    /// Tolerated rope/buffer error before the stored impulse is dropped.
    pub constraint_slop: f64,
    pub sleep: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gravity: Vector::new(0.0, -9.8),
            iterations: 20,
            warm_start: true,
            warm_start_factor: 0.8,
            restitution_threshold: 0.1,
            baumgarte: 0.2,
            slop: 0.005,
            constraint_slop: 0.01,
            sleep: true,
        }
    }
}

/// Partial update for [`SolverConfig`]; absent fields keep their value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverPatch {
    pub gravity: Option<Vector>,
    pub iterations: Option<u32>,
    pub warm_start: Option<bool>,
    pub warm_start_factor: Option<f64>,
    pub restitution_threshold: Option<f64>,
    pub baumgarte: Option<f64>,
    pub slop: Option<f64>,
    pub constraint_slop: Option<f64>,
    pub sleep: Option<bool>,
}

impl SolverPatch {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl SolverConfig {
    /// Copy of `self` with `patch` applied, or the first invalid field.
    pub fn merged(&self, patch: &SolverPatch) -> ConfigResult<Self> {
        let next = Self {
            gravity: patch.gravity.unwrap_or(self.gravity),
            iterations: patch.iterations.unwrap_or(self.iterations),
            warm_start: patch.warm_start.unwrap_or(self.warm_start),
            warm_start_factor: patch.warm_start_factor.unwrap_or(self.warm_start_factor),
            restitution_threshold: patch
                .restitution_threshold
                .unwrap_or(self.restitution_threshold),
            baumgarte: patch.baumgarte.unwrap_or(self.baumgarte),
            slop: patch.slop.unwrap_or(self.slop),
            constraint_slop: patch.constraint_slop.unwrap_or(self.constraint_slop),
            sleep: patch.sleep.unwrap_or(self.sleep),
        };
        next.validate()?;
        Ok(next)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.gravity.x.is_finite() && self.gravity.y.is_finite()) {
            return Err(invalid("gravity", "must be finite"));
        }
        if !(0.0..=1.0).contains(&self.warm_start_factor) {
            return Err(invalid("warmStartFactor", "must be within [0, 1]"));
        }
        non_negative("restitutionThreshold", self.restitution_threshold)?;
        non_negative("baumgarte", self.baumgarte)?;
        non_negative("slop", self.slop)?;
        non_negative("constraintSlop", self.constraint_slop)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue { field, reason: reason.to_string() }
}

fn non_negative(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be finite and >= 0"))
    }
}
