//! Physics stepper tuning
//!
//! Loaded from JSON so levels can tweak gravity and contact tolerances
//! without a rebuild. Missing fields fall back to the defaults in `consts`.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::PhysicsError;

/// Stepper settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Constant acceleration applied to every physical entity
    pub gravity: Vec2,
    /// Seconds an entity keeps its grounded flag after the last ground contact
    pub ground_grace: f32,
    /// Minimum steepness (`-n · UP`) for a contact to count as ground
    pub ground_slope: f32,
    /// Collision sub-steps per entity per frame
    pub max_substeps: u32,
    /// Remaining step fraction below which sub-stepping stops
    pub min_remaining_time: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            ground_grace: GROUND_GRACE,
            ground_slope: GROUND_SLOPE,
            max_substeps: MAX_SUBSTEPS,
            min_remaining_time: MIN_REMAINING_TIME,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, PhysicsError> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PhysicsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded physics settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, PhysicsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp values that would stall or invert the stepper
    fn sanitized(mut self) -> Self {
        if self.max_substeps == 0 {
            log::warn!("max_substeps must be at least 1, using 1");
            self.max_substeps = 1;
        }
        self.ground_grace = self.ground_grace.max(0.0);
        self.ground_slope = self.ground_slope.clamp(0.0, 1.0);
        self.min_remaining_time = self.min_remaining_time.max(0.0);
        self
    }
}
