use std::time::Duration;

use crate::foundation::error::{FolioError, FolioResult};

/// Block types that qualify for tracking when no list is configured.
pub const DEFAULT_BLOCK_TYPES: [&str; 7] = [
    "projectArticle",
    "image",
    "code",
    "title",
    "iframe",
    "pieceThumbnail",
    "projectThumbnail",
];

/// Bridge configuration. Every field has a default, so `{}` is a valid JSON config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// `data-blocktype` values that are tracked.
    pub block_types: Vec<String>,
    /// Marker class added to tracked elements.
    pub tracked_class: String,
    /// Delay between the last DOM mutation and the block scan.
    pub mutation_debounce_ms: u64,
    /// Delay between the last resize event and the resync.
    pub resize_debounce_ms: u64,
    /// Blocks further than this from the viewport are taken out of the simulation.
    pub cull_margin_px: f64,
    /// Decimal places kept in written transforms.
    pub transform_precision: u32,
    /// Fraction of the anchor offset closed per second by the position correction. At
    /// most `1 / timestep_s`.
    pub correction_rate: f64,
    /// Linear and angular damping of tracked block bodies.
    pub block_damping: f64,
    /// Block body density; mass is `area * block_density`.
    pub block_density: f64,
    /// Gravity in px/s^2 (y down).
    pub gravity: f64,
    /// Simulation step in seconds.
    pub timestep_s: f64,
    /// Pixels per simulated meter.
    pub pixels_per_meter: f64,
    /// Thickness of the ground and ceiling boxes.
    pub boundary_thickness: f64,
    /// How far the ground's top edge sits above the viewport bottom.
    pub ground_inset: f64,
    /// Ceiling center y, relative to the viewport top.
    pub ceiling_y: f64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            block_types: DEFAULT_BLOCK_TYPES.iter().map(|s| s.to_string()).collect(),
            tracked_class: "physics-block".to_string(),
            mutation_debounce_ms: 500,
            resize_debounce_ms: 50,
            cull_margin_px: 400.0,
            transform_precision: 2,
            correction_rate: 10.0,
            block_damping: 4.0,
            block_density: 0.001,
            gravity: 980.0,
            timestep_s: 1.0 / 60.0,
            pixels_per_meter: 100.0,
            boundary_thickness: 400.0,
            ground_inset: 8.0,
            ceiling_y: -600.0,
        }
    }
}

impl BridgeConfig {
    /// Parse a JSON config.
    pub fn from_json(json: &str) -> FolioResult<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate numeric ranges.
    pub fn validate(&self) -> FolioResult<()> {
        for (name, value) in [
            ("cull_margin_px", self.cull_margin_px),
            ("correction_rate", self.correction_rate),
            ("block_damping", self.block_damping),
            ("boundary_thickness", self.boundary_thickness),
            ("ground_inset", self.ground_inset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FolioError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        for (name, value) in [
            ("block_density", self.block_density),
            ("timestep_s", self.timestep_s),
            ("pixels_per_meter", self.pixels_per_meter),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FolioError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if self.correction_rate * self.timestep_s > 1.0 {
            return Err(FolioError::validation(format!(
                "correction_rate must be <= 1 / timestep_s ({:.1})",
                1.0 / self.timestep_s
            )));
        }
        if !self.gravity.is_finite() || !self.ceiling_y.is_finite() {
            return Err(FolioError::validation("gravity/ceiling_y must be finite"));
        }
        if self.transform_precision > 6 {
            return Err(FolioError::validation("transform_precision must be <= 6"));
        }
        if self.tracked_class.trim().is_empty() {
            return Err(FolioError::validation("tracked_class must be non-empty"));
        }
        Ok(())
    }

    pub(crate) fn mutation_debounce(&self) -> Duration {
        Duration::from_millis(self.mutation_debounce_ms)
    }

    pub(crate) fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

/// Tuning for a decorative caterpillar actor. These are presentation constants, not a
/// physical model.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Number of segments (head and tail included).
    pub segments: usize,
    /// Segment diameter in pixels.
    pub segment_size: f64,
    /// Link rest length as a multiple of `segment_size + 2`.
    pub floppiness: f64,
    /// Segment-to-segment spring stiffness.
    pub link_stiffness: f64,
    /// Segment-to-segment spring damping.
    pub link_damping: f64,
    /// Head-to-tail spine stiffness.
    pub spine_stiffness: f64,
    /// Head-to-tail spine damping.
    pub spine_damping: f64,
    /// Segment density.
    pub density: f64,
    /// Segment restitution.
    pub restitution: f64,
    /// Segment friction.
    pub friction: f64,
    /// Horizontal head speed while walking, px/s.
    pub stride_speed: f64,
    /// Upward belly speed while walking, px/s.
    pub curl_speed: f64,
    /// Head kick speed while switching direction, px/s.
    pub kick_speed: f64,
    /// Hard cap on the switching phase.
    pub switch_timeout_ms: u64,
    /// Distance below which a segment counts as touching scenery.
    pub contact_tolerance: f64,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            segments: 8,
            segment_size: 8.0,
            floppiness: 0.5,
            link_stiffness: 400.0,
            link_damping: 8.0,
            spine_stiffness: 120.0,
            spine_damping: 6.0,
            density: 1.0,
            restitution: 0.8,
            friction: 0.6,
            stride_speed: 60.0,
            curl_speed: 40.0,
            kick_speed: 180.0,
            switch_timeout_ms: 3000,
            contact_tolerance: 1.0,
        }
    }
}

impl ActorConfig {
    /// Validate numeric ranges.
    pub fn validate(&self) -> FolioResult<()> {
        if self.segments < 2 {
            return Err(FolioError::validation("actor needs at least 2 segments"));
        }
        for (name, value) in [
            ("segment_size", self.segment_size),
            ("floppiness", self.floppiness),
            ("density", self.density),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FolioError::validation(format!(
                    "actor {name} must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("link_stiffness", self.link_stiffness),
            ("link_damping", self.link_damping),
            ("spine_stiffness", self.spine_stiffness),
            ("spine_damping", self.spine_damping),
            ("restitution", self.restitution),
            ("friction", self.friction),
            ("stride_speed", self.stride_speed),
            ("curl_speed", self.curl_speed),
            ("kick_speed", self.kick_speed),
            ("contact_tolerance", self.contact_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FolioError::validation(format!(
                    "actor {name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn switch_timeout(&self) -> Duration {
        Duration::from_millis(self.switch_timeout_ms)
    }

    /// Resting head-to-tail length.
    pub fn body_length(&self) -> f64 {
        self.segment_size * self.segments as f64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/physics/config.rs"]
mod tests;
