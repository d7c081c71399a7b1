//! Per-run configuration
//!
//! Every tunable the run recognizes lives here. A `RunConfig` is built once
//! per run and passed by reference to the components that need it; nothing
//! mutates it afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Immutable run parameters.
///
/// Deserialized with per-field defaults, so a config file only needs to name
/// the values it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    // === Camera / raycasting ===
    /// Horizontal field of view in radians.
    pub field_of_view: f32,
    /// March step length per ray iteration (world units).
    pub ray_step_increment: f32,
    /// No-hit sentinel distance; also bounds each ray's march.
    pub render_distance_cap: f32,

    // === Projection / shading ===
    /// Projected strip height is `height_multiplier / distance`.
    pub height_multiplier: f32,
    /// Shade floor reached by the most distant walls.
    pub shade_min: u8,
    /// Shade range above the floor for the nearest walls.
    pub shade_interval: u8,
    /// Falloff exponent of the shade curve.
    pub shade_pow: f32,
    /// Wall strip width in pixels; one ray is cast per `resolution_downscale`
    /// screen columns.
    pub resolution_downscale: u32,

    // === Track generation ===
    /// Number of inner lanes between the two outer walls.
    pub track_breadth: usize,
    /// Every `obstacle_spacing`-th row is an obstacle row.
    pub obstacle_spacing: usize,
    /// Per-lane wall probability within an obstacle row, in `[0, 1]`.
    pub obstacle_probability: f64,
    /// Rows kept generated beyond the player's row.
    pub generate_ahead: usize,
    /// Fully open run-in rows at the start of the track.
    pub initial_open_rows: usize,

    // === Difficulty ===
    /// Forward speed at the start line.
    pub base_speed: f32,
    /// Additional speed approached asymptotically over a run.
    pub max_additional_speed: f32,
    /// Distance at which half the additional speed is reached.
    pub half_maximum: f32,

    // === Movement / pacing ===
    /// Lateral steering speed (lanes per second).
    pub lateral_speed: f32,
    /// Frame pacing target. The timestep is still measured per frame.
    pub ideal_frame_rate: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            field_of_view: std::f32::consts::FRAC_PI_4,
            ray_step_increment: 0.02,
            render_distance_cap: 20.0,

            height_multiplier: 500.0,
            shade_min: 80,
            shade_interval: 175,
            shade_pow: 0.5,
            resolution_downscale: 2,

            track_breadth: 7,
            obstacle_spacing: 30,
            obstacle_probability: 0.6,
            generate_ahead: 200,
            initial_open_rows: 50,

            base_speed: 10.0,
            max_additional_speed: 20.0,
            half_maximum: 1000.0,

            lateral_speed: 5.0,
            ideal_frame_rate: 60,
        }
    }
}

impl RunConfig {
    /// Load a config from a JSON file, falling back to defaults on any
    /// problem. The fallback is logged, never fatal.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default run config");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded run config from {}", path.display());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "Invalid run config in {}: {err}; using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Could not read {}: {err}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Rays cast per frame for a surface of the given pixel width.
    pub fn ray_count(&self, surface_width: u32) -> usize {
        (surface_width / self.resolution_downscale).max(1) as usize
    }

    /// Valid range for the player's lateral position.
    pub fn lane_range(&self) -> (f32, f32) {
        (1.5, self.track_breadth as f32 + 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_overrides_single_field() {
        let config: RunConfig = serde_json::from_str(r#"{"track_breadth": 11}"#).unwrap();
        assert_eq!(config.track_breadth, 11);
        // Everything else keeps its default.
        assert_eq!(config.obstacle_spacing, RunConfig::default().obstacle_spacing);
        assert_eq!(config.shade_min, RunConfig::default().shade_min);
    }

    #[test]
    fn test_ray_count_respects_downscale() {
        let config = RunConfig::default();
        assert_eq!(config.ray_count(640), 320);
        // Never degenerates to zero rays, even for a tiny surface.
        assert_eq!(config.ray_count(1), 1);
    }

    #[test]
    fn test_lane_range_spans_inner_lanes() {
        let config = RunConfig::default();
        assert_eq!(config.lane_range(), (1.5, 7.5));
    }
}
