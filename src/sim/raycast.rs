//! Column raycaster
//!
//! One ray per screen column marches through the terrain grid in fixed
//! increments until it lands in an occupied cell. The reported distance is
//! the straight-line distance from the ray origin to the hit point rather
//! than the accumulated march length, which keeps wall projection free of
//! fisheye distortion. Rays are independent and read-only over the grid, so
//! a batch is computed across the rayon pool.

use glam::Vec2;
use rayon::prelude::*;

use super::terrain::TerrainGrid;
use crate::{RunConfig, ray_angle};

/// Per-column hit distances for one frame.
///
/// Pure derived data: rebuilt from the grid and player every frame, no
/// identity across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct RayBatch {
    distances: Vec<f32>,
}

impl RayBatch {
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn distances(&self) -> &[f32] {
        &self.distances
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.distances.iter().copied()
    }
}

#[cfg(test)]
impl RayBatch {
    pub(crate) fn from_distances(distances: Vec<f32>) -> Self {
        Self { distances }
    }
}

/// Fan-of-rays caster with fixed march parameters.
#[derive(Debug, Clone)]
pub struct RaycastEngine {
    field_of_view: f32,
    ray_count: usize,
    step_increment: f32,
    range_cap: f32,
    max_steps: u32,
}

impl RaycastEngine {
    pub fn new(field_of_view: f32, ray_count: usize, step_increment: f32, range_cap: f32) -> Self {
        assert!(ray_count > 0, "a fan needs at least one ray");
        assert!(step_increment > 0.0, "march step must be positive");
        assert!(range_cap > 0.0, "range cap must be positive");

        Self {
            field_of_view,
            ray_count,
            step_increment,
            range_cap,
            max_steps: (range_cap / step_increment).ceil() as u32,
        }
    }

    pub fn from_config(config: &RunConfig, surface_width: u32) -> Self {
        Self::new(
            config.field_of_view,
            config.ray_count(surface_width),
            config.ray_step_increment,
            config.render_distance_cap,
        )
    }

    /// Distance reported for rays that never hit anything. The projector
    /// skips columns at exactly this value.
    pub fn range_cap(&self) -> f32 {
        self.range_cap
    }

    /// Cast the full fan from `origin` around `heading`.
    ///
    /// The grid must already be generated past `range_cap` ahead of the
    /// origin; extension runs earlier in the frame.
    pub fn cast(&self, terrain: &TerrainGrid, origin: Vec2, heading: f32) -> RayBatch {
        let results: Vec<(f32, bool)> = (0..self.ray_count)
            .into_par_iter()
            .map(|i| {
                let angle = ray_angle(heading, self.field_of_view, i, self.ray_count);
                self.march(terrain, origin, angle)
            })
            .collect();

        let overflowed = results.iter().filter(|(_, overflow)| *overflow).count();
        if overflowed > 0 {
            log::warn!("{overflowed} rays exceeded the march bound, reported at range cap");
        }

        RayBatch {
            distances: results.into_iter().map(|(d, _)| d).collect(),
        }
    }

    /// March a single ray. Returns the hit distance and whether the bounded
    /// iteration guard tripped (a no-hit, reported at the range cap).
    ///
    /// Termination: the outer wall columns and the solid start row bound the
    /// track on every side the fan can point at, and `max_steps` bounds the
    /// march even if that invariant is ever broken.
    fn march(&self, terrain: &TerrainGrid, origin: Vec2, angle: f32) -> (f32, bool) {
        let step = Vec2::from_angle(angle) * self.step_increment;
        let mut pos = origin;

        for _ in 0..self.max_steps {
            if terrain.occupied(pos.x as usize, pos.y as usize) {
                return (pos.distance(origin), false);
            }
            pos += step;
        }

        (self.range_cap, true)
    }
}
