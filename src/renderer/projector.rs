//! Distance-to-screen projection
//!
//! Painter's algorithm with no depth buffer: sky fill, ground fill, then one
//! vertical wall strip per ray column. Strip height is inversely
//! proportional to hit distance and the wall's red channel carries a depth
//! shade that falls off with distance.

use super::surface::{RenderSurface, Rgb, Viewport};
use crate::RunConfig;
use crate::consts::DISTANCE_EPSILON;
use crate::sim::RayBatch;

/// Sky fill, upper half of the frame.
const SKY: Rgb = Rgb::new(0x92, 0xb4, 0xf4);
/// Ground fill, lower half.
const GROUND: Rgb = Rgb::new(0x66, 0x7e, 0x2c);
/// Fixed green and blue wall channels; red carries the shade.
const WALL_G: u8 = 32;
const WALL_B: u8 = 64;

/// Per-column wall projector.
#[derive(Debug, Clone)]
pub struct Projector {
    height_multiplier: f32,
    range_cap: f32,
    shade_min: u8,
    shade_interval: u8,
    shade_pow: f32,
    downscale: u32,
}

impl Projector {
    pub fn new(
        height_multiplier: f32,
        range_cap: f32,
        shade_min: u8,
        shade_interval: u8,
        shade_pow: f32,
        downscale: u32,
    ) -> Self {
        assert!(downscale > 0, "strip width must be at least one pixel");
        Self {
            height_multiplier,
            range_cap,
            shade_min,
            shade_interval,
            shade_pow,
            downscale,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            config.height_multiplier,
            config.render_distance_cap,
            config.shade_min,
            config.shade_interval,
            config.shade_pow,
            config.resolution_downscale,
        )
    }

    /// Depth shade for a wall at `distance`: brightest up close, settling at
    /// the shade floor far away.
    pub fn shade(&self, distance: f32) -> u8 {
        let falloff = f32::from(self.shade_interval) / (1.0 + distance).powf(self.shade_pow);
        self.shade_min.saturating_add(falloff as u8)
    }

    /// Composite one frame onto the surface.
    ///
    /// Columns with a degenerate distance (the origin already inside a wall)
    /// or at the no-hit sentinel draw nothing but sky and ground.
    pub fn project(&self, rays: &RayBatch, viewport: Viewport, surface: &mut dyn RenderSurface) {
        surface.fill_background(SKY);

        let horizon = viewport.horizon();
        surface.draw_filled_rect(0, horizon, viewport.width, viewport.height / 2, GROUND);

        for (i, distance) in rays.iter().enumerate() {
            if distance.abs() < DISTANCE_EPSILON || distance == self.range_cap {
                continue;
            }

            let wall_height = self.height_multiplier / distance;
            let color = Rgb::new(self.shade(distance), WALL_G, WALL_B);
            surface.draw_filled_rect(
                (i as u32 * self.downscale) as i32,
                horizon - wall_height as i32,
                self.downscale,
                (2.0 * wall_height) as u32,
                color,
            );
        }
    }
}
