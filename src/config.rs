//! Tuning constants for the renderer and the simulation.
//!
//! The distance thresholds are empirical and kept at their literal values;
//! changing them alters what the player sees and when items are picked up.

use crate::color::Color;

/// horizontal field of view in degrees
pub const FOV_DEG: f32 = 60.;
/// rays give up after travelling this far
pub const MAX_DEPTH: f32 = 50.;
/// ray marching increment
pub const MARCH_STEP: f32 = 0.02;
/// lower bound for perpendicular distances before dividing by them
pub const MIN_DISTANCE: f32 = 0.0001;

/// side length of a collectable cuboid in world units
pub const OBJECT_SIZE: f32 = 0.5;
/// objects closer than this are neither culled-in nor painted
pub const OBJECT_NEAR_CLIP: f32 = 0.8;
/// half-angle of the object visibility cone, as a fraction of the fov
pub const OBJECT_CONE: f32 = 0.6;
/// smallest painted object height in pixels
pub const OBJECT_MIN_HEIGHT: i32 = 2;
/// pickup radius around a cell centre
pub const PICKUP_RADIUS: f32 = 0.6;

pub const BACKGROUND: Color = Color::rgb(70, 70, 70);
pub const FLOOR: Color = Color::rgb(90, 90, 90);

/// Per-renderer settings. `Default` yields the constants above.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RenderConfig {
    pub fov_deg: f32,
    pub max_depth: f32,
    pub march_step: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov_deg: FOV_DEG,
            max_depth: MAX_DEPTH,
            march_step: MARCH_STEP,
        }
    }
}

impl RenderConfig {
    pub fn fov_rad(&self) -> f32 {
        self.fov_deg.to_radians()
    }
}
