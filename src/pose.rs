use crate::map::WorldGrid;
use glam::Vec2;
use std::sync::atomic::{AtomicU32, Ordering};

/// wrap a heading in degrees into [0, 360)
pub fn normalize_heading(deg: f32) -> f32 {
    let wrapped = deg.rem_euclid(360.);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360. {
        0.
    } else {
        wrapped
    }
}

/// wrap an angle in radians into [-PI, PI]
pub fn normalize_radians(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    while angle > PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PoseSnapshot {
    pub pos: Vec2,
    pub heading_deg: f32,
}

impl PoseSnapshot {
    pub fn new(x: f32, y: f32, heading_deg: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            heading_deg: normalize_heading(heading_deg),
        }
    }

    pub fn heading_rad(&self) -> f32 {
        self.heading_deg.to_radians()
    }

    /// cell under the eye, or None if either coordinate is negative
    pub fn cell(&self) -> Option<(usize, usize)> {
        if self.pos.x < 0. || self.pos.y < 0. || !self.pos.is_finite() {
            return None;
        }
        Some((self.pos.x as usize, self.pos.y as usize))
    }
}

/// f32 stored as raw bits so it can live in an atomic
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed)
    }

    fn update(&self, f: impl Fn(f32) -> f32) -> f32 {
        let prev = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some(f(f32::from_bits(bits)).to_bits())
            })
            .unwrap_or_else(|bits| bits);
        f(f32::from_bits(prev))
    }
}

/// Player position and heading shared between the motion loops and the renderer.
///
/// Every field is individually atomic; a reader may observe `x` from one
/// update and `y` from the next.
pub struct Pose {
    x: AtomicF32,
    y: AtomicF32,
    heading_deg: AtomicF32,
}

impl Pose {
    pub fn new(x: f32, y: f32, heading_deg: f32) -> Self {
        Self {
            x: AtomicF32::new(x),
            y: AtomicF32::new(y),
            heading_deg: AtomicF32::new(normalize_heading(heading_deg)),
        }
    }

    pub fn snapshot(&self) -> PoseSnapshot {
        PoseSnapshot {
            pos: Vec2::new(self.x.load(), self.y.load()),
            heading_deg: self.heading_deg.load(),
        }
    }

    pub fn heading_deg(&self) -> f32 {
        self.heading_deg.load()
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x.load(), self.y.load())
    }

    /// teleport without collision checks (used when switching grids)
    pub fn reset(&self, x: f32, y: f32, heading_deg: f32) {
        self.x.store(x);
        self.y.store(y);
        self.heading_deg.store(normalize_heading(heading_deg));
    }

    /// returns the new heading
    pub fn rotate(&self, delta_deg: f32) -> f32 {
        self.heading_deg
            .update(|heading| normalize_heading(heading + delta_deg))
    }

    /// Move to `next` if it stays one cell inside the border and lands on floor.
    pub fn try_move(&self, grid: &WorldGrid, next: Vec2) -> bool {
        let max_x = grid.width as f32 - 1.;
        let max_y = grid.height as f32 - 1.;
        if !next.is_finite() || next.x < 1. || next.y < 1. || next.x >= max_x || next.y >= max_y {
            return false;
        }
        if grid.colliding(next).is_some() {
            return false;
        }

        self.x.store(next.x);
        self.y.store(next.y);
        true
    }

    /// Walk `forward` units along the heading and `strafe` units to its right.
    pub fn step(&self, grid: &WorldGrid, forward: f32, strafe: f32) -> bool {
        let dir = Vec2::from_angle(self.heading_deg().to_radians());
        let delta = dir * forward + dir.perp() * strafe;
        self.try_move(grid, self.pos() + delta)
    }
}
