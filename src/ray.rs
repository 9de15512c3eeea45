use crate::config::RenderConfig;
use crate::map::{Tile, WorldGrid};
use crate::pose::PoseSnapshot;
use glam::Vec2;

/// Result of marching one screen column's ray.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RayCast {
    /// absolute ray angle in radians
    pub angle: f32,
    /// distance travelled along the ray; `max_depth` on a miss
    pub distance: f32,
    /// fisheye-corrected distance; `max_depth` on a miss
    pub perpendicular: f32,
    /// tile that stopped the ray, `Tile::EMPTY` on a miss
    pub tile: Tile,
}

impl RayCast {
    pub fn is_hit(&self) -> bool {
        self.tile.is_wall()
    }
}

/// Nearest wall distance per column for the frame being drawn.
#[derive(Clone, Debug, Default)]
pub struct DepthBuffer {
    distances: Vec<f32>,
}

impl DepthBuffer {
    pub fn from_slices(slices: &[RayCast]) -> Self {
        let mut this = Self::default();
        this.refill(slices);
        this
    }

    /// overwrite with this frame's distances, keeping the allocation
    pub fn refill(&mut self, slices: &[RayCast]) {
        self.distances.clear();
        self.distances
            .extend(slices.iter().map(|slice| slice.perpendicular));
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// wall distance for `column`; columns outside the buffer are fully occluded
    pub fn get(&self, column: usize) -> f32 {
        self.distances.get(column).copied().unwrap_or(0.)
    }
}

impl From<Vec<f32>> for DepthBuffer {
    fn from(distances: Vec<f32>) -> Self {
        Self { distances }
    }
}

/// angle of the ray through `column` for a view `width` columns wide
#[inline]
pub fn column_angle(column: f32, width: usize, heading_rad: f32, fov_rad: f32) -> f32 {
    heading_rad - fov_rad * 0.5 + (column / width as f32) * fov_rad
}

/// inverse of [`column_angle`] for an offset from the heading
#[inline]
pub fn angle_to_column(offset_rad: f32, width: usize, fov_rad: f32) -> f32 {
    (offset_rad / fov_rad + 0.5) * width as f32
}

/// March a single ray at `angle` from the eye.
pub fn cast_column(
    grid: &WorldGrid,
    pose: &PoseSnapshot,
    angle: f32,
    config: &RenderConfig,
) -> RayCast {
    let dir = Vec2::from_angle(angle);
    let miss = RayCast {
        angle,
        distance: config.max_depth,
        perpendicular: config.max_depth,
        tile: Tile::EMPTY,
    };
    if config.march_step.is_nan() || config.march_step <= 0. {
        return miss;
    }

    let mut step = 0u32;
    loop {
        // multiply instead of accumulating so long rays do not drift
        let distance = step as f32 * config.march_step;
        if distance >= config.max_depth {
            return miss;
        }

        match grid.tile_at(pose.pos + dir * distance) {
            None => return miss,
            Some(tile) if tile.is_wall() => {
                return RayCast {
                    angle,
                    distance,
                    perpendicular: distance * (angle - pose.heading_rad()).cos(),
                    tile,
                }
            }
            Some(_) => step += 1,
        }
    }
}

/// Cast one ray per column of a `width` pixel wide view into `slices`.
pub fn cast_rays(
    grid: &WorldGrid,
    pose: &PoseSnapshot,
    width: usize,
    config: &RenderConfig,
    slices: &mut Vec<RayCast>,
) {
    slices.clear();
    let heading = pose.heading_rad();
    let fov = config.fov_rad();

    for column in 0..width {
        let angle = column_angle(column as f32, width, heading, fov);
        slices.push(cast_column(grid, pose, angle, config));
    }
}
