use crate::config::{RenderConfig, BACKGROUND};
use crate::frame::Frame;
use crate::map::WorldGrid;
use crate::object::{draw_objects, CollectableObject};
use crate::pose::PoseSnapshot;
use crate::ray::{cast_rays, DepthBuffer, RayCast};
use crate::wall::draw_walls;

/// First-person view renderer.
///
/// Keeps the per-column casts and the depth buffer between frames only to
/// reuse their allocations; both are rewritten at the start of every frame.
pub struct Renderer {
    pub config: RenderConfig,
    slices: Vec<RayCast>,
    depth: DepthBuffer,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            slices: Vec::new(),
            depth: DepthBuffer::default(),
        }
    }

    /// casts from the most recent frame
    pub fn slices(&self) -> &[RayCast] {
        &self.slices
    }

    /// depth buffer from the most recent frame
    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Draw walls, floor and objects. Degenerate frames or grids draw nothing
    /// and return false.
    pub fn render_frame(
        &mut self,
        frame: &mut Frame,
        grid: &WorldGrid,
        pose: &PoseSnapshot,
        objects: &[CollectableObject],
    ) -> bool {
        if frame.is_empty() || grid.width == 0 || grid.height == 0 {
            log::debug!(
                "skipping frame: viewport {}x{}, grid {}x{}",
                frame.width(),
                frame.height(),
                grid.width,
                grid.height
            );
            return false;
        }

        frame.clear(BACKGROUND);

        cast_rays(grid, pose, frame.width(), &self.config, &mut self.slices);
        self.depth.refill(&self.slices);

        draw_walls(frame, &self.slices);
        let drawn = draw_objects(frame, objects, pose, &self.depth, &self.config);

        log::trace!(
            "frame at ({:.2}, {:.2}) heading {:.1}: {} objects drawn",
            pose.pos.x,
            pose.pos.y,
            pose.heading_deg,
            drawn
        );
        true
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}
