use crate::color::Color;
use crate::frame::{Frame, Rect};
use crate::map::WorldGrid;
use crate::pose::PoseSnapshot;
use std::f32::consts::PI;
use std::sync::Arc;

const PADDING: i32 = 6;
const CORNER_RADIUS: i32 = 6;
const BACKDROP: Color = Color::rgba(0, 0, 0, 160);
const GRID_COLOR: Color = Color::rgba(255, 255, 255, 30);
const PLAYER_COLOR: Color = Color::rgb(255, 80, 60);
const VISITED_FLOOR: Color = Color::rgba(120, 160, 120, 110);

/// largest side of the collapsed minimap
pub const NORMAL_SIZE: i32 = 180;
/// gap between the collapsed minimap and the window edges
pub const MARGIN: i32 = 10;
/// expanded side as a fraction of the window's shorter side
pub const EXPANDED_FRACTION: f32 = 0.8;

/// Cells the player has stood on. Bits are only ever set.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct VisitedMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl VisitedMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// out of range cells are ignored
    pub fn mark(&mut self, x: i64, y: i64) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = true;
        }
    }

    pub fn is_visited(&self, x: i64, y: i64) -> bool {
        self.index(x, y).is_some_and(|idx| self.cells[idx])
    }

    /// any of the eight neighbours visited
    pub fn adjacent_to_visited(&self, x: i64, y: i64) -> bool {
        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&offset| offset != (0, 0))
            .any(|(dx, dy)| self.is_visited(x + dx, y + dy))
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&visited| visited).count()
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }
}

/// Collapsed minimap placement in the top right corner of a `width` x `height` window.
pub fn normal_bounds_for(width: i32, height: i32) -> Option<Rect> {
    let size = NORMAL_SIZE.min((width / 3).min(height / 3));
    if size <= 0 {
        return None;
    }
    let x = MARGIN.max(width - size - MARGIN);
    Some(Rect::new(x, MARGIN, size, size))
}

/// Top-down overview with fog of war.
///
/// Layout has two states: collapsed into the host supplied normal bounds, or
/// expanded into a square centred in the parent.
#[derive(Default)]
pub struct Minimap {
    grid: Option<Arc<WorldGrid>>,
    visited: VisitedMask,
    player: Option<PoseSnapshot>,
    expanded: bool,
    normal_bounds: Rect,
    bounds: Rect,
    parent: (i32, i32),
}

impl Minimap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the player on `grid`, resetting the fog if the grid changed.
    pub fn set_state(&mut self, grid: &Arc<WorldGrid>, pose: PoseSnapshot) {
        let same_grid = self
            .grid
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, grid));
        if !same_grid || self.visited.dims() != (grid.width, grid.height) {
            log::debug!(
                "minimap tracking new {}x{} grid",
                grid.width,
                grid.height
            );
            self.grid = Some(Arc::clone(grid));
            self.visited = VisitedMask::new(grid.width, grid.height);
        }

        self.player = Some(pose);
        if let Some((x, y)) = pose.cell() {
            self.visited.mark(x as i64, y as i64);
        }
    }

    pub fn visited(&self) -> &VisitedMask {
        &self.visited
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_normal_bounds(&mut self, bounds: Rect) {
        self.normal_bounds = bounds;
        if !self.expanded {
            self.bounds = bounds;
        }
    }

    /// re-apply the active layout after the parent changed size
    pub fn handle_parent_resize(&mut self, width: i32, height: i32) {
        self.parent = (width, height);
        if let Some(bounds) = normal_bounds_for(width, height) {
            self.set_normal_bounds(bounds);
        }
        self.apply_bounds_for_state();
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
        log::debug!("minimap expanded: {}", self.expanded);
        self.apply_bounds_for_state();
    }

    /// toggle if the click landed on the minimap; returns whether it did
    pub fn click(&mut self, x: i32, y: i32) -> bool {
        if !self.bounds.contains(x, y) {
            return false;
        }
        self.toggle_expanded();
        true
    }

    fn apply_bounds_for_state(&mut self) {
        self.bounds = if self.expanded {
            let (pw, ph) = self.parent;
            let size = (pw.min(ph) as f32 * EXPANDED_FRACTION) as i32;
            Rect::new((pw - size) / 2, (ph - size) / 2, size, size)
        } else {
            self.normal_bounds
        };
    }

    /// pixels per grid cell at the current bounds
    pub fn cell_size(&self) -> f32 {
        let Some(grid) = &self.grid else {
            return 1.;
        };
        let usable_w = (self.bounds.w - PADDING * 2).max(1) as f32;
        let usable_h = (self.bounds.h - PADDING * 2).max(1) as f32;
        let scale = (usable_w / grid.width as f32).min(usable_h / grid.height as f32);
        scale.max(1.)
    }

    /// walls show once the player has stood on or next to them
    pub fn is_revealed(&self, x: i64, y: i64) -> bool {
        self.visited.is_visited(x, y) || self.visited.adjacent_to_visited(x, y)
    }

    pub fn draw(&self, frame: &mut Frame) {
        let Some(grid) = &self.grid else {
            return;
        };
        if self.bounds.is_empty() {
            return;
        }

        frame.set_clip(Some(self.bounds));
        frame.fill_round_rect(self.bounds, CORNER_RADIUS, BACKDROP);

        let size = self.cell_size();
        let ox = (self.bounds.x + PADDING) as f32;
        let oy = (self.bounds.y + PADDING) as f32;
        let cell = size.ceil() as i32;
        let to_screen = |x: f32, y: f32| {
            ((ox + x * size).round() as i32, (oy + y * size).round() as i32)
        };

        // orientation grid
        let (right, bottom) = to_screen(grid.width as f32, grid.height as f32);
        for row in 0..=grid.height {
            let (left, y) = to_screen(0., row as f32);
            frame.fill_rect(Rect::new(left, y, right - left + 1, 1), GRID_COLOR);
        }
        for col in 0..=grid.width {
            let (x, top) = to_screen(col as f32, 0.);
            frame.fill_rect(Rect::new(x, top, 1, bottom - top + 1), GRID_COLOR);
        }

        // explored floor first so revealed walls sit on top of it
        for ((x, y), tile) in grid.tiles() {
            if tile.is_wall() || !self.visited.is_visited(x as i64, y as i64) {
                continue;
            }
            let (sx, sy) = to_screen(x as f32, y as f32);
            frame.fill_rect(Rect::new(sx, sy, cell, cell), VISITED_FLOOR);
        }

        for ((x, y), tile) in grid.tiles() {
            if !tile.is_wall() || !self.is_revealed(x as i64, y as i64) {
                continue;
            }
            let (sx, sy) = to_screen(x as f32, y as f32);
            frame.fill_rect(Rect::new(sx, sy, cell, cell), tile.color());
        }

        if let Some(pose) = self.player {
            let centre = to_screen(pose.pos.x, pose.pos.y);
            let marker = player_marker(centre, pose.heading_rad(), size);
            frame.fill_polygon(&marker, PLAYER_COLOR);
            frame.stroke_polygon(&marker, Color::BLACK);
        }

        frame.set_clip(None);
    }
}

/// arrowhead pointing along `heading`
fn player_marker((px, py): (i32, i32), heading: f32, cell_size: f32) -> [(i32, i32); 3] {
    let radius = (cell_size * 1.5).max(4.);
    let point = |angle: f32| {
        (
            (px as f32 + angle.cos() * radius).round() as i32,
            (py as f32 + angle.sin() * radius).round() as i32,
        )
    };
    [
        point(heading),
        point(heading + PI * 0.75),
        point(heading - PI * 0.75),
    ]
}
