use crate::color::Color;
use crate::config::{FLOOR, MIN_DISTANCE};
use crate::frame::Frame;
use crate::map::Tile;
use crate::ray::RayCast;

/// Screen rows covered by one column's wall and floor.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct WallSpan {
    pub top: i32,
    pub bottom: i32,
    pub wall_color: Color,
    /// `None` when the wall reaches the last row
    pub floor_color: Option<Color>,
}

/// walls grow downwards from row 0; the extra eighth tilts the camera down
#[inline]
pub fn vertical_offset(height: usize) -> i32 {
    height as i32 / 8
}

/// wall height in pixels for a perpendicular distance
#[inline]
pub fn wall_height(perpendicular: f32, height: usize) -> i32 {
    (height as f32 / perpendicular.max(MIN_DISTANCE)) as i32
}

/// last row of a wall (or of the floor line under an object) at `perpendicular`
#[inline]
pub fn floor_row(perpendicular: f32, height: usize) -> i32 {
    let bottom = wall_height(perpendicular, height).saturating_add(vertical_offset(height));
    (height as i32 - 1).min(bottom)
}

pub fn project_wall(perpendicular: f32, tile: Tile, height: usize) -> WallSpan {
    let distance = perpendicular.max(MIN_DISTANCE);
    let bottom = floor_row(distance, height);
    let shade = (1. / (1. + distance * 0.1)).max(0.2);

    let floor_color = (bottom < height as i32 - 1).then(|| {
        let floor_shade = (0.8 - bottom as f32 / height as f32).max(0.1);
        FLOOR.shade(floor_shade)
    });

    WallSpan {
        top: 0,
        bottom,
        wall_color: tile.color().shade(shade),
        floor_color,
    }
}

/// Paint one wall and floor strip per cast column.
pub fn draw_walls(frame: &mut Frame, slices: &[RayCast]) {
    let height = frame.height();
    for (column, slice) in slices.iter().enumerate() {
        let span = project_wall(slice.perpendicular, slice.tile, height);
        let x = column as i32;
        frame.vline(x, span.top, span.bottom, span.wall_color);
        if let Some(floor) = span.floor_color {
            frame.vline(x, span.bottom + 1, height as i32 - 1, floor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_walls_fill_the_column() {
        let span = project_wall(0.5, Tile::OUTER_WALL, 600);
        assert_eq!(span.bottom, 599);
        assert!(span.floor_color.is_none());
    }

    #[test]
    fn far_walls_shade_down_to_the_floor() {
        let span = project_wall(50., Tile(3), 600);
        // 600 / 50 = 12, plus 600 / 8
        assert_eq!(span.bottom, 87);
        assert_eq!(span.wall_color, Color::rgb(200, 40, 40).shade(0.2));
        let floor_shade = 0.8 - 87. / 600.;
        assert_eq!(span.floor_color, Some(FLOOR.shade(floor_shade)));
    }

    #[test]
    fn zero_distance_is_clamped() {
        let span = project_wall(0., Tile::OUTER_WALL, 100);
        assert_eq!(span.bottom, 99);
        assert_eq!(
            span.wall_color,
            Tile::OUTER_WALL.color().shade(1. / (1. + MIN_DISTANCE * 0.1))
        );
    }
}
