use crate::color::Color;
use crate::config::{OBJECT_CONE, OBJECT_MIN_HEIGHT, OBJECT_NEAR_CLIP, OBJECT_SIZE, RenderConfig};
use crate::frame::Frame;
use crate::pose::{normalize_radians, PoseSnapshot};
use crate::ray::{angle_to_column, column_angle, DepthBuffer};
use crate::wall::{floor_row, wall_height};
use glam::Vec2;

/// below this a direction component counts as parallel to the axis
const PARALLEL_EPSILON: f32 = 1e-9;

/// An item sitting in a grid cell, drawn as a small cuboid until picked up.
#[derive(Clone, PartialEq, Debug)]
pub struct CollectableObject {
    pub x: i32,
    pub y: i32,
    pub name: String,
    pub color: Color,
    collected: bool,
}

impl CollectableObject {
    pub fn new(x: i32, y: i32, name: impl Into<String>, color: Color) -> Self {
        Self {
            x,
            y,
            name: name.into(),
            color,
            collected: false,
        }
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// returns false if the object was already collected
    pub(crate) fn mark_collected(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::around(self.center(), OBJECT_SIZE)
    }
}

/// Side of a box a ray enters through, named after the face normal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Face {
    NegX,
    PosX,
    NegY,
    PosY,
}

impl Face {
    /// brightness multiplier applied before distance shading
    pub fn tint(self) -> f32 {
        match self {
            Face::NegX => 0.75,
            Face::NegY => 1.2,
            Face::PosX | Face::PosY => 1.,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SlabHit {
    pub enter: f32,
    pub exit: f32,
    pub face: Face,
}

/// Axis aligned square in world space.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn around(center: Vec2, size: f32) -> Self {
        let half = Vec2::splat(size * 0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Slab test for a ray starting at `origin`.
    ///
    /// Only hits strictly in front of the origin are reported, so an origin
    /// inside the box misses.
    pub fn ray_intersect(&self, origin: Vec2, dir: Vec2) -> Option<SlabHit> {
        let (tx0, tx1, face_x) = slab(
            origin.x,
            dir.x,
            self.min.x,
            self.max.x,
            (Face::NegX, Face::PosX),
        )?;
        let (ty0, ty1, face_y) = slab(
            origin.y,
            dir.y,
            self.min.y,
            self.max.y,
            (Face::NegY, Face::PosY),
        )?;

        let (enter, face) = if tx0 >= ty0 {
            (tx0, face_x)
        } else {
            (ty0, face_y)
        };
        let exit = tx1.min(ty1);

        if enter > exit || exit < 0. || enter <= 0. {
            return None;
        }
        Some(SlabHit { enter, exit, face })
    }
}

/// entry and exit parameters along one axis, plus the face entered through
fn slab(
    origin: f32,
    dir: f32,
    min: f32,
    max: f32,
    (neg, pos): (Face, Face),
) -> Option<(f32, f32, Face)> {
    if dir.abs() < PARALLEL_EPSILON {
        if origin < min || origin > max {
            return None;
        }
        return Some((f32::NEG_INFINITY, f32::INFINITY, neg));
    }

    let t_min = (min - origin) / dir;
    let t_max = (max - origin) / dir;
    if dir > 0. {
        Some((t_min, t_max, neg))
    } else {
        Some((t_max, t_min, pos))
    }
}

/// One painted screen column of an object.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ObjectColumn {
    pub column: usize,
    pub face: Face,
    /// perpendicular distance to the entry point
    pub near: f32,
    /// perpendicular distance to the exit point
    pub far: f32,
    pub top: i32,
    pub bottom: i32,
    /// highest of the near and far top edges
    pub cap_top: i32,
}

/// (top, bottom) rows of a box edge standing on the floor at `perpendicular`
fn edge_rows(perpendicular: f32, height: usize) -> (i32, i32) {
    let bottom = floor_row(perpendicular, height);
    let size = (OBJECT_SIZE * wall_height(perpendicular, height) as f32) as i32;
    let size = size.max(OBJECT_MIN_HEIGHT);
    (bottom - size, bottom)
}

fn distance_shade(perpendicular: f32) -> f32 {
    (1. / (1. + perpendicular * 0.08)).max(0.3)
}

/// True if the object is too close or outside the visibility cone.
pub fn is_culled(object: &CollectableObject, pose: &PoseSnapshot, config: &RenderConfig) -> bool {
    let offset = object.center() - pose.pos;
    if offset.length() < OBJECT_NEAR_CLIP {
        return true;
    }
    let bearing = offset.y.atan2(offset.x);
    normalize_radians(bearing - pose.heading_rad()).abs() > OBJECT_CONE * config.fov_rad()
}

/// Intersect every column the object spans and keep those not hidden by a wall.
pub fn visible_columns(
    object: &CollectableObject,
    pose: &PoseSnapshot,
    depth: &DepthBuffer,
    (width, height): (usize, usize),
    config: &RenderConfig,
) -> Vec<ObjectColumn> {
    if width == 0 || height == 0 || object.is_collected() || is_culled(object, pose, config) {
        return Vec::new();
    }

    let heading = pose.heading_rad();
    let fov = config.fov_rad();
    let bounds = object.bounds();

    let (lo, hi) = bounds
        .corners()
        .iter()
        .map(|corner| {
            let offset = *corner - pose.pos;
            let diff = normalize_radians(offset.y.atan2(offset.x) - heading);
            angle_to_column(diff, width, fov)
        })
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), c| {
            (lo.min(c), hi.max(c))
        });
    let first = lo.floor().max(0.) as usize;
    let last = (hi.ceil().max(-1.) as i64).min(width as i64 - 1);
    if last < first as i64 {
        return Vec::new();
    }

    let mut columns = Vec::new();
    for column in first..=last as usize {
        let angle = column_angle(column as f32, width, heading, fov);
        let Some(hit) = bounds.ray_intersect(pose.pos, Vec2::from_angle(angle)) else {
            continue;
        };

        let correction = (angle - heading).cos();
        let near = hit.enter * correction;
        let far = hit.exit * correction;
        if near <= OBJECT_NEAR_CLIP || near >= depth.get(column) {
            continue;
        }

        let (top, bottom) = edge_rows(near, height);
        let (far_top, _) = edge_rows(far, height);
        columns.push(ObjectColumn {
            column,
            face: hit.face,
            near,
            far,
            top,
            bottom,
            cap_top: top.min(far_top),
        });
    }

    columns
}

/// Paint the object's side columns, then its top face over each unbroken run of them.
pub fn draw_object(frame: &mut Frame, color: Color, columns: &[ObjectColumn]) {
    for col in columns {
        let shaded = color.scale(col.face.tint()).shade(distance_shade(col.near));
        frame.vline(col.column as i32, col.top, col.bottom, shaded);
    }

    if columns.is_empty() {
        return;
    }
    let mean = columns.iter().map(|col| col.near).sum::<f32>() / columns.len() as f32;
    let cap = color.scale(1.25).shade(distance_shade(mean));

    // a wall in front of part of the object splits its top face
    for run in columns.chunk_by(|a, b| b.column == a.column + 1) {
        if run.len() < 2 {
            continue;
        }
        let outline = run
            .iter()
            .map(|col| (col.column as i32, col.top))
            .chain(run.iter().rev().map(|col| (col.column as i32, col.cap_top)))
            .collect::<Vec<_>>();
        frame.fill_polygon(&outline, cap);
    }
}

/// Draw all uncollected objects far to near; returns how many were painted.
pub fn draw_objects(
    frame: &mut Frame,
    objects: &[CollectableObject],
    pose: &PoseSnapshot,
    depth: &DepthBuffer,
    config: &RenderConfig,
) -> usize {
    let mut order = objects
        .iter()
        .filter(|object| !object.is_collected())
        .map(|object| (object.center().distance_squared(pose.pos), object))
        .collect::<Vec<_>>();
    order.sort_by(|(da, _), (db, _)| db.total_cmp(da));

    let dims = (frame.width(), frame.height());
    let mut drawn = 0;
    for (_, object) in order {
        let columns = visible_columns(object, pose, depth, dims, config);
        if columns.is_empty() {
            continue;
        }
        log::trace!("{} covers {} columns", object.name, columns.len());
        draw_object(frame, object.color, &columns);
        drawn += 1;
    }

    drawn
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::around(Vec2::new(5., 5.), 1.)
    }

    #[test]
    fn entry_face_follows_ray_direction() {
        let b = unit_box();
        let hit = b.ray_intersect(Vec2::new(0., 5.), Vec2::X).unwrap();
        assert_eq!(hit.face, Face::NegX);
        assert!((hit.enter - 4.5).abs() < 1e-5);
        assert!((hit.exit - 5.5).abs() < 1e-5);

        let hit = b.ray_intersect(Vec2::new(10., 5.), -Vec2::X).unwrap();
        assert_eq!(hit.face, Face::PosX);

        let hit = b.ray_intersect(Vec2::new(5., 0.), Vec2::Y).unwrap();
        assert_eq!(hit.face, Face::NegY);

        let hit = b.ray_intersect(Vec2::new(5., 9.), -Vec2::Y).unwrap();
        assert_eq!(hit.face, Face::PosY);
    }

    #[test]
    fn parallel_ray_outside_slab_misses() {
        assert!(unit_box()
            .ray_intersect(Vec2::new(0., 7.), Vec2::X)
            .is_none());
    }

    #[test]
    fn box_behind_or_around_origin_misses() {
        let b = unit_box();
        assert!(b.ray_intersect(Vec2::new(8., 5.), Vec2::X).is_none());
        assert!(b.ray_intersect(Vec2::new(5., 5.), Vec2::X).is_none());
    }

    #[test]
    fn diagonal_entry_picks_later_axis() {
        let b = unit_box();
        let dir = Vec2::new(1., 0.2).normalize();
        let hit = b.ray_intersect(Vec2::new(0., 4.), dir).unwrap();
        // x slab entered at 4.5 along x, y slab at 0.5 along y = 2.5 along x
        assert_eq!(hit.face, Face::NegX);
    }

    #[test]
    fn collection_flag_flips_once() {
        let mut obj = CollectableObject::new(1, 1, "coin", Color::YELLOW);
        assert!(obj.mark_collected());
        assert!(!obj.mark_collected());
        assert!(obj.is_collected());
    }

    #[test]
    fn edge_rows_never_shorter_than_minimum() {
        let (top, bottom) = edge_rows(49., 600);
        assert!(bottom - top >= OBJECT_MIN_HEIGHT);
    }
}
