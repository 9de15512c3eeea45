use raycrawl::config::RenderConfig;
use raycrawl::map::{Tile, WorldGrid};
use raycrawl::pose::PoseSnapshot;
use raycrawl::ray::*;

/// `size` x `size` grid of floor surrounded by a one cell wall
fn walled(size: usize) -> WorldGrid {
    let rows = (0..size)
        .map(|y| {
            (0..size)
                .map(|x| u32::from(x == 0 || y == 0 || x == size - 1 || y == size - 1))
                .collect()
        })
        .collect::<Vec<Vec<u32>>>();
    WorldGrid::from_rows(&rows).unwrap()
}

fn cast_all(
    grid: &WorldGrid,
    pose: &PoseSnapshot,
    width: usize,
    config: &RenderConfig,
) -> Vec<RayCast> {
    let mut slices = Vec::new();
    cast_rays(grid, pose, width, config, &mut slices);
    slices
}

#[test]
fn test_centre_column_hits_far_wall() {
    let grid = WorldGrid::default_room();
    let pose = PoseSnapshot::new(1., 1., 0.);
    let slices = cast_all(&grid, &pose, 800, &RenderConfig::default());
    assert_eq!(slices.len(), 800);

    let centre = slices[400];
    assert!((1..=4).contains(&centre.tile.0), "hit {:?}", centre.tile);
    assert_eq!(centre.tile, Tile::SIDE_WALL);
    // straight along row 1 to the wall at x = 29
    assert!((centre.distance - 28.).abs() < 0.05, "{}", centre.distance);
    assert!((centre.perpendicular - 28.).abs() < 0.05);
}

#[test]
fn test_depth_bounded_inside_walls() {
    let grid = walled(20);
    let config = RenderConfig::default();
    let poses = [(1.5, 1.5, 0.), (10., 10., 133.), (18.9, 2.2, 271.), (5.5, 17.25, 45.)];
    for &(x, y, heading) in &poses {
        let pose = PoseSnapshot::new(x, y, heading);
        let slices = cast_all(&grid, &pose, 160, &config);
        let depth = DepthBuffer::from_slices(&slices);
        assert_eq!(depth.len(), 160);
        for (column, slice) in slices.iter().enumerate() {
            assert!(slice.is_hit(), "column {column} escaped from ({x}, {y})");
            assert!(depth.get(column) <= config.max_depth);
            assert!(depth.get(column) > 0.);
        }
    }
}

#[test]
fn test_distance_converges_as_step_shrinks() {
    let grid = walled(10);
    let pose = PoseSnapshot::new(2.3, 4.5, 0.);
    // wall face at x = 9
    let analytic = 9. - 2.3;

    let error = |step: f32| {
        let config = RenderConfig {
            march_step: step,
            ..RenderConfig::default()
        };
        let cast = cast_column(&grid, &pose, pose.heading_rad(), &config);
        assert!(cast.is_hit());
        (cast.perpendicular - analytic).abs()
    };

    let coarse = error(0.2);
    let default = error(0.02);
    let fine = error(0.001);
    assert!(coarse <= 0.2 + 1e-4);
    assert!(default <= 0.02 + 1e-4);
    assert!(fine <= 0.001 + 1e-4);
}

#[test]
fn test_perpendicular_removes_fisheye() {
    let grid = walled(30);
    let pose = PoseSnapshot::new(15., 15., 0.);
    let slices = cast_all(&grid, &pose, 64, &RenderConfig::default());
    for slice in &slices {
        let expected = slice.distance * (slice.angle - pose.heading_rad()).cos();
        assert!((slice.perpendicular - expected).abs() < 1e-4);
    }
    // facing a flat wall every column sees roughly the same perpendicular distance
    let (lo, hi) = slices.iter().fold((f32::MAX, f32::MIN), |(lo, hi), s| {
        (lo.min(s.perpendicular), hi.max(s.perpendicular))
    });
    assert!(hi - lo < 0.05, "{lo}..{hi}");
}

#[test]
fn test_miss_stores_max_depth() {
    let grid = WorldGrid::from_rows(&vec![vec![0; 100]; 100]).unwrap();
    let config = RenderConfig {
        max_depth: 2.,
        ..RenderConfig::default()
    };
    let pose = PoseSnapshot::new(50., 50., 10.);
    let slices = cast_all(&grid, &pose, 32, &config);
    for slice in &slices {
        assert!(!slice.is_hit());
        assert_eq!(slice.tile, Tile::EMPTY);
        assert_eq!(slice.perpendicular, 2.);
    }

    // leaving an open grid is a miss at max depth too
    let pose = PoseSnapshot::new(99.5, 50., 0.);
    let cast = cast_column(&grid, &pose, 0., &RenderConfig::default());
    assert_eq!(cast.perpendicular, RenderConfig::default().max_depth);
}

#[test]
fn test_casting_is_deterministic() {
    let grid = WorldGrid::default_room();
    let pose = PoseSnapshot::new(7.25, 21.5, 312.);
    let config = RenderConfig::default();
    assert_eq!(
        cast_all(&grid, &pose, 200, &config),
        cast_all(&grid, &pose, 200, &config)
    );
}

#[test]
fn test_zero_width_casts_nothing() {
    let grid = WorldGrid::default_room();
    let pose = PoseSnapshot::new(5., 5., 0.);
    assert!(cast_all(&grid, &pose, 0, &RenderConfig::default()).is_empty());
}
