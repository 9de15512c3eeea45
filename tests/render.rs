use raycrawl::color::Color;
use raycrawl::config::BACKGROUND;
use raycrawl::frame::Frame;
use raycrawl::map::WorldGrid;
use raycrawl::object::CollectableObject;
use raycrawl::pose::PoseSnapshot;
use raycrawl::render::Renderer;

#[test]
fn test_degenerate_inputs_draw_nothing() {
    let mut renderer = Renderer::default();
    let pose = PoseSnapshot::new(1.5, 1.5, 0.);

    let mut empty = Frame::new(0, 0);
    assert!(!renderer.render_frame(&mut empty, &WorldGrid::default_room(), &pose, &[]));

    let mut frame = Frame::new(16, 16);
    let nothing = WorldGrid::parse("", 0).unwrap();
    assert!(!renderer.render_frame(&mut frame, &nothing, &pose, &[]));
    // untouched, not even cleared
    assert_eq!(frame.pixel(0, 0), Some(Color::BLACK));
}

#[test]
fn test_frame_fills_depth_buffer() {
    let mut renderer = Renderer::default();
    let mut frame = Frame::new(80, 60);
    let grid = WorldGrid::default_room();
    let pose = PoseSnapshot::new(1.5, 1.5, 45.);

    assert!(renderer.render_frame(&mut frame, &grid, &pose, &[]));
    assert_eq!(renderer.depth().len(), 80);
    assert_eq!(renderer.slices().len(), 80);
    for (column, slice) in renderer.slices().iter().enumerate() {
        assert_eq!(renderer.depth().get(column), slice.perpendicular);
    }

    // walls start on the top row
    assert_ne!(frame.pixel(0, 0), Some(BACKGROUND));
    assert_ne!(frame.pixel(40, 0), Some(BACKGROUND));
}

#[test]
fn test_resized_frame_resizes_buffers() {
    let mut renderer = Renderer::default();
    let grid = WorldGrid::default_room();
    let pose = PoseSnapshot::new(5.5, 5.5, 10.);

    let mut frame = Frame::new(120, 90);
    assert!(renderer.render_frame(&mut frame, &grid, &pose, &[]));
    frame.resize(64, 48);
    assert!(renderer.render_frame(&mut frame, &grid, &pose, &[]));
    assert_eq!(renderer.depth().len(), 64);
}

#[test]
fn test_objects_drawn_over_walls() {
    let mut renderer = Renderer::default();
    let grid = WorldGrid::default_room();
    let pose = PoseSnapshot::new(8.5, 5.5, 180.);
    let objects = [CollectableObject::new(5, 5, "crate", Color::rgb(0, 0, 255))];

    let mut plain = Frame::new(200, 150);
    assert!(renderer.render_frame(&mut plain, &grid, &pose, &[]));
    let mut with_object = Frame::new(200, 150);
    assert!(renderer.render_frame(&mut with_object, &grid, &pose, &objects));

    assert!(plain.pixels().ne(with_object.pixels()));
    let blue = with_object
        .pixels()
        .filter(|c| c.b > 0 && c.r == 0 && c.g == 0)
        .count();
    assert!(blue > 0);
}
