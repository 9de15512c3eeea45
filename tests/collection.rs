use raycrawl::collection::Collection;
use raycrawl::color::Color;
use raycrawl::map::WorldGrid;
use raycrawl::object::CollectableObject;
use raycrawl::pose::PoseSnapshot;

#[test]
fn test_pickup_within_reach() {
    let grid = WorldGrid::default_room();
    let mut collection = Collection::test_objects();
    assert_eq!(collection.world_objects().len(), 2);

    assert_eq!(collection.handle_pickups(&grid, &PoseSnapshot::new(1.5, 5.2, 0.)), 1);
    let bag = collection.bag().map(|o| o.name.as_str()).collect::<Vec<_>>();
    assert_eq!(bag, ["Gold Coin"]);
    assert!(collection.world_objects()[0].is_collected());
    assert!(!collection.world_objects()[1].is_collected());
}

#[test]
fn test_pickup_is_idempotent() {
    let grid = WorldGrid::default_room();
    let mut collection = Collection::test_objects();
    let pose = PoseSnapshot::new(15.5, 20.5, 90.);
    assert_eq!(collection.handle_pickups(&grid, &pose), 1);
    assert_eq!(collection.handle_pickups(&grid, &pose), 0);
    assert_eq!(collection.bag_len(), 1);
}

#[test]
fn test_pickup_radius_threshold() {
    let grid = WorldGrid::default_room();
    let mut collection = Collection::test_objects();
    assert_eq!(collection.handle_pickups(&grid, &PoseSnapshot::new(1.5 + 0.61, 5.5, 0.)), 0);
    assert_eq!(collection.handle_pickups(&grid, &PoseSnapshot::new(1.5 + 0.59, 5.5, 0.)), 1);
}

#[test]
fn test_objects_in_walls_stay_put() {
    let grid = WorldGrid::default_room();
    let mut collection = Collection::default();
    collection.add_world_object(CollectableObject::new(12, 12, "stuck", Color::WHITE));
    assert_eq!(collection.handle_pickups(&grid, &PoseSnapshot::new(12.5, 12.5, 0.)), 0);
    assert_eq!(collection.handle_pickups(&grid, &PoseSnapshot::new(12.5, 11.95, 0.)), 0);
    assert_eq!(collection.bag_len(), 0);
}

#[test]
fn test_collect_only_once() {
    let mut collection = Collection::test_objects();
    assert!(collection.collect(1));
    assert!(!collection.collect(1));
    assert!(!collection.collect(9));
    assert_eq!(collection.bag().map(|o| o.name.as_str()).collect::<Vec<_>>(), ["Silver Key"]);
}
