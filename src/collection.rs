use crate::color::Color;
use crate::config::PICKUP_RADIUS;
use crate::map::WorldGrid;
use crate::object::CollectableObject;
use crate::pose::PoseSnapshot;

/// Objects placed in the world and the bag of those already picked up.
#[derive(Clone, Default, Debug)]
pub struct Collection {
    world_objects: Vec<CollectableObject>,
    /// indices into `world_objects`, in pickup order
    bag: Vec<usize>,
}

impl Collection {
    /// the two items every new game starts with
    pub fn test_objects() -> Self {
        let mut this = Self::default();
        this.add_world_object(CollectableObject::new(1, 5, "Gold Coin", Color::YELLOW));
        this.add_world_object(CollectableObject::new(15, 20, "Silver Key", Color::LIGHT_GRAY));
        this
    }

    pub fn add_world_object(&mut self, object: CollectableObject) {
        self.world_objects.push(object);
    }

    pub fn world_objects(&self) -> &[CollectableObject] {
        &self.world_objects
    }

    pub fn bag(&self) -> impl Iterator<Item = &CollectableObject> + '_ {
        self.bag.iter().map(|&idx| &self.world_objects[idx])
    }

    pub fn bag_len(&self) -> usize {
        self.bag.len()
    }

    /// returns true only on the first call for a given object
    pub fn collect(&mut self, idx: usize) -> bool {
        let Some(object) = self.world_objects.get_mut(idx) else {
            return false;
        };
        if !object.mark_collected() {
            return false;
        }
        log::info!("collected {}", object.name);
        self.bag.push(idx);
        true
    }

    /// Pick up every uncollected object on a walkable cell within reach.
    ///
    /// Returns the number of objects collected by this call.
    pub fn handle_pickups(&mut self, grid: &WorldGrid, pose: &PoseSnapshot) -> usize {
        let reachable = self
            .world_objects
            .iter()
            .enumerate()
            .filter(|(_, object)| !object.is_collected())
            .filter(|(_, object)| grid.is_walkable(object.x as i64, object.y as i64))
            .filter(|(_, object)| object.center().distance(pose.pos) < PICKUP_RADIUS)
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>();

        reachable.into_iter().filter(|&idx| self.collect(idx)).count()
    }
}
