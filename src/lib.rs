//! Grid raycaster: a first-person view of a tile map with collectable
//! objects, an occlusion depth buffer and a fog-of-war minimap.

pub mod collection;
pub mod color;
pub mod config;
pub mod frame;
pub mod map;
pub mod minimap;
pub mod motion;
pub mod object;
pub mod pose;
pub mod ray;
pub mod render;
pub mod wall;
