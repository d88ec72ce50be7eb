pub mod chunk;
pub mod coord;
pub mod face;
pub mod neighbor_volume;
pub mod voxel;
