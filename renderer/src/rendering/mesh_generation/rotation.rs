use engine::{
    assets::atlas::UvRegion,
    voxels::{
        face::Face,
        voxel::{Voxel, direction},
    },
};

/// Texture orientation of a rotatable block, by the axis its "up" is turned onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockRotation {
    /// Standing upright, textures as authored
    #[default]
    AxisY,
    AxisX,
    AxisZ,
}

impl BlockRotation {
    pub fn from_voxel(voxel: Voxel, rotatable: bool) -> Self {
        if !rotatable {
            return BlockRotation::AxisY;
        }

        match voxel.rotation() {
            direction::WEST | direction::EAST => BlockRotation::AxisX,
            direction::NORTH | direction::SOUTH => BlockRotation::AxisZ,
            _ => BlockRotation::AxisY,
        }
    }

    /// For each face slot, the slot of the authored texture drawn on it.
    pub const fn texture_slots(self) -> [usize; Face::COUNT] {
        match self {
            BlockRotation::AxisY => [0, 1, 2, 3, 4, 5],
            BlockRotation::AxisX => [2, 3, 0, 1, 4, 5],
            BlockRotation::AxisZ => [0, 1, 4, 5, 2, 3],
        }
    }

    pub fn apply(self, regions: [UvRegion; Face::COUNT]) -> [UvRegion; Face::COUNT] {
        self.texture_slots().map(|slot| regions[slot])
    }

    /// Faces whose texture is turned a quarter turn. They also use the other quad diagonal.
    pub fn is_face_rotated(self, face: Face) -> bool {
        match self {
            BlockRotation::AxisY => false,
            BlockRotation::AxisX => !matches!(face, Face::Left | Face::Right),
            BlockRotation::AxisZ => matches!(face, Face::Left | Face::Right),
        }
    }
}
