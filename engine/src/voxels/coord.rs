use std::ops::{Add, Sub};

use glam::{IVec2, IVec3, Vec3};

use crate::voxels::{chunk::ChunkDims, face::Face};

/// Coordinates identifying a chunk column in chunk space.
/// Columns span the full world height, so only X and Z are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPos(pub IVec2);

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkPos(IVec2 { x, y: z })
    }

    pub const fn x(&self) -> i32 {
        self.0.x
    }

    pub const fn z(&self) -> i32 {
        self.0.y
    }

    pub fn origin(&self, dims: ChunkDims) -> WorldPos {
        WorldPos::new(
            self.x() * dims.width as i32,
            0,
            self.z() * dims.depth as i32,
        )
    }

    pub fn origin_f32(&self, dims: ChunkDims) -> Vec3 {
        self.origin(dims).0.as_vec3()
    }

    /// The chunk sharing the given horizontal face. Vertical faces return `self`.
    pub fn neighbor(&self, face: Face) -> ChunkPos {
        let offset = face.to_ivec3();
        ChunkPos::new(self.x() + offset.x, self.z() + offset.z)
    }

    pub fn horizontal_neighbors(&self) -> [ChunkPos; 4] {
        [Face::Left, Face::Right, Face::Front, Face::Back].map(|face| self.neighbor(face))
    }
}

/// A position of a voxel within a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalPos(pub IVec3);

impl LocalPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        LocalPos(IVec3 { x, y, z })
    }

    pub const fn x(&self) -> i32 {
        self.0.x
    }

    pub const fn y(&self) -> i32 {
        self.0.y
    }

    pub const fn z(&self) -> i32 {
        self.0.z
    }
}

/// A position of a voxel in world space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldPos(pub IVec3);

impl WorldPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        WorldPos(IVec3 { x, y, z })
    }

    pub fn to_chunk_pos(&self, dims: ChunkDims) -> ChunkPos {
        ChunkPos::new(
            self.0.x.div_euclid(dims.width as i32),
            self.0.z.div_euclid(dims.depth as i32),
        )
    }

    pub fn to_local_pos(&self, dims: ChunkDims) -> LocalPos {
        LocalPos::new(
            self.0.x.rem_euclid(dims.width as i32),
            self.0.y,
            self.0.z.rem_euclid(dims.depth as i32),
        )
    }

    pub fn from_chunk_and_local(chunk_pos: ChunkPos, local: LocalPos, dims: ChunkDims) -> Self {
        chunk_pos.origin(dims) + local
    }
}

impl From<IVec3> for WorldPos {
    fn from(value: IVec3) -> Self {
        WorldPos(value)
    }
}

impl Add for WorldPos {
    type Output = WorldPos;

    fn add(self, other: WorldPos) -> WorldPos {
        WorldPos(self.0 + other.0)
    }
}

impl Sub for WorldPos {
    type Output = WorldPos;

    fn sub(self, other: WorldPos) -> WorldPos {
        WorldPos(self.0 - other.0)
    }
}

impl Add<LocalPos> for WorldPos {
    type Output = WorldPos;

    fn add(self, other: LocalPos) -> WorldPos {
        WorldPos(self.0 + other.0)
    }
}
