use serde::{Deserialize, Serialize};

use crate::{
    lighting::light::LightValue,
    voxels::{
        coord::{ChunkPos, LocalPos},
        voxel::Voxel,
    },
};

pub const DEFAULT_CHUNK_WIDTH: u32 = 16;
pub const DEFAULT_CHUNK_HEIGHT: u32 = 256;
pub const DEFAULT_CHUNK_DEPTH: u32 = 16;

/// Chunk column dimensions, shared by every chunk in a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkDims {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Default for ChunkDims {
    fn default() -> Self {
        ChunkDims::new(
            DEFAULT_CHUNK_WIDTH,
            DEFAULT_CHUNK_HEIGHT,
            DEFAULT_CHUNK_DEPTH,
        )
    }
}

impl ChunkDims {
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        ChunkDims {
            width,
            height,
            depth,
        }
    }

    pub const fn volume(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    pub const fn layer_size(&self) -> usize {
        self.width as usize * self.depth as usize
    }

    pub const fn contains(&self, pos: LocalPos) -> bool {
        pos.x() >= 0
            && pos.y() >= 0
            && pos.z() >= 0
            && pos.x() < self.width as i32
            && pos.y() < self.height as i32
            && pos.z() < self.depth as i32
    }

    // Data is stored in YZX order
    pub const fn index(&self, pos: LocalPos) -> usize {
        (pos.y() as usize * self.depth as usize + pos.z() as usize) * self.width as usize
            + pos.x() as usize
    }

    pub const fn position(&self, index: usize) -> LocalPos {
        let width = self.width as usize;
        let x = index % width;
        let z = (index / width) % self.depth as usize;
        let y = index / self.layer_size();
        LocalPos::new(x as i32, y as i32, z as i32)
    }
}

/// A full-height column of voxels with one light value per cell.
pub struct Chunk {
    pub position: ChunkPos,
    dims: ChunkDims,
    voxels: Box<[Voxel]>,
    lightmap: Box<[LightValue]>,
    // Vertical span [bottom, top) that contains every non-air voxel
    bottom: u32,
    top: u32,
    lighted: bool,
}

impl Chunk {
    pub fn new(position: ChunkPos, dims: ChunkDims) -> Self {
        Chunk {
            position,
            dims,
            voxels: vec![Voxel::AIR; dims.volume()].into_boxed_slice(),
            lightmap: vec![LightValue::ZERO; dims.volume()].into_boxed_slice(),
            bottom: 0,
            top: 0,
            lighted: false,
        }
    }

    pub fn from_voxels(position: ChunkPos, dims: ChunkDims, voxels: Vec<Voxel>) -> Self {
        assert_eq!(voxels.len(), dims.volume(), "voxel count must match dims");

        let mut chunk = Chunk {
            position,
            dims,
            voxels: voxels.into_boxed_slice(),
            lightmap: vec![LightValue::ZERO; dims.volume()].into_boxed_slice(),
            bottom: 0,
            top: 0,
            lighted: false,
        };
        chunk.update_vertical_bounds();
        chunk
    }

    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    pub fn lightmap(&self) -> &[LightValue] {
        &self.lightmap
    }

    pub fn get_voxel(&self, pos: LocalPos) -> Option<Voxel> {
        if !self.dims.contains(pos) {
            return None;
        }
        Some(self.voxels[self.dims.index(pos)])
    }

    /// Returns false if the position is outside the chunk.
    pub fn set_voxel(&mut self, pos: LocalPos, voxel: Voxel) -> bool {
        if !self.dims.contains(pos) {
            return false;
        }

        let index = self.dims.index(pos);
        let was_air = self.voxels[index].is_air();
        self.voxels[index] = voxel;

        if !voxel.is_air() {
            let y = pos.y() as u32;
            if self.bottom == self.top {
                self.bottom = y;
                self.top = y + 1;
            } else {
                self.bottom = self.bottom.min(y);
                self.top = self.top.max(y + 1);
            }
        } else if !was_air {
            self.update_vertical_bounds();
        }

        true
    }

    pub fn get_light(&self, pos: LocalPos) -> Option<LightValue> {
        if !self.dims.contains(pos) {
            return None;
        }
        Some(self.lightmap[self.dims.index(pos)])
    }

    pub fn set_light(&mut self, pos: LocalPos, light: LightValue) -> bool {
        if !self.dims.contains(pos) {
            return false;
        }
        let index = self.dims.index(pos);
        self.lightmap[index] = light;
        true
    }

    pub fn fill_light(&mut self, light: LightValue) {
        self.lightmap.fill(light);
    }

    pub fn bottom(&self) -> u32 {
        self.bottom
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn is_empty(&self) -> bool {
        self.bottom == self.top
    }

    pub fn is_lighted(&self) -> bool {
        self.lighted
    }

    pub fn set_lighted(&mut self, lighted: bool) {
        self.lighted = lighted;
    }

    /// Recomputes [bottom, top) from the first and last layers holding a non-air voxel.
    pub fn update_vertical_bounds(&mut self) {
        let layer_size = self.dims.layer_size();

        match self.voxels.iter().position(|voxel| !voxel.is_air()) {
            Some(first) => {
                // The reverse search cannot fail once a forward match exists
                let last = self
                    .voxels
                    .iter()
                    .rposition(|voxel| !voxel.is_air())
                    .unwrap_or(first);
                self.bottom = (first / layer_size) as u32;
                self.top = (last / layer_size) as u32 + 1;
            }
            None => {
                self.bottom = 0;
                self.top = 0;
            }
        }
    }

    pub fn approximate_memory_usage(&self) -> usize {
        size_of::<Chunk>()
            + self.voxels.len() * size_of::<Voxel>()
            + self.lightmap.len() * size_of::<LightValue>()
    }
}
