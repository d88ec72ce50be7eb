use ahash::{AHashMap, AHashSet};
use glam::IVec3;

use crate::{
    assets::blocks::BlockTypeId,
    lighting::light::LightValue,
    voxels::{
        chunk::{Chunk, ChunkDims},
        coord::{ChunkPos, LocalPos, WorldPos},
        neighbor_volume::NeighborVolume,
        voxel::Voxel,
    },
};

/// Read access to loaded chunk columns, as needed by meshing and render scheduling.
pub trait VoxelStorage {
    fn dims(&self) -> ChunkDims;

    fn chunk(&self, pos: ChunkPos) -> Option<&Chunk>;

    /// Appends the positions of all loaded chunks to `out`.
    fn loaded_chunks(&self, out: &mut Vec<ChunkPos>);

    /// Copies ids and light for the volume's footprint. Cells without a loaded chunk are left untouched.
    fn copy_into(&self, volume: &mut NeighborVolume) {
        let dims = self.dims();
        let origin = volume.origin();
        let size = volume.size();

        let y_start = origin.y.max(0);
        let y_end = (origin.y + size.y).min(dims.height as i32);

        for z in origin.z..origin.z + size.z {
            for x in origin.x..origin.x + size.x {
                let column = WorldPos::new(x, 0, z);
                let Some(chunk) = self.chunk(column.to_chunk_pos(dims)) else {
                    continue;
                };
                let local_column = column.to_local_pos(dims);

                for y in y_start..y_end {
                    let local = LocalPos::new(local_column.x(), y, local_column.z());
                    let index = dims.index(local);
                    volume.set_cell(
                        IVec3::new(x, y, z) - origin,
                        chunk.voxels()[index].block_id(),
                        chunk.lightmap()[index],
                    );
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkEvent {
    Loaded(ChunkPos),
    /// Voxels or light of the chunk changed
    Modified(ChunkPos),
    Unloaded(ChunkPos),
}

/// In-memory voxel world made of full-height chunk columns.
pub struct World {
    dims: ChunkDims,
    chunks: AHashMap<ChunkPos, Chunk>,
    modified: AHashSet<ChunkPos>,
    events: Vec<ChunkEvent>,
}

impl World {
    pub fn new(dims: ChunkDims) -> Self {
        World {
            dims,
            chunks: AHashMap::new(),
            modified: AHashSet::new(),
            events: Vec::new(),
        }
    }

    pub fn from_chunks(dims: ChunkDims, chunks: Vec<Chunk>) -> Self {
        let mut world = World::new(dims);
        for chunk in chunks {
            world.insert_chunk(chunk);
        }
        world
    }

    pub fn insert_chunk(&mut self, chunk: Chunk) {
        assert_eq!(chunk.dims(), self.dims, "chunk dims must match the world");

        let pos = chunk.position;
        if self.chunks.insert(pos, chunk).is_some() {
            log::debug!("Replaced already loaded chunk at {:?}", pos);
        }
        self.events.push(ChunkEvent::Loaded(pos));
    }

    pub fn insert_chunk_empty(&mut self, pos: ChunkPos) {
        self.insert_chunk(Chunk::new(pos, self.dims));
    }

    pub fn unload_chunk(&mut self, pos: ChunkPos) -> Option<Chunk> {
        let chunk = self.chunks.remove(&pos)?;
        self.modified.remove(&pos);
        self.events.push(ChunkEvent::Unloaded(pos));
        Some(chunk)
    }

    pub fn chunk_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.chunks.get_mut(&pos)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn iter_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn get_voxel(&self, position: WorldPos) -> Option<Voxel> {
        let chunk = self.chunks.get(&position.to_chunk_pos(self.dims))?;
        chunk.get_voxel(position.to_local_pos(self.dims))
    }

    pub fn get_block_id(&self, position: WorldPos) -> BlockTypeId {
        self.get_voxel(position)
            .map_or(BlockTypeId::VOID, |voxel| voxel.block_id())
    }

    /// Changes to unloaded chunks are ignored and return false.
    pub fn set_voxel(&mut self, position: WorldPos, voxel: Voxel) -> bool {
        let chunk_pos = position.to_chunk_pos(self.dims);
        let Some(chunk) = self.chunks.get_mut(&chunk_pos) else {
            return false;
        };

        let changed = chunk.set_voxel(position.to_local_pos(self.dims), voxel);
        if changed {
            self.mark_modified(chunk_pos);
        }
        changed
    }

    pub fn get_light(&self, position: WorldPos) -> Option<LightValue> {
        let chunk = self.chunks.get(&position.to_chunk_pos(self.dims))?;
        chunk.get_light(position.to_local_pos(self.dims))
    }

    pub fn set_light(&mut self, position: WorldPos, light: LightValue) -> bool {
        let chunk_pos = position.to_chunk_pos(self.dims);
        let Some(chunk) = self.chunks.get_mut(&chunk_pos) else {
            return false;
        };

        let changed = chunk.set_light(position.to_local_pos(self.dims), light);
        if changed {
            self.mark_modified(chunk_pos);
        }
        changed
    }

    pub fn mark_modified(&mut self, pos: ChunkPos) {
        if self.modified.insert(pos) {
            self.events.push(ChunkEvent::Modified(pos));
        }
    }

    /// Takes all pending chunk events and resets the modified set.
    pub fn drain_events(&mut self) -> Vec<ChunkEvent> {
        self.modified.clear();
        std::mem::take(&mut self.events)
    }

    pub fn approximate_memory_usage(&self) -> usize {
        self.chunks
            .values()
            .map(|chunk| chunk.approximate_memory_usage())
            .sum()
    }
}

impl VoxelStorage for World {
    fn dims(&self) -> ChunkDims {
        self.dims
    }

    fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    fn loaded_chunks(&self, out: &mut Vec<ChunkPos>) {
        out.extend(self.chunks.keys().copied());
    }
}
