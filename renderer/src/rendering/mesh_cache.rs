use std::sync::Arc;

use ahash::AHashMap;

use engine::{voxels::coord::ChunkPos, world::VoxelStorage};

use crate::rendering::{chunk_mesh::ChunkMesh, mesh_generation::chunk_mesher::ChunkMesher};

struct CacheEntry {
    mesh: Arc<ChunkMesh>,
    dirty: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshCacheStats {
    pub builds: u64,
    pub hits: u64,
    pub evictions: u64,
    pub overflows: u64,
}

/// At most one mesh per chunk, built lazily the first time the chunk is requested.
pub struct ChunkMeshCache {
    mesher: ChunkMesher,
    entries: AHashMap<ChunkPos, CacheEntry>,
    stats: MeshCacheStats,
}

impl ChunkMeshCache {
    pub fn new(mesher: ChunkMesher) -> Self {
        ChunkMeshCache {
            mesher,
            entries: AHashMap::new(),
            stats: MeshCacheStats::default(),
        }
    }

    /// Returns the cached mesh for `pos`, rebuilding it first if it is missing or dirty.
    /// Returns `None` when the chunk is not loaded in `storage`.
    pub fn get_or_build<S: VoxelStorage + ?Sized>(
        &mut self,
        pos: ChunkPos,
        storage: &S,
        backlight: bool,
    ) -> Option<Arc<ChunkMesh>> {
        if let Some(entry) = self.entries.get(&pos)
            && !entry.dirty
        {
            self.stats.hits += 1;
            return Some(entry.mesh.clone());
        }

        let chunk = storage.chunk(pos)?;
        let mesh = self.mesher.build(chunk, storage, backlight);
        self.stats.builds += 1;

        if mesh.overflowed() {
            self.stats.overflows += 1;
            log::warn!(
                "Mesh of chunk {:?} exceeded the capacity of {} faces and was truncated",
                pos,
                self.mesher.capacity().faces
            );
        }

        let mesh = Arc::new(mesh);
        if let Some(previous) = self.entries.insert(
            pos,
            CacheEntry {
                mesh: mesh.clone(),
                dirty: false,
            },
        ) {
            log::debug!(
                "Rebuilt chunk {:?}: {} -> {} faces",
                pos,
                previous.mesh.face_count(),
                mesh.face_count()
            );
        }

        Some(mesh)
    }

    /// Marks the mesh of `pos` for rebuilding on its next request. Unknown chunks are ignored.
    pub fn invalidate(&mut self, pos: ChunkPos) {
        if let Some(entry) = self.entries.get_mut(&pos) {
            entry.dirty = true;
        }
    }

    /// Invalidates `pos` and the four chunks sharing a face with it.
    pub fn invalidate_with_neighbors(&mut self, pos: ChunkPos) {
        self.invalidate(pos);
        for neighbor in pos.horizontal_neighbors() {
            self.invalidate(neighbor);
        }
    }

    pub fn invalidate_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.dirty = true;
        }
    }

    /// Drops the mesh of `pos` without rebuilding.
    pub fn evict(&mut self, pos: ChunkPos) -> bool {
        let evicted = self.entries.remove(&pos).is_some();
        if evicted {
            self.stats.evictions += 1;
        }
        evicted
    }

    pub fn get(&self, pos: ChunkPos) -> Option<&Arc<ChunkMesh>> {
        self.entries.get(&pos).map(|entry| &entry.mesh)
    }

    pub fn is_dirty(&self, pos: ChunkPos) -> bool {
        self.entries.get(&pos).is_some_and(|entry| entry.dirty)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> MeshCacheStats {
        self.stats
    }

    /// Bytes held by cached vertex and index data
    pub fn memory_usage(&self) -> usize {
        self.entries
            .values()
            .map(|entry| entry.mesh.memory_usage())
            .sum()
    }

    pub fn clear(&mut self) {
        self.stats.evictions += self.entries.len() as u64;
        self.entries.clear();
    }
}
