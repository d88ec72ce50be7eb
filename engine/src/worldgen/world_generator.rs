use crate::voxels::{
    chunk::{Chunk, ChunkDims},
    coord::ChunkPos,
};

pub trait WorldGenerator: Send + Sync + 'static {
    fn generate_chunk(&self, chunk_pos: ChunkPos, dims: ChunkDims) -> Chunk;
}
