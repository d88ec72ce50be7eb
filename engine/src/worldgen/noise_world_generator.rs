use anyhow::Context;
use glam::DVec2;
use noise::{NoiseFn, SuperSimplex};

use crate::{
    assets::blocks::BlockDatabase,
    voxels::{
        chunk::{Chunk, ChunkDims},
        coord::{ChunkPos, LocalPos},
        voxel::{Voxel, direction},
    },
    worldgen::world_generator::WorldGenerator,
};

/// Block ids the terrain generator places, looked up by name.
#[derive(Debug, Clone, Copy)]
pub struct TerrainBlocks {
    pub stone: Voxel,
    pub dirt: Voxel,
    pub grass: Voxel,
    pub water: Voxel,
    pub plant: Voxel,
    pub log: Voxel,
}

impl TerrainBlocks {
    pub fn from_database(blocks: &BlockDatabase) -> anyhow::Result<Self> {
        let find = |name: &str| {
            blocks
                .get_by_name(name)
                .map(|block| Voxel::from_type(block.id.0))
                .with_context(|| format!("World generator needs a block named '{name}'"))
        };

        Ok(TerrainBlocks {
            stone: find("stone")?,
            dirt: find("dirt")?,
            grass: find("grass")?,
            water: find("water")?,
            plant: find("tall_grass")?,
            log: find("log")?,
        })
    }
}

pub struct NoiseWorldGenerator {
    noise: SuperSimplex,
    blocks: TerrainBlocks,
    sea_level: i32,
}

impl NoiseWorldGenerator {
    pub fn new(seed: u32, blocks: TerrainBlocks, sea_level: i32) -> Self {
        Self {
            noise: SuperSimplex::new(seed),
            blocks,
            sea_level,
        }
    }

    fn height_at(&self, x: i32, z: i32, dims: ChunkDims) -> i32 {
        let pos = DVec2::new(x as f64, z as f64) * 0.02;
        let height = (self.noise.get(pos.to_array()) + 1.0) / 2.0;
        let height = self.sea_level as f64 - 6.0 + height * 16.0;
        // Leaves room for grass and a decoration in short chunks
        (height as i32).clamp(1, (dims.height as i32 - 4).max(1))
    }

    // Cheap deterministic scatter for surface decorations
    fn scatter(x: i32, z: i32) -> u32 {
        let hash = (x.wrapping_mul(73_856_093) ^ z.wrapping_mul(19_349_663)) as u32;
        hash.wrapping_mul(2_654_435_761) >> 24
    }
}

impl WorldGenerator for NoiseWorldGenerator {
    fn generate_chunk(&self, chunk_pos: ChunkPos, dims: ChunkDims) -> Chunk {
        let mut voxels = vec![Voxel::AIR; dims.volume()];
        let origin = chunk_pos.origin(dims).0;

        // Data is stored in YZX order
        for z in 0..dims.depth as i32 {
            for x in 0..dims.width as i32 {
                let (world_x, world_z) = (origin.x + x, origin.z + z);
                let height = self.height_at(world_x, world_z, dims);
                let mut set = |y: i32, voxel: Voxel| {
                    let pos = LocalPos::new(x, y, z);
                    if dims.contains(pos) {
                        voxels[dims.index(pos)] = voxel;
                    }
                };

                for y in 0..height {
                    set(y, self.blocks.stone);
                }
                for y in (height - 3).max(0)..height {
                    set(y, self.blocks.dirt);
                }

                if height < self.sea_level {
                    for y in height..self.sea_level {
                        set(y, self.blocks.water);
                    }
                    continue;
                }

                set(height, self.blocks.grass);

                let scatter = Self::scatter(world_x, world_z);
                if scatter < 24 {
                    set(height + 1, self.blocks.plant);
                } else if scatter == 255 {
                    // Fallen logs lie along the X axis
                    set(
                        height + 1,
                        Voxel::from_type_state(self.blocks.log.block_type(), direction::EAST),
                    );
                }
            }
        }

        Chunk::from_voxels(chunk_pos, dims, voxels)
    }
}
