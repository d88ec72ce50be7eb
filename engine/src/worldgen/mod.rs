use rayon::prelude::*;

use crate::{
    assets::blocks::BlockDatabase,
    lighting::sky_light::fill_sky_light,
    voxels::{chunk::ChunkDims, coord::ChunkPos},
    world::World,
    worldgen::{
        noise_world_generator::{NoiseWorldGenerator, TerrainBlocks},
        world_generator::WorldGenerator,
    },
};

pub mod noise_world_generator;
pub mod world_generator;

/// Generates and sky-lights a square of `(2 * radius)²` chunks centered on the origin.
pub fn generate_noise_world(
    radius: i32,
    seed: u32,
    dims: ChunkDims,
    blocks: &BlockDatabase,
) -> anyhow::Result<World> {
    let terrain = TerrainBlocks::from_database(blocks)?;
    let sea_level = (dims.height as i32 / 4).max(8).min(dims.height as i32 - 2);
    let generator = NoiseWorldGenerator::new(seed, terrain, sea_level);

    let chunk_range = -radius..radius;
    let range_width = chunk_range.end - chunk_range.start;

    let chunks = (0..(range_width * range_width))
        .into_par_iter()
        .map(|i| {
            let x = chunk_range.start + (i / range_width);
            let z = chunk_range.start + (i % range_width);
            let mut chunk = generator.generate_chunk(ChunkPos::new(x, z), dims);
            fill_sky_light(&mut chunk, blocks);
            chunk
        })
        .collect::<Vec<_>>();

    log::info!("Generated {} chunks", chunks.len());
    Ok(World::from_chunks(dims, chunks))
}
