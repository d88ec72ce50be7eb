use crate::{
    assets::blocks::BlockDatabase,
    lighting::light::{LightChannel, LightValue, MAX_LIGHT},
    voxels::{chunk::Chunk, coord::LocalPos},
};

/// Straight-down sunlight: every cell above the first light-blocking voxel of a column
/// gets full sun, cells below it get none. Emissive blocks light their own cell.
/// Marks the chunk as lighted.
pub fn fill_sky_light(chunk: &mut Chunk, blocks: &BlockDatabase) {
    let dims = chunk.dims();
    chunk.fill_light(LightValue::ZERO);

    for z in 0..dims.depth as i32 {
        for x in 0..dims.width as i32 {
            let mut sun = MAX_LIGHT;

            for y in (0..dims.height as i32).rev() {
                let pos = LocalPos::new(x, y, z);
                let Some(voxel) = chunk.get_voxel(pos) else {
                    continue;
                };

                let block = blocks.get(voxel.block_id());
                let passes_light = block.is_none_or(|block| block.light_passing);
                if !passes_light {
                    sun = 0;
                }

                let mut light = LightValue::ZERO.with_channel(LightChannel::Sun, sun);
                if let Some(block) = block.filter(|block| block.is_emissive()) {
                    let [r, g, b] = block.emission;
                    light = LightValue::new(r, g, b, sun);
                }
                chunk.set_light(pos, light);
            }
        }
    }

    chunk.set_lighted(true);
}
