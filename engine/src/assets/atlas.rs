use ahash::AHashMap;
use thiserror::Error;

use crate::{
    assets::blocks::{BlockDatabase, BlockTypeId},
    voxels::face::Face,
};

/// A rectangle in the shared block texture atlas, in normalized texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UvRegion {
    pub u1: f32,
    pub v1: f32,
    pub u2: f32,
    pub v2: f32,
}

impl UvRegion {
    pub const EMPTY: UvRegion = UvRegion::new(0.0, 0.0, 0.0, 0.0);
    pub const FULL: UvRegion = UvRegion::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(u1: f32, v1: f32, u2: f32, v2: f32) -> Self {
        UvRegion { u1, v1, u2, v2 }
    }
}

/// Resolves the atlas region of each face of a block, in [`Face`] slot order.
pub trait UvResolver {
    fn face_uvs(&self, id: BlockTypeId) -> [UvRegion; Face::COUNT];
}

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("{count} textures do not fit into a {tiles_per_row}x{tiles_per_row} atlas")]
    TooManyTextures { count: usize, tiles_per_row: u32 },
}

/// Per-block UV regions for a square grid atlas, one tile per unique texture name.
pub struct BlockUvCache {
    tiles_per_row: u32,
    texture_names: Vec<String>,
    regions: Vec<[UvRegion; Face::COUNT]>,
}

impl BlockUvCache {
    pub fn new(database: &BlockDatabase, tiles_per_row: u32) -> Result<Self, AtlasError> {
        let mut tiles: AHashMap<&str, u32> = AHashMap::new();
        let mut texture_names = Vec::new();
        let mut regions = vec![[UvRegion::EMPTY; Face::COUNT]; database.id_bound()];

        for block in database.iter_blocks() {
            let Some(faces) = block.textures.face_textures() else {
                continue;
            };

            let face_regions = faces.map(|name| {
                let tile = *tiles.entry(name).or_insert_with(|| {
                    texture_names.push(name.to_string());
                    (texture_names.len() - 1) as u32
                });
                Self::tile_region(tile, tiles_per_row)
            });
            regions[block.id.0 as usize] = face_regions;
        }

        let capacity = tiles_per_row as usize * tiles_per_row as usize;
        if texture_names.len() > capacity {
            return Err(AtlasError::TooManyTextures {
                count: texture_names.len(),
                tiles_per_row,
            });
        }

        log::debug!(
            "Packed {} block textures into a {}x{} atlas",
            texture_names.len(),
            tiles_per_row,
            tiles_per_row
        );

        Ok(BlockUvCache {
            tiles_per_row,
            texture_names,
            regions,
        })
    }

    pub fn tile_region(tile: u32, tiles_per_row: u32) -> UvRegion {
        let step = 1.0 / tiles_per_row as f32;
        let column = (tile % tiles_per_row) as f32;
        let row = (tile / tiles_per_row) as f32;
        UvRegion::new(
            column * step,
            row * step,
            (column + 1.0) * step,
            (row + 1.0) * step,
        )
    }

    /// Texture names in tile order.
    pub fn texture_names(&self) -> &[String] {
        &self.texture_names
    }

    pub fn tiles_per_row(&self) -> u32 {
        self.tiles_per_row
    }
}

impl UvResolver for BlockUvCache {
    fn face_uvs(&self, id: BlockTypeId) -> [UvRegion; Face::COUNT] {
        self.regions
            .get(id.0 as usize)
            .copied()
            .unwrap_or([UvRegion::EMPTY; Face::COUNT])
    }
}
