use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{config::config_manager::Config, voxels::chunk::ChunkDims};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub assets_root: PathBuf,
    /// Relative to `assets_root`
    pub block_definitions: PathBuf,
    pub chunk_dims: ChunkDims,
    pub atlas_tiles_per_row: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("assets"),
            block_definitions: PathBuf::from("defs/blocks.ron"),
            chunk_dims: ChunkDims::default(),
            atlas_tiles_per_row: 16,
        }
    }
}

impl EngineConfig {
    pub fn block_definitions_path(&self) -> PathBuf {
        self.assets_root.join(&self.block_definitions)
    }
}

impl Config for EngineConfig {
    fn get_path() -> &'static str {
        "engine.ron"
    }

    fn is_valid(&self) -> bool {
        let dims = self.chunk_dims;
        dims.width > 0 && dims.height > 0 && dims.depth > 0 && self.atlas_tiles_per_row > 0
    }
}
