use std::sync::Arc;

use anyhow::Context;

use crate::{
    assets::{atlas::BlockUvCache, blocks::BlockDatabase},
    config::{
        config_manager::{Config, ConfigManager},
        engine_config::EngineConfig,
    },
};

pub mod assets;
pub mod camera;
pub mod config;
pub mod game_loop;
pub mod lighting;
pub mod limits;
pub mod math;
pub mod voxels;
pub mod world;
pub mod worldgen;

pub struct EngineContext {
    pub config: ConfigManager<EngineConfig>,
    pub block_database: Arc<BlockDatabase>,
    pub block_uvs: Arc<BlockUvCache>,
}

pub fn init_engine() -> anyhow::Result<EngineContext> {
    let config = EngineConfig::create_manager()?;
    let engine_config = config.snapshot();

    let blocks_path = engine_config.block_definitions_path();
    if !engine_config.assets_root.exists() {
        log::error!(
            "Assets root path '{}' does not exist - check your working directory!",
            engine_config.assets_root.display()
        );
    }

    let block_database = BlockDatabase::load_from_file(&blocks_path)?;
    let block_uvs = BlockUvCache::new(&block_database, engine_config.atlas_tiles_per_row)
        .context("Failed to lay out block texture atlas")?;

    Ok(EngineContext {
        config,
        block_database: Arc::new(block_database),
        block_uvs: Arc::new(block_uvs),
    })
}
