use engine::config::config_manager::Config;
use serde::{Deserialize, Serialize};

use crate::rendering::{
    limits::{DEFAULT_MESH_CAPACITY_FACES, MAX_MESH_CAPACITY_FACES},
    mesh_generation::mesh_buffer::MeshCapacity,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RendererConfig {
    pub enable_frustum_culling: bool,
    /// Raises dark cells to a minimum color light so unlit geometry stays visible
    pub backlight: bool,
    pub mesh_capacity: MeshCapacity,
}

impl Config for RendererConfig {
    fn get_path() -> &'static str {
        "renderer.ron"
    }

    fn is_valid(&self) -> bool {
        (1..=MAX_MESH_CAPACITY_FACES).contains(&self.mesh_capacity.faces)
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            enable_frustum_culling: true,
            backlight: true,
            mesh_capacity: MeshCapacity::faces(DEFAULT_MESH_CAPACITY_FACES),
        }
    }
}
