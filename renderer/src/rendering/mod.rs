pub mod backend;
pub mod chunk_mesh;
pub mod limits;
pub mod mesh_cache;
pub mod mesh_generation;
pub mod world_renderer;
