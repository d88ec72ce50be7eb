pub mod chunk_mesher;
pub mod mesh_buffer;
pub mod rotation;
