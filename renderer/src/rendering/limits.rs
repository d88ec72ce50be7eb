use crate::rendering::chunk_mesh::FLOATS_PER_FACE;

// Vertex budget of a single chunk build, in floats
const MAX_VERTEX_FLOATS_PER_CHUNK: usize = 9 * 6 * 6 * 3000;

// Dense content (checkerboards, foliage fields) can still exceed this, which truncates the mesh
pub const DEFAULT_MESH_CAPACITY_FACES: usize = MAX_VERTEX_FLOATS_PER_CHUNK / FLOATS_PER_FACE;

// Upper bound for configured capacities: keeps vertex float counts and u32 vertex indices in range
pub const MAX_MESH_CAPACITY_FACES: usize = 1 << 22;
