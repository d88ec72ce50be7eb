use bytemuck::{Pod, Zeroable};
use glam::Vec4;

use engine::voxels::coord::ChunkPos;

/// Floats per vertex: position (3), uv (2), packed light (1)
pub const VERTEX_SIZE: usize = 6;
pub const VERTICES_PER_FACE: usize = 4;
pub const INDICES_PER_FACE: usize = 6;
pub const FLOATS_PER_FACE: usize = VERTEX_SIZE * VERTICES_PER_FACE;

/// View of one vertex in a mesh's attribute stream.
#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable, Pod)]
pub struct ChunkVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    /// Bit pattern of [`pack_vertex_light`], not a meaningful float
    pub light: f32,
}

impl ChunkVertex {
    pub fn light_channels(&self) -> [u8; 4] {
        unpack_vertex_light(self.light)
    }
}

/// Packs four 0..1 light channels (r, g, b, sun) into 8 bits each, red in the highest byte.
/// The result is reinterpreted as a float so it fits the float vertex stream.
pub fn pack_vertex_light(light: Vec4) -> f32 {
    let channel = |value: f32| ((value * 255.0) as u32) & 0xff;
    let bits = (channel(light.x) << 24)
        | (channel(light.y) << 16)
        | (channel(light.z) << 8)
        | channel(light.w);
    f32::from_bits(bits)
}

pub fn unpack_vertex_light(packed: f32) -> [u8; 4] {
    packed.to_bits().to_be_bytes()
}

/// Geometry of one chunk in chunk-local coordinates.
#[derive(Debug)]
pub struct ChunkMesh {
    pub position: ChunkPos,
    vertices: Box<[f32]>,
    indices: Box<[u32]>,
    overflowed: bool,
}

impl ChunkMesh {
    pub fn new(position: ChunkPos, vertices: &[f32], indices: &[u32], overflowed: bool) -> Self {
        debug_assert_eq!(vertices.len() % VERTEX_SIZE, 0);

        ChunkMesh {
            position,
            vertices: vertices.into(),
            indices: indices.into(),
            overflowed,
        }
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_data(&self) -> &[ChunkVertex] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_SIZE
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn face_count(&self) -> usize {
        self.vertex_count() / VERTICES_PER_FACE
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// True if the build ran out of capacity and the geometry is truncated.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn memory_usage(&self) -> usize {
        self.vertex_bytes().len() + self.index_bytes().len()
    }
}
