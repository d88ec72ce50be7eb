use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use engine::voxels::coord::ChunkPos;

use crate::rendering::chunk_mesh::{
    ChunkMesh, FLOATS_PER_FACE, INDICES_PER_FACE, VERTICES_PER_FACE, pack_vertex_light,
};

/// Output capacity of a mesh build, counted in quads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshCapacity {
    pub faces: usize,
}

impl MeshCapacity {
    pub const fn faces(faces: usize) -> Self {
        MeshCapacity { faces }
    }

    pub const fn vertex_floats(&self) -> usize {
        self.faces * FLOATS_PER_FACE
    }

    pub const fn indices(&self) -> usize {
        self.faces * INDICES_PER_FACE
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FaceVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub light: Vec4,
}

// Two triangles per quad, split along 0-2 or along 1-3
const INDICES: [u32; INDICES_PER_FACE] = [0, 1, 2, 0, 2, 3];
const INDICES_ROTATED: [u32; INDICES_PER_FACE] = [0, 1, 3, 1, 2, 3];

/// Vertex and index arrays with a fixed capacity, reused across builds.
///
/// Faces are written whole: a face that does not fit is dropped, the overflow flag is
/// raised and every later face is rejected until [`MeshBuffer::reset`].
pub struct MeshBuffer {
    capacity: MeshCapacity,
    vertices: Vec<f32>,
    indices: Vec<u32>,
    next_index: u32,
    overflowed: bool,
}

impl MeshBuffer {
    pub fn new(capacity: MeshCapacity) -> Self {
        MeshBuffer {
            capacity,
            vertices: Vec::with_capacity(capacity.vertex_floats()),
            indices: Vec::with_capacity(capacity.indices()),
            next_index: 0,
            overflowed: false,
        }
    }

    pub fn reset(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.next_index = 0;
        self.overflowed = false;
    }

    pub fn capacity(&self) -> MeshCapacity {
        self.capacity
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / INDICES_PER_FACE
    }

    /// Returns false, and sets the overflow flag, if the face did not fit.
    pub fn push_face(&mut self, vertices: [FaceVertex; VERTICES_PER_FACE], rotated: bool) -> bool {
        if self.overflowed
            || self.vertices.len() + FLOATS_PER_FACE > self.capacity.vertex_floats()
            || self.indices.len() + INDICES_PER_FACE > self.capacity.indices()
        {
            self.overflowed = true;
            return false;
        }

        for vertex in vertices {
            self.vertices.extend_from_slice(&[
                vertex.position.x,
                vertex.position.y,
                vertex.position.z,
                vertex.uv.x,
                vertex.uv.y,
                pack_vertex_light(vertex.light),
            ]);
        }

        let base = self.next_index;
        let pattern = if rotated { INDICES_ROTATED } else { INDICES };
        self.indices.extend(pattern.map(|index| base + index));
        self.next_index += VERTICES_PER_FACE as u32;
        true
    }

    pub fn to_mesh(&self, position: ChunkPos) -> ChunkMesh {
        ChunkMesh::new(position, &self.vertices, &self.indices, self.overflowed)
    }
}
