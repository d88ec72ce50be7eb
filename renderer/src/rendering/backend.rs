use std::sync::Arc;

use glam::Mat4;

use crate::rendering::chunk_mesh::ChunkMesh;

/// Receives draw submissions. Implementations may hold on to the mesh until the frame
/// is presented; the cache only drops its own reference.
pub trait RenderBackend {
    fn draw_mesh(&mut self, mesh: &Arc<ChunkMesh>, model: Mat4);
}

pub struct DrawCall {
    pub mesh: Arc<ChunkMesh>,
    pub model: Mat4,
}

/// Backend that keeps the draw calls of the current frame, for headless runs and tests.
#[derive(Default)]
pub struct RecordingBackend {
    draw_calls: Vec<DrawCall>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    pub fn triangle_count(&self) -> usize {
        self.draw_calls
            .iter()
            .map(|call| call.mesh.index_count() / 3)
            .sum()
    }

    /// Forgets the previous frame's draw calls.
    pub fn begin_frame(&mut self) {
        self.draw_calls.clear();
    }
}

impl RenderBackend for RecordingBackend {
    fn draw_mesh(&mut self, mesh: &Arc<ChunkMesh>, model: Mat4) {
        self.draw_calls.push(DrawCall {
            mesh: mesh.clone(),
            model,
        });
    }
}
