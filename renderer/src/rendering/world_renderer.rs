use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};
use ordered_float::OrderedFloat;

use engine::{
    assets::{atlas::UvResolver, blocks::BlockDatabase},
    camera::Camera,
    math::{aabb::AABB, frustum::Frustum},
    voxels::{chunk::Chunk, coord::ChunkPos},
    world::{ChunkEvent, VoxelStorage},
};

use crate::{
    renderer_config::RendererConfig,
    rendering::{
        backend::RenderBackend,
        mesh_cache::ChunkMeshCache,
        mesh_generation::chunk_mesher::ChunkMesher,
    },
};

/// Decides which chunks get drawn each frame and in which order, building meshes on demand.
pub struct WorldRenderer {
    mesh_cache: ChunkMeshCache,
    frustum: Frustum,
    backlight: bool,
    pending_evictions: Vec<ChunkPos>,
    draw_order: Vec<(OrderedFloat<f32>, ChunkPos)>,
    loaded_chunks: Vec<ChunkPos>,
    visible_chunks: usize,
}

impl WorldRenderer {
    pub fn new(
        block_database: Arc<BlockDatabase>,
        uvs: Arc<dyn UvResolver + Send + Sync>,
        config: &RendererConfig,
    ) -> Self {
        let mesher = ChunkMesher::new(block_database, uvs, config.mesh_capacity);

        WorldRenderer {
            mesh_cache: ChunkMeshCache::new(mesher),
            frustum: Frustum::default(),
            backlight: config.backlight,
            pending_evictions: Vec::new(),
            draw_order: Vec::new(),
            loaded_chunks: Vec::new(),
            visible_chunks: 0,
        }
    }

    /// Face culling and lighting look one cell into neighboring chunks, so every change
    /// also dirties the surrounding meshes.
    pub fn handle_chunk_event(&mut self, event: ChunkEvent) {
        match event {
            ChunkEvent::Loaded(pos) | ChunkEvent::Modified(pos) => {
                self.mesh_cache.invalidate_with_neighbors(pos);
            }
            ChunkEvent::Unloaded(pos) => {
                for neighbor in pos.horizontal_neighbors() {
                    self.mesh_cache.invalidate(neighbor);
                }
                // Released after the next frame's submissions
                self.pending_evictions.push(pos);
            }
        }
    }

    pub fn handle_chunk_events(&mut self, events: impl IntoIterator<Item = ChunkEvent>) {
        for event in events {
            self.handle_chunk_event(event);
        }
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    pub fn set_backlight(&mut self, backlight: bool) {
        if self.backlight != backlight {
            self.backlight = backlight;
            self.mesh_cache.invalidate_all();
        }
    }

    /// Submits every lit, potentially visible chunk to `backend`, farthest first.
    /// Returns the number of chunks submitted.
    #[profiling::function]
    pub fn draw_visible<S: VoxelStorage + ?Sized>(
        &mut self,
        storage: &S,
        camera: &Camera,
        frustum_culling: bool,
        backend: &mut dyn RenderBackend,
    ) -> usize {
        let dims = storage.dims();

        self.loaded_chunks.clear();
        storage.loaded_chunks(&mut self.loaded_chunks);

        let eye = camera.position();
        let eye_chunk = Vec2::new(eye.x / dims.width as f32, eye.z / dims.depth as f32);

        self.draw_order.clear();
        self.draw_order.extend(self.loaded_chunks.iter().map(|&pos| {
            let center = Vec2::new(pos.x() as f32 + 0.5, pos.z() as f32 + 0.5);
            (OrderedFloat(eye_chunk.distance_squared(center)), pos)
        }));
        self.draw_order.sort_unstable_by(|(a_distance, a), (b_distance, b)| {
            b_distance
                .cmp(a_distance)
                .then_with(|| (a.x(), a.z()).cmp(&(b.x(), b.z())))
        });

        if frustum_culling {
            self.frustum.update(&camera.get_projection_view_matrix());
        }

        let mut visible = 0;

        for &(_, pos) in &self.draw_order {
            let Some(chunk) = storage.chunk(pos) else {
                continue;
            };
            if !chunk.is_lighted() {
                continue;
            }

            let Some(mesh) = self.mesh_cache.get_or_build(pos, storage, self.backlight) else {
                continue;
            };

            if frustum_culling && !self.frustum.intersects_aabb(&chunk_bounds(chunk)) {
                continue;
            }

            // Meshes without faces are neither submitted nor counted as visible
            if mesh.is_empty() {
                continue;
            }

            let model = Mat4::from_translation(pos.origin_f32(dims));
            backend.draw_mesh(&mesh, model);
            visible += 1;
        }

        for pos in self.pending_evictions.drain(..) {
            if storage.chunk(pos).is_none() {
                self.mesh_cache.evict(pos);
            }
        }

        self.visible_chunks = visible;
        visible
    }

    /// Chunks submitted by the last `draw_visible`
    pub fn visible_chunks(&self) -> usize {
        self.visible_chunks
    }

    pub fn mesh_cache(&self) -> &ChunkMeshCache {
        &self.mesh_cache
    }

    pub fn mesh_cache_mut(&mut self) -> &mut ChunkMeshCache {
        &mut self.mesh_cache
    }
}

/// World space bounds of the chunk's non-empty layers
fn chunk_bounds(chunk: &Chunk) -> AABB {
    let dims = chunk.dims();
    let origin = chunk.position.origin_f32(dims);

    AABB::new(
        origin + Vec3::new(0.0, chunk.bottom() as f32, 0.0),
        origin + Vec3::new(dims.width as f32, chunk.top() as f32, dims.depth as f32),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{
        assets::atlas::BlockUvCache,
        lighting::light::LightValue,
        voxels::{
            chunk::ChunkDims,
            coord::{LocalPos, WorldPos},
            voxel::Voxel,
        },
        world::World,
    };

    use crate::rendering::{
        backend::RecordingBackend, mesh_generation::mesh_buffer::MeshCapacity,
    };

    const DEFS: &str = r#"(
        blocks: [
            (id: 1, name: "stone", textures: Single("stone")),
        ],
    )"#;

    const STONE: Voxel = Voxel::from_type(1);
    const DIMS: ChunkDims = ChunkDims::new(4, 4, 4);

    fn create_renderer() -> WorldRenderer {
        let blocks = Arc::new(BlockDatabase::from_ron_str(DEFS).unwrap());
        let uvs = Arc::new(BlockUvCache::new(&blocks, 4).unwrap());
        let config = RendererConfig {
            enable_frustum_culling: true,
            backlight: false,
            mesh_capacity: MeshCapacity::faces(256),
        };
        WorldRenderer::new(blocks, uvs, &config)
    }

    /// A lit stone voxel in the middle of every chunk in `-radius..=radius`
    fn create_world(radius: i32) -> World {
        let mut world = World::new(DIMS);
        for x in -radius..=radius {
            for z in -radius..=radius {
                let pos = ChunkPos::new(x, z);
                world.insert_chunk_empty(pos);
                world.set_voxel(
                    WorldPos::from_chunk_and_local(pos, LocalPos::new(1, 1, 1), DIMS),
                    STONE,
                );
                let chunk = world.chunk_mut(pos).unwrap();
                chunk.fill_light(LightValue::FULL);
                chunk.set_lighted(true);
            }
        }
        world.drain_events();
        world
    }

    fn camera_at(eye: Vec3, target: Vec3) -> Camera {
        Camera {
            eye,
            target,
            aspect: 1.0,
            ..Default::default()
        }
    }

    fn drawn_positions(backend: &RecordingBackend) -> Vec<ChunkPos> {
        backend
            .draw_calls()
            .iter()
            .map(|call| call.mesh.position)
            .collect()
    }

    #[test]
    fn test_chunks_are_drawn_farthest_first() {
        let world = create_world(1);
        let mut renderer = create_renderer();
        let mut backend = RecordingBackend::new();
        let camera = camera_at(Vec3::new(2.0, 2.0, 2.0), Vec3::new(2.0, 2.0, -10.0));

        let visible = renderer.draw_visible(&world, &camera, false, &mut backend);
        assert_eq!(visible, 9);

        let order = drawn_positions(&backend);
        // Corners first, ties by position, then edges, then the camera's own chunk
        assert_eq!(
            &order[..4],
            &[
                ChunkPos::new(-1, -1),
                ChunkPos::new(-1, 1),
                ChunkPos::new(1, -1),
                ChunkPos::new(1, 1),
            ]
        );
        assert_eq!(order[8], ChunkPos::new(0, 0));
    }

    #[test]
    fn test_frustum_culls_chunks_behind_camera() {
        let world = create_world(2);
        let mut renderer = create_renderer();
        let mut backend = RecordingBackend::new();
        let camera = camera_at(Vec3::new(2.0, 2.0, 2.0), Vec3::new(2.0, 2.0, -10.0));

        let all = renderer.draw_visible(&world, &camera, false, &mut backend);
        backend.begin_frame();
        let culled = renderer.draw_visible(&world, &camera, true, &mut backend);

        assert_eq!(all, 25);
        assert!(culled < all);
        assert_eq!(renderer.visible_chunks(), culled);
        assert!(drawn_positions(&backend).iter().all(|pos| pos.z() <= 0));
        assert!(drawn_positions(&backend).contains(&ChunkPos::new(0, -2)));
    }

    #[test]
    fn test_unlit_chunks_are_not_meshed() {
        let mut world = create_world(1);
        world.chunk_mut(ChunkPos::new(1, 0)).unwrap().set_lighted(false);
        let mut renderer = create_renderer();
        let mut backend = RecordingBackend::new();
        let camera = camera_at(Vec3::new(2.0, 2.0, 2.0), Vec3::new(2.0, 2.0, -10.0));

        let visible = renderer.draw_visible(&world, &camera, false, &mut backend);

        assert_eq!(visible, 8);
        assert!(renderer.mesh_cache().get(ChunkPos::new(1, 0)).is_none());
        assert_eq!(renderer.mesh_cache().len(), 8);
    }

    #[test]
    fn test_empty_meshes_are_cached_but_not_counted() {
        let mut world = create_world(1);
        let empty = ChunkPos::new(1, 0);
        world.set_voxel(
            WorldPos::from_chunk_and_local(empty, LocalPos::new(1, 1, 1), DIMS),
            Voxel::AIR,
        );
        let mut renderer = create_renderer();
        let mut backend = RecordingBackend::new();
        let camera = camera_at(Vec3::new(2.0, 2.0, 2.0), Vec3::new(2.0, 2.0, -10.0));

        let visible = renderer.draw_visible(&world, &camera, false, &mut backend);

        assert_eq!(visible, 8);
        assert!(!drawn_positions(&backend).contains(&empty));
        assert!(renderer.mesh_cache().get(empty).is_some_and(|mesh| mesh.is_empty()));
    }

    #[test]
    fn test_meshes_are_translated_to_chunk_origin() {
        let world = create_world(1);
        let mut renderer = create_renderer();
        let mut backend = RecordingBackend::new();
        let camera = camera_at(Vec3::new(2.0, 2.0, 2.0), Vec3::new(2.0, 2.0, -10.0));

        renderer.draw_visible(&world, &camera, false, &mut backend);

        for call in backend.draw_calls() {
            let pos = call.mesh.position;
            let expected = Vec3::new(pos.x() as f32 * 4.0, 0.0, pos.z() as f32 * 4.0);
            assert_eq!(call.model.transform_point3(Vec3::ZERO), expected);
        }
    }

    #[test]
    fn test_unloaded_mesh_is_evicted_after_submission() {
        let mut world = create_world(1);
        let mut renderer = create_renderer();
        let mut backend = RecordingBackend::new();
        let camera = camera_at(Vec3::new(2.0, 2.0, 2.0), Vec3::new(2.0, 2.0, -10.0));

        renderer.draw_visible(&world, &camera, false, &mut backend);
        assert!(renderer.mesh_cache().get(ChunkPos::new(1, 1)).is_some());

        world.unload_chunk(ChunkPos::new(1, 1));
        renderer.handle_chunk_events(world.drain_events());
        // Still cached until the next frame has been submitted
        assert!(renderer.mesh_cache().get(ChunkPos::new(1, 1)).is_some());
        assert!(renderer.mesh_cache().is_dirty(ChunkPos::new(0, 1)));

        backend.begin_frame();
        let visible = renderer.draw_visible(&world, &camera, false, &mut backend);

        assert_eq!(visible, 8);
        assert!(renderer.mesh_cache().get(ChunkPos::new(1, 1)).is_none());
        assert_eq!(renderer.mesh_cache().stats().evictions, 1);
    }

    #[test]
    fn test_edit_rebuilds_chunk_and_neighbors() {
        let mut world = create_world(1);
        let mut renderer = create_renderer();
        let mut backend = RecordingBackend::new();
        let camera = camera_at(Vec3::new(2.0, 2.0, 2.0), Vec3::new(2.0, 2.0, -10.0));

        renderer.draw_visible(&world, &camera, false, &mut backend);
        assert_eq!(renderer.mesh_cache().stats().builds, 9);

        world.set_voxel(WorldPos::new(2, 1, 1), STONE);
        renderer.handle_chunk_events(world.drain_events());

        backend.begin_frame();
        renderer.draw_visible(&world, &camera, false, &mut backend);

        // The chunk itself plus its four horizontal neighbors
        assert_eq!(renderer.mesh_cache().stats().builds, 14);
        let mesh = renderer.mesh_cache().get(ChunkPos::new(0, 0)).unwrap();
        assert_eq!(mesh.face_count(), 10);
    }

    #[test]
    fn test_backlight_change_rebuilds_everything() {
        let world = create_world(1);
        let mut renderer = create_renderer();
        let mut backend = RecordingBackend::new();
        let camera = camera_at(Vec3::new(2.0, 2.0, 2.0), Vec3::new(2.0, 2.0, -10.0));

        renderer.draw_visible(&world, &camera, false, &mut backend);
        renderer.set_backlight(false);
        renderer.draw_visible(&world, &camera, false, &mut backend);
        assert_eq!(renderer.mesh_cache().stats().builds, 9);

        renderer.set_backlight(true);
        renderer.draw_visible(&world, &camera, false, &mut backend);
        assert_eq!(renderer.mesh_cache().stats().builds, 18);
    }
}
