use std::time::Instant;

use anyhow::Context;
use bytesize::ByteSize;
use glam::Vec3;

use engine::{
    EngineContext,
    assets::blocks::BlockDatabase,
    camera::Camera,
    config::config_manager::ConfigManager,
    game_loop::{Game, GameLoopTime},
    lighting::sky_light::fill_sky_light,
    voxels::{
        chunk::Chunk,
        coord::{ChunkPos, WorldPos},
        voxel::Voxel,
    },
    world::{VoxelStorage, World},
};
use renderer::{
    renderer_config::RendererConfig,
    rendering::{backend::RecordingBackend, world_renderer::WorldRenderer},
};

use crate::{config::ClientConfig, fps_counter::FpsCounter};

const UPDATES_PER_EDIT: u64 = 30;
const UPDATES_PER_UNLOAD: u64 = 240;
const RENDERS_PER_REPORT: u64 = 120;

pub struct ClientGame {
    engine_context: EngineContext,
    renderer_config: ConfigManager<RendererConfig>,
    client_config: ClientConfig,
    world: World,
    world_renderer: WorldRenderer,
    backend: RecordingBackend,
    camera: Camera,
    fps_counter: FpsCounter,
    edit_voxel: Voxel,
    /// Chunk taken out of the world by the last unload, reinserted by the next one
    parked_chunk: Option<Chunk>,
    updates: u64,
    renders: u64,
}

impl Game for ClientGame {
    #[profiling::function]
    fn update(&mut self, time: &GameLoopTime) -> anyhow::Result<()> {
        self.updates += 1;

        let angle = time.elapsed_time_s as f32 * self.client_config.orbit_speed;
        let radius = self.client_config.orbit_radius;
        self.camera.eye = Vec3::new(
            angle.cos() * radius,
            self.client_config.orbit_height,
            angle.sin() * radius,
        );
        self.camera.target = Vec3::new(0.0, self.client_config.orbit_height * 0.5, 0.0);

        if self.updates % UPDATES_PER_EDIT == 0 {
            self.edit_terrain();
        }
        if self.updates % UPDATES_PER_UNLOAD == 0 {
            self.cycle_edge_chunk();
        }

        Ok(())
    }

    #[profiling::function]
    fn render(&mut self, _time: &GameLoopTime) -> anyhow::Result<()> {
        let frame_start = Instant::now();

        let config = self.renderer_config.snapshot();
        self.world_renderer.set_backlight(config.backlight);
        self.world_renderer
            .handle_chunk_events(self.world.drain_events());

        self.backend.begin_frame();
        self.world_renderer.draw_visible(
            &self.world,
            &self.camera,
            config.enable_frustum_culling,
            &mut self.backend,
        );

        self.fps_counter.record(frame_start.elapsed());
        self.renders += 1;

        if self.renders % RENDERS_PER_REPORT == 0 {
            self.log_stats();
        }

        profiling::finish_frame!();
        Ok(())
    }
}

impl ClientGame {
    pub fn new(
        engine_context: EngineContext,
        renderer_config: ConfigManager<RendererConfig>,
        client_config: ClientConfig,
        world: World,
    ) -> anyhow::Result<Self> {
        let world_renderer = WorldRenderer::new(
            engine_context.block_database.clone(),
            engine_context.block_uvs.clone(),
            &renderer_config.snapshot(),
        );
        let edit_voxel = pick_edit_voxel(&engine_context.block_database)?;

        Ok(ClientGame {
            engine_context,
            renderer_config,
            client_config,
            world,
            world_renderer,
            backend: RecordingBackend::new(),
            camera: Camera::default(),
            fps_counter: FpsCounter::new(),
            edit_voxel,
            parked_chunk: None,
            updates: 0,
            renders: 0,
        })
    }

    /// Stacks a block on top of a column near the origin and relights its chunk.
    fn edit_terrain(&mut self) {
        let dims = self.world.dims();
        let edit = (self.updates / UPDATES_PER_EDIT) as i32;
        let (x, z) = (edit % 8 - 4, (edit / 8) % 8 - 4);

        let Some(y) = (0..dims.height as i32)
            .rev()
            .find(|&y| self.world.get_voxel(WorldPos::new(x, y, z)).is_some_and(|v| !v.is_air()))
        else {
            return;
        };

        let position = WorldPos::new(x, y + 1, z);
        if !self.world.set_voxel(position, self.edit_voxel) {
            return;
        }

        let chunk_pos = position.to_chunk_pos(dims);
        if let Some(chunk) = self.world.chunk_mut(chunk_pos) {
            fill_sky_light(chunk, &self.engine_context.block_database);
        }
        log::debug!("Placed block at {:?}", position.0);
    }

    /// Alternately unloads and reloads a chunk at the edge of the world.
    fn cycle_edge_chunk(&mut self) {
        let radius = self.client_config.world_radius;
        let pos = ChunkPos::new(radius - 1, radius - 1);

        match self.parked_chunk.take() {
            Some(chunk) => {
                log::info!("Reloading chunk {:?}", chunk.position);
                self.world.insert_chunk(chunk);
            }
            None => {
                self.parked_chunk = self.world.unload_chunk(pos);
                if self.parked_chunk.is_some() {
                    log::info!("Unloaded chunk {:?}", pos);
                }
            }
        }
    }

    pub fn log_stats(&self) {
        let stats = self.world_renderer.mesh_cache().stats();

        log::info!(
            "Visible chunks: {}/{}, triangles: {}, avg frame: {:.2} ms, slowest: {:.2} ms",
            self.world_renderer.visible_chunks(),
            self.world.chunk_count(),
            self.backend.triangle_count(),
            self.fps_counter.average_frame_time().as_secs_f64() * 1000.0,
            self.fps_counter.slowest_frame_time().as_secs_f64() * 1000.0,
        );
        log::info!(
            "Mesh cache: {} meshes ({}), {} builds, {} hits, {} evictions, {} overflowed. World: {}",
            self.world_renderer.mesh_cache().len(),
            ByteSize(self.world_renderer.mesh_cache().memory_usage() as u64),
            stats.builds,
            stats.hits,
            stats.evictions,
            stats.overflows,
            ByteSize(self.world.approximate_memory_usage() as u64),
        );
    }
}

fn pick_edit_voxel(blocks: &BlockDatabase) -> anyhow::Result<Voxel> {
    let block = blocks
        .get_by_name("lamp")
        .or_else(|| blocks.get_by_name("stone"))
        .context("Block definitions contain neither 'lamp' nor 'stone'")?;
    Ok(Voxel::from_type(block.id.0))
}
