use engine::{
    config::config_manager::Config,
    game_loop::{GameLoop, GameLoopConfig, GameLoopResult},
    init_engine,
    worldgen::generate_noise_world,
};
use renderer::renderer_config::RendererConfig;

use crate::{client_game::ClientGame, config::ClientConfig};

mod client_game;
mod config;
mod fps_counter;

const FRAME_TIME_S: f64 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();
    log::info!("Starting headless demo...");

    let context = init_engine()?;
    let renderer_config = RendererConfig::create_manager()?;
    let client_config = ClientConfig::create_manager()?.snapshot();

    let dims = context.config.snapshot().chunk_dims;
    let world = generate_noise_world(
        client_config.world_radius,
        client_config.seed,
        dims,
        &context.block_database,
    )?;

    let frames = client_config.frames;
    let game = ClientGame::new(context, renderer_config, client_config, world)?;
    let mut game_loop = GameLoop::new(
        game,
        GameLoopConfig {
            updates_per_s: 60,
            max_frame_time_s: 0.25,
        },
    );

    for _ in 0..frames {
        if game_loop.advance(FRAME_TIME_S)? == GameLoopResult::Exit {
            break;
        }
    }

    log::info!(
        "Ran {} updates and {} frames in {:.1} s of game time",
        game_loop.number_of_updates(),
        game_loop.number_of_renders(),
        game_loop.running_time_s()
    );
    game_loop.game.log_stats();

    Ok(())
}
