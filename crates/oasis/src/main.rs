//! Oasis binary
//!
//! Runs the game against the headless platform with placeholder resources.
//! Set `OASIS_CONFIG` to a `.toml` or `.ron` file to override defaults.

use oasis::{world, Game, GameConfig, HeadlessPlatform};
use oasis_engine::assets::ResourceManager;
use oasis_engine::config::Config;
use oasis_engine::foundation::logging;
use oasis_engine::render::RecordingRenderer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config_path = std::env::var("OASIS_CONFIG").ok();
    let config = GameConfig::load_or_default(config_path.as_deref())?;
    log::info!("Starting {} ({}x{})", config.window.title, config.window.width, config.window.height);

    let mut resources = ResourceManager::new();
    world::register_headless_resources(&mut resources);

    let simulation = config.simulation.clone();
    let mut game = Game::new(config, &resources)?;
    let mut platform = HeadlessPlatform::demo(simulation.headless_duration, simulation.headless_frame_step);
    let mut renderer = RecordingRenderer::default();

    let summary = game.run(&mut platform, &mut renderer);
    log::info!(
        "Final state {:?} after {:.1}s: {} frames, {} ticks, {} draws, {} orbs",
        summary.final_state,
        summary.elapsed,
        summary.frames,
        summary.ticks,
        renderer.total_draws(),
        summary.orbs_collected
    );
    Ok(())
}
