//! Physics boxes demo
//!
//! A splash screen fades a logo in and out, then hands over to a walled
//! arena of dynamic boxes that can be dragged around with the mouse or a
//! finger.

mod boxes;
mod splash;

use engine2d::foundation::logging;
use engine2d::prelude::*;

/// World units per pixel divisor for the boxes arena
pub const WORLD_SCALING: f32 = 10.0;

const CONFIG_PATH: &str = "boxes.toml";
const HEADLESS_FRAMES: u64 = 60 * 10;

struct BoxesApp;

impl Application for BoxesApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.services.assets.add_search_path("assets");
        engine.change_scene(splash::splash_scene());
        Ok(())
    }

    fn draw(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let services = &mut engine.services;
        if services.input.touch_count() > 0 {
            let pointer = services.pointer_world_position();
            services.shapes.draw_circle(pointer, 0.25, Rgba8::BLACK);
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        log::info!("Boxes demo finished with {} bodies alive", engine.services.physics.body_count());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut config = EngineConfig::load_or_default(CONFIG_PATH);
    config.window.title = "Boxes".to_string();
    config.window.width = 800;
    config.window.height = 600;

    let mut engine = Engine::headless(config)?;
    let mut platform = HeadlessPlatform::new(HEADLESS_FRAMES, 1.0 / 60.0);
    engine.run(&mut BoxesApp, &mut platform)?;
    Ok(())
}
