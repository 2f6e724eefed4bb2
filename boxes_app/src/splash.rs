//! Logo fade-in/fade-out scene

use engine2d::prelude::*;

use crate::boxes;

const LOGO_PATH: &str = "logo.png";
const FADE: &str = "Fade";

/// Build the splash scene; it switches to the boxes arena once the fade ends
pub fn splash_scene() -> Scene {
    Scene::new("splash").with_background(Rgba8::BLACK).with_start(|scene, services| {
        services.camera.set_scale(1.0);

        scene.register_render_system(SpriteRenderOriginSystem {
            scale: 1.0 / 20.0,
            ..SpriteRenderOriginSystem::default()
        });
        scene.register_update_system(TweenAnimatorSystem::<f32>::new());
        scene.register_update_system(SplashFadeSystem);

        let logo = services
            .assets
            .load_texture_or_placeholder(services.backend.as_mut(), LOGO_PATH);

        scene.new_entity(Vec2::zeros(), Vec2::new(12.0, 8.0), 0.0);
        scene.write_component_to_last_entity(SpriteComponent {
            texture: logo,
            tint: Rgba8::WHITE,
        });

        let mut fade = AnimationComponent::<f32>::new();
        fade.add_animation(FADE, false);
        fade.register_keyframe(FADE, 0.0, 0.0);
        fade.register_keyframe(FADE, 3.0, 1.0);
        fade.register_keyframe(FADE, 6.0, 0.0);
        fade.play(FADE);
        scene.write_component_to_last_entity(fade);
    })
}

/// Copies the fade value into the sprite alpha
struct SplashFadeSystem;

impl System for SplashFadeSystem {
    fn update(&mut self, ctx: &mut UpdateContext<'_>, _dt: f32) {
        let fading: Vec<(EntityId, Option<f32>, bool)> = ctx
            .world
            .entities_with::<AnimationComponent<f32>>()
            .into_iter()
            .filter_map(|id| {
                let anim = ctx.world.read::<AnimationComponent<f32>>(id)?;
                Some((id, anim.current_value(FADE), anim.has_finished(FADE)))
            })
            .collect();

        let mut finished = false;
        for (id, alpha, done) in fading {
            if let (Some(alpha), Some(sprite)) = (alpha, ctx.world.read_mut::<SpriteComponent>(id)) {
                sprite.tint = sprite.tint.with_alpha(alpha);
            }
            finished |= done;
        }

        if finished && !ctx.scene_change_requested() {
            ctx.change_scene(boxes::boxes_scene());
        }
    }
}
