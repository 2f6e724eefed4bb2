//! Render systems, one per drawing component
//!
//! Each walks its component table and queues geometry into the sprite or
//! shape batch. None of them touch entity state.

use crate::ecs::components::{
    AnimationComponent, CircleRenderComponent, FillRectRenderComponent, LineRenderComponent, RectRenderComponent,
    SpriteAnimation, SpriteComponent, TriangleRenderComponent,
};
use crate::ecs::RenderSystem;
use crate::foundation::math::{rotate_about, Vec2, Vec2i};
use crate::render::{Rgba8, TileSet};
use crate::scene::RenderContext;

/// Draws [`SpriteComponent`]s at texture size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRenderOriginSystem {
    /// Shift from the entity position, in half-texture units
    pub offset: Vec2,
    /// Multiplier on the texture size
    pub scale: f32,
}

impl Default for SpriteRenderOriginSystem {
    fn default() -> Self {
        Self {
            offset: Vec2::zeros(),
            scale: 1.0,
        }
    }
}

impl RenderSystem for SpriteRenderOriginSystem {
    fn draw(&mut self, ctx: &mut RenderContext<'_>) {
        let sprites = &mut *ctx.sprites;
        ctx.world.for_each_ref::<SpriteComponent>(|entity, sprite| {
            let half = sprite.texture.size() * 0.5;
            let center = entity.position + self.offset.component_mul(&half);
            sprites.draw_sprite_origin_scaled_rotated(
                center,
                Vec2::zeros(),
                Vec2::new(1.0, 1.0),
                self.scale,
                &sprite.texture,
                sprite.tint,
                entity.rotation,
            );
        });
    }
}

/// Draws [`LineRenderComponent`]s in white
#[derive(Debug, Clone, Copy, Default)]
pub struct LineRenderSystem;

impl RenderSystem for LineRenderSystem {
    fn draw(&mut self, ctx: &mut RenderContext<'_>) {
        let shapes = &mut *ctx.shapes;
        ctx.world.for_each_ref::<LineRenderComponent>(|_, line| {
            shapes.draw_line(line.from, line.to, Rgba8::WHITE);
        });
    }
}

/// Draws [`TriangleRenderComponent`]s in white, rotated with the entity
#[derive(Debug, Clone, Copy, Default)]
pub struct TriangleRenderSystem;

impl RenderSystem for TriangleRenderSystem {
    fn draw(&mut self, ctx: &mut RenderContext<'_>) {
        let shapes = &mut *ctx.shapes;
        ctx.world.for_each_ref::<TriangleRenderComponent>(|entity, triangle| {
            shapes.draw_triangle_rotated(entity.position, triangle.dimensions, Rgba8::WHITE, entity.rotation);
        });
    }
}

/// Outlines entities holding a [`RectRenderComponent`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RectRenderSystem;

impl RenderSystem for RectRenderSystem {
    fn draw(&mut self, ctx: &mut RenderContext<'_>) {
        let shapes = &mut *ctx.shapes;
        ctx.world.for_each_ref::<RectRenderComponent>(|entity, rect| {
            shapes.draw_rect_rotated(entity.position, entity.dimensions, rect.tint, entity.rotation);
        });
    }
}

/// Fills entities holding a [`FillRectRenderComponent`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FillRectRenderSystem;

impl RenderSystem for FillRectRenderSystem {
    fn draw(&mut self, ctx: &mut RenderContext<'_>) {
        let shapes = &mut *ctx.shapes;
        ctx.world.for_each_ref::<FillRectRenderComponent>(|entity, rect| {
            shapes.draw_fill_rect_rotated(entity.position, entity.dimensions, rect.tint, entity.rotation);
        });
    }
}

/// Circles around entities holding a [`CircleRenderComponent`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CircleRenderSystem;

impl RenderSystem for CircleRenderSystem {
    fn draw(&mut self, ctx: &mut RenderContext<'_>) {
        let shapes = &mut *ctx.shapes;
        ctx.world.for_each_ref::<CircleRenderComponent>(|entity, _| {
            shapes.draw_circle(entity.position, entity.dimensions.x, Rgba8::WHITE);
        });
    }
}

/// Draws [`SpriteAnimation`]s from a tile set
///
/// The tile comes from the entity's `AnimationComponent<Vec2i>` value for
/// the current animation, or the starting sprite when there is none.
#[derive(Debug, Clone, Copy)]
pub struct SpriteAnimationSystem {
    /// Sprite sheet
    pub tileset: TileSet,
    /// Multiplier on the tile size
    pub sprite_scale: f32,
    /// Shift from the entity position, rotated with the entity
    pub offset: Vec2,
}

impl SpriteAnimationSystem {
    /// Draw tiles from `tileset` at their pixel size
    pub fn new(tileset: TileSet) -> Self {
        Self {
            tileset,
            sprite_scale: 1.0,
            offset: Vec2::zeros(),
        }
    }
}

impl RenderSystem for SpriteAnimationSystem {
    fn draw(&mut self, ctx: &mut RenderContext<'_>) {
        let world = ctx.world;
        let sprites = &mut *ctx.sprites;
        world.for_each_ref::<SpriteAnimation>(|entity, animation| {
            let tile = world
                .read::<AnimationComponent<Vec2i>>(entity.id())
                .and_then(|anims| anims.current_value(&animation.current_animation))
                .unwrap_or(animation.starting_sprite);
            let (uv1, uv2) = self.tileset.uv_rect(tile);
            let center = rotate_about(entity.position + self.offset, entity.rotation, entity.position);
            sprites.draw_sprite_rotated(
                center,
                self.tileset.sprite_size() * self.sprite_scale,
                uv1,
                uv2,
                self.tileset.texture(),
                Rgba8::WHITE,
                entity.rotation,
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::CameraConfig;
    use crate::ecs::World;
    use crate::render::{Camera2D, HeadlessBackend, ShapeBatch, SpriteBatch, Texture2D, TextureId};

    struct Fixture {
        world: World,
        sprites: SpriteBatch,
        shapes: ShapeBatch,
        camera: Camera2D,
    }

    impl Fixture {
        fn new() -> Self {
            let mut backend = HeadlessBackend::new(800, 600);
            Self {
                world: World::new(),
                sprites: SpriteBatch::new(&mut backend).unwrap(),
                shapes: ShapeBatch::new(&mut backend, 1.0).unwrap(),
                camera: Camera2D::new(Vec2::new(800.0, 600.0), CameraConfig::default()),
            }
        }

        fn draw(&mut self, system: &mut dyn RenderSystem) {
            let mut ctx = RenderContext {
                world: &self.world,
                sprites: &mut self.sprites,
                shapes: &mut self.shapes,
                camera: &self.camera,
            };
            system.draw(&mut ctx);
        }
    }

    fn texture(id: u64, width: u32, height: u32) -> Texture2D {
        Texture2D {
            id: TextureId(id),
            width,
            height,
        }
    }

    #[test]
    fn test_sprite_origin_system_queues_one_glyph_per_sprite() {
        let mut fx = Fixture::new();
        let a = fx.world.spawn(Vec2::new(10.0, 10.0), Vec2::zeros(), 0.0);
        fx.world.write(a, SpriteComponent { texture: texture(1, 4, 2), tint: Rgba8::WHITE });
        let b = fx.world.spawn(Vec2::zeros(), Vec2::zeros(), 0.0);
        fx.world.write(b, SpriteComponent { texture: texture(1, 4, 2), tint: Rgba8::RED });

        fx.draw(&mut SpriteRenderOriginSystem { offset: Vec2::new(1.0, 1.0), scale: 2.0 });
        assert_eq!(fx.sprites.glyph_count(), 2);
    }

    #[test]
    fn test_sprite_origin_offset_is_in_half_texture_units() {
        let mut fx = Fixture::new();
        let id = fx.world.spawn(Vec2::new(10.0, 10.0), Vec2::zeros(), 0.0);
        fx.world.write(id, SpriteComponent { texture: texture(1, 4, 2), tint: Rgba8::WHITE });

        fx.draw(&mut SpriteRenderOriginSystem { offset: Vec2::new(1.0, 1.0), scale: 1.0 });
        fx.sprites.finalize();
        // Center shifted by half the texture: (12, 11); quad spans 4x2.
        let bottom_left = fx.sprites.vertices()[0].position();
        assert_relative_eq!(bottom_left.x, 10.0);
        assert_relative_eq!(bottom_left.y, 10.0);
    }

    #[test]
    fn test_shape_systems_draw_from_entity_transform() {
        let mut fx = Fixture::new();
        let id = fx.world.spawn(Vec2::zeros(), Vec2::new(2.0, 2.0), 0.0);
        fx.world.write(id, FillRectRenderComponent { tint: Rgba8::GREEN });
        fx.world.write(id, RectRenderComponent { tint: Rgba8::BLUE });
        fx.world.write(id, CircleRenderComponent);
        fx.world.write(id, LineRenderComponent { from: Vec2::zeros(), to: Vec2::new(1.0, 0.0) });
        fx.world.write(id, TriangleRenderComponent { dimensions: Vec2::new(1.0, 1.0) });

        fx.draw(&mut FillRectRenderSystem);
        assert_eq!(fx.shapes.vertices().len(), 4);
        fx.draw(&mut RectRenderSystem);
        assert_eq!(fx.shapes.vertices().len(), 4 + 4 * 4);
        fx.draw(&mut LineRenderSystem);
        assert_eq!(fx.shapes.vertices().len(), 4 + 16 + 4);
        fx.draw(&mut TriangleRenderSystem);
        assert_eq!(fx.shapes.vertices().len(), 24 + 3 * 4);
        fx.draw(&mut CircleRenderSystem);
        assert_eq!(fx.shapes.vertices().len(), 36 + crate::render::shape_batch::CIRCLE_SEGMENTS * 4);
    }

    #[test]
    fn test_sprite_animation_uses_tween_value_or_starting_sprite() {
        let mut fx = Fixture::new();
        let tileset = TileSet::new(texture(7, 64, 32), 4, 2);

        let still = fx.world.spawn(Vec2::zeros(), Vec2::zeros(), 0.0);
        fx.world.write(still, SpriteAnimation { current_animation: "walk".into(), starting_sprite: Vec2i::new(1, 1) });

        let animated = fx.world.spawn(Vec2::zeros(), Vec2::zeros(), 0.0);
        fx.world.write(animated, SpriteAnimation { current_animation: "walk".into(), starting_sprite: Vec2i::new(0, 0) });
        let mut anims: AnimationComponent<Vec2i> = AnimationComponent::new();
        anims.add_animation("walk", true);
        anims.register_keyframe("walk", 0.0, Vec2i::new(2, 0));
        anims.register_keyframe("walk", 1.0, Vec2i::new(3, 0));
        fx.world.write(animated, anims);

        fx.draw(&mut SpriteAnimationSystem::new(tileset));
        fx.sprites.finalize();

        let mut top_left_uvs: Vec<[f32; 2]> = fx
            .sprites
            .vertices()
            .chunks(6)
            .map(|quad| quad[5].uv)
            .collect();
        top_left_uvs.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(top_left_uvs, vec![[0.25, 0.5], [0.5, 0.0]]);
    }
}
