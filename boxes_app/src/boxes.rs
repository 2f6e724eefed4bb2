//! Walled arena of draggable dynamic boxes

use engine2d::physics::overlap_box;
use engine2d::prelude::*;
use rand::Rng;

use crate::WORLD_SCALING;

const BOX_COUNT: usize = 30;
const BORDER_THICKNESS: f32 = 1.0;
const WALL_COLOR: Rgba8 = Rgba8::new(20, 40, 70, 255);
const LINE_WIDTH: f32 = 0.15;
const DRAG_STIFFNESS: f32 = 1150.0;
const PICK_HALF_EXTENT: f32 = 0.2;

/// Build the arena scene
pub fn boxes_scene() -> Scene {
    Scene::new("boxes")
        .with_background(Rgba8::new(240, 240, 240, 255))
        .with_start(|scene, services| {
            services.camera.set_scale(WORLD_SCALING);
            services.shapes.set_line_width(LINE_WIDTH);

            scene.register_render_system(FillRectRenderSystem);
            scene.register_update_system(DynamicBodySyncSystem);
            scene.register_update_system(DragToMouseSystem::default());

            let mut rng = rand::thread_rng();
            for _ in 0..BOX_COUNT {
                let position = Vec2::new(rng.gen_range(-1.0..1.0) * 14.0, rng.gen_range(-1.0..1.0) * 6.0);
                let dimensions = Vec2::new(
                    (rng.gen::<f32>() * 5.0).clamp(1.5, 10.0),
                    (rng.gen::<f32>() * 5.0).clamp(1.5, 10.0),
                );
                let tint = Rgba8::from_floats(rng.gen(), rng.gen(), rng.gen(), 1.0);
                create_box(scene, services, position, dimensions, 30.0, tint);
            }

            let viewport = services.camera.viewport() / WORLD_SCALING;
            let half = viewport * 0.5;
            let walls = [
                (Vec2::new(0.0, -half.y), Vec2::new(viewport.x, BORDER_THICKNESS)),
                (Vec2::new(0.0, half.y), Vec2::new(viewport.x, BORDER_THICKNESS)),
                (Vec2::new(half.x, 0.0), Vec2::new(BORDER_THICKNESS, viewport.y)),
                (Vec2::new(-half.x, 0.0), Vec2::new(BORDER_THICKNESS, viewport.y)),
            ];
            for (position, dimensions) in walls {
                let wall = scene.new_entity(position, dimensions, 0.0).clone();
                scene.write_component_to_last_entity(FillRectRenderComponent { tint: WALL_COLOR });
                let body = StaticBodyComponent::new(
                    &wall,
                    ColliderShape::Rect,
                    5.0,
                    services.physics.as_mut(),
                    &mut services.contacts,
                );
                scene.write_component_to_last_entity(body);
            }
            log::info!("Boxes arena ready with {} entities", scene.entity_count());
        })
}

fn create_box(scene: &mut Scene, services: &mut Services, position: Vec2, dimensions: Vec2, rotation: f32, tint: Rgba8) {
    let entity = scene.new_entity(position, dimensions, rotation).clone();
    scene.write_component_to_last_entity(FillRectRenderComponent { tint });
    let body = DynamicBodyComponent::new(
        &entity,
        ColliderShape::Rect,
        dimensions.norm_squared(),
        0.35,
        0.2,
        1.0,
        services.physics.as_mut(),
        &mut services.contacts,
    );
    scene.write_component_to_last_entity(body);
    scene.write_component_to_last_entity(DragToMouseComponent::default());
}

/// Marks a box as draggable; holds the grab offset while dragged
#[derive(Debug, Clone, Copy, Default)]
struct DragToMouseComponent {
    offset: Vec2,
}

impl Component for DragToMouseComponent {}

/// Pulls the grabbed box toward the pointer with a spring force
#[derive(Debug, Default)]
struct DragToMouseSystem {
    dragged: Option<(EntityId, BodyHandle)>,
}

impl DragToMouseSystem {
    fn pick(ctx: &mut UpdateContext<'_>, pointer: Vec2) -> Option<(EntityId, BodyHandle)> {
        let extent = Vec2::new(PICK_HALF_EXTENT, PICK_HALF_EXTENT);
        let hit = overlap_box(ctx.services.physics.as_ref(), pointer - extent, pointer + extent)?;

        let id = ctx.world.entities_with::<DragToMouseComponent>().into_iter().find(|&id| {
            ctx.world
                .read::<DynamicBodyComponent>(id)
                .is_some_and(|dynamic| dynamic.body == hit)
        })?;
        let position = ctx.world.entity(id)?.position;
        if let Some(drag) = ctx.world.read_mut::<DragToMouseComponent>(id) {
            drag.offset = position - pointer;
        }
        Some((id, hit))
    }
}

impl System for DragToMouseSystem {
    fn update(&mut self, ctx: &mut UpdateContext<'_>, _dt: f32) {
        let input = &ctx.services.input;
        if !(input.is_mouse_pressed(MouseButton::Left) || input.touch_count() > 0) {
            self.dragged = None;
            return;
        }

        let pointer = ctx.pointer_world_position();
        if self.dragged.is_none() {
            self.dragged = Self::pick(ctx, pointer);
        }

        let Some((id, body)) = self.dragged else {
            return;
        };
        let (Some(entity), Some(drag)) = (ctx.world.entity(id), ctx.world.read::<DragToMouseComponent>(id)) else {
            self.dragged = None;
            return;
        };

        let target = pointer + drag.offset;
        ctx.services.physics.apply_force(body, (target - entity.position) * DRAG_STIFFNESS);
        ctx.services.shapes.draw_line(entity.position, pointer, Rgba8::BLACK);
    }
}
