//! Scene dispatch order and the switch protocol

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::EngineConfig;
use crate::ecs::{Component, RenderSystem, System};
use crate::engine::Engine;
use crate::foundation::math::Vec2;
use crate::scene::{RenderContext, Scene, UpdateContext};
use crate::Application;
use crate::AppError;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Counter(u32);
impl Component for Counter {}

struct Incrementer;

impl System for Incrementer {
    fn update(&mut self, ctx: &mut UpdateContext<'_>, _dt: f32) {
        ctx.world.for_each::<Counter>(|_, counter| counter.0 += 1);
    }
}

struct Observer(Rc<RefCell<Vec<u32>>>);

impl System for Observer {
    fn update(&mut self, ctx: &mut UpdateContext<'_>, _dt: f32) {
        let log = &self.0;
        ctx.world.for_each_ref::<Counter>(|_, counter| log.borrow_mut().push(counter.0));
    }
}

struct DtRecorder(Rc<RefCell<Vec<f32>>>);

impl System for DtRecorder {
    fn update(&mut self, _ctx: &mut UpdateContext<'_>, dt: f32) {
        self.0.borrow_mut().push(dt);
    }
}

struct Tagger(&'static str, Rc<RefCell<Vec<&'static str>>>);

impl RenderSystem for Tagger {
    fn draw(&mut self, _ctx: &mut RenderContext<'_>) {
        self.1.borrow_mut().push(self.0);
    }
}

struct SwitchOnce(Option<Scene>);

impl System for SwitchOnce {
    fn update(&mut self, ctx: &mut UpdateContext<'_>, _dt: f32) {
        if let Some(next) = self.0.take() {
            ctx.change_scene(next);
            assert!(ctx.scene_change_requested());
        }
    }
}

struct Idle;

impl Application for Idle {
    fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
        Ok(())
    }
}

fn engine() -> Engine {
    Engine::headless(EngineConfig::default()).unwrap()
}

#[test]
fn test_later_systems_see_earlier_mutations() {
    let mut engine = engine();
    let log = Rc::new(RefCell::new(Vec::new()));

    let mut scene = Scene::new("order");
    scene.new_entity(Vec2::zeros(), Vec2::zeros(), 0.0);
    scene.write_component_to_last_entity(Counter(0));
    scene.register_update_system(Incrementer);
    scene.register_update_system(Observer(Rc::clone(&log)));
    engine.change_scene(scene);

    engine.update(&mut Idle, 0.01).unwrap();
    engine.update(&mut Idle, 0.01).unwrap();
    assert_eq!(*log.borrow(), vec![1, 2]);
}

#[test]
fn test_every_system_gets_the_same_clamped_dt() {
    let mut engine = engine();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut scene = Scene::new("dt");
    scene.register_update_system(DtRecorder(Rc::clone(&seen)));
    scene.register_update_system(DtRecorder(Rc::clone(&seen)));
    engine.change_scene(scene);

    engine.update(&mut Idle, 1.0).unwrap();
    assert_eq!(*seen.borrow(), vec![0.05, 0.05]);
}

#[test]
fn test_render_systems_run_in_registration_order() {
    let mut engine = engine();
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut scene = Scene::new("draw");
    scene.register_render_system(Tagger("first", Rc::clone(&order)));
    scene.register_render_system(Tagger("second", Rc::clone(&order)));
    engine.change_scene(scene);

    engine.draw(&mut Idle).unwrap();
    assert_eq!(*order.borrow(), vec!["first", "second"]);
}

#[test]
fn test_switch_tears_down_previous_and_starts_next_once() {
    let mut engine = engine();
    let starts = Rc::new(Cell::new(0));

    let mut first = Scene::new("first");
    first.new_entity(Vec2::zeros(), Vec2::zeros(), 0.0);
    first.register_update_system(Incrementer);
    first.register_render_system(Tagger("unused", Rc::default()));
    assert!(engine.change_scene(first).is_none());

    let counter = Rc::clone(&starts);
    let second = Scene::new("second").with_start(move |scene, _| {
        counter.set(counter.get() + 1);
        scene.new_entity(Vec2::zeros(), Vec2::zeros(), 0.0);
    });
    let previous = engine.change_scene(second).unwrap();

    assert_eq!(previous.name(), "first");
    assert_eq!(previous.entity_count(), 0);
    assert_eq!(previous.update_system_count(), 0);
    assert_eq!(previous.render_system_count(), 0);
    assert_eq!(starts.get(), 1);

    let current = engine.current_scene().unwrap();
    assert_eq!(current.name(), "second");
    assert_eq!(current.entity_count(), 1);

    engine.update(&mut Idle, 0.01).unwrap();
    assert_eq!(starts.get(), 1);
}

#[test]
fn test_system_requested_change_applies_after_update_phase() {
    let mut engine = engine();
    let started = Rc::new(Cell::new(false));
    let flag = Rc::clone(&started);
    let next = Scene::new("next").with_start(move |_, _| flag.set(true));

    let mut scene = Scene::new("start");
    scene.register_update_system(SwitchOnce(Some(next)));
    engine.change_scene(scene);

    engine.update(&mut Idle, 0.01).unwrap();
    assert!(started.get());
    assert_eq!(engine.current_scene().map(Scene::name), Some("next"));
}

#[test]
fn test_last_entity_helpers_address_newest_entity() {
    let mut scene = Scene::new("helpers");
    let first = scene.new_entity(Vec2::zeros(), Vec2::zeros(), 0.0).id();
    let entity = scene.new_entity(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), 5.0);
    entity.position.x = 9.0;
    let second = entity.id();

    assert_eq!(scene.last_entity(), second);
    scene.write_component_to_last_entity(Counter(7));
    assert_eq!(scene.world().read::<Counter>(second), Some(&Counter(7)));
    assert_eq!(scene.world().read::<Counter>(first), None);
    assert_eq!(scene.world().entity(second).map(|e| e.position.x), Some(9.0));

    assert_eq!(scene.delete_component_from_last_entity::<Counter>(), Some(Counter(7)));
    assert_eq!(scene.delete_component_from_last_entity::<Counter>(), None);
}

#[test]
#[should_panic(expected = "has no last entity")]
fn test_last_entity_on_empty_scene_is_fatal() {
    let mut scene = Scene::new("empty");
    scene.write_component_to_last_entity(Counter(1));
}
