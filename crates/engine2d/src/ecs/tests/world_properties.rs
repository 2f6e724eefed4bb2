//! Storage properties exercised through the public world API

use crate::ecs::{Component, World};
use crate::foundation::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Health(i32);
impl Component for Health {}

#[derive(Debug, Clone, PartialEq)]
struct Name(String);
impl Component for Name {}

#[test]
fn test_identities_are_distinct_and_increasing() {
    let mut world = World::new();
    let ids: Vec<_> = (0..100).map(|_| world.new_entity()).collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(world.entity_count(), 100);
}

#[test]
fn test_write_then_read_round_trips() {
    let mut world = World::new();
    let a = world.new_entity();
    let b = world.new_entity();

    assert_eq!(world.write(a, Health(10)), None);
    world.write(a, Name("crate".into()));

    assert_eq!(world.read::<Health>(a), Some(&Health(10)));
    assert_eq!(world.read::<Name>(a), Some(&Name("crate".into())));
    assert_eq!(world.read::<Health>(b), None);
    assert_eq!(world.storage_count(), 2);
}

#[test]
fn test_overwrite_returns_previous_value() {
    let mut world = World::new();
    let a = world.new_entity();
    world.write(a, Health(1));
    assert_eq!(world.write(a, Health(2)), Some(Health(1)));
    assert_eq!(world.read::<Health>(a), Some(&Health(2)));
}

#[test]
fn test_read_of_unknown_type_is_empty_not_error() {
    let world = World::new();
    let mut other = World::new();
    let id = other.new_entity();
    assert_eq!(world.read::<Health>(id), None);
    assert!(world.entities_with::<Health>().is_empty());
}

#[test]
fn test_delete_is_idempotent() {
    let mut world = World::new();
    let a = world.new_entity();
    world.write(a, Health(3));

    assert_eq!(world.delete::<Health>(a), Some(Health(3)));
    assert_eq!(world.delete::<Health>(a), None);
    assert_eq!(world.delete::<Name>(a), None);
    assert!(!world.has::<Health>(a));
}

#[test]
fn test_for_each_mutates_the_stored_entity() {
    let mut world = World::new();
    let a = world.spawn(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0), 0.0);
    let b = world.spawn(Vec2::zeros(), Vec2::new(2.0, 2.0), 0.0);
    world.write(a, Health(5));

    world.for_each::<Health>(|entity, health| {
        entity.position.x += 10.0;
        health.0 -= 1;
    });

    // Both iteration paths see the same record.
    let mut seen = Vec::new();
    world.for_each_entity(|entity| seen.push((entity.id(), entity.position.x)));
    assert_eq!(seen, vec![(a, 11.0), (b, 0.0)]);
    assert_eq!(world.read::<Health>(a), Some(&Health(4)));
}

#[test]
fn test_for_each_entity_edits_are_visible_to_component_iteration() {
    let mut world = World::new();
    let a = world.new_entity();
    world.write(a, Health(1));

    world.for_each_entity(|entity| entity.rotation = 45.0);

    let mut rotations = Vec::new();
    world.for_each_ref::<Health>(|entity, _| rotations.push(entity.rotation));
    assert_eq!(rotations, vec![45.0]);
}

#[test]
fn test_entities_with_lists_holders_only() {
    let mut world = World::new();
    let a = world.new_entity();
    let b = world.new_entity();
    let c = world.new_entity();
    world.write(a, Health(1));
    world.write(c, Health(1));

    let mut holders = world.entities_with::<Health>();
    holders.sort();
    assert_eq!(holders, vec![a, c]);
    assert!(!holders.contains(&b));
}
