//! Per-body collision events

use std::collections::HashMap;

use super::{BodyHandle, ContactListener};
use crate::ecs::EntityId;
use crate::events::Event;
use crate::foundation::math::Vec2;

/// Collision payload, seen from the receiving body's side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// The body whose event fired
    pub body: BodyHandle,
    /// The body it touched
    pub other: BodyHandle,
    /// World-space contact point; zero for end events
    pub point: Vec2,
    /// Entity owning `body`
    pub entity: EntityId,
    /// Entity owning `other`, when it is registered
    pub other_entity: Option<EntityId>,
}

/// Start and end events of one body
#[derive(Debug, Default)]
pub struct BodyEvents {
    /// Raised when the body starts touching another
    pub on_collision_start: Event<Collision>,
    /// Raised when the body stops touching another
    pub on_collision_end: Event<Collision>,
}

struct Registration {
    entity: EntityId,
    events: BodyEvents,
}

/// Routes contacts from a [`super::PhysicsWorld`] step to the events of both bodies
///
/// Contacts involving unregistered bodies are dropped for that side only.
#[derive(Default)]
pub struct ContactEvents {
    bodies: HashMap<BodyHandle, Registration>,
}

impl ContactEvents {
    /// Create an empty router
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `body` to `entity`, returning its events
    ///
    /// Registering a body again keeps its listeners and updates the owner.
    pub fn register(&mut self, body: BodyHandle, entity: EntityId) -> &mut BodyEvents {
        let registration = self.bodies.entry(body).or_insert_with(|| Registration {
            entity,
            events: BodyEvents::default(),
        });
        registration.entity = entity;
        &mut registration.events
    }

    /// Events of `body`, if registered
    pub fn events_mut(&mut self, body: BodyHandle) -> Option<&mut BodyEvents> {
        self.bodies.get_mut(&body).map(|r| &mut r.events)
    }

    /// Forget `body` and all of its listeners
    pub fn unregister(&mut self, body: BodyHandle) -> bool {
        self.bodies.remove(&body).is_some()
    }

    /// Entity owning `body`
    pub fn owner(&self, body: BodyHandle) -> Option<EntityId> {
        self.bodies.get(&body).map(|r| r.entity)
    }

    /// Number of registered bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether no bodies are registered
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Drop every registration
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    fn dispatch(&mut self, body: BodyHandle, other: BodyHandle, point: Vec2, started: bool) {
        let other_entity = self.owner(other);
        let Some(registration) = self.bodies.get_mut(&body) else {
            return;
        };
        let collision = Collision {
            body,
            other,
            point,
            entity: registration.entity,
            other_entity,
        };
        if started {
            registration.events.on_collision_start.invoke(&collision);
        } else {
            registration.events.on_collision_end.invoke(&collision);
        }
    }
}

impl ContactListener for ContactEvents {
    fn begin_contact(&mut self, body_a: BodyHandle, body_b: BodyHandle, point: Vec2) {
        self.dispatch(body_a, body_b, point, true);
        self.dispatch(body_b, body_a, point, true);
    }

    fn end_contact(&mut self, body_a: BodyHandle, body_b: BodyHandle) {
        self.dispatch(body_a, body_b, Vec2::zeros(), false);
        self.dispatch(body_b, body_a, Vec2::zeros(), false);
    }
}

impl std::fmt::Debug for ContactEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactEvents").field("bodies", &self.bodies.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use slotmap::SlotMap;

    use super::*;
    use crate::ecs::World;

    fn handles() -> (BodyHandle, BodyHandle, BodyHandle) {
        let mut map: SlotMap<BodyHandle, ()> = SlotMap::with_key();
        (map.insert(()), map.insert(()), map.insert(()))
    }

    #[test]
    fn test_begin_contact_notifies_both_sides() {
        let (a, b, _) = handles();
        let mut world = World::new();
        let ea = world.new_entity();
        let eb = world.new_entity();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut contacts = ContactEvents::new();
        let log_a = Rc::clone(&seen);
        contacts.register(a, ea).on_collision_start.subscribe(move |c| log_a.borrow_mut().push(*c));
        let log_b = Rc::clone(&seen);
        contacts.register(b, eb).on_collision_start.subscribe(move |c| log_b.borrow_mut().push(*c));

        contacts.begin_contact(a, b, Vec2::new(1.0, 2.0));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!((seen[0].body, seen[0].other), (a, b));
        assert_eq!((seen[0].entity, seen[0].other_entity), (ea, Some(eb)));
        assert_eq!((seen[1].body, seen[1].other), (b, a));
        assert_eq!(seen[1].point, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_end_contact_uses_zero_point() {
        let (a, b, _) = handles();
        let mut world = World::new();
        let ea = world.new_entity();

        let ended = Rc::new(RefCell::new(Vec::new()));
        let mut contacts = ContactEvents::new();
        let sink = Rc::clone(&ended);
        contacts.register(a, ea).on_collision_end.subscribe(move |c| sink.borrow_mut().push(*c));

        contacts.end_contact(b, a);

        let ended = ended.borrow();
        assert_eq!(ended.len(), 1);
        assert_eq!(ended[0].body, a);
        assert_eq!(ended[0].other_entity, None);
        assert_eq!(ended[0].point, Vec2::zeros());
    }

    #[test]
    fn test_unregistered_bodies_are_ignored() {
        let (a, b, c) = handles();
        let mut contacts = ContactEvents::new();
        contacts.begin_contact(a, b, Vec2::zeros());
        contacts.end_contact(b, c);
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_register_twice_keeps_listeners() {
        let (a, _, _) = handles();
        let mut world = World::new();
        let first = world.new_entity();
        let second = world.new_entity();

        let mut contacts = ContactEvents::new();
        contacts.register(a, first).on_collision_start.subscribe(|_| {});
        let events = contacts.register(a, second);
        assert_eq!(events.on_collision_start.len(), 1);
        assert_eq!(contacts.owner(a), Some(second));
        assert!(contacts.unregister(a));
        assert!(!contacts.unregister(a));
    }
}
