//! Axis-aligned rigid-body world
//!
//! A small [`PhysicsWorld`] used by the demo and the tests. Bodies are
//! integrated with semi-implicit Euler, penetration against other solid
//! bodies is pushed out along the shallowest axis, and contacts are tracked
//! between steps so begin and end are each reported once per touch.
//! Collision bounds ignore rotation.

use std::collections::BTreeSet;

use slotmap::SlotMap;

use super::{BodyDef, BodyHandle, BodyType, ColliderShape, ContactListener, PhysicsWorld};
use crate::foundation::math::Vec2;

/// Overlap tolerance under which resting bodies still count as touching
const CONTACT_SLOP: f32 = 0.005;

#[derive(Debug, Clone)]
struct Body {
    body_type: BodyType,
    half_extents: Vec2,
    position: Vec2,
    angle: f32,
    velocity: Vec2,
    angular_velocity: f32,
    force: Vec2,
    inverse_mass: f32,
    gravity_scale: f32,
    is_sensor: bool,
}

impl Body {
    fn from_def(def: &BodyDef) -> Self {
        let half_extents = match def.shape {
            ColliderShape::Rect => def.size * 0.5,
            ColliderShape::Circle => Vec2::new(def.size.x, def.size.x),
        };
        let area = match def.shape {
            ColliderShape::Rect => def.size.x * def.size.y,
            ColliderShape::Circle => std::f32::consts::PI * def.size.x * def.size.x,
        };
        let mass = def.density * area;
        let inverse_mass = if def.body_type == BodyType::Dynamic && mass > 0.0 { 1.0 / mass } else { 0.0 };
        Self {
            body_type: def.body_type,
            half_extents,
            position: def.position,
            angle: def.angle,
            velocity: Vec2::zeros(),
            angular_velocity: 0.0,
            force: Vec2::zeros(),
            inverse_mass,
            gravity_scale: def.gravity_scale,
            is_sensor: def.is_sensor,
        }
    }

    fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    fn lower(&self) -> Vec2 {
        self.position - self.half_extents
    }

    fn upper(&self) -> Vec2 {
        self.position + self.half_extents
    }

    /// Penetration depth per axis; negative components mean a gap
    fn overlap(&self, other: &Body) -> Vec2 {
        let delta = other.position - self.position;
        let reach = self.half_extents + other.half_extents;
        Vec2::new(reach.x - delta.x.abs(), reach.y - delta.y.abs())
    }
}

/// Simple world with axis-aligned collision
#[derive(Debug)]
pub struct KinematicWorld {
    bodies: SlotMap<BodyHandle, Body>,
    gravity: Vec2,
    touching: BTreeSet<(BodyHandle, BodyHandle)>,
}

impl KinematicWorld {
    /// Create an empty world
    pub fn new(gravity: Vec2) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            gravity,
            touching: BTreeSet::new(),
        }
    }

    /// Change world gravity
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// Whether `a` and `b` were touching after the last step
    pub fn is_touching(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.touching.contains(&ordered(a, b))
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.gravity;
        for body in self.bodies.values_mut().filter(|b| b.is_dynamic()) {
            let acceleration = gravity * body.gravity_scale + body.force * body.inverse_mass;
            body.velocity += acceleration * dt;
            body.position += body.velocity * dt;
            body.angle += body.angular_velocity * dt;
            body.force = Vec2::zeros();
        }
    }

    fn separate(&mut self, handles: &[BodyHandle]) {
        for (i, &a) in handles.iter().enumerate() {
            for &b in &handles[i + 1..] {
                let (Some(body_a), Some(body_b)) = (self.bodies.get(a), self.bodies.get(b)) else {
                    continue;
                };
                if body_a.is_sensor || body_b.is_sensor || !(body_a.is_dynamic() || body_b.is_dynamic()) {
                    continue;
                }
                let overlap = body_a.overlap(body_b);
                if overlap.x <= 0.0 || overlap.y <= 0.0 {
                    continue;
                }

                // Push out along the shallowest axis, toward each body's own side.
                let delta = body_b.position - body_a.position;
                let (axis, depth) = if overlap.x < overlap.y {
                    (Vec2::new(delta.x.signum(), 0.0), overlap.x)
                } else {
                    (Vec2::new(0.0, delta.y.signum()), overlap.y)
                };
                let axis = if axis == Vec2::zeros() { Vec2::new(0.0, 1.0) } else { axis };
                let share_a = match (body_a.is_dynamic(), body_b.is_dynamic()) {
                    (true, true) => 0.5,
                    (true, false) => 1.0,
                    _ => 0.0,
                };

                if let Some(body) = self.bodies.get_mut(a) {
                    push_out(body, -axis, depth * share_a);
                }
                if let Some(body) = self.bodies.get_mut(b) {
                    push_out(body, axis, depth * (1.0 - share_a));
                }
            }
        }
    }

    fn detect_contacts(&self, handles: &[BodyHandle]) -> Vec<((BodyHandle, BodyHandle), Vec2)> {
        let mut found = Vec::new();
        for (i, &a) in handles.iter().enumerate() {
            for &b in &handles[i + 1..] {
                let (Some(body_a), Some(body_b)) = (self.bodies.get(a), self.bodies.get(b)) else {
                    continue;
                };
                if !(body_a.is_dynamic() || body_b.is_dynamic()) {
                    continue;
                }
                let overlap = body_a.overlap(body_b);
                if overlap.x < -CONTACT_SLOP || overlap.y < -CONTACT_SLOP {
                    continue;
                }
                let lower = body_a.lower().sup(&body_b.lower());
                let upper = body_a.upper().inf(&body_b.upper());
                found.push((ordered(a, b), (lower + upper) * 0.5));
            }
        }
        found
    }
}

impl Default for KinematicWorld {
    fn default() -> Self {
        Self::new(Vec2::zeros())
    }
}

fn ordered(a: BodyHandle, b: BodyHandle) -> (BodyHandle, BodyHandle) {
    if a <= b { (a, b) } else { (b, a) }
}

fn push_out(body: &mut Body, direction: Vec2, distance: f32) {
    if distance <= 0.0 {
        return;
    }
    body.position += direction * distance;
    // Kill the velocity component that drives back into the other body.
    let into = body.velocity.dot(&direction);
    if into < 0.0 {
        body.velocity -= direction * into;
    }
}

impl PhysicsWorld for KinematicWorld {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let handle = self.bodies.insert(Body::from_def(def));
        log::trace!("Created {:?} body {:?}", def.body_type, handle);
        handle
    }

    fn destroy_body(&mut self, body: BodyHandle) -> bool {
        if self.bodies.remove(body).is_none() {
            return false;
        }
        self.touching.retain(|&(a, b)| a != body && b != body);
        true
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn gravity(&self) -> Vec2 {
        self.gravity
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(body).map(|b| b.position)
    }

    fn angle(&self, body: BodyHandle) -> Option<f32> {
        self.bodies.get(body).map(|b| b.angle)
    }

    fn set_transform(&mut self, body: BodyHandle, position: Vec2, angle: f32) {
        if let Some(b) = self.bodies.get_mut(body) {
            b.position = position;
            b.angle = angle;
        }
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(body).map(|b| b.velocity)
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(body).filter(|b| b.is_dynamic()) {
            b.velocity = velocity;
        }
    }

    fn angular_velocity(&self, body: BodyHandle) -> Option<f32> {
        self.bodies.get(body).map(|b| b.angular_velocity)
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: f32) {
        if let Some(b) = self.bodies.get_mut(body).filter(|b| b.is_dynamic()) {
            b.angular_velocity = velocity;
        }
    }

    fn applied_force(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(body).map(|b| b.force)
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec2) {
        if let Some(b) = self.bodies.get_mut(body).filter(|b| b.is_dynamic()) {
            b.force += force;
        }
    }

    fn apply_angular_impulse(&mut self, body: BodyHandle, impulse: f32) {
        if let Some(b) = self.bodies.get_mut(body).filter(|b| b.is_dynamic()) {
            // Rotational inertia is not modelled; the impulse lands as velocity.
            b.angular_velocity += impulse;
        }
    }

    fn query_aabb(&self, lower: Vec2, upper: Vec2, visit: &mut dyn FnMut(BodyHandle) -> bool) {
        for (handle, body) in &self.bodies {
            let (body_lower, body_upper) = (body.lower(), body.upper());
            let overlaps = body_lower.x <= upper.x
                && body_upper.x >= lower.x
                && body_lower.y <= upper.y
                && body_upper.y >= lower.y;
            if overlaps && !visit(handle) {
                return;
            }
        }
    }

    fn step(&mut self, dt: f32, _velocity_iterations: u32, position_iterations: u32, listener: &mut dyn ContactListener) {
        if dt <= 0.0 {
            return;
        }
        self.integrate(dt);

        let handles: Vec<BodyHandle> = self.bodies.keys().collect();
        for _ in 0..position_iterations.max(1) {
            self.separate(&handles);
        }

        let contacts = self.detect_contacts(&handles);
        let current: BTreeSet<(BodyHandle, BodyHandle)> = contacts.iter().map(|(pair, _)| *pair).collect();

        for &(a, b) in self.touching.difference(&current) {
            listener.end_contact(a, b);
        }
        for ((a, b), point) in contacts {
            if !self.touching.contains(&(a, b)) {
                listener.begin_contact(a, b, point);
            }
        }
        self.touching = current;
    }
}
