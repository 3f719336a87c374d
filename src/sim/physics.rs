//! Per-tick motion and screen-boundary handling
//!
//! Velocities are in pixels per tick. Each tick: damp by friction, add
//! gravity, clamp to the maximum speed, then integrate position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::wrap_scalar;

/// A moving rectangle: position is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size / 2.0, size)
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.size / 2.0;
    }
}

/// How a body's velocity evolves each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Multiplicative damping applied before integration (1.0 = none)
    pub friction: f32,
    /// Added to vy every tick
    pub gravity: f32,
    /// Speed cap; the velocity vector is rescaled, not clipped per axis
    pub max_speed: Option<f32>,
}

impl Default for Motion {
    fn default() -> Self {
        Self::FREE
    }
}

impl Motion {
    /// No damping, no gravity, no cap
    pub const FREE: Motion = Motion {
        friction: 1.0,
        gravity: 0.0,
        max_speed: None,
    };

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = Some(max_speed);
        self
    }

    /// Velocity after one tick of damping, gravity and clamping
    pub fn apply(&self, vel: Vec2) -> Vec2 {
        let mut vel = vel * self.friction;
        vel.y += self.gravity;
        match self.max_speed {
            Some(max) => clamp_speed(vel, max),
            None => vel,
        }
    }
}

/// Rescale `vel` so its magnitude does not exceed `max`
#[inline]
pub fn clamp_speed(vel: Vec2, max: f32) -> Vec2 {
    let speed = vel.length();
    if speed > max && speed > 0.0 {
        vel * (max / speed)
    } else {
        vel
    }
}

/// Advance a body by one tick
pub fn integrate(body: &mut Body, motion: &Motion) {
    body.vel = motion.apply(body.vel);
    body.pos += body.vel;
}

/// A side of the play field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    #[inline]
    fn bit(self) -> u8 {
        match self {
            Edge::Left => 1,
            Edge::Right => 2,
            Edge::Top => 4,
            Edge::Bottom => 8,
        }
    }
}

/// Set of edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edges(u8);

impl Edges {
    pub const NONE: Edges = Edges(0);
    pub const ALL: Edges = Edges(15);
    pub const LEFT: Edges = Edges(1);
    pub const RIGHT: Edges = Edges(2);
    pub const TOP: Edges = Edges(4);
    pub const BOTTOM: Edges = Edges(8);

    pub const fn union(self, other: Edges) -> Edges {
        Edges(self.0 | other.0)
    }

    pub fn contains(&self, edge: Edge) -> bool {
        self.0 & edge.bit() != 0
    }
}

/// What happens when a body reaches the edge of the play field.
///
/// Chosen per entity: paddles clamp, space games wrap, balls bounce, and
/// anything that can fall off an open edge escapes (usually costing a life).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Held inside the bounds; velocity into the wall is zeroed
    Clamp,
    /// Leaves one side, reappears on the opposite side
    Wrap,
    /// Reflects off `walls`; the remaining edges are open and report `Escaped`
    Bounce { walls: Edges },
    /// Left alone; reports `Escaped` once fully outside
    Escape,
}

/// Result of applying a boundary policy this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryEvent {
    Clamped(Edge),
    Wrapped(Edge),
    Bounced(Edge),
    Escaped(Edge),
}

/// Apply `policy` to `body` against `bounds`. Returns the first edge event, if any.
pub fn resolve_boundary(
    body: &mut Body,
    bounds: &Aabb,
    policy: BoundaryPolicy,
) -> Option<BoundaryEvent> {
    match policy {
        BoundaryPolicy::Clamp => clamp_into(body, bounds),
        BoundaryPolicy::Wrap => wrap_around(body, bounds),
        BoundaryPolicy::Bounce { walls } => bounce_off(body, bounds, walls),
        BoundaryPolicy::Escape => escaped_edge(body, bounds).map(BoundaryEvent::Escaped),
    }
}

fn clamp_into(body: &mut Body, bounds: &Aabb) -> Option<BoundaryEvent> {
    let min = bounds.min();
    let max = bounds.max() - body.size;
    let mut event = None;

    if body.pos.x < min.x {
        body.pos.x = min.x;
        body.vel.x = body.vel.x.max(0.0);
        event = event.or(Some(BoundaryEvent::Clamped(Edge::Left)));
    } else if body.pos.x > max.x {
        body.pos.x = max.x;
        body.vel.x = body.vel.x.min(0.0);
        event = event.or(Some(BoundaryEvent::Clamped(Edge::Right)));
    }
    if body.pos.y < min.y {
        body.pos.y = min.y;
        body.vel.y = body.vel.y.max(0.0);
        event = event.or(Some(BoundaryEvent::Clamped(Edge::Top)));
    } else if body.pos.y > max.y {
        body.pos.y = max.y;
        body.vel.y = body.vel.y.min(0.0);
        event = event.or(Some(BoundaryEvent::Clamped(Edge::Bottom)));
    }
    event
}

fn wrap_around(body: &mut Body, bounds: &Aabb) -> Option<BoundaryEvent> {
    // Wrap on the center so a sprite disappears and reappears symmetrically
    let center = body.center();
    let mut event = None;

    if center.x < bounds.x {
        event = Some(BoundaryEvent::Wrapped(Edge::Left));
    } else if center.x >= bounds.x + bounds.width {
        event = Some(BoundaryEvent::Wrapped(Edge::Right));
    }
    if event.is_none() {
        if center.y < bounds.y {
            event = Some(BoundaryEvent::Wrapped(Edge::Top));
        } else if center.y >= bounds.y + bounds.height {
            event = Some(BoundaryEvent::Wrapped(Edge::Bottom));
        }
    }

    let wrapped = Vec2::new(
        wrap_scalar(center.x, bounds.x, bounds.width),
        wrap_scalar(center.y, bounds.y, bounds.height),
    );
    body.set_center(wrapped);
    event
}

fn bounce_off(body: &mut Body, bounds: &Aabb, walls: Edges) -> Option<BoundaryEvent> {
    let min = bounds.min();
    let max = bounds.max() - body.size;
    let mut event = None;

    if body.pos.x < min.x && walls.contains(Edge::Left) {
        body.pos.x = min.x;
        body.vel.x = body.vel.x.abs();
        event = Some(BoundaryEvent::Bounced(Edge::Left));
    } else if body.pos.x > max.x && walls.contains(Edge::Right) {
        body.pos.x = max.x;
        body.vel.x = -body.vel.x.abs();
        event = Some(BoundaryEvent::Bounced(Edge::Right));
    }
    if body.pos.y < min.y && walls.contains(Edge::Top) {
        body.pos.y = min.y;
        body.vel.y = body.vel.y.abs();
        event = event.or(Some(BoundaryEvent::Bounced(Edge::Top)));
    } else if body.pos.y > max.y && walls.contains(Edge::Bottom) {
        body.pos.y = max.y;
        body.vel.y = -body.vel.y.abs();
        event = event.or(Some(BoundaryEvent::Bounced(Edge::Bottom)));
    }

    // Open edges: report once the body is fully outside
    match escaped_edge(body, bounds) {
        Some(edge) if !walls.contains(edge) => Some(BoundaryEvent::Escaped(edge)),
        _ => event,
    }
}

/// Edge a body has completely passed, if any
pub fn escaped_edge(body: &Body, bounds: &Aabb) -> Option<Edge> {
    let b = body.aabb();
    if b.x + b.width < bounds.x {
        Some(Edge::Left)
    } else if b.x > bounds.x + bounds.width {
        Some(Edge::Right)
    } else if b.y + b.height < bounds.y {
        Some(Edge::Top)
    } else if b.y > bounds.y + bounds.height {
        Some(Edge::Bottom)
    } else {
        None
    }
}
