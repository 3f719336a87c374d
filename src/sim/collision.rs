//! Collision detection for rectangles and circles
//!
//! Everything here is stateless and total: a check that misses simply means
//! "no interaction this frame" and is re-evaluated on the next tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::LINE_OF_SIGHT_STEP;

/// Axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::from_pos_size(center - size / 2.0, size)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min() + self.size() / 2.0
    }

    /// Inside or on the border
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Shrink (positive) or grow (negative) on every side
    pub fn inset(&self, amount: f32) -> Aabb {
        Aabb::new(
            self.x + amount,
            self.y + amount,
            (self.width - 2.0 * amount).max(0.0),
            (self.height - 2.0 * amount).max(0.0),
        )
    }
}

/// AABB overlap with strict inequalities on all four sides.
///
/// Boxes that only share an edge are not colliding.
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Circle-circle test on center distance (strict)
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    within_range(a, b, radius_a + radius_b)
}

/// Whether two points are closer than `range` (strict)
#[inline]
pub fn within_range(a: Vec2, b: Vec2, range: f32) -> bool {
    a.distance(b) < range
}

/// Surface normal of `b` facing `a`, along the axis of least penetration.
///
/// Used to decide whether a ball that overlaps a brick bounces horizontally
/// or vertically. Returns zero when the boxes do not overlap.
pub fn contact_normal(a: &Aabb, b: &Aabb) -> Vec2 {
    if !overlaps(a, b) {
        return Vec2::ZERO;
    }
    let push_left = a.x + a.width - b.x;
    let push_right = b.x + b.width - a.x;
    let push_up = a.y + a.height - b.y;
    let push_down = b.y + b.height - a.y;

    let min_x = push_left.min(push_right);
    let min_y = push_up.min(push_down);
    if min_x < min_y {
        if push_left < push_right {
            Vec2::new(-1.0, 0.0)
        } else {
            Vec2::new(1.0, 0.0)
        }
    } else if push_up < push_down {
        Vec2::new(0.0, -1.0)
    } else {
        Vec2::new(0.0, 1.0)
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Sight line from `from` to `to` is clear of every wall.
///
/// The segment is sampled every `LINE_OF_SIGHT_STEP` units (starting at
/// `from`); the line is blocked if any sample lies inside a wall or on its
/// border.
pub fn has_line_of_sight(from: Vec2, to: Vec2, walls: &[Aabb]) -> bool {
    line_of_sight_by(from, to, |p| walls.iter().any(|w| w.contains_point(p)))
}

/// `has_line_of_sight` over an arbitrary blocking predicate (e.g. a tile grid)
pub fn line_of_sight_by(from: Vec2, to: Vec2, blocked: impl Fn(Vec2) -> bool) -> bool {
    let delta = to - from;
    let distance = delta.length();
    if distance <= f32::EPSILON {
        return true;
    }
    let dir = delta / distance;
    let samples = (distance / LINE_OF_SIGHT_STEP).floor() as u32;
    (0..=samples).all(|i| !blocked(from + dir * (i as f32 * LINE_OF_SIGHT_STEP)))
}
