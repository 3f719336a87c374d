//! Game-agnostic simulation helpers
//!
//! Pure functions and small state machines shared by every game:
//! - No rendering or platform dependencies
//! - Seeded RNG only (callers pass theirs in)
//! - Total: nothing here returns an error

pub mod ai;
pub mod collision;
pub mod physics;
pub mod round;

pub use ai::{ChaseAi, direction_toward, random_direction, random_heading, track_axis};
pub use collision::{
    Aabb, circles_overlap, contact_normal, has_line_of_sight, line_of_sight_by, overlaps,
    reflect_velocity, within_range,
};
pub use physics::{
    Body, BoundaryEvent, BoundaryPolicy, Edge, Edges, Motion, clamp_speed, integrate,
    resolve_boundary,
};
pub use round::{GamePhase, Round};
