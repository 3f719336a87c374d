//! Retro Arcade - a shared game loop and a cabinet of small 2D arcade games
//!
//! Core modules:
//! - `engine`: Lifecycle (start/stop/pause/resume/destroy) and frame driving
//! - `input`: Key mapping and touch translation into logical actions
//! - `sim`: Collision, physics, chase AI and the per-game phase machine
//! - `render`: The drawing-surface contract every game paints onto
//! - `games`: Concrete games built on the above
//! - `platform`: Browser and headless hosts

pub mod config;
pub mod engine;
pub mod error;
pub mod games;
pub mod input;
pub mod platform;
pub mod render;
pub mod sim;

pub use config::{EngineConfig, Theme};
pub use engine::{Frame, FrameHandle, Game, GameLoopEngine, Host, LifecycleState};
pub use error::{EngineError, Result};
pub use games::{GameKind, create_game};
pub use input::{Action, Direction, InputMapper, KeyMap, TouchIntent};
pub use sim::{Aabb, Body, GamePhase, Round, overlaps};

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Default surface size
    pub const DEFAULT_WIDTH: u32 = 400;
    pub const DEFAULT_HEIGHT: u32 = 300;

    /// Frame delta used for the very first frame (no previous timestamp)
    pub const FALLBACK_DT: f32 = 1.0 / 60.0;
    /// Longest frame delta fed to the simulation (tab switches, debugger stops)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Maximum logical ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// A touch closer than this (on both axes) to the reference entity is a trigger
    pub const TOUCH_TRIGGER_RADIUS: f32 = 30.0;
    /// Sampling step along a sight line
    pub const LINE_OF_SIGHT_STEP: f32 = 5.0;
}

/// Wrap a scalar into `[min, min + span)`
#[inline]
pub fn wrap_scalar(value: f32, min: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return min;
    }
    min + (value - min).rem_euclid(span)
}

/// Unit vector for a heading angle (radians, 0 = +x, screen coordinates)
#[inline]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Seed for games whose config does not pin one
pub fn entropy_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        rand::random()
    }
}
