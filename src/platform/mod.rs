//! Hosts the engine can run on
//!
//! - `headless`: manual frame pumping into a recording sink (native, tests)
//! - `web`: canvas 2D + requestAnimationFrame + DOM listeners (wasm32 only)

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::HeadlessHost;
#[cfg(target_arch = "wasm32")]
pub use web::{Container, WebGame, WebHost};
