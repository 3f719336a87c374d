//! Drawing-surface contract
//!
//! Games paint through `RenderSink`, an immediate-mode 2D API. The browser host
//! backs it with a canvas 2D context; tests back it with `RecordingSink`.

pub mod hud;
pub mod recording;

pub use hud::draw_hud;
pub use recording::{DrawCommand, RecordingSink};

use glam::Vec2;

use crate::sim::Aabb;

/// RGBA, each channel 0-1
pub type Color = [f32; 4];

/// Colors shared by every theme
pub mod colors {
    use super::Color;

    pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const DIM: Color = [1.0, 1.0, 1.0, 0.25];
    pub const OVERLAY: Color = [0.0, 0.0, 0.0, 0.6];
}

/// Per-theme colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    /// Player-controlled entities, walls
    pub foreground: Color,
    /// Secondary entities (balls, bullets)
    pub accent: Color,
    /// Enemies and anything that costs a life
    pub hazard: Color,
    /// Collectibles (food, dots)
    pub pickup: Color,
    pub text: Color,
}

/// Horizontal text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Immediate-mode 2D drawing sink
pub trait RenderSink {
    /// Fill the whole surface
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Aabb, color: Color);
    fn stroke_rect(&mut self, rect: Aabb, color: Color, line_width: f32);
    /// Filled pie/arc from `start` to `end` radians
    fn fill_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color);
    fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        color: Color,
        line_width: f32,
    );
    /// Polyline through `points`, closed back to the first when `closed`
    fn stroke_path(&mut self, points: &[Vec2], closed: bool, color: Color, line_width: f32);
    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Color);

    // Transform stack for oriented sprites
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, angle: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.fill_arc(center, radius, 0.0, std::f32::consts::TAU, color);
    }
}

/// CSS color string for a canvas fill/stroke style
pub fn css_color(color: Color) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({},{},{},{})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}
