//! Sink that records draw calls instead of drawing them

use glam::Vec2;

use super::{Color, RenderSink, TextAlign};
use crate::sim::Aabb;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect { rect: Aabb, color: Color },
    StrokeRect { rect: Aabb, color: Color },
    FillArc { center: Vec2, radius: f32, start: f32, end: f32, color: Color },
    StrokeArc { center: Vec2, radius: f32, start: f32, end: f32, color: Color },
    StrokePath { points: Vec<Vec2>, closed: bool, color: Color },
    Text { text: String, pos: Vec2, align: TextAlign },
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
}

/// Records every call; used by the headless host and by tests
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    commands: Vec<DrawCommand>,
    depth: u32,
    frames: u64,
}

impl RecordingSink {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of `clear` calls seen, i.e. frames rendered
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Current save/restore nesting
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// All text drawn so far
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    pub fn reset(&mut self) {
        self.commands.clear();
        self.depth = 0;
    }
}

impl RenderSink for RecordingSink {
    fn clear(&mut self, color: Color) {
        // Each frame starts with a clear; keep only the latest frame's calls
        self.commands.clear();
        self.frames += 1;
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Aabb, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Aabb, color: Color, _line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect { rect, color });
    }

    fn fill_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color) {
        self.commands.push(DrawCommand::FillArc {
            center,
            radius,
            start,
            end,
            color,
        });
    }

    fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        color: Color,
        _line_width: f32,
    ) {
        self.commands.push(DrawCommand::StrokeArc {
            center,
            radius,
            start,
            end,
            color,
        });
    }

    fn stroke_path(&mut self, points: &[Vec2], closed: bool, color: Color, _line_width: f32) {
        self.commands.push(DrawCommand::StrokePath {
            points: points.to_vec(),
            closed,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, _size: f32, align: TextAlign, _color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            align,
        });
    }

    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn rotate(&mut self, angle: f32) {
        self.commands.push(DrawCommand::Rotate(angle));
    }
}
