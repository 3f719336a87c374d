//! Score/lives overlay and round banners

use glam::Vec2;

use super::{Palette, RenderSink, TextAlign, colors};
use crate::consts::TOUCH_TRIGGER_RADIUS;
use crate::sim::{Aabb, GamePhase, Round};

const HUD_TEXT_SIZE: f32 = 14.0;
const BANNER_TEXT_SIZE: f32 = 24.0;

/// Draw score, lives and (outside `Playing`) the round banner
pub fn draw_hud(sink: &mut dyn RenderSink, palette: &Palette, size: Vec2, round: &Round) {
    sink.fill_text(
        &format!("SCORE {}", round.score()),
        Vec2::new(8.0, 18.0),
        HUD_TEXT_SIZE,
        TextAlign::Left,
        palette.text,
    );
    sink.fill_text(
        &format!("LIVES {}", round.lives()),
        Vec2::new(size.x - 8.0, 18.0),
        HUD_TEXT_SIZE,
        TextAlign::Right,
        palette.text,
    );

    let banner = match round.phase() {
        GamePhase::Playing => return,
        GamePhase::GameOver => "GAME OVER".to_string(),
        GamePhase::Won => "YOU WIN".to_string(),
        GamePhase::LevelComplete => format!("LEVEL {} COMPLETE", round.level()),
    };

    sink.fill_rect(Aabb::new(0.0, 0.0, size.x, size.y), colors::OVERLAY);
    let center = size / 2.0;
    sink.fill_text(&banner, center, BANNER_TEXT_SIZE, TextAlign::Center, palette.text);
    sink.fill_text(
        "press START or tap",
        center + Vec2::new(0.0, 28.0),
        HUD_TEXT_SIZE,
        TextAlign::Center,
        palette.text,
    );
}

/// Faint ring and arrows around the touch reference point (mobile only)
pub fn draw_touch_hints(sink: &mut dyn RenderSink, anchor: Vec2) {
    sink.stroke_arc(
        anchor,
        TOUCH_TRIGGER_RADIUS,
        0.0,
        std::f32::consts::TAU,
        colors::DIM,
        1.0,
    );
    let reach = TOUCH_TRIGGER_RADIUS * 1.6;
    for dir in crate::input::Direction::ALL {
        let v = dir.to_vec2();
        let tip = anchor + v * reach;
        let side = Vec2::new(-v.y, v.x) * 5.0;
        let base = tip - v * 7.0;
        sink.stroke_path(&[base + side, tip, base - side], false, colors::DIM, 1.0);
    }
}
