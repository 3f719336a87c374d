//! Pong against a reaction-limited AI paddle
//!
//! Player on the left (UP/DOWN or W/S), AI on the right. A ball past the AI
//! scores a point; a ball past the player costs a life. First to
//! `WIN_POINTS` wins.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::EngineConfig;
use crate::engine::{Frame, Game};
use crate::input::Action;
use crate::render::{Palette, RenderSink, TextAlign, draw_hud};
use crate::sim::{
    Aabb, Body, BoundaryEvent, BoundaryPolicy, ChaseAi, Edge, Edges, GamePhase, Motion, Round,
    clamp_speed, integrate, overlaps, resolve_boundary, track_axis,
};

const PADDLE_SIZE: Vec2 = Vec2::new(8.0, 50.0);
const PADDLE_INSET: f32 = 12.0;
const PLAYER_SPEED: f32 = 5.0;
const AI_SPEED: f32 = 3.5;
/// Ticks between AI re-targets
const AI_REACTION_TICKS: u32 = 4;

const BALL_SIZE: Vec2 = Vec2::new(6.0, 6.0);
const BALL_SPEED: f32 = 4.0;
const BALL_MAX_SPEED: f32 = 8.0;
const BALL_SPEEDUP: f32 = 1.05;
const SERVE_DELAY_TICKS: u32 = 45;

const START_LIVES: u32 = 3;
const WIN_POINTS: u32 = 5;

pub struct Pong {
    size: Vec2,
    palette: Palette,
    seed: u64,
    rng: Pcg32,
    round: Round,
    player: Body,
    opponent: Body,
    ball: Body,
    ai: ChaseAi,
    ai_target: f32,
    serve_timer: u32,
}

impl Pong {
    pub fn new(config: &EngineConfig) -> Self {
        let seed = config.seed_or_entropy();
        let mut game = Self {
            size: config.size(),
            palette: config.theme.palette(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            round: Round::new(START_LIVES, 1),
            player: Body::new(Vec2::ZERO, PADDLE_SIZE),
            opponent: Body::new(Vec2::ZERO, PADDLE_SIZE),
            ball: Body::new(Vec2::ZERO, BALL_SIZE),
            ai: ChaseAi::new(AI_REACTION_TICKS),
            ai_target: 0.0,
            serve_timer: 0,
        };
        game.reset_positions();
        game
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(Vec2::ZERO, self.size)
    }

    fn reset_positions(&mut self) {
        let mid = self.size.y / 2.0;
        self.player = Body::centered(Vec2::new(PADDLE_INSET + PADDLE_SIZE.x / 2.0, mid), PADDLE_SIZE);
        self.opponent = Body::centered(
            Vec2::new(self.size.x - PADDLE_INSET - PADDLE_SIZE.x / 2.0, mid),
            PADDLE_SIZE,
        );
        self.ai.forget();
        self.ai_target = mid;
        self.center_ball();
    }

    fn center_ball(&mut self) {
        self.ball = Body::centered(self.size / 2.0, BALL_SIZE);
        self.serve_timer = SERVE_DELAY_TICKS;
    }

    fn serve(&mut self) {
        let angle = self.rng.random_range(-0.5f32..0.5);
        let toward_player = self.rng.random_bool(0.5);
        let mut vel = crate::heading_vector(angle) * BALL_SPEED;
        if toward_player {
            vel.x = -vel.x;
        }
        self.ball.vel = vel;
    }

    fn move_player(&mut self, frame: &Frame) {
        let mut axis = frame.input.axis(Action::Up, Action::Down);
        if axis == 0.0 {
            // WASD alias
            if frame.input.is_key_held("w") {
                axis -= 1.0;
            }
            if frame.input.is_key_held("s") {
                axis += 1.0;
            }
        }
        self.player.vel.y = axis * PLAYER_SPEED;
        integrate(&mut self.player, &Motion::FREE);
        let bounds = self.bounds();
        resolve_boundary(&mut self.player, &bounds, BoundaryPolicy::Clamp);
    }

    fn move_opponent(&mut self) {
        if self.ai.ready() {
            // Chase the ball while it approaches, drift back to center otherwise
            self.ai_target = if self.ball.vel.x > 0.0 {
                self.ball.center().y
            } else {
                self.size.y / 2.0
            };
        }
        let center = self.opponent.center();
        let y = track_axis(center.y, self.ai_target, AI_SPEED);
        self.opponent.set_center(Vec2::new(center.x, y));
        let bounds = self.bounds();
        resolve_boundary(&mut self.opponent, &bounds, BoundaryPolicy::Clamp);
    }

    fn move_ball(&mut self) {
        if self.serve_timer > 0 {
            self.serve_timer -= 1;
            if self.serve_timer == 0 {
                self.serve();
            }
            return;
        }

        integrate(&mut self.ball, &Motion::FREE);
        let walls = Edges::TOP.union(Edges::BOTTOM);
        let bounds = self.bounds();
        match resolve_boundary(&mut self.ball, &bounds, BoundaryPolicy::Bounce { walls }) {
            Some(BoundaryEvent::Escaped(Edge::Right)) => {
                self.round.add_score(1);
                if self.round.score() >= WIN_POINTS {
                    self.round.win();
                } else {
                    self.center_ball();
                }
            }
            Some(BoundaryEvent::Escaped(Edge::Left)) => {
                if !self.round.lose_life() {
                    self.center_ball();
                }
            }
            _ => self.return_ball(),
        }
    }

    /// Bounce off whichever paddle the ball is moving into
    fn return_ball(&mut self) {
        let ball = self.ball.aabb();
        let (paddle, direction) = if self.ball.vel.x < 0.0 {
            (self.player, 1.0)
        } else {
            (self.opponent, -1.0)
        };
        if !overlaps(&ball, &paddle.aabb()) {
            return;
        }
        let speed = (self.ball.vel.length() * BALL_SPEEDUP).min(BALL_MAX_SPEED);
        let offset = ((self.ball.center().y - paddle.center().y) / (PADDLE_SIZE.y / 2.0)).clamp(-1.0, 1.0);
        let vel = Vec2::new(direction * speed, offset * speed * 0.75);
        self.ball.vel = clamp_speed(vel, speed);
        self.ball.pos.x = if direction > 0.0 {
            paddle.pos.x + paddle.size.x
        } else {
            paddle.pos.x - BALL_SIZE.x
        };
    }
}

impl Game for Pong {
    fn name(&self) -> &'static str {
        "pong"
    }

    fn update(&mut self, frame: &Frame) {
        self.move_player(frame);
        self.move_opponent();
        self.move_ball();
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        sink.clear(self.palette.background);
        // Center net
        let mut y = 0.0;
        while y < self.size.y {
            sink.fill_rect(Aabb::new(self.size.x / 2.0 - 1.0, y, 2.0, 8.0), self.palette.foreground);
            y += 16.0;
        }
        sink.fill_rect(self.player.aabb(), self.palette.foreground);
        sink.fill_rect(self.opponent.aabb(), self.palette.hazard);
        sink.fill_rect(self.ball.aabb(), self.palette.accent);
        sink.fill_text(
            &format!("FIRST TO {WIN_POINTS}"),
            Vec2::new(self.size.x / 2.0, self.size.y - 8.0),
            10.0,
            TextAlign::Center,
            self.palette.text,
        );
        draw_hud(sink, &self.palette, self.size, &self.round);
    }

    fn touch_anchor(&self) -> Vec2 {
        self.player.center()
    }

    fn phase(&self) -> GamePhase {
        self.round.phase()
    }

    fn restart(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.round.restart();
        self.reset_positions();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputMapper;

    fn game() -> Pong {
        Pong::new(&EngineConfig {
            seed: Some(3),
            ..EngineConfig::default()
        })
    }

    fn tick(game: &mut Pong, input: &InputMapper) {
        game.update(&Frame {
            input,
            dt: 1.0 / 60.0,
            tick: 0,
        });
    }

    #[test]
    fn test_serve_after_delay() {
        let mut game = game();
        let input = InputMapper::default();
        for _ in 0..SERVE_DELAY_TICKS - 1 {
            tick(&mut game, &input);
        }
        assert_eq!(game.ball.vel, Vec2::ZERO);
        tick(&mut game, &input);
        assert!((game.ball.vel.length() - BALL_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_wasd_alias_moves_player() {
        let mut game = game();
        let mut input = InputMapper::default();
        let start = game.player.pos.y;
        input.key_down("W");
        tick(&mut game, &input);
        assert_eq!(game.player.pos.y, start - PLAYER_SPEED);
    }

    #[test]
    fn test_player_clamped() {
        let mut game = game();
        let mut input = InputMapper::default();
        input.key_down("ArrowDown");
        for _ in 0..100 {
            tick(&mut game, &input);
        }
        assert_eq!(game.player.aabb().max().y, 300.0);
    }

    #[test]
    fn test_point_past_opponent_scores() {
        let mut game = game();
        game.serve_timer = 0;
        game.ball.pos = Vec2::new(405.0, 20.0);
        game.ball.vel = Vec2::new(4.0, 0.0);
        tick(&mut game, &InputMapper::default());
        assert_eq!(game.round.score(), 1);
        assert_eq!(game.serve_timer, SERVE_DELAY_TICKS);
    }

    #[test]
    fn test_point_past_player_costs_life() {
        let mut game = game();
        game.serve_timer = 0;
        game.ball.pos = Vec2::new(-10.0, 20.0);
        game.ball.vel = Vec2::new(-4.0, 0.0);
        tick(&mut game, &InputMapper::default());
        assert_eq!(game.round.lives(), START_LIVES - 1);
    }

    #[test]
    fn test_reaching_point_target_wins() {
        let mut game = game();
        for _ in 0..WIN_POINTS {
            game.serve_timer = 0;
            game.ball.pos = Vec2::new(405.0, 20.0);
            game.ball.vel = Vec2::new(4.0, 0.0);
            tick(&mut game, &InputMapper::default());
        }
        assert_eq!(game.phase(), GamePhase::Won);
    }

    #[test]
    fn test_player_paddle_returns_ball() {
        let mut game = game();
        game.serve_timer = 0;
        let paddle = game.player.aabb();
        game.ball.pos = Vec2::new(paddle.max().x + 1.0, paddle.center().y);
        game.ball.vel = Vec2::new(-4.0, 0.0);
        tick(&mut game, &InputMapper::default());
        assert!(game.ball.vel.x > 0.0);
        assert!(game.ball.vel.length() > BALL_SPEED);
    }

    #[test]
    fn test_ai_follows_approaching_ball() {
        let mut game = game();
        game.serve_timer = 0;
        game.ball.pos = Vec2::new(200.0, 40.0);
        game.ball.vel = Vec2::new(0.5, 0.0);
        let start = game.opponent.center().y;
        for _ in 0..10 {
            tick(&mut game, &InputMapper::default());
        }
        assert!(game.opponent.center().y < start);
    }

    #[test]
    fn test_restart_restores_start_configuration() {
        let fresh = game();
        let mut game = game();
        game.player.pos.y = 0.0;
        for _ in 0..START_LIVES {
            game.round.lose_life();
        }
        assert_eq!(game.phase(), GamePhase::GameOver);
        game.restart();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.player, fresh.player);
        assert_eq!(game.opponent, fresh.opponent);
        assert_eq!(game.ball, fresh.ball);
        assert_eq!(game.round, fresh.round);
    }
}
