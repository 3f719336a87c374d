//! Breakout: clear the wall of bricks with a ball and paddle
//!
//! The ball rests on the paddle until served (FIRE or a tap on the paddle).
//! Losing it off the bottom edge costs a life. Each cleared wall is a level;
//! clearing the last one wins.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::EngineConfig;
use crate::engine::{Frame, Game};
use crate::input::Action;
use crate::render::{Color, Palette, RenderSink, draw_hud};
use crate::sim::{
    Aabb, Body, BoundaryEvent, BoundaryPolicy, Edge, Edges, GamePhase, Motion, Round,
    contact_normal, integrate, overlaps, reflect_velocity, resolve_boundary,
};

// Paddle
const PADDLE_SIZE: Vec2 = Vec2::new(60.0, 8.0);
const PADDLE_SPEED: f32 = 6.0;
const PADDLE_BOTTOM_MARGIN: f32 = 24.0;

// Ball
const BALL_SIZE: Vec2 = Vec2::new(6.0, 6.0);
const BALL_SPEED: f32 = 4.0;
const BALL_SPEED_PER_LEVEL: f32 = 0.5;
/// Widest deflection off the paddle edge, from vertical
const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

// Bricks
const BRICK_ROWS: usize = 5;
const BRICK_COLS: usize = 8;
const BRICK_HEIGHT: f32 = 12.0;
const BRICK_GAP: f32 = 4.0;
const BRICK_TOP: f32 = 36.0;
const BRICK_SIDE_MARGIN: f32 = 10.0;

const START_LIVES: u32 = 3;
const LEVELS: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
struct Brick {
    rect: Aabb,
    row: usize,
    alive: bool,
}

impl Brick {
    /// Top rows are worth more
    fn points(&self) -> u32 {
        10 * (BRICK_ROWS - self.row) as u32
    }
}

pub struct Breakout {
    size: Vec2,
    palette: Palette,
    seed: u64,
    rng: Pcg32,
    round: Round,
    paddle: Body,
    ball: Body,
    served: bool,
    bricks: Vec<Brick>,
}

impl Breakout {
    pub fn new(config: &EngineConfig) -> Self {
        let seed = config.seed_or_entropy();
        let size = config.size();
        let mut game = Self {
            size,
            palette: config.theme.palette(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            round: Round::new(START_LIVES, LEVELS),
            paddle: Body::new(Vec2::ZERO, PADDLE_SIZE),
            ball: Body::new(Vec2::ZERO, BALL_SIZE),
            served: false,
            bricks: Vec::new(),
        };
        game.reset_level();
        game
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(Vec2::ZERO, self.size)
    }

    fn ball_speed(&self) -> f32 {
        BALL_SPEED + BALL_SPEED_PER_LEVEL * (self.round.level() - 1) as f32
    }

    fn reset_level(&mut self) {
        self.bricks = build_wall(self.size.x);
        self.paddle = Body::centered(
            Vec2::new(self.size.x / 2.0, self.size.y - PADDLE_BOTTOM_MARGIN),
            PADDLE_SIZE,
        );
        self.park_ball();
    }

    /// Ball back on the paddle, waiting to be served
    fn park_ball(&mut self) {
        self.served = false;
        self.ball.vel = Vec2::ZERO;
        self.follow_paddle();
    }

    fn follow_paddle(&mut self) {
        self.ball.pos = Vec2::new(
            self.paddle.center().x - BALL_SIZE.x / 2.0,
            self.paddle.pos.y - BALL_SIZE.y,
        );
    }

    fn serve(&mut self) {
        // Somewhere in the upper quarter-circle
        let angle = -std::f32::consts::FRAC_PI_2
            + self.rng.random_range(-MAX_BOUNCE_ANGLE / 2.0..MAX_BOUNCE_ANGLE / 2.0);
        self.ball.vel = crate::heading_vector(angle) * self.ball_speed();
        self.served = true;
    }

    fn move_paddle(&mut self, frame: &Frame) {
        self.paddle.vel.x = frame.input.axis(Action::Left, Action::Right) * PADDLE_SPEED;
        integrate(&mut self.paddle, &Motion::FREE);
        let bounds = self.bounds();
        resolve_boundary(&mut self.paddle, &bounds, BoundaryPolicy::Clamp);
    }

    fn move_ball(&mut self) {
        integrate(&mut self.ball, &Motion::FREE);
        let walls = Edges::LEFT.union(Edges::RIGHT).union(Edges::TOP);
        let bounds = self.bounds();
        let event = resolve_boundary(&mut self.ball, &bounds, BoundaryPolicy::Bounce { walls });
        if event == Some(BoundaryEvent::Escaped(Edge::Bottom)) && !self.round.lose_life() {
            self.park_ball();
        }
    }

    fn hit_paddle(&mut self) {
        if self.ball.vel.y <= 0.0 || !overlaps(&self.ball.aabb(), &self.paddle.aabb()) {
            return;
        }
        // Where on the paddle it landed steers the rebound
        let offset = ((self.ball.center().x - self.paddle.center().x) / (PADDLE_SIZE.x / 2.0))
            .clamp(-1.0, 1.0);
        let angle = -std::f32::consts::FRAC_PI_2 + offset * MAX_BOUNCE_ANGLE;
        self.ball.vel = crate::heading_vector(angle) * self.ball_speed();
        self.ball.pos.y = self.paddle.pos.y - BALL_SIZE.y;
    }

    fn hit_bricks(&mut self) {
        let ball = self.ball.aabb();
        let Some(brick) = self
            .bricks
            .iter_mut()
            .find(|b| b.alive && overlaps(&ball, &b.rect))
        else {
            return;
        };
        let normal = contact_normal(&ball, &brick.rect);
        if self.ball.vel.dot(normal) < 0.0 {
            self.ball.vel = reflect_velocity(self.ball.vel, normal);
        }
        brick.alive = false;
        let points = brick.points();
        self.round.add_score(points);
    }

    fn brick_color(&self, row: usize) -> Color {
        let colors = [
            self.palette.hazard,
            self.palette.pickup,
            self.palette.accent,
            self.palette.foreground,
        ];
        colors[row % colors.len()]
    }
}

/// Full wall of bricks sized to the surface width
fn build_wall(width: f32) -> Vec<Brick> {
    let brick_width = (width - 2.0 * BRICK_SIDE_MARGIN - (BRICK_COLS - 1) as f32 * BRICK_GAP)
        / BRICK_COLS as f32;
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
    for row in 0..BRICK_ROWS {
        for col in 0..BRICK_COLS {
            let x = BRICK_SIDE_MARGIN + col as f32 * (brick_width + BRICK_GAP);
            let y = BRICK_TOP + row as f32 * (BRICK_HEIGHT + BRICK_GAP);
            bricks.push(Brick {
                rect: Aabb::new(x, y, brick_width, BRICK_HEIGHT),
                row,
                alive: true,
            });
        }
    }
    bricks
}

impl Game for Breakout {
    fn name(&self) -> &'static str {
        "breakout"
    }

    fn update(&mut self, frame: &Frame) {
        self.move_paddle(frame);

        if !self.served {
            self.follow_paddle();
            if frame.input.action_triggered(Action::Fire) {
                self.serve();
            }
        } else {
            self.move_ball();
            if self.round.is_playing() && self.served {
                self.hit_paddle();
                self.hit_bricks();
            }
        }

        self.bricks.retain(|b| b.alive);
        self.round.check_cleared(self.bricks.len());
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        sink.clear(self.palette.background);
        for brick in &self.bricks {
            sink.fill_rect(brick.rect, self.brick_color(brick.row));
        }
        sink.fill_rect(self.paddle.aabb(), self.palette.foreground);
        sink.fill_rect(self.ball.aabb(), self.palette.accent);
        draw_hud(sink, &self.palette, self.size, &self.round);
    }

    fn touch_anchor(&self) -> Vec2 {
        self.paddle.center()
    }

    fn phase(&self) -> GamePhase {
        self.round.phase()
    }

    fn restart(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.round.restart();
        self.reset_level();
    }

    fn advance(&mut self) {
        if self.round.next_level() {
            log::debug!("Breakout level {}", self.round.level());
            self.reset_level();
        } else {
            self.restart();
        }
    }
}
