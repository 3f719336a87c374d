//! Asteroids: a drifting ship in a wrap-around field of splitting rocks
//!
//! LEFT/RIGHT rotate, UP thrusts, FIRE shoots. Ship, bullets and rocks all
//! wrap at the screen edges. Each cleared wave is a level.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::EngineConfig;
use crate::engine::{Frame, Game};
use crate::input::Action;
use crate::render::{Palette, RenderSink, draw_hud};
use crate::sim::{
    Aabb, Body, BoundaryPolicy, GamePhase, Motion, Round, circles_overlap, integrate,
    random_heading, resolve_boundary, within_range,
};

// Ship
const SHIP_RADIUS: f32 = 8.0;
const TURN_RATE: f32 = 0.08;
const THRUST: f32 = 0.15;
const SHIP_FRICTION: f32 = 0.98;
const SHIP_MAX_SPEED: f32 = 6.0;
const RESPAWN_INVULNERABLE_TICKS: u32 = 120;

// Bullets
const BULLET_SPEED: f32 = 7.0;
const BULLET_LIFETIME: u32 = 50;
const FIRE_COOLDOWN_TICKS: u32 = 10;
const MAX_BULLETS: usize = 6;

// Rocks
const WAVE_BASE_ROCKS: u32 = 2;
/// Rocks never spawn closer than this to the ship
const SPAWN_CLEARANCE: f32 = 90.0;
/// Small fields may have no spot that far away; take the last try
const SPAWN_ATTEMPTS: u32 = 32;

const START_LIVES: u32 = 3;
const WAVES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RockSize {
    Large,
    Medium,
    Small,
}

impl RockSize {
    fn radius(self) -> f32 {
        match self {
            RockSize::Large => 30.0,
            RockSize::Medium => 18.0,
            RockSize::Small => 10.0,
        }
    }

    fn points(self) -> u32 {
        match self {
            RockSize::Large => 20,
            RockSize::Medium => 50,
            RockSize::Small => 100,
        }
    }

    /// Smaller rocks move faster
    fn speed_range(self) -> std::ops::Range<f32> {
        match self {
            RockSize::Large => 0.5..1.2,
            RockSize::Medium => 0.8..1.8,
            RockSize::Small => 1.2..2.5,
        }
    }

    fn split(self) -> Option<RockSize> {
        match self {
            RockSize::Large => Some(RockSize::Medium),
            RockSize::Medium => Some(RockSize::Small),
            RockSize::Small => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Rock {
    body: Body,
    size: RockSize,
    alive: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct Bullet {
    body: Body,
    ttl: u32,
}

#[derive(Debug, Clone, PartialEq)]
struct Ship {
    body: Body,
    angle: f32,
    cooldown: u32,
    invulnerable: u32,
    thrusting: bool,
}

impl Ship {
    fn spawn(center: Vec2) -> Self {
        Self {
            body: Body::centered(center, Vec2::splat(SHIP_RADIUS * 2.0)),
            // Nose up
            angle: -std::f32::consts::FRAC_PI_2,
            cooldown: 0,
            invulnerable: RESPAWN_INVULNERABLE_TICKS,
            thrusting: false,
        }
    }

    fn nose(&self) -> Vec2 {
        self.body.center() + crate::heading_vector(self.angle) * SHIP_RADIUS
    }
}

pub struct Asteroids {
    size: Vec2,
    palette: Palette,
    seed: u64,
    rng: Pcg32,
    round: Round,
    ship: Ship,
    bullets: Vec<Bullet>,
    rocks: Vec<Rock>,
}

impl Asteroids {
    pub fn new(config: &EngineConfig) -> Self {
        let seed = config.seed_or_entropy();
        let size = config.size();
        let mut game = Self {
            size,
            palette: config.theme.palette(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            round: Round::new(START_LIVES, WAVES),
            ship: Ship::spawn(size / 2.0),
            bullets: Vec::new(),
            rocks: Vec::new(),
        };
        game.spawn_wave();
        game
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(Vec2::ZERO, self.size)
    }

    fn spawn_wave(&mut self) {
        self.ship = Ship::spawn(self.size / 2.0);
        self.bullets.clear();
        self.rocks.clear();
        let count = WAVE_BASE_ROCKS + self.round.level();
        for _ in 0..count {
            let mut center = Vec2::ZERO;
            for _ in 0..SPAWN_ATTEMPTS {
                center = Vec2::new(
                    self.rng.random_range(0.0..self.size.x),
                    self.rng.random_range(0.0..self.size.y),
                );
                if !within_range(center, self.ship.body.center(), SPAWN_CLEARANCE) {
                    break;
                }
            }
            let rock = self.make_rock(center, RockSize::Large);
            self.rocks.push(rock);
        }
        log::debug!("Wave {}: {} rocks", self.round.level(), count);
    }

    fn make_rock(&mut self, center: Vec2, size: RockSize) -> Rock {
        let speed = self.rng.random_range(size.speed_range());
        let vel = crate::heading_vector(random_heading(&mut self.rng)) * speed;
        Rock {
            body: Body::centered(center, Vec2::splat(size.radius() * 2.0)).with_velocity(vel),
            size,
            alive: true,
        }
    }

    fn steer(&mut self, frame: &Frame) {
        let input = frame.input;
        self.ship.angle += input.axis(Action::Left, Action::Right) * TURN_RATE;
        self.ship.thrusting = input.action_held(Action::Up);
        if self.ship.thrusting {
            self.ship.body.vel += crate::heading_vector(self.ship.angle) * THRUST;
        }
        let motion = Motion::FREE
            .with_friction(SHIP_FRICTION)
            .with_max_speed(SHIP_MAX_SPEED);
        integrate(&mut self.ship.body, &motion);
        let bounds = self.bounds();
        resolve_boundary(&mut self.ship.body, &bounds, BoundaryPolicy::Wrap);

        self.ship.cooldown = self.ship.cooldown.saturating_sub(1);
        self.ship.invulnerable = self.ship.invulnerable.saturating_sub(1);

        let firing = input.action_held(Action::Fire) || input.action_triggered(Action::Fire);
        if firing && self.ship.cooldown == 0 && self.bullets.len() < MAX_BULLETS {
            self.fire();
        }
    }

    fn fire(&mut self) {
        let vel = self.ship.body.vel + crate::heading_vector(self.ship.angle) * BULLET_SPEED;
        self.bullets.push(Bullet {
            body: Body::centered(self.ship.nose(), Vec2::splat(2.0)).with_velocity(vel),
            ttl: BULLET_LIFETIME,
        });
        self.ship.cooldown = FIRE_COOLDOWN_TICKS;
    }

    fn drift(&mut self) {
        let bounds = self.bounds();
        for bullet in &mut self.bullets {
            integrate(&mut bullet.body, &Motion::FREE);
            resolve_boundary(&mut bullet.body, &bounds, BoundaryPolicy::Wrap);
            bullet.ttl = bullet.ttl.saturating_sub(1);
        }
        for rock in &mut self.rocks {
            integrate(&mut rock.body, &Motion::FREE);
            resolve_boundary(&mut rock.body, &bounds, BoundaryPolicy::Wrap);
        }
    }

    fn shoot_rocks(&mut self) {
        let mut fragments = Vec::new();
        for bullet in &mut self.bullets {
            let Some(rock) = self.rocks.iter_mut().find(|r| {
                r.alive && circles_overlap(bullet.body.center(), 1.0, r.body.center(), r.size.radius())
            }) else {
                continue;
            };
            rock.alive = false;
            bullet.ttl = 0;
            self.round.add_score(rock.size.points());
            if let Some(smaller) = rock.size.split() {
                fragments.push((rock.body.center(), smaller));
            }
        }
        for (center, size) in fragments {
            for _ in 0..2 {
                let rock = self.make_rock(center, size);
                self.rocks.push(rock);
            }
        }
    }

    fn ram_rocks(&mut self) {
        if self.ship.invulnerable > 0 {
            return;
        }
        let ship = self.ship.body.center();
        let hit = self
            .rocks
            .iter()
            .any(|r| r.alive && circles_overlap(ship, SHIP_RADIUS, r.body.center(), r.size.radius()));
        if hit && !self.round.lose_life() {
            self.ship = Ship::spawn(self.size / 2.0);
        }
    }
}

impl Game for Asteroids {
    fn name(&self) -> &'static str {
        "asteroids"
    }

    fn update(&mut self, frame: &Frame) {
        self.steer(frame);
        self.drift();
        self.shoot_rocks();
        self.ram_rocks();

        self.bullets.retain(|b| b.ttl > 0);
        self.rocks.retain(|r| r.alive);
        self.round.check_cleared(self.rocks.len());
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        sink.clear(self.palette.background);

        for rock in &self.rocks {
            sink.stroke_arc(
                rock.body.center(),
                rock.size.radius(),
                0.0,
                std::f32::consts::TAU,
                self.palette.hazard,
                2.0,
            );
        }
        for bullet in &self.bullets {
            sink.fill_circle(bullet.body.center(), 2.0, self.palette.accent);
        }

        // Blink while invulnerable
        if self.ship.invulnerable / 8 % 2 == 0 {
            sink.save();
            sink.translate(self.ship.body.center());
            sink.rotate(self.ship.angle);
            let r = SHIP_RADIUS;
            let hull = [
                Vec2::new(r, 0.0),
                Vec2::new(-r, -r * 0.7),
                Vec2::new(-r * 0.5, 0.0),
                Vec2::new(-r, r * 0.7),
            ];
            sink.stroke_path(&hull, true, self.palette.foreground, 2.0);
            if self.ship.thrusting {
                let flame = [
                    Vec2::new(-r * 0.6, -r * 0.3),
                    Vec2::new(-r * 1.4, 0.0),
                    Vec2::new(-r * 0.6, r * 0.3),
                ];
                sink.stroke_path(&flame, false, self.palette.accent, 1.0);
            }
            sink.restore();
        }

        draw_hud(sink, &self.palette, self.size, &self.round);
    }

    fn touch_anchor(&self) -> Vec2 {
        self.ship.body.center()
    }

    fn phase(&self) -> GamePhase {
        self.round.phase()
    }

    fn restart(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.round.restart();
        self.spawn_wave();
    }

    fn advance(&mut self) {
        if self.round.next_level() {
            self.spawn_wave();
        } else {
            self.restart();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputMapper;
    use crate::render::{DrawCommand, RecordingSink};

    fn game() -> Asteroids {
        Asteroids::new(&EngineConfig {
            seed: Some(5),
            ..EngineConfig::default()
        })
    }

    fn tick(game: &mut Asteroids, input: &InputMapper) {
        game.update(&Frame {
            input,
            dt: 1.0 / 60.0,
            tick: 0,
        });
    }

    /// Field with nothing in it but the ship
    fn empty_field() -> Asteroids {
        let mut game = game();
        game.rocks.clear();
        // Keep the wave from counting as cleared
        game.rocks.push(Rock {
            body: Body::centered(Vec2::new(30.0, 30.0), Vec2::splat(20.0)),
            size: RockSize::Small,
            alive: true,
        });
        game
    }

    #[test]
    fn test_first_wave_spawns_clear_of_ship() {
        let game = game();
        assert_eq!(game.rocks.len(), (WAVE_BASE_ROCKS + 1) as usize);
        for rock in &game.rocks {
            assert!(rock.body.center().distance(game.ship.body.center()) >= SPAWN_CLEARANCE);
            assert_eq!(rock.size, RockSize::Large);
        }
    }

    #[test]
    fn test_thrust_is_capped() {
        let mut game = empty_field();
        let mut input = InputMapper::default();
        input.key_down("ArrowUp");
        for _ in 0..300 {
            tick(&mut game, &input);
        }
        assert!(game.ship.body.vel.length() <= SHIP_MAX_SPEED + 1e-4);
        assert!(game.ship.body.vel.length() > SHIP_MAX_SPEED * 0.5);
    }

    #[test]
    fn test_ship_coasts_down() {
        let mut game = empty_field();
        game.ship.body.vel = Vec2::new(4.0, 0.0);
        for _ in 0..50 {
            tick(&mut game, &InputMapper::default());
        }
        assert!((game.ship.body.vel.length() - 4.0 * 0.98f32.powi(50)).abs() < 1e-3);
    }

    #[test]
    fn test_ship_wraps() {
        let mut game = empty_field();
        game.ship.body.set_center(Vec2::new(399.0, 150.0));
        game.ship.body.vel = Vec2::new(3.0, 0.0);
        tick(&mut game, &InputMapper::default());
        assert!(game.ship.body.center().x < 10.0);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut game = empty_field();
        let mut input = InputMapper::default();
        input.key_down(" ");
        for _ in 0..FIRE_COOLDOWN_TICKS {
            tick(&mut game, &input);
        }
        assert_eq!(game.bullets.len(), 1);
        tick(&mut game, &input);
        assert_eq!(game.bullets.len(), 2);
    }

    #[test]
    fn test_bullets_expire() {
        let mut game = empty_field();
        game.fire();
        for _ in 0..BULLET_LIFETIME {
            tick(&mut game, &InputMapper::default());
        }
        assert!(game.bullets.is_empty());
    }

    #[test]
    fn test_large_rock_splits() {
        let mut game = game();
        game.rocks.truncate(1);
        let center = Vec2::new(300.0, 60.0);
        game.rocks[0].body = Body::centered(center, Vec2::splat(60.0));
        game.bullets.push(Bullet {
            body: Body::centered(center, Vec2::splat(2.0)),
            ttl: 10,
        });
        tick(&mut game, &InputMapper::default());
        assert_eq!(game.rocks.len(), 2);
        assert!(game.rocks.iter().all(|r| r.size == RockSize::Medium));
        assert_eq!(game.round.score(), RockSize::Large.points());
        assert!(game.bullets.is_empty());
    }

    #[test]
    fn test_collision_costs_life_then_invulnerable() {
        let mut game = empty_field();
        game.ship.invulnerable = 0;
        game.rocks[0].body.set_center(game.ship.body.center());
        tick(&mut game, &InputMapper::default());
        assert_eq!(game.round.lives(), START_LIVES - 1);
        assert!(game.ship.invulnerable > 0);

        tick(&mut game, &InputMapper::default());
        assert_eq!(game.round.lives(), START_LIVES - 1);
    }

    #[test]
    fn test_cleared_wave_advances() {
        let mut game = game();
        game.rocks.clear();
        tick(&mut game, &InputMapper::default());
        assert_eq!(game.phase(), GamePhase::LevelComplete);
        game.advance();
        assert_eq!(game.round.level(), 2);
        assert_eq!(game.rocks.len(), (WAVE_BASE_ROCKS + 2) as usize);
    }

    #[test]
    fn test_restart_restores_start_configuration() {
        let fresh = game();
        let mut game = game();
        for _ in 0..START_LIVES {
            game.round.lose_life();
        }
        game.rocks.clear();
        game.restart();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.rocks, fresh.rocks);
        assert_eq!(game.ship, fresh.ship);
        assert_eq!(game.round, fresh.round);
    }

    #[test]
    fn test_ship_drawn_with_transform() {
        let mut game = game();
        game.ship.invulnerable = 0;
        let mut sink = RecordingSink::default();
        game.render(&mut sink);
        assert!(sink.commands().contains(&DrawCommand::Save));
        assert!(sink.commands().contains(&DrawCommand::Rotate(game.ship.angle)));
        assert_eq!(sink.depth(), 0);
    }
}
