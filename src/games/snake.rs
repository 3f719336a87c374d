//! Snake on a grid, stepping at its own tick rate
//!
//! Turns are buffered between steps (up to `TURN_BUFFER`) so quick
//! double-taps are not lost; reversing onto the neck is ignored.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::EngineConfig;
use crate::engine::{Frame, Game, Touch};
use crate::input::{Direction, InputMapper, TouchIntent};
use crate::render::{Palette, RenderSink, draw_hud};
use crate::sim::{Aabb, GamePhase, Round};

const CELL: f32 = 20.0;
const STEP_SECONDS: f32 = 0.1;
const START_LENGTH: i32 = 3;
const TURN_BUFFER: usize = 2;
const FOOD_POINTS: u32 = 10;

pub struct Snake {
    size: Vec2,
    grid: IVec2,
    palette: Palette,
    seed: u64,
    rng: Pcg32,
    round: Round,
    /// Head first
    body: VecDeque<IVec2>,
    heading: Direction,
    turns: VecDeque<Direction>,
    food: Option<IVec2>,
}

impl Snake {
    pub fn new(config: &EngineConfig) -> Self {
        let seed = config.seed_or_entropy();
        let size = config.size();
        let grid = IVec2::new((size.x / CELL) as i32, (size.y / CELL) as i32).max(IVec2::ONE);
        let mut game = Self {
            size,
            grid,
            palette: config.theme.palette(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            round: Round::new(1, 1),
            body: VecDeque::new(),
            heading: Direction::Right,
            turns: VecDeque::new(),
            food: None,
        };
        game.reset_board();
        game
    }

    fn reset_board(&mut self) {
        let head = self.grid / 2;
        let length = START_LENGTH.min(head.x + 1);
        self.body = (0..length).map(|i| head - IVec2::new(i, 0)).collect();
        self.heading = Direction::Right;
        self.turns.clear();
        self.food = self.place_food();
    }

    fn in_grid(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.grid.x && cell.y < self.grid.y
    }

    /// Random free cell, or None when the snake fills the board
    fn place_food(&mut self) -> Option<IVec2> {
        let free: Vec<IVec2> = (0..self.grid.y)
            .flat_map(|y| (0..self.grid.x).map(move |x| IVec2::new(x, y)))
            .filter(|cell| !self.body.contains(cell))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.random_range(0..free.len())])
    }

    fn queue_turn(&mut self, dir: Direction) {
        let last = self.turns.back().copied().unwrap_or(self.heading);
        if self.turns.len() >= TURN_BUFFER || dir == last || dir == last.opposite() {
            return;
        }
        self.turns.push_back(dir);
    }

    fn step(&mut self) {
        if let Some(dir) = self.turns.pop_front() {
            self.heading = dir;
        }
        let Some(&head) = self.body.front() else {
            return;
        };
        let delta = self.heading.to_vec2();
        let next = head + IVec2::new(delta.x as i32, delta.y as i32);

        let eating = self.food == Some(next);
        // The tail moves out of the way unless the snake is growing
        let hits_body = self
            .body
            .iter()
            .take(self.body.len() - usize::from(!eating))
            .any(|c| *c == next);
        if !self.in_grid(next) || hits_body {
            self.round.lose_life();
            return;
        }

        self.body.push_front(next);
        if eating {
            self.round.add_score(FOOD_POINTS);
            self.food = self.place_food();
            if self.food.is_none() {
                self.round.win();
            }
        } else {
            self.body.pop_back();
        }
    }

    fn cell_rect(cell: IVec2) -> Aabb {
        Aabb::new(cell.x as f32 * CELL, cell.y as f32 * CELL, CELL, CELL).inset(1.0)
    }
}

impl Game for Snake {
    fn name(&self) -> &'static str {
        "snake"
    }

    fn update(&mut self, _frame: &Frame) {
        self.step();
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        sink.clear(self.palette.background);
        if let Some(food) = self.food {
            sink.fill_circle(
                Self::cell_rect(food).center(),
                CELL * 0.35,
                self.palette.pickup,
            );
        }
        for (i, cell) in self.body.iter().enumerate() {
            let color = if i == 0 {
                self.palette.accent
            } else {
                self.palette.foreground
            };
            sink.fill_rect(Self::cell_rect(*cell), color);
        }
        draw_hud(sink, &self.palette, self.size, &self.round);
    }

    fn key_down(&mut self, key: &str, input: &InputMapper) {
        if let Some(dir) = Direction::ALL
            .into_iter()
            .find(|d| input.is_action_pressed(d.action(), key))
        {
            self.queue_turn(dir);
        }
    }

    fn touch(&mut self, touch: &Touch) {
        if let Some(TouchIntent::Move(dir)) = touch.intent {
            self.queue_turn(dir);
        }
    }

    fn touch_anchor(&self) -> Vec2 {
        self.body
            .front()
            .map(|head| Self::cell_rect(*head).center())
            .unwrap_or(self.size / 2.0)
    }

    fn phase(&self) -> GamePhase {
        self.round.phase()
    }

    fn restart(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.round.restart();
        self.reset_board();
    }

    fn tick_interval(&self) -> Option<f32> {
        Some(STEP_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TouchPhase;

    fn game() -> Snake {
        Snake::new(&EngineConfig {
            seed: Some(11),
            ..EngineConfig::default()
        })
    }

    fn step(game: &mut Snake) {
        let input = InputMapper::default();
        game.update(&Frame {
            input: &input,
            dt: STEP_SECONDS,
            tick: 0,
        });
    }

    fn press(game: &mut Snake, key: &str) {
        let mut input = InputMapper::default();
        input.key_down(key);
        game.key_down(key, &input);
    }

    #[test]
    fn test_initial_snake() {
        let game = game();
        assert_eq!(game.grid, IVec2::new(20, 15));
        assert_eq!(game.body.len(), 3);
        assert_eq!(game.body[0], IVec2::new(10, 7));
        let food = game.food.unwrap_or(IVec2::NEG_ONE);
        assert!(game.in_grid(food));
        assert!(!game.body.contains(&food));
    }

    #[test]
    fn test_moves_one_cell_per_step() {
        let mut game = game();
        game.food = None;
        step(&mut game);
        assert_eq!(game.body[0], IVec2::new(11, 7));
        assert_eq!(game.body.len(), 3);
    }

    #[test]
    fn test_reversal_ignored_and_turns_buffered() {
        let mut game = game();
        game.food = None;
        press(&mut game, "ArrowLeft");
        assert!(game.turns.is_empty());

        press(&mut game, "ArrowUp");
        press(&mut game, "ArrowRight");
        step(&mut game);
        assert_eq!(game.body[0], IVec2::new(10, 6));
        step(&mut game);
        assert_eq!(game.body[0], IVec2::new(11, 6));
    }

    #[test]
    fn test_touch_turns() {
        let mut game = game();
        game.food = None;
        game.touch(&Touch {
            phase: TouchPhase::Start,
            point: Vec2::ZERO,
            intent: Some(TouchIntent::Move(Direction::Down)),
        });
        step(&mut game);
        assert_eq!(game.body[0], IVec2::new(10, 8));
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut game = game();
        game.food = Some(IVec2::new(11, 7));
        step(&mut game);
        assert_eq!(game.body.len(), 4);
        assert_eq!(game.round.score(), FOOD_POINTS);
        assert_ne!(game.food, Some(IVec2::new(11, 7)));
    }

    #[test]
    fn test_wall_ends_game() {
        let mut game = game();
        game.food = None;
        for _ in 0..10 {
            step(&mut game);
        }
        assert_eq!(game.phase(), GamePhase::GameOver);
        let head = game.body[0];
        // Frozen once over
        step(&mut game);
        assert_eq!(game.body[0], head);
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut game = game();
        game.food = None;
        game.body = [(5, 5), (4, 5), (4, 6), (5, 6), (6, 6)]
            .into_iter()
            .map(IVec2::from)
            .collect();
        game.heading = Direction::Down;
        step(&mut game);
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_moving_into_vacating_tail_is_safe() {
        let mut game = game();
        game.food = None;
        game.body = [(5, 5), (4, 5), (4, 6), (5, 6)].into_iter().map(IVec2::from).collect();
        game.heading = Direction::Down;
        step(&mut game);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.body[0], IVec2::new(5, 6));
    }

    #[test]
    fn test_full_board_wins() {
        let mut game = Snake::new(&EngineConfig {
            width: 60,
            height: 40,
            seed: Some(1),
            ..EngineConfig::default()
        });
        game.body = [(1, 1), (0, 1), (0, 0), (1, 0), (2, 0)]
            .into_iter()
            .map(IVec2::from)
            .collect();
        game.heading = Direction::Right;
        game.food = Some(IVec2::new(2, 1));
        step(&mut game);
        assert_eq!(game.phase(), GamePhase::Won);
    }

    #[test]
    fn test_restart_restores_start_configuration() {
        let fresh = game();
        let mut game = game();
        for _ in 0..10 {
            step(&mut game);
        }
        assert_eq!(game.phase(), GamePhase::GameOver);
        game.restart();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.body, fresh.body);
        assert_eq!(game.food, fresh.food);
        assert_eq!(game.round, fresh.round);
    }
}
