//! Maze chase: eat every dot while ghosts hunt you
//!
//! The maze is parsed from an ASCII layout. Movement is tile-locked: turns
//! are buffered and taken at the next tile center where they are open.
//! Ghosts chase the player's last-seen position when they have line of
//! sight, and wander otherwise. The simulation runs in maze space (fixed
//! 20 px tiles) and is fitted onto whatever surface size is configured.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::EngineConfig;
use crate::engine::{Frame, Game};
use crate::input::Direction;
use crate::render::{Palette, RenderSink, draw_hud};
use crate::sim::{
    Aabb, Body, ChaseAi, GamePhase, Motion, Round, direction_toward, integrate, line_of_sight_by,
    overlaps, random_direction, within_range,
};

const TILE: f32 = 20.0;
const PLAYER_SPEED: f32 = 2.0;
const GHOST_SPEED: f32 = 1.25;
/// Tile decisions skipped between chase decisions
const GHOST_THINK_INTERVAL: u32 = 1;
/// Bodies are shrunk this much before the catch test
const CATCH_INSET: f32 = 4.0;
const DOT_POINTS: u32 = 10;
const START_LIVES: u32 = 3;

/// `#` wall, `.` dot, `P` player start, `G` ghost start, anything else open
const LAYOUT: [&str; 15] = [
    "####################",
    "#........##........#",
    "#.##.###.##.###.##.#",
    "#..................#",
    "#.##.#.######.#.##.#",
    "#....#...##...#....#",
    "####.### ## ###.####",
    "#.......G  G.......#",
    "####.#.######.#.####",
    "#....#........#....#",
    "#.##.###.##.###.##.#",
    "#..#.....P......#..#",
    "##.#.#.######.#.#.##",
    "#....#...##...#....#",
    "####################",
];

/// Wall grid
#[derive(Debug, Clone, PartialEq)]
struct Maze {
    cols: i32,
    rows: i32,
    walls: Vec<bool>,
}

impl Maze {
    /// Outside the grid counts as wall
    fn is_wall(&self, cell: IVec2) -> bool {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.cols || cell.y >= self.rows {
            return true;
        }
        self.walls[(cell.y * self.cols + cell.x) as usize]
    }

    fn is_wall_at(&self, p: Vec2) -> bool {
        self.is_wall(cell_of(p))
    }

    fn open_directions(&self, cell: IVec2) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| !self.is_wall(cell + step(*d)))
            .collect()
    }

    fn wall_rects(&self) -> impl Iterator<Item = Aabb> + '_ {
        (0..self.rows)
            .flat_map(move |y| (0..self.cols).map(move |x| IVec2::new(x, y)))
            .filter(|c| self.is_wall(*c))
            .map(|c| Aabb::new(c.x as f32 * TILE, c.y as f32 * TILE, TILE, TILE))
    }
}

/// Maps maze space onto the surface, letterboxed and centered
#[derive(Debug, Clone, Copy, PartialEq)]
struct View {
    scale: f32,
    offset: Vec2,
}

impl View {
    fn fit(maze: &Maze, surface: Vec2) -> Self {
        let extent = Vec2::new(maze.cols.max(1) as f32, maze.rows.max(1) as f32) * TILE;
        let scale = (surface / extent).min_element();
        Self {
            scale,
            offset: (surface - extent * scale) / 2.0,
        }
    }

    fn point(&self, p: Vec2) -> Vec2 {
        self.offset + p * self.scale
    }

    fn rect(&self, r: Aabb) -> Aabb {
        Aabb::from_pos_size(self.point(r.min()), r.size() * self.scale)
    }

    fn length(&self, l: f32) -> f32 {
        l * self.scale
    }
}

/// Everything a layout describes
#[derive(Debug, Clone)]
struct Level {
    maze: Maze,
    dots: Vec<IVec2>,
    player: IVec2,
    ghosts: Vec<IVec2>,
}

fn parse_layout(layout: &[&str]) -> Level {
    let rows = layout.len() as i32;
    let cols = layout.iter().map(|r| r.len()).max().unwrap_or(0) as i32;
    let mut walls = vec![true; (rows * cols) as usize];
    let mut dots = Vec::new();
    let mut player = IVec2::ONE;
    let mut ghosts = Vec::new();

    for (y, row) in layout.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let cell = IVec2::new(x as i32, y as i32);
            walls[y * cols as usize + x] = ch == '#';
            match ch {
                '.' => dots.push(cell),
                'P' => player = cell,
                'G' => ghosts.push(cell),
                _ => {}
            }
        }
    }

    Level {
        maze: Maze { cols, rows, walls },
        dots,
        player,
        ghosts,
    }
}

fn cell_of(p: Vec2) -> IVec2 {
    IVec2::new((p.x / TILE).floor() as i32, (p.y / TILE).floor() as i32)
}

fn cell_center(cell: IVec2) -> Vec2 {
    (cell.as_vec2() + 0.5) * TILE
}

fn step(dir: Direction) -> IVec2 {
    let v = dir.to_vec2();
    IVec2::new(v.x as i32, v.y as i32)
}

/// Whether a point sits on a tile center
fn aligned(p: Vec2) -> bool {
    p.distance(cell_center(cell_of(p))) < 1e-3
}

/// Tile-locked mover shared by the player and the ghosts
#[derive(Debug, Clone, PartialEq)]
struct Walker {
    body: Body,
    dir: Option<Direction>,
    speed: f32,
}

impl Walker {
    fn at(cell: IVec2, speed: f32) -> Self {
        Self {
            body: Body::centered(cell_center(cell), Vec2::splat(TILE)),
            dir: None,
            speed,
        }
    }

    fn center(&self) -> Vec2 {
        self.body.center()
    }

    fn cell(&self) -> IVec2 {
        cell_of(self.center())
    }

    fn advance(&mut self) {
        self.body.vel = self.dir.map(|d| d.to_vec2() * self.speed).unwrap_or(Vec2::ZERO);
        integrate(&mut self.body, &Motion::FREE);
    }

    fn catch_box(&self) -> Aabb {
        self.body.aabb().inset(CATCH_INSET)
    }
}

#[derive(Debug, Clone)]
struct Ghost {
    walker: Walker,
    ai: ChaseAi,
}

pub struct MazeChase {
    size: Vec2,
    palette: Palette,
    seed: u64,
    rng: Pcg32,
    round: Round,
    level: Level,
    view: View,
    dots: Vec<IVec2>,
    player: Walker,
    /// Buffered turn, taken at the next tile center where it is open
    wanted: Option<Direction>,
    ghosts: Vec<Ghost>,
}

impl MazeChase {
    pub fn new(config: &EngineConfig) -> Self {
        let seed = config.seed_or_entropy();
        let level = parse_layout(&LAYOUT);
        let size = config.size();
        let mut game = Self {
            size,
            view: View::fit(&level.maze, size),
            palette: config.theme.palette(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            round: Round::new(START_LIVES, 1),
            dots: level.dots.clone(),
            player: Walker::at(level.player, PLAYER_SPEED),
            wanted: None,
            ghosts: Vec::new(),
            level,
        };
        game.reset_positions();
        game
    }

    /// Player and ghosts back to their starts; dots untouched
    fn reset_positions(&mut self) {
        self.player = Walker::at(self.level.player, PLAYER_SPEED);
        self.wanted = None;
        self.ghosts = self
            .level
            .ghosts
            .iter()
            .map(|cell| Ghost {
                walker: Walker::at(*cell, GHOST_SPEED),
                ai: ChaseAi::new(GHOST_THINK_INTERVAL),
            })
            .collect();
    }

    fn read_input(&mut self, frame: &Frame) {
        if let Some(dir) = Direction::ALL.into_iter().find(|d| {
            frame.input.action_triggered(d.action()) || frame.input.action_held(d.action())
        }) {
            self.wanted = Some(dir);
        }
    }

    fn move_player(&mut self) {
        let maze = &self.level.maze;
        let player = &mut self.player;
        let center = player.center();

        if aligned(center) {
            let cell = cell_of(center);
            if let Some(wanted) = self.wanted
                && !maze.is_wall(cell + step(wanted))
            {
                player.dir = Some(wanted);
                self.wanted = None;
            }
            if let Some(dir) = player.dir
                && maze.is_wall(cell + step(dir))
            {
                player.dir = None;
            }
        } else if let (Some(wanted), Some(dir)) = (self.wanted, player.dir)
            && wanted == dir.opposite()
        {
            // Reversing is allowed between tile centers
            player.dir = Some(wanted);
            self.wanted = None;
        }

        player.advance();
    }

    fn move_ghosts(&mut self) {
        let maze = &self.level.maze;
        let target = self.player.center();

        for ghost in &mut self.ghosts {
            let center = ghost.walker.center();
            let sees = line_of_sight_by(center, target, |p| maze.is_wall_at(p));
            ghost.ai.observe(center, target, sees);

            if aligned(center) {
                let cell = cell_of(center);
                let mut options = maze.open_directions(cell);
                if let Some(dir) = ghost.walker.dir
                    && options.len() > 1
                {
                    options.retain(|d| *d != dir.opposite());
                }

                let chase = match ghost.ai.goal() {
                    Some(goal) if ghost.ai.ready() => direction_toward(center, goal, &options),
                    _ => None,
                };
                ghost.walker.dir = chase.or_else(|| random_direction(&mut self.rng, &options));
            }
            ghost.walker.advance();
        }
    }

    fn eat_dots(&mut self) {
        let center = self.player.center();
        let before = self.dots.len();
        self.dots.retain(|d| !within_range(center, cell_center(*d), TILE / 4.0));
        let eaten = (before - self.dots.len()) as u32;
        self.round.add_score(eaten * DOT_POINTS);
    }

    fn check_caught(&mut self) {
        let player = self.player.catch_box();
        let caught = self
            .ghosts
            .iter()
            .any(|g| overlaps(&player, &g.walker.catch_box()));
        if caught && !self.round.lose_life() {
            self.reset_positions();
        }
    }
}

impl Game for MazeChase {
    fn name(&self) -> &'static str {
        "maze-chase"
    }

    fn update(&mut self, frame: &Frame) {
        self.read_input(frame);
        self.move_player();
        self.eat_dots();
        self.move_ghosts();
        self.check_caught();
        self.round.check_cleared(self.dots.len());
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        let view = &self.view;
        sink.clear(self.palette.background);
        for wall in self.level.maze.wall_rects() {
            sink.fill_rect(view.rect(wall).inset(view.length(1.0)), self.palette.foreground);
        }
        for dot in &self.dots {
            sink.fill_circle(view.point(cell_center(*dot)), view.length(2.5), self.palette.pickup);
        }

        // Open mouth toward the heading
        let facing = self
            .player
            .dir
            .map(|d| d.to_vec2().y.atan2(d.to_vec2().x))
            .unwrap_or(0.0);
        sink.fill_arc(
            view.point(self.player.center()),
            view.length(TILE * 0.45),
            facing + 0.6,
            facing + std::f32::consts::TAU - 0.6,
            self.palette.accent,
        );

        for ghost in &self.ghosts {
            let center = view.point(ghost.walker.center());
            let r = view.length(TILE * 0.45);
            sink.fill_arc(center, r, std::f32::consts::PI, std::f32::consts::TAU, self.palette.hazard);
            sink.fill_rect(Aabb::new(center.x - r, center.y, r * 2.0, r), self.palette.hazard);
        }

        draw_hud(sink, &self.palette, self.size, &self.round);
    }

    fn touch_anchor(&self) -> Vec2 {
        self.view.point(self.player.center())
    }

    fn phase(&self) -> GamePhase {
        self.round.phase()
    }

    fn restart(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.round.restart();
        self.dots = self.level.dots.clone();
        self.reset_positions();
    }
}
