//! Game catalogue
//!
//! Every game owns its entities, a `Round` and a seeded RNG, and draws
//! itself through a `RenderSink`. Between them they use every boundary
//! policy, the chase AI and the slower logical tick rate.

pub mod asteroids;
pub mod breakout;
pub mod maze_chase;
pub mod pong;
pub mod snake;

use std::fmt;
use std::str::FromStr;

pub use asteroids::Asteroids;
pub use breakout::Breakout;
pub use maze_chase::MazeChase;
pub use pong::Pong;
pub use snake::Snake;

use crate::config::EngineConfig;
use crate::engine::Game;
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Breakout,
    Pong,
    Snake,
    Asteroids,
    MazeChase,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Breakout,
        GameKind::Pong,
        GameKind::Snake,
        GameKind::Asteroids,
        GameKind::MazeChase,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Breakout => "breakout",
            GameKind::Pong => "pong",
            GameKind::Snake => "snake",
            GameKind::Asteroids => "asteroids",
            GameKind::MazeChase => "maze-chase",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameKind {
    type Err = EngineError;

    /// Case-insensitive; `-`, `_` and spaces are ignored (`MazeChase`, `maze_chase`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "breakout" => Ok(GameKind::Breakout),
            "pong" => Ok(GameKind::Pong),
            "snake" => Ok(GameKind::Snake),
            "asteroids" => Ok(GameKind::Asteroids),
            "mazechase" | "maze" => Ok(GameKind::MazeChase),
            _ => Err(EngineError::UnknownGame(s.to_string())),
        }
    }
}

/// Build a fresh game of `kind` sized and themed by `config`
pub fn create_game(kind: GameKind, config: &EngineConfig) -> Box<dyn Game> {
    log::debug!("Creating {kind} ({}x{})", config.width, config.height);
    match kind {
        GameKind::Breakout => Box::new(Breakout::new(config)),
        GameKind::Pong => Box::new(Pong::new(config)),
        GameKind::Snake => Box::new(Snake::new(config)),
        GameKind::Asteroids => Box::new(Asteroids::new(config)),
        GameKind::MazeChase => Box::new(MazeChase::new(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GameLoopEngine;
    use crate::platform::HeadlessHost;
    use crate::sim::GamePhase;

    #[test]
    fn test_parse_names() {
        assert_eq!("breakout".parse::<GameKind>().ok(), Some(GameKind::Breakout));
        assert_eq!("Maze-Chase".parse::<GameKind>().ok(), Some(GameKind::MazeChase));
        assert_eq!("maze_chase".parse::<GameKind>().ok(), Some(GameKind::MazeChase));
        for kind in GameKind::ALL {
            assert_eq!(kind.as_str().parse::<GameKind>().ok(), Some(kind));
        }
    }

    #[test]
    fn test_unknown_game_is_an_error() {
        let err = "tetris".parse::<GameKind>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownGame(ref name) if name == "tetris"));
    }

    #[test]
    fn test_every_game_runs_headless() {
        let config = EngineConfig {
            seed: Some(1234),
            use_mobile: true,
            ..EngineConfig::default()
        };
        for kind in GameKind::ALL {
            let game = create_game(kind, &config);
            assert_eq!(game.name(), kind.as_str());
            let mut engine = GameLoopEngine::new(HeadlessHost::default(), game, config.clone());
            engine.start();
            assert_eq!(engine.run_for(120), 120, "{kind}");
            assert!(engine.host().recording().frames() == 120, "{kind}");
            assert!(engine.host().recording().depth() == 0, "{kind}");
            assert_ne!(engine.game().phase(), GamePhase::Won, "{kind}");
        }
    }

    #[test]
    fn test_every_game_survives_zero_sized_surface() {
        let config = EngineConfig {
            width: 0,
            height: 0,
            seed: Some(1),
            ..EngineConfig::default()
        };
        for kind in GameKind::ALL {
            let mut engine = GameLoopEngine::new(HeadlessHost::default(), create_game(kind, &config), config.clone());
            engine.start();
            assert_eq!(engine.run_for(30), 30, "{kind}");
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let config = EngineConfig {
            seed: Some(77),
            ..EngineConfig::default()
        };
        for kind in GameKind::ALL {
            let mut a = GameLoopEngine::new(HeadlessHost::default(), create_game(kind, &config), config.clone());
            let mut b = GameLoopEngine::new(HeadlessHost::default(), create_game(kind, &config), config.clone());
            a.start();
            b.start();
            a.run_for(200);
            b.run_for(200);
            assert_eq!(a.host().recording().commands(), b.host().recording().commands(), "{kind}");
        }
    }
}
