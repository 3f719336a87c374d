//! Per-game phase machine and round counters

use serde::{Deserialize, Serialize};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Lives ran out; score is frozen until restart
    GameOver,
    /// Final objective cleared
    Won,
    /// Level objectives cleared, more levels remain
    LevelComplete,
}

impl GamePhase {
    /// Terminal for the round: only START (or a tap) leaves it
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// Score, lives and level, plus the phase they drive.
///
/// Transitions out of `Playing` happen at most once; further hazards or
/// cleared checks while terminal are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    phase: GamePhase,
    lives: u32,
    score: u32,
    level: u32,
    start_lives: u32,
    final_level: u32,
}

impl Round {
    /// `final_level` of 1 means a single-level game
    pub fn new(lives: u32, final_level: u32) -> Self {
        Self {
            phase: GamePhase::Playing,
            lives,
            score: 0,
            level: 1,
            start_lives: lives,
            final_level: final_level.max(1),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Ignored outside `Playing`
    pub fn add_score(&mut self, points: u32) {
        if self.is_playing() {
            self.score = self.score.saturating_add(points);
        }
    }

    /// A hazard hit. Returns true if this hit ended the game.
    pub fn lose_life(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        log::debug!("Life lost, {} remaining", self.lives);
        if self.lives == 0 {
            self.enter(GamePhase::GameOver);
            true
        } else {
            false
        }
    }

    /// Evaluate the objective count after a tick's entity updates
    pub fn check_cleared(&mut self, remaining: usize) -> Option<GamePhase> {
        if !self.is_playing() || remaining > 0 {
            return None;
        }
        let next = if self.level >= self.final_level {
            GamePhase::Won
        } else {
            GamePhase::LevelComplete
        };
        self.enter(next);
        Some(next)
    }

    /// Win outright (e.g. a point target reached)
    pub fn win(&mut self) {
        if self.is_playing() {
            self.enter(GamePhase::Won);
        }
    }

    /// Back to the start-of-game counters
    pub fn restart(&mut self) {
        self.lives = self.start_lives;
        self.score = 0;
        self.level = 1;
        self.enter(GamePhase::Playing);
    }

    /// Leave `LevelComplete` for the next level, keeping score and lives.
    /// Returns false (and does nothing) from any other phase.
    pub fn next_level(&mut self) -> bool {
        if self.phase != GamePhase::LevelComplete {
            return false;
        }
        self.level += 1;
        self.enter(GamePhase::Playing);
        true
    }

    fn enter(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!(
                "Phase {:?} -> {:?} (level {}, score {}, lives {})",
                self.phase,
                phase,
                self.level,
                self.score,
                self.lives
            );
        }
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_third_hazard_ends_game_once() {
        let mut round = Round::new(3, 1);
        assert!(!round.lose_life());
        assert!(!round.lose_life());
        assert_eq!(round.phase(), GamePhase::Playing);
        assert!(round.lose_life());
        assert_eq!(round.phase(), GamePhase::GameOver);

        // Further hazards while already over do not re-trigger
        for _ in 0..10 {
            assert!(!round.lose_life());
        }
        assert_eq!(round.phase(), GamePhase::GameOver);
        assert_eq!(round.lives(), 0);
    }

    #[test]
    fn test_score_frozen_after_game_over() {
        let mut round = Round::new(1, 1);
        round.add_score(50);
        round.lose_life();
        round.add_score(100);
        assert_eq!(round.score(), 50);
    }

    #[test]
    fn test_restart_restores_counters() {
        let mut round = Round::new(3, 2);
        round.add_score(120);
        round.lose_life();
        round.lose_life();
        round.lose_life();
        assert!(round.phase().is_terminal());

        round.restart();
        assert_eq!(round, Round::new(3, 2));
        assert_eq!(round.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_levels_then_win() {
        let mut round = Round::new(3, 2);
        assert_eq!(round.check_cleared(4), None);
        assert_eq!(round.check_cleared(0), Some(GamePhase::LevelComplete));
        // Already terminal
        assert_eq!(round.check_cleared(0), None);

        // Ignored between levels
        round.add_score(10);
        round.lose_life();
        assert!(round.next_level());
        assert_eq!(round.level(), 2);
        assert_eq!(round.score(), 0);
        assert_eq!(round.lives(), 3);

        round.add_score(30);
        assert_eq!(round.check_cleared(0), Some(GamePhase::Won));
        assert!(!round.next_level());
        assert_eq!(round.score(), 30);
    }

    #[test]
    fn test_win_only_from_playing() {
        let mut round = Round::new(1, 1);
        round.lose_life();
        round.win();
        assert_eq!(round.phase(), GamePhase::GameOver);
    }
}
