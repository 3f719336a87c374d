//! Chase AI
//!
//! Enemies remember where they last saw their target, head there, and forget
//! once they arrive. Decisions are throttled by a cooldown. Randomness always
//! comes from the caller's seeded RNG.

use glam::Vec2;
use rand::Rng;

use crate::input::Direction;

/// Distance at which a remembered position counts as reached
const ARRIVAL_RADIUS: f32 = 4.0;

/// Last-seen-target memory plus a decision cooldown
#[derive(Debug, Clone, PartialEq)]
pub struct ChaseAi {
    memory: Option<Vec2>,
    cooldown: u32,
    think_interval: u32,
}

impl ChaseAi {
    /// `think_interval` ticks must pass between decisions
    pub fn new(think_interval: u32) -> Self {
        Self {
            memory: None,
            cooldown: 0,
            think_interval,
        }
    }

    /// Update memory from this tick's view of the target
    pub fn observe(&mut self, pos: Vec2, target: Vec2, sees: bool) {
        if sees {
            self.memory = Some(target);
        } else if let Some(last) = self.memory
            && pos.distance(last) < ARRIVAL_RADIUS
        {
            // Reached the last sighting without finding anything
            self.memory = None;
        }
    }

    /// Where to head, if anywhere
    pub fn goal(&self) -> Option<Vec2> {
        self.memory
    }

    pub fn forget(&mut self) {
        self.memory = None;
        self.cooldown = 0;
    }

    /// Count down; true when a decision may be made this tick (and re-arms)
    pub fn ready(&mut self) -> bool {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return false;
        }
        self.cooldown = self.think_interval;
        true
    }
}

/// Of the allowed `options`, the direction that best closes on `to`.
///
/// Prefers the dominant axis of the offset, then the other axis.
pub fn direction_toward(from: Vec2, to: Vec2, options: &[Direction]) -> Option<Direction> {
    let offset = to - from;
    options
        .iter()
        .copied()
        .filter(|d| d.to_vec2().dot(offset) > 0.0)
        .max_by(|a, b| {
            let da = a.to_vec2().dot(offset);
            let db = b.to_vec2().dot(offset);
            da.total_cmp(&db)
        })
}

/// Uniform pick from `options`
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R, options: &[Direction]) -> Option<Direction> {
    if options.is_empty() {
        None
    } else {
        Some(options[rng.random_range(0..options.len())])
    }
}

/// Uniform heading in radians
pub fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random_range(0.0..std::f32::consts::TAU)
}

/// Move `current` toward `target` by at most `max_step`
#[inline]
pub fn track_axis(current: f32, target: f32, max_step: f32) -> f32 {
    current + (target - current).clamp(-max_step, max_step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_remembers_last_sighting() {
        let mut ai = ChaseAi::new(0);
        ai.observe(Vec2::ZERO, Vec2::new(100.0, 0.0), true);
        // Target slips out of view and moves on; memory stays put
        ai.observe(Vec2::new(10.0, 0.0), Vec2::new(100.0, 80.0), false);
        assert_eq!(ai.goal(), Some(Vec2::new(100.0, 0.0)));
    }

    #[test]
    fn test_forgets_on_arrival() {
        let mut ai = ChaseAi::new(0);
        ai.observe(Vec2::ZERO, Vec2::new(50.0, 50.0), true);
        ai.observe(Vec2::new(49.0, 50.0), Vec2::new(200.0, 0.0), false);
        assert_eq!(ai.goal(), None);
    }

    #[test]
    fn test_cooldown_gates_decisions() {
        let mut ai = ChaseAi::new(2);
        assert!(ai.ready());
        assert!(!ai.ready());
        assert!(!ai.ready());
        assert!(ai.ready());
    }

    #[test]
    fn test_direction_toward_prefers_dominant_axis() {
        let all = Direction::ALL;
        let from = Vec2::ZERO;
        assert_eq!(direction_toward(from, Vec2::new(40.0, 10.0), &all), Some(Direction::Right));
        assert_eq!(direction_toward(from, Vec2::new(5.0, -30.0), &all), Some(Direction::Up));
        // Right blocked: fall back to the other useful axis
        let options = [Direction::Up, Direction::Down, Direction::Left];
        assert_eq!(direction_toward(from, Vec2::new(40.0, 10.0), &options), Some(Direction::Down));
        // Nothing helps
        assert_eq!(direction_toward(from, Vec2::new(40.0, 0.0), &[Direction::Left]), None);
    }

    #[test]
    fn test_chasing_closes_distance() {
        let mut ai = ChaseAi::new(0);
        let target = Vec2::new(60.0, -20.0);
        let mut pos = Vec2::ZERO;
        ai.observe(pos, target, true);
        for _ in 0..100 {
            let Some(goal) = ai.goal() else { break };
            if let Some(dir) = direction_toward(pos, goal, &Direction::ALL) {
                pos += dir.to_vec2();
            }
            ai.observe(pos, target, false);
        }
        assert!(pos.distance(target) < ARRIVAL_RADIUS);
        assert_eq!(ai.goal(), None);
    }

    #[test]
    fn test_seeded_randomness_is_reproducible() {
        let mut a = Pcg32::seed_from_u64(7);
        let mut b = Pcg32::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(
                random_direction(&mut a, &Direction::ALL),
                random_direction(&mut b, &Direction::ALL)
            );
            assert_eq!(random_heading(&mut a), random_heading(&mut b));
        }
        assert_eq!(random_direction(&mut a, &[]), None);
    }

    #[test]
    fn test_track_axis() {
        assert_eq!(track_axis(100.0, 150.0, 4.0), 104.0);
        assert_eq!(track_axis(100.0, 98.0, 4.0), 98.0);
        assert_eq!(track_axis(100.0, 0.0, 4.0), 96.0);
    }
}
