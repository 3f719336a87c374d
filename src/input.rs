//! Input mapping
//!
//! Raw key and touch events arrive from the host as strings and surface points.
//! They are normalized here into a small set of logical actions that every
//! game reads the same way, plus the raw set of physical keys currently held
//! (for game-specific aliases such as WASD).

use std::collections::{BTreeMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TOUCH_TRIGGER_RADIUS;

/// Logical input, independent of the physical key bound to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Pause,
    Start,
}

const ACTION_COUNT: usize = 7;

impl Action {
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Fire,
        Action::Pause,
        Action::Start,
    ];

    /// Physical key bound to this action unless the config remaps it
    pub fn default_key(self) -> &'static str {
        match self {
            Action::Up => "ArrowUp",
            Action::Down => "ArrowDown",
            Action::Left => "ArrowLeft",
            Action::Right => "ArrowRight",
            Action::Fire => " ",
            Action::Pause => "p",
            Action::Start => "Enter",
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Compact set of logical actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSet(u8);

impl ActionSet {
    pub const EMPTY: ActionSet = ActionSet(0);

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn remove(&mut self, action: Action) {
        self.0 &= !action.bit();
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Logical action → physical key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    keys: [String; ACTION_COUNT],
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            keys: Action::ALL.map(|a| a.default_key().to_string()),
        }
    }
}

impl KeyMap {
    /// Defaults with the given actions remapped
    pub fn with_overrides(overrides: &BTreeMap<Action, String>) -> Self {
        let mut map = Self::default();
        for (action, key) in overrides {
            log::debug!("Remapping {:?}: {:?} -> {:?}", action, map.key(*action), key);
            map.keys[*action as usize] = key.clone();
        }
        map
    }

    /// Physical key bound to an action
    pub fn key(&self, action: Action) -> &str {
        &self.keys[action as usize]
    }

    /// Whether a key event's key is the one mapped to `action` (case-insensitive)
    pub fn matches(&self, action: Action, key: &str) -> bool {
        self.key(action).eq_ignore_ascii_case(key)
    }

    /// Every action bound to a physical key
    pub fn actions_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = Action> + 'a {
        Action::ALL.into_iter().filter(move |a| self.matches(*a, key))
    }
}

/// Discrete movement direction in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn to_vec2(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn action(self) -> Action {
        match self {
            Direction::Up => Action::Up,
            Direction::Down => Action::Down,
            Direction::Left => Action::Left,
            Direction::Right => Action::Right,
        }
    }

    /// Dominant axis of an offset picks the direction; ties go vertical
    pub fn from_offset(offset: Vec2) -> Direction {
        if offset.x.abs() > offset.y.abs() {
            if offset.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if offset.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

/// What a touch means relative to the game's reference entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchIntent {
    /// Steer toward the touch
    Move(Direction),
    /// Touch landed on (or very near) the reference entity: fire / interact
    Trigger,
}

/// Classify a touch offset (touch point minus reference point)
pub fn classify_touch(offset: Vec2, trigger_radius: f32) -> TouchIntent {
    if offset.x.abs() < trigger_radius && offset.y.abs() < trigger_radius {
        TouchIntent::Trigger
    } else {
        TouchIntent::Move(Direction::from_offset(offset))
    }
}

/// Keyboard and touch state for one engine
#[derive(Debug, Clone)]
pub struct InputMapper {
    keys: KeyMap,
    /// Raw physical keys currently down; only an explicit key-up clears one
    held: HashSet<String>,
    /// Directions held by an active touch
    touch: ActionSet,
    /// Actions pressed since the last logical tick (one-shot)
    latched: ActionSet,
    touch_radius: f32,
}

impl InputMapper {
    pub fn new(keys: KeyMap) -> Self {
        Self {
            keys,
            held: HashSet::new(),
            touch: ActionSet::EMPTY,
            latched: ActionSet::EMPTY,
            touch_radius: TOUCH_TRIGGER_RADIUS,
        }
    }

    pub fn keys(&self) -> &KeyMap {
        &self.keys
    }

    /// Raw key-down. Returns true when the host should suppress the browser default.
    pub fn key_down(&mut self, key: &str) -> bool {
        self.held.insert(key.to_string());
        for action in self.keys.actions_for(key) {
            self.latched.insert(action);
        }
        true
    }

    /// Raw key-up
    pub fn key_up(&mut self, key: &str) -> bool {
        self.held.retain(|k| !k.eq_ignore_ascii_case(key));
        true
    }

    /// Whether a key event is the mapped key for `action`
    pub fn is_action_pressed(&self, action: Action, key: &str) -> bool {
        self.keys.matches(action, key)
    }

    /// Whether a raw physical key is down (case-insensitive)
    pub fn is_key_held(&self, key: &str) -> bool {
        self.held.iter().any(|k| k.eq_ignore_ascii_case(key))
    }

    /// Whether an action is held, by its mapped key or by an active touch
    pub fn action_held(&self, action: Action) -> bool {
        self.touch.contains(action) || self.held.iter().any(|k| self.keys.matches(action, k))
    }

    /// Whether an action was pressed since the last logical tick
    pub fn action_triggered(&self, action: Action) -> bool {
        self.latched.contains(action)
    }

    /// -1, 0 or 1 along an axis made of two opposing actions
    pub fn axis(&self, negative: Action, positive: Action) -> f32 {
        let mut value = 0.0;
        if self.action_held(negative) {
            value -= 1.0;
        }
        if self.action_held(positive) {
            value += 1.0;
        }
        value
    }

    /// Touch began at `point`; `anchor` is the game's reference entity
    pub fn touch_start(&mut self, point: Vec2, anchor: Vec2) -> TouchIntent {
        let intent = classify_touch(point - anchor, self.touch_radius);
        self.touch.clear();
        match intent {
            TouchIntent::Move(dir) => {
                self.touch.insert(dir.action());
                self.latched.insert(dir.action());
            }
            TouchIntent::Trigger => self.latched.insert(Action::Fire),
        }
        intent
    }

    /// Touch moved; re-derives the held direction without re-triggering
    pub fn touch_move(&mut self, point: Vec2, anchor: Vec2) -> TouchIntent {
        let intent = classify_touch(point - anchor, self.touch_radius);
        self.touch.clear();
        if let TouchIntent::Move(dir) = intent {
            self.touch.insert(dir.action());
        }
        intent
    }

    pub fn touch_end(&mut self) {
        self.touch.clear();
    }

    /// Drop one-shot presses once a logical tick has consumed them
    pub fn end_tick(&mut self) {
        self.latched.clear();
    }
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new(KeyMap::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_key_map() {
        let keys = KeyMap::default();
        assert_eq!(keys.key(Action::Up), "ArrowUp");
        assert_eq!(keys.key(Action::Fire), " ");
        assert_eq!(keys.key(Action::Pause), "p");
        assert_eq!(keys.key(Action::Start), "Enter");
    }

    #[test]
    fn test_overrides_merge_over_defaults() {
        let mut overrides = BTreeMap::new();
        overrides.insert(Action::Up, "w".to_string());
        let keys = KeyMap::with_overrides(&overrides);
        assert_eq!(keys.key(Action::Up), "w");
        assert_eq!(keys.key(Action::Down), "ArrowDown");
    }

    #[test]
    fn test_action_pressed_is_case_insensitive() {
        let input = InputMapper::default();
        assert!(input.is_action_pressed(Action::Pause, "P"));
        assert!(input.is_action_pressed(Action::Pause, "p"));
        assert!(input.is_action_pressed(Action::Start, "enter"));
        assert!(!input.is_action_pressed(Action::Fire, "Enter"));
    }

    #[test]
    fn test_held_until_key_up() {
        let mut input = InputMapper::default();
        input.key_down("ArrowLeft");
        input.end_tick();
        assert!(input.action_held(Action::Left));
        assert!(!input.action_triggered(Action::Left));
        input.key_up("ArrowLeft");
        assert!(!input.action_held(Action::Left));
    }

    #[test]
    fn test_key_up_clears_either_case() {
        let mut input = InputMapper::default();
        input.key_down("P");
        assert!(input.is_key_held("p"));
        input.key_up("p");
        assert!(!input.is_key_held("P"));
    }

    #[test]
    fn test_axis() {
        let mut input = InputMapper::default();
        assert_eq!(input.axis(Action::Left, Action::Right), 0.0);
        input.key_down("ArrowRight");
        assert_eq!(input.axis(Action::Left, Action::Right), 1.0);
        input.key_down("ArrowLeft");
        assert_eq!(input.axis(Action::Left, Action::Right), 0.0);
    }

    #[test]
    fn test_touch_near_anchor_triggers_fire() {
        let mut input = InputMapper::default();
        let intent = input.touch_start(Vec2::new(110.0, 95.0), Vec2::new(100.0, 100.0));
        assert_eq!(intent, TouchIntent::Trigger);
        assert!(input.action_triggered(Action::Fire));
        assert!(!input.action_held(Action::Fire));
    }

    #[test]
    fn test_touch_direction_held_until_end() {
        let mut input = InputMapper::default();
        let intent = input.touch_start(Vec2::new(20.0, 110.0), Vec2::new(100.0, 100.0));
        assert_eq!(intent, TouchIntent::Move(Direction::Left));
        input.end_tick();
        assert!(input.action_held(Action::Left));

        input.touch_move(Vec2::new(100.0, 200.0), Vec2::new(100.0, 100.0));
        assert!(input.action_held(Action::Down));
        assert!(!input.action_held(Action::Left));
        assert!(!input.action_triggered(Action::Down));

        input.touch_end();
        assert!(!input.action_held(Action::Down));
    }

    #[test]
    fn test_direction_ties_go_vertical() {
        assert_eq!(Direction::from_offset(Vec2::new(50.0, 50.0)), Direction::Down);
        assert_eq!(Direction::from_offset(Vec2::new(-50.0, -50.0)), Direction::Up);
    }

    proptest! {
        #[test]
        fn prop_touch_classification(dx in -300.0f32..300.0, dy in -300.0f32..300.0) {
            let intent = classify_touch(Vec2::new(dx, dy), TOUCH_TRIGGER_RADIUS);
            if dx.abs() < TOUCH_TRIGGER_RADIUS && dy.abs() < TOUCH_TRIGGER_RADIUS {
                prop_assert_eq!(intent, TouchIntent::Trigger);
            } else {
                let TouchIntent::Move(dir) = intent else {
                    return Err(TestCaseError::fail("expected a move"));
                };
                let v = dir.to_vec2();
                // The chosen direction always points along the touch offset
                prop_assert!(v.x * dx + v.y * dy > 0.0);
            }
        }
    }
}
