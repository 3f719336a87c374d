//! Game loop engine
//!
//! `GameLoopEngine` owns one game, its input state and a `Host` that provides
//! frame scheduling and a drawing surface. The host calls `frame()` from its
//! animation-frame callback and forwards raw key/touch events; the engine
//! turns them into logical ticks, renders, and re-arms the next frame.

pub mod clock;

pub use clock::FrameClock;

use glam::Vec2;

use crate::config::EngineConfig;
use crate::input::{Action, InputMapper, TouchIntent};
use crate::render::RenderSink;
use crate::render::hud::draw_touch_hints;
use crate::sim::GamePhase;

/// Opaque id of a scheduled animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// What the engine needs from its environment
pub trait Host {
    /// Schedule one call to the engine's `frame()`. None if scheduling failed.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
    fn sink(&mut self) -> &mut dyn RenderSink;
    /// Remove the surface and every input listener. Called once, by `destroy()`.
    fn detach(&mut self);
}

/// Running/paused flags plus the pending frame.
///
/// `frame.is_some()` exactly when a frame is scheduled; `paused` implies `running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LifecycleState {
    pub running: bool,
    pub paused: bool,
    pub frame: Option<FrameHandle>,
}

/// One logical tick as seen by a game
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub input: &'a InputMapper,
    /// Seconds covered by this tick
    pub dt: f32,
    /// Ticks since the engine was built
    pub tick: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

/// A touch event in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub phase: TouchPhase,
    pub point: Vec2,
    /// Meaning relative to the game's touch anchor (None on `End`)
    pub intent: Option<TouchIntent>,
}

/// A game the engine can drive
pub trait Game {
    fn name(&self) -> &'static str;

    /// One logical tick. Only called while the phase is `Playing`.
    fn update(&mut self, frame: &Frame);

    fn render(&self, sink: &mut dyn RenderSink);

    /// Raw key press, after the input mapper has recorded it
    fn key_down(&mut self, _key: &str, _input: &InputMapper) {}

    fn touch(&mut self, _touch: &Touch) {}

    /// Reference point touches are measured from (usually the player)
    fn touch_anchor(&self) -> Vec2;

    fn phase(&self) -> GamePhase;

    /// Back to the start-of-game configuration
    fn restart(&mut self);

    /// Leave `LevelComplete` for the next level
    fn advance(&mut self) {
        self.restart();
    }

    /// Fixed logical tick length in seconds, for games slower than the frame rate
    fn tick_interval(&self) -> Option<f32> {
        None
    }
}

pub struct GameLoopEngine<H: Host> {
    game: Box<dyn Game>,
    host: H,
    input: InputMapper,
    config: EngineConfig,
    lifecycle: LifecycleState,
    clock: FrameClock,
    ticks: u64,
    destroyed: bool,
}

impl<H: Host> GameLoopEngine<H> {
    pub fn new(host: H, game: Box<dyn Game>, config: EngineConfig) -> Self {
        let input = InputMapper::new(config.key_map());
        log::info!(
            "Engine created for {} ({}x{})",
            game.name(),
            config.width,
            config.height
        );
        Self {
            game,
            host,
            input,
            config,
            lifecycle: LifecycleState::default(),
            clock: FrameClock::default(),
            ticks: 0,
            destroyed: false,
        }
    }

    pub fn start(&mut self) {
        if self.destroyed {
            log::warn!("start() on a destroyed engine ignored");
            return;
        }
        if self.lifecycle.running {
            return;
        }
        self.lifecycle.running = true;
        self.lifecycle.paused = false;
        self.clock.reset();
        log::info!("{} started", self.game.name());
        self.schedule();
    }

    pub fn stop(&mut self) {
        let was_running = self.lifecycle.running;
        self.lifecycle.running = false;
        self.lifecycle.paused = false;
        if let Some(handle) = self.lifecycle.frame.take() {
            self.host.cancel_frame(handle);
        }
        if was_running {
            log::info!("{} stopped", self.game.name());
        }
    }

    /// The pending frame is left alone; it sees `paused` and does not re-arm.
    pub fn pause(&mut self) {
        if !self.lifecycle.running || self.lifecycle.paused {
            return;
        }
        self.lifecycle.paused = true;
        log::info!("{} paused", self.game.name());
    }

    pub fn resume(&mut self) {
        if !self.lifecycle.running || !self.lifecycle.paused {
            return;
        }
        self.lifecycle.paused = false;
        self.clock.reset();
        log::info!("{} resumed", self.game.name());
        if self.lifecycle.frame.is_none() {
            self.schedule();
        }
    }

    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.stop();
        self.host.detach();
        self.destroyed = true;
        log::info!("{} destroyed", self.game.name());
    }

    /// Animation-frame callback. `timestamp` is in milliseconds.
    pub fn frame(&mut self, timestamp: f64) {
        self.lifecycle.frame = None;
        if !self.lifecycle.running || self.lifecycle.paused {
            return;
        }

        let dt = self.clock.advance(timestamp);
        self.update(dt);
        self.render();
        self.schedule();
    }

    fn update(&mut self, dt: f32) {
        let interval = self.game.tick_interval();
        let steps = self.clock.steps(dt, interval);
        let dt = interval.unwrap_or(dt);
        for _ in 0..steps {
            if self.game.phase().is_terminal() {
                break;
            }
            let frame = Frame {
                input: &self.input,
                dt,
                tick: self.ticks,
            };
            self.game.update(&frame);
            self.ticks += 1;
            self.input.end_tick();
        }
    }

    fn render(&mut self) {
        let sink = self.host.sink();
        self.game.render(sink);
        if self.config.use_mobile {
            draw_touch_hints(sink, self.game.touch_anchor());
        }
    }

    fn schedule(&mut self) {
        match self.host.request_frame() {
            Some(handle) => self.lifecycle.frame = Some(handle),
            None => log::warn!("Frame request failed; loop halted"),
        }
    }

    /// Raw key press. Returns true when the default browser action should be
    /// suppressed.
    pub fn key_down(&mut self, key: &str) -> bool {
        if !self.config.use_keyboard {
            return false;
        }
        let handled = self.input.key_down(key);
        if !self.lifecycle.running {
            return handled;
        }

        if self.input.is_action_pressed(Action::Pause, key) {
            if self.lifecycle.paused {
                self.resume();
            } else {
                self.pause();
            }
        } else if !self.lifecycle.paused {
            if self.input.is_action_pressed(Action::Start, key) && self.game.phase().is_terminal() {
                self.restart_round();
            } else {
                self.game.key_down(key, &self.input);
            }
        }
        handled
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        if !self.config.use_keyboard {
            return false;
        }
        self.input.key_up(key)
    }

    /// Touch began at `point` (surface coordinates)
    pub fn touch_start(&mut self, point: Vec2) -> bool {
        if !self.config.use_mobile {
            return false;
        }
        if !self.lifecycle.running || self.lifecycle.paused {
            return true;
        }
        if self.game.phase().is_terminal() {
            self.restart_round();
            return true;
        }
        let intent = self.input.touch_start(point, self.game.touch_anchor());
        self.game.touch(&Touch {
            phase: TouchPhase::Start,
            point,
            intent: Some(intent),
        });
        true
    }

    pub fn touch_move(&mut self, point: Vec2) -> bool {
        if !self.config.use_mobile {
            return false;
        }
        if !self.lifecycle.running || self.lifecycle.paused {
            return true;
        }
        let intent = self.input.touch_move(point, self.game.touch_anchor());
        self.game.touch(&Touch {
            phase: TouchPhase::Move,
            point,
            intent: Some(intent),
        });
        true
    }

    pub fn touch_end(&mut self, point: Vec2) -> bool {
        if !self.config.use_mobile {
            return false;
        }
        self.input.touch_end();
        if self.lifecycle.running && !self.lifecycle.paused {
            self.game.touch(&Touch {
                phase: TouchPhase::End,
                point,
                intent: None,
            });
        }
        true
    }

    fn restart_round(&mut self) {
        match self.game.phase() {
            GamePhase::LevelComplete => {
                log::info!("{}: next level", self.game.name());
                self.game.advance();
            }
            GamePhase::GameOver | GamePhase::Won => {
                log::info!("{}: restart", self.game.name());
                self.game.restart();
            }
            GamePhase::Playing => {}
        }
        self.input.end_tick();
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.running
    }

    pub fn is_paused(&self) -> bool {
        self.lifecycle.paused
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn game(&self) -> &dyn Game {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> &mut dyn Game {
        self.game.as_mut()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn input(&self) -> &InputMapper {
        &self.input
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn fps(&self) -> u32 {
        self.clock.fps()
    }

    /// Logical ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
