//! Frame driver
//!
//! One `Engine` per mounted canvas. The host calls `frame` once per display
//! refresh; the engine ticks, dispatches side effects, draws and reports
//! whether the host should schedule another frame.

use glam::Vec2;

use crate::analytics::{AnalyticsEvent, AnalyticsSink, NullSink};
use crate::audio::{Silent, SoundPlayer};
use crate::error::SurfaceError;
use crate::navigation::{LogNavigator, Navigator};
use crate::renderer::{self, Canvas};
use crate::settings::EngineConfig;
use crate::sim::{self, Random, SimState};

/// Seed used when the config names none
pub const DEFAULT_SEED: u64 = 0x5EED_0F_5747;

/// Injected side channels
pub struct Collaborators {
    pub analytics: Box<dyn AnalyticsSink>,
    pub sound: Box<dyn SoundPlayer>,
    pub navigator: Box<dyn Navigator>,
}

impl Collaborators {
    /// No sound, no analytics, navigation only logged
    pub fn silent() -> Self {
        Self {
            analytics: Box::new(NullSink),
            sound: Box::new(Silent),
            navigator: Box::new(LogNavigator),
        }
    }
}

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule the next frame
    Continue,
    /// Surface unavailable; nothing ran, schedule the next frame anyway
    Skipped,
    /// Goal reached and navigation requested; stop scheduling
    Finished,
    /// Torn down; stop scheduling
    Stopped,
}

impl FrameOutcome {
    pub fn keep_running(&self) -> bool {
        matches!(self, FrameOutcome::Continue | FrameOutcome::Skipped)
    }
}

pub struct Engine {
    state: SimState,
    config: EngineConfig,
    goal: u32,
    rng: Box<dyn Random>,
    collab: Collaborators,
    goal_latched: bool,
    torn_down: bool,
}

impl Engine {
    /// Engine seeded from `config.seed`
    pub fn new(config: EngineConfig, size: Vec2, collab: Collaborators) -> Self {
        let seed = config.seed.unwrap_or(DEFAULT_SEED);
        Self::with_random(config, size, Box::new(sim::seeded(seed)), collab)
    }

    /// Engine drawing from an explicit random source
    pub fn with_random(
        config: EngineConfig,
        size: Vec2,
        mut rng: Box<dyn Random>,
        collab: Collaborators,
    ) -> Self {
        let goal = config.goal();
        let state = SimState::new(config.mode, size, config.star_count, rng.as_mut());
        log::info!(
            "Engine created: mode={} goal={} seed={:?} size={}x{}",
            config.mode.as_str(),
            goal,
            config.seed,
            size.x,
            size.y
        );
        Self {
            state,
            config,
            goal,
            rng,
            collab,
            goal_latched: false,
            torn_down: false,
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Mutable state access for hosts that script entities directly
    pub fn state_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Sanitised kill goal
    pub fn goal(&self) -> u32 {
        self.goal
    }

    pub fn kills(&self) -> u32 {
        self.state.kills
    }

    pub fn is_finished(&self) -> bool {
        self.goal_latched
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Surface resized: re-seed stars, re-center the ship
    pub fn resize(&mut self, size: Vec2) {
        if self.torn_down {
            return;
        }
        log::debug!("Resize to {}x{}", size.x, size.y);
        self.state.resize(size, self.rng.as_mut());
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        if self.torn_down {
            return;
        }
        self.state.set_pointer(pos);
    }

    /// Fire button pressed (game mode only)
    pub fn pointer_down(&mut self) {
        if self.torn_down || !self.state.mode.is_game() || self.state.firing {
            return;
        }
        self.state.firing = true;
        self.collab.analytics.notify(&AnalyticsEvent::ShootingStart);
    }

    /// Fire button released or pointer left the surface
    pub fn pointer_up(&mut self) {
        if self.torn_down || !self.state.firing {
            return;
        }
        self.state.firing = false;
        self.collab.analytics.notify(&AnalyticsEvent::ShootingEnd);
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.state.reduced_motion = reduced;
    }

    /// Forward a page-level analytics event through the injected sink
    pub fn report(&mut self, event: &AnalyticsEvent) {
        self.collab.analytics.notify(event);
    }

    /// Run one frame at wall-clock `now` (ms) on `surface`
    pub fn frame(
        &mut self,
        now: f64,
        surface: Result<&mut dyn Canvas, SurfaceError>,
    ) -> FrameOutcome {
        if self.torn_down {
            return FrameOutcome::Stopped;
        }
        if self.goal_latched {
            return FrameOutcome::Finished;
        }
        let canvas = match surface {
            Ok(canvas) => canvas,
            Err(e) => {
                log::trace!("Frame skipped: {e}");
                return FrameOutcome::Skipped;
            }
        };

        sim::tick(&mut self.state, self.rng.as_mut(), now);
        self.dispatch_events();
        renderer::render(&self.state, self.goal, canvas);

        if self.state.mode.is_game() && self.state.kills >= self.goal {
            self.finish();
            return FrameOutcome::Finished;
        }
        FrameOutcome::Continue
    }

    /// Stop for good; later frames and input are ignored
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.state.firing = false;
        self.state.drain_events();
        log::debug!("Engine torn down after {} ticks", self.state.time_ticks);
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            if let Some(effect) = event.sound() {
                self.collab.sound.play(effect);
            }
            self.collab.analytics.notify(&AnalyticsEvent::from(event));
        }
    }

    fn finish(&mut self) {
        self.goal_latched = true;
        self.state.firing = false;
        log::info!(
            "Goal reached: {}/{}, navigating to {}",
            self.state.kills,
            self.goal,
            self.config.redirect_path
        );
        self.collab.analytics.notify(&AnalyticsEvent::GoalReached {
            kills: self.state.kills,
            goal: self.goal,
        });
        self.collab.navigator.navigate(&self.config.redirect_path);
    }
}
