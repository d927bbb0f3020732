//! Starfield - landing page background and arcade mini-game
//!
//! Core modules:
//! - `sim`: Simulation state, spawner and per-tick update (no rendering, no platform)
//! - `renderer`: Read-only draw pass over a `Canvas` drawing surface
//! - `engine`: Frame driver that owns one simulation and its collaborators
//! - `portrait`: Drag-inertia controller for the spinnable portrait
//! - `analytics` / `audio` / `navigation`: injected fire-and-forget side channels
//! - `settings`: Engine configuration and persisted user preferences

pub mod analytics;
pub mod audio;
pub mod engine;
pub mod error;
pub mod navigation;
pub mod portrait;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use engine::{Collaborators, Engine, FrameOutcome};
pub use settings::{EngineConfig, GameMode, Settings};

use glam::Vec2;

/// Simulation tuning constants. All per-tick quantities assume one tick per frame.
pub mod consts {
    /// Stars seeded on mount and on every resize
    pub const STAR_COUNT: usize = 300;
    /// Star depth range [min, max)
    pub const STAR_DEPTH_MIN: f32 = 1.0;
    pub const STAR_DEPTH_MAX: f32 = 4.0;
    /// Star opacity range [min, max)
    pub const STAR_OPACITY_MIN: f32 = 0.1;
    pub const STAR_OPACITY_MAX: f32 = 0.4;
    /// Downward drift per tick per unit of depth
    pub const STAR_DRIFT: f32 = 0.1;
    /// Wrapped stars re-enter this far above the top edge
    pub const STAR_WRAP_Y: f32 = -5.0;
    /// Parallax offset per unit of depth at the canvas edge
    pub const STAR_PARALLAX: f32 = 10.0;

    /// Shooting star lifetime in ticks
    pub const SHOOTING_STAR_LIFE: f32 = 60.0;
    /// Spawn interval range in ms [min, max)
    pub const SHOOTING_STAR_INTERVAL_MS: (f64, f64) = (5000.0, 15000.0);
    /// Spawn point distance outside the edge
    pub const SHOOTING_STAR_EDGE_OFFSET: f32 = 20.0;
    /// Culled once this far outside the canvas
    pub const SHOOTING_STAR_CULL_MARGIN: f32 = 50.0;
    /// Trail length as a multiple of velocity
    pub const SHOOTING_STAR_TRAIL: f32 = 5.0;

    /// Spaceship speed (units per tick)
    pub const SHIP_SPEED: f32 = 1.0;
    /// Ship holds still once this close to its target
    pub const SHIP_ARRIVE_RADIUS: f32 = 1.0;
    /// Fraction of the remaining heading difference applied per tick
    pub const SHIP_TURN_RATE: f32 = 0.05;
    /// Distance from ship center to its nose
    pub const SHIP_NOSE: f32 = 10.0;

    /// Minimum time between shots
    pub const FIRE_INTERVAL_MS: f64 = 150.0;
    /// Projectile speed (units per tick)
    pub const PROJECTILE_SPEED: f32 = 8.0;
    /// Projectile draw radius
    pub const PROJECTILE_RADIUS: f32 = 2.0;

    /// Target spawn interval range in ms [min, max)
    pub const TARGET_INTERVAL_MS: (f64, f64) = (3000.0, 6000.0);
    /// Timed spawns stop while this many targets are alive
    pub const MAX_LIVE_TARGETS: usize = 4;
    /// Destination inset from every edge
    pub const TARGET_MARGIN: f32 = 40.0;
    /// Source offset outside the edge [min, max)
    pub const TARGET_SOURCE_OFFSET: (f32, f32) = (40.0, 50.0);
    pub const TARGET_RADIUS: f32 = 20.0;
    /// Entrance animation progress per tick
    pub const TARGET_ENTRANCE_STEP: f32 = 0.01;

    /// 1-indexed cumulative spawn numbers that produce a boss
    pub const BOSS_SPAWN_NUMBERS: [u32; 2] = [50, 80];
    pub const BOSS_RADIUS: f32 = 30.0;
    pub const BOSS_HP: u32 = 30;
    /// Blink duration after a boss takes a hit
    pub const BOSS_HIT_FLASH_TICKS: u32 = 6;
    /// Targets spawned immediately when a boss dies
    pub const BOSS_REPLACEMENTS: usize = 10;
    /// Targets spawned immediately when the field is cleared
    pub const FIELD_CLEAR_REPLACEMENTS: usize = 4;

    /// Default kill goal and redirect for game mode
    pub const DEFAULT_TARGET_GOAL: f64 = 100.0;
    pub const DEFAULT_REDIRECT_PATH: &str = "/guestbook";
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Normalize an angle to (-π, π]
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Signed shortest rotation that takes `from` onto `to`, in (-π, π]
#[inline]
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Unit vector pointing along `angle`
#[inline]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn test_distance() {
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_shortest_delta_wraps() {
        // From just below +π to just above -π is a small positive turn
        let d = shortest_angle_delta(PI - 0.1, -PI + 0.1);
        assert!((d - 0.2).abs() < 1e-5);
    }
}
