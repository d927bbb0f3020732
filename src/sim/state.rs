//! Simulation state and entity types
//!
//! One `SimState` per mounted engine. Every entity is a plain value owned by
//! its collection; nothing outside the engine holds on to one between ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::rng::Random;
use super::spawn;
use crate::consts::*;
use crate::settings::GameMode;
use crate::{heading_vector, lerp, normalize_angle, shortest_angle_delta};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A background star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    /// Depth in [1, 4); fixed for the star's lifetime
    pub depth: f32,
    /// Opacity in [0.1, 0.4)
    pub opacity: f32,
}

impl Star {
    /// Drift down by depth; wrap to the top once past `height`.
    /// Returns true if the star wrapped (caller picks the new x).
    pub fn drift(&mut self, height: f32) -> bool {
        self.pos.y += self.depth * STAR_DRIFT;
        if self.pos.y > height {
            self.pos.y = STAR_WRAP_Y;
            true
        } else {
            false
        }
    }
}

/// A short-lived streak crossing the sky
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShootingStar {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
}

impl ShootingStar {
    /// Remaining life ratio (1 = fresh)
    pub fn fade(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    pub fn out_of_bounds(&self, size: Vec2) -> bool {
        let m = SHOOTING_STAR_CULL_MARGIN;
        self.pos.x < -m || self.pos.x > size.x + m || self.pos.y < -m || self.pos.y > size.y + m
    }
}

/// The player's ship
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spaceship {
    pub pos: Vec2,
    /// Pointer-set steering target
    pub target: Vec2,
    /// Heading in radians
    pub angle: f32,
}

impl Spaceship {
    /// Park at `pos` with the target on top of it
    pub fn park(&mut self, pos: Vec2) {
        self.pos = pos;
        self.target = pos;
    }

    /// Move one tick toward the target at constant speed and turn toward it
    pub fn steer(&mut self) {
        let to_target = self.target - self.pos;
        let dist = to_target.length();
        if dist < SHIP_ARRIVE_RADIUS {
            return;
        }

        let step = SHIP_SPEED.min(dist);
        self.pos += to_target / dist * step;

        let bearing = to_target.y.atan2(to_target.x);
        let turn = shortest_angle_delta(self.angle, bearing) * SHIP_TURN_RATE;
        self.angle = normalize_angle(self.angle + turn);
    }

    /// Unit vector along the heading
    pub fn forward(&self) -> Vec2 {
        heading_vector(self.angle)
    }

    /// Muzzle position
    pub fn nose(&self) -> Vec2 {
        self.pos + self.forward() * SHIP_NOSE
    }
}

/// A shot fired by the ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Projectile {
    pub fn in_bounds(&self, size: Vec2) -> bool {
        self.pos.x >= 0.0 && self.pos.x <= size.x && self.pos.y >= 0.0 && self.pos.y <= size.y
    }
}

/// Boss-only state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossStatus {
    pub hp: u32,
    pub max_hp: u32,
    /// Blink countdown in ticks after a hit
    pub hit_flash: u32,
}

impl BossStatus {
    pub fn new(max_hp: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            hit_flash: 0,
        }
    }

    /// Remaining hp ratio (1 = untouched)
    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }

    /// Blink phase: hidden on odd flash ticks
    pub fn blink_hidden(&self) -> bool {
        self.hit_flash > 0 && self.hit_flash % 2 == 1
    }
}

/// Result of a projectile hitting a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Target is gone
    Destroyed,
    /// Boss survived with `hp` left
    Damaged { hp: u32 },
}

/// Something to shoot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub pos: Vec2,
    /// Fixed at creation
    pub radius: f32,
    /// Entrance animation progress in [0, 1]
    pub progress: f32,
    /// Spawn point outside the canvas
    pub source: Vec2,
    /// Resting point inside the canvas
    pub destination: Vec2,
    /// Present only for bosses
    pub boss: Option<BossStatus>,
}

impl Target {
    pub fn normal(source: Vec2, destination: Vec2) -> Self {
        Self {
            pos: source,
            radius: TARGET_RADIUS,
            progress: 0.0,
            source,
            destination,
            boss: None,
        }
    }

    pub fn boss(source: Vec2, destination: Vec2) -> Self {
        Self {
            radius: BOSS_RADIUS,
            boss: Some(BossStatus::new(BOSS_HP)),
            ..Self::normal(source, destination)
        }
    }

    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    /// Advance the entrance animation and tick down the hit flash
    pub fn advance_entrance(&mut self) {
        if self.progress < 1.0 {
            self.progress = (self.progress + TARGET_ENTRANCE_STEP).min(1.0);
            self.pos = Vec2::new(
                lerp(self.source.x, self.destination.x, self.progress),
                lerp(self.source.y, self.destination.y, self.progress),
            );
        }
        if let Some(boss) = self.boss.as_mut() {
            boss.hit_flash = boss.hit_flash.saturating_sub(1);
        }
    }

    /// Apply one projectile hit
    pub fn take_hit(&mut self) -> HitOutcome {
        match self.boss.as_mut() {
            None => HitOutcome::Destroyed,
            Some(boss) => {
                boss.hp = boss.hp.saturating_sub(1);
                boss.hit_flash = BOSS_HIT_FLASH_TICKS;
                if boss.hp == 0 {
                    HitOutcome::Destroyed
                } else {
                    HitOutcome::Damaged { hp: boss.hp }
                }
            }
        }
    }
}

/// Particle behaviour class; fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Moves linearly
    Classic,
    /// Fast, shrinking, slight downward drag
    Spark,
    /// Slow, larger, gentler drag
    Ember,
    /// Stationary, growing shockwave outline
    Ring,
}

impl ParticleKind {
    /// Multiplicative velocity drag per tick
    pub fn drag(&self) -> f32 {
        match self {
            ParticleKind::Spark => 0.92,
            ParticleKind::Ember => 0.96,
            ParticleKind::Classic | ParticleKind::Ring => 1.0,
        }
    }

    /// Constant downward bias per tick
    pub fn gravity(&self) -> f32 {
        match self {
            ParticleKind::Spark => 0.05,
            ParticleKind::Ember => 0.02,
            ParticleKind::Classic | ParticleKind::Ring => 0.0,
        }
    }

    /// Multiplicative size change per tick
    pub fn size_decay(&self) -> f32 {
        match self {
            ParticleKind::Spark => 0.96,
            ParticleKind::Ember => 0.98,
            ParticleKind::Classic | ParticleKind::Ring => 1.0,
        }
    }

    /// Smallest size a shrinking particle reaches
    pub fn min_size(&self) -> f32 {
        match self {
            ParticleKind::Spark => 0.5,
            ParticleKind::Ember => 0.8,
            ParticleKind::Classic | ParticleKind::Ring => 0.0,
        }
    }
}

/// Ring growth per tick
pub const RING_GROWTH: f32 = 1.5;

/// A visual particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: Rgb,
    pub kind: ParticleKind,
}

impl Particle {
    /// Remaining life ratio (1 = fresh)
    pub fn fade(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }

    /// Advance one tick. Returns false once expired.
    pub fn update(&mut self) -> bool {
        match self.kind {
            ParticleKind::Classic => {
                self.pos += self.vel;
            }
            ParticleKind::Spark | ParticleKind::Ember => {
                self.vel *= self.kind.drag();
                self.vel.y += self.kind.gravity();
                self.pos += self.vel;
                self.size = (self.size * self.kind.size_decay()).max(self.kind.min_size());
            }
            ParticleKind::Ring => {
                self.size += RING_GROWTH;
            }
        }
        self.life -= 1.0;
        self.life > 0.0
    }
}

/// Spawn gate bookkeeping (timestamps in ms)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub last_shot: Option<f64>,
    pub last_shooting_star: Option<f64>,
    /// Delay drawn at the previous shooting star spawn
    pub shooting_star_delay: f64,
    pub last_target: Option<f64>,
    /// Delay drawn at the previous target spawn
    pub target_delay: f64,
}

impl SpawnTimers {
    pub fn shooting_star_due(&self, now: f64) -> bool {
        self.last_shooting_star
            .is_none_or(|last| now - last >= self.shooting_star_delay)
    }

    pub fn target_due(&self, now: f64) -> bool {
        self.last_target
            .is_none_or(|last| now - last >= self.target_delay)
    }

    pub fn shot_ready(&self, now: f64) -> bool {
        self.last_shot
            .is_none_or(|last| now - last >= FIRE_INTERVAL_MS)
    }
}

/// Complete simulation state for one mounted engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub mode: GameMode,
    /// Drawing surface size
    pub size: Vec2,
    pub stars: Vec<Star>,
    pub shooting_stars: Vec<ShootingStar>,
    pub ship: Spaceship,
    pub projectiles: Vec<Projectile>,
    pub targets: Vec<Target>,
    pub particles: Vec<Particle>,
    /// Last pointer position on the surface
    pub pointer: Vec2,
    /// Fire button held
    pub firing: bool,
    /// Cumulative destroyed targets (never decreases)
    pub kills: u32,
    /// Cumulative spawned targets (never decreases)
    pub spawned: u32,
    pub timers: SpawnTimers,
    /// No shooting stars, no parallax
    pub reduced_motion: bool,
    /// Ticks run so far
    pub time_ticks: u64,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    star_count: usize,
}

impl SimState {
    /// Fresh state sized to the surface, stars seeded, ship centered
    pub fn new(mode: GameMode, size: Vec2, star_count: usize, rng: &mut dyn Random) -> Self {
        let mut state = Self {
            mode,
            size,
            stars: Vec::with_capacity(star_count),
            shooting_stars: Vec::new(),
            ship: Spaceship::default(),
            projectiles: Vec::new(),
            targets: Vec::new(),
            particles: Vec::new(),
            pointer: size / 2.0,
            firing: false,
            kills: 0,
            spawned: 0,
            timers: SpawnTimers::default(),
            reduced_motion: false,
            time_ticks: 0,
            events: Vec::new(),
            star_count,
        };
        state.resize(size, rng);
        state
    }

    /// New surface size: re-seed stars and re-center the ship's rest position
    pub fn resize(&mut self, size: Vec2, rng: &mut dyn Random) {
        self.size = size;
        self.stars = spawn::seed_stars(size, self.star_count, rng);
        self.ship.park(size / 2.0);
    }

    /// Pointer moved; in game mode the ship steers toward it
    pub fn set_pointer(&mut self, pos: Vec2) {
        self.pointer = pos;
        if self.mode.is_game() {
            self.ship.target = pos;
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ReplayRandom;

    #[test]
    fn test_new_state_seeds_and_centers() {
        let mut rng = ReplayRandom::constant(0.5);
        let state = SimState::new(GameMode::Game, Vec2::new(800.0, 600.0), 300, &mut rng);
        assert_eq!(state.stars.len(), 300);
        assert_eq!(state.ship.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.ship.target, state.ship.pos);
        assert_eq!(state.kills, 0);
    }

    #[test]
    fn test_ship_moves_at_unit_speed() {
        let mut ship = Spaceship::default();
        ship.park(Vec2::ZERO);
        ship.target = Vec2::new(10.0, 0.0);
        ship.steer();
        assert!((ship.pos.x - 1.0).abs() < 1e-6);
        assert_eq!(ship.pos.y, 0.0);
    }

    #[test]
    fn test_ship_holds_when_close() {
        let mut ship = Spaceship::default();
        ship.park(Vec2::new(5.0, 5.0));
        ship.target = Vec2::new(5.5, 5.0);
        ship.steer();
        assert_eq!(ship.pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_ship_turns_shortest_way() {
        let mut ship = Spaceship {
            pos: Vec2::ZERO,
            target: Vec2::new(-100.0, -1.0),
            angle: std::f32::consts::PI - 0.1,
        };
        ship.steer();
        // Bearing is just past -π, so the short way round is counter-clockwise
        assert!(ship.angle > std::f32::consts::PI - 0.1);
    }

    #[test]
    fn test_ship_heading_wraps_across_pi() {
        use std::f32::consts::PI;
        let mut ship = Spaceship {
            pos: Vec2::ZERO,
            target: Vec2::new(-100.0, -1.0),
            angle: PI - 0.01,
        };
        for _ in 0..500 {
            ship.pos = Vec2::ZERO;
            ship.steer();
            assert!(ship.angle > -PI && ship.angle <= PI);
        }
        // Settled on the bearing just past -π
        assert!(ship.angle < 0.0);
    }

    #[test]
    fn test_boss_hit_flash_and_death() {
        let mut target = Target::boss(Vec2::ZERO, Vec2::ONE);
        for _ in 0..BOSS_HP - 1 {
            assert!(matches!(target.take_hit(), HitOutcome::Damaged { .. }));
        }
        assert_eq!(target.boss.unwrap().hit_flash, BOSS_HIT_FLASH_TICKS);
        assert_eq!(target.take_hit(), HitOutcome::Destroyed);
    }

    #[test]
    fn test_entrance_clamps_at_one() {
        let mut target = Target::normal(Vec2::ZERO, Vec2::new(100.0, 0.0));
        for _ in 0..150 {
            target.advance_entrance();
        }
        assert_eq!(target.progress, 1.0);
        assert_eq!(target.pos, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_ring_stays_put_and_grows() {
        let mut ring = Particle {
            pos: Vec2::new(3.0, 4.0),
            vel: Vec2::ZERO,
            life: 2.0,
            max_life: 2.0,
            size: 4.0,
            color: Rgb(255, 255, 255),
            kind: ParticleKind::Ring,
        };
        assert!(ring.update());
        assert_eq!(ring.pos, Vec2::new(3.0, 4.0));
        assert!(ring.size > 4.0);
        assert!(!ring.update());
    }

    #[test]
    fn test_spark_shrinks_to_floor() {
        let mut spark = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(4.0, 0.0),
            life: 500.0,
            max_life: 500.0,
            size: 3.0,
            color: Rgb(255, 255, 255),
            kind: ParticleKind::Spark,
        };
        for _ in 0..400 {
            spark.update();
        }
        assert_eq!(spark.size, ParticleKind::Spark.min_size());
        assert!(spark.vel.y > 0.0);
    }
}
