//! Spawner
//!
//! Time-gated creation of shooting stars and targets, replacement waves, and
//! explosion bursts on target destruction.

use std::f32::consts::TAU;

use glam::Vec2;

use super::events::GameEvent;
use super::rng::Random;
use super::state::{Particle, ParticleKind, Rgb, ShootingStar, SimState, Star, Target};
use crate::consts::*;
use crate::heading_vector;

/// Burst colors per particle kind
#[derive(Debug, Clone, Copy)]
pub struct BurstPalette {
    pub classic: Rgb,
    pub spark: Rgb,
    pub ember: Rgb,
    pub ring: Rgb,
}

pub const NORMAL_BURST: BurstPalette = BurstPalette {
    classic: Rgb(96, 165, 250),
    spark: Rgb(191, 219, 254),
    ember: Rgb(251, 146, 60),
    ring: Rgb(147, 197, 253),
};

pub const BOSS_BURST: BurstPalette = BurstPalette {
    classic: Rgb(248, 113, 113),
    spark: Rgb(254, 202, 202),
    ember: Rgb(249, 115, 22),
    ring: Rgb(252, 165, 165),
};

/// Random stars covering the surface
pub fn seed_stars(size: Vec2, count: usize, rng: &mut dyn Random) -> Vec<Star> {
    (0..count)
        .map(|_| Star {
            pos: Vec2::new(rng.unit() * size.x, rng.unit() * size.y),
            depth: rng.range(STAR_DEPTH_MIN, STAR_DEPTH_MAX),
            opacity: rng.range(STAR_OPACITY_MIN, STAR_OPACITY_MAX),
        })
        .collect()
}

/// A shooting star entering from a random edge, heading inward
pub fn shooting_star(size: Vec2, rng: &mut dyn Random) -> ShootingStar {
    let off = SHOOTING_STAR_EDGE_OFFSET;
    let (pos, vel) = match rng.index(4) {
        // top
        0 => (
            Vec2::new(rng.unit() * size.x, -off),
            Vec2::new((rng.unit() - 0.5) * 4.0, rng.range(2.0, 5.0)),
        ),
        // right
        1 => (
            Vec2::new(size.x + off, rng.unit() * size.y),
            Vec2::new(-rng.range(2.0, 5.0), (rng.unit() - 0.5) * 4.0),
        ),
        // bottom
        2 => (
            Vec2::new(rng.unit() * size.x, size.y + off),
            Vec2::new((rng.unit() - 0.5) * 4.0, -rng.range(2.0, 5.0)),
        ),
        // left
        _ => (
            Vec2::new(-off, rng.unit() * size.y),
            Vec2::new(rng.range(2.0, 5.0), (rng.unit() - 0.5) * 4.0),
        ),
    };

    ShootingStar {
        pos,
        vel,
        life: SHOOTING_STAR_LIFE,
        max_life: SHOOTING_STAR_LIFE,
    }
}

/// Point on a random edge, `offset` outside the surface
fn edge_source(size: Vec2, rng: &mut dyn Random) -> Vec2 {
    let (lo, hi) = TARGET_SOURCE_OFFSET;
    let side = rng.index(4);
    let along = rng.unit();
    let offset = rng.range(lo, hi);
    match side {
        0 => Vec2::new(along * size.x, -offset),
        1 => Vec2::new(size.x + offset, along * size.y),
        2 => Vec2::new(along * size.x, size.y + offset),
        _ => Vec2::new(-offset, along * size.y),
    }
}

/// Random interior point inset by the target margin
fn interior_destination(size: Vec2, rng: &mut dyn Random) -> Vec2 {
    let m = TARGET_MARGIN;
    let span = (size - Vec2::splat(2.0 * m)).max(Vec2::ZERO);
    Vec2::new(m + rng.unit() * span.x, m + rng.unit() * span.y)
}

/// Whether the Nth cumulative spawn (1-indexed) is a boss
pub fn is_boss_spawn(spawn_number: u32) -> bool {
    BOSS_SPAWN_NUMBERS.contains(&spawn_number)
}

/// Spawn one target (boss on the designated spawn numbers)
pub fn spawn_target(state: &mut SimState, rng: &mut dyn Random) {
    state.spawned += 1;
    let number = state.spawned;

    let source = edge_source(state.size, rng);
    let destination = interior_destination(state.size, rng);

    if is_boss_spawn(number) {
        log::info!("Boss incoming (spawn #{number})");
        state.targets.push(Target::boss(source, destination));
        state.events.push(GameEvent::BossSpawned {
            spawn_index: number,
            hp: BOSS_HP,
        });
    } else {
        state.targets.push(Target::normal(source, destination));
        state.events.push(GameEvent::TargetSpawned {
            spawn_index: number,
        });
    }
}

/// Spawn `count` targets at once and restart the target gate at `now`
pub fn spawn_replacements(state: &mut SimState, rng: &mut dyn Random, count: usize, now: f64) {
    for _ in 0..count {
        spawn_target(state, rng);
    }
    state.timers.last_target = Some(now);
}

/// Explosion burst at `pos`: either a classic ring of 10 or a spark/ember/ring mix
pub fn explosion(
    particles: &mut Vec<Particle>,
    pos: Vec2,
    palette: &BurstPalette,
    rng: &mut dyn Random,
) {
    if rng.chance(0.5) {
        classic_burst(particles, pos, palette, rng);
    } else {
        shockwave_burst(particles, pos, palette, rng);
    }
}

fn classic_burst(
    particles: &mut Vec<Particle>,
    pos: Vec2,
    palette: &BurstPalette,
    rng: &mut dyn Random,
) {
    for i in 0..10 {
        let angle = TAU * i as f32 / 10.0;
        let speed = rng.range(1.0, 4.0);
        particles.push(Particle {
            pos,
            vel: heading_vector(angle) * speed,
            life: 30.0,
            max_life: 30.0,
            size: 2.0,
            color: palette.classic,
            kind: ParticleKind::Classic,
        });
    }
}

fn shockwave_burst(
    particles: &mut Vec<Particle>,
    pos: Vec2,
    palette: &BurstPalette,
    rng: &mut dyn Random,
) {
    for _ in 0..20 {
        let angle = rng.unit() * TAU;
        let speed = rng.range(2.0, 6.0);
        particles.push(Particle {
            pos,
            vel: heading_vector(angle) * speed,
            life: 30.0,
            max_life: 30.0,
            size: rng.range(1.5, 3.0),
            color: palette.spark,
            kind: ParticleKind::Spark,
        });
    }

    for _ in 0..12 {
        let angle = rng.unit() * TAU;
        let speed = rng.range(0.5, 2.5);
        particles.push(Particle {
            pos,
            vel: heading_vector(angle) * speed,
            life: 45.0,
            max_life: 45.0,
            size: rng.range(2.5, 4.0),
            color: palette.ember,
            kind: ParticleKind::Ember,
        });
    }

    particles.push(Particle {
        pos,
        vel: Vec2::ZERO,
        life: 25.0,
        max_life: 25.0,
        size: 4.0,
        color: palette.ring,
        kind: ParticleKind::Ring,
    });
}

/// Evaluate the time gates for shooting stars and (in game mode) targets
pub fn run_gates(state: &mut SimState, rng: &mut dyn Random, now: f64) {
    if !state.reduced_motion && state.timers.shooting_star_due(now) {
        let star = shooting_star(state.size, rng);
        state.shooting_stars.push(star);
        state.timers.last_shooting_star = Some(now);
        state.timers.shooting_star_delay = rng.interval(SHOOTING_STAR_INTERVAL_MS);
    }

    if state.mode.is_game()
        && state.targets.len() < MAX_LIVE_TARGETS
        && state.timers.target_due(now)
    {
        spawn_target(state, rng);
        state.timers.last_target = Some(now);
        state.timers.target_delay = rng.interval(TARGET_INTERVAL_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameMode;
    use crate::sim::rng::{ReplayRandom, seeded};

    fn game_state() -> (SimState, ReplayRandom) {
        let mut rng = ReplayRandom::new(vec![0.1, 0.6, 0.3, 0.9, 0.45]);
        let state = SimState::new(GameMode::Game, Vec2::new(800.0, 600.0), 10, &mut rng);
        (state, rng)
    }

    #[test]
    fn test_stars_within_ranges() {
        let mut rng = seeded(3);
        let stars = seed_stars(Vec2::new(640.0, 480.0), 300, &mut rng);
        assert_eq!(stars.len(), 300);
        for s in &stars {
            assert!((1.0..4.0).contains(&s.depth));
            assert!((0.1..0.4).contains(&s.opacity));
            assert!(s.pos.x >= 0.0 && s.pos.x < 640.0);
        }
    }

    #[test]
    fn test_shooting_star_starts_outside() {
        let mut rng = seeded(11);
        let size = Vec2::new(800.0, 600.0);
        for _ in 0..50 {
            let s = shooting_star(size, &mut rng);
            let outside = s.pos.x < 0.0 || s.pos.x > size.x || s.pos.y < 0.0 || s.pos.y > size.y;
            assert!(outside);
            assert_eq!(s.life, 60.0);
        }
    }

    #[test]
    fn test_target_source_and_destination() {
        let (mut state, mut rng) = game_state();
        for _ in 0..40 {
            spawn_target(&mut state, &mut rng);
        }
        for t in &state.targets {
            let s = t.source;
            let outside = s.x <= -40.0 || s.x >= 840.0 || s.y <= -40.0 || s.y >= 640.0;
            assert!(outside, "source {s:?} should be 40-50 units outside");
            assert!(t.destination.x >= 40.0 && t.destination.x <= 760.0);
            assert!(t.destination.y >= 40.0 && t.destination.y <= 560.0);
            assert_eq!(t.pos, t.source);
        }
    }

    #[test]
    fn test_fiftieth_spawn_is_boss() {
        let (mut state, mut rng) = game_state();
        for _ in 0..50 {
            spawn_target(&mut state, &mut rng);
        }
        let boss = &state.targets[49];
        assert!(boss.is_boss());
        assert_eq!(boss.radius, 30.0);
        assert_eq!(boss.boss.unwrap().hp, 30);
        assert!(state.targets[..49].iter().all(|t| !t.is_boss()));
        assert!(state
            .events
            .contains(&GameEvent::BossSpawned { spawn_index: 50, hp: 30 }));
    }

    #[test]
    fn test_boss_spawn_numbers() {
        assert!(is_boss_spawn(50));
        assert!(is_boss_spawn(80));
        assert!(!is_boss_spawn(49));
        assert!(!is_boss_spawn(100));
    }

    #[test]
    fn test_classic_burst() {
        let mut particles = Vec::new();
        let mut rng = ReplayRandom::constant(0.2);
        explosion(&mut particles, Vec2::ZERO, &NORMAL_BURST, &mut rng);
        assert_eq!(particles.len(), 10);
        assert!(particles.iter().all(|p| p.kind == ParticleKind::Classic));
        assert!(particles.iter().all(|p| p.life == 30.0));
    }

    #[test]
    fn test_shockwave_burst() {
        let mut particles = Vec::new();
        let mut rng = ReplayRandom::constant(0.7);
        explosion(&mut particles, Vec2::ZERO, &NORMAL_BURST, &mut rng);
        let count = |k| particles.iter().filter(|p| p.kind == k).count();
        assert_eq!(count(ParticleKind::Spark), 20);
        assert_eq!(count(ParticleKind::Ember), 12);
        assert_eq!(count(ParticleKind::Ring), 1);
    }

    #[test]
    fn test_target_gate_respects_cap() {
        let (mut state, mut rng) = game_state();
        for i in 0..10 {
            run_gates(&mut state, &mut rng, i as f64 * 10_000.0);
        }
        assert_eq!(state.targets.len(), MAX_LIVE_TARGETS);
    }

    #[test]
    fn test_target_gate_waits_for_interval() {
        let (mut state, mut rng) = game_state();
        run_gates(&mut state, &mut rng, 1000.0);
        assert_eq!(state.targets.len(), 1);
        run_gates(&mut state, &mut rng, 2000.0);
        assert_eq!(state.targets.len(), 1);
        run_gates(&mut state, &mut rng, 1000.0 + 6000.0);
        assert_eq!(state.targets.len(), 2);
    }

    #[test]
    fn test_stars_only_never_spawns_targets() {
        let mut rng = seeded(5);
        let mut state = SimState::new(GameMode::StarsOnly, Vec2::new(800.0, 600.0), 10, &mut rng);
        for i in 0..10 {
            run_gates(&mut state, &mut rng, i as f64 * 20_000.0);
        }
        assert!(state.targets.is_empty());
        assert!(!state.shooting_stars.is_empty());
    }
}
