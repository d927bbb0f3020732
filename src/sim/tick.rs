//! Per-tick update step
//!
//! Advances every entity by one frame. Order matters: later steps see the
//! earlier steps' mutations from the same tick.

use super::collision;
use super::rng::Random;
use super::spawn;
use super::state::{Particle, Projectile, SimState};
use crate::consts::PROJECTILE_SPEED;

/// Advance the simulation one tick at wall-clock time `now` (ms)
pub fn tick(state: &mut SimState, rng: &mut dyn Random, now: f64) {
    state.time_ticks += 1;
    let game = state.mode.is_game();
    let size = state.size;

    // Ship steering
    if game {
        state.ship.steer();
    }

    // Star drift, wrapping to a random column at the top
    for star in &mut state.stars {
        if star.drift(size.y) {
            star.pos.x = rng.unit() * size.x;
        }
    }

    // Shooting stars
    state.shooting_stars.retain_mut(|s| {
        s.pos += s.vel;
        s.life -= 1.0;
        s.life > 0.0 && !s.out_of_bounds(size)
    });

    // Projectiles
    if game {
        state.projectiles.retain_mut(|p| {
            p.pos += p.vel;
            p.in_bounds(size)
        });
    }

    // Particles
    state.particles.retain_mut(Particle::update);

    // Target entrance + hit flash
    if game {
        for target in &mut state.targets {
            target.advance_entrance();
        }
    }

    if game {
        collision::resolve_collisions(state, rng, now);
    }

    spawn::run_gates(state, rng, now);

    if game {
        fire(state, now);
    }
}

/// Emit one projectile from the nose if the trigger is held and the gun is ready
fn fire(state: &mut SimState, now: f64) {
    if !state.firing || !state.timers.shot_ready(now) {
        return;
    }
    state.projectiles.push(Projectile {
        pos: state.ship.nose(),
        vel: state.ship.forward() * PROJECTILE_SPEED,
    });
    state.timers.last_shot = Some(now);
}
