//! Projectile/target collision detection and resolution
//!
//! Projectiles are processed newest first, targets in reverse creation order.
//! A projectile hits at most one target per tick; removals are index-stable
//! because every removal happens at or after the cursor being walked.

use glam::Vec2;

use super::events::GameEvent;
use super::rng::Random;
use super::spawn::{self, BOSS_BURST, NORMAL_BURST};
use super::state::{HitOutcome, SimState, Target};
use crate::consts::{BOSS_REPLACEMENTS, FIELD_CLEAR_REPLACEMENTS};
use crate::distance;

/// Hit iff the centers are strictly closer than the target radius
#[inline]
pub fn projectile_hits(projectile: Vec2, target: &Target) -> bool {
    distance(projectile, target.pos) < target.radius
}

/// Index of the newest target `projectile` hits
fn first_hit(projectile: Vec2, targets: &[Target]) -> Option<usize> {
    (0..targets.len())
        .rev()
        .find(|&i| projectile_hits(projectile, &targets[i]))
}

/// Resolve every projectile/target hit for this tick.
///
/// A target destroyed by one projectile is gone before the next projectile
/// is tested, so later same-tick hits on it are no-ops. Replacement waves
/// (boss death, emptied field) are spawned after the pass, within the tick.
pub fn resolve_collisions(state: &mut SimState, rng: &mut dyn Random, now: f64) {
    let mut replacements = 0usize;

    let mut pi = state.projectiles.len();
    while pi > 0 {
        pi -= 1;
        let Some(ti) = first_hit(state.projectiles[pi].pos, &state.targets) else {
            continue;
        };
        state.projectiles.remove(pi);

        let target = &mut state.targets[ti];
        let center = target.pos;
        let outcome = target.take_hit();
        let boss = target.boss;

        let palette = if boss.is_some() {
            &BOSS_BURST
        } else {
            &NORMAL_BURST
        };
        spawn::explosion(&mut state.particles, center, palette, rng);

        if let Some(status) = boss {
            state.events.push(GameEvent::BossHit {
                hp: status.hp,
                max_hp: status.max_hp,
            });
        }

        if outcome != HitOutcome::Destroyed {
            continue;
        }

        state.targets.remove(ti);
        state.kills += 1;

        if boss.is_some() {
            log::info!("Boss destroyed ({} kills)", state.kills);
            state.events.push(GameEvent::BossDestroyed { kills: state.kills });
            replacements += BOSS_REPLACEMENTS;
        } else {
            state.events.push(GameEvent::TargetDestroyed { kills: state.kills });
        }

        if state.targets.is_empty() && replacements == 0 {
            replacements += FIELD_CLEAR_REPLACEMENTS;
        }
    }

    if replacements > 0 {
        spawn::spawn_replacements(state, rng, replacements, now);
    }
}
