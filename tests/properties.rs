use glam::Vec2;
use proptest::prelude::*;

use starfield::consts::{BOSS_HP, SHIP_SPEED};
use starfield::settings::GameMode;
use starfield::sim::{self, HitOutcome, SimState, Spaceship, Target, projectile_hits};
use starfield::{heading_vector, lerp};

proptest! {
    #[test]
    fn hit_iff_strictly_inside_radius(
        cx in 0.0f32..800.0,
        cy in 0.0f32..600.0,
        angle in -3.14f32..3.14,
        d in 0.0f32..60.0,
        boss in any::<bool>(),
    ) {
        let center = Vec2::new(cx, cy);
        let target = if boss {
            Target::boss(center, center)
        } else {
            Target::normal(center, center)
        };
        prop_assume!((d - target.radius).abs() > 1e-2);

        let shot = center + heading_vector(angle) * d;
        prop_assert_eq!(projectile_hits(shot, &target), d < target.radius);
    }

    #[test]
    fn entrance_progress_is_monotonic_and_lerped(
        sx in -50.0f32..850.0,
        sy in -50.0f32..650.0,
        dx in 40.0f32..760.0,
        dy in 40.0f32..560.0,
        steps in 1usize..200,
    ) {
        let source = Vec2::new(sx, sy);
        let destination = Vec2::new(dx, dy);
        let mut target = Target::normal(source, destination);

        let mut last = target.progress;
        for _ in 0..steps {
            target.advance_entrance();
            prop_assert!(target.progress >= last);
            prop_assert!(target.progress <= 1.0);
            last = target.progress;

            let expected = Vec2::new(
                lerp(sx, dx, target.progress),
                lerp(sy, dy, target.progress),
            );
            prop_assert!((target.pos - expected).length() < 1e-3);
        }
    }

    #[test]
    fn boss_survives_until_last_hit(hits in 1u32..BOSS_HP) {
        let mut boss = Target::boss(Vec2::ZERO, Vec2::ZERO);
        for _ in 0..hits {
            prop_assert!(matches!(boss.take_hit(), HitOutcome::Damaged { .. }), "expected Damaged");
        }
        prop_assert_eq!(boss.boss.unwrap().hp, BOSS_HP - hits);

        for _ in hits..BOSS_HP - 1 {
            boss.take_hit();
        }
        prop_assert_eq!(boss.take_hit(), HitOutcome::Destroyed);
    }

    #[test]
    fn ship_never_exceeds_unit_speed(
        px in 0.0f32..800.0,
        py in 0.0f32..600.0,
        tx in 0.0f32..800.0,
        ty in 0.0f32..600.0,
        angle in -3.14f32..3.14,
    ) {
        let mut ship = Spaceship { pos: Vec2::new(px, py), target: Vec2::new(tx, ty), angle };
        let before = ship.pos;
        ship.steer();
        prop_assert!((ship.pos - before).length() <= SHIP_SPEED + 1e-4);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn counters_never_decrease(
        seed in any::<u64>(),
        pointer in prop::collection::vec((0.0f32..800.0, 0.0f32..600.0), 1..8),
    ) {
        let mut rng = sim::seeded(seed);
        let mut state = SimState::new(GameMode::Game, Vec2::new(800.0, 600.0), 20, &mut rng);

        let mut kills = 0;
        let mut spawned = 0;
        for i in 0..900u32 {
            let (x, y) = pointer[i as usize % pointer.len()];
            state.set_pointer(Vec2::new(x, y));
            state.firing = i % 5 != 0;
            sim::tick(&mut state, &mut rng, i as f64 * 16.0);

            prop_assert!(state.kills >= kills);
            prop_assert!(state.spawned >= spawned);
            prop_assert!(state.particles.iter().all(|p| p.life > 0.0));
            kills = state.kills;
            spawned = state.spawned;
        }
    }
}
