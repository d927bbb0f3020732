//! Render pass
//!
//! Back to front: background, stars, shooting stars, ship, projectiles,
//! targets, particles, kill counter. Reads state only.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;

use super::canvas::{BlendMode, Canvas, Paint};
use super::shapes::*;
use crate::consts::{PROJECTILE_RADIUS, SHOOTING_STAR_TRAIL, STAR_PARALLAX};
use crate::sim::{ParticleKind, SimState, Target};

/// Draw one frame of `state`
pub fn render(state: &SimState, goal: u32, canvas: &mut dyn Canvas) {
    canvas.set_blend(BlendMode::Normal);
    canvas.clear(state.size, BACKGROUND);

    draw_stars(state, canvas);

    for s in &state.shooting_stars {
        let tail = s.pos - s.vel * SHOOTING_STAR_TRAIL;
        canvas.line(
            s.pos,
            tail,
            SHOOTING_STAR_WIDTH,
            Paint::with_alpha(STAR, s.fade()),
        );
    }

    let game = state.mode.is_game();
    if game {
        canvas.fill_polygon(
            &ship_polygon(state.ship.pos, state.ship.angle),
            Paint::solid(SHIP),
        );

        for p in &state.projectiles {
            canvas.fill_circle(p.pos, PROJECTILE_RADIUS, Paint::solid(ACCENT));
        }

        for target in &state.targets {
            draw_target(target, canvas);
        }
    }

    draw_particles(state, canvas);

    if game {
        draw_counter(state.kills, goal, canvas);
    }
}

fn draw_stars(state: &SimState, canvas: &mut dyn Canvas) {
    let strength = if state.reduced_motion {
        0.0
    } else {
        STAR_PARALLAX
    };
    for star in &state.stars {
        let offset = parallax(state.pointer, state.size, star.depth, strength);
        canvas.fill_rect(
            star.pos - offset,
            Vec2::ONE,
            Paint::with_alpha(STAR, star.opacity),
        );
    }
}

fn draw_target(target: &Target, canvas: &mut dyn Canvas) {
    let radius = target.radius * target.progress;
    if radius <= 0.0 {
        return;
    }
    let alpha = target.progress;

    match target.boss {
        None => canvas.stroke_circle(
            target.pos,
            radius,
            TARGET_LINE_WIDTH,
            Paint::with_alpha(ACCENT, alpha),
        ),
        Some(boss) => {
            if boss.blink_hidden() {
                return;
            }
            canvas.stroke_circle(
                target.pos,
                radius,
                BOSS_LINE_WIDTH,
                Paint::with_alpha(BOSS, alpha),
            );
            let start = -FRAC_PI_2;
            canvas.stroke_arc(
                target.pos,
                radius + BOSS_HP_ARC_GAP,
                start,
                start + TAU * boss.hp_ratio(),
                TARGET_LINE_WIDTH,
                Paint::with_alpha(BOSS_HP, alpha),
            );
        }
    }
}

fn draw_particles(state: &SimState, canvas: &mut dyn Canvas) {
    if state.particles.is_empty() {
        return;
    }
    canvas.set_blend(BlendMode::Additive);
    for p in &state.particles {
        let paint = Paint::with_alpha(p.color, p.fade());
        match p.kind {
            ParticleKind::Ring => canvas.stroke_circle(p.pos, p.size, RING_LINE_WIDTH, paint),
            ParticleKind::Classic | ParticleKind::Spark | ParticleKind::Ember => {
                canvas.fill_circle(p.pos, p.size, paint)
            }
        }
    }
    canvas.set_blend(BlendMode::Normal);
}

fn draw_counter(kills: u32, goal: u32, canvas: &mut dyn Canvas) {
    let label = format!("{kills}/{goal}");
    canvas.text(
        COUNTER_POS + COUNTER_SHADOW_OFFSET,
        &label,
        COUNTER_FONT_PX,
        Paint::with_alpha(TEXT_SHADOW, 0.6),
    );
    canvas.text(COUNTER_POS, &label, COUNTER_FONT_PX, Paint::solid(TEXT));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::recorder::{DrawCommand, RecordingCanvas};
    use crate::settings::GameMode;
    use crate::sim::{BossStatus, ReplayRandom, Rgb};

    fn state(mode: GameMode) -> SimState {
        let mut rng = ReplayRandom::constant(0.5);
        SimState::new(mode, Vec2::new(800.0, 600.0), 3, &mut rng)
    }

    #[test]
    fn test_clear_comes_first() {
        let mut canvas = RecordingCanvas::new();
        render(&state(GameMode::Game), 100, &mut canvas);
        assert!(matches!(canvas.commands()[1], DrawCommand::Clear { .. }));
    }

    #[test]
    fn test_stars_only_draws_no_game() {
        let s = state(GameMode::StarsOnly);
        let mut canvas = RecordingCanvas::new();
        render(&s, 100, &mut canvas);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::Polygon { .. })), 0);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::Text { .. })), 0);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::Rect { .. })), 3);
    }

    #[test]
    fn test_counter_has_shadow() {
        let mut s = state(GameMode::Game);
        s.kills = 7;
        let mut canvas = RecordingCanvas::new();
        render(&s, 100, &mut canvas);
        let texts: Vec<_> = canvas.texts().collect();
        assert_eq!(texts, vec!["7/100", "7/100"]);
    }

    #[test]
    fn test_blinking_boss_is_hidden() {
        let mut s = state(GameMode::Game);
        let mut boss = Target::boss(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0));
        boss.progress = 1.0;
        boss.boss = Some(BossStatus {
            hp: 20,
            max_hp: 30,
            hit_flash: 5,
        });
        s.targets.push(boss);

        let mut canvas = RecordingCanvas::new();
        render(&s, 100, &mut canvas);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::Arc { .. })), 0);

        s.targets[0].boss.as_mut().unwrap().hit_flash = 4;
        let mut canvas = RecordingCanvas::new();
        render(&s, 100, &mut canvas);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::Arc { .. })), 1);
    }

    #[test]
    fn test_particles_drawn_additive() {
        let mut s = state(GameMode::StarsOnly);
        s.particles.push(crate::sim::Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            life: 10.0,
            max_life: 20.0,
            size: 2.0,
            color: Rgb(255, 0, 0),
            kind: ParticleKind::Ember,
        });
        let mut canvas = RecordingCanvas::new();
        render(&s, 100, &mut canvas);

        let cmds = canvas.commands();
        let circle = cmds
            .iter()
            .position(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .unwrap();
        assert_eq!(cmds[circle - 1], DrawCommand::Blend(BlendMode::Additive));
        assert_eq!(cmds.last(), Some(&DrawCommand::Blend(BlendMode::Normal)));
    }

    #[test]
    fn test_reduced_motion_pins_stars() {
        let mut s = state(GameMode::StarsOnly);
        s.reduced_motion = true;
        s.pointer = Vec2::ZERO;
        let mut canvas = RecordingCanvas::new();
        render(&s, 100, &mut canvas);
        let first_star = canvas
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Rect { pos, .. } => Some(*pos),
                _ => None,
            })
            .unwrap();
        assert_eq!(first_star, s.stars[0].pos);
    }
}
