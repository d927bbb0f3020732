//! Palette and shape geometry

use glam::Vec2;

use crate::sim::Rgb;

/// Page background (#212121)
pub const BACKGROUND: Rgb = Rgb(0x21, 0x21, 0x21);
pub const STAR: Rgb = Rgb(255, 255, 255);
/// Ship body (#3B82F6)
pub const SHIP: Rgb = Rgb(0x3B, 0x82, 0xF6);
/// Projectiles and normal targets (#60A5FA)
pub const ACCENT: Rgb = Rgb(0x60, 0xA5, 0xFA);
/// Boss outline (#F87171)
pub const BOSS: Rgb = Rgb(0xF8, 0x71, 0x71);
/// Boss hp arc (#FBBF24)
pub const BOSS_HP: Rgb = Rgb(0xFB, 0xBF, 0x24);
pub const TEXT: Rgb = Rgb(255, 255, 255);
pub const TEXT_SHADOW: Rgb = Rgb(0, 0, 0);

pub const SHOOTING_STAR_WIDTH: f32 = 2.0;
pub const TARGET_LINE_WIDTH: f32 = 2.0;
pub const BOSS_LINE_WIDTH: f32 = 3.0;
/// Gap between boss outline and its hp arc
pub const BOSS_HP_ARC_GAP: f32 = 5.0;
pub const RING_LINE_WIDTH: f32 = 2.0;
pub const COUNTER_POS: Vec2 = Vec2::new(16.0, 28.0);
pub const COUNTER_FONT_PX: f32 = 14.0;
pub const COUNTER_SHADOW_OFFSET: Vec2 = Vec2::new(1.0, 1.0);

/// Ship outline in local space, nose along +x
const SHIP_OUTLINE: [Vec2; 4] = [
    Vec2::new(10.0, 0.0),
    Vec2::new(-8.0, -6.0),
    Vec2::new(-5.0, 0.0),
    Vec2::new(-8.0, 6.0),
];

/// Ship outline rotated to `angle` and placed at `pos`
pub fn ship_polygon(pos: Vec2, angle: f32) -> [Vec2; 4] {
    let rot = Vec2::from_angle(angle);
    SHIP_OUTLINE.map(|p| pos + rot.rotate(p))
}

/// Star offset for a pointer position; zero at the canvas center
pub fn parallax(pointer: Vec2, size: Vec2, depth: f32, strength: f32) -> Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec2::ZERO;
    }
    (pointer / size - Vec2::splat(0.5)) * depth * strength
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_polygon_points_along_heading() {
        let pts = ship_polygon(Vec2::new(100.0, 100.0), std::f32::consts::FRAC_PI_2);
        // Nose rotated to +y
        assert!((pts[0] - Vec2::new(100.0, 110.0)).length() < 1e-4);
    }

    #[test]
    fn test_parallax_centered() {
        let size = Vec2::new(800.0, 600.0);
        assert_eq!(parallax(size / 2.0, size, 3.0, 10.0), Vec2::ZERO);
        let edge = parallax(Vec2::new(800.0, 300.0), size, 2.0, 10.0);
        assert!((edge.x - 10.0).abs() < 1e-5);
        assert_eq!(parallax(Vec2::ONE, Vec2::ZERO, 2.0, 10.0), Vec2::ZERO);
    }
}
