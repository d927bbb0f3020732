//! Drawing surface abstraction
//!
//! The render pass only speaks this trait. The browser backend forwards to
//! `CanvasRenderingContext2d`; tests and the headless runner record calls.

use glam::Vec2;

use crate::sim::Rgb;

/// Color plus opacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Rgb,
    pub alpha: f32,
}

impl Paint {
    pub const fn solid(color: Rgb) -> Self {
        Self { color, alpha: 1.0 }
    }

    pub fn with_alpha(color: Rgb, alpha: f32) -> Self {
        Self {
            color,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// CSS color string
    pub fn css(&self) -> String {
        let Rgb(r, g, b) = self.color;
        if self.alpha >= 1.0 {
            format!("rgb({r}, {g}, {b})")
        } else {
            format!("rgba({r}, {g}, {b}, {:.3})", self.alpha)
        }
    }
}

/// Compositing mode for subsequent draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    /// Colors add up where shapes overlap
    Additive,
}

/// 2D drawing surface
pub trait Canvas {
    /// Fill the whole surface
    fn clear(&mut self, size: Vec2, color: Rgb);
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, paint: Paint);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, paint: Paint);
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: Paint);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, paint: Paint);
    /// Arc from `start` to `end` radians, clockwise in screen space
    fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        width: f32,
        paint: Paint,
    );
    fn fill_polygon(&mut self, points: &[Vec2], paint: Paint);
    fn text(&mut self, pos: Vec2, text: &str, size_px: f32, paint: Paint);
    fn set_blend(&mut self, mode: BlendMode);
}
