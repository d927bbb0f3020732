//! Browser `CanvasRenderingContext2d` backend

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::canvas::{BlendMode, Canvas, Paint};
use crate::error::SurfaceError;
use crate::sim::Rgb;

pub struct Canvas2d {
    ctx: CanvasRenderingContext2d,
}

impl Canvas2d {
    /// Acquire the 2D context; fails while the canvas is detached
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, SurfaceError> {
        if !canvas.is_connected() {
            return Err(SurfaceError::MissingCanvas);
        }
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(SurfaceError::MissingContext)?;
        Ok(Self { ctx })
    }

    fn fill(&self, paint: Paint) {
        self.ctx.set_global_alpha(paint.alpha as f64);
        self.ctx.set_fill_style_str(&Paint::solid(paint.color).css());
    }

    fn stroke(&self, width: f32, paint: Paint) {
        self.ctx.set_global_alpha(paint.alpha as f64);
        self.ctx.set_stroke_style_str(&Paint::solid(paint.color).css());
        self.ctx.set_line_width(width as f64);
    }
}

impl Canvas for Canvas2d {
    fn clear(&mut self, size: Vec2, color: Rgb) {
        self.fill(Paint::solid(color));
        self.ctx.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, paint: Paint) {
        self.fill(paint);
        self.ctx
            .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, paint: Paint) {
        self.stroke(width, paint);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: Paint) {
        self.fill(paint);
        self.ctx.begin_path();
        // Negative radius throws; nothing to draw anyway
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, paint: Paint) {
        self.stroke_arc(center, radius, 0.0, TAU as f32, width, paint);
    }

    fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        width: f32,
        paint: Paint,
    ) {
        self.stroke(width, paint);
        self.ctx.begin_path();
        if self
            .ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius.max(0.0) as f64,
                start as f64,
                end as f64,
            )
            .is_ok()
        {
            self.ctx.stroke();
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: Paint) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.fill(paint);
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn text(&mut self, pos: Vec2, text: &str, size_px: f32, paint: Paint) {
        self.fill(paint);
        self.ctx.set_font(&format!("{size_px}px monospace"));
        self.ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
    }

    fn set_blend(&mut self, mode: BlendMode) {
        let op = match mode {
            BlendMode::Normal => "source-over",
            BlendMode::Additive => "lighter",
        };
        self.ctx.set_global_composite_operation(op).ok();
    }
}
