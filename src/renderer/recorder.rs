//! Recording canvas
//!
//! Stores every draw call as a value. Used by tests and the headless runner.

use glam::Vec2;
use serde::Serialize;

use super::canvas::{BlendMode, Canvas, Paint};
use crate::sim::Rgb;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { size: Vec2, color: Rgb },
    Rect { pos: Vec2, size: Vec2, paint: Paint },
    Line { from: Vec2, to: Vec2, width: f32, paint: Paint },
    FillCircle { center: Vec2, radius: f32, paint: Paint },
    StrokeCircle { center: Vec2, radius: f32, width: f32, paint: Paint },
    Arc { center: Vec2, radius: f32, start: f32, end: f32, paint: Paint },
    Polygon { points: Vec<Vec2>, paint: Paint },
    Text { pos: Vec2, text: String, paint: Paint },
    Blend(BlendMode),
}

/// Per-kind draw call tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrawStats {
    pub frames: u32,
    pub rects: u32,
    pub lines: u32,
    pub circles: u32,
    pub arcs: u32,
    pub polygons: u32,
    pub texts: u32,
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    stats: DrawStats,
    /// Keep only counts, drop the commands themselves
    stats_only: bool,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally draw calls without storing them
    pub fn counting() -> Self {
        Self {
            stats_only: true,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    /// Commands matching `pred`
    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Text labels in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }

    fn push(&mut self, cmd: DrawCommand) {
        if !self.stats_only {
            self.commands.push(cmd);
        }
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, size: Vec2, color: Rgb) {
        self.stats.frames += 1;
        self.push(DrawCommand::Clear { size, color });
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, paint: Paint) {
        self.stats.rects += 1;
        self.push(DrawCommand::Rect { pos, size, paint });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, paint: Paint) {
        self.stats.lines += 1;
        self.push(DrawCommand::Line {
            from,
            to,
            width,
            paint,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: Paint) {
        self.stats.circles += 1;
        self.push(DrawCommand::FillCircle {
            center,
            radius,
            paint,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, paint: Paint) {
        self.stats.circles += 1;
        self.push(DrawCommand::StrokeCircle {
            center,
            radius,
            width,
            paint,
        });
    }

    fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        _width: f32,
        paint: Paint,
    ) {
        self.stats.arcs += 1;
        self.push(DrawCommand::Arc {
            center,
            radius,
            start,
            end,
            paint,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: Paint) {
        self.stats.polygons += 1;
        self.push(DrawCommand::Polygon {
            points: points.to_vec(),
            paint,
        });
    }

    fn text(&mut self, pos: Vec2, text: &str, _size_px: f32, paint: Paint) {
        self.stats.texts += 1;
        self.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            paint,
        });
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.push(DrawCommand::Blend(mode));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_keeps_no_commands() {
        let mut canvas = RecordingCanvas::counting();
        canvas.clear(Vec2::ONE, Rgb(0, 0, 0));
        canvas.fill_circle(Vec2::ZERO, 1.0, Paint::solid(Rgb(1, 2, 3)));
        assert!(canvas.commands().is_empty());
        assert_eq!(canvas.stats().frames, 1);
        assert_eq!(canvas.stats().circles, 1);
    }
}
