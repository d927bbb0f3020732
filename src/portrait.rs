//! Spinnable portrait
//!
//! Drag rotates the portrait 1:1 with the pointer; a fast release keeps it
//! spinning under friction; once it has been still for a while it eases back
//! to the rest pose. Rotation is in degrees: `x` about the horizontal axis
//! (driven by vertical pointer motion), `y` about the vertical axis.

use glam::Vec2;

use crate::error::CaptureError;

/// Degrees of rotation per pixel of pointer travel
pub const DRAG_SENSITIVITY: f32 = 0.5;
/// Release speed (deg/tick) above which the portrait coasts
pub const COAST_THRESHOLD: f32 = 0.1;
/// Per-tick velocity multiplier while coasting
pub const FRICTION: f32 = 0.98;
/// Coasting stops below this speed
pub const SETTLE_THRESHOLD: f32 = 0.1;
/// Stillness required before returning to rest
pub const RESET_DELAY_MS: f64 = 3000.0;
/// Duration of the return-to-rest animation
pub const RESET_DURATION_MS: f64 = 600.0;

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    Coasting,
    Resetting,
}

/// Pointer capture on the dragged element
pub trait PointerCapture {
    fn capture(&mut self, pointer_id: i32) -> Result<(), CaptureError>;
    fn release(&mut self, pointer_id: i32) -> Result<(), CaptureError>;
}

/// Platforms without pointer capture
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn capture(&mut self, _pointer_id: i32) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported)
    }

    fn release(&mut self, _pointer_id: i32) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported)
    }
}

/// Cubic ease-out on [0, 1]
fn ease_out_cubic(t: f32) -> f32 {
    let u = 1.0 - t.clamp(0.0, 1.0);
    1.0 - u * u * u
}

/// Drag-inertia state for one portrait
#[derive(Debug, Clone, Default)]
pub struct DragController {
    phase: DragPhase,
    rotation: Vec2,
    velocity: Vec2,
    last_pointer: Vec2,
    /// When the portrait came to rest off-center; arms the return timer
    settled_at: Option<f64>,
    reset_from: Vec2,
    reset_started: f64,
    /// Timestamp of the latest frame; input events settle on this clock
    clock: f64,
    torn_down: bool,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Current rotation in degrees
    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Return timer armed
    pub fn reset_pending(&self) -> bool {
        self.settled_at.is_some()
    }

    /// CSS transform for the portrait element
    pub fn css_transform(&self) -> String {
        format!(
            "rotateX({:.2}deg) rotateY({:.2}deg)",
            self.rotation.x, self.rotation.y
        )
    }

    pub fn pointer_down(&mut self, pos: Vec2, pointer_id: i32, capture: &mut dyn PointerCapture) {
        if self.torn_down {
            return;
        }
        if let Err(e) = capture.capture(pointer_id) {
            log::debug!("Dragging without capture: {e}");
        }
        self.phase = DragPhase::Dragging;
        self.last_pointer = pos;
        self.velocity = Vec2::ZERO;
        self.settled_at = None;
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        if self.phase != DragPhase::Dragging {
            return;
        }
        let delta = pos - self.last_pointer;
        self.velocity = Vec2::new(delta.y, delta.x) * DRAG_SENSITIVITY;
        self.rotation += self.velocity;
        self.last_pointer = pos;
    }

    /// Pointer released or left the element
    pub fn pointer_up(&mut self, pointer_id: i32, capture: &mut dyn PointerCapture) {
        if self.phase != DragPhase::Dragging {
            return;
        }
        if let Err(e) = capture.release(pointer_id) {
            log::debug!("Pointer release ignored: {e}");
        }
        if self.velocity.abs().max_element() > COAST_THRESHOLD {
            self.phase = DragPhase::Coasting;
        } else {
            self.settle(self.clock);
        }
    }

    /// Advance one frame at frame timestamp `now` (ms)
    pub fn tick(&mut self, now: f64) {
        if self.torn_down {
            return;
        }
        self.clock = now;
        match self.phase {
            DragPhase::Idle => {
                if self.settled_at.is_some_and(|at| now - at >= RESET_DELAY_MS) {
                    self.settled_at = None;
                    self.reset_from = self.rotation;
                    self.reset_started = now;
                    self.phase = DragPhase::Resetting;
                }
            }
            DragPhase::Dragging => {}
            DragPhase::Coasting => {
                self.velocity *= FRICTION;
                self.rotation += self.velocity;
                if self.velocity.abs().max_element() < SETTLE_THRESHOLD {
                    self.settle(now);
                }
            }
            DragPhase::Resetting => {
                let t = ((now - self.reset_started) / RESET_DURATION_MS) as f32;
                if t >= 1.0 {
                    self.rotation = Vec2::ZERO;
                    self.phase = DragPhase::Idle;
                } else {
                    self.rotation = self.reset_from * (1.0 - ease_out_cubic(t));
                }
            }
        }
    }

    /// Cancel pending timers; later input and ticks are ignored
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.settled_at = None;
        self.velocity = Vec2::ZERO;
        self.phase = DragPhase::Idle;
    }

    fn settle(&mut self, now: f64) {
        self.velocity = Vec2::ZERO;
        self.phase = DragPhase::Idle;
        self.settled_at = (self.rotation != Vec2::ZERO).then_some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FlakyCapture {
        captured: Vec<i32>,
    }

    impl PointerCapture for FlakyCapture {
        fn capture(&mut self, pointer_id: i32) -> Result<(), CaptureError> {
            self.captured.push(pointer_id);
            Ok(())
        }

        fn release(&mut self, _pointer_id: i32) -> Result<(), CaptureError> {
            Err(CaptureError::Rejected("pointer already released".into()))
        }
    }

    #[test]
    fn test_drag_is_direct() {
        let mut ctl = DragController::new();
        ctl.pointer_down(Vec2::new(100.0, 100.0), 1, &mut NoCapture);
        ctl.pointer_move(Vec2::new(120.0, 90.0));
        assert_eq!(ctl.rotation(), Vec2::new(-5.0, 10.0));
        assert_eq!(ctl.velocity(), Vec2::new(-5.0, 10.0));
    }

    #[test]
    fn test_move_without_drag_ignored() {
        let mut ctl = DragController::new();
        ctl.pointer_move(Vec2::new(50.0, 50.0));
        assert_eq!(ctl.rotation(), Vec2::ZERO);
    }

    #[test]
    fn test_fast_release_coasts_and_decays() {
        let mut ctl = DragController::new();
        let mut capture = FlakyCapture::default();
        ctl.pointer_down(Vec2::ZERO, 7, &mut capture);
        ctl.pointer_move(Vec2::new(20.0, 0.0));
        ctl.pointer_up(7, &mut capture);
        assert_eq!(capture.captured, vec![7]);
        assert_eq!(ctl.phase(), DragPhase::Coasting);

        let before = ctl.rotation().y;
        ctl.tick(16.0);
        assert!((ctl.velocity().y - 10.0 * FRICTION).abs() < 1e-5);
        assert!(ctl.rotation().y > before);

        let mut now = 16.0;
        while ctl.phase() == DragPhase::Coasting {
            now += 16.0;
            ctl.tick(now);
        }
        assert_eq!(ctl.phase(), DragPhase::Idle);
        assert!(ctl.reset_pending());
    }

    #[test]
    fn test_slow_release_returns_to_rest() {
        let mut ctl = DragController::new();
        ctl.pointer_down(Vec2::ZERO, 1, &mut NoCapture);
        ctl.pointer_move(Vec2::new(20.0, 0.0));
        // Pointer holds still before release
        ctl.pointer_move(Vec2::new(20.0, 0.0));
        ctl.tick(1000.0);
        ctl.pointer_up(1, &mut NoCapture);
        assert_eq!(ctl.phase(), DragPhase::Idle);
        assert_eq!(ctl.rotation(), Vec2::new(0.0, 10.0));

        ctl.tick(3999.0);
        assert_eq!(ctl.phase(), DragPhase::Idle);
        ctl.tick(4000.0);
        assert_eq!(ctl.phase(), DragPhase::Resetting);

        ctl.tick(4300.0);
        let mid = ctl.rotation().y;
        assert!(mid > 0.0 && mid < 10.0);

        ctl.tick(4600.0);
        assert_eq!(ctl.rotation(), Vec2::ZERO);
        assert_eq!(ctl.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_release_settles_on_frame_clock() {
        let mut ctl = DragController::new();
        let mut now = 5000.0;
        ctl.tick(now);
        ctl.pointer_down(Vec2::ZERO, 1, &mut NoCapture);
        ctl.pointer_move(Vec2::new(20.0, 0.0));
        ctl.pointer_move(Vec2::new(20.0, 0.0));
        now += 16.0;
        ctl.tick(now);
        ctl.pointer_up(1, &mut NoCapture);
        assert!(ctl.reset_pending());

        while now < 5016.0 + RESET_DELAY_MS {
            assert_eq!(ctl.phase(), DragPhase::Idle);
            now += 16.0;
            ctl.tick(now);
        }
        assert_eq!(ctl.phase(), DragPhase::Resetting);

        for _ in 0..40 {
            now += 16.0;
            ctl.tick(now);
        }
        assert_eq!(ctl.rotation(), Vec2::ZERO);
        assert_eq!(ctl.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_new_drag_cancels_return() {
        let mut ctl = DragController::new();
        ctl.pointer_down(Vec2::ZERO, 1, &mut NoCapture);
        ctl.pointer_move(Vec2::new(0.0, 10.0));
        ctl.pointer_move(Vec2::new(0.0, 10.0));
        ctl.pointer_up(1, &mut NoCapture);
        assert!(ctl.reset_pending());

        ctl.pointer_down(Vec2::ZERO, 1, &mut NoCapture);
        assert!(!ctl.reset_pending());
        ctl.tick(10_000.0);
        assert_eq!(ctl.phase(), DragPhase::Dragging);
        assert_eq!(ctl.rotation(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_interrupting_reset_keeps_current_pose() {
        let mut ctl = DragController::new();
        ctl.pointer_down(Vec2::ZERO, 1, &mut NoCapture);
        ctl.pointer_move(Vec2::new(40.0, 0.0));
        ctl.pointer_move(Vec2::new(40.0, 0.0));
        ctl.pointer_up(1, &mut NoCapture);
        ctl.tick(3000.0);
        ctl.tick(3300.0);
        let partway = ctl.rotation();

        ctl.pointer_down(Vec2::ZERO, 1, &mut NoCapture);
        assert_eq!(ctl.phase(), DragPhase::Dragging);
        ctl.tick(5000.0);
        assert_eq!(ctl.rotation(), partway);
    }

    #[test]
    fn test_teardown_stops_everything() {
        let mut ctl = DragController::new();
        ctl.pointer_down(Vec2::ZERO, 1, &mut NoCapture);
        ctl.pointer_move(Vec2::new(20.0, 0.0));
        ctl.pointer_up(1, &mut NoCapture);
        ctl.teardown();

        let frozen = ctl.rotation();
        ctl.tick(100_000.0);
        ctl.pointer_down(Vec2::ZERO, 1, &mut NoCapture);
        ctl.pointer_move(Vec2::new(100.0, 0.0));
        assert_eq!(ctl.rotation(), frozen);
        assert!(!ctl.reset_pending());
    }

    #[test]
    fn test_css_transform() {
        let mut ctl = DragController::new();
        ctl.pointer_down(Vec2::ZERO, 1, &mut NoCapture);
        ctl.pointer_move(Vec2::new(3.0, 1.0));
        assert_eq!(ctl.css_transform(), "rotateX(0.50deg) rotateY(1.50deg)");
    }

    #[test]
    fn test_ease_out_cubic_bounds() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }
}
