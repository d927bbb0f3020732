//! Canvas 2D rendering module
//!
//! A read-only pass over `SimState` issuing calls on a `Canvas`.

pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod canvas2d;
pub mod recorder;
pub mod scene;
pub mod shapes;

pub use canvas::{BlendMode, Canvas, Paint};
#[cfg(target_arch = "wasm32")]
pub use canvas2d::Canvas2d;
pub use recorder::{DrawCommand, DrawStats, RecordingCanvas};
pub use scene::render;
