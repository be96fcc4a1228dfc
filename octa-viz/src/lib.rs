//! Render engine for the eight-band visualizer.
//!
//! Everything here draws through `embedded_graphics::DrawTarget`, so the
//! same code runs against the SDL simulator window, a framebuffer, or a
//! test double. The crate holds the visualization state, the bar renderer,
//! the render loop state machine, and the frequency-source seam the
//! application plugs capture into.
#![no_std]

extern crate alloc;

pub mod animator;
pub mod color;
pub mod gradient;
pub mod render_loop;
pub mod renderer;
pub mod source;
pub mod state;

#[cfg(test)]
pub(crate) mod test_util;

pub use animator::{ScreenSaverDriver, ValueAnimator};
pub use color::HexColor;
pub use gradient::{ColorContext, ColorStrategy, ThreeStopGradient};
pub use render_loop::{FrameOutcome, RenderLoop};
pub use renderer::BarRenderer;
pub use source::{FrequencySample, FrequencySource};
pub use state::{ColorSlot, ColorSlots, GridSettings, Mode, VisualizerState};

/// Number of bars on the canvas.
pub const BAR_COUNT: usize = 8;
/// Number of frequency bins in one sample.
pub const BIN_COUNT: usize = 128;
/// Logical canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 800;
/// Logical canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 450;
