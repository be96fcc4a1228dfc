use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
#[allow(unused_imports)]
use micromath::F32Ext;

use crate::color::lerp;
use crate::gradient::{ColorContext, ColorStrategy, ThreeStopGradient};
use crate::state::{GridSettings, VisualizerState};

/// Draws one complete frame: background, gradient bars, grid lines.
///
/// Heights are computed in canvas pixels with the bottom edge as origin; a
/// bar's height is negative when it grows upward, and a non-negative height
/// points below the canvas and draws nothing.
pub struct BarRenderer {
    width: u32,
    height: u32,
    bar_count: usize,
}

impl BarRenderer {
    pub fn new(size: Size, bar_count: usize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            bar_count: bar_count.max(1),
        }
    }

    /// Fill the whole canvas with one color.
    pub fn clear<D>(&self, fb: &mut D, color: Rgb888) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        fb.clear(color)
    }

    /// Pixel height for one bar, sign included.
    ///
    /// With grid lock, a height between grid lines is snapped down to the
    /// nearest multiple of the cell size; a remainder of exactly zero is
    /// already aligned and left untouched. The grid line width is added
    /// afterward in either case so lines stay visible at the bar's edge.
    pub fn bar_height(&self, value: f32, grid: &GridSettings) -> f32 {
        let mut height = value * -(self.height as f32);

        let cell = self.height as f32 / grid.count.max(1) as f32;
        let remainder = height % cell;
        if remainder != 0.0 && grid.lock {
            height -= remainder;
        }

        height + grid.width
    }

    /// Draw one frame. A `None` entry draws no bar in that slot.
    pub fn draw_frame<D>(
        &self,
        fb: &mut D,
        state: &VisualizerState,
        values: &[Option<f32>],
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        self.clear(fb, state.colors.background.0)?;

        let gradient = ThreeStopGradient {
            base: state.colors.base.0,
            mid: state.colors.mid.0,
            peak: state.colors.peak.0,
        };
        for (index, value) in values.iter().enumerate() {
            if let Some(value) = *value {
                self.draw_bar(fb, state, &gradient, index, value)?;
            }
        }

        self.draw_grid(fb, state)
    }

    fn draw_bar<D>(
        &self,
        fb: &mut D,
        state: &VisualizerState,
        gradient: &ThreeStopGradient,
        index: usize,
        value: f32,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let height = self.bar_height(value, &state.grid);
        if height >= 0.0 {
            return Ok(());
        }

        let x0 = (index as f32 / self.bar_count as f32 * self.width as f32).round() as i32;
        let x1 = ((index + 1) as f32 / self.bar_count as f32 * self.width as f32).round() as i32;
        let bar_width = (x1 - x0).max(0) as u32;

        let bottom = self.height as i32;
        let top = ((self.height as f32 + height).round().max(0.0)) as i32;
        let span = (bottom - top) as u32;

        // One row at a time so the gradient runs base -> mid -> peak from
        // the bottom edge to the tip.
        for y in top..bottom {
            let context = ColorContext {
                offset: (bottom - 1 - y) as u32,
                span,
            };
            let color = lerp(
                state.colors.background.0,
                gradient.color_at(&context),
                state.opacity,
            );
            let row = Rectangle::new(Point::new(x0, y), Size::new(bar_width, 1));
            fb.fill_solid(&row, color)?;
        }
        Ok(())
    }

    fn draw_grid<D>(&self, fb: &mut D, state: &VisualizerState) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let thickness = state.grid.width.round().max(0.0) as u32;
        if thickness == 0 {
            return Ok(());
        }
        let color = lerp(state.colors.background.0, state.colors.grid.0, state.opacity);

        for i in 0..state.grid.count {
            let y = (i as f32 / state.grid.count as f32 * self.height as f32).round() as i32;
            let line = Rectangle::new(Point::new(0, y), Size::new(self.width, thickness));
            fb.fill_solid(&line, color)?;
        }
        Ok(())
    }
}
