use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use crate::animator::ScreenSaverDriver;
use crate::renderer::BarRenderer;
use crate::source::FrequencySample;
use crate::state::{Mode, VisualizerState, STILL_LEVELS};
use crate::BAR_COUNT;

/// What a tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    /// No sample was available (or the loop is stopped); nothing was drawn.
    Skipped,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Phase {
    Stopped,
    Running,
}

/// The visualizer's only recurring activity.
///
/// Two states: Stopped and Running. Starting immediately blanks the canvas
/// so it never shows a stale frame; stopping blanks it again after the
/// caller has cancelled the pending tick. While running, each tick reads
/// the latest frequency sample and redraws the whole frame, or skips the
/// frame entirely when no sample is available. Scheduling lives with the
/// caller; this type only decides what a tick draws.
pub struct RenderLoop {
    renderer: BarRenderer,
    screen_saver: ScreenSaverDriver,
    phase: Phase,
}

impl RenderLoop {
    pub fn new(size: Size) -> Self {
        Self {
            renderer: BarRenderer::new(size, BAR_COUNT),
            screen_saver: ScreenSaverDriver::new(0xbeef, BAR_COUNT),
            phase: Phase::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Stopped -> Running, with one immediate blank fill.
    pub fn start<D>(&mut self, fb: &mut D, background: Rgb888) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        self.phase = Phase::Running;
        self.renderer.clear(fb, background)
    }

    /// Running -> Stopped, with one final blank fill.
    pub fn stop<D>(&mut self, fb: &mut D, background: Rgb888) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        self.phase = Phase::Stopped;
        self.renderer.clear(fb, background)
    }

    /// Draw one frame from the given sample.
    pub fn tick<D>(
        &mut self,
        fb: &mut D,
        state: &VisualizerState,
        sample: Option<&FrequencySample>,
    ) -> Result<FrameOutcome, D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        if self.phase != Phase::Running {
            return Ok(FrameOutcome::Skipped);
        }
        let Some(sample) = sample else {
            return Ok(FrameOutcome::Skipped);
        };

        let mut values: [Option<f32>; BAR_COUNT] = [None; BAR_COUNT];
        match state.mode {
            Mode::Live => {
                for (i, slot) in values.iter_mut().enumerate() {
                    // A bin outside the sample draws nothing for that bar.
                    *slot = sample
                        .get(state.freq[i])
                        .map(|&level| level - state.squish[i]);
                }
            }
            Mode::Still => {
                for (i, slot) in values.iter_mut().enumerate() {
                    *slot = Some(STILL_LEVELS[i] - state.squish[i]);
                }
            }
            Mode::ScreenSaver => {
                let levels = self.screen_saver.tick();
                for (i, slot) in values.iter_mut().enumerate() {
                    *slot = Some(levels[i] * state.gain - state.squish[i]);
                }
            }
        }

        self.renderer.draw_frame(fb, state, &values)?;
        Ok(FrameOutcome::Drawn)
    }
}
