use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_graphics_simulator::sdl2::Keycode;

use octa_viz::{ColorSlot, HexColor, VisualizerState, BAR_COUNT};

const GAIN_STEP: f32 = 0.1;
const GAIN_MAX: f32 = 20.0;
const SQUISH_STEP: f32 = 0.05;
const OPACITY_STEP: f32 = 0.05;
const HUE_STEP: f32 = 15.0;
const FREQ_MIN: usize = 1;
const FREQ_MAX: usize = 16;

/// What a key press asks the application to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelEvent {
    /// Key not bound; nothing happened.
    Ignored,
    /// Only the panel's own cursor moved; no state change to persist.
    Selection,
    /// Exactly one state field changed and must be persisted.
    Changed,
    /// Flip the running flag (the caller owns the render loop).
    ToggleRun,
    /// Restore defaults and clear the persisted entries.
    Reset,
}

/// Keyboard control surface plus the on-canvas text overlay.
///
/// Holds only its own cursors (selected bar, selected color slot); every
/// edit lands directly in the shared [`VisualizerState`].
pub struct ControlPanel {
    selected_bar: usize,
    slot_index: usize,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self {
            selected_bar: 0,
            slot_index: 0,
        }
    }

    pub fn selected_slot(&self) -> ColorSlot {
        ColorSlot::ALL[self.slot_index]
    }

    pub fn handle_key(&mut self, keycode: Keycode, state: &mut VisualizerState) -> PanelEvent {
        match keycode {
            Keycode::Space => PanelEvent::ToggleRun,
            Keycode::R => PanelEvent::Reset,
            Keycode::P => {
                state.panel_visible = !state.panel_visible;
                PanelEvent::Changed
            }
            Keycode::M => {
                state.mode = state.mode.next();
                PanelEvent::Changed
            }
            Keycode::Up => {
                state.gain = (state.gain + GAIN_STEP).min(GAIN_MAX);
                PanelEvent::Changed
            }
            Keycode::Down => {
                state.gain = (state.gain - GAIN_STEP).max(0.0);
                PanelEvent::Changed
            }
            Keycode::Left => {
                self.selected_bar = (self.selected_bar + BAR_COUNT - 1) % BAR_COUNT;
                PanelEvent::Selection
            }
            Keycode::Right => {
                self.selected_bar = (self.selected_bar + 1) % BAR_COUNT;
                PanelEvent::Selection
            }
            Keycode::W => {
                let bin = &mut state.freq[self.selected_bar];
                *bin = (*bin + 1).min(FREQ_MAX);
                PanelEvent::Changed
            }
            Keycode::S => {
                let bin = &mut state.freq[self.selected_bar];
                *bin = bin.saturating_sub(1).max(FREQ_MIN);
                PanelEvent::Changed
            }
            Keycode::E => {
                let squish = &mut state.squish[self.selected_bar];
                *squish = (*squish + SQUISH_STEP).min(1.0);
                PanelEvent::Changed
            }
            Keycode::D => {
                let squish = &mut state.squish[self.selected_bar];
                *squish = (*squish - SQUISH_STEP).max(0.0);
                PanelEvent::Changed
            }
            Keycode::C => {
                self.slot_index = (self.slot_index + 1) % ColorSlot::ALL.len();
                PanelEvent::Selection
            }
            Keycode::X => {
                self.rotate_selected_hue(state, HUE_STEP);
                PanelEvent::Changed
            }
            Keycode::Z => {
                self.rotate_selected_hue(state, -HUE_STEP);
                PanelEvent::Changed
            }
            Keycode::Q => {
                state.opacity = (state.opacity + OPACITY_STEP).min(1.0);
                PanelEvent::Changed
            }
            Keycode::A => {
                state.opacity = (state.opacity - OPACITY_STEP).max(0.0);
                PanelEvent::Changed
            }
            Keycode::G => {
                state.grid.count += 1;
                PanelEvent::Changed
            }
            Keycode::F => {
                state.grid.count = state.grid.count.saturating_sub(1).max(1);
                PanelEvent::Changed
            }
            Keycode::T => {
                state.grid.width += 1.0;
                PanelEvent::Changed
            }
            Keycode::B => {
                state.grid.width = (state.grid.width - 1.0).max(0.0);
                PanelEvent::Changed
            }
            Keycode::L => {
                state.grid.lock = !state.grid.lock;
                PanelEvent::Changed
            }
            _ => PanelEvent::Ignored,
        }
    }

    fn rotate_selected_hue(&self, state: &mut VisualizerState, degrees: f32) {
        let slot = self.selected_slot();
        let rotated = rotate_hue(state.colors.get(slot).0, degrees);
        state.colors.set(slot, HexColor(rotated));
    }

    /// Draw the overlay. Runs after the frame so the text sits on top.
    pub fn draw<D>(
        &self,
        fb: &mut D,
        state: &VisualizerState,
        mic_ready: bool,
        sample_rate: u32,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let style = MonoTextStyle::new(&FONT_6X10, Rgb888::WHITE);
        let bar = self.selected_bar;
        let slot = self.selected_slot();
        // Center frequency readout for the selected bin.
        let hz = (state.freq[bar] as f32 * sample_rate as f32 / 128.0).round() as u32;

        let lines = [
            format!("octavizer v{}", env!("CARGO_PKG_VERSION")),
            format!(
                "[{}] {} | mic {} | gain {:.1} | opacity {:.2}",
                if state.is_running { "running" } else { "stopped" },
                state.mode.name(),
                if mic_ready { "ready" } else { "off" },
                state.gain,
                state.opacity,
            ),
            format!(
                "grid {} x {:.0} [{}]",
                state.grid.count,
                state.grid.width,
                if state.grid.lock { "locked" } else { "free" },
            ),
            format!(
                "bar {bar} | freq {} ({hz} Hz) | squish {:.2}",
                state.freq[bar], state.squish[bar],
            ),
            format!("color {}: {}", slot.name(), state.colors.get(slot).to_hex()),
            String::from("space run  m mode  p panel  r reset  arrows bar/gain"),
            String::from("w/s freq  e/d squish  c slot  x/z hue  q/a opacity"),
            String::from("g/f count  t/b width  l lock"),
        ];

        let mut y = 14;
        for line in &lines {
            Text::new(line, Point::new(8, y), style).draw(fb)?;
            y += 12;
        }
        Ok(())
    }
}

fn rgb_to_hsv(color: Rgb888) -> (f32, f32, f32) {
    let r = color.r() as f32 / 255.0;
    let g = color.g() as f32 / 255.0;
    let b = color.b() as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { delta / max };
    (h, s, max)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb888 {
    let h = ((h % 360.0) + 360.0) % 360.0;
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };
    Rgb888::new(
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

/// Rotate a color's hue, keeping saturation and value. Grays have no hue
/// and pass through unchanged.
fn rotate_hue(color: Rgb888, degrees: f32) -> Rgb888 {
    let (h, s, v) = rgb_to_hsv(color);
    hsv_to_rgb(h + degrees, s, v)
}
