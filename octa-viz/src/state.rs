use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::{BAR_COUNT, BIN_COUNT};

/// Levels shown in [`Mode::Still`], one per bar.
pub const STILL_LEVELS: [f32; BAR_COUNT] = [0.85, 0.68, 0.94, 0.74, 0.93, 0.86, 0.82, 0.65];

/// The named color slots of the visualization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSlots {
    pub background: HexColor,
    pub grid: HexColor,
    pub base: HexColor,
    pub mid: HexColor,
    pub peak: HexColor,
}

impl Default for ColorSlots {
    fn default() -> Self {
        Self {
            background: HexColor::rgb(0x1e, 0x1e, 0x1e),
            grid: HexColor::rgb(0x00, 0x00, 0x00),
            base: HexColor::rgb(0x20, 0x36, 0x62),
            mid: HexColor::rgb(0x55, 0xa2, 0xa8),
            peak: HexColor::rgb(0xc5, 0x20, 0x3f),
        }
    }
}

/// Identifies one slot in [`ColorSlots`], for panel editing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSlot {
    Background,
    Grid,
    Base,
    Mid,
    Peak,
}

impl ColorSlot {
    pub const ALL: [ColorSlot; 5] = [
        ColorSlot::Background,
        ColorSlot::Grid,
        ColorSlot::Base,
        ColorSlot::Mid,
        ColorSlot::Peak,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ColorSlot::Background => "background",
            ColorSlot::Grid => "grid",
            ColorSlot::Base => "base",
            ColorSlot::Mid => "mid",
            ColorSlot::Peak => "peak",
        }
    }
}

impl ColorSlots {
    pub fn get(&self, slot: ColorSlot) -> HexColor {
        match slot {
            ColorSlot::Background => self.background,
            ColorSlot::Grid => self.grid,
            ColorSlot::Base => self.base,
            ColorSlot::Mid => self.mid,
            ColorSlot::Peak => self.peak,
        }
    }

    pub fn set(&mut self, slot: ColorSlot, color: HexColor) {
        match slot {
            ColorSlot::Background => self.background = color,
            ColorSlot::Grid => self.grid = color,
            ColorSlot::Base => self.base = color,
            ColorSlot::Mid => self.mid = color,
            ColorSlot::Peak => self.peak = color,
        }
    }
}

/// Horizontal grid-line geometry and the height-snapping policy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub count: u32,
    pub width: f32,
    pub lock: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            count: 24,
            width: 2.0,
            lock: false,
        }
    }
}

/// What drives the bar heights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Bar heights follow the live frequency sample.
    Live,
    /// Bar heights hold the fixed [`STILL_LEVELS`].
    Still,
    /// Bar heights ease toward pseudo-random targets.
    ScreenSaver,
}

impl Mode {
    pub fn next(self) -> Mode {
        match self {
            Mode::Live => Mode::Still,
            Mode::Still => Mode::ScreenSaver,
            Mode::ScreenSaver => Mode::Live,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Live => "live",
            Mode::Still => "still",
            Mode::ScreenSaver => "screensaver",
        }
    }
}

/// Every user-tunable parameter of the visualization.
///
/// Created from defaults at startup, overwritten field-by-field from the
/// settings store, and mutated only by control panel actions. `gain` and
/// `panel_visible` are session state and are never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualizerState {
    pub colors: ColorSlots,
    pub opacity: f32,
    pub grid: GridSettings,
    pub squish: [f32; BAR_COUNT],
    pub freq: [usize; BAR_COUNT],
    pub mode: Mode,
    pub is_running: bool,
    pub gain: f32,
    pub panel_visible: bool,
}

impl Default for VisualizerState {
    fn default() -> Self {
        Self {
            colors: ColorSlots::default(),
            opacity: 1.0,
            grid: GridSettings::default(),
            squish: [0.0; BAR_COUNT],
            freq: [1, 2, 3, 4, 6, 8, 10, 12],
            mode: Mode::Live,
            is_running: false,
            gain: 2.0,
            panel_visible: true,
        }
    }
}

impl VisualizerState {
    /// Clamp bin indices into the valid sample range.
    ///
    /// Values loaded from storage are otherwise accepted as given; this is
    /// the one invariant the renderer relies on.
    pub fn clamp_freq(&mut self) {
        for bin in &mut self.freq {
            *bin = (*bin).min(BIN_COUNT - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_defaults() {
        let state = VisualizerState::default();
        assert_eq!(state.colors.background.to_hex(), "#1e1e1e");
        assert_eq!(state.colors.peak.to_hex(), "#c5203f");
        assert_eq!(state.opacity, 1.0);
        assert_eq!(state.grid.count, 24);
        assert_eq!(state.grid.width, 2.0);
        assert!(!state.grid.lock);
        assert_eq!(state.squish, [0.0; BAR_COUNT]);
        assert_eq!(state.freq, [1, 2, 3, 4, 6, 8, 10, 12]);
        assert_eq!(state.mode, Mode::Live);
        assert!(!state.is_running);
        assert_eq!(state.gain, 2.0);
        assert!(state.panel_visible);
    }

    #[test]
    fn test_colors_encode_as_named_slots() {
        let json = serde_json::to_string(&ColorSlots::default()).unwrap();
        assert_eq!(
            json,
            "{\"background\":\"#1e1e1e\",\"grid\":\"#000000\",\
             \"base\":\"#203662\",\"mid\":\"#55a2a8\",\"peak\":\"#c5203f\"}"
        );
    }

    #[test]
    fn test_mode_encodes_as_lowercase_string() {
        assert_eq!(
            serde_json::to_string(&Mode::ScreenSaver).unwrap(),
            "\"screensaver\""
        );
        let back: Mode = serde_json::from_str("\"live\"").unwrap();
        assert_eq!(back, Mode::Live);
    }

    #[test]
    fn test_mode_cycle_covers_all_modes() {
        assert_eq!(Mode::Live.next(), Mode::Still);
        assert_eq!(Mode::Still.next(), Mode::ScreenSaver);
        assert_eq!(Mode::ScreenSaver.next(), Mode::Live);
    }

    #[test]
    fn test_clamp_freq_upholds_bin_range() {
        let mut state = VisualizerState::default();
        state.freq = [0, 5, 127, 128, 500, 1, 2, 3];
        state.clamp_freq();
        assert_eq!(state.freq, [0, 5, 127, 127, 127, 1, 2, 3]);
    }

    #[test]
    fn test_grid_round_trip() {
        let grid = GridSettings {
            count: 30,
            width: 3.0,
            lock: true,
        };
        let json = serde_json::to_string(&grid).unwrap();
        let back: GridSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }
}
