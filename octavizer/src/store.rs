use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use octa_viz::VisualizerState;

/// The persisted keys, one JSON file per key.
pub const KEYS: [&str; 7] = [
    "colors", "opacity", "grid", "squish", "freq", "mode", "isStarted",
];

/// Persists the visualizer state as seven independently-keyed JSON
/// documents under one directory.
///
/// Each key loads on its own: a missing file leaves the field at its
/// default, and a malformed one is skipped with a warning rather than
/// failing the whole load. Every save writes all seven keys
/// unconditionally. There is no schema versioning and no migration.
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                warn!("could not read {}: {err}", path.display());
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("ignoring malformed setting {key:?}: {err}");
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) {
        let path = self.path(key);
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(err) => {
                warn!("could not encode setting {key:?}: {err}");
                return;
            }
        };
        if let Err(err) = fs::write(&path, json) {
            warn!("could not write {}: {err}", path.display());
        }
    }

    /// Defaults, overwritten field-by-field from whatever is on disk.
    pub fn load(&self) -> VisualizerState {
        let mut state = VisualizerState::default();
        if let Some(colors) = self.read("colors") {
            state.colors = colors;
        }
        if let Some(opacity) = self.read("opacity") {
            state.opacity = opacity;
        }
        if let Some(grid) = self.read("grid") {
            state.grid = grid;
        }
        if let Some(squish) = self.read("squish") {
            state.squish = squish;
        }
        if let Some(freq) = self.read("freq") {
            state.freq = freq;
        }
        if let Some(mode) = self.read("mode") {
            state.mode = mode;
        }
        if let Some(is_running) = self.read("isStarted") {
            state.is_running = is_running;
        }
        state.clamp_freq();
        state
    }

    /// Write all seven keys. Failures are logged, never fatal.
    pub fn save(&self, state: &VisualizerState) {
        if let Err(err) = fs::create_dir_all(&self.dir) {
            warn!("could not create {}: {err}", self.dir.display());
            return;
        }
        self.write("colors", &state.colors);
        self.write("opacity", &state.opacity);
        self.write("grid", &state.grid);
        self.write("squish", &state.squish);
        self.write("freq", &state.freq);
        self.write("mode", &state.mode);
        self.write("isStarted", &state.is_running);
    }

    /// Delete all seven keys.
    pub fn clear(&self) {
        for key in KEYS {
            let path = self.path(key);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => warn!("could not remove {}: {err}", path.display()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octa_viz::{ColorSlot, HexColor, Mode};

    fn store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let (_dir, store) = store();
        assert_eq!(store.load(), VisualizerState::default());
    }

    #[test]
    fn test_save_then_load_round_trips_all_persisted_fields() {
        let (_dir, store) = store();

        let mut state = VisualizerState::default();
        state.colors.set(ColorSlot::Peak, HexColor::rgb(1, 2, 3));
        state.opacity = 0.5;
        state.grid.count = 30;
        state.grid.width = 4.0;
        state.grid.lock = true;
        state.squish = [0.1; 8];
        state.freq = [2, 3, 4, 5, 6, 7, 8, 9];
        state.mode = Mode::Still;
        state.is_running = true;

        store.save(&state);
        let loaded = store.load();

        assert_eq!(loaded.colors, state.colors);
        assert_eq!(loaded.opacity, state.opacity);
        assert_eq!(loaded.grid, state.grid);
        assert_eq!(loaded.squish, state.squish);
        assert_eq!(loaded.freq, state.freq);
        assert_eq!(loaded.mode, state.mode);
        assert_eq!(loaded.is_running, state.is_running);
    }

    #[test]
    fn test_gain_and_panel_visibility_are_not_persisted() {
        let (_dir, store) = store();

        let mut state = VisualizerState::default();
        state.gain = 9.0;
        state.panel_visible = false;
        store.save(&state);

        let loaded = store.load();
        assert_eq!(loaded.gain, VisualizerState::default().gain);
        assert!(loaded.panel_visible);
    }

    #[test]
    fn test_malformed_key_falls_back_to_its_default() {
        let (_dir, store) = store();

        let mut state = VisualizerState::default();
        state.opacity = 0.25;
        state.mode = Mode::ScreenSaver;
        store.save(&state);

        // Corrupt one key; the others must still load.
        fs::write(store.dir().join("opacity.json"), "not json").unwrap();

        let loaded = store.load();
        assert_eq!(loaded.opacity, VisualizerState::default().opacity);
        assert_eq!(loaded.mode, Mode::ScreenSaver);
    }

    #[test]
    fn test_loaded_freq_is_clamped_into_bin_range() {
        let (_dir, store) = store();
        store.save(&VisualizerState::default());
        fs::write(
            store.dir().join("freq.json"),
            "[0,1,2,3,4,5,6,4096]",
        )
        .unwrap();

        let loaded = store.load();
        assert_eq!(loaded.freq, [0, 1, 2, 3, 4, 5, 6, 127]);
    }

    #[test]
    fn test_clear_removes_every_key() {
        let (_dir, store) = store();

        let mut state = VisualizerState::default();
        state.is_running = true;
        store.save(&state);
        for key in KEYS {
            assert!(store.dir().join(format!("{key}.json")).exists());
        }

        store.clear();
        for key in KEYS {
            assert!(!store.dir().join(format!("{key}.json")).exists());
        }
        assert_eq!(store.load(), VisualizerState::default());
    }
}
