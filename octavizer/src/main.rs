mod capture;
mod panel;
mod store;
mod ticker;

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use log::info;

use octa_viz::{
    FrameOutcome, FrequencySource, RenderLoop, VisualizerState, CANVAS_HEIGHT, CANVAS_WIDTH,
};

use crate::capture::MicSource;
use crate::panel::{ControlPanel, PanelEvent};
use crate::store::SettingsStore;
use crate::ticker::Ticker;

/// Target cadence: 60 frames per second, best effort.
const TICK_PERIOD: Duration = Duration::from_micros(16_667);

#[derive(Parser, Debug)]
#[command(name = "octavizer", version, about = "Eight-band audio visualizer")]
struct Cli {
    /// Capture device name substring; the default input device if omitted
    #[arg(long)]
    device: Option<String>,

    /// List audio input devices and exit
    #[arg(long)]
    list_devices: bool,

    /// Directory holding persisted settings
    #[arg(long, default_value = ".octavizer")]
    data_dir: PathBuf,

    /// Window pixel scale
    #[arg(long, default_value_t = 1)]
    scale: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.list_devices {
        for name in MicSource::list_devices()? {
            println!("{name}");
        }
        return Ok(());
    }

    let store = SettingsStore::new(cli.data_dir);
    let mut state = store.load();
    let mut source = MicSource::initialize(cli.device.as_deref());
    source.set_gain(state.gain);

    let mut display =
        SimulatorDisplay::<Rgb888>::new(Size::new(CANVAS_WIDTH, CANVAS_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(cli.scale.max(1)).build();
    let mut window = Window::new("octavizer", &output_settings);

    let mut render_loop = RenderLoop::new(Size::new(CANVAS_WIDTH, CANVAS_HEIGHT));
    let mut ticker = Ticker::new(TICK_PERIOD);
    let mut panel = ControlPanel::new();

    if state.is_running {
        render_loop.start(&mut display, state.colors.background.0)?;
        ticker.schedule();
    } else {
        display.clear(state.colors.background.0)?;
    }
    let mut repaint = true;

    info!("settings in {}", store.dir().display());

    'run: loop {
        window.update(&display);

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'run,
                SimulatorEvent::KeyDown { keycode, .. } => {
                    match panel.handle_key(keycode, &mut state) {
                        PanelEvent::ToggleRun => {
                            state.is_running = !state.is_running;
                            if state.is_running {
                                render_loop.start(&mut display, state.colors.background.0)?;
                                ticker.schedule();
                            } else {
                                ticker.cancel();
                                render_loop.stop(&mut display, state.colors.background.0)?;
                            }
                            store.save(&state);
                            repaint = true;
                        }
                        PanelEvent::Reset => {
                            if render_loop.is_running() {
                                ticker.cancel();
                                render_loop.stop(&mut display, state.colors.background.0)?;
                            }
                            state = VisualizerState::default();
                            source.set_gain(state.gain);
                            store.clear();
                            repaint = true;
                        }
                        PanelEvent::Changed => {
                            source.set_gain(state.gain);
                            store.save(&state);
                            repaint = true;
                        }
                        PanelEvent::Selection => repaint = true,
                        PanelEvent::Ignored => {}
                    }
                }
                _ => {}
            }
        }

        let drew = if render_loop.is_running() && ticker.due() {
            let sample = source.frequencies();
            render_loop.tick(&mut display, &state, sample.as_ref())? == FrameOutcome::Drawn
        } else {
            false
        };

        if drew {
            if state.panel_visible {
                panel.draw(&mut display, &state, source.is_ready(), source.sample_rate())?;
            }
            repaint = false;
        } else if repaint && (!render_loop.is_running() || !source.is_ready()) {
            // Stopped, or running with no samples to draw: repaint the
            // blank background and the overlay by hand.
            display.clear(state.colors.background.0)?;
            if state.panel_visible {
                panel.draw(&mut display, &state, source.is_ready(), source.sample_rate())?;
            }
            repaint = false;
        }

        thread::sleep(Duration::from_millis(2));
    }

    Ok(())
}
