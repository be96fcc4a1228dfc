use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use log::{info, warn};

use octa_dsp::SmoothedSpectrum;
use octa_viz::{FrequencySample, FrequencySource};

/// Ring buffer the stream callback writes mono samples into.
///
/// The analysis side only ever wants the most recent frame, so the ring
/// keeps no read cursor; stale data is simply overwritten.
pub struct SampleRing {
    data: Vec<f32>,
    write_idx: usize,
    filled: bool,
}

impl SampleRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity],
            write_idx: 0,
            filled: false,
        }
    }

    pub fn push(&mut self, sample: f32) {
        self.data[self.write_idx] = sample;
        self.write_idx = (self.write_idx + 1) % self.data.len();
        if self.write_idx == 0 {
            self.filled = true;
        }
    }

    /// Copy the newest `out.len()` samples in chronological order.
    /// Returns false until enough samples have arrived.
    pub fn frame(&self, out: &mut [f32]) -> bool {
        let capacity = self.data.len();
        if out.len() > capacity {
            return false;
        }
        if !self.filled && self.write_idx < out.len() {
            return false;
        }
        let start = (self.write_idx + capacity - out.len()) % capacity;
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.data[(start + i) % capacity];
        }
        true
    }
}

/// The one capture resource: a cpal input stream feeding the analysis
/// pipeline.
///
/// `initialize` never fails: when no device can be opened the source comes
/// up permanently not ready, the failure is logged once, and every
/// `frequencies` call returns `None`. The stream lives as long as the
/// source and is never re-acquired.
pub struct MicSource {
    shared: Arc<Mutex<SampleRing>>,
    _stream: Option<Stream>,
    ready: bool,
    gain: f32,
    sample_rate: u32,
    spectrum: SmoothedSpectrum,
    last: Option<FrequencySample>,
}

impl MicSource {
    pub fn initialize(preferred: Option<&str>) -> Self {
        match Self::open(preferred) {
            Ok(source) => source,
            Err(err) => {
                warn!("audio capture unavailable: {err:#}");
                Self::offline()
            }
        }
    }

    /// A source with no device; permanently not ready.
    pub fn offline() -> Self {
        Self {
            shared: Arc::new(Mutex::new(SampleRing::new(octa_dsp::FFT_SIZE))),
            _stream: None,
            ready: false,
            gain: 1.0,
            sample_rate: 44_100,
            spectrum: SmoothedSpectrum::new(octa_dsp::SMOOTHING),
            last: None,
        }
    }

    fn open(preferred: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = pick_device(&host, preferred).context("no input device available")?;
        let name = device.name().unwrap_or_else(|_| "unknown".into());

        let supported = device
            .default_input_config()
            .context("no default input config")?;
        let config = supported.config();
        let sample_rate = config.sample_rate.0;

        let shared = Arc::new(Mutex::new(SampleRing::new(octa_dsp::FFT_SIZE * 4)));
        let stream = match supported.sample_format() {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, Arc::clone(&shared)),
            SampleFormat::I16 => build_stream::<i16>(&device, &config, Arc::clone(&shared)),
            SampleFormat::U16 => build_stream::<u16>(&device, &config, Arc::clone(&shared)),
            format => return Err(anyhow!("unsupported sample format {format:?}")),
        }
        .context("failed to build input stream")?;
        stream.play().context("failed to start input stream")?;

        info!(
            "capturing from {name:?} ({} ch @ {sample_rate} Hz)",
            config.channels
        );
        Ok(Self {
            shared,
            _stream: Some(stream),
            ready: true,
            gain: 1.0,
            sample_rate,
            spectrum: SmoothedSpectrum::new(octa_dsp::SMOOTHING),
            last: None,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let mut names = Vec::new();
        for device in host.input_devices().context("no input devices")? {
            names.push(device.name().unwrap_or_else(|_| "unknown".into()));
        }
        Ok(names)
    }
}

impl FrequencySource for MicSource {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn frequencies(&mut self) -> Option<FrequencySample> {
        if !self.ready {
            return None;
        }

        let mut frame = [0.0f32; octa_dsp::FFT_SIZE];
        let have_frame = match self.shared.try_lock() {
            Ok(ring) => ring.frame(&mut frame),
            // Contended with the stream callback: reuse the last sample.
            Err(_) => false,
        };
        if !have_frame {
            return self.last;
        }

        for sample in &mut frame {
            *sample *= self.gain;
        }
        let magnitudes = octa_dsp::process_frame(&frame).ok()?;
        self.spectrum.push(&magnitudes);
        let sample = self.spectrum.normalized();
        self.last = Some(sample);
        Some(sample)
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain.max(0.0);
    }
}

fn pick_device(host: &cpal::Host, preferred: Option<&str>) -> Option<Device> {
    if let Some(want) = preferred {
        let want = want.to_lowercase();
        if let Ok(devices) = host.input_devices() {
            for device in devices {
                let matches = device
                    .name()
                    .map(|name| name.to_lowercase().contains(&want))
                    .unwrap_or(false);
                if matches {
                    return Some(device);
                }
            }
        }
        warn!("no input device matching {want:?}, falling back to default");
    }
    host.default_input_device()
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    shared: Arc<Mutex<SampleRing>>,
) -> Result<Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = (config.channels as usize).max(1);
    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            // Never block the audio callback; dropping a buffer is fine.
            if let Ok(mut ring) = shared.try_lock() {
                for frame in data.chunks_exact(channels) {
                    let mut acc = 0.0f32;
                    for &sample in frame {
                        acc += f32::from_sample(sample);
                    }
                    ring.push(acc / channels as f32);
                }
            }
        },
        |err| warn!("input stream error: {err}"),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_reports_no_frame_until_filled() {
        let ring = SampleRing::new(8);
        let mut out = [0.0f32; 4];
        assert!(!ring.frame(&mut out));
    }

    #[test]
    fn test_ring_returns_newest_samples_in_order() {
        let mut ring = SampleRing::new(8);
        for i in 0..10 {
            ring.push(i as f32);
        }
        let mut out = [0.0f32; 4];
        assert!(ring.frame(&mut out));
        assert_eq!(out, [6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_ring_rejects_oversized_frame() {
        let mut ring = SampleRing::new(4);
        for i in 0..8 {
            ring.push(i as f32);
        }
        let mut out = [0.0f32; 8];
        assert!(!ring.frame(&mut out));
    }

    #[test]
    fn test_offline_source_is_a_steady_not_ready_state() {
        let mut source = MicSource::offline();
        assert!(!source.is_ready());
        assert_eq!(source.frequencies(), None);
        source.set_gain(5.0);
        assert_eq!(source.frequencies(), None);
    }
}
