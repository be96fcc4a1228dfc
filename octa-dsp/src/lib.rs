#![no_std]

use microdsp::common::{apply_window_function, WindowFunctionType::Hann};
use microfft::Complex32;
#[allow(unused_imports)]
use micromath::F32Ext;

/// Samples consumed per analysis frame.
pub const FFT_SIZE: usize = 256;
/// Frequency bins produced per analysis frame.
pub const BIN_COUNT: usize = FFT_SIZE / 2;

/// Default exponential smoothing factor applied between frames.
pub const SMOOTHING: f32 = 0.8;
/// Magnitudes at or below this level scale to byte 0.
pub const MIN_DECIBELS: f32 = -100.0;
/// Magnitudes at or above this level scale to byte 255.
pub const MAX_DECIBELS: f32 = -30.0;

/// Apply a Hann window to a slice of f32 samples.
pub fn apply_hann_window(samples: &mut [f32]) {
    apply_window_function(Hann, samples);
}

/// Compute the FFT of one frame of f32 samples.
pub fn compute_fft(samples: &mut [f32; FFT_SIZE]) -> &mut [Complex32; BIN_COUNT] {
    microfft::real::rfft_256(samples)
}

/// Compute the magnitude of the FFT output.
///
/// The real FFT packs the Nyquist coefficient into the imaginary part of
/// bin 0; it is discarded so bin 0 carries the DC magnitude alone.
pub fn compute_magnitude(fft_output: &[Complex32]) -> Result<[f32; BIN_COUNT], &'static str> {
    if fft_output.len() != BIN_COUNT {
        return Err("FFT output must contain exactly 128 complex numbers");
    }
    let mut magnitude = [0.0; BIN_COUNT];
    magnitude[0] = fft_output[0].re.abs();
    for i in 1..BIN_COUNT {
        let component = fft_output[i];
        magnitude[i] = (component.re * component.re + component.im * component.im).sqrt();
    }
    Ok(magnitude)
}

/// Process one frame of f32 samples and return the magnitude spectrum.
pub fn process_frame(samples: &[f32]) -> Result<[f32; BIN_COUNT], &'static str> {
    if samples.len() != FFT_SIZE {
        return Err("Input must contain exactly 256 samples");
    }

    let mut windowed = [0.0; FFT_SIZE];
    windowed.copy_from_slice(samples);

    apply_hann_window(&mut windowed);

    let fft_output = compute_fft(&mut windowed);

    compute_magnitude(fft_output)
}

/// Analyser stage that turns raw magnitude spectra into the normalized
/// values the visualizer consumes.
///
/// Each incoming frame is scaled by 1/FFT_SIZE and blended into the running
/// spectrum with an exponential smoothing factor. Reading the spectrum
/// converts each bin to decibels, scales it to a 0..=255 byte over the
/// `MIN_DECIBELS..MAX_DECIBELS` range, and maps the byte to
/// `byte / 128 - 1`, yielding values in `[-1, 1)`.
pub struct SmoothedSpectrum {
    smoothing: f32,
    smoothed: [f32; BIN_COUNT],
}

impl SmoothedSpectrum {
    /// Creates an analyser stage with the given smoothing factor in `[0, 1)`.
    pub fn new(smoothing: f32) -> Self {
        Self {
            smoothing: smoothing.clamp(0.0, 0.999),
            smoothed: [0.0; BIN_COUNT],
        }
    }

    /// Blend one magnitude frame into the running spectrum.
    pub fn push(&mut self, magnitudes: &[f32; BIN_COUNT]) {
        let tau = self.smoothing;
        for (slot, &mag) in self.smoothed.iter_mut().zip(magnitudes.iter()) {
            *slot = tau * *slot + (1.0 - tau) * (mag / FFT_SIZE as f32);
        }
    }

    /// Byte-scale a single smoothed bin value.
    fn byte_value(&self, smoothed: f32) -> u8 {
        if smoothed <= 0.0 {
            return 0;
        }
        let db = 20.0 * smoothed.log10();
        let scaled = 255.0 * (db - MIN_DECIBELS) / (MAX_DECIBELS - MIN_DECIBELS);
        scaled.clamp(0.0, 255.0) as u8
    }

    /// The current spectrum, normalized to `[-1, 1)`.
    pub fn normalized(&self) -> [f32; BIN_COUNT] {
        let mut out = [0.0; BIN_COUNT];
        for (slot, &smoothed) in out.iter_mut().zip(self.smoothed.iter()) {
            *slot = self.byte_value(smoothed) as f32 / (BIN_COUNT as f32) - 1.0;
        }
        out
    }
}
