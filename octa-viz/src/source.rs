use crate::BIN_COUNT;

/// One frame of normalized frequency-bin magnitudes in `[-1, 1)`.
///
/// Regenerated continuously while capture is active; the render loop only
/// ever reads the latest value, never a history.
pub type FrequencySample = [f32; BIN_COUNT];

/// The seam between the render loop and whatever produces samples.
///
/// The application injects the capture session through this trait; the
/// render loop never owns or constructs a source. A source that failed to
/// acquire its device stays permanently not ready, which callers treat as
/// a valid steady state rather than an error.
pub trait FrequencySource {
    /// Whether the analysis pipeline is producing samples.
    fn is_ready(&self) -> bool;

    /// The most recent sample, or `None` when not ready. Never blocks.
    fn frequencies(&mut self) -> Option<FrequencySample>;

    /// Scale captured amplitude on subsequent samples.
    fn set_gain(&mut self, gain: f32);
}
