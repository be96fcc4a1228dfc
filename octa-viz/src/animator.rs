use alloc::{vec, vec::Vec};

#[allow(unused_imports)]
use micromath::F32Ext;

/// Manages the state and animation of a set of numerical values.
///
/// Handles the interpolation between previous, target, and current values
/// over a specified number of steps, using an ease-out-quadratic easing
/// function. Values are kept as `f32` levels; the screen-saver driver feeds
/// it pseudo-random targets in `[0, 1]`.
pub struct ValueAnimator {
    /// The values at the start of the current interpolation cycle.
    previous: Vec<f32>,
    /// The target values for the current interpolation cycle.
    target: Vec<f32>,
    /// The currently interpolated values.
    current: Vec<f32>,
    /// The number of steps over which to interpolate from previous to
    /// target values. A value of 0 means instant snap to target.
    steps: u32,
    /// Current step in the interpolation cycle, 0 to `steps - 1`.
    counter: u32,
    len: usize,
}

impl ValueAnimator {
    pub fn new(len: usize, initial: f32, steps: u32) -> Self {
        Self {
            previous: vec![initial; len],
            target: vec![initial; len],
            current: vec![initial; len],
            steps,
            counter: 0,
            len,
        }
    }

    /// Sets new target values for the animation.
    ///
    /// Should be called when [`is_new_cycle_start`](Self::is_new_cycle_start)
    /// returns true. The targets of the completed cycle become the starting
    /// point of the new one. A length mismatch leaves the targets untouched.
    pub fn set_new_targets(&mut self, new_targets: &[f32]) {
        if new_targets.len() != self.len {
            return;
        }
        self.previous.copy_from_slice(&self.target);
        self.target.copy_from_slice(new_targets);
        self.counter = 0;
    }

    /// Updates the animation state for one frame and returns the current
    /// values.
    pub fn update_and_current(&mut self) -> &[f32] {
        let eased = self.eased_progress();
        self.interpolate(eased);

        // The counter holds at steps - 1 until set_new_targets resets it,
        // marking the animation to the current target as complete.
        if self.steps > 0 && self.counter < self.steps.saturating_sub(1) {
            self.counter += 1;
        }
        &self.current
    }

    /// Whether the previous animation has completed (or this is the very
    /// first frame), i.e. the caller should provide new targets.
    pub fn is_new_cycle_start(&self) -> bool {
        if self.steps == 0 {
            return true;
        }
        self.counter == 0 || self.counter >= self.steps.saturating_sub(1)
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    fn ease_out_quad(t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        1.0 - (1.0 - t) * (1.0 - t)
    }

    /// Progress through the current cycle, eased, reaching 1.0 exactly on
    /// the final step.
    fn eased_progress(&self) -> f32 {
        let progress = if self.steps <= 1 {
            1.0
        } else {
            self.counter as f32 / (self.steps - 1) as f32
        };
        Self::ease_out_quad(progress)
    }

    fn interpolate(&mut self, eased: f32) {
        if eased >= 1.0 || self.steps == 0 {
            self.current.copy_from_slice(&self.target);
            return;
        }
        for i in 0..self.len {
            self.current[i] = self.previous[i] * (1.0 - eased) + self.target[i] * eased;
        }
    }
}

/// Xorshift PRNG for screen-saver targets; deterministic and `no_std`.
struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x2545_f491 } else { seed },
        }
    }

    fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// A value in `[0, 1)`.
    fn next_unit(&mut self) -> f32 {
        (self.next() >> 8) as f32 / 16_777_216.0
    }
}

/// Drives screen-saver mode: each bar eases toward an independent
/// pseudo-random level, and a fresh set of targets is drawn whenever a
/// cycle completes.
pub struct ScreenSaverDriver {
    animator: ValueAnimator,
    rng: XorShift32,
    len: usize,
}

impl ScreenSaverDriver {
    /// Steps per easing cycle, about half a second at the tick cadence.
    const CYCLE_STEPS: u32 = 30;

    pub fn new(seed: u32, len: usize) -> Self {
        Self {
            animator: ValueAnimator::new(len, 0.0, Self::CYCLE_STEPS),
            rng: XorShift32::new(seed),
            len,
        }
    }

    /// Advance one frame and return the per-bar levels in `[0, 1)`.
    pub fn tick(&mut self) -> &[f32] {
        if self.animator.is_new_cycle_start() {
            let mut targets = vec![0.0f32; self.len];
            for target in &mut targets {
                *target = self.rng.next_unit();
            }
            self.animator.set_new_targets(&targets);
        }
        self.animator.update_and_current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_initial_state_and_set_targets() {
        let mut animator = ValueAnimator::new(5, 0.0, 10);

        assert_eq!(animator.previous, vec![0.0; 5]);
        assert_eq!(animator.target, vec![0.0; 5]);
        assert_eq!(animator.counter(), 0, "initial counter should be 0");
        assert!(animator.is_new_cycle_start(), "should be new cycle at start");

        let new_targets = vec![0.1, 0.2, 0.3, 0.4, 0.5];
        animator.set_new_targets(&new_targets);
        assert_eq!(
            animator.previous,
            vec![0.0; 5],
            "previous should be old targets after set_new_targets"
        );
        assert_eq!(animator.target, new_targets);
        assert_eq!(animator.counter(), 0, "counter should reset");
        assert!(animator.is_new_cycle_start());
    }

    #[test]
    fn test_length_mismatch_leaves_targets_untouched() {
        let mut animator = ValueAnimator::new(3, 0.5, 10);
        animator.set_new_targets(&[1.0, 1.0]);
        assert_eq!(animator.target, vec![0.5; 3]);
    }

    #[test]
    fn test_counter_increment_normal() {
        let steps = 3;
        let mut animator = ValueAnimator::new(1, 0.0, steps);
        animator.set_new_targets(&[1.0]);

        animator.update_and_current();
        assert_eq!(animator.counter(), 1, "after 1st update");
        assert!(!animator.is_new_cycle_start());

        animator.update_and_current();
        assert_eq!(animator.counter(), 2, "after 2nd update (steps - 1)");
        assert!(
            animator.is_new_cycle_start(),
            "new cycle when counter reaches steps - 1"
        );

        animator.update_and_current();
        assert_eq!(animator.counter(), 2, "counter holds at steps - 1");
    }

    #[test]
    fn test_zero_steps_snaps_instantly() {
        let mut animator = ValueAnimator::new(1, 0.0, 0);
        assert!(animator.is_new_cycle_start());

        animator.set_new_targets(&[0.8]);
        let values = animator.update_and_current();
        assert_abs_diff_eq!(values[0], 0.8);
        assert_eq!(animator.counter(), 0, "counter never advances for 0 steps");
        assert!(animator.is_new_cycle_start());
    }

    #[test]
    fn test_animation_progression() {
        // 2 steps: counter goes 0, 1; progress 0.0 then 1.0.
        let mut animator = ValueAnimator::new(1, 0.0, 2);
        animator.set_new_targets(&[1.0]);

        let first = animator.update_and_current()[0];
        assert_abs_diff_eq!(first, 0.0, epsilon = 1e-6);

        let second = animator.update_and_current()[0];
        assert_abs_diff_eq!(second, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_screen_saver_levels_stay_in_range() {
        let mut driver = ScreenSaverDriver::new(7, 8);
        for _ in 0..200 {
            let levels = driver.tick();
            assert_eq!(levels.len(), 8);
            assert!(levels.iter().all(|&v| (0.0..1.0).contains(&v)));
        }
    }

    #[test]
    fn test_screen_saver_is_deterministic_per_seed() {
        let mut a = ScreenSaverDriver::new(42, 4);
        let mut b = ScreenSaverDriver::new(42, 4);
        for _ in 0..100 {
            assert_eq!(a.tick(), b.tick());
        }
    }

    #[test]
    fn test_screen_saver_targets_change_across_cycles() {
        let mut driver = ScreenSaverDriver::new(1, 2);
        let first = driver.tick().to_vec();
        for _ in 0..ScreenSaverDriver::CYCLE_STEPS * 2 {
            driver.tick();
        }
        let later = driver.tick().to_vec();
        assert_ne!(first, later);
    }
}
