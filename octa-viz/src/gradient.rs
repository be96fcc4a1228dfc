use embedded_graphics::pixelcolor::Rgb888;

use crate::color::lerp;

/// Position of the pixel being colored within its bar.
pub struct ColorContext {
    /// Distance from the bar's base edge, in pixels.
    pub offset: u32,
    /// Total extent of the bar, in pixels.
    pub span: u32,
}

pub trait ColorStrategy {
    fn color_at(&self, context: &ColorContext) -> Rgb888;
}

/// Vertical ramp from `base` at the bar's bottom edge through `mid` to
/// `peak` at the tip.
pub struct ThreeStopGradient {
    pub base: Rgb888,
    pub mid: Rgb888,
    pub peak: Rgb888,
}

impl ColorStrategy for ThreeStopGradient {
    fn color_at(&self, context: &ColorContext) -> Rgb888 {
        let t = if context.span <= 1 {
            1.0
        } else {
            context.offset as f32 / (context.span - 1) as f32
        };
        if t <= 0.5 {
            lerp(self.base, self.mid, t * 2.0)
        } else {
            lerp(self.mid, self.peak, (t - 0.5) * 2.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> ThreeStopGradient {
        ThreeStopGradient {
            base: Rgb888::new(0, 0, 0),
            mid: Rgb888::new(100, 100, 100),
            peak: Rgb888::new(200, 0, 0),
        }
    }

    #[test]
    fn test_gradient_stops() {
        let gradient = ramp();
        let at = |offset, span| gradient.color_at(&ColorContext { offset, span });

        assert_eq!(at(0, 101), Rgb888::new(0, 0, 0));
        assert_eq!(at(50, 101), Rgb888::new(100, 100, 100));
        assert_eq!(at(100, 101), Rgb888::new(200, 0, 0));
    }

    #[test]
    fn test_single_pixel_bar_shows_peak() {
        let gradient = ramp();
        assert_eq!(
            gradient.color_at(&ColorContext { offset: 0, span: 1 }),
            Rgb888::new(200, 0, 0)
        );
    }
}
