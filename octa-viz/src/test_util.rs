use alloc::{vec, vec::Vec};

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::Pixel;

/// In-memory draw target for render tests.
pub struct Framebuffer {
    size: Size,
    pixels: Vec<Rgb888>,
}

impl Framebuffer {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![Rgb888::new(0, 0, 0); (size.width * size.height) as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb888 {
        self.pixels[(y * self.size.width + x) as usize]
    }

    pub fn count_not(&self, color: Rgb888) -> usize {
        self.pixels.iter().filter(|&&p| p != color).count()
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Rgb888>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && point.y >= 0
                && (point.x as u32) < self.size.width
                && (point.y as u32) < self.size.height
            {
                self.pixels[(point.y as u32 * self.size.width + point.x as u32) as usize] = color;
            }
        }
        Ok(())
    }
}
