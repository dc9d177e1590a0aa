//! The 24-bit RGB pixel surface (`Image`) the renderer fills and the CLI
//! saves as PNG. Named `canvas` rather than `image` to avoid shadowing the
//! `image` crate this module builds on.

use std::path::Path;

use image::{ImageError, Rgb, RgbImage};

/// Row-major 24-bit RGB pixel grid.
#[derive(Clone)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl Image {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0]; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[self.index(x, y)]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = self.index(x, y);
        self.pixels[idx] = rgb;
    }

    pub fn save_png(&self, path: &Path) -> Result<(), ImageError> {
        let mut buffer = RgbImage::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                buffer.put_pixel(x, y, Rgb(self.get_pixel(x, y)));
            }
        }
        buffer.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_image_is_black() {
        let img = Image::new(4, 3);
        assert_eq!(img.get_pixel(2, 1), [0, 0, 0]);
    }

    #[test]
    fn set_and_get_round_trips() {
        let mut img = Image::new(4, 3);
        img.set_pixel(1, 2, [10, 20, 30]);
        assert_eq!(img.get_pixel(1, 2), [10, 20, 30]);
        assert_eq!(img.get_pixel(0, 0), [0, 0, 0]);
    }
}
