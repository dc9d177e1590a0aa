//! Cube-map background sampled for primary (or secondary) rays that miss
//! every object in the scene. Image layout is a 4:3 cross: width = 4
//! blocks, height = 3 blocks (see §4.7 / §6 for the per-face pixel math).

use std::path::Path;

use image::RgbImage;

use crate::error::SceneError;
use crate::ray::Ray;
use crate::vector::Vector3;

enum Face {
    Front,
    Back,
    Top,
    Bottom,
    Right,
    Left,
}

pub struct Skybox {
    image: RgbImage,
    block: u32,
}

impl Skybox {
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let image = image::open(path)
            .map_err(|_| SceneError::MissingResource(path.to_path_buf()))?
            .into_rgb8();
        let block = image.width() / 4;
        Ok(Self { image, block })
    }

    fn face_for(direction: &Vector3) -> Face {
        match direction.dominant_axis() {
            0 => {
                if direction.x() > 0.0 {
                    Face::Front
                } else {
                    Face::Back
                }
            }
            1 => {
                if direction.y() > 0.0 {
                    Face::Top
                } else {
                    Face::Bottom
                }
            }
            _ => {
                if direction.z() > 0.0 {
                    Face::Right
                } else {
                    Face::Left
                }
            }
        }
    }

    /// Sample the cube map for a ray that missed everything in the scene.
    /// Returns linear-light color components in `[0, 1]`.
    pub fn sample(&self, ray: &Ray) -> Vector3 {
        let direction = ray.direction;
        let dominant = direction.get(direction.dominant_axis()).abs();
        if dominant <= 0.0 {
            return Vector3::zero();
        }
        let c = direction * (1.0 / dominant);
        let b = self.block as f64;

        let (x, y) = match Self::face_for(&direction) {
            Face::Front => (
                1.5 * b + (b * c.z() / 2.0).floor(),
                1.5 * b + (b * -c.y() / 2.0).floor(),
            ),
            Face::Back => (
                3.5 * b + (b * -c.z() / 2.0).floor(),
                1.5 * b + (b * -c.y() / 2.0).floor(),
            ),
            Face::Top => (
                1.5 * b + (b * c.z() / 2.0).floor(),
                0.5 * b + (b * c.x() / 2.0).floor(),
            ),
            Face::Bottom => (
                1.5 * b + (b * c.z() / 2.0).floor(),
                2.5 * b + (b * -c.x() / 2.0).floor(),
            ),
            Face::Right => (
                2.5 * b + (b * -c.x() / 2.0).floor(),
                1.5 * b + (b * -c.y() / 2.0).floor(),
            ),
            Face::Left => (
                0.5 * b + (b * c.x() / 2.0).floor(),
                1.5 * b + (b * -c.y() / 2.0).floor(),
            ),
        };

        let x = (x as i64).clamp(0, self.image.width() as i64 - 1) as u32;
        let y = (y as i64).clamp(0, self.image.height() as i64 - 1) as u32;
        let pixel = self.image.get_pixel(x, y);

        Vector3::new(
            pixel[0] as f64 / 256.0,
            pixel[1] as f64 / 256.0,
            pixel[2] as f64 / 256.0,
        )
    }
}
