//! Maps a pixel coordinate to a world-space primary ray.

use std::f64::consts::FRAC_PI_2;

use crate::ray::Ray;
use crate::vector::Vector3;

/// Threshold below which the raw `right` vector is considered degenerate
/// (camera looking straight up or down the world-up axis).
const DEGENERATE_RIGHT_EPSILON: f64 = 1e-4;

#[derive(Clone, Copy, Debug)]
pub struct CameraOptions {
    pub width: u32,
    pub height: u32,
    pub fov: f64,
    pub look_from: Vector3,
    pub look_to: Vector3,
}

impl CameraOptions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default_for(width, height)
        }
    }

    fn default_for(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fov: FRAC_PI_2,
            look_from: Vector3::zero(),
            look_to: Vector3::new(0.0, 0.0, -1.0),
        }
    }
}

#[derive(Default)]
pub struct CameraOptionsBuilder {
    width: u32,
    height: u32,
    fov: Option<f64>,
    look_from: Option<Vector3>,
    look_to: Option<Vector3>,
}

impl CameraOptionsBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn fov(mut self, fov: f64) -> Self {
        self.fov = Some(fov);
        self
    }

    pub fn look_from(mut self, look_from: Vector3) -> Self {
        self.look_from = Some(look_from);
        self
    }

    pub fn look_to(mut self, look_to: Vector3) -> Self {
        self.look_to = Some(look_to);
        self
    }

    pub fn build(self) -> CameraOptions {
        let defaults = CameraOptions::new(self.width, self.height);
        CameraOptions {
            width: self.width,
            height: self.height,
            fov: self.fov.unwrap_or(defaults.fov),
            look_from: self.look_from.unwrap_or(defaults.look_from),
            look_to: self.look_to.unwrap_or(defaults.look_to),
        }
    }
}

/// An orthonormal camera frame built once per render and reused for every
/// pixel's primary ray.
pub struct Camera {
    width: u32,
    height: u32,
    origin: Vector3,
    backward: Vector3,
    right: Vector3,
    up: Vector3,
}

impl Camera {
    pub fn new(options: &CameraOptions) -> Self {
        let backward = (options.look_from - options.look_to).normalize();
        let world_up = Vector3::new(0.0, 1.0, 0.0);
        let right_raw = world_up.cross(&backward);

        let (mut right, mut up) = if right_raw.length() < DEGENERATE_RIGHT_EPSILON {
            (Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0))
        } else {
            let right = right_raw.normalize();
            let up = right.cross(&backward).normalize();
            (right, up)
        };

        let pixel_pitch = 2.0 * (options.fov / 2.0).tan() / options.height as f64;
        right = right * pixel_pitch;
        up = up * pixel_pitch;

        Self {
            width: options.width,
            height: options.height,
            origin: options.look_from,
            backward,
            right,
            up,
        }
    }

    /// Primary ray through pixel `(i, j)`: `i` horizontal in `[0, width)`,
    /// `j` vertical in `[0, height)`, with `j = 0` at the top of the image.
    pub fn ray_for_pixel(&self, i: u32, j: u32) -> Ray {
        let horiz = (2 * i as i64 - self.width as i64 + 1) as f64 / 2.0;
        let vert = (2 * j as i64 - self.height as i64 + 1) as f64 / 2.0;

        let direction = self.right * horiz + self.up * vert - self.backward;
        Ray::new(self.origin, direction.normalize())
    }
}
