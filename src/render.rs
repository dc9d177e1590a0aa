//! Top-level render loop: reads a scene, builds a camera, fills a pixel
//! grid in one of three modes, and (for `Full`) tone-maps the result.

use std::fmt::Write;
use std::path::Path;
use std::str::FromStr;

use indicatif::{ParallelProgressIterator, ProgressState, ProgressStyle};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::camera::{Camera, CameraOptions};
use crate::canvas::Image;
use crate::error::RenderError;
use crate::scene::reader;
use crate::scene::Scene;
use crate::shading::{self, RAY_EPSILON};
use crate::vector::Vector3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Depth,
    Normal,
    Full,
}

/// Parses the three render-mode enumerants from a CLI/config string,
/// case-insensitively. The in-crate `RenderMode` match is always
/// exhaustive; this is the one fallible edge from the outside world that
/// can actually produce `RenderError::BadMode` (§7).
impl FromStr for RenderMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "depth" => Ok(Self::Depth),
            "normal" => Ok(Self::Normal),
            "full" => Ok(Self::Full),
            _ => Err(RenderError::BadMode(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub ttl_depth: i32,
    pub mode: RenderMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ttl_depth: 4,
            mode: RenderMode::Full,
        }
    }
}

fn progress_bar_style() -> ProgressStyle {
    let text = [
        "[{bar:48.cyan/blue}] {percent}% {spinner:.green}",
        "Elapsed Time   : {elapsed_precise}",
        "ETA            : {eta}",
        "Rendered       : {pos}/{len} pixels",
        "Rate           : {per_sec}",
    ]
    .join("\n");

    ProgressStyle::with_template(&text)
        .unwrap()
        .with_key("per_sec", |state: &ProgressState, w: &mut dyn Write| {
            _ = write!(w, "{:.0} px/sec", state.per_sec());
        })
        .progress_chars("#>-")
}

fn byte_from_unit(v: f64, epsilon: f64) -> u8 {
    let scaled = ((v - epsilon) * 256.0).floor();
    scaled.clamp(0.0, 255.0) as u8
}

/// Read the scene at `scene_path`, build the requested camera, and render
/// it in `render_options.mode`.
pub fn render(
    scene_path: &Path,
    camera_options: CameraOptions,
    render_options: RenderOptions,
) -> Result<Image, RenderError> {
    let scene = reader::read_scene(scene_path)?;
    let camera = Camera::new(&camera_options);
    let width = camera_options.width;
    let height = camera_options.height;

    let image = match render_options.mode {
        RenderMode::Depth => render_depth(&scene, &camera, width, height),
        RenderMode::Normal => render_normal(&scene, &camera, width, height),
        RenderMode::Full => render_full(&scene, &camera, width, height, render_options.ttl_depth),
    };

    Ok(image)
}

fn pixel_coords(idx: usize, width: u32) -> (u32, u32) {
    let idx = idx as u32;
    (idx % width, idx / width)
}

fn render_depth(scene: &Scene, camera: &Camera, width: u32, height: u32) -> Image {
    let count = (width as usize) * (height as usize);

    let distances: Vec<Option<f64>> = (0..count)
        .into_par_iter()
        .progress_with_style(progress_bar_style())
        .map(|idx| {
            let (x, y) = pixel_coords(idx, width);
            let ray = camera.ray_for_pixel(x, y);
            scene.closest_intersection(&ray).map(|(hit, _)| hit.distance)
        })
        .collect();

    let d_max = distances
        .iter()
        .filter_map(|d| *d)
        .fold(0.0_f64, f64::max);

    let mut image = Image::new(width, height);
    for (idx, distance) in distances.into_iter().enumerate() {
        let (x, y) = pixel_coords(idx, width);
        let d_prime = match distance {
            None => 1.0,
            Some(_) if d_max <= 0.0 => 0.0,
            Some(d) => d / d_max,
        };
        let byte = byte_from_unit(d_prime, RAY_EPSILON);
        image.set_pixel(x, y, [byte, byte, byte]);
    }
    image
}

fn render_normal(scene: &Scene, camera: &Camera, width: u32, height: u32) -> Image {
    let count = (width as usize) * (height as usize);

    let normals: Vec<Vector3> = (0..count)
        .into_par_iter()
        .progress_with_style(progress_bar_style())
        .map(|idx| {
            let (x, y) = pixel_coords(idx, width);
            let ray = camera.ray_for_pixel(x, y);
            scene
                .closest_intersection(&ray)
                .map_or(Vector3::splat(-1.0), |(hit, _)| hit.normal)
        })
        .collect();

    let mut image = Image::new(width, height);
    for (idx, normal) in normals.into_iter().enumerate() {
        let (x, y) = pixel_coords(idx, width);
        let remapped = normal * 0.5 + Vector3::splat(0.5);
        image.set_pixel(
            x,
            y,
            [
                byte_from_unit(remapped.x(), RAY_EPSILON),
                byte_from_unit(remapped.y(), RAY_EPSILON),
                byte_from_unit(remapped.z(), RAY_EPSILON),
            ],
        );
    }
    image
}

fn render_full(scene: &Scene, camera: &Camera, width: u32, height: u32, ttl_depth: i32) -> Image {
    let count = (width as usize) * (height as usize);

    let mut grid: Vec<Vector3> = (0..count)
        .into_par_iter()
        .progress_with_style(progress_bar_style())
        .map(|idx| {
            let (x, y) = pixel_coords(idx, width);
            let ray = camera.ray_for_pixel(x, y);
            shading::radiance(scene, &ray, false, ttl_depth)
        })
        .collect();

    tone_map_and_gamma(&mut grid);

    let mut image = Image::new(width, height);
    for (idx, color) in grid.into_iter().enumerate() {
        let (x, y) = pixel_coords(idx, width);
        image.set_pixel(
            x,
            y,
            [
                byte_from_unit(color.x(), RAY_EPSILON),
                byte_from_unit(color.y(), RAY_EPSILON),
                byte_from_unit(color.z(), RAY_EPSILON),
            ],
        );
    }
    image
}

/// Extended Reinhard tone mapping followed by gamma 2.2 encoding, in place.
/// `M`, the normalizing constant, is the largest color component across the
/// whole grid; an all-black grid (`M == 0`) is left untouched.
pub fn tone_map_and_gamma(grid: &mut [Vector3]) {
    let m = grid.iter().fold(0.0_f64, |acc, v| acc.max(v.max_component()));
    if m <= 0.0 {
        return;
    }
    let m_squared = m * m;

    for color in grid.iter_mut() {
        let map_channel = |c: f64| -> f64 {
            let reinhard = c * (1.0 + c / m_squared) / (1.0 + c);
            reinhard.powf(1.0 / 2.2)
        };
        *color = Vector3::new(
            map_channel(color.x()),
            map_channel(color.y()),
            map_channel(color.z()),
        );
    }
}
