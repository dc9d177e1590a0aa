use crate::vector::Vector3;

/// A point light: position plus RGB radiance.
#[derive(Clone, Copy, Debug)]
pub struct Light {
    pub position: Vector3,
    pub intensity: Vector3,
}

impl Light {
    pub fn new(position: Vector3, intensity: Vector3) -> Self {
        Self { position, intensity }
    }
}
