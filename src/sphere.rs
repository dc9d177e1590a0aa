use crate::vector::Vector3;

/// A sphere primitive. `radius` is invariant-required to be positive;
/// callers building scenes are expected to uphold that (see
/// `scene::reader`, which parses `radius` straight off the scene file).
#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    pub center: Vector3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Vector3, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, p: &Vector3) -> bool {
        (*p - self.center).length() < self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_checks_distance_against_radius() {
        let s = Sphere::new(Vector3::zero(), 2.0);
        assert!(s.contains(&Vector3::new(1.0, 0.0, 0.0)));
        assert!(!s.contains(&Vector3::new(3.0, 0.0, 0.0)));
    }
}
