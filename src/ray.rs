use crate::vector::Vector3;

/// Origin + direction. Direction is not required to be unit length;
/// intersection routines normalize where the math needs it.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f64) -> Vector3 {
        self.origin + self.direction * t
    }

    /// Shift the origin `epsilon` along the direction, escaping
    /// self-intersection after a bounce.
    pub fn advance(&mut self, epsilon: f64) {
        self.origin = self.origin + self.direction * epsilon;
    }

    /// Copy of `self` advanced by `epsilon` (see `advance`).
    pub fn advanced(mut self, epsilon: f64) -> Self {
        self.advance(epsilon);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn at_walks_along_direction() {
        let ray = Ray::new(Vector3::zero(), Vector3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(ray.at(3.0), Vector3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn advance_shifts_origin_by_epsilon_times_direction() {
        let mut ray = Ray::new(Vector3::zero(), Vector3::new(0.0, 1.0, 0.0));
        ray.advance(1e-4);
        assert_abs_diff_eq!(ray.origin, Vector3::new(0.0, 1e-4, 0.0), epsilon = 1e-10);
    }
}
