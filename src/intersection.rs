use crate::ray::Ray;
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use crate::vector::Vector3;

/// Parallelism epsilon for Möller–Trumbore. Kept separate from
/// `shading::RAY_EPSILON` — see `DESIGN.md`, "Floating-point thresholds".
pub const TRIANGLE_EPSILON: f64 = 1e-7;

#[derive(Clone, Copy, Debug)]
pub struct Intersection {
    pub position: Vector3,
    pub normal: Vector3,
    pub distance: f64,
}

/// Ray vs sphere, following the `tca`/`thc` formulation: pick the nearer
/// positive root, falling back to the farther one when the origin is
/// inside (or exactly on) the sphere.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere) -> Option<Intersection> {
    let dir_len = ray.direction.length();
    if dir_len <= 0.0 {
        return None;
    }
    let dir_hat = ray.direction * (1.0 / dir_len);

    let l = sphere.center - ray.origin;
    let tca = l.dot(&dir_hat);
    let l2 = l.dot(&l);
    let d2 = l2 - tca * tca;
    let r2 = sphere.radius * sphere.radius;
    if d2 > r2 {
        return None;
    }
    let thc = (r2 - d2).sqrt();
    let t1 = tca - thc;
    let t2 = tca + thc;

    let t = if tca > 0.0 && t1 > 0.0 {
        t1
    } else if tca > 0.0 {
        t2
    } else if tca + thc > 0.0 {
        t2
    } else {
        return None;
    };

    let position = ray.origin + dir_hat * t;
    let origin_outside = l2 > r2;
    let normal = if origin_outside {
        (position - sphere.center).normalize()
    } else {
        (sphere.center - position).normalize()
    };

    Some(Intersection {
        position,
        normal,
        distance: (position - ray.origin).length(),
    })
}

/// Ray vs triangle (Möller–Trumbore). Always returns a normal facing the
/// incoming ray (flips the geometric face normal if needed).
pub fn intersect_triangle(ray: &Ray, triangle: &Triangle) -> Option<Intersection> {
    let e1 = triangle.v1() - triangle.v0();
    let e2 = triangle.v2() - triangle.v0();
    let h = ray.direction.cross(&e2);
    let a = e1.dot(&h);
    if a.abs() < TRIANGLE_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - triangle.v0();
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&e1);
    let v = f * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * e2.dot(&q);
    if t <= TRIANGLE_EPSILON {
        return None;
    }

    let position = ray.origin + ray.direction * t;
    let mut normal = e1.cross(&e2).normalize();
    if normal.dot(&ray.direction) > 0.0 {
        normal = -normal;
    }

    Some(Intersection {
        position,
        normal,
        distance: (position - ray.origin).length(),
    })
}

/// Unnormalized sub-triangle areas `(|B,C,P|, |C,A,P|, |A,B,P|)`, used as
/// barycentric-style weights for shading-normal interpolation. Deliberately
/// *not* normalized to sum to 1 — this matches the reference implementation
/// and is part of the spec (see `DESIGN.md` Open Question 1); don't "fix"
/// it into a convex combination.
pub fn barycentric_weights(triangle: &Triangle, point: Vector3) -> (f64, f64, f64) {
    let s_bcp = Triangle::new(triangle.v1(), triangle.v2(), point).area();
    let s_cap = Triangle::new(triangle.v2(), triangle.v0(), point).area();
    let s_abp = Triangle::new(triangle.v0(), triangle.v1(), point).area();
    (s_bcp, s_cap, s_abp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sphere_hit_from_outside() {
        let ray = Ray::new(Vector3::new(5.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0));
        let sphere = Sphere::new(Vector3::zero(), 2.0);
        let hit = intersect_sphere(&ray, &sphere).unwrap();
        assert_abs_diff_eq!(hit.position, Vector3::new(2.0, 0.0, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(hit.normal, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(hit.distance, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn sphere_miss_grazing() {
        let ray = Ray::new(Vector3::new(5.0, 0.0, 2.2), Vector3::new(-1.0, 0.0, 0.0));
        let sphere = Sphere::new(Vector3::zero(), 2.0);
        assert!(intersect_sphere(&ray, &sphere).is_none());
    }

    #[test]
    fn sphere_hit_from_inside_reports_inward_normal() {
        let ray = Ray::new(Vector3::zero(), Vector3::new(-1.0, 0.0, 0.0));
        let sphere = Sphere::new(Vector3::zero(), 2.0);
        let hit = intersect_sphere(&ray, &sphere).unwrap();
        assert_abs_diff_eq!(hit.position, Vector3::new(-2.0, 0.0, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(hit.normal, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(hit.distance, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn triangle_hit() {
        let triangle = Triangle::new(
            Vector3::zero(),
            Vector3::new(4.0, 0.0, 0.0),
            Vector3::new(0.0, 4.0, 0.0),
        );
        let ray = Ray::new(Vector3::new(2.0, 2.0, 1.0), Vector3::new(0.0, 0.0, -1.0));
        let hit = intersect_triangle(&ray, &triangle).unwrap();
        assert_abs_diff_eq!(hit.position, Vector3::new(2.0, 2.0, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(hit.normal, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-9);
        assert_abs_diff_eq!(hit.distance, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn triangle_miss() {
        let triangle = Triangle::new(
            Vector3::zero(),
            Vector3::new(4.0, 0.0, 0.0),
            Vector3::new(0.0, 4.0, 0.0),
        );
        let ray = Ray::new(Vector3::new(3.0, 3.0, 1.0), Vector3::new(-1.0, -1.0, 0.0));
        assert!(intersect_triangle(&ray, &triangle).is_none());
    }

    #[test]
    fn triangle_parallel_ray_misses() {
        let triangle = Triangle::new(
            Vector3::zero(),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        let ray = Ray::new(Vector3::new(0.0, 0.0, 1.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(intersect_triangle(&ray, &triangle).is_none());
    }

    #[test]
    fn barycentric_weights_are_not_normalized() {
        // Degenerate case: the point sits at a vertex, so two of the three
        // sub-triangle areas collapse to zero and the third equals the
        // full triangle's area -- which is not 1 in general.
        let triangle = Triangle::new(
            Vector3::zero(),
            Vector3::new(4.0, 0.0, 0.0),
            Vector3::new(0.0, 4.0, 0.0),
        );
        let (w0, w1, w2) = barycentric_weights(&triangle, triangle.v0());
        assert_abs_diff_eq!(w1, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(w2, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(w0, triangle.area(), epsilon = 1e-9);
    }
}
