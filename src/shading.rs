//! Recursive Whitted-style shading kernel: ambient/emission, direct
//! lighting with colored shadow rays through reach-through occluders,
//! mirror reflection, and Snell refraction.

use crate::light::Light;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::vector::{self, Vector3};

/// Self-intersection escape distance and shadow-hit equality tolerance.
/// Distinct from `vector::EPSILON` and `intersection::TRIANGLE_EPSILON` —
/// see `DESIGN.md`.
pub const RAY_EPSILON: f64 = 1e-4;

/// Outgoing radiance along `ray`. `inside` tracks whether the ray currently
/// travels through a refractive medium (flips on every refraction bounce,
/// see `DESIGN.md` on nested-medium handling); `ttl` is the recursion
/// budget and strictly decreases on every nested call, including shadow
/// recursion through reach-through occluders.
pub fn radiance(scene: &Scene, ray: &Ray, inside: bool, ttl: i32) -> Vector3 {
    if ttl < 0 {
        return Vector3::zero();
    }

    let Some((hit, material)) = scene.closest_intersection(ray) else {
        return scene
            .skybox
            .as_ref()
            .map_or(Vector3::zero(), |sky| sky.sample(ray));
    };

    let direction = ray.direction.normalize();
    let ambient = material.ambient_color + material.emission_intensity;

    let mut diffuse_sum = Vector3::zero();
    let mut specular_sum = Vector3::zero();
    for light in &scene.lights {
        let incoming = reach(scene, light, hit.position, ttl - 1);
        if incoming.length_squared() == 0.0 {
            continue;
        }

        let to_light = (light.position - hit.position).normalize();
        let diffuse_weight = to_light.dot(&hit.normal).max(0.0);
        diffuse_sum = diffuse_sum + incoming * diffuse_weight;

        let reflected = vector::reflect(&-to_light, &hit.normal).normalize();
        let spec_cos = (-reflected.dot(&direction)).max(0.0);
        specular_sum = specular_sum + incoming * spec_cos.powf(material.specular_exponent);
    }

    let diffuse = diffuse_sum.hadamard(&material.diffuse_color) * material.albedo.kd;
    let specular = specular_sum.hadamard(&material.specular_color) * material.albedo.kd;

    let reflected_term = if material.albedo.kr != 0.0 && !inside {
        let reflected_ray =
            Ray::new(hit.position, vector::reflect(&direction, &hit.normal)).advanced(RAY_EPSILON);
        let incoming = radiance(scene, &reflected_ray, false, ttl - 1);
        incoming.hadamard(&material.specular_color) * material.albedo.kr
    } else {
        Vector3::zero()
    };

    let mut refracted_term = Vector3::zero();
    if material.albedo.kt != 0.0 {
        let eta = if inside {
            material.refraction_index
        } else {
            1.0 / material.refraction_index
        };
        if let Some(refract_dir) = vector::refract(&direction, &hit.normal, eta) {
            let refracted_ray = Ray::new(hit.position, refract_dir).advanced(RAY_EPSILON);
            let incoming = radiance(scene, &refracted_ray, !inside, ttl - 1);
            refracted_term = incoming.hadamard(&material.specular_color) * material.albedo.kt;
            if inside {
                let fixup = (material.albedo.kt + material.albedo.kr) / material.albedo.kt;
                refracted_term = refracted_term * fixup;
            }
        }
    }

    ambient + diffuse + specular + reflected_term + refracted_term
}

/// How much of `light`'s intensity reaches `target`, attenuated by any
/// reach-through (perfectly transparent, non-refractive) occluders along
/// the way. Black when fully shadowed.
fn reach(scene: &Scene, light: &Light, target: Vector3, ttl: i32) -> Vector3 {
    reach_from(scene, light, light.position, target, ttl)
}

fn reach_from(scene: &Scene, light: &Light, from: Vector3, target: Vector3, ttl: i32) -> Vector3 {
    if ttl < 0 {
        return Vector3::zero();
    }

    let direction = (target - from).normalize();
    let ray = Ray::new(from, direction);
    let Some((hit, material)) = scene.closest_intersection(&ray) else {
        return Vector3::zero();
    };

    if (hit.position - target).length() < RAY_EPSILON {
        return light.intensity;
    }

    if !material.is_reach_through() {
        return Vector3::zero();
    }

    // Advance along the occluding ray's direction, not the light-to-occluder
    // normal, before recursing toward the same target.
    let attenuation = material.specular_color * material.albedo.kt;
    let past_occluder = hit.position + direction * RAY_EPSILON;
    attenuation.hadamard(&reach_from(scene, light, past_occluder, target, ttl - 1))
}
