//! The in-memory scene the renderer consumes: triangle-mesh objects,
//! sphere objects, point lights, a material arena, and an optional skybox.

pub mod material_reader;
pub mod reader;

use std::collections::HashMap;

use crate::intersection::{self, Intersection};
use crate::light::Light;
use crate::material::Material;
use crate::ray::Ray;
use crate::skybox::Skybox;
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use crate::vector::Vector3;

/// Stable index into a `Scene`'s material arena. Objects hold this instead
/// of a borrow so meshes/spheres don't need a lifetime parameter tied to
/// the scene (see `DESIGN.md`, "Shared immutable references").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaterialHandle(usize);

#[derive(Default)]
pub struct MaterialTable {
    materials: Vec<Material>,
    by_name: HashMap<String, usize>,
}

impl MaterialTable {
    pub fn insert(&mut self, material: Material) -> MaterialHandle {
        let index = self.materials.len();
        self.by_name.insert(material.name.clone(), index);
        self.materials.push(material);
        MaterialHandle(index)
    }

    pub fn handle_for(&self, name: &str) -> Option<MaterialHandle> {
        self.by_name.get(name).map(|&index| MaterialHandle(index))
    }

    pub fn get(&self, handle: MaterialHandle) -> &Material {
        &self.materials[handle.0]
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// A triangle object. If all three per-vertex normals are present the
/// shading normal is their (unnormalized-weight) barycentric blend;
/// otherwise the flat face normal from the intersection test is used.
pub struct MeshObject {
    pub material: MaterialHandle,
    pub triangle: Triangle,
    pub vertex_normals: [Option<Vector3>; 3],
}

pub struct SphereObject {
    pub material: MaterialHandle,
    pub sphere: Sphere,
}

#[derive(Default)]
pub struct Scene {
    pub meshes: Vec<MeshObject>,
    pub spheres: Vec<SphereObject>,
    pub lights: Vec<Light>,
    pub materials: MaterialTable,
    pub skybox: Option<Skybox>,
}

impl Scene {
    /// Barycentric-blended shading normal for a mesh hit, honoring the
    /// "flat unless all three corners have normals" rule.
    fn mesh_shading_normal(mesh: &MeshObject, hit: &Intersection) -> Vector3 {
        match (
            mesh.vertex_normals[0],
            mesh.vertex_normals[1],
            mesh.vertex_normals[2],
        ) {
            (Some(n0), Some(n1), Some(n2)) => {
                let (w0, w1, w2) = intersection::barycentric_weights(&mesh.triangle, hit.position);
                (n0 * w0 + n1 * w1 + n2 * w2).normalize()
            }
            _ => hit.normal,
        }
    }

    /// Closest intersection across every mesh and sphere object, with the
    /// owning material. Meshes are tested before spheres; ties (equal
    /// distance) keep whichever was encountered first, so iteration order
    /// is deterministic and reproducible.
    pub fn closest_intersection(&self, ray: &Ray) -> Option<(Intersection, &Material)> {
        let mut best: Option<(Intersection, &Material)> = None;

        for mesh in &self.meshes {
            if let Some(mut hit) = intersection::intersect_triangle(ray, &mesh.triangle) {
                let closer = best
                    .as_ref()
                    .map_or(true, |(current, _)| hit.distance < current.distance);
                if closer {
                    hit.normal = Self::mesh_shading_normal(mesh, &hit);
                    best = Some((hit, self.materials.get(mesh.material)));
                }
            }
        }

        for sphere_obj in &self.spheres {
            if let Some(hit) = intersection::intersect_sphere(ray, &sphere_obj.sphere) {
                let closer = best
                    .as_ref()
                    .map_or(true, |(current, _)| hit.distance < current.distance);
                if closer {
                    best = Some((hit, self.materials.get(sphere_obj.material)));
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle_mesh(material: MaterialHandle) -> MeshObject {
        MeshObject {
            material,
            triangle: Triangle::new(
                Vector3::zero(),
                Vector3::new(4.0, 0.0, 0.0),
                Vector3::new(0.0, 4.0, 0.0),
            ),
            vertex_normals: [None, None, None],
        }
    }

    #[test]
    fn meshes_are_tested_before_spheres_on_tie() {
        let mut scene = Scene::default();
        let mat_a = scene.materials.insert(Material {
            name: "a".into(),
            ..Default::default()
        });
        let mat_b = scene.materials.insert(Material {
            name: "b".into(),
            ..Default::default()
        });

        scene.meshes.push(unit_triangle_mesh(mat_a));
        scene.spheres.push(SphereObject {
            material: mat_b,
            sphere: Sphere::new(Vector3::new(2.0, 2.0, 0.0), 10.0),
        });

        let ray = Ray::new(Vector3::new(2.0, 2.0, 1.0), Vector3::new(0.0, 0.0, -1.0));
        let (_, material) = scene.closest_intersection(&ray).unwrap();
        assert_eq!(material.name, "a");
    }

    #[test]
    fn missing_hit_returns_none() {
        let scene = Scene::default();
        let ray = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
        assert!(scene.closest_intersection(&ray).is_none());
    }
}
