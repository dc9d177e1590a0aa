//! Parser for the line-oriented, Wavefront-OBJ-like scene format of §6:
//! `v`, `vn`, `vt` (ignored), `f`, `mtllib`, `usemtl`, `S`, `P`, `Sky`.
//! Blank lines and unrecognized directives are ignored.

use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{MaterialHandle, MaterialTable, MeshObject, Scene, SphereObject};
use crate::error::SceneError;
use crate::light::Light;
use crate::material::Material;
use crate::skybox::Skybox;
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use crate::vector::Vector3;

fn parse_err(line_no: usize, reason: impl Into<String>) -> SceneError {
    SceneError::Parse {
        line: line_no + 1,
        reason: reason.into(),
    }
}

fn parse_f64(tokens: &[&str], index: usize, line_no: usize) -> Result<f64, SceneError> {
    tokens
        .get(index)
        .ok_or_else(|| parse_err(line_no, format!("expected a number at field {index}")))?
        .parse::<f64>()
        .map_err(|e| parse_err(line_no, format!("invalid number: {e}")))
}

fn parse_three(tokens: &[&str], line_no: usize, begin: usize) -> Result<Vector3, SceneError> {
    Ok(Vector3::new(
        parse_f64(tokens, begin, line_no)?,
        parse_f64(tokens, begin + 1, line_no)?,
        parse_f64(tokens, begin + 2, line_no)?,
    ))
}

/// Resolve a 1-based (or negative, counting from the end) OBJ-style index
/// into a 0-based index into a slice of length `len`.
fn resolve_index(raw: i64, len: usize, line_no: usize) -> Result<usize, SceneError> {
    if raw > 0 {
        Ok((raw - 1) as usize)
    } else if raw < 0 {
        let from_end = len as i64 + raw;
        if from_end < 0 {
            return Err(parse_err(line_no, "index out of range"));
        }
        Ok(from_end as usize)
    } else {
        Err(parse_err(line_no, "index 0 is not valid"))
    }
}

/// A face corner: `vertex_index[/tex][/normal_index]`. `tex` is discarded;
/// a normal index of `0` means "no normal for this corner".
struct FaceCorner {
    vertex_index: i64,
    normal_index: i64,
}

fn parse_face_corner(token: &str, line_no: usize) -> Result<FaceCorner, SceneError> {
    let parts: Vec<&str> = token.split('/').collect();
    let vertex_index = parts[0]
        .parse::<i64>()
        .map_err(|e| parse_err(line_no, format!("invalid vertex index: {e}")))?;
    let normal_index = if parts.len() >= 3 && !parts[2].is_empty() {
        parts[2]
            .parse::<i64>()
            .map_err(|e| parse_err(line_no, format!("invalid normal index: {e}")))?
    } else {
        0
    };
    Ok(FaceCorner {
        vertex_index,
        normal_index,
    })
}

struct Builder {
    vertices: Vec<Vector3>,
    normals: Vec<Vector3>,
    materials: MaterialTable,
    current_material: Option<MaterialHandle>,
    scene: Scene,
    base_dir: PathBuf,
}

impl Builder {
    fn new(base_dir: PathBuf) -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            materials: MaterialTable::default(),
            current_material: None,
            scene: Scene::default(),
            base_dir,
        }
    }

    /// Every mesh/sphere object needs a material handle; a scene file that
    /// references one before any `usemtl` gets a synthesized default so
    /// the renderer never has to special-case "no material".
    fn active_material(&mut self) -> MaterialHandle {
        if let Some(handle) = self.current_material {
            return handle;
        }
        let handle = self.materials.insert(Material::default());
        self.current_material = Some(handle);
        handle
    }

    fn resolve_vertex_normal(
        &self,
        corner: &FaceCorner,
        line_no: usize,
    ) -> Result<Option<Vector3>, SceneError> {
        if corner.normal_index == 0 {
            return Ok(None);
        }
        let idx = resolve_index(corner.normal_index, self.normals.len(), line_no)?;
        Ok(self.normals.get(idx).copied())
    }

    fn handle_face(&mut self, tokens: &[&str], line_no: usize) -> Result<(), SceneError> {
        let corner_tokens = &tokens[1..];
        if corner_tokens.len() < 3 {
            return Err(parse_err(line_no, "face needs at least 3 corners"));
        }
        let corners: Vec<FaceCorner> = corner_tokens
            .iter()
            .map(|t| parse_face_corner(t, line_no))
            .collect::<Result<_, _>>()?;

        let material = self.active_material();

        for i in 0..corners.len() - 2 {
            let triplet = [&corners[0], &corners[i + 1], &corners[i + 2]];
            let mut positions = [Vector3::zero(); 3];
            let mut vertex_normals = [None; 3];
            for (slot, corner) in triplet.into_iter().enumerate() {
                let v_idx = resolve_index(corner.vertex_index, self.vertices.len(), line_no)?;
                positions[slot] = *self.vertices.get(v_idx).ok_or_else(|| {
                    parse_err(line_no, format!("vertex index {v_idx} out of range"))
                })?;
                vertex_normals[slot] = self.resolve_vertex_normal(corner, line_no)?;
            }

            self.scene.meshes.push(MeshObject {
                material,
                triangle: Triangle::new(positions[0], positions[1], positions[2]),
                vertex_normals,
            });
        }

        Ok(())
    }

    fn handle_line(&mut self, line: &str, line_no: usize) -> Result<(), SceneError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&directive) = tokens.first() else {
            return Ok(());
        };

        match directive {
            "v" => self.vertices.push(parse_three(&tokens, line_no, 1)?),
            "vn" => self.normals.push(parse_three(&tokens, line_no, 1)?),
            "vt" => {}
            "f" => self.handle_face(&tokens, line_no)?,
            "mtllib" => {
                let rel = tokens
                    .get(1)
                    .ok_or_else(|| parse_err(line_no, "mtllib missing a path"))?;
                let path = self.base_dir.join(rel);
                if !path.exists() {
                    return Err(SceneError::MissingResource(path));
                }
                let materials = super::material_reader::read_materials(&path)?;
                for material in materials {
                    self.materials.insert(material);
                }
            }
            "usemtl" => {
                let name = tokens
                    .get(1)
                    .ok_or_else(|| parse_err(line_no, "usemtl missing a name"))?;
                let handle = self
                    .materials
                    .handle_for(name)
                    .ok_or_else(|| SceneError::MissingMaterial((*name).to_string()))?;
                self.current_material = Some(handle);
            }
            "S" => {
                let center = parse_three(&tokens, line_no, 1)?;
                let radius = parse_f64(&tokens, 4, line_no)?;
                let material = self.active_material();
                self.scene.spheres.push(SphereObject {
                    material,
                    sphere: Sphere::new(center, radius),
                });
            }
            "P" => {
                let position = parse_three(&tokens, line_no, 1)?;
                let intensity = parse_three(&tokens, line_no, 4)?;
                self.scene.lights.push(Light::new(position, intensity));
            }
            "Sky" => {
                let rel = tokens
                    .last()
                    .ok_or_else(|| parse_err(line_no, "Sky missing a path"))?;
                let path = self.base_dir.join(rel);
                if !path.exists() {
                    return Err(SceneError::MissingResource(path));
                }
                self.scene.skybox = Some(Skybox::load(&path)?);
            }
            _ => {}
        }

        Ok(())
    }

    fn finish(mut self) -> Scene {
        self.scene.materials = self.materials;
        self.scene
    }
}

pub fn parse_scene(input: &str, base_dir: &Path) -> Result<Scene, SceneError> {
    let mut builder = Builder::new(base_dir.to_path_buf());
    for (line_no, line) in input.lines().enumerate() {
        builder.handle_line(line, line_no)?;
    }
    let scene = builder.finish();
    info!(
        "parsed scene: {} meshes, {} spheres, {} lights, {} materials, skybox={}",
        scene.meshes.len(),
        scene.spheres.len(),
        scene.lights.len(),
        scene.materials.len(),
        scene.skybox.is_some()
    );
    Ok(scene)
}

pub fn read_scene(path: &Path) -> Result<Scene, SceneError> {
    debug!("reading scene file {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    parse_scene(&text, base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vertices_triangle_sphere_and_light() {
        let text = "\
v 0 0 0
v 4 0 0
v 0 4 0
f 1 2 3
S 1 1 1 2
P 10 10 10 1 1 1
";
        let scene = parse_scene(text, Path::new(".")).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.spheres.len(), 1);
        assert_eq!(scene.lights.len(), 1);
    }

    #[test]
    fn fan_triangulates_polygons() {
        let text = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let scene = parse_scene(text, Path::new(".")).unwrap();
        assert_eq!(scene.meshes.len(), 2);
    }

    #[test]
    fn negative_indices_count_from_the_end() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
f -3 -2 -1
";
        let scene = parse_scene(text, Path::new(".")).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        let tri = &scene.meshes[0].triangle;
        assert_eq!(tri.v0().to_array(), [0.0, 0.0, 0.0]);
        assert_eq!(tri.v2().to_array(), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn usemtl_for_unknown_material_is_an_error() {
        let text = "usemtl ghost\n";
        let err = parse_scene(text, Path::new(".")).unwrap_err();
        assert!(matches!(err, SceneError::MissingMaterial(_)));
    }

    #[test]
    fn zero_normal_index_means_no_normal() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
f 1/0/0 2/0/1 3/0/1
";
        let scene = parse_scene(text, Path::new(".")).unwrap();
        let normals = scene.meshes[0].vertex_normals;
        assert!(normals[0].is_none());
        assert!(normals[1].is_some());
    }

    #[test]
    fn unknown_directives_and_blank_lines_are_ignored() {
        let text = "\n# not a real comment token but still unknown\nqq 1 2 3\nv 0 0 0\n";
        let scene = parse_scene(text, Path::new(".")).unwrap();
        assert_eq!(scene.meshes.len(), 0);
    }
}
