//! Parser for the `.mtl`-like material library format of §6:
//! `newmtl`, `Ka`, `Kd`, `Ks`, `Ke`, `Ns`, `Ni`, `al`.

use std::path::Path;

use crate::error::SceneError;
use crate::material::{Albedo, Material};
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

fn parse_three(tokens: &[&str], line_no: usize) -> Result<Vector3, SceneError> {
    Ok(Vector3::new(
        parse_f64(tokens, 1, line_no)?,
        parse_f64(tokens, 2, line_no)?,
        parse_f64(tokens, 3, line_no)?,
    ))
}

pub fn parse_materials(input: &str) -> Result<Vec<Material>, SceneError> {
    let mut materials = Vec::new();
    let mut current: Option<Material> = None;

    for (line_no, line) in input.lines().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&directive) = tokens.first() else {
            continue;
        };

        match directive {
            "newmtl" => {
                if let Some(material) = current.take() {
                    materials.push(material);
                }
                let name = tokens
                    .get(1)
                    .ok_or_else(|| parse_err(line_no, "newmtl missing a name"))?;
                current = Some(Material {
                    name: (*name).to_string(),
                    ..Default::default()
                });
            }
            "Ka" => {
                let color = parse_three(&tokens, line_no)?;
                current
                    .as_mut()
                    .ok_or_else(|| parse_err(line_no, "Ka before newmtl"))?
                    .ambient_color = color;
            }
            "Kd" => {
                let color = parse_three(&tokens, line_no)?;
                current
                    .as_mut()
                    .ok_or_else(|| parse_err(line_no, "Kd before newmtl"))?
                    .diffuse_color = color;
            }
            "Ks" => {
                let color = parse_three(&tokens, line_no)?;
                current
                    .as_mut()
                    .ok_or_else(|| parse_err(line_no, "Ks before newmtl"))?
                    .specular_color = color;
            }
            "Ke" => {
                let color = parse_three(&tokens, line_no)?;
                current
                    .as_mut()
                    .ok_or_else(|| parse_err(line_no, "Ke before newmtl"))?
                    .emission_intensity = color;
            }
            "Ns" => {
                let exponent = parse_f64(&tokens, 1, line_no)?;
                current
                    .as_mut()
                    .ok_or_else(|| parse_err(line_no, "Ns before newmtl"))?
                    .specular_exponent = exponent;
            }
            "Ni" => {
                let index = parse_f64(&tokens, 1, line_no)?;
                current
                    .as_mut()
                    .ok_or_else(|| parse_err(line_no, "Ni before newmtl"))?
                    .refraction_index = index;
            }
            "al" => {
                let kd = parse_f64(&tokens, 1, line_no)?;
                let kr = parse_f64(&tokens, 2, line_no)?;
                let kt = parse_f64(&tokens, 3, line_no)?;
                current
                    .as_mut()
                    .ok_or_else(|| parse_err(line_no, "al before newmtl"))?
                    .albedo = Albedo::new(kd, kr, kt);
            }
            _ => {}
        }
    }

    if let Some(material) = current.take() {
        materials.push(material);
    }

    Ok(materials)
}

pub fn read_materials(path: &Path) -> Result<Vec<Material>, SceneError> {
    let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_materials(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parses_a_single_material() {
        let text = "newmtl glass\nKa 0 0 0\nKd 0.6 0.7 0.8\nKs 0.5 0.5 0.5\nNs 125\nNi 1.5\nal 0.0 0.5 0.8\n";
        let materials = parse_materials(text).unwrap();
        assert_eq!(materials.len(), 1);
        let m = &materials[0];
        assert_eq!(m.name, "glass");
        assert_abs_diff_eq!(m.diffuse_color, Vector3::new(0.6, 0.7, 0.8));
        assert_abs_diff_eq!(m.specular_exponent, 125.0);
        assert_abs_diff_eq!(m.albedo.kt, 0.8);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let materials = parse_materials("newmtl bare\n").unwrap();
        let m = &materials[0];
        assert_abs_diff_eq!(m.albedo.kd, 1.0);
        assert_abs_diff_eq!(m.albedo.kr, 0.0);
        assert_abs_diff_eq!(m.specular_exponent, 0.0);
        assert_abs_diff_eq!(m.refraction_index, 0.0);
    }

    #[test]
    fn multiple_materials_are_all_kept() {
        let materials = parse_materials("newmtl a\nKd 1 0 0\nnewmtl b\nKd 0 1 0\n").unwrap();
        assert_eq!(materials.len(), 2);
        assert_eq!(materials[0].name, "a");
        assert_eq!(materials[1].name, "b");
    }
}
