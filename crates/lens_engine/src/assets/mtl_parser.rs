//! MTL (Material Template Library) file parser
//!
//! Parses Wavefront .mtl files and converts each entry to the shading model
//! the scene asks for.

use std::collections::HashMap;

use crate::assets::{AssetError, AssetResult, MaterialModel};
use crate::foundation::math::Color;
use crate::render::{MaterialHandle, PbrMaterialData, PhongMaterialData};

/// Parsed MTL material (Wavefront Phong model)
#[derive(Debug, Clone, PartialEq)]
pub struct MtlData {
    /// Material name
    pub name: String,
    /// Ambient color (Ka)
    pub ambient: Color,
    /// Diffuse color (Kd), the PBR albedo
    pub diffuse: Color,
    /// Specular color (Ks)
    pub specular: Color,
    /// Specular exponent (Ns), 0 to 1000
    pub specular_exponent: f32,
    /// Index of refraction (Ni)
    pub optical_density: f32,
    /// Opacity (d)
    pub dissolve: f32,
    /// Illumination model (illum)
    pub illumination_model: u32,
}

impl Default for MtlData {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Color::splat(0.0),
            diffuse: Color::splat(0.8),
            specular: Color::splat(0.5),
            specular_exponent: 250.0,
            optical_density: 1.5,
            dissolve: 1.0,
            illumination_model: 2,
        }
    }
}

impl MtlData {
    /// Convert to metallic-roughness constants.
    ///
    /// Roughness falls off with the square root of the exponent; only the
    /// reflective illumination models (3 and 6) carry metalness, taken from
    /// the first ambient channel.
    pub fn to_pbr(&self) -> PbrMaterialData {
        let metalness = match self.illumination_model {
            3 | 6 => self.ambient.r,
            _ => 0.0,
        };
        PbrMaterialData {
            albedo: self.diffuse,
            alpha: self.dissolve,
            roughness: (1.0 - self.specular_exponent.max(0.0).sqrt() / 30.0).clamp(0.0, 1.0),
            ior: self.optical_density,
            ambient_occlusion: 1.0,
            metalness: metalness.clamp(0.0, 1.0),
        }
    }

    /// Convert to Phong constants
    pub fn to_phong(&self) -> PhongMaterialData {
        PhongMaterialData {
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            alpha: self.dissolve,
            shininess: self.specular_exponent,
        }
    }

    /// Material handle for the requested shading model
    pub fn to_handle(&self, model: MaterialModel) -> MaterialHandle {
        match model {
            MaterialModel::Pbr => self.to_pbr().into(),
            MaterialModel::Phong => self.to_phong().into(),
        }
    }
}

/// MTL file parser
pub struct MtlParser;

impl MtlParser {
    /// Parse MTL file contents into a map of material name to data
    pub fn parse(contents: &str) -> AssetResult<HashMap<String, MtlData>> {
        let mut materials = HashMap::new();
        let mut current: Option<MtlData> = None;

        for (index, line) in contents.lines().enumerate() {
            let line_number = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let Some(command) = tokens.next() else { continue };

            if command == "newmtl" {
                if let Some(material) = current.take() {
                    materials.insert(material.name.clone(), material);
                }
                let name = tokens.next().ok_or_else(|| AssetError::Parse {
                    line: line_number,
                    message: "newmtl missing material name".to_string(),
                })?;
                current = Some(MtlData { name: name.to_string(), ..MtlData::default() });
                continue;
            }

            // Properties before the first newmtl have nothing to apply to
            let Some(material) = current.as_mut() else { continue };
            match command {
                "Ka" => material.ambient = parse_color(&mut tokens, line_number, command)?,
                "Kd" => material.diffuse = parse_color(&mut tokens, line_number, command)?,
                "Ks" => material.specular = parse_color(&mut tokens, line_number, command)?,
                "Ns" => material.specular_exponent = parse_number(&mut tokens, line_number, command)?,
                "Ni" => material.optical_density = parse_number(&mut tokens, line_number, command)?,
                "d" => material.dissolve = parse_number(&mut tokens, line_number, command)?,
                "Tr" => material.dissolve = 1.0 - parse_number::<f32>(&mut tokens, line_number, command)?,
                "illum" => material.illumination_model = parse_number(&mut tokens, line_number, command)?,
                _ => {}
            }
        }

        if let Some(material) = current {
            materials.insert(material.name.clone(), material);
        }

        Ok(materials)
    }
}

fn parse_number<'a, T: std::str::FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    command: &str,
) -> AssetResult<T> {
    let token = tokens
        .next()
        .ok_or_else(|| AssetError::Parse { line, message: format!("{command} missing value") })?;
    token
        .parse()
        .map_err(|_| AssetError::Parse { line, message: format!("{command} has invalid value '{token}'") })
}

/// Parse one to three channels; a single value applies to all three
fn parse_color<'a>(tokens: &mut impl Iterator<Item = &'a str>, line: usize, command: &str) -> AssetResult<Color> {
    let r: f32 = parse_number(tokens, line, command)?;
    let rest: Vec<f32> = tokens
        .take(2)
        .map(|token| {
            token
                .parse()
                .map_err(|_| AssetError::Parse { line, message: format!("{command} has invalid value '{token}'") })
        })
        .collect::<AssetResult<_>>()?;
    match rest.as_slice() {
        [] => Ok(Color::splat(r)),
        [g, b] => Ok(Color::new(r, *g, *b)),
        _ => Err(AssetError::Parse { line, message: format!("{command} needs 1 or 3 values") }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE: &str = "\
# Blender MTL File
newmtl Shell
Ns 225.000000
Ka 1.000000 1.000000 1.000000
Kd 0.800000 0.100000 0.100000
Ks 0.500000 0.500000 0.500000
Ni 1.450000
d 1.000000
illum 2

newmtl Chrome
Ns 900
Ka 0.9 0.9 0.9
Kd 0.6 0.6 0.6
Ni 2.5
d 0.5
illum 3
";

    #[test]
    fn test_parse_materials() {
        let materials = MtlParser::parse(SAMPLE).unwrap();
        assert_eq!(materials.len(), 2);

        let shell = &materials["Shell"];
        assert_eq!(shell.diffuse, Color::new(0.8, 0.1, 0.1));
        assert_eq!(shell.specular_exponent, 225.0);
        assert_eq!(shell.optical_density, 1.45);
        assert_eq!(shell.illumination_model, 2);
    }

    #[test]
    fn test_pbr_conversion() {
        let materials = MtlParser::parse(SAMPLE).unwrap();

        let shell = materials["Shell"].to_pbr();
        assert_relative_eq!(shell.roughness, 0.5, epsilon = 1e-6);
        assert_eq!(shell.metalness, 0.0);
        assert_eq!(shell.albedo, Color::new(0.8, 0.1, 0.1));
        assert_eq!(shell.ambient_occlusion, 1.0);
        assert_eq!(shell.ior, 1.45);

        let chrome = materials["Chrome"].to_pbr();
        assert_relative_eq!(chrome.roughness, 0.0, epsilon = 1e-6);
        assert_relative_eq!(chrome.metalness, 0.9);
        assert_eq!(chrome.alpha, 0.5);
    }

    #[test]
    fn test_phong_conversion() {
        let materials = MtlParser::parse(SAMPLE).unwrap();
        let handle = materials["Shell"].to_handle(MaterialModel::Phong);

        let phong = handle.as_phong().unwrap();
        assert_eq!(phong.shininess, 225.0);
        assert_eq!(phong.ambient, Color::splat(1.0));
    }

    #[test]
    fn test_scalar_color_applies_to_all_channels() {
        let materials = MtlParser::parse("newmtl m\nKa 0.25\n").unwrap();
        assert_eq!(materials["m"].ambient, Color::splat(0.25));
    }

    #[test]
    fn test_invalid_value_reports_line() {
        let error = MtlParser::parse("newmtl m\n\nNs abc\n").unwrap_err();
        assert!(matches!(error, AssetError::Parse { line: 3, .. }));
    }
}
