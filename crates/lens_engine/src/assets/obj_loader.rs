//! OBJ file loader for 3D models
//!
//! Supports the subset Blender emits for triangulated exports: `o`, `v`,
//! `vt`, `vn`, `usemtl` and triangular `f` records. Attribute pools are shared
//! across objects, each object becomes one mesh, and every face corner gets
//! its own vertex so indices are simply sequential.

use crate::assets::{AssetError, AssetResult};
use crate::foundation::math::{Vec2, Vec3};

/// Geometry of one object, ready to become a mesh component
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjMesh {
    /// Object name from the `o` record
    pub name: String,
    /// Material from the last `usemtl` before the object ended
    pub material: Option<String>,
    /// One position per face corner
    pub positions: Vec<Vec3>,
    /// One normal per face corner
    pub normals: Vec<Vec3>,
    /// Texture coordinates; stops at the first corner without one
    pub uvs: Vec<Vec2>,
    /// Sequential triangle list indices
    pub indices: Vec<u32>,
}

impl ObjMesh {
    fn named(name: &str) -> Self {
        Self { name: name.to_string(), ..Self::default() }
    }

    fn push_corner(&mut self, position: Vec3, normal: Vec3, uv: Option<Vec2>, line: usize) -> AssetResult<()> {
        let index = u32::try_from(self.positions.len()).map_err(|_| AssetError::Parse {
            line,
            message: format!("object '{}' has more vertices than 32-bit indices can address", self.name),
        })?;

        // Only extend UVs while they still cover every earlier corner
        if let Some(uv) = uv {
            if self.uvs.len() == self.positions.len() {
                self.uvs.push(uv);
            }
        }
        self.positions.push(position);
        self.normals.push(normal);
        self.indices.push(index);
        Ok(())
    }
}

/// Result of parsing an OBJ file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjModel {
    /// Objects with at least one face, in file order
    pub meshes: Vec<ObjMesh>,
}

#[derive(Debug, Clone, Copy)]
struct Corner {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

/// OBJ text parser
pub struct ObjLoader;

impl ObjLoader {
    /// Parse OBJ file contents
    pub fn parse(contents: &str) -> AssetResult<ObjModel> {
        let mut positions: Vec<Vec3> = Vec::new();
        let mut uvs: Vec<Vec2> = Vec::new();
        let mut normals: Vec<Vec3> = Vec::new();

        let mut model = ObjModel::default();
        let mut current = ObjMesh::named("default");
        let mut material: Option<String> = None;

        for (index, line) in contents.lines().enumerate() {
            let line_number = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let Some(command) = tokens.next() else { continue };

            match command {
                "o" => {
                    let name = tokens.next().unwrap_or("unnamed");
                    let finished = std::mem::replace(&mut current, ObjMesh::named(name));
                    Self::finish_mesh(&mut model, finished, material.as_deref());
                }
                "v" => {
                    let [x, y, z] = parse_floats(&mut tokens, line_number, command)?;
                    positions.push(Vec3::new(x, y, z));
                }
                "vt" => {
                    let [u, v] = parse_floats(&mut tokens, line_number, command)?;
                    uvs.push(Vec2::new(u, v));
                }
                "vn" => {
                    let [x, y, z] = parse_floats(&mut tokens, line_number, command)?;
                    normals.push(Vec3::new(x, y, z));
                }
                "usemtl" => {
                    material = tokens.next().map(str::to_string);
                }
                "f" => {
                    let corners = tokens
                        .map(|token| parse_corner(token, line_number, &positions, &uvs, &normals))
                        .collect::<AssetResult<Vec<_>>>()?;
                    let &[a, b, c] = corners.as_slice() else {
                        return Err(AssetError::MalformedFace { line: line_number, vertex_count: corners.len() });
                    };

                    let face_normal = flat_normal(positions[a.position], positions[b.position], positions[c.position]);
                    // Reverse winding: front faces are clockwise on the device
                    for corner in [c, b, a] {
                        current.push_corner(
                            positions[corner.position],
                            corner.normal.map_or(face_normal, |n| normals[n]),
                            corner.uv.map(|t| uvs[t]),
                            line_number,
                        )?;
                    }
                }
                // mtllib, s, g and vendor extensions carry nothing we use
                _ => {}
            }
        }
        Self::finish_mesh(&mut model, current, material.as_deref());

        Ok(model)
    }

    fn finish_mesh(model: &mut ObjModel, mut mesh: ObjMesh, material: Option<&str>) {
        if mesh.indices.is_empty() {
            return;
        }
        mesh.material = material.map(str::to_string);
        model.meshes.push(mesh);
    }
}

fn flat_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(&(c - a)).try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y)
}

fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    command: &str,
) -> AssetResult<[f32; N]> {
    let mut values = [0.0; N];
    for value in &mut values {
        let token = tokens.next().ok_or_else(|| AssetError::Parse {
            line,
            message: format!("{command} needs {N} values"),
        })?;
        *value = token
            .parse()
            .map_err(|_| AssetError::Parse { line, message: format!("{command} has invalid value '{token}'") })?;
    }
    Ok(values)
}

/// Parse `p`, `p/t`, `p//n` or `p/t/n` into zero-based indices
fn parse_corner(
    token: &str,
    line: usize,
    positions: &[Vec3],
    uvs: &[Vec2],
    normals: &[Vec3],
) -> AssetResult<Corner> {
    let mut parts = token.split('/');
    let position = parts
        .next()
        .filter(|part| !part.is_empty())
        .ok_or_else(|| AssetError::Parse { line, message: format!("face corner '{token}' has no position") })?;

    let position = resolve_index(position, positions.len(), line, "position")?;
    let uv = match parts.next().filter(|part| !part.is_empty()) {
        Some(part) => Some(resolve_index(part, uvs.len(), line, "texture coordinate")?),
        None => None,
    };
    let normal = match parts.next().filter(|part| !part.is_empty()) {
        Some(part) => Some(resolve_index(part, normals.len(), line, "normal")?),
        None => None,
    };

    Ok(Corner { position, uv, normal })
}

/// One-based, or negative relative to the end of the pool
fn resolve_index(token: &str, len: usize, line: usize, what: &'static str) -> AssetResult<usize> {
    let raw: i64 = token
        .parse()
        .map_err(|_| AssetError::Parse { line, message: format!("invalid {what} index '{token}'") })?;
    let resolved = match raw {
        1.. => usize::try_from(raw - 1).ok(),
        ..=-1 => usize::try_from(raw.unsigned_abs()).ok().and_then(|back| len.checked_sub(back)),
        0 => None,
    };
    resolved.filter(|&index| index < len).ok_or(AssetError::IndexOutOfRange { line, what, index: raw })
}
