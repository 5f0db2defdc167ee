//! Asset loading
//!
//! Wavefront OBJ/MTL import. Loading is all-or-nothing: the files are parsed
//! and every mesh validated before the first entity is created, so a failed
//! load leaves the world untouched.

pub mod mtl_parser;
pub mod obj_loader;

pub use mtl_parser::{MtlData, MtlParser};
pub use obj_loader::{ObjLoader, ObjMesh, ObjModel};

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ecs::components::{MeshComponent, MeshValidationError};
use crate::ecs::{EcsError, EntityReference, World};
use crate::foundation::logging::{debug, info};
use crate::render::MaterialHandle;

/// Shading model imported materials are converted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialModel {
    /// Metallic-roughness
    #[default]
    Pbr,
    /// Classic Phong
    Phong,
}

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File extension is not a supported model format
    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),

    /// A record could not be parsed
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// One-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// A face is not a triangle
    #[error("Face on line {line} has {vertex_count} vertices, only triangles are supported")]
    MalformedFace {
        /// One-based line number
        line: usize,
        /// Corners in the face
        vertex_count: usize,
    },

    /// A face refers to an attribute that does not exist
    #[error("Face on line {line} refers to {what} {index}, which does not exist")]
    IndexOutOfRange {
        /// One-based line number
        line: usize,
        /// Attribute pool
        what: &'static str,
        /// Index as written in the file
        index: i64,
    },

    /// `usemtl` names a material missing from the library
    #[error("Unknown material '{0}'")]
    UnknownMaterial(String),

    /// Parsed geometry breaks a mesh invariant
    #[error("Mesh '{name}' is invalid: {source}")]
    InvalidMesh {
        /// Object name
        name: String,
        /// Violated invariant
        #[source]
        source: MeshValidationError,
    },

    /// Registration into the world failed
    #[error("Scene error: {0}")]
    Ecs(#[from] EcsError),
}

/// Result type for asset operations
pub type AssetResult<T> = Result<T, AssetError>;

/// Loads model files into a [`World`]
pub struct MeshLoader;

impl MeshLoader {
    /// Load a Wavefront model as one entity with one mesh per object.
    ///
    /// Materials come from the `.mtl` file next to the model, when present.
    pub fn load(path: impl AsRef<Path>, world: &mut World, model: MaterialModel) -> AssetResult<EntityReference> {
        let path = path.as_ref();
        let is_obj = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
        if !is_obj {
            return Err(AssetError::UnsupportedFormat(path.display().to_string()));
        }

        let library_path = path.with_extension("mtl");
        let library = if library_path.is_file() {
            let library = MtlParser::parse(&std::fs::read_to_string(&library_path)?)?;
            debug!("Read {} materials from {}", library.len(), library_path.display());
            library
        } else {
            HashMap::new()
        };

        let parsed = ObjLoader::parse(&std::fs::read_to_string(path)?)?;
        let meshes = Self::build_meshes(parsed, &library, model)?;

        let entity = world.create_entity();
        let mesh_count = meshes.len();
        for mesh in meshes {
            world.register_component(entity, mesh)?;
        }

        info!("Loaded {} with {} meshes as entity {}", path.display(), mesh_count, entity.index());
        Ok(entity)
    }

    /// Convert parsed objects to validated mesh components
    pub fn build_meshes(
        parsed: ObjModel,
        library: &HashMap<String, MtlData>,
        model: MaterialModel,
    ) -> AssetResult<Vec<MeshComponent>> {
        parsed
            .meshes
            .into_iter()
            .map(|obj| -> AssetResult<MeshComponent> {
                let material = match &obj.material {
                    Some(name) => library
                        .get(name)
                        .map(|data| data.to_handle(model))
                        .ok_or_else(|| AssetError::UnknownMaterial(name.clone()))?,
                    None => MaterialHandle::default(),
                };
                let mesh = MeshComponent::new(obj.positions, obj.normals, obj.uvs, obj.indices, material);
                mesh.validate().map_err(|source| AssetError::InvalidMesh { name: obj.name, source })?;
                Ok(mesh)
            })
            .collect()
    }
}
