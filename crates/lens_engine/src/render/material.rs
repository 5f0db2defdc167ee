//! Material handles
//!
//! A [`MaterialHandle`] is a closed sum type over the flat material payloads
//! the shaders understand. Each payload is a plain `Copy` record, so the
//! handle is copied by value and matching on it is all the dispatch needs;
//! [`MaterialHandle::as_kind`] is the checked accessor for callers that expect
//! a particular model.

use thiserror::Error;

use crate::foundation::math::Color;

/// Shading model of a material.
///
/// Adding a model means adding a variant here, a payload type, a
/// [`MaterialHandle`] variant and a constant layout in
/// [`crate::render::constants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Metallic-roughness physically based shading
    Pbr,
    /// Classic Phong shading
    Phong,
}

/// Physically based material constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PbrMaterialData {
    /// Base color
    pub albedo: Color,
    /// Opacity
    pub alpha: f32,
    /// Microfacet roughness in [0, 1]
    pub roughness: f32,
    /// Index of refraction
    pub ior: f32,
    /// Ambient occlusion factor
    pub ambient_occlusion: f32,
    /// Metalness in [0, 1]
    pub metalness: f32,
}

impl Default for PbrMaterialData {
    fn default() -> Self {
        Self {
            albedo: Color::splat(0.8),
            alpha: 1.0,
            roughness: 0.5,
            ior: 1.5,
            ambient_occlusion: 1.0,
            metalness: 0.0,
        }
    }
}

/// Phong material constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongMaterialData {
    /// Ambient reflectance
    pub ambient: Color,
    /// Diffuse reflectance
    pub diffuse: Color,
    /// Specular reflectance
    pub specular: Color,
    /// Opacity
    pub alpha: f32,
    /// Specular exponent
    pub shininess: f32,
}

impl Default for PhongMaterialData {
    fn default() -> Self {
        Self {
            ambient: Color::splat(0.1),
            diffuse: Color::splat(0.8),
            specular: Color::splat(0.5),
            alpha: 1.0,
            shininess: 32.0,
        }
    }
}

/// Material payload read under the wrong kind
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialError {
    /// Stored kind differs from the requested one
    #[error("Material holds {actual:?} data, {requested:?} was requested")]
    KindMismatch {
        /// Kind the caller asked for
        requested: MaterialKind,
        /// Kind stored in the handle
        actual: MaterialKind,
    },
}

/// A concrete payload type of a [`MaterialHandle`]
pub trait MaterialPayload: Copy + Into<MaterialHandle> {
    /// Kind tag of this payload
    const KIND: MaterialKind;

    /// The payload if `handle` holds this type
    fn from_handle(handle: &MaterialHandle) -> Option<Self>;
}

/// Tagged material: the kind and its payload are set together at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialHandle {
    /// PBR payload
    Pbr(PbrMaterialData),
    /// Phong payload
    Phong(PhongMaterialData),
}

impl Default for MaterialHandle {
    fn default() -> Self {
        Self::Pbr(PbrMaterialData::default())
    }
}

impl MaterialHandle {
    /// Kind of the stored payload
    pub const fn kind(&self) -> MaterialKind {
        match self {
            Self::Pbr(_) => MaterialKind::Pbr,
            Self::Phong(_) => MaterialKind::Phong,
        }
    }

    /// Whether the stored payload is of `kind`
    pub fn is_kind(&self, kind: MaterialKind) -> bool {
        self.kind() == kind
    }

    /// Copy of the payload as `P`, or a kind mismatch
    pub fn as_kind<P: MaterialPayload>(&self) -> Result<P, MaterialError> {
        P::from_handle(self).ok_or(MaterialError::KindMismatch { requested: P::KIND, actual: self.kind() })
    }

    /// Copy of the PBR payload
    pub fn as_pbr(&self) -> Result<PbrMaterialData, MaterialError> {
        self.as_kind()
    }

    /// Copy of the Phong payload
    pub fn as_phong(&self) -> Result<PhongMaterialData, MaterialError> {
        self.as_kind()
    }
}

impl From<PbrMaterialData> for MaterialHandle {
    fn from(data: PbrMaterialData) -> Self {
        Self::Pbr(data)
    }
}

impl From<PhongMaterialData> for MaterialHandle {
    fn from(data: PhongMaterialData) -> Self {
        Self::Phong(data)
    }
}

impl MaterialPayload for PbrMaterialData {
    const KIND: MaterialKind = MaterialKind::Pbr;

    fn from_handle(handle: &MaterialHandle) -> Option<Self> {
        match handle {
            MaterialHandle::Pbr(data) => Some(*data),
            MaterialHandle::Phong(_) => None,
        }
    }
}

impl MaterialPayload for PhongMaterialData {
    const KIND: MaterialKind = MaterialKind::Phong;

    fn from_handle(handle: &MaterialHandle) -> Option<Self> {
        match handle {
            MaterialHandle::Phong(data) => Some(*data),
            MaterialHandle::Pbr(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [MaterialKind; 2] = [MaterialKind::Pbr, MaterialKind::Phong];

    fn sample_pbr() -> PbrMaterialData {
        PbrMaterialData {
            albedo: Color::new(1.0, 0.0, 0.0),
            alpha: 1.0,
            roughness: 0.5,
            ior: 1.5,
            ambient_occlusion: 1.0,
            metalness: 0.0,
        }
    }

    fn sample_phong() -> PhongMaterialData {
        PhongMaterialData {
            ambient: Color::new(0.1, 0.1, 0.2),
            diffuse: Color::new(0.3, 0.6, 0.9),
            specular: Color::splat(1.0),
            alpha: 0.75,
            shininess: 64.0,
        }
    }

    #[test]
    fn test_pbr_handle_reports_only_its_kind() {
        let handle = MaterialHandle::from(sample_pbr());

        assert_eq!(handle.kind(), MaterialKind::Pbr);
        for kind in ALL_KINDS {
            assert_eq!(handle.is_kind(kind), kind == MaterialKind::Pbr);
        }
        assert_eq!(handle.as_pbr(), Ok(sample_pbr()));
        assert_eq!(
            handle.as_phong(),
            Err(MaterialError::KindMismatch { requested: MaterialKind::Phong, actual: MaterialKind::Pbr })
        );
    }

    #[test]
    fn test_phong_handle_reports_only_its_kind() {
        let handle = MaterialHandle::from(sample_phong());

        assert_eq!(handle.kind(), MaterialKind::Phong);
        for kind in ALL_KINDS {
            assert_eq!(handle.is_kind(kind), kind == MaterialKind::Phong);
        }
        assert_eq!(handle.as_kind::<PhongMaterialData>(), Ok(sample_phong()));
        assert_eq!(
            handle.as_kind::<PbrMaterialData>(),
            Err(MaterialError::KindMismatch { requested: MaterialKind::Pbr, actual: MaterialKind::Phong })
        );
    }

    #[test]
    fn test_copies_are_independent_values() {
        let original = MaterialHandle::from(sample_pbr());
        let mut copy = original;
        copy = MaterialHandle::from(PbrMaterialData { roughness: 0.9, ..copy.as_pbr().unwrap() });

        assert_eq!(original.as_pbr().unwrap().roughness, 0.5);
        assert_eq!(copy.as_pbr().unwrap().roughness, 0.9);
    }

    #[test]
    fn test_default_handle_is_grey_pbr() {
        let data = MaterialHandle::default().as_pbr().unwrap();
        assert_eq!(data.albedo, Color::splat(0.8));
        assert_eq!(data.metalness, 0.0);
    }
}
