//! Concrete component payloads

pub mod mesh;
pub mod lighting;

pub use mesh::{MeshComponent, MeshValidationError};
pub use lighting::PointLightComponent;
