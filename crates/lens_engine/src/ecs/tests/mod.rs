//! Cross-store properties of the ECS
