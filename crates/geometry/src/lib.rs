//! Vector and transform math shared by the tree generator crates.
//!
//! This crate provides:
//! - Affine transforms (translation, axis rotation, uniform scale) applied about a pivot
//! - Local orthonormal frames derived from a growth direction
//! - Small vector helpers (averages, centroids)

pub mod frame;
pub mod transform;
pub mod vector;

pub use frame::*;
pub use transform::*;
pub use vector::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec3, Vec4};
