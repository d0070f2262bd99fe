//! Pitlane Core - Foundational types for the Pitlane course editor
//!
//! This crate provides the core types that all other Pitlane crates depend on:
//! - `EntityId` - Per-course entity identifiers
//! - `Vec3`, `Rotation`, `Color` - Spatial and common types
//! - Column-major 4x4 matrix helpers and the authoring-to-world axis swap
//! - Error types and Result alias

mod error;
mod id;
pub mod math;
mod types;

pub use error::{PitlaneError, Result};
pub use id::{EntityId, IdAllocator};
pub use math::{authoring_scale_to_world, authoring_to_world, Mat4, MAT4_IDENTITY};
pub use types::{Color, Rotation, Vec3};
