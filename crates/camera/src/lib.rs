//! Orbit camera for the shaderlab sample.
//!
//! The camera orbits a look-at target. Middle-button drags change yaw and
//! pitch, the scroll wheel changes zoom, and every update rebuilds the world
//! transform, the view matrix and the culling frustum.
//!
//! # Invariants
//! - `view_projection()` always equals `projection() * view()`.
//! - Pitch never leaves `[-π/2·0.99, π/2·0.99]`.
//! - Yaw is kept in `(-π, π]`.
//! - After `update`, zoom is at least the configured floor.

mod bounds;
mod config;
mod frustum;
mod orbit;

pub use bounds::{BoundingBox, BoundingSphere, ContainmentType};
pub use config::{CameraConfig, ConfigError};
pub use frustum::{
    BoundingFrustum, PLANE_BOTTOM, PLANE_FAR, PLANE_LEFT, PLANE_NEAR, PLANE_RIGHT, PLANE_TOP,
};
pub use orbit::{OrbitCamera, PITCH_LIMIT};

pub fn crate_info() -> &'static str {
    "shaderlab-camera v0.1.0"
}
