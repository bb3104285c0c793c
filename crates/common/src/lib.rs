//! Shared value types used by every shaderlab crate.
//!
//! Nothing in here owns a resource. These are plain values the host hands to
//! the camera and entity helpers once per frame.

pub mod math;
pub mod types;

pub use math::{PI_OVER_2, wrap_angle};
pub use types::{Color, GameTime, ResourceId, Viewport};

pub fn crate_info() -> &'static str {
    "shaderlab-common v0.1.0"
}
