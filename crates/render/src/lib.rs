//! Render entity helper: effect swapping and per-frame parameter writes.
//!
//! # Invariants
//! - Every mesh part drawn by an [`Entity`] uses its own clone of the
//!   supplied effect; clones share the compiled [`ShaderProgram`] but never
//!   parameter storage.
//! - One clone is made per distinct source effect per model load.
//! - Rendering never mutates camera state.
//!
//! Window, device and content pipeline are host-owned and reached only
//! through the [`RenderDevice`] and [`ContentManager`] traits.

mod content;
mod device;
mod effect;
mod entity;
mod error;
mod model;
pub mod shaders;
mod texture;

pub use content::{ContentError, ContentManager, diffuse_texture_path};
pub use device::{DebugTextDevice, DrawCall, RecordingDevice, RenderDevice};
pub use effect::{
    Effect, EffectParameter, EffectParameters, ParameterDecl, ParameterKind, ParameterValue,
    ShaderProgram,
};
pub use entity::{Entity, LIGHT_DIRECTION};
pub use error::RenderError;
pub use model::{Bone, EffectSlot, Model, ModelMesh, ModelMeshPart};
pub use texture::Texture2D;

pub fn crate_info() -> &'static str {
    "shaderlab-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
