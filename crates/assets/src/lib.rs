//! Content store: models, textures and effects described by a JSON manifest.
//!
//! The store plays the host content pipeline for the render crate. Models
//! come back with fresh basic effects on every load, one per material, so
//! effect swapping on one load never reaches another.
//!
//! # Layout
//! Asset paths are relative to the content root (`Content` by default) and
//! use `/` separators, e.g. `mdls/suzanne/model`.

mod manifest;
mod store;

pub use manifest::{
    BoneAsset, BuiltinEffect, ContentManifest, MeshAsset, ModelAsset, PartAsset, TextureAsset,
};
pub use store::{ContentStore, DEFAULT_ROOT};

use shaderlab_render::ContentError;

/// Errors from reading, writing or validating content.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Content(#[from] ContentError),
}

pub fn crate_info() -> &'static str {
    "shaderlab-assets v0.1.0"
}
