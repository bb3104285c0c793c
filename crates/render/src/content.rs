use std::sync::Arc;

use crate::effect::Effect;
use crate::model::Model;
use crate::texture::Texture2D;

/// Errors reported by a content manager.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("asset not found: {path}")]
    NotFound { path: String },
    #[error("asset '{path}' is not a {expected}")]
    WrongKind { path: String, expected: &'static str },
    #[error("asset '{path}' is invalid: {reason}")]
    InvalidAsset { path: String, reason: String },
}

/// Host content pipeline.
///
/// Every `load_model` call returns a fresh model whose parts carry their own
/// default effects, so effect swapping on one load never leaks into another.
pub trait ContentManager {
    fn load_model(&mut self, path: &str) -> Result<Model, ContentError>;

    fn load_texture(&mut self, path: &str) -> Result<Arc<Texture2D>, ContentError>;

    fn load_effect(&mut self, path: &str) -> Result<Effect, ContentError>;
}

/// Path of the diffuse texture that accompanies a model.
pub fn diffuse_texture_path(model_path: &str) -> String {
    format!("{model_path}_diffuse")
}
