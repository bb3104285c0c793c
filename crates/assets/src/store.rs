use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use shaderlab_render::{
    Bone, ContentError, ContentManager, Effect, EffectSlot, Model, ModelMesh, ModelMeshPart,
    Texture2D, shaders,
};

use crate::AssetError;
use crate::manifest::{BuiltinEffect, ContentManifest, ModelAsset};

/// Content root used when a manifest does not name one.
pub const DEFAULT_ROOT: &str = "Content";

/// In-memory content pipeline backed by a [`ContentManifest`].
///
/// Textures are cached, so every load of a path returns the same instance.
/// Models and effects are built fresh on each load.
#[derive(Debug, Default)]
pub struct ContentStore {
    manifest: ContentManifest,
    textures: HashMap<String, Arc<Texture2D>>,
}

impl ContentStore {
    /// Validate every model in `manifest` and wrap it in a store.
    pub fn from_manifest(manifest: ContentManifest) -> Result<Self, AssetError> {
        for (path, asset) in &manifest.models {
            build_model(path, asset)?;
        }
        tracing::debug!(
            root = %manifest.root,
            models = manifest.models.len(),
            textures = manifest.textures.len(),
            effects = manifest.effects.len(),
            "content store ready"
        );
        Ok(Self {
            manifest,
            textures: HashMap::new(),
        })
    }

    pub fn load_manifest(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        Self::from_manifest(ContentManifest::load(path)?)
    }

    pub fn save_manifest(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        self.manifest.save(path)
    }

    /// Store preloaded with the sample content.
    pub fn tutorial() -> Self {
        Self {
            manifest: ContentManifest::tutorial(),
            textures: HashMap::new(),
        }
    }

    pub fn root(&self) -> &str {
        &self.manifest.root
    }

    /// Asset key for `path`: separators normalised, content root stripped.
    fn key(&self, path: &str) -> String {
        let path = path.replace('\\', "/");
        let trimmed = path.trim_start_matches("./");
        match trimmed
            .strip_prefix(self.manifest.root.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
        {
            Some(rest) => rest.to_string(),
            None => trimmed.to_string(),
        }
    }

    /// The error for a path that exists but under another kind, or not at all.
    fn missing(&self, key: &str, expected: &'static str) -> ContentError {
        let known = self.manifest.models.contains_key(key)
            || self.manifest.textures.contains_key(key)
            || self.manifest.effects.contains_key(key);
        if known {
            ContentError::WrongKind {
                path: key.to_string(),
                expected,
            }
        } else {
            ContentError::NotFound {
                path: key.to_string(),
            }
        }
    }
}

impl ContentManager for ContentStore {
    fn load_model(&mut self, path: &str) -> Result<Model, ContentError> {
        let key = self.key(path);
        let asset = self
            .manifest
            .models
            .get(&key)
            .ok_or_else(|| self.missing(&key, "model"))?;
        let model = build_model(&key, asset)?;
        tracing::debug!(
            path = %key,
            meshes = model.meshes().len(),
            effects = model.effects().len(),
            "model loaded"
        );
        Ok(model)
    }

    fn load_texture(&mut self, path: &str) -> Result<Arc<Texture2D>, ContentError> {
        let key = self.key(path);
        if let Some(texture) = self.textures.get(&key) {
            return Ok(Arc::clone(texture));
        }
        let asset = self
            .manifest
            .textures
            .get(&key)
            .ok_or_else(|| self.missing(&key, "texture"))?;
        let texture = Arc::new(Texture2D::new(key.clone(), asset.width, asset.height));
        tracing::debug!(path = %key, width = asset.width, height = asset.height, "texture loaded");
        self.textures.insert(key, Arc::clone(&texture));
        Ok(texture)
    }

    fn load_effect(&mut self, path: &str) -> Result<Effect, ContentError> {
        let key = self.key(path);
        let kind = self
            .manifest
            .effects
            .get(&key)
            .ok_or_else(|| self.missing(&key, "effect"))?;
        let program = match kind {
            BuiltinEffect::Model => shaders::model_effect_program(),
            BuiltinEffect::Basic => shaders::basic_effect_program(),
        };
        Ok(Effect::new(program))
    }
}

/// Build a model with one fresh basic effect per distinct material, in
/// first-use order.
fn build_model(path: &str, asset: &ModelAsset) -> Result<Model, ContentError> {
    let mut materials: HashMap<usize, EffectSlot> = HashMap::new();
    let mut effects = Vec::new();
    let basic = shaders::basic_effect_program();

    let bones = asset
        .bones
        .iter()
        .map(|bone| Bone {
            name: bone.name.clone(),
            parent: bone.parent,
            transform: bone.transform,
        })
        .collect();

    let meshes = asset
        .meshes
        .iter()
        .map(|mesh| {
            let parts = mesh
                .parts
                .iter()
                .map(|part| {
                    let slot = *materials.entry(part.material).or_insert_with(|| {
                        effects.push(Effect::new(Arc::clone(&basic)));
                        EffectSlot(effects.len() - 1)
                    });
                    ModelMeshPart::new(part.vertex_count, part.primitive_count, slot)
                })
                .collect();
            ModelMesh::new(mesh.name.clone(), mesh.bone, mesh.bounds, parts)
        })
        .collect();

    Model::new(bones, meshes, effects).map_err(|e| ContentError::InvalidAsset {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
