use std::collections::BTreeMap;
use std::path::Path;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use shaderlab_camera::BoundingSphere;

use crate::AssetError;
use crate::store::DEFAULT_ROOT;

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

/// Everything a [`ContentStore`](crate::ContentStore) can serve, keyed by
/// asset path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentManifest {
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default)]
    pub models: BTreeMap<String, ModelAsset>,
    #[serde(default)]
    pub textures: BTreeMap<String, TextureAsset>,
    #[serde(default)]
    pub effects: BTreeMap<String, BuiltinEffect>,
}

impl Default for ContentManifest {
    fn default() -> Self {
        Self {
            root: default_root(),
            models: BTreeMap::new(),
            textures: BTreeMap::new(),
            effects: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelAsset {
    pub bones: Vec<BoneAsset>,
    pub meshes: Vec<MeshAsset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneAsset {
    pub name: String,
    #[serde(default)]
    pub parent: Option<usize>,
    /// Column-major, relative to the parent.
    #[serde(default)]
    pub transform: Mat4,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshAsset {
    pub name: String,
    #[serde(default)]
    pub bone: usize,
    pub bounds: BoundingSphere,
    pub parts: Vec<PartAsset>,
}

/// A mesh part. Parts with the same `material` share one effect per load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartAsset {
    pub vertex_count: u32,
    pub primitive_count: u32,
    #[serde(default)]
    pub material: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureAsset {
    pub width: u32,
    pub height: u32,
}

/// Effect programs the store can instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinEffect {
    Model,
    Basic,
}

impl ContentManifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let manifest: Self = serde_json::from_reader(file)?;
        Ok(manifest)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// The sample scene: Suzanne with her diffuse texture, the model effect,
    /// and a blank texture.
    pub fn tutorial() -> Self {
        let suzanne = ModelAsset {
            bones: vec![
                BoneAsset {
                    name: "Suzanne".into(),
                    parent: None,
                    transform: Mat4::IDENTITY,
                },
                BoneAsset {
                    name: "Eyes".into(),
                    parent: Some(0),
                    transform: Mat4::from_translation(Vec3::new(0.0, 0.2, 0.8)),
                },
            ],
            meshes: vec![
                MeshAsset {
                    name: "Head".into(),
                    bone: 0,
                    bounds: BoundingSphere::new(Vec3::ZERO, 1.4),
                    parts: vec![
                        PartAsset {
                            vertex_count: 1005,
                            primitive_count: 936,
                            material: 0,
                        },
                        PartAsset {
                            vertex_count: 96,
                            primitive_count: 64,
                            material: 0,
                        },
                    ],
                },
                MeshAsset {
                    name: "Eyes".into(),
                    bone: 1,
                    bounds: BoundingSphere::new(Vec3::new(0.0, 0.2, 0.8), 0.45),
                    parts: vec![
                        PartAsset {
                            vertex_count: 64,
                            primitive_count: 32,
                            material: 1,
                        },
                        PartAsset {
                            vertex_count: 64,
                            primitive_count: 32,
                            material: 1,
                        },
                    ],
                },
            ],
        };

        let mut manifest = Self::default();
        manifest.models.insert("mdls/suzanne/model".into(), suzanne);
        manifest.textures.insert(
            "mdls/suzanne/model_diffuse".into(),
            TextureAsset {
                width: 512,
                height: 512,
            },
        );
        manifest.textures.insert(
            "txtrs/blank".into(),
            TextureAsset {
                width: 1,
                height: 1,
            },
        );
        manifest
            .effects
            .insert("shaders/ModelEffect".into(), BuiltinEffect::Model);
        manifest
            .effects
            .insert("shaders/BasicEffect".into(), BuiltinEffect::Basic);
        manifest
    }
}
