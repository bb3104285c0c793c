//! Models: a bone hierarchy, meshes split into parts, and the effects the
//! parts are drawn with.
//!
//! Parts refer to effects by [`EffectSlot`], an index into the model's effect
//! list. Several parts (even across meshes) may share one slot; setting a
//! parameter on that effect affects all of them.

use glam::Mat4;
use shaderlab_camera::BoundingSphere;
use shaderlab_common::ResourceId;
use std::collections::HashMap;

use crate::device::RenderDevice;
use crate::effect::Effect;
use crate::error::RenderError;

/// Index of an effect inside its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectSlot(pub usize);

/// Node of the model's transform hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    /// Parent index; parents always precede their children.
    pub parent: Option<usize>,
    /// Transform relative to the parent.
    pub transform: Mat4,
}

/// A contiguous run of primitives drawn with a single effect.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMeshPart {
    pub vertex_count: u32,
    pub primitive_count: u32,
    effect: EffectSlot,
}

impl ModelMeshPart {
    pub fn new(vertex_count: u32, primitive_count: u32, effect: EffectSlot) -> Self {
        Self {
            vertex_count,
            primitive_count,
            effect,
        }
    }

    pub fn effect(&self) -> EffectSlot {
        self.effect
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelMesh {
    pub name: String,
    pub parent_bone: usize,
    pub bounding_sphere: BoundingSphere,
    parts: Vec<ModelMeshPart>,
}

impl ModelMesh {
    pub fn new(
        name: impl Into<String>,
        parent_bone: usize,
        bounding_sphere: BoundingSphere,
        parts: Vec<ModelMeshPart>,
    ) -> Self {
        Self {
            name: name.into(),
            parent_bone,
            bounding_sphere,
            parts,
        }
    }

    pub fn parts(&self) -> &[ModelMeshPart] {
        &self.parts
    }

    /// Distinct effect slots used by this mesh, in first-use order.
    pub fn effect_slots(&self) -> Vec<EffectSlot> {
        let mut slots = Vec::new();
        for part in &self.parts {
            if !slots.contains(&part.effect) {
                slots.push(part.effect);
            }
        }
        slots
    }

    /// Issue one draw per part, each with its own effect.
    pub fn draw(&self, model: &Model, device: &mut dyn RenderDevice) -> Result<(), RenderError> {
        for (index, part) in self.parts.iter().enumerate() {
            let effect = model.effect(part.effect)?;
            device.draw_mesh_part(self, index, part, effect)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Model {
    bones: Vec<Bone>,
    meshes: Vec<ModelMesh>,
    effects: Vec<Effect>,
}

impl Model {
    /// Assemble a model, checking bone order, mesh bones and effect slots.
    pub fn new(
        bones: Vec<Bone>,
        meshes: Vec<ModelMesh>,
        effects: Vec<Effect>,
    ) -> Result<Self, RenderError> {
        for (i, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent >= i {
                    return Err(RenderError::InvalidModel(format!(
                        "bone '{}' has parent {parent} which does not precede it",
                        bone.name
                    )));
                }
            }
        }
        for mesh in &meshes {
            if mesh.parent_bone >= bones.len() {
                return Err(RenderError::InvalidModel(format!(
                    "mesh '{}' references missing bone {}",
                    mesh.name, mesh.parent_bone
                )));
            }
            if let Some(part) = mesh.parts.iter().find(|p| p.effect.0 >= effects.len()) {
                return Err(RenderError::InvalidModel(format!(
                    "mesh '{}' references missing effect slot {}",
                    mesh.name, part.effect.0
                )));
            }
        }
        Ok(Self {
            bones,
            meshes,
            effects,
        })
    }

    pub fn meshes(&self) -> &[ModelMesh] {
        &self.meshes
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Every part of every mesh.
    pub fn parts(&self) -> impl Iterator<Item = &ModelMeshPart> {
        self.meshes.iter().flat_map(|m| m.parts.iter())
    }

    pub fn effect(&self, slot: EffectSlot) -> Result<&Effect, RenderError> {
        self.effects
            .get(slot.0)
            .ok_or(RenderError::UnknownEffectSlot(slot.0))
    }

    pub fn effect_mut(&mut self, slot: EffectSlot) -> Result<&mut Effect, RenderError> {
        self.effects
            .get_mut(slot.0)
            .ok_or(RenderError::UnknownEffectSlot(slot.0))
    }

    /// Each bone's transform relative to the model root.
    pub fn absolute_bone_transforms(&self) -> Vec<Mat4> {
        let mut absolute: Vec<Mat4> = Vec::with_capacity(self.bones.len());
        for bone in &self.bones {
            let transform = match bone.parent {
                Some(parent) => absolute[parent] * bone.transform,
                None => bone.transform,
            };
            absolute.push(transform);
        }
        absolute
    }

    /// Union of all mesh bounds, or `None` for a model without meshes.
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        self.meshes
            .iter()
            .map(|m| m.bounding_sphere)
            .reduce(|acc, s| acc.merge(&s))
    }

    /// Swap every part's effect for a clone of `replacement`.
    ///
    /// Parts that shared a source effect end up sharing one clone; parts with
    /// different source effects get different clones. The source effects are
    /// dropped. Returns the number of clones made.
    pub fn replace_effects(&mut self, replacement: &Effect) -> Result<usize, RenderError> {
        let mut mapping: HashMap<ResourceId, EffectSlot> = HashMap::new();
        let mut clones: Vec<Effect> = Vec::new();

        for mesh in &mut self.meshes {
            for slot in mesh.effect_slots() {
                let source = self
                    .effects
                    .get(slot.0)
                    .ok_or(RenderError::UnknownEffectSlot(slot.0))?;
                if !mapping.contains_key(&source.id()) {
                    let clone = replacement.clone_instance();
                    tracing::debug!(
                        mesh = %mesh.name,
                        source = %source.id().short(),
                        clone = %clone.id().short(),
                        "cloned replacement effect"
                    );
                    mapping.insert(source.id(), EffectSlot(clones.len()));
                    clones.push(clone);
                }
            }

            for part in &mut mesh.parts {
                let source = self
                    .effects
                    .get(part.effect.0)
                    .ok_or(RenderError::UnknownEffectSlot(part.effect.0))?;
                part.effect = mapping[&source.id()];
            }
        }

        let count = clones.len();
        self.effects = clones;
        Ok(count)
    }

    /// Draw one mesh with whatever its effects currently hold.
    pub fn draw_mesh(
        &self,
        mesh_index: usize,
        device: &mut dyn RenderDevice,
    ) -> Result<(), RenderError> {
        let mesh = self.meshes.get(mesh_index).ok_or_else(|| {
            RenderError::InvalidModel(format!("model has no mesh {mesh_index}"))
        })?;
        mesh.draw(self, device)
    }
}
