//! Shader effects and their parameter bindings.
//!
//! A [`ShaderProgram`] is the compiled code and its parameter layout. An
//! [`Effect`] is one instance of a program with its own parameter values.
//! Cloning an effect instance shares the program and copies the values.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use shaderlab_common::ResourceId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RenderError;
use crate::texture::Texture2D;

/// Type of a shader parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    Bool,
    Float,
    Vector3,
    Vector4,
    Matrix,
    Texture2D,
}

/// A value bound to a shader parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Bool(bool),
    Float(f32),
    Vector3(Vec3),
    Vector4(Vec4),
    Matrix(Mat4),
    Texture2D(Arc<Texture2D>),
}

impl ParameterValue {
    pub fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::Bool(_) => ParameterKind::Bool,
            ParameterValue::Float(_) => ParameterKind::Float,
            ParameterValue::Vector3(_) => ParameterKind::Vector3,
            ParameterValue::Vector4(_) => ParameterKind::Vector4,
            ParameterValue::Matrix(_) => ParameterKind::Matrix,
            ParameterValue::Texture2D(_) => ParameterKind::Texture2D,
        }
    }

    /// Append the constant-buffer words for this value. Textures have none.
    fn push_words(&self, words: &mut Vec<f32>) {
        match self {
            ParameterValue::Bool(b) => words.push(if *b { 1.0 } else { 0.0 }),
            ParameterValue::Float(f) => words.push(*f),
            ParameterValue::Vector3(v) => words.extend_from_slice(&v.to_array()),
            ParameterValue::Vector4(v) => words.extend_from_slice(&v.to_array()),
            ParameterValue::Matrix(m) => words.extend_from_slice(&m.to_cols_array()),
            ParameterValue::Texture2D(_) => {}
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<f32> for ParameterValue {
    fn from(value: f32) -> Self {
        ParameterValue::Float(value)
    }
}

impl From<Vec3> for ParameterValue {
    fn from(value: Vec3) -> Self {
        ParameterValue::Vector3(value)
    }
}

impl From<Vec4> for ParameterValue {
    fn from(value: Vec4) -> Self {
        ParameterValue::Vector4(value)
    }
}

impl From<Mat4> for ParameterValue {
    fn from(value: Mat4) -> Self {
        ParameterValue::Matrix(value)
    }
}

impl From<Arc<Texture2D>> for ParameterValue {
    fn from(value: Arc<Texture2D>) -> Self {
        ParameterValue::Texture2D(value)
    }
}

/// Declared parameter of a shader program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    pub kind: ParameterKind,
}

impl ParameterDecl {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Compiled shader code plus its parameter layout. Shared by every effect
/// instance created from it.
#[derive(Debug, PartialEq, Eq)]
pub struct ShaderProgram {
    name: String,
    source: String,
    parameters: Vec<ParameterDecl>,
}

impl ShaderProgram {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        parameters: Vec<ParameterDecl>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            parameters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn parameters(&self) -> &[ParameterDecl] {
        &self.parameters
    }

    pub fn declares(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }
}

/// One parameter slot of an effect instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectParameter {
    name: String,
    kind: ParameterKind,
    value: Option<ParameterValue>,
}

impl EffectParameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn value(&self) -> Option<&ParameterValue> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Bind a value. Fails if its type differs from the declaration.
    pub fn set_value(&mut self, value: impl Into<ParameterValue>) -> Result<(), RenderError> {
        let value = value.into();
        if value.kind() != self.kind {
            return Err(RenderError::ParameterType {
                parameter: self.name.clone(),
                expected: self.kind,
                found: value.kind(),
            });
        }
        self.value = Some(value);
        Ok(())
    }

    pub fn as_matrix(&self) -> Option<Mat4> {
        match self.value {
            Some(ParameterValue::Matrix(m)) => Some(m),
            _ => None,
        }
    }

    pub fn as_vector3(&self) -> Option<Vec3> {
        match self.value {
            Some(ParameterValue::Vector3(v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_texture(&self) -> Option<&Arc<Texture2D>> {
        match &self.value {
            Some(ParameterValue::Texture2D(t)) => Some(t),
            _ => None,
        }
    }
}

/// Parameter collection of one effect instance, addressed by name.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectParameters {
    effect_name: String,
    slots: Vec<EffectParameter>,
    names: HashMap<String, usize>,
}

impl EffectParameters {
    fn for_program(program: &ShaderProgram) -> Self {
        let slots: Vec<EffectParameter> = program
            .parameters()
            .iter()
            .map(|decl| EffectParameter {
                name: decl.name.clone(),
                kind: decl.kind,
                value: None,
            })
            .collect();
        let names = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.name.clone(), i))
            .collect();
        Self {
            effect_name: program.name().to_string(),
            slots,
            names,
        }
    }

    fn missing(&self, name: &str) -> RenderError {
        RenderError::MissingParameter {
            effect: self.effect_name.clone(),
            parameter: name.to_string(),
        }
    }

    pub fn get(&self, name: &str) -> Result<&EffectParameter, RenderError> {
        match self.names.get(name) {
            Some(&i) => Ok(&self.slots[i]),
            None => Err(self.missing(name)),
        }
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut EffectParameter, RenderError> {
        match self.names.get(name) {
            Some(&i) => Ok(&mut self.slots[i]),
            None => Err(self.missing(name)),
        }
    }

    /// Shorthand for `get_mut(name)?.set_value(value)`.
    pub fn set(&mut self, name: &str, value: impl Into<ParameterValue>) -> Result<(), RenderError> {
        self.get_mut(name)?.set_value(value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &EffectParameter> {
        self.slots.iter()
    }

    /// Fail on the first declared parameter that has no value yet.
    pub fn ensure_bound(&self) -> Result<(), RenderError> {
        match self.slots.iter().find(|slot| !slot.is_set()) {
            Some(slot) => Err(RenderError::UnsetParameter {
                effect: self.effect_name.clone(),
                parameter: slot.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Tightly packed native-endian f32 words of every bound non-texture
    /// value, in declaration order. This is the constant buffer a device uploads.
    pub fn constant_bytes(&self) -> Vec<u8> {
        let mut words = Vec::new();
        for value in self.slots.iter().filter_map(|slot| slot.value.as_ref()) {
            value.push_words(&mut words);
        }
        bytemuck::cast_slice(&words).to_vec()
    }
}

/// One instance of a shader program with its own parameter values.
///
/// Deliberately not `Clone`: a copy must get a new identity, which is what
/// [`Effect::clone_instance`] does.
#[derive(Debug)]
pub struct Effect {
    id: ResourceId,
    program: Arc<ShaderProgram>,
    parameters: EffectParameters,
}

impl Effect {
    /// New instance with every parameter unset.
    pub fn new(program: Arc<ShaderProgram>) -> Self {
        let parameters = EffectParameters::for_program(&program);
        Self {
            id: ResourceId::new(),
            program,
            parameters,
        }
    }

    /// Independent instance sharing this effect's compiled program.
    ///
    /// Current parameter values are copied; later writes to either instance
    /// do not affect the other.
    pub fn clone_instance(&self) -> Effect {
        Effect {
            id: ResourceId::new(),
            program: Arc::clone(&self.program),
            parameters: self.parameters.clone(),
        }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.program.name()
    }

    /// True when both instances run the same compiled program.
    pub fn shares_program(&self, other: &Effect) -> bool {
        Arc::ptr_eq(&self.program, &other.program)
    }

    pub fn parameters(&self) -> &EffectParameters {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut EffectParameters {
        &mut self.parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program() -> Arc<ShaderProgram> {
        Arc::new(ShaderProgram::new(
            "Test",
            "// test",
            vec![
                ParameterDecl::new("World", ParameterKind::Matrix),
                ParameterDecl::new("Tint", ParameterKind::Vector3),
                ParameterDecl::new("Diffuse", ParameterKind::Texture2D),
            ],
        ))
    }

    #[test]
    fn new_effect_has_unset_slots() {
        let effect = Effect::new(program());
        assert_eq!(effect.parameters().len(), 3);
        assert!(effect.parameters().iter().all(|p| !p.is_set()));
        assert_eq!(effect.name(), "Test");
    }

    #[test]
    fn missing_parameter_is_an_error() {
        let mut effect = Effect::new(program());
        let err = effect
            .parameters_mut()
            .set("LightDirection", Vec3::ONE)
            .unwrap_err();
        match err {
            RenderError::MissingParameter { effect, parameter } => {
                assert_eq!(effect, "Test");
                assert_eq!(parameter, "LightDirection");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let mut effect = Effect::new(program());
        let err = effect.parameters_mut().set("World", Vec3::ONE).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ParameterType {
                expected: ParameterKind::Matrix,
                found: ParameterKind::Vector3,
                ..
            }
        ));
        assert!(!effect.parameters().get("World").unwrap().is_set());
    }

    #[test]
    fn clone_instance_copies_values_into_new_identity() {
        let mut original = Effect::new(program());
        original
            .parameters_mut()
            .set("Tint", Vec3::new(1.0, 0.0, 0.0))
            .unwrap();

        let mut copy = original.clone_instance();
        assert_ne!(copy.id(), original.id());
        assert!(copy.shares_program(&original));
        assert_eq!(
            copy.parameters().get("Tint").unwrap().as_vector3(),
            Some(Vec3::new(1.0, 0.0, 0.0))
        );

        copy.parameters_mut().set("Tint", Vec3::ZERO).unwrap();
        assert_eq!(
            original.parameters().get("Tint").unwrap().as_vector3(),
            Some(Vec3::new(1.0, 0.0, 0.0))
        );
    }

    #[test]
    fn ensure_bound_reports_first_unset() {
        let mut effect = Effect::new(program());
        effect.parameters_mut().set("World", Mat4::IDENTITY).unwrap();
        let err = effect.parameters().ensure_bound().unwrap_err();
        assert!(matches!(err, RenderError::UnsetParameter { ref parameter, .. } if parameter == "Tint"));

        effect.parameters_mut().set("Tint", Vec3::ONE).unwrap();
        let texture = Arc::new(Texture2D::new("diffuse", 4, 4));
        effect.parameters_mut().set("Diffuse", texture.clone()).unwrap();
        assert!(effect.parameters().ensure_bound().is_ok());
        assert_eq!(
            effect.parameters().get("Diffuse").unwrap().as_texture(),
            Some(&texture)
        );
    }

    #[test]
    fn constant_bytes_skip_textures() {
        let mut effect = Effect::new(program());
        effect.parameters_mut().set("World", Mat4::IDENTITY).unwrap();
        effect.parameters_mut().set("Tint", Vec3::new(0.5, 0.25, 1.0)).unwrap();
        effect
            .parameters_mut()
            .set("Diffuse", Arc::new(Texture2D::new("diffuse", 1, 1)))
            .unwrap();

        let bytes = effect.parameters().constant_bytes();
        assert_eq!(bytes.len(), (16 + 3) * 4);
        let words: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(words[0], 1.0);
        assert_eq!(&words[16..], &[0.5, 0.25, 1.0]);
    }
}
