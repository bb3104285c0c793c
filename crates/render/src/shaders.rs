//! Built-in shader programs and their parameter names.

use std::sync::{Arc, OnceLock};

use glam::Vec3;

use crate::effect::{EffectParameters, ParameterDecl, ParameterKind, ShaderProgram};
use crate::error::RenderError;

pub const WORLD: &str = "World";
pub const WORLD_VIEW_PROJECTION: &str = "WorldViewProjection";
pub const LIGHT_DIRECTION: &str = "LightDirection";
pub const DIFFUSE_TEXTURE: &str = "DiffuseTexture";

pub const VIEW: &str = "View";
pub const PROJECTION: &str = "Projection";
pub const DIFFUSE_COLOR: &str = "DiffuseColor";
pub const SPECULAR_COLOR: &str = "SpecularColor";
pub const EMISSIVE_COLOR: &str = "EmissiveColor";
pub const TEXTURE: &str = "Texture";
pub const TEXTURE_ENABLED: &str = "TextureEnabled";
pub const LIGHTING_ENABLED: &str = "LightingEnabled";
pub const PREFER_PER_PIXEL_LIGHTING: &str = "PreferPerPixelLighting";

/// Diffuse-textured model lit by one directional light.
pub const MODEL_EFFECT_WGSL: &str = r#"
struct Constants {
    world: mat4x4<f32>,
    world_view_projection: mat4x4<f32>,
    light_direction: vec3<f32>,
};

@group(0) @binding(0)
var<uniform> constants: Constants;
@group(0) @binding(1)
var diffuse_texture: texture_2d<f32>;
@group(0) @binding(2)
var diffuse_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = constants.world_view_projection * vec4<f32>(in.position, 1.0);
    out.normal = normalize((constants.world * vec4<f32>(in.normal, 0.0)).xyz);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light = normalize(constants.light_direction);
    let diffuse = max(dot(in.normal, light), 0.0);
    let base = textureSample(diffuse_texture, diffuse_sampler, in.uv);
    return vec4<f32>(base.rgb * (0.2 + 0.8 * diffuse), base.a);
}
"#;

/// Fixed-function style material: default three-light rig, optional texture.
pub const BASIC_EFFECT_WGSL: &str = r#"
struct Constants {
    world: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    diffuse_color: vec3<f32>,
    specular_color: vec3<f32>,
    emissive_color: vec3<f32>,
    texture_enabled: f32,
    lighting_enabled: f32,
    prefer_per_pixel_lighting: f32,
};

@group(0) @binding(0)
var<uniform> constants: Constants;
@group(0) @binding(1)
var base_texture: texture_2d<f32>;
@group(0) @binding(2)
var base_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_pos = constants.world * vec4<f32>(in.position, 1.0);
    out.clip_position = constants.projection * constants.view * world_pos;
    out.normal = normalize((constants.world * vec4<f32>(in.normal, 0.0)).xyz);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var color = constants.diffuse_color;
    if constants.texture_enabled > 0.5 {
        color = color * textureSample(base_texture, base_sampler, in.uv).rgb;
    }
    if constants.lighting_enabled > 0.5 {
        let key = max(dot(in.normal, normalize(vec3<f32>(0.5265, 0.5735, 0.6275))), 0.0);
        let fill = max(dot(in.normal, normalize(vec3<f32>(-0.7198, -0.3420, 0.6040))), 0.0);
        let back = max(dot(in.normal, normalize(vec3<f32>(-0.4545, 0.7660, -0.4545))), 0.0);
        color = color * (key + 0.5 * fill + 0.3 * back) + constants.specular_color * key;
    }
    return vec4<f32>(color + constants.emissive_color, 1.0);
}
"#;

/// The diffuse-lit model program, compiled once per process.
pub fn model_effect_program() -> Arc<ShaderProgram> {
    static PROGRAM: OnceLock<Arc<ShaderProgram>> = OnceLock::new();
    PROGRAM
        .get_or_init(|| {
            Arc::new(ShaderProgram::new(
                "ModelEffect",
                MODEL_EFFECT_WGSL,
                vec![
                    ParameterDecl::new(WORLD, ParameterKind::Matrix),
                    ParameterDecl::new(WORLD_VIEW_PROJECTION, ParameterKind::Matrix),
                    ParameterDecl::new(LIGHT_DIRECTION, ParameterKind::Vector3),
                    ParameterDecl::new(DIFFUSE_TEXTURE, ParameterKind::Texture2D),
                ],
            ))
        })
        .clone()
}

/// The basic material program models are imported with.
pub fn basic_effect_program() -> Arc<ShaderProgram> {
    static PROGRAM: OnceLock<Arc<ShaderProgram>> = OnceLock::new();
    PROGRAM
        .get_or_init(|| {
            Arc::new(ShaderProgram::new(
                "BasicEffect",
                BASIC_EFFECT_WGSL,
                vec![
                    ParameterDecl::new(WORLD, ParameterKind::Matrix),
                    ParameterDecl::new(VIEW, ParameterKind::Matrix),
                    ParameterDecl::new(PROJECTION, ParameterKind::Matrix),
                    ParameterDecl::new(DIFFUSE_COLOR, ParameterKind::Vector3),
                    ParameterDecl::new(SPECULAR_COLOR, ParameterKind::Vector3),
                    ParameterDecl::new(EMISSIVE_COLOR, ParameterKind::Vector3),
                    ParameterDecl::new(TEXTURE, ParameterKind::Texture2D),
                    ParameterDecl::new(TEXTURE_ENABLED, ParameterKind::Bool),
                    ParameterDecl::new(LIGHTING_ENABLED, ParameterKind::Bool),
                    ParameterDecl::new(PREFER_PER_PIXEL_LIGHTING, ParameterKind::Bool),
                ],
            ))
        })
        .clone()
}

/// Material constants for drawing with the basic program: default lighting,
/// grey diffuse, faint specular, strong emissive, texturing on.
pub fn apply_basic_defaults(params: &mut EffectParameters) -> Result<(), RenderError> {
    params.set(LIGHTING_ENABLED, true)?;
    params.set(DIFFUSE_COLOR, Vec3::splat(0.5))?;
    params.set(PREFER_PER_PIXEL_LIGHTING, true)?;
    params.set(SPECULAR_COLOR, Vec3::splat(0.15))?;
    params.set(EMISSIVE_COLOR, Vec3::splat(0.35))?;
    params.set(TEXTURE_ENABLED, true)?;
    Ok(())
}
