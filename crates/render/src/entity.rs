use std::sync::Arc;

use glam::{Mat4, Vec3};
use shaderlab_camera::OrbitCamera;

use crate::content::{ContentManager, diffuse_texture_path};
use crate::device::RenderDevice;
use crate::effect::Effect;
use crate::error::RenderError;
use crate::model::Model;
use crate::shaders;
use crate::texture::Texture2D;

/// Direction written to every effect's `LightDirection` each draw.
pub const LIGHT_DIRECTION: Vec3 = Vec3::ONE;

/// A model placed in the world, drawn with per-part clones of one effect.
#[derive(Debug)]
pub struct Entity {
    model: Model,
    world: Mat4,
    diffuse_texture: Arc<Texture2D>,
}

impl Entity {
    /// Load `path`, swap its effects for clones of `effect`, and place it at
    /// `position`.
    pub fn new<C: ContentManager + ?Sized>(
        content: &mut C,
        path: &str,
        effect: &Effect,
        position: Vec3,
    ) -> Result<Self, RenderError> {
        let (model, diffuse_texture) = Self::load_model(content, path, effect)?;
        Self::assemble(model, diffuse_texture, position)
    }

    /// Load `path` and keep the basic effects it was imported with.
    pub fn with_basic_effect<C: ContentManager + ?Sized>(
        content: &mut C,
        path: &str,
        position: Vec3,
    ) -> Result<Self, RenderError> {
        let model = content.load_model(path)?;
        let diffuse_texture = content.load_texture(&diffuse_texture_path(path))?;
        Self::assemble(model, diffuse_texture, position)
    }

    fn assemble(
        model: Model,
        diffuse_texture: Arc<Texture2D>,
        position: Vec3,
    ) -> Result<Self, RenderError> {
        let mut entity = Self {
            model: Model::default(),
            world: Mat4::from_translation(position),
            diffuse_texture,
        };
        entity.set_model(model)?;
        Ok(entity)
    }

    /// Load a model and its `_diffuse` texture, then give every mesh part a
    /// clone of `effect`. Parts that shared an effect keep sharing one clone.
    pub fn load_model<C: ContentManager + ?Sized>(
        content: &mut C,
        path: &str,
        effect: &Effect,
    ) -> Result<(Model, Arc<Texture2D>), RenderError> {
        let mut model = content.load_model(path)?;
        let diffuse_texture = content.load_texture(&diffuse_texture_path(path))?;
        let clones = model.replace_effects(effect)?;
        tracing::debug!(path, effect = effect.name(), clones, "model effects replaced");
        Ok((model, diffuse_texture))
    }

    /// Replace the model (and its diffuse texture) with a fresh load of `path`.
    /// On error the entity keeps its current model and texture.
    pub fn reload<C: ContentManager + ?Sized>(
        &mut self,
        content: &mut C,
        path: &str,
        effect: &Effect,
    ) -> Result<(), RenderError> {
        let (mut model, diffuse_texture) = Self::load_model(content, path, effect)?;
        bind_diffuse(&mut model, &diffuse_texture)?;
        self.model = model;
        self.diffuse_texture = diffuse_texture;
        Ok(())
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Store `model` and bind the diffuse texture into each of its effects.
    ///
    /// Effects declaring `DiffuseTexture` get it there; basic effects get it
    /// in `Texture`.
    /// On error the entity is left unchanged.
    pub fn set_model(&mut self, mut model: Model) -> Result<(), RenderError> {
        bind_diffuse(&mut model, &self.diffuse_texture)?;
        self.model = model;
        Ok(())
    }

    /// Translation of the world matrix.
    pub fn position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }

    pub fn world(&self) -> Mat4 {
        self.world
    }

    pub fn set_world(&mut self, world: Mat4) {
        self.world = world;
    }

    pub fn diffuse_texture(&self) -> &Arc<Texture2D> {
        &self.diffuse_texture
    }

    /// Write transforms and the light into every effect, then draw each mesh.
    pub fn draw(
        &mut self,
        camera: &OrbitCamera,
        device: &mut dyn RenderDevice,
    ) -> Result<(), RenderError> {
        let _span = tracing::info_span!("entity_draw", meshes = self.model.meshes().len()).entered();
        let world_view_projection = camera.projection() * camera.view() * self.world;

        for index in 0..self.model.meshes().len() {
            let slots = self.model.meshes()[index].effect_slots();
            for slot in slots {
                let params = self.model.effect_mut(slot)?.parameters_mut();
                params.set(shaders::WORLD, self.world)?;
                params.set(shaders::WORLD_VIEW_PROJECTION, world_view_projection)?;
                params.set(shaders::LIGHT_DIRECTION, LIGHT_DIRECTION)?;
            }
            self.model.draw_mesh(index, device)?;
        }
        Ok(())
    }

    /// Draw with the model's basic effects: default lighting, grey diffuse,
    /// the diffuse texture, and the camera's view and projection.
    pub fn draw_basic_effect(
        &mut self,
        camera: &OrbitCamera,
        device: &mut dyn RenderDevice,
    ) -> Result<(), RenderError> {
        let _span = tracing::info_span!("entity_draw_basic").entered();

        for index in 0..self.model.meshes().len() {
            let slots = self.model.meshes()[index].effect_slots();
            for slot in slots {
                let params = self.model.effect_mut(slot)?.parameters_mut();
                shaders::apply_basic_defaults(params)?;
                params.set(shaders::TEXTURE, self.diffuse_texture.clone())?;
                params.set(shaders::WORLD, self.world)?;
                params.set(shaders::VIEW, camera.view())?;
                params.set(shaders::PROJECTION, camera.projection())?;
            }
            self.model.draw_mesh(index, device)?;
        }
        Ok(())
    }

    /// Whether the model's bounds, placed by the world matrix, touch the
    /// camera frustum.
    pub fn is_visible(&self, camera: &OrbitCamera) -> bool {
        match self.model.bounding_sphere() {
            Some(sphere) => camera
                .frustum()
                .intersects_sphere(&sphere.transform(&self.world)),
            None => false,
        }
    }
}

/// Bind `texture` into every part's effect: `DiffuseTexture` where declared,
/// otherwise `Texture` for basic effects.
fn bind_diffuse(model: &mut Model, texture: &Arc<Texture2D>) -> Result<(), RenderError> {
    let slots: Vec<_> = model.parts().map(|part| part.effect()).collect();
    for slot in slots {
        let params = model.effect_mut(slot)?.parameters_mut();
        let name = if !params.contains(shaders::DIFFUSE_TEXTURE) && params.contains(shaders::TEXTURE)
        {
            shaders::TEXTURE
        } else {
            shaders::DIFFUSE_TEXTURE
        };
        params.set(name, Arc::clone(texture))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentError;
    use crate::device::RecordingDevice;
    use crate::model::{Bone, EffectSlot, ModelMesh, ModelMeshPart};
    use shaderlab_camera::BoundingSphere;
    use shaderlab_common::{GameTime, Viewport};
    use shaderlab_input::ScriptedMouse;
    use std::time::Duration;

    /// Serves one two-mesh model whose effects are shared across meshes.
    #[derive(Default)]
    struct TestContent {
        model_loads: usize,
    }

    impl ContentManager for TestContent {
        fn load_model(&mut self, path: &str) -> Result<Model, ContentError> {
            if path != "mdls/suzanne/model" && path != "mdls/untextured/model" {
                return Err(ContentError::NotFound { path: path.into() });
            }
            self.model_loads += 1;
            let basic = shaders::basic_effect_program();
            let effects = vec![Effect::new(basic.clone()), Effect::new(basic)];
            let sphere = BoundingSphere::new(Vec3::ZERO, 1.0);
            let head = ModelMesh::new(
                "head",
                0,
                sphere,
                vec![
                    ModelMeshPart::new(30, 10, EffectSlot(0)),
                    ModelMeshPart::new(30, 10, EffectSlot(1)),
                ],
            );
            let eyes = ModelMesh::new(
                "eyes",
                0,
                sphere,
                vec![ModelMeshPart::new(6, 2, EffectSlot(1))],
            );
            let root = Bone {
                name: "root".into(),
                parent: None,
                transform: Mat4::IDENTITY,
            };
            Model::new(vec![root], vec![head, eyes], effects).map_err(|e| {
                ContentError::InvalidAsset {
                    path: path.into(),
                    reason: e.to_string(),
                }
            })
        }

        fn load_texture(&mut self, path: &str) -> Result<Arc<Texture2D>, ContentError> {
            if path.starts_with("mdls/untextured") {
                return Err(ContentError::NotFound { path: path.into() });
            }
            Ok(Arc::new(Texture2D::new(path, 64, 64)))
        }

        fn load_effect(&mut self, path: &str) -> Result<Effect, ContentError> {
            match path {
                "shaders/ModelEffect" => Ok(Effect::new(shaders::model_effect_program())),
                _ => Err(ContentError::NotFound { path: path.into() }),
            }
        }
    }

    fn camera() -> OrbitCamera {
        let mut camera = OrbitCamera::with_viewport(Viewport::new(800.0, 480.0));
        camera.set_zoom(1000.0);
        let time = GameTime::new(Duration::ZERO, Duration::from_millis(16));
        camera.update(&time, &mut ScriptedMouse::default());
        camera
    }

    fn entity(content: &mut TestContent) -> Entity {
        let effect = content.load_effect("shaders/ModelEffect").unwrap();
        Entity::new(content, "mdls/suzanne/model", &effect, Vec3::ZERO).unwrap()
    }

    #[test]
    fn new_clones_effect_per_source() {
        let mut content = TestContent::default();
        let effect = content.load_effect("shaders/ModelEffect").unwrap();
        let entity = Entity::new(&mut content, "mdls/suzanne/model", &effect, Vec3::ZERO).unwrap();

        let model = entity.model();
        assert_eq!(model.effects().len(), 2);
        assert!(model.effects().iter().all(|e| e.shares_program(&effect)));
        assert!(model.effects().iter().all(|e| e.id() != effect.id()));
        // The eyes part shares the head's second source effect.
        assert_eq!(
            model.meshes()[0].parts()[1].effect(),
            model.meshes()[1].parts()[0].effect()
        );
    }

    #[test]
    fn diffuse_texture_bound_on_every_part() {
        let mut content = TestContent::default();
        let entity = entity(&mut content);
        assert_eq!(entity.diffuse_texture().name(), "mdls/suzanne/model_diffuse");

        for part in entity.model().parts() {
            let effect = entity.model().effect(part.effect()).unwrap();
            let texture = effect
                .parameters()
                .get(shaders::DIFFUSE_TEXTURE)
                .unwrap()
                .as_texture()
                .unwrap();
            assert!(Arc::ptr_eq(texture, entity.diffuse_texture()));
        }
    }

    #[test]
    fn missing_model_is_reported() {
        let mut content = TestContent::default();
        let effect = content.load_effect("shaders/ModelEffect").unwrap();
        let err = Entity::new(&mut content, "mdls/nothing", &effect, Vec3::ZERO).unwrap_err();
        assert!(matches!(err, RenderError::Content(ContentError::NotFound { .. })));
    }

    #[test]
    fn effect_without_diffuse_texture_is_rejected() {
        let mut content = TestContent::default();
        let program = Arc::new(crate::effect::ShaderProgram::new("Bare", "", Vec::new()));
        let err = Entity::new(
            &mut content,
            "mdls/suzanne/model",
            &Effect::new(program),
            Vec3::ZERO,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::MissingParameter { .. }));
    }

    #[test]
    fn position_follows_world_translation() {
        let mut content = TestContent::default();
        let effect = content.load_effect("shaders/ModelEffect").unwrap();
        let mut entity = Entity::new(
            &mut content,
            "mdls/suzanne/model",
            &effect,
            Vec3::new(1.0, 2.0, 3.0),
        )
        .unwrap();
        assert_eq!(entity.position(), Vec3::new(1.0, 2.0, 3.0));

        entity.set_world(Mat4::from_translation(Vec3::new(-4.0, 0.0, 0.0)));
        assert_eq!(entity.position(), Vec3::new(-4.0, 0.0, 0.0));
    }

    #[test]
    fn draw_writes_transforms_and_light() {
        let mut content = TestContent::default();
        let mut entity = entity(&mut content);
        entity.set_world(Mat4::from_translation(Vec3::new(0.5, 0.0, 0.0)));
        let camera = camera();
        let mut device = RecordingDevice::new(*camera.viewport());

        entity.draw(&camera, &mut device).unwrap();
        assert_eq!(device.draws().len(), 3);

        let expected = camera.projection() * camera.view() * entity.world();
        for effect in entity.model().effects() {
            let params = effect.parameters();
            assert_eq!(params.get(shaders::WORLD).unwrap().as_matrix(), Some(entity.world()));
            assert!(
                params
                    .get(shaders::WORLD_VIEW_PROJECTION)
                    .unwrap()
                    .as_matrix()
                    .unwrap()
                    .abs_diff_eq(expected, 1e-5)
            );
            assert_eq!(
                params.get(shaders::LIGHT_DIRECTION).unwrap().as_vector3(),
                Some(Vec3::ONE)
            );
        }
    }

    #[test]
    fn entities_from_one_effect_are_independent() {
        let mut content = TestContent::default();
        let effect = content.load_effect("shaders/ModelEffect").unwrap();
        let mut near = Entity::new(&mut content, "mdls/suzanne/model", &effect, Vec3::ZERO).unwrap();
        let mut far = Entity::new(
            &mut content,
            "mdls/suzanne/model",
            &effect,
            Vec3::new(10.0, 0.0, 0.0),
        )
        .unwrap();
        assert_eq!(content.model_loads, 2);

        let camera = camera();
        near.draw(&camera, &mut RecordingDevice::default()).unwrap();
        far.draw(&camera, &mut RecordingDevice::default()).unwrap();

        let near_world = near.model().effects()[0]
            .parameters()
            .get(shaders::WORLD)
            .unwrap()
            .as_matrix();
        assert_eq!(near_world, Some(Mat4::IDENTITY));
        assert!(!effect.parameters().get(shaders::WORLD).unwrap().is_set());
    }

    #[test]
    fn basic_effect_draw_binds_material() {
        let mut content = TestContent::default();
        let mut entity =
            Entity::with_basic_effect(&mut content, "mdls/suzanne/model", Vec3::ZERO).unwrap();
        let camera = camera();
        let mut device = RecordingDevice::default();

        entity.draw_basic_effect(&camera, &mut device).unwrap();
        assert_eq!(device.draws().len(), 3);
        assert!(device.draws().iter().all(|d| d.program == "BasicEffect"));

        let params = entity.model().effects()[0].parameters();
        assert_eq!(
            params.get(shaders::EMISSIVE_COLOR).unwrap().as_vector3(),
            Some(Vec3::splat(0.35))
        );
        assert_eq!(params.get(shaders::VIEW).unwrap().as_matrix(), Some(camera.view()));
    }

    #[test]
    fn model_effect_entity_cannot_draw_basic() {
        let mut content = TestContent::default();
        let mut entity = entity(&mut content);
        let err = entity
            .draw_basic_effect(&camera(), &mut RecordingDevice::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingParameter { .. }));
    }

    #[test]
    fn reload_replaces_model() {
        let mut content = TestContent::default();
        let mut entity = entity(&mut content);
        let before: Vec<_> = entity.model().effects().iter().map(|e| e.id()).collect();

        let effect = content.load_effect("shaders/ModelEffect").unwrap();
        entity.reload(&mut content, "mdls/suzanne/model", &effect).unwrap();
        assert!(entity.model().effects().iter().all(|e| !before.contains(&e.id())));
    }

    #[test]
    fn failed_reload_keeps_model_and_texture() {
        let mut content = TestContent::default();
        let mut entity = entity(&mut content);
        let texture = entity.diffuse_texture().id();
        let effects: Vec<_> = entity.model().effects().iter().map(|e| e.id()).collect();

        let program = Arc::new(crate::effect::ShaderProgram::new("Bare", "", Vec::new()));
        let err = entity
            .reload(&mut content, "mdls/suzanne/model", &Effect::new(program))
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingParameter { .. }));

        assert_eq!(entity.diffuse_texture().id(), texture);
        let current: Vec<_> = entity.model().effects().iter().map(|e| e.id()).collect();
        assert_eq!(current, effects);
        let bound = entity.model().effects()[0]
            .parameters()
            .get(shaders::DIFFUSE_TEXTURE)
            .unwrap()
            .as_texture()
            .unwrap()
            .id();
        assert_eq!(bound, texture);
    }

    #[test]
    fn missing_diffuse_texture_is_reported() {
        let mut content = TestContent::default();
        let effect = content.load_effect("shaders/ModelEffect").unwrap();
        let err =
            Entity::new(&mut content, "mdls/untextured/model", &effect, Vec3::ZERO).unwrap_err();
        match err {
            RenderError::Content(ContentError::NotFound { path }) => {
                assert_eq!(path, "mdls/untextured/model_diffuse");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn visibility_uses_world_bounds() {
        let mut content = TestContent::default();
        let mut entity = entity(&mut content);
        let camera = camera();
        assert!(entity.is_visible(&camera));

        // Behind the camera, which sits on +Z looking at the origin.
        entity.set_world(Mat4::from_translation(Vec3::new(0.0, 0.0, 500.0)));
        assert!(!entity.is_visible(&camera));
    }
}
