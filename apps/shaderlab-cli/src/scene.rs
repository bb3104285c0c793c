//! The demo scene: one entity at the origin, an orbit camera, and a text device.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use glam::Vec3;
use shaderlab_assets::ContentStore;
use shaderlab_camera::{CameraConfig, OrbitCamera};
use shaderlab_common::{Color, GameTime, Viewport};
use shaderlab_input::{ButtonState, MouseState, ScriptedMouse};
use shaderlab_render::{ContentManager, DebugTextDevice, Entity, RenderDevice};

/// Fixed step of the headless loop (60 Hz).
pub const FRAME: Duration = Duration::from_micros(16_667);

/// Zoom used when no camera config is given.
pub const DEFAULT_ZOOM: f32 = 1000.0;

/// Cursor offset held while the middle button is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drag {
    pub dx: i32,
    pub dy: i32,
}

impl FromStr for Drag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (dx, dy) = s
            .split_once(',')
            .ok_or_else(|| format!("expected DX,DY, got '{s}'"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<i32>()
                .map_err(|e| format!("bad drag component '{v}': {e}"))
        };
        Ok(Drag {
            dx: parse(dx)?,
            dy: parse(dy)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SceneOptions {
    pub config: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub model: String,
    pub effect: String,
    /// Keep the model's basic effects instead of swapping in `effect`.
    pub basic: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            config: None,
            manifest: None,
            model: "mdls/suzanne/model".into(),
            effect: "shaders/ModelEffect".into(),
            basic: false,
        }
    }
}

/// Load the camera from `config`, or a default camera at [`DEFAULT_ZOOM`].
pub fn load_camera(config: Option<&PathBuf>, viewport: Viewport) -> anyhow::Result<OrbitCamera> {
    match config {
        Some(path) => {
            let config = CameraConfig::load(path)
                .with_context(|| format!("loading camera config {}", path.display()))?;
            Ok(OrbitCamera::from_config(viewport, &config)?)
        }
        None => {
            let mut camera = OrbitCamera::with_viewport(viewport);
            camera.set_zoom(DEFAULT_ZOOM);
            Ok(camera)
        }
    }
}

/// Mouse script for `frames` frames: press the middle button at the viewport
/// centre, then hold it at `drag` from there with the wheel at `scroll`.
pub fn mouse_script(viewport: &Viewport, frames: u32, drag: Option<Drag>, scroll: i32) -> ScriptedMouse {
    let cx = (viewport.x + viewport.width / 2.0) as i32;
    let cy = (viewport.y + viewport.height / 2.0) as i32;
    let button = if drag.is_some() {
        ButtonState::Pressed
    } else {
        ButtonState::Released
    };
    let Drag { dx, dy } = drag.unwrap_or(Drag { dx: 0, dy: 0 });

    let mut mouse = ScriptedMouse::new(MouseState::at(cx, cy));
    for frame in 0..frames {
        let state = if frame == 0 {
            MouseState::at(cx, cy).with_middle(button)
        } else {
            MouseState::at(cx + dx, cy + dy)
                .with_middle(button)
                .with_scroll(scroll)
        };
        mouse.push(state);
    }
    mouse
}

pub struct Scene {
    camera: OrbitCamera,
    entity: Entity,
    device: DebugTextDevice,
    time: GameTime,
    basic: bool,
}

impl Scene {
    pub fn load(options: &SceneOptions) -> anyhow::Result<Self> {
        let mut content = match &options.manifest {
            Some(path) => ContentStore::load_manifest(path)
                .with_context(|| format!("loading content manifest {}", path.display()))?,
            None => ContentStore::tutorial(),
        };

        let viewport = Viewport::default();
        let camera = load_camera(options.config.as_ref(), viewport)?;

        let entity = if options.basic {
            Entity::with_basic_effect(&mut content, &options.model, Vec3::ZERO)?
        } else {
            let effect = content.load_effect(&options.effect)?;
            Entity::new(&mut content, &options.model, &effect, Vec3::ZERO)?
        };
        tracing::info!(
            model = %options.model,
            effects = entity.model().effects().len(),
            basic = options.basic,
            "scene loaded"
        );

        Ok(Self {
            camera,
            entity,
            device: DebugTextDevice::new(viewport),
            time: GameTime::default(),
            basic: options.basic,
        })
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Update the camera from the next scripted mouse state, then draw.
    pub fn frame(&mut self, mouse: &mut ScriptedMouse) -> anyhow::Result<()> {
        self.time.advance(FRAME);
        mouse.advance();
        self.camera.update(&self.time, mouse);

        self.device.begin_frame();
        self.device.clear(Color::CORNFLOWER_BLUE);
        if !self.entity.is_visible(&self.camera) {
            tracing::debug!("entity outside the view frustum");
        }
        if self.basic {
            self.entity.draw_basic_effect(&self.camera, &mut self.device)?;
        } else {
            self.entity.draw(&self.camera, &mut self.device)?;
        }
        Ok(())
    }

    pub fn take_transcript(&mut self) -> String {
        self.device.take_output()
    }
}
