use std::fmt::Write as _;

use shaderlab_common::{Color, ResourceId, Viewport};

use crate::effect::Effect;
use crate::error::RenderError;
use crate::model::{ModelMesh, ModelMeshPart};

/// Backend-agnostic draw target.
///
/// Devices receive fully bound effects; a part whose effect still has unset
/// parameters is rejected rather than drawn with stale constants.
pub trait RenderDevice {
    fn viewport(&self) -> Viewport;

    fn clear(&mut self, color: Color);

    /// Draw one mesh part with the given effect.
    fn draw_mesh_part(
        &mut self,
        mesh: &ModelMesh,
        part_index: usize,
        part: &ModelMeshPart,
        effect: &Effect,
    ) -> Result<(), RenderError>;
}

/// A draw as seen by a [`RecordingDevice`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub mesh: String,
    pub part_index: usize,
    pub effect: ResourceId,
    pub program: String,
    pub primitive_count: u32,
    /// Constant buffer contents at the time of the draw.
    pub constants: Vec<u8>,
}

/// Device that records every clear and draw instead of rasterizing.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    viewport: Viewport,
    clears: Vec<Color>,
    draws: Vec<DrawCall>,
}

impl RecordingDevice {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    pub fn clears(&self) -> &[Color] {
        &self.clears
    }

    /// Forget everything recorded so far.
    pub fn reset(&mut self) {
        self.clears.clear();
        self.draws.clear();
    }
}

impl RenderDevice for RecordingDevice {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self, color: Color) {
        self.clears.push(color);
    }

    fn draw_mesh_part(
        &mut self,
        mesh: &ModelMesh,
        part_index: usize,
        part: &ModelMeshPart,
        effect: &Effect,
    ) -> Result<(), RenderError> {
        effect.parameters().ensure_bound()?;
        self.draws.push(DrawCall {
            mesh: mesh.name.clone(),
            part_index,
            effect: effect.id(),
            program: effect.name().to_string(),
            primitive_count: part.primitive_count,
            constants: effect.parameters().constant_bytes(),
        });
        Ok(())
    }
}

/// Human-readable frame transcript, for the CLI and logs.
#[derive(Debug, Default)]
pub struct DebugTextDevice {
    viewport: Viewport,
    frame: u64,
    out: String,
}

impl DebugTextDevice {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    /// Start a new frame section in the transcript.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        let _ = writeln!(self.out, "=== Frame {} ===", self.frame);
    }

    pub fn output(&self) -> &str {
        &self.out
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.out)
    }
}

impl RenderDevice for DebugTextDevice {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color.0;
        let _ = writeln!(self.out, "clear ({r:.3}, {g:.3}, {b:.3}, {a:.3})");
    }

    fn draw_mesh_part(
        &mut self,
        mesh: &ModelMesh,
        part_index: usize,
        part: &ModelMeshPart,
        effect: &Effect,
    ) -> Result<(), RenderError> {
        effect.parameters().ensure_bound()?;
        let _ = writeln!(
            self.out,
            "  draw {}[{}] effect={} [{}] primitives={} constants={}B",
            mesh.name,
            part_index,
            effect.name(),
            effect.id().short(),
            part.primitive_count,
            effect.parameters().constant_bytes().len()
        );
        Ok(())
    }
}
