use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Identity of a live resource instance (effect, texture).
///
/// Two clones of the same effect share compiled shader code but never an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub Uuid);

impl ResourceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame timing snapshot handed to update and draw callbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameTime {
    /// Time since the host loop started.
    pub total: Duration,
    /// Time since the previous frame.
    pub elapsed: Duration,
}

impl GameTime {
    pub fn new(total: Duration, elapsed: Duration) -> Self {
        Self { total, elapsed }
    }

    /// Frame delta in seconds, truncated to whole milliseconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_millis() as f32 / 1000.0
    }

    /// Advance to the next frame.
    pub fn advance(&mut self, dt: Duration) {
        self.total += dt;
        self.elapsed = dt;
    }
}

/// Render target rectangle and depth range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }

    /// `width / height`, or 0 for a degenerate viewport.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height <= 0.0 || self.width <= 0.0 {
            0.0
        } else {
            self.width / self.height
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 480.0)
    }
}

/// Linear RGBA clear color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);
    pub const CORNFLOWER_BLUE: Color = Color([100.0 / 255.0, 149.0 / 255.0, 237.0 / 255.0, 1.0]);
}
