//! Host input seam: mouse snapshots polled once per frame.
//!
//! # Invariants
//! - The camera never talks to a window; it only sees `MouseState` values.
//! - Cursor warps requested through `MouseDevice::set_position` are visible in
//!   the next polled state.

pub mod mouse;

pub use mouse::{ButtonState, MouseDevice, MouseState, Point, ScriptedMouse};

pub fn crate_info() -> &'static str {
    "shaderlab-input v0.1.0"
}
