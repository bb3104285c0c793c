use std::collections::VecDeque;

/// Whether a mouse button is held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    #[default]
    Released,
    Pressed,
}

impl ButtonState {
    pub fn is_pressed(self) -> bool {
        self == ButtonState::Pressed
    }
}

/// Cursor position in window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One polled snapshot of the mouse.
///
/// `scroll_wheel_value` is cumulative since the host started; consumers diff
/// two snapshots to get the per-frame wheel delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseState {
    pub position: Point,
    pub scroll_wheel_value: i32,
    pub left_button: ButtonState,
    pub middle_button: ButtonState,
    pub right_button: ButtonState,
}

impl MouseState {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            position: Point::new(x, y),
            ..Default::default()
        }
    }

    pub fn with_middle(mut self, state: ButtonState) -> Self {
        self.middle_button = state;
        self
    }

    pub fn with_scroll(mut self, value: i32) -> Self {
        self.scroll_wheel_value = value;
        self
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }
}

/// Host-owned mouse. Implemented by the windowing layer.
pub trait MouseDevice {
    /// Poll the current state.
    fn state(&self) -> MouseState;

    /// Warp the cursor to `(x, y)`.
    fn set_position(&mut self, x: i32, y: i32);
}

/// A `MouseDevice` that replays a prepared sequence of states.
///
/// Each call to [`ScriptedMouse::advance`] moves to the next queued state.
/// Once the script runs out the last scripted state repeats, undoing any warp
/// made since.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMouse {
    current: MouseState,
    last: Option<MouseState>,
    script: VecDeque<MouseState>,
    warps: Vec<Point>,
}

impl ScriptedMouse {
    pub fn new(initial: MouseState) -> Self {
        Self {
            current: initial,
            ..Default::default()
        }
    }

    /// Queue a state for a later frame.
    pub fn push(&mut self, state: MouseState) {
        self.script.push_back(state);
    }

    /// Step to the next scripted state. Returns `false` once the script is exhausted.
    pub fn advance(&mut self) -> bool {
        match self.script.pop_front() {
            Some(next) => {
                self.current = next;
                self.last = Some(next);
                true
            }
            None => {
                if let Some(last) = self.last {
                    self.current = last;
                }
                false
            }
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Every cursor warp requested so far, oldest first.
    pub fn warps(&self) -> &[Point] {
        &self.warps
    }
}

impl MouseDevice for ScriptedMouse {
    fn state(&self) -> MouseState {
        self.current
    }

    fn set_position(&mut self, x: i32, y: i32) {
        tracing::trace!(x, y, "cursor warped");
        self.current.position = Point::new(x, y);
        self.warps.push(Point::new(x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_released() {
        let state = MouseState::default();
        assert_eq!(state.middle_button, ButtonState::Released);
        assert_eq!(state.scroll_wheel_value, 0);
        assert!(!state.left_button.is_pressed());
    }

    #[test]
    fn builders_set_fields() {
        let state = MouseState::at(3, 4)
            .with_middle(ButtonState::Pressed)
            .with_scroll(120);
        assert_eq!((state.x(), state.y()), (3, 4));
        assert!(state.middle_button.is_pressed());
        assert_eq!(state.scroll_wheel_value, 120);
    }

    #[test]
    fn scripted_mouse_replays_in_order() {
        let mut mouse = ScriptedMouse::new(MouseState::at(0, 0));
        mouse.push(MouseState::at(1, 1));
        mouse.push(MouseState::at(2, 2));

        assert_eq!(mouse.state().position, Point::new(0, 0));
        assert!(mouse.advance());
        assert_eq!(mouse.state().position, Point::new(1, 1));
        assert!(mouse.advance());
        assert_eq!(mouse.state().position, Point::new(2, 2));
        assert!(!mouse.advance());
        assert_eq!(mouse.state().position, Point::new(2, 2));
        assert_eq!(mouse.remaining(), 0);
    }

    #[test]
    fn set_position_moves_cursor_and_is_recorded() {
        let mut mouse = ScriptedMouse::new(MouseState::at(10, 10).with_middle(ButtonState::Pressed));
        mouse.set_position(5, 6);
        assert_eq!(mouse.state().position, Point::new(5, 6));
        assert!(mouse.state().middle_button.is_pressed());
        assert_eq!(mouse.warps(), &[Point::new(5, 6)]);
    }

    #[test]
    fn exhausted_script_repeats_last_state_over_warps() {
        let mut mouse = ScriptedMouse::new(MouseState::at(0, 0));
        mouse.push(MouseState::at(30, 40).with_middle(ButtonState::Pressed));
        assert!(mouse.advance());

        mouse.set_position(10, 10);
        assert!(!mouse.advance());
        assert_eq!(mouse.state().position, Point::new(30, 40));
        assert!(mouse.state().middle_button.is_pressed());
    }

    #[test]
    fn unscripted_mouse_keeps_warps() {
        let mut mouse = ScriptedMouse::new(MouseState::at(1, 2));
        mouse.set_position(7, 8);
        assert!(!mouse.advance());
        assert_eq!(mouse.state().position, Point::new(7, 8));
    }
}
