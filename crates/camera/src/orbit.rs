use glam::{Mat4, Vec3};
use shaderlab_common::{GameTime, PI_OVER_2, Viewport, wrap_angle};
use shaderlab_input::{MouseDevice, MouseState, Point};

use crate::config::{CameraConfig, ConfigError};
use crate::frustum::BoundingFrustum;

/// Pitch saturates here so the camera never flips over the pole.
pub const PITCH_LIMIT: f32 = PI_OVER_2 * 0.99;

/// Camera orbiting a look-at target.
///
/// The world transform is rebuilt on every [`OrbitCamera::update`] as
/// `T(look_at) · R_y(yaw) · R_x(pitch) · T(0, 0, zoom · zoom_distance_scale)`
/// and the view matrix is its inverse.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    viewport: Viewport,
    view: Mat4,
    projection: Mat4,
    view_projection: Mat4,
    frustum: BoundingFrustum,
    field_of_view: f32,
    aspect_ratio: f32,
    near_plane: f32,
    far_plane: f32,
    focal_distance: f32,
    focal_width: f32,
    world: Mat4,
    yaw: f32,
    pitch: f32,
    look_at: Vec3,
    zoom: f32,
    drag_sensitivity: f32,
    wheel_divisor: f32,
    min_zoom: f32,
    zoom_distance_scale: f32,
    mouse_state: MouseState,
    previous_mouse_state: MouseState,
    first_mouse_down: Point,
}

impl OrbitCamera {
    /// Create a camera for `viewport`. The aspect ratio is taken from the viewport.
    pub fn new(
        viewport: Viewport,
        pitch: f32,
        yaw: f32,
        near_plane: f32,
        far_plane: f32,
        field_of_view: f32,
    ) -> Self {
        let config = CameraConfig {
            pitch,
            yaw,
            near_plane,
            far_plane,
            field_of_view,
            ..CameraConfig::default()
        };
        Self::build(viewport, &config)
    }

    /// Create a camera with the default tunables.
    pub fn with_viewport(viewport: Viewport) -> Self {
        Self::build(viewport, &CameraConfig::default())
    }

    /// Create a camera from a validated config.
    pub fn from_config(viewport: Viewport, config: &CameraConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(viewport, config))
    }

    fn build(viewport: Viewport, config: &CameraConfig) -> Self {
        let mut camera = Self {
            viewport,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
            frustum: BoundingFrustum::from_matrix(Mat4::IDENTITY),
            field_of_view: config.field_of_view,
            aspect_ratio: viewport.aspect_ratio(),
            near_plane: config.near_plane,
            far_plane: config.far_plane,
            focal_distance: config.focal_distance,
            focal_width: config.focal_width,
            world: Mat4::IDENTITY,
            yaw: 0.0,
            pitch: 0.0,
            look_at: config.look_at,
            zoom: config.zoom,
            drag_sensitivity: config.drag_sensitivity,
            wheel_divisor: config.wheel_divisor,
            min_zoom: config.min_zoom,
            zoom_distance_scale: config.zoom_distance_scale,
            mouse_state: MouseState::default(),
            previous_mouse_state: MouseState::default(),
            first_mouse_down: Point::default(),
        };
        camera.set_pitch(config.pitch);
        camera.set_yaw(config.yaw);
        camera.calculate_projection();
        camera.world = camera.orbit_world();
        camera.set_view(camera.world.inverse());
        camera.frustum = BoundingFrustum::from_matrix(camera.view_projection);
        camera
    }

    fn calculate_projection(&mut self) {
        let projection = Mat4::perspective_rh(
            self.field_of_view,
            self.aspect_ratio,
            self.near_plane,
            self.far_plane,
        );
        self.set_projection(projection);
    }

    fn orbit_world(&self) -> Mat4 {
        Mat4::from_translation(self.look_at)
            * Mat4::from_rotation_y(self.yaw)
            * Mat4::from_rotation_x(self.pitch)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, self.zoom * self.zoom_distance_scale))
    }

    /// Advance one frame: apply middle-drag orbiting and wheel zoom, then
    /// rebuild the world, view and frustum.
    ///
    /// While the middle button is held the cursor is warped back to where the
    /// drag started, so each frame sees only that frame's motion.
    pub fn update<M: MouseDevice + ?Sized>(&mut self, time: &GameTime, mouse: &mut M) {
        self.mouse_state = mouse.state();
        let dt = time.elapsed_seconds();

        let middle = self.mouse_state.middle_button;
        if middle.is_pressed() && !self.previous_mouse_state.middle_button.is_pressed() {
            self.first_mouse_down = self.mouse_state.position;
            tracing::debug!(
                x = self.first_mouse_down.x,
                y = self.first_mouse_down.y,
                "orbit drag started"
            );
        }

        if middle.is_pressed() {
            let dx = self.first_mouse_down.x.wrapping_sub(self.mouse_state.x()) as f32;
            let dy = self.first_mouse_down.y.wrapping_sub(self.mouse_state.y()) as f32;
            self.set_yaw(self.yaw + dx * dt * self.drag_sensitivity);
            self.set_pitch(self.pitch + dy * dt * self.drag_sensitivity);

            mouse.set_position(self.first_mouse_down.x, self.first_mouse_down.y);
        }

        // The host's cumulative wheel value wraps around.
        let wheel_delta = self
            .mouse_state
            .scroll_wheel_value
            .wrapping_sub(self.previous_mouse_state.scroll_wheel_value)
            as f32;
        self.zoom += wheel_delta / self.wheel_divisor;
        self.zoom = self.zoom.max(self.min_zoom);

        self.world = self.orbit_world();
        self.set_view(self.world.inverse());

        self.previous_mouse_state = self.mouse_state;

        self.frustum = BoundingFrustum::from_matrix(self.view_projection);

        tracing::trace!(
            yaw = self.yaw,
            pitch = self.pitch,
            zoom = self.zoom,
            "camera updated"
        );
    }

    // ===== MATRICES =====

    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// Store a view matrix and refresh the cached view-projection.
    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
        self.view_projection = self.projection * self.view;
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Store a projection matrix and refresh the cached view-projection.
    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
        self.view_projection = self.projection * self.view;
    }

    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    /// Frustum from the last update.
    pub fn frustum(&self) -> &BoundingFrustum {
        &self.frustum
    }

    /// The camera's own transform; `view()` is its inverse after an update.
    pub fn world(&self) -> Mat4 {
        self.world
    }

    pub fn position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }

    // ===== PROJECTION PARAMETERS =====

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Replace the viewport and follow its aspect ratio.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.set_aspect_ratio(viewport.aspect_ratio());
    }

    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    pub fn set_field_of_view(&mut self, field_of_view: f32) {
        self.field_of_view = field_of_view;
        self.calculate_projection();
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.calculate_projection();
    }

    pub fn near_plane(&self) -> f32 {
        self.near_plane
    }

    pub fn set_near_plane(&mut self, near_plane: f32) {
        self.near_plane = near_plane;
        self.calculate_projection();
    }

    pub fn far_plane(&self) -> f32 {
        self.far_plane
    }

    pub fn set_far_plane(&mut self, far_plane: f32) {
        self.far_plane = far_plane;
        self.calculate_projection();
    }

    /// Depth-of-field focus distance. Carried for post effects; the camera itself ignores it.
    pub fn focal_distance(&self) -> f32 {
        self.focal_distance
    }

    pub fn set_focal_distance(&mut self, focal_distance: f32) {
        self.focal_distance = focal_distance;
    }

    pub fn focal_width(&self) -> f32 {
        self.focal_width
    }

    pub fn set_focal_width(&mut self, focal_width: f32) {
        self.focal_width = focal_width;
    }

    // ===== ORBIT STATE =====

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Set yaw, wrapped into `(-π, π]`.
    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = wrap_angle(yaw);
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Set pitch, saturating at `±PITCH_LIMIT`.
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn set_look_at(&mut self, target: Vec3) {
        self.look_at = target;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Request a zoom. Values under the floor are raised on the next update.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
    }

    /// Orbit radius the current zoom maps to.
    pub fn distance(&self) -> f32 {
        self.zoom * self.zoom_distance_scale
    }
}
