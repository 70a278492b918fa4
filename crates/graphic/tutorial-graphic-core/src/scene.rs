//! Scene context handed to markers at initialization: camera, canvas size,
//! locale and the fallback settings for markers that carry none.

use std::sync::{Arc, RwLock};

use glam::{Quat, Vec2, Vec3};

use crate::settings::{GraphicSettings, WorldGraphicSettings};

/// Snapshot of a perspective camera.
///
/// Conventions: right-handed, +Y up, the camera looks down its local -Z.
/// Viewport coordinates run `[0,1]` with the origin at the bottom-left.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Render target size in pixels.
    pub viewport_px: Vec2,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: std::f32::consts::FRAC_PI_4,
            viewport_px: Vec2::new(1920.0, 1080.0),
        }
    }
}

impl CameraView {
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    fn aspect(&self) -> f32 {
        if self.viewport_px.y > 0.0 {
            self.viewport_px.x / self.viewport_px.y
        } else {
            1.0
        }
    }

    /// Project a world point. Returns `(viewport_xy, depth)`; depth <= 0 means
    /// the point is behind the camera and the xy is meaningless.
    pub fn world_to_viewport(&self, point: Vec3) -> (Vec2, f32) {
        let local = self.rotation.inverse() * (point - self.position);
        let depth = -local.z;
        if depth <= 0.0 {
            return (Vec2::ZERO, depth);
        }
        let half_h = (self.fov_y * 0.5).tan();
        let half_w = half_h * self.aspect();
        let ndc = Vec2::new(local.x / (depth * half_w), local.y / (depth * half_h));
        ((ndc + Vec2::ONE) * 0.5, depth)
    }

    /// Project a world point to pixels; `None` when behind the camera.
    pub fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        let (vp, depth) = self.world_to_viewport(point);
        (depth > 0.0).then(|| vp * self.viewport_px)
    }

    /// World point at `distance` along the forward axis through a viewport point.
    pub fn viewport_to_world(&self, viewport: Vec2, distance: f32) -> Vec3 {
        let ndc = viewport * 2.0 - Vec2::ONE;
        let half_h = (self.fov_y * 0.5).tan();
        let half_w = half_h * self.aspect();
        let local = Vec3::new(
            ndc.x * half_w * distance,
            ndc.y * half_h * distance,
            -distance,
        );
        self.position + self.rotation * local
    }
}

/// Host-updated camera shared with every world marker.
#[derive(Clone, Debug, Default)]
pub struct CameraHandle(Arc<RwLock<CameraView>>);

impl CameraHandle {
    pub fn new(view: CameraView) -> Self {
        Self(Arc::new(RwLock::new(view)))
    }

    pub fn get(&self) -> CameraView {
        match self.0.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set(&self, view: CameraView) {
        match self.0.write() {
            Ok(mut guard) => *guard = view,
            Err(poisoned) => *poisoned.into_inner() = view,
        }
    }
}

/// Scene-level references every marker needs.
#[derive(Clone, Debug)]
pub struct SceneReferences {
    pub camera: CameraHandle,
    /// Overlay canvas size in pixels.
    pub canvas_size: Vec2,
    pub locale: String,
    pub default_screen_settings: Arc<GraphicSettings>,
    pub default_world_settings: Arc<WorldGraphicSettings>,
}

impl SceneReferences {
    pub fn new(camera: CameraView, canvas_size: Vec2) -> Self {
        Self {
            camera: CameraHandle::new(camera),
            canvas_size,
            locale: "en".to_string(),
            default_screen_settings: Arc::new(GraphicSettings::default()),
            default_world_settings: Arc::new(WorldGraphicSettings::default()),
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_default_screen_settings(mut self, settings: Arc<GraphicSettings>) -> Self {
        self.default_screen_settings = settings;
        self
    }

    pub fn with_default_world_settings(mut self, settings: Arc<WorldGraphicSettings>) -> Self {
        self.default_world_settings = settings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_round_trips_through_viewport() {
        let cam = CameraView {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(0.4),
            ..CameraView::default()
        };
        let vp = Vec2::new(0.2, 0.7);
        let world = cam.viewport_to_world(vp, 5.0);
        let (back, depth) = cam.world_to_viewport(world);
        assert!((back - vp).length() < 1e-4, "back={back:?}");
        assert!((depth - 5.0).abs() < 1e-4);
    }

    #[test]
    fn behind_camera_has_no_screen_point() {
        let cam = CameraView::default();
        assert!(cam.world_to_screen(Vec3::new(0.0, 0.0, 5.0)).is_none());
        let center = cam.world_to_screen(Vec3::new(0.0, 0.0, -5.0)).unwrap();
        assert!((center - Vec2::new(960.0, 540.0)).length() < 1e-3);
    }

    #[test]
    fn camera_handle_shares_updates() {
        let handle = CameraHandle::new(CameraView::default());
        let other = handle.clone();
        other.set(CameraView {
            position: Vec3::X,
            ..CameraView::default()
        });
        assert_eq!(handle.get().position, Vec3::X);
    }
}
