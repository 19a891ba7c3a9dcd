use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

use crate::extensions::easing::Easing;
use crate::extensions::tween::Tween;

/// Axis-aligned world rectangle seen by the camera.
/// Y points down, so `top < bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldView {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl WorldView {
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            left: center.x - width / 2.0,
            top: center.y - height / 2.0,
            right: center.x + width / 2.0,
            bottom: center.y + height / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Whether `point` lies inside the view shrunk by `inset` on every side.
    pub fn contains_inset(&self, point: Vec2, inset: f32) -> bool {
        point.x >= self.left + inset
            && point.x <= self.right - inset
            && point.y >= self.top + inset
            && point.y <= self.bottom - inset
    }
}

/// Orthographic camera for a Y-down 2D world.
///
/// The visible world area is the viewport size divided by the zoom factor.
/// Pan and zoom effects are eased tweens advanced by [`Camera2D::update`].
#[derive(Debug, Clone)]
pub struct Camera2D {
    /// Viewport width in screen pixels.
    pub viewport_width: f32,
    /// Viewport height in screen pixels.
    pub viewport_height: f32,
    /// Camera center position in world space.
    pub center: Vec2,
    /// World-to-screen scale (1.0 = one world unit per pixel).
    pub zoom: f32,
    pan: Option<Tween<Vec2>>,
    zoom_effect: Option<Tween<f32>>,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub projection: [[f32; 4]; 4],
}

impl Camera2D {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            viewport_width,
            viewport_height,
            center: Vec2::ZERO,
            zoom: 1.0,
            pan: None,
            zoom_effect: None,
        }
    }

    /// Resize the viewport (e.g. on window resize). Center and zoom are kept.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        self.viewport_width = viewport_width;
        self.viewport_height = viewport_height;
    }

    /// Visible world area for the current center and zoom.
    pub fn world_view(&self) -> WorldView {
        self.view_at(self.center, self.zoom)
    }

    /// The view the camera will show once running effects finish.
    pub fn target_view(&self) -> WorldView {
        self.view_at(self.pan_target(), self.zoom_target())
    }

    fn view_at(&self, center: Vec2, zoom: f32) -> WorldView {
        let zoom = zoom.max(f32::EPSILON);
        WorldView::from_center(center, self.viewport_width / zoom, self.viewport_height / zoom)
    }

    /// Snap the center to `target`, cancelling any pan in progress.
    pub fn look_at(&mut self, target: Vec2) {
        self.pan = None;
        self.center = target;
    }

    /// Ease the center toward `target` over `duration` seconds.
    ///
    /// A pan already in flight is kept unless `force` is set.
    /// A non-positive duration moves the camera immediately.
    pub fn pan_to(&mut self, target: Vec2, duration: f32, easing: Easing, force: bool) {
        if self.is_panning() && !force {
            return;
        }
        if duration <= 0.0 {
            self.look_at(target);
            return;
        }
        self.pan = Some(Tween::new(self.center, target, duration, easing));
    }

    /// Ease the zoom factor toward `zoom` over `duration` seconds.
    pub fn zoom_to(&mut self, zoom: f32, duration: f32, easing: Easing) {
        if duration <= 0.0 {
            self.zoom_effect = None;
            self.zoom = zoom;
            return;
        }
        self.zoom_effect = Some(Tween::new(self.zoom, zoom, duration, easing));
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    pub fn is_zooming(&self) -> bool {
        self.zoom_effect.is_some()
    }

    /// Destination of the running pan, or the current center.
    pub fn pan_target(&self) -> Vec2 {
        self.pan.as_ref().map(|p| p.to).unwrap_or(self.center)
    }

    pub fn zoom_target(&self) -> f32 {
        self.zoom_effect.as_ref().map(|z| z.to).unwrap_or(self.zoom)
    }

    /// Advance pan and zoom effects by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if let Some(pan) = &mut self.pan {
            self.center = pan.tick(dt);
            if pan.is_complete() {
                self.pan = None;
            }
        }
        if let Some(effect) = &mut self.zoom_effect {
            self.zoom = effect.tick(dt);
            if effect.is_complete() {
                self.zoom_effect = None;
            }
        }
    }

    /// Build an orthographic projection matrix.
    /// World top (smaller Y) maps to the top of clip space, Z in [0, 1].
    pub fn projection_matrix(&self) -> Mat4 {
        let view = self.world_view();
        Mat4::orthographic_rh(view.left, view.right, view.bottom, view.top, 0.0, 1.0)
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            projection: self.projection_matrix().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn world_view_scales_with_zoom() {
        let mut cam = Camera2D::new(400.0, 800.0);
        cam.zoom = 0.5;
        let view = cam.world_view();
        assert_eq!(view.width(), 800.0);
        assert_eq!(view.height(), 1600.0);
        assert_eq!(view.top, -800.0);
        assert_eq!(view.bottom, 800.0);
    }

    #[test]
    fn projection_keeps_y_down() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.look_at(Vec2::new(0.0, -200.0));
        let mat = cam.projection_matrix();
        let top = mat * Vec4::new(0.0, -250.0, 0.0, 1.0);
        let bottom = mat * Vec4::new(0.0, -150.0, 0.0, 1.0);
        assert!((top.y - 1.0).abs() < 1e-5, "top={:?}", top);
        assert!((bottom.y + 1.0).abs() < 1e-5, "bottom={:?}", bottom);
    }

    #[test]
    fn pan_reaches_target() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.pan_to(Vec2::new(0.0, -300.0), 0.3, Easing::CubicInOut, true);
        assert!(cam.is_panning());
        assert_eq!(cam.pan_target(), Vec2::new(0.0, -300.0));

        cam.update(0.15);
        assert!(cam.center.y < 0.0 && cam.center.y > -300.0);

        cam.update(0.2);
        assert_eq!(cam.center, Vec2::new(0.0, -300.0));
        assert!(!cam.is_panning());
    }

    #[test]
    fn unforced_pan_does_not_interrupt() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.pan_to(Vec2::new(0.0, -100.0), 1.0, Easing::Linear, false);
        cam.pan_to(Vec2::new(0.0, -500.0), 1.0, Easing::Linear, false);
        assert_eq!(cam.pan_target(), Vec2::new(0.0, -100.0));

        cam.pan_to(Vec2::new(0.0, -500.0), 1.0, Easing::Linear, true);
        assert_eq!(cam.pan_target(), Vec2::new(0.0, -500.0));
    }

    #[test]
    fn zero_duration_pan_is_instant() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.pan_to(Vec2::new(5.0, -50.0), 0.0, Easing::CubicInOut, true);
        assert_eq!(cam.center, Vec2::new(5.0, -50.0));
        assert!(!cam.is_panning());
    }

    #[test]
    fn target_view_uses_pending_effects() {
        let mut cam = Camera2D::new(100.0, 200.0);
        cam.zoom_to(0.5, 0.3, Easing::CubicInOut);
        cam.pan_to(Vec2::new(0.0, -1000.0), 0.3, Easing::CubicInOut, true);
        let view = cam.target_view();
        assert_eq!(view.center(), Vec2::new(0.0, -1000.0));
        assert_eq!(view.height(), 400.0);
        assert_eq!(cam.world_view().center(), Vec2::ZERO);
    }

    #[test]
    fn zoom_effect_completes() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.zoom_to(0.8, 0.3, Easing::CubicInOut);
        for _ in 0..30 {
            cam.update(1.0 / 60.0);
        }
        assert_eq!(cam.zoom, 0.8);
        assert!(!cam.is_zooming());
    }

    #[test]
    fn inset_containment() {
        let view = WorldView::from_center(Vec2::ZERO, 100.0, 100.0);
        assert!(view.contains_inset(Vec2::new(39.0, 0.0), 10.0));
        assert!(!view.contains_inset(Vec2::new(45.0, 0.0), 10.0));
        assert!(view.contains_inset(Vec2::new(45.0, 0.0), 0.0));
    }
}
