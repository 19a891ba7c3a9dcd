//! Climber framing on top of the engine camera: start pose, continuous
//! follow and the re-center after each catch.

use glam::Vec2;
use swing_engine::{Camera2D, Easing, WorldView};

use crate::config::ClimberConfig;

#[derive(Debug, Clone)]
pub struct CameraTracker {
    view_inset: f32,
    follow_secs: f32,
    catch_secs: f32,
    catch_offset: f32,
    start_offset: f32,
    zoom_normal: f32,
    zoom_far: f32,
    zoom_secs: f32,
    zoom_out_on_release: bool,
}

impl CameraTracker {
    pub fn new(config: &ClimberConfig) -> Self {
        Self {
            view_inset: config.view_inset,
            follow_secs: config.follow_pan_secs,
            catch_secs: config.catch_pan_secs,
            catch_offset: config.catch_offset_fraction,
            start_offset: config.start_offset_fraction,
            zoom_normal: config.zoom_normal,
            zoom_far: config.zoom_far,
            zoom_secs: config.zoom_secs,
            zoom_out_on_release: config.zoom_out_on_release,
        }
    }

    /// Initial framing: snap to the start center and ease into the play zoom.
    pub fn start(&self, camera: &mut Camera2D) {
        self.frame_start(camera);
        camera.zoom_to(self.zoom_normal, self.zoom_secs, Easing::CubicInOut);
    }

    /// Snap back to the start center. Zoom is left alone.
    pub fn frame_start(&self, camera: &mut Camera2D) {
        camera.look_at(Vec2::new(0.0, -self.start_offset * camera.viewport_height));
    }

    /// Chase a torso that climbed out of the upper part of the view.
    /// Returns whether a pan was started.
    pub fn follow(&self, camera: &mut Camera2D, torso: Vec2) -> bool {
        let view = camera.world_view();
        if view.contains_inset(torso, self.view_inset) || view.center_y() <= torso.y {
            return false;
        }
        camera.pan_to(Vec2::new(0.0, torso.y), self.follow_secs, Easing::CubicInOut, true);
        true
    }

    /// Pan so the caught torso sits a little below center, and return the
    /// view the camera is heading for. The first catch of a run is instant.
    pub fn recenter_on_catch(&self, camera: &mut Camera2D, torso_y: f32, first: bool) -> WorldView {
        let target = Vec2::new(0.0, torso_y - self.catch_offset * camera.viewport_height);
        let secs = if first { 0.0 } else { self.catch_secs };
        camera.pan_to(target, secs, Easing::CubicInOut, true);
        if self.zoom_out_on_release && camera.zoom_target() != self.zoom_normal {
            camera.zoom_to(self.zoom_normal, self.zoom_secs, Easing::CubicInOut);
        }
        camera.target_view()
    }

    /// Pull back while airborne, when enabled.
    pub fn on_release(&self, camera: &mut Camera2D) {
        if self.zoom_out_on_release {
            camera.zoom_to(self.zoom_far, self.zoom_secs, Easing::CubicInOut);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera2D {
        Camera2D::new(400.0, 800.0)
    }

    #[test]
    fn start_frames_above_origin_and_zooms() {
        let tracker = CameraTracker::new(&ClimberConfig::default());
        let mut cam = camera();
        tracker.start(&mut cam);
        assert_eq!(cam.center, Vec2::new(0.0, -160.0));
        assert!(cam.is_zooming());
        assert_eq!(cam.zoom_target(), 0.8);

        for _ in 0..30 {
            cam.update(1.0 / 60.0);
        }
        assert!(!cam.is_zooming());
        assert!((cam.zoom - 0.8).abs() < 1e-5);
    }

    #[test]
    fn follow_ignores_torso_inside_view() {
        let tracker = CameraTracker::new(&ClimberConfig::default());
        let mut cam = camera();
        assert!(!tracker.follow(&mut cam, Vec2::new(-140.0, 0.0)));
        assert!(!cam.is_panning());
    }

    #[test]
    fn follow_ignores_torso_below_center() {
        let tracker = CameraTracker::new(&ClimberConfig::default());
        let mut cam = camera();
        // Outside the inset on the bottom edge, but below center.
        assert!(!tracker.follow(&mut cam, Vec2::new(0.0, 395.0)));
    }

    #[test]
    fn follow_pans_to_high_torso() {
        let tracker = CameraTracker::new(&ClimberConfig::default());
        let mut cam = camera();
        assert!(tracker.follow(&mut cam, Vec2::new(50.0, -395.0)));
        assert_eq!(cam.pan_target(), Vec2::new(0.0, -395.0));

        for _ in 0..10 {
            cam.update(1.0 / 60.0);
        }
        assert!(!cam.is_panning());
        assert!((cam.center.y + 395.0).abs() < 1e-3);
    }

    #[test]
    fn first_catch_recenter_is_instant() {
        let tracker = CameraTracker::new(&ClimberConfig::default());
        let mut cam = camera();
        let view = tracker.recenter_on_catch(&mut cam, 0.0, true);
        assert_eq!(cam.center, Vec2::new(0.0, -160.0));
        assert_eq!(view, cam.world_view());
    }

    #[test]
    fn later_catch_returns_target_view() {
        let tracker = CameraTracker::new(&ClimberConfig::default());
        let mut cam = camera();
        let view = tracker.recenter_on_catch(&mut cam, -500.0, false);
        assert!(cam.is_panning());
        assert_eq!(view.center(), Vec2::new(0.0, -660.0));
        assert_eq!(cam.center, Vec2::ZERO);
    }

    #[test]
    fn release_zoom_is_opt_in() {
        let mut cam = camera();
        let tracker = CameraTracker::new(&ClimberConfig::default());
        tracker.on_release(&mut cam);
        assert!(!cam.is_zooming());

        let config = ClimberConfig { zoom_out_on_release: true, ..ClimberConfig::default() };
        let tracker = CameraTracker::new(&config);
        tracker.on_release(&mut cam);
        assert_eq!(cam.zoom_target(), 0.5);
        tracker.recenter_on_catch(&mut cam, 0.0, false);
        assert_eq!(cam.zoom_target(), 0.8);
    }
}
