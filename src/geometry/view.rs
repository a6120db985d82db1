use egui::Vec2;
use serde::{Deserialize, Serialize};

use super::CoordinateMapper;
use crate::config::EditorConfig;

/// Zoom and viewport state of the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    zoom_factor: f32,
    min_zoom: f32,
    max_zoom: f32,
    zoom_step: f32,
    // Unknown until the canvas has been laid out at least once
    #[serde(skip)]
    viewport: Option<Vec2>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl ViewState {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            zoom_factor: 1.0_f32.clamp(config.min_zoom, config.max_zoom),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
            viewport: None,
        }
    }

    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    /// Set the zoom factor, clamped to the configured range
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom_factor = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom_factor * self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom_factor / self.zoom_step);
    }

    pub fn reset_zoom(&mut self) {
        self.set_zoom(1.0);
    }

    /// Record the current size of the canvas widget
    pub fn set_viewport(&mut self, size: Vec2) {
        self.viewport = Some(size);
    }

    pub fn viewport(&self) -> Option<Vec2> {
        self.viewport
    }

    /// Build a mapper for an image of the given size, if the viewport is known
    pub fn mapper(&self, image_width: u32, image_height: u32) -> Option<CoordinateMapper> {
        let viewport = self.viewport?;
        CoordinateMapper::new(image_width, image_height, viewport, self.zoom_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_is_clamped() {
        let mut view = ViewState::default();
        assert_eq!(view.zoom_factor(), 1.0);

        for _ in 0..50 {
            view.zoom_in();
        }
        assert_eq!(view.zoom_factor(), 5.0);

        for _ in 0..100 {
            view.zoom_out();
        }
        assert_eq!(view.zoom_factor(), 0.1);

        view.set_zoom(f32::NAN);
        assert_eq!(view.zoom_factor(), 0.1);

        view.reset_zoom();
        assert_eq!(view.zoom_factor(), 1.0);
    }

    #[test]
    fn test_mapper_waits_for_viewport() {
        let mut view = ViewState::default();
        assert!(view.mapper(100, 100).is_none());

        view.set_viewport(Vec2::new(400.0, 300.0));
        let mapper = view.mapper(100, 100).unwrap();
        assert_eq!(mapper.scale(), 1.0);
    }
}
