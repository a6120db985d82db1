use egui::{Pos2, Rect, Vec2};

use super::ImagePoint;

/// Maps between canvas space (points in the visible viewport, origin at its
/// top-left corner) and image space (pixels of the full-resolution image).
///
/// The image is fitted into the viewport without upscaling, multiplied by
/// the zoom factor, and centered. The mapper never clamps: points outside
/// the image map to coordinates outside `[0, width) x [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    image_size: Vec2,
    viewport: Vec2,
    scale: f32,
}

impl CoordinateMapper {
    /// Build a mapper for the given image and viewport.
    ///
    /// Returns `None` while the viewport has not been laid out (zero or
    /// non-finite size), for an empty image, or for a non-positive zoom.
    /// Callers should retry on a later frame instead of mapping against a
    /// degenerate viewport.
    pub fn new(image_width: u32, image_height: u32, viewport: Vec2, zoom: f32) -> Option<Self> {
        let viewport_ready = viewport.x.is_finite()
            && viewport.y.is_finite()
            && viewport.x > 0.0
            && viewport.y > 0.0;
        if !viewport_ready || image_width == 0 || image_height == 0 {
            return None;
        }
        if !(zoom.is_finite() && zoom > 0.0) {
            return None;
        }

        let image_size = Vec2::new(image_width as f32, image_height as f32);
        let fit = (viewport.x / image_size.x)
            .min(viewport.y / image_size.y)
            .min(1.0);

        Some(Self {
            image_size,
            viewport,
            scale: fit * zoom,
        })
    }

    /// Canvas pixels per image pixel
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn image_size(&self) -> Vec2 {
        self.image_size
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Top-left corner of the image on the canvas
    pub fn image_origin(&self) -> Pos2 {
        ((self.viewport - self.image_size * self.scale) / 2.0).to_pos2()
    }

    /// Area of the canvas covered by the image
    pub fn image_rect(&self) -> Rect {
        Rect::from_min_size(self.image_origin(), self.image_size * self.scale)
    }

    fn viewport_center(&self) -> Pos2 {
        (self.viewport / 2.0).to_pos2()
    }

    /// Map a canvas point into image space without rounding
    pub fn canvas_to_image_f(&self, pos: Pos2) -> Pos2 {
        ((pos - self.viewport_center()) / self.scale + self.image_size / 2.0).to_pos2()
    }

    /// Map a canvas point to the nearest image pixel
    pub fn canvas_to_image(&self, pos: Pos2) -> ImagePoint {
        let p = self.canvas_to_image_f(pos);
        ImagePoint::new(p.x.round() as i64, p.y.round() as i64)
    }

    /// Map an image pixel back onto the canvas
    pub fn image_to_canvas(&self, point: ImagePoint) -> Pos2 {
        let p = Vec2::new(point.x as f32, point.y as f32);
        self.viewport_center() + (p - self.image_size / 2.0) * self.scale
    }
}
