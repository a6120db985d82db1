use egui::Color32;
use image::{DynamicImage, Rgba, RgbaImage};

use crate::geometry::ImagePoint;

/// Named colours offered by the draw tool
pub const PALETTE: [(&str, Color32); 12] = [
    ("Red", Color32::from_rgb(255, 0, 0)),
    ("Blue", Color32::from_rgb(0, 0, 255)),
    ("Green", Color32::from_rgb(0, 128, 0)),
    ("Magenta", Color32::from_rgb(255, 0, 255)),
    ("Cyan", Color32::from_rgb(0, 255, 255)),
    ("Yellow", Color32::from_rgb(255, 255, 0)),
    ("Orange", Color32::from_rgb(255, 165, 0)),
    ("Purple", Color32::from_rgb(128, 0, 128)),
    ("Brown", Color32::from_rgb(165, 42, 42)),
    ("Black", Color32::from_rgb(0, 0, 0)),
    ("White", Color32::from_rgb(255, 255, 255)),
    ("Gray", Color32::from_rgb(128, 128, 128)),
];

/// Round brush used for freehand strokes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: Color32,
    /// Radius in image pixels; 0 paints single pixels
    pub radius: u32,
}

impl Brush {
    pub fn new(color: Color32, radius: u32) -> Self {
        Self { color, radius }
    }

    fn rgba(&self) -> Rgba<u8> {
        Rgba(self.color.to_srgba_unmultiplied())
    }
}

// Drawing needs direct buffer access; anything that isn't RGB8/RGBA8 is
// converted to RGBA8 first.
fn ensure_drawable(image: &mut DynamicImage) {
    if !matches!(image, DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)) {
        *image = DynamicImage::ImageRgba8(image.to_rgba8());
    }
}

fn stamp(image: &mut DynamicImage, center: ImagePoint, brush: &Brush) {
    let r = brush.radius as i64;
    let (width, height) = (image.width() as i64, image.height() as i64);
    let color = brush.rgba();

    let x_range = (center.x - r).max(0)..=(center.x + r).min(width - 1);
    let y_range = (center.y - r).max(0)..=(center.y + r).min(height - 1);

    for y in y_range {
        for x in x_range.clone() {
            let (dx, dy) = (x - center.x, y - center.y);
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let (x, y) = (x as u32, y as u32);
            match image {
                DynamicImage::ImageRgba8(buf) => buf.put_pixel(x, y, color),
                DynamicImage::ImageRgb8(buf) => {
                    buf.put_pixel(x, y, image::Rgb([color[0], color[1], color[2]]))
                }
                _ => {}
            }
        }
    }
}

/// Paint a single dot. Parts outside the image are clipped.
pub fn draw_dot(image: &mut DynamicImage, center: ImagePoint, brush: &Brush) {
    ensure_drawable(image);
    stamp(image, center, brush);
}

/// Paint a continuous line of dots from `from` to `to` (both inclusive).
pub fn draw_segment(image: &mut DynamicImage, from: ImagePoint, to: ImagePoint, brush: &Brush) {
    ensure_drawable(image);

    let (dx, dy) = ((to.x - from.x) as f64, (to.y - from.y) as f64);
    let length = dx.hypot(dy);
    // Step at most one pixel so thin brushes leave no gaps.
    let steps = length.ceil().max(1.0) as i64;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let point = ImagePoint::new(
            (from.x as f64 + dx * t).round() as i64,
            (from.y as f64 + dy * t).round() as i64,
        );
        stamp(image, point, brush);
    }
}

/// A blank image of `width` x `height` filled with `fill`
pub fn blank(width: u32, height: u32, fill: Color32) -> DynamicImage {
    let rgba = Rgba(fill.to_srgba_unmultiplied());
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, rgba))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, GrayImage};

    #[test]
    fn test_dot_is_clipped_at_edges() {
        let mut image = blank(10, 10, Color32::WHITE);
        draw_dot(&mut image, ImagePoint::new(0, 0), &Brush::new(Color32::BLACK, 3));
        assert_eq!(image.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(image.get_pixel(3, 0), Rgba([0, 0, 0, 255]));
        // Outside the radius.
        assert_eq!(image.get_pixel(3, 3), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_segment_has_no_gaps() {
        let mut image = blank(20, 5, Color32::WHITE);
        draw_segment(
            &mut image,
            ImagePoint::new(0, 2),
            ImagePoint::new(19, 2),
            &Brush::new(Color32::RED, 0),
        );
        for x in 0..20 {
            assert_eq!(image.get_pixel(x, 2), Rgba([255, 0, 0, 255]));
        }
        assert_eq!(image.get_pixel(5, 1), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_segment_entirely_outside_is_harmless() {
        let mut image = blank(5, 5, Color32::WHITE);
        let before = image.clone();
        draw_segment(
            &mut image,
            ImagePoint::new(-50, -50),
            ImagePoint::new(-10, -40),
            &Brush::new(Color32::BLACK, 2),
        );
        assert_eq!(image, before);
    }

    #[test]
    fn test_grey_image_is_promoted() {
        let mut image = DynamicImage::ImageLuma8(GrayImage::new(4, 4));
        draw_dot(&mut image, ImagePoint::new(1, 1), &Brush::new(Color32::RED, 0));
        assert!(matches!(image, DynamicImage::ImageRgba8(_)));
        assert_eq!(image.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
    }
}
