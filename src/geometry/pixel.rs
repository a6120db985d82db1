use serde::{Deserialize, Serialize};

/// A point in image space, in whole pixels.
///
/// May lie outside the image; use [`ImagePoint::clamped`] before touching
/// pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImagePoint {
    pub x: i64,
    pub y: i64,
}

impl ImagePoint {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Whether the point addresses a pixel of a `width` x `height` image
    pub fn is_inside(&self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < width as i64 && self.y < height as i64
    }

    /// Clamp into `[0, width) x [0, height)`. Returns `None` for an empty image.
    pub fn clamped(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        if width == 0 || height == 0 {
            return None;
        }
        let x = self.x.clamp(0, width as i64 - 1) as u32;
        let y = self.y.clamp(0, height as i64 - 1) as u32;
        Some((x, y))
    }
}

/// An axis-aligned rectangle of image pixels with non-zero area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Build the rectangle spanned by two image-space corners, clamped to a
    /// `width` x `height` image.
    ///
    /// The corners may be given in any order. Corner coordinates are treated
    /// as pixel edges, so the far edge may equal the image size. Returns
    /// `None` when the clamped rectangle has zero width or height.
    pub fn from_corners(a: ImagePoint, b: ImagePoint, width: u32, height: u32) -> Option<Self> {
        let clamp_x = |v: i64| v.clamp(0, width as i64) as u32;
        let clamp_y = |v: i64| v.clamp(0, height as i64) as u32;

        let x0 = clamp_x(a.x.min(b.x));
        let x1 = clamp_x(a.x.max(b.x));
        let y0 = clamp_y(a.y.min(b.y));
        let y1 = clamp_y(a.y.max(b.y));

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    /// Whether the rectangle lies fully inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_in_any_order() {
        let rect = PixelRect::from_corners(ImagePoint::new(40, 30), ImagePoint::new(10, 5), 100, 100)
            .unwrap();
        assert_eq!(
            rect,
            PixelRect {
                x: 10,
                y: 5,
                width: 30,
                height: 25
            }
        );
    }

    #[test]
    fn test_corners_clamped_to_image() {
        let rect = PixelRect::from_corners(ImagePoint::new(-20, -20), ImagePoint::new(500, 50), 100, 80)
            .unwrap();
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (0, 0, 100, 50));
        assert!(rect.fits_within(100, 80));
    }

    #[test]
    fn test_degenerate_rect_is_rejected() {
        assert!(PixelRect::from_corners(ImagePoint::new(10, 10), ImagePoint::new(10, 40), 100, 100).is_none());
        // Entirely outside the image collapses to nothing.
        assert!(PixelRect::from_corners(ImagePoint::new(150, 10), ImagePoint::new(200, 40), 100, 100).is_none());
    }

    #[test]
    fn test_point_clamping() {
        assert_eq!(ImagePoint::new(-5, 200).clamped(100, 50), Some((0, 49)));
        assert_eq!(ImagePoint::new(3, 3).clamped(0, 50), None);
        assert!(!ImagePoint::new(100, 0).is_inside(100, 50));
    }
}
