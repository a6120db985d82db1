use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};

use crate::error::{EditError, EditResult};
use crate::geometry::PixelRect;

/// Cut `rect` out of the image
pub fn crop(image: &DynamicImage, rect: PixelRect) -> EditResult<DynamicImage> {
    if !rect.fits_within(image.width(), image.height()) {
        return Err(EditError::InvalidCropArea);
    }
    Ok(image.crop_imm(rect.x, rect.y, rect.width, rect.height))
}

/// Rotate counter-clockwise by `degrees`.
///
/// With `expand` the canvas grows to hold the whole rotated image, otherwise
/// the original dimensions are kept and the corners are cut off. Uncovered
/// areas are transparent.
pub fn rotate(image: &DynamicImage, degrees: f32, expand: bool) -> DynamicImage {
    let degrees = degrees.rem_euclid(360.0);
    if degrees == 0.0 {
        return image.clone();
    }
    if degrees == 180.0 {
        return image.rotate180();
    }
    if expand {
        // Quarter turns are exact with the library's own rotations.
        if degrees == 90.0 {
            return image.rotate270();
        }
        if degrees == 270.0 {
            return image.rotate90();
        }
    }

    let src = image.to_rgba8();
    let (w, h) = (src.width() as f32, src.height() as f32);
    let (sin, cos) = degrees.to_radians().sin_cos();

    let (out_w, out_h) = if expand {
        // Shave off float noise so exact fits don't gain a pixel.
        let bw = (w * cos.abs() + h * sin.abs() - 1e-3).ceil().max(1.0);
        let bh = (w * sin.abs() + h * cos.abs() - 1e-3).ceil().max(1.0);
        (bw as u32, bh as u32)
    } else {
        (src.width(), src.height())
    };

    let (src_cx, src_cy) = (w / 2.0, h / 2.0);
    let (dst_cx, dst_cy) = (out_w as f32 / 2.0, out_h as f32 / 2.0);

    let mut dst = RgbaImage::new(out_w, out_h);
    for (dx, dy, px) in dst.enumerate_pixels_mut() {
        // Inverse rotation of the destination pixel center back into the source.
        let u = dx as f32 + 0.5 - dst_cx;
        let v = dy as f32 + 0.5 - dst_cy;
        let sx = u * cos - v * sin + src_cx - 0.5;
        let sy = u * sin + v * cos + src_cy - 0.5;
        *px = bilinear_sample(&src, sx, sy);
    }
    DynamicImage::ImageRgba8(dst)
}

/// Bilinear interpolation sampling from an RgbaImage; outside is transparent.
fn bilinear_sample(img: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let sample = |sx: i64, sy: i64| -> [f32; 4] {
        if sx < 0 || sy < 0 || sx >= img.width() as i64 || sy >= img.height() as i64 {
            [0.0; 4]
        } else {
            let p = img.get_pixel(sx as u32, sy as u32);
            [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
        }
    };

    let tl = sample(x0, y0);
    let tr = sample(x0 + 1, y0);
    let bl = sample(x0, y0 + 1);
    let br = sample(x0 + 1, y0 + 1);

    let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = lerp(tl[c], tr[c], fx);
        let bot = lerp(bl[c], br[c], fx);
        out[c] = lerp(top, bot, fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

/// Rotate a quarter turn clockwise (width and height swap)
pub fn quarter_turn(image: &DynamicImage) -> DynamicImage {
    image.rotate90()
}

/// Mirror left to right
pub fn mirror(image: &DynamicImage) -> DynamicImage {
    image.fliph()
}

/// Flip top to bottom
pub fn flip(image: &DynamicImage) -> DynamicImage {
    image.flipv()
}

/// Resample to exactly `width` x `height`
pub fn resize(image: &DynamicImage, width: u32, height: u32) -> EditResult<DynamicImage> {
    if width == 0 || height == 0 {
        return Err(EditError::InvalidDimensions {
            width: width as i64,
            height: height as i64,
        });
    }
    Ok(image.resize_exact(width, height, FilterType::Lanczos3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    // 4x2 image with a red left column
    fn marked() -> DynamicImage {
        let mut buf = RgbImage::from_pixel(4, 2, Rgb([0, 0, 255]));
        buf.put_pixel(0, 0, Rgb([255, 0, 0]));
        buf.put_pixel(0, 1, Rgb([255, 0, 0]));
        DynamicImage::ImageRgb8(buf)
    }

    #[test]
    fn test_crop_bounds() {
        let image = marked();
        let rect = PixelRect {
            x: 1,
            y: 0,
            width: 3,
            height: 2,
        };
        let cropped = crop(&image, rect).unwrap();
        assert_eq!(cropped.dimensions(), (3, 2));
        assert_eq!(cropped.get_pixel(0, 0)[2], 255);

        let too_big = PixelRect {
            x: 2,
            y: 0,
            width: 3,
            height: 2,
        };
        assert!(matches!(crop(&image, too_big), Err(EditError::InvalidCropArea)));
    }

    #[test]
    fn test_rotate_expand_swaps_dimensions() {
        let image = marked();
        let rotated = rotate(&image, 90.0, true);
        assert_eq!(rotated.dimensions(), (2, 4));
        // Counter-clockwise: the left column becomes the bottom row.
        assert_eq!(rotated.get_pixel(0, 3)[0], 255);
        assert_eq!(rotated.get_pixel(1, 3)[0], 255);
    }

    #[test]
    fn test_rotate_without_expand_keeps_size() {
        let image = marked();
        assert_eq!(rotate(&image, 30.0, false).dimensions(), (4, 2));
        assert_eq!(rotate(&image, 360.0, false).dimensions(), (4, 2));
    }

    #[test]
    fn test_rotate_expand_grows_canvas() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(100, 100));
        let rotated = rotate(&image, 45.0, true);
        assert_eq!(rotated.dimensions(), (142, 142));
    }

    #[test]
    fn test_quarter_turn_is_clockwise() {
        let turned = quarter_turn(&marked());
        assert_eq!(turned.dimensions(), (2, 4));
        // Clockwise: the left column becomes the top row.
        assert_eq!(turned.get_pixel(0, 0)[0], 255);
        assert_eq!(turned.get_pixel(1, 0)[0], 255);
    }

    #[test]
    fn test_resize_rejects_zero() {
        assert!(resize(&marked(), 0, 10).is_err());
        assert_eq!(resize(&marked(), 8, 4).unwrap().dimensions(), (8, 4));
    }
}
