//! Whole-image colour filters.
//!
//! Point-wise filters are expressed as per-channel lookup tables or a single
//! closure over the pixel buffer, so each filter is one pass over the raw
//! bytes. Alpha is left untouched.

use image::{DynamicImage, GenericImageView};

use crate::error::{EditError, EditResult};

/// A 256-entry table mapping one channel value to another
#[derive(Clone)]
pub struct Lut([u8; 256]);

impl Lut {
    pub fn from_fn(f: impl Fn(u8) -> u8) -> Self {
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = f(i as u8);
        }
        Self(table)
    }

    /// Table applying `self` and then `next`
    pub fn then(&self, next: &Lut) -> Self {
        Self::from_fn(|v| next.get(self.get(v)))
    }

    #[inline]
    pub fn get(&self, value: u8) -> u8 {
        self.0[value as usize]
    }
}

impl std::fmt::Debug for Lut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lut").finish_non_exhaustive()
    }
}

/// Apply `f` to the colour channels of every pixel.
///
/// Images with alpha come back as RGBA8, everything else as RGB8.
pub fn map_pixels(image: &DynamicImage, f: impl Fn([u8; 3]) -> [u8; 3]) -> DynamicImage {
    if image.color().has_alpha() {
        let mut buf = image.to_rgba8();
        for px in buf.chunks_exact_mut(4) {
            let [r, g, b] = f([px[0], px[1], px[2]]);
            px[0] = r;
            px[1] = g;
            px[2] = b;
        }
        DynamicImage::ImageRgba8(buf)
    } else {
        let mut buf = image.to_rgb8();
        for px in buf.chunks_exact_mut(3) {
            let [r, g, b] = f([px[0], px[1], px[2]]);
            px[0] = r;
            px[1] = g;
            px[2] = b;
        }
        DynamicImage::ImageRgb8(buf)
    }
}

/// Apply one lookup table per colour channel
pub fn map_luts(image: &DynamicImage, luts: &[Lut; 3]) -> DynamicImage {
    map_pixels(image, |[r, g, b]| [luts[0].get(r), luts[1].get(g), luts[2].get(b)])
}

#[inline]
fn channel_mean(r: u8, g: u8, b: u8) -> u8 {
    ((r as f32 + g as f32 + b as f32) / 3.0).round() as u8
}

fn posterize_level(v: u8) -> u8 {
    match v {
        0..32 => 0,
        32..96 => 64,
        96..160 => 128,
        160..224 => 192,
        _ => 255,
    }
}

const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];
const EMBOSS_KERNEL: [f32; 9] = [-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0];

/// Filters available from the Filter menu
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// Replace each channel by the mean of the three
    Grayscale,
    /// Grey mean tinted warm
    Sepia,
    Invert,
    /// Invert every channel value at or above the threshold
    Solarize { threshold: u8 },
    /// Quantise every channel to five levels
    Posterize,
    Blur { sigma: f32 },
    Sharpen,
    Emboss,
}

impl Filter {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Grayscale => "Black and White",
            Self::Sepia => "Sepia",
            Self::Invert => "Invert",
            Self::Solarize { .. } => "Solarize",
            Self::Posterize => "Posterize",
            Self::Blur { .. } => "Blur",
            Self::Sharpen => "Sharpen",
            Self::Emboss => "Emboss",
        }
    }

    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        match *self {
            Self::Grayscale => map_pixels(image, |[r, g, b]| {
                let avg = channel_mean(r, g, b);
                [avg, avg, avg]
            }),
            Self::Sepia => map_pixels(image, |[r, g, b]| {
                let avg = channel_mean(r, g, b);
                [avg.saturating_add(100), avg.saturating_add(50), avg]
            }),
            Self::Invert => {
                let lut = Lut::from_fn(|v| 255 - v);
                map_luts(image, &[lut.clone(), lut.clone(), lut])
            }
            Self::Solarize { threshold } => {
                let lut = Lut::from_fn(|v| if v >= threshold { 255 - v } else { v });
                map_luts(image, &[lut.clone(), lut.clone(), lut])
            }
            Self::Posterize => {
                let lut = Lut::from_fn(posterize_level);
                map_luts(image, &[lut.clone(), lut.clone(), lut])
            }
            Self::Blur { sigma } => image.blur(sigma.max(0.1)),
            Self::Sharpen => image.filter3x3(&SHARPEN_KERNEL),
            Self::Emboss => image.filter3x3(&EMBOSS_KERNEL),
        }
    }
}

/// Keep the colour of pixels close to the one at `seed` and turn every other
/// pixel grey.
///
/// A pixel keeps its colour when each of its channels is within `tolerance`
/// of the seed pixel's channel.
pub fn color_pop(image: &DynamicImage, seed: (u32, u32), tolerance: u8) -> EditResult<DynamicImage> {
    let (x, y) = seed;
    if !image.in_bounds(x, y) {
        return Err(EditError::PointOutsideImage {
            x: x as i64,
            y: y as i64,
        });
    }
    let picked = image.get_pixel(x, y);
    let [pr, pg, pb] = [picked[0], picked[1], picked[2]];
    let tolerance = tolerance as i16;
    let close = |a: u8, b: u8| (a as i16 - b as i16).abs() <= tolerance;

    Ok(map_pixels(image, |[r, g, b]| {
        if close(r, pr) && close(g, pg) && close(b, pb) {
            [r, g, b]
        } else {
            let avg = channel_mean(r, g, b);
            [avg, avg, avg]
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn rgb(pixels: &[[u8; 3]]) -> DynamicImage {
        let mut buf = RgbImage::new(pixels.len() as u32, 1);
        for (x, p) in pixels.iter().enumerate() {
            buf.put_pixel(x as u32, 0, Rgb(*p));
        }
        DynamicImage::ImageRgb8(buf)
    }

    fn pixel(image: &DynamicImage, x: u32) -> [u8; 3] {
        let p = image.to_rgb8().get_pixel(x, 0).0;
        [p[0], p[1], p[2]]
    }

    #[test]
    fn test_grayscale_uses_channel_mean() {
        let out = Filter::Grayscale.apply(&rgb(&[[30, 60, 91]]));
        assert_eq!(pixel(&out, 0), [60, 60, 60]);
    }

    #[test]
    fn test_sepia_saturates() {
        let out = Filter::Sepia.apply(&rgb(&[[10, 10, 10], [200, 200, 200]]));
        assert_eq!(pixel(&out, 0), [110, 60, 10]);
        assert_eq!(pixel(&out, 1), [255, 250, 200]);
    }

    #[test]
    fn test_posterize_bands() {
        let out = Filter::Posterize.apply(&rgb(&[[0, 31, 32], [95, 96, 159], [160, 223, 224]]));
        assert_eq!(pixel(&out, 0), [0, 0, 64]);
        assert_eq!(pixel(&out, 1), [64, 128, 128]);
        assert_eq!(pixel(&out, 2), [192, 192, 255]);
    }

    #[test]
    fn test_solarize_threshold() {
        let out = Filter::Solarize { threshold: 128 }.apply(&rgb(&[[127, 128, 255]]));
        assert_eq!(pixel(&out, 0), [127, 127, 0]);
    }

    #[test]
    fn test_invert_keeps_alpha() {
        let buf = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 77]));
        let out = Filter::Invert.apply(&DynamicImage::ImageRgba8(buf));
        let p = out.to_rgba8().get_pixel(1, 1).0;
        assert_eq!(p, [245, 235, 225, 77]);
    }

    #[test]
    fn test_lut_composition() {
        let double = Lut::from_fn(|v| v.saturating_mul(2));
        let plus_one = Lut::from_fn(|v| v.saturating_add(1));
        let both = double.then(&plus_one);
        assert_eq!(both.get(10), 21);
        assert_eq!(both.get(200), 255);
    }

    #[test]
    fn test_color_pop_keeps_similar_colours() {
        let image = rgb(&[[200, 20, 20], [210, 30, 10], [20, 20, 200]]);
        let out = color_pop(&image, (0, 0), 60).unwrap();
        assert_eq!(pixel(&out, 0), [200, 20, 20]);
        assert_eq!(pixel(&out, 1), [210, 30, 10]);
        assert_eq!(pixel(&out, 2), [80, 80, 80]);
    }

    #[test]
    fn test_color_pop_rejects_seed_outside() {
        let image = rgb(&[[0, 0, 0]]);
        assert!(color_pop(&image, (5, 0), 60).is_err());
    }
}
