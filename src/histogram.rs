use image::DynamicImage;

/// Per-channel value counts of an image
#[derive(Clone, PartialEq, Eq)]
pub struct Histogram {
    pub red: [u32; 256],
    pub green: [u32; 256],
    pub blue: [u32; 256],
}

impl Histogram {
    pub fn from_image(image: &DynamicImage) -> Self {
        let mut hist = Self {
            red: [0; 256],
            green: [0; 256],
            blue: [0; 256],
        };
        let rgb = image.to_rgb8();
        for px in rgb.chunks_exact(3) {
            hist.red[px[0] as usize] += 1;
            hist.green[px[1] as usize] += 1;
            hist.blue[px[2] as usize] += 1;
        }
        hist
    }

    /// Largest bin over all channels, for normalising a plot
    pub fn max_count(&self) -> u32 {
        self.red
            .iter()
            .chain(&self.green)
            .chain(&self.blue)
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Total number of pixels counted
    pub fn total(&self) -> u64 {
        self.red.iter().map(|&c| c as u64).sum()
    }
}

impl std::fmt::Debug for Histogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Histogram")
            .field("total", &self.total())
            .field("max_count", &self.max_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_counts_every_pixel_once_per_channel() {
        let mut buf = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        buf.put_pixel(0, 0, Rgb([255, 20, 0]));
        let hist = Histogram::from_image(&DynamicImage::ImageRgb8(buf));

        assert_eq!(hist.total(), 6);
        assert_eq!(hist.red[10], 5);
        assert_eq!(hist.red[255], 1);
        assert_eq!(hist.green[20], 6);
        assert_eq!(hist.blue[0], 1);
        assert_eq!(hist.max_count(), 6);
    }
}
