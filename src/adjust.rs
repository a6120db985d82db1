use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::filters::{Lut, map_luts, map_pixels};

/// The slider-driven colour adjustments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustmentKind {
    Brightness,
    Contrast,
    Saturation,
    /// Red channel balance
    Red,
    /// Green channel balance
    Green,
    /// Blue channel balance
    Blue,
}

impl AdjustmentKind {
    pub const ALL: [AdjustmentKind; 6] = [
        Self::Brightness,
        Self::Contrast,
        Self::Saturation,
        Self::Red,
        Self::Green,
        Self::Blue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Brightness => "Brightness",
            Self::Contrast => "Contrast",
            Self::Saturation => "Saturation",
            Self::Red => "R",
            Self::Green => "G",
            Self::Blue => "B",
        }
    }
}

/// A full set of adjustment values, each in `-100..=100` with 0 neutral.
///
/// Adjustments are always evaluated against the pristine original image, so
/// the result depends only on the slider positions and never on how often
/// they moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustments {
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
    pub red: i32,
    pub green: i32,
    pub blue: i32,
}

impl Adjustments {
    pub const MIN: i32 = -100;
    pub const MAX: i32 = 100;

    pub fn get(&self, kind: AdjustmentKind) -> i32 {
        match kind {
            AdjustmentKind::Brightness => self.brightness,
            AdjustmentKind::Contrast => self.contrast,
            AdjustmentKind::Saturation => self.saturation,
            AdjustmentKind::Red => self.red,
            AdjustmentKind::Green => self.green,
            AdjustmentKind::Blue => self.blue,
        }
    }

    /// Set one value, clamped to the slider range
    pub fn set(&mut self, kind: AdjustmentKind, value: i32) {
        let value = value.clamp(Self::MIN, Self::MAX);
        let slot = match kind {
            AdjustmentKind::Brightness => &mut self.brightness,
            AdjustmentKind::Contrast => &mut self.contrast,
            AdjustmentKind::Saturation => &mut self.saturation,
            AdjustmentKind::Red => &mut self.red,
            AdjustmentKind::Green => &mut self.green,
            AdjustmentKind::Blue => &mut self.blue,
        };
        *slot = value;
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// Channel lookup tables for everything except saturation
    fn channel_luts(&self) -> [Lut; 3] {
        let brightness = scale_lut(self.brightness);
        let contrast = contrast_lut(self.contrast);
        [self.red, self.green, self.blue].map(|balance| {
            brightness.then(&scale_lut(balance)).then(&contrast)
        })
    }

    /// Evaluate the adjustments against `original`
    pub fn apply(&self, original: &DynamicImage) -> DynamicImage {
        if self.is_neutral() {
            return original.clone();
        }

        let luts = self.channel_luts();
        if self.saturation == 0 {
            return map_luts(original, &luts);
        }

        let factor = 1.0 + self.saturation as f32 / 100.0;
        map_pixels(original, |[r, g, b]| {
            let [r, g, b] = [luts[0].get(r), luts[1].get(g), luts[2].get(b)];
            let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
            let mix = |c: u8| (luma + (c as f32 - luma) * factor).round().clamp(0.0, 255.0) as u8;
            [mix(r), mix(g), mix(b)]
        })
    }
}

// c + round(c * v / 100)
fn scale_lut(value: i32) -> Lut {
    let scale = value as f32 / 100.0;
    Lut::from_fn(|c| {
        let c = c as f32;
        (c + (c * scale).round()).clamp(0.0, 255.0) as u8
    })
}

fn contrast_lut(value: i32) -> Lut {
    let factor = 1.0 + value as f32 / 100.0;
    Lut::from_fn(|c| ((c as f32 - 128.0) * factor + 128.0).round().clamp(0.0, 255.0) as u8)
}
