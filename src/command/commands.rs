use image::DynamicImage;

use crate::error::EditResult;
use crate::filters::{self, Filter};
use crate::geometry::PixelRect;
use crate::transform;

/// A committed edit to the session image.
///
/// Executing a command is a pure function from the current image to the
/// next one; the session records the result as one history entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Keep only the given pixel rectangle
    Crop(PixelRect),
    /// Rotate counter-clockwise by an arbitrary angle
    Rotate { degrees: f32, expand: bool },
    /// Quarter turn clockwise
    QuarterTurn,
    /// Mirror left to right
    Mirror,
    /// Flip top to bottom
    Flip,
    Resize { width: u32, height: u32 },
    Filter(Filter),
    /// Grey out everything that doesn't match the colour at (x, y)
    ColorPop { x: u32, y: u32, tolerance: u8 },
}

impl Command {
    /// Short human-readable name, used for logging and history events
    pub fn label(&self) -> &'static str {
        match self {
            Command::Crop(_) => "Crop",
            Command::Rotate { .. } => "Rotate",
            Command::QuarterTurn => "Transpose",
            Command::Mirror => "Mirror",
            Command::Flip => "Flip",
            Command::Resize { .. } => "Resize",
            Command::Filter(filter) => filter.label(),
            Command::ColorPop { .. } => "Colour Pop",
        }
    }

    /// Produce the edited image. The input is never modified.
    pub fn execute(&self, image: &DynamicImage) -> EditResult<DynamicImage> {
        match self {
            Command::Crop(rect) => transform::crop(image, *rect),
            Command::Rotate { degrees, expand } => Ok(transform::rotate(image, *degrees, *expand)),
            Command::QuarterTurn => Ok(transform::quarter_turn(image)),
            Command::Mirror => Ok(transform::mirror(image)),
            Command::Flip => Ok(transform::flip(image)),
            Command::Resize { width, height } => transform::resize(image, *width, *height),
            Command::Filter(filter) => Ok(filter.apply(image)),
            Command::ColorPop { x, y, tolerance } => filters::color_pop(image, (*x, *y), *tolerance),
        }
    }
}
