mod mapper;
mod pixel;
mod view;

pub use mapper::CoordinateMapper;
pub use pixel::{ImagePoint, PixelRect};
pub use view::ViewState;
