use crate::histogram::Histogram;

mod central_panel;
mod dialogs;
mod menu_bar;
mod tools_panel;

pub use central_panel::central_panel;
pub use dialogs::dialogs;
pub use menu_bar::{menu_bar, status_bar};
pub use tools_panel::tools_panel;

/// Values being edited in the "New Image" window
#[derive(Debug, Clone, PartialEq)]
pub struct NewImageForm {
    pub width: i64,
    pub height: i64,
    pub fill_index: usize,
}

impl Default for NewImageForm {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            // White
            fill_index: 10,
        }
    }
}

/// Values being edited in the "Resize" window
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeForm {
    pub width: u32,
    pub height: u32,
    pub keep_aspect: bool,
}

/// Which auxiliary windows are open, and their unsaved inputs
#[derive(Debug, Default)]
pub struct PanelState {
    pub new_image: Option<NewImageForm>,
    pub resize: Option<ResizeForm>,
    /// Threshold of the solarize window, while it is open
    pub solarize: Option<u8>,
    pub show_histogram: bool,
    /// Histogram of the session revision it was computed for
    pub histogram: Option<(u64, Histogram)>,
    /// Last error message, shown until dismissed
    pub notification: Option<String>,
}
