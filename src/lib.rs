#![warn(clippy::all, rust_2018_idioms)]

pub mod adjust;
pub mod app;
pub mod command;
pub mod config;
pub mod dialog;
pub mod editor;
pub mod error;
pub mod event;
pub mod file_handler;
pub mod filters;
pub mod geometry;
pub mod histogram;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod session;
pub mod stroke;
pub mod tools;
pub mod transform;

pub use adjust::{AdjustmentKind, Adjustments};
pub use app::PhotoApp;
pub use command::{Command, EditHistory};
pub use config::EditorConfig;
pub use dialog::SliderDialog;
pub use editor::Editor;
pub use error::{EditError, EditResult};
pub use filters::Filter;
pub use geometry::{CoordinateMapper, ImagePoint, PixelRect, ViewState};
pub use input::{InputEvent, InputLocation};
pub use renderer::Renderer;
pub use session::ImageSession;
pub use tools::{Tool, ToolKind, ToolType};
