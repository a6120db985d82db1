use egui::{Key, Pos2, Rect};

use crate::config::EditorConfig;
use crate::error::{EditError, EditResult};
use crate::geometry::{CoordinateMapper, ViewState};
use crate::session::ImageSession;

/// Tool trait defines the interface for all canvas tools.
///
/// Positions handed to the pointer callbacks are in canvas space (relative
/// to the top-left of the canvas widget). Tools map them to image pixels
/// themselves, through the [`CoordinateMapper`] of the current view.
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Called when the tool is selected (activated).
    fn activate(&mut self, _session: &mut ImageSession) {
        // default: do nothing
    }

    /// Called when the tool is deselected (deactivated).
    /// Must leave the session without previews or half-finished gestures.
    fn deactivate(&mut self, session: &mut ImageSession);

    /// Handle pointer press on the canvas
    fn on_pointer_down(&mut self, pos: Pos2, session: &mut ImageSession, view: &ViewState) -> EditResult<()>;

    /// Handle pointer drag (movement) while the primary button is held down
    fn on_pointer_move(&mut self, pos: Pos2, session: &mut ImageSession, view: &ViewState) -> EditResult<()>;

    /// Handle pointer release
    fn on_pointer_up(&mut self, pos: Pos2, session: &mut ImageSession, view: &ViewState) -> EditResult<()>;

    /// Finish a pending action (Enter)
    fn confirm(&mut self, _session: &mut ImageSession, _view: &ViewState) -> EditResult<()> {
        Ok(())
    }

    /// Abandon a pending action (Escape)
    fn cancel(&mut self, _session: &mut ImageSession) {}

    /// Canvas-space rectangle to outline on top of the image, if any
    fn overlay_rect(&self) -> Option<Rect> {
        None
    }

    /// Name of the current state, for debugging and the status bar
    fn current_state_name(&self) -> &'static str;
}

/// Mapper for the image currently on screen.
///
/// `Ok(None)` means there is no image, so the caller has nothing to do.
/// A missing viewport is reported as [`EditError::ViewportPending`].
pub(crate) fn mapper_for(session: &ImageSession, view: &ViewState) -> EditResult<Option<CoordinateMapper>> {
    let Some((width, height)) = session.dimensions() else {
        return Ok(None);
    };
    view.mapper(width, height).map(Some).ok_or(EditError::ViewportPending)
}

// Tool implementations
mod color_pop_tool;
mod crop_tool;
mod draw_tool;
mod rotate_tool;

pub use color_pop_tool::ColorPopTool;
pub use crop_tool::{CropState, CropTool};
pub use draw_tool::{DrawState, DrawTool};
pub use rotate_tool::RotateTool;

/// Tool selectors shown in the tools panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Crop,
    Draw,
    Rotate,
    ColorPop,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [ToolKind::Crop, ToolKind::Draw, ToolKind::Rotate, ToolKind::ColorPop];

    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Crop => "Crop",
            ToolKind::Draw => "Draw",
            ToolKind::Rotate => "Rotate",
            ToolKind::ColorPop => "Colour Pop",
        }
    }

    /// Keyboard shortcut that selects this tool
    pub fn shortcut(&self) -> Key {
        match self {
            ToolKind::Crop => Key::C,
            ToolKind::Draw => Key::D,
            ToolKind::Rotate => Key::R,
            ToolKind::ColorPop => Key::P,
        }
    }
}

/// Enum representing all available tool types.
/// This allows us to avoid using Box<dyn Tool> and gives the UI typed
/// access to per-tool settings.
#[derive(Debug, Clone)]
pub enum ToolType {
    Crop(CropTool),
    Draw(DrawTool),
    Rotate(RotateTool),
    ColorPop(ColorPopTool),
}

impl ToolType {
    /// Fresh tool of the given kind, configured from the editor config
    pub fn new(kind: ToolKind, config: &EditorConfig) -> Self {
        match kind {
            ToolKind::Crop => Self::Crop(CropTool::new()),
            ToolKind::Draw => Self::Draw(DrawTool::new(config.brush_radius)),
            ToolKind::Rotate => Self::Rotate(RotateTool::new()),
            ToolKind::ColorPop => Self::ColorPop(ColorPopTool::new(config.color_pop_tolerance)),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::Crop(_) => ToolKind::Crop,
            Self::Draw(_) => ToolKind::Draw,
            Self::Rotate(_) => ToolKind::Rotate,
            Self::ColorPop(_) => ToolKind::ColorPop,
        }
    }

    fn as_tool(&self) -> &dyn Tool {
        match self {
            Self::Crop(tool) => tool,
            Self::Draw(tool) => tool,
            Self::Rotate(tool) => tool,
            Self::ColorPop(tool) => tool,
        }
    }

    fn as_tool_mut(&mut self) -> &mut dyn Tool {
        match self {
            Self::Crop(tool) => tool,
            Self::Draw(tool) => tool,
            Self::Rotate(tool) => tool,
            Self::ColorPop(tool) => tool,
        }
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        self.as_tool().name()
    }

    fn activate(&mut self, session: &mut ImageSession) {
        self.as_tool_mut().activate(session)
    }

    fn deactivate(&mut self, session: &mut ImageSession) {
        self.as_tool_mut().deactivate(session)
    }

    fn on_pointer_down(&mut self, pos: Pos2, session: &mut ImageSession, view: &ViewState) -> EditResult<()> {
        self.as_tool_mut().on_pointer_down(pos, session, view)
    }

    fn on_pointer_move(&mut self, pos: Pos2, session: &mut ImageSession, view: &ViewState) -> EditResult<()> {
        self.as_tool_mut().on_pointer_move(pos, session, view)
    }

    fn on_pointer_up(&mut self, pos: Pos2, session: &mut ImageSession, view: &ViewState) -> EditResult<()> {
        self.as_tool_mut().on_pointer_up(pos, session, view)
    }

    fn confirm(&mut self, session: &mut ImageSession, view: &ViewState) -> EditResult<()> {
        self.as_tool_mut().confirm(session, view)
    }

    fn cancel(&mut self, session: &mut ImageSession) {
        self.as_tool_mut().cancel(session)
    }

    fn overlay_rect(&self) -> Option<Rect> {
        self.as_tool().overlay_rect()
    }

    fn current_state_name(&self) -> &'static str {
        self.as_tool().current_state_name()
    }
}
