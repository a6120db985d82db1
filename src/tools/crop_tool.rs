use egui::{Pos2, Rect};
use log::debug;

use crate::command::Command;
use crate::error::{EditError, EditResult};
use crate::geometry::{PixelRect, ViewState};
use crate::session::ImageSession;
use crate::tools::{Tool, mapper_for};

/// Crop gesture state. Corners are kept in canvas space until the crop is
/// confirmed, so zooming in between still crops what the user outlined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropState {
    Idle,
    Dragging { start: Pos2, current: Pos2 },
    /// Rectangle drawn, waiting for Enter or Escape
    PendingConfirm { start: Pos2, end: Pos2 },
}

#[derive(Debug, Clone)]
pub struct CropTool {
    state: CropState,
}

impl Default for CropTool {
    fn default() -> Self {
        Self::new()
    }
}

impl CropTool {
    pub fn new() -> Self {
        Self { state: CropState::Idle }
    }

    pub fn state(&self) -> CropState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, CropState::PendingConfirm { .. })
    }
}

impl Tool for CropTool {
    fn name(&self) -> &'static str {
        "Crop"
    }

    fn deactivate(&mut self, _session: &mut ImageSession) {
        self.state = CropState::Idle;
    }

    fn on_pointer_down(&mut self, pos: Pos2, session: &mut ImageSession, _view: &ViewState) -> EditResult<()> {
        if session.has_image() {
            self.state = CropState::Dragging { start: pos, current: pos };
        }
        Ok(())
    }

    fn on_pointer_move(&mut self, pos: Pos2, _session: &mut ImageSession, _view: &ViewState) -> EditResult<()> {
        if let CropState::Dragging { current, .. } = &mut self.state {
            *current = pos;
        }
        Ok(())
    }

    fn on_pointer_up(&mut self, pos: Pos2, _session: &mut ImageSession, _view: &ViewState) -> EditResult<()> {
        if let CropState::Dragging { start, .. } = self.state {
            self.state = CropState::PendingConfirm { start, end: pos };
            debug!("Crop rectangle pending confirmation");
        }
        Ok(())
    }

    /// Crop to the outlined rectangle.
    ///
    /// A rectangle with no area inside the image is rejected with
    /// [`EditError::InvalidCropArea`] and nothing is committed. If the view
    /// isn't laid out yet the rectangle stays pending.
    fn confirm(&mut self, session: &mut ImageSession, view: &ViewState) -> EditResult<()> {
        let CropState::PendingConfirm { start, end } = self.state else {
            return Ok(());
        };
        let (Some(mapper), Some((width, height))) = (mapper_for(session, view)?, session.dimensions()) else {
            self.state = CropState::Idle;
            return Ok(());
        };
        self.state = CropState::Idle;

        let a = mapper.canvas_to_image(start);
        let b = mapper.canvas_to_image(end);
        let rect = PixelRect::from_corners(a, b, width, height).ok_or(EditError::InvalidCropArea)?;

        session.execute(&Command::Crop(rect))?;
        Ok(())
    }

    fn cancel(&mut self, _session: &mut ImageSession) {
        self.state = CropState::Idle;
    }

    fn overlay_rect(&self) -> Option<Rect> {
        match self.state {
            CropState::Idle => None,
            CropState::Dragging { start, current } => Some(Rect::from_two_pos(start, current)),
            CropState::PendingConfirm { start, end } => Some(Rect::from_two_pos(start, end)),
        }
    }

    fn current_state_name(&self) -> &'static str {
        match self.state {
            CropState::Idle => "Idle",
            CropState::Dragging { .. } => "Dragging",
            CropState::PendingConfirm { .. } => "PendingConfirm",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Color32, vec2};

    fn setup() -> (ImageSession, ViewState) {
        let mut session = ImageSession::default();
        session.create_blank(100, 50, Color32::WHITE).unwrap();
        let mut view = ViewState::default();
        view.set_viewport(vec2(100.0, 50.0));
        (session, view)
    }

    #[test]
    fn test_drag_then_confirm_crops() {
        let (mut session, view) = setup();
        let mut tool = CropTool::new();

        tool.on_pointer_down(Pos2::new(10.0, 10.0), &mut session, &view).unwrap();
        tool.on_pointer_move(Pos2::new(30.0, 20.0), &mut session, &view).unwrap();
        assert_eq!(tool.current_state_name(), "Dragging");
        tool.on_pointer_up(Pos2::new(40.0, 30.0), &mut session, &view).unwrap();
        assert!(tool.is_pending());
        assert_eq!(tool.overlay_rect(), Some(Rect::from_min_max(Pos2::new(10.0, 10.0), Pos2::new(40.0, 30.0))));

        tool.confirm(&mut session, &view).unwrap();
        assert_eq!(session.dimensions(), Some((30, 20)));
        assert_eq!(session.history().len(), 2);
        assert_eq!(tool.state(), CropState::Idle);
    }

    #[test]
    fn test_cancel_drops_rectangle() {
        let (mut session, view) = setup();
        let mut tool = CropTool::new();
        tool.on_pointer_down(Pos2::new(10.0, 10.0), &mut session, &view).unwrap();
        tool.on_pointer_up(Pos2::new(40.0, 30.0), &mut session, &view).unwrap();
        tool.cancel(&mut session);

        tool.confirm(&mut session, &view).unwrap();
        assert_eq!(session.dimensions(), Some((100, 50)));
        assert!(tool.overlay_rect().is_none());
    }

    #[test]
    fn test_pending_viewport_keeps_rectangle() {
        let mut session = ImageSession::default();
        session.create_blank(10, 10, Color32::WHITE).unwrap();
        let view = ViewState::default();
        let mut tool = CropTool::new();

        tool.on_pointer_down(Pos2::new(1.0, 1.0), &mut session, &view).unwrap();
        tool.on_pointer_up(Pos2::new(5.0, 5.0), &mut session, &view).unwrap();
        assert!(matches!(tool.confirm(&mut session, &view), Err(EditError::ViewportPending)));
        assert!(tool.is_pending());
    }
}
