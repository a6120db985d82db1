use egui::Pos2;

use crate::command::Command;
use crate::error::{EditError, EditResult};
use crate::geometry::ViewState;
use crate::session::ImageSession;
use crate::tools::{Tool, mapper_for};

/// Click a colour to keep it; everything else turns grey
#[derive(Debug, Clone)]
pub struct ColorPopTool {
    tolerance: u8,
}

impl ColorPopTool {
    pub fn new(tolerance: u8) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> u8 {
        self.tolerance
    }

    pub fn set_tolerance(&mut self, tolerance: u8) {
        self.tolerance = tolerance;
    }
}

impl Tool for ColorPopTool {
    fn name(&self) -> &'static str {
        "Colour Pop"
    }

    fn deactivate(&mut self, _session: &mut ImageSession) {}

    fn on_pointer_down(&mut self, pos: Pos2, session: &mut ImageSession, view: &ViewState) -> EditResult<()> {
        let (Some(mapper), Some((width, height))) = (mapper_for(session, view)?, session.dimensions()) else {
            return Ok(());
        };
        let point = mapper.canvas_to_image(pos);
        if !point.is_inside(width, height) {
            return Err(EditError::PointOutsideImage { x: point.x, y: point.y });
        }
        let command = Command::ColorPop {
            x: point.x as u32,
            y: point.y as u32,
            tolerance: self.tolerance,
        };
        session.execute(&command)?;
        Ok(())
    }

    fn on_pointer_move(&mut self, _pos: Pos2, _session: &mut ImageSession, _view: &ViewState) -> EditResult<()> {
        Ok(())
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _session: &mut ImageSession, _view: &ViewState) -> EditResult<()> {
        Ok(())
    }

    fn current_state_name(&self) -> &'static str {
        "Armed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Color32, vec2};

    #[test]
    fn test_click_outside_image_is_rejected() {
        let mut session = ImageSession::default();
        session.create_blank(10, 10, Color32::RED).unwrap();
        let mut view = ViewState::default();
        // Image is centered with 45px of margin on each side
        view.set_viewport(vec2(100.0, 100.0));
        let mut tool = ColorPopTool::new(60);

        let result = tool.on_pointer_down(Pos2::new(5.0, 5.0), &mut session, &view);
        assert!(matches!(result, Err(EditError::PointOutsideImage { .. })));
        assert_eq!(session.history().len(), 1);

        tool.on_pointer_down(Pos2::new(50.0, 50.0), &mut session, &view).unwrap();
        assert_eq!(session.history().len(), 2);
    }
}
