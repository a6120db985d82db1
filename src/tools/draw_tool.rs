use egui::{Color32, Pos2};
use log::debug;

use crate::error::EditResult;
use crate::geometry::{ImagePoint, ViewState};
use crate::session::ImageSession;
use crate::stroke::{Brush, PALETTE};
use crate::tools::{Tool, mapper_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawState {
    Idle,
    /// Button held; `last` is the previous stroke point in image space
    Drawing { last: ImagePoint },
}

/// Freehand brush. Pixels are painted as the pointer moves and the whole
/// stroke becomes one history entry when the button is released.
#[derive(Debug, Clone)]
pub struct DrawTool {
    state: DrawState,
    brush: Brush,
}

impl DrawTool {
    pub fn new(radius: u32) -> Self {
        Self {
            state: DrawState::Idle,
            brush: Brush::new(PALETTE[0].1, radius),
        }
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn set_color(&mut self, color: Color32) {
        self.brush.color = color;
    }

    pub fn set_radius(&mut self, radius: u32) {
        self.brush.radius = radius;
    }

    fn finish(&mut self, session: &mut ImageSession) {
        if let DrawState::Drawing { .. } = self.state {
            self.state = DrawState::Idle;
            if session.commit_stroke() {
                debug!("Stroke committed");
            }
        }
    }
}

impl Tool for DrawTool {
    fn name(&self) -> &'static str {
        "Draw"
    }

    fn deactivate(&mut self, session: &mut ImageSession) {
        self.finish(session);
    }

    fn on_pointer_down(&mut self, pos: Pos2, session: &mut ImageSession, view: &ViewState) -> EditResult<()> {
        let Some(mapper) = mapper_for(session, view)? else {
            return Ok(());
        };
        let point = mapper.canvas_to_image(pos);
        session.draw_dot(point, &self.brush);
        self.state = DrawState::Drawing { last: point };
        Ok(())
    }

    fn on_pointer_move(&mut self, pos: Pos2, session: &mut ImageSession, view: &ViewState) -> EditResult<()> {
        let DrawState::Drawing { last } = self.state else {
            return Ok(());
        };
        let Some(mapper) = mapper_for(session, view)? else {
            return Ok(());
        };
        let point = mapper.canvas_to_image(pos);
        if point != last {
            session.draw_segment(last, point, &self.brush);
            self.state = DrawState::Drawing { last: point };
        }
        Ok(())
    }

    fn on_pointer_up(&mut self, _pos: Pos2, session: &mut ImageSession, _view: &ViewState) -> EditResult<()> {
        self.finish(session);
        Ok(())
    }

    fn cancel(&mut self, session: &mut ImageSession) {
        if let DrawState::Drawing { .. } = self.state {
            self.state = DrawState::Idle;
            session.discard_uncommitted();
        }
    }

    fn current_state_name(&self) -> &'static str {
        match self.state {
            DrawState::Idle => "Idle",
            DrawState::Drawing { .. } => "Drawing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;
    use image::GenericImageView;

    fn setup() -> (ImageSession, ViewState) {
        let mut session = ImageSession::default();
        session.create_blank(20, 20, Color32::WHITE).unwrap();
        let mut view = ViewState::default();
        view.set_viewport(vec2(20.0, 20.0));
        (session, view)
    }

    #[test]
    fn test_stroke_is_one_history_entry() {
        let (mut session, view) = setup();
        let mut tool = DrawTool::new(1);

        tool.on_pointer_down(Pos2::new(2.0, 2.0), &mut session, &view).unwrap();
        for x in 3..15 {
            tool.on_pointer_move(Pos2::new(x as f32, 2.0), &mut session, &view).unwrap();
        }
        assert!(session.has_uncommitted_changes());
        assert_eq!(session.history().len(), 1);

        tool.on_pointer_up(Pos2::new(15.0, 2.0), &mut session, &view).unwrap();
        assert_eq!(session.history().len(), 2);
        assert_eq!(tool.state(), DrawState::Idle);

        let image = session.current().unwrap();
        assert_eq!(image.get_pixel(8, 2).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(8, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_cancel_discards_stroke() {
        let (mut session, view) = setup();
        let mut tool = DrawTool::new(2);
        tool.set_color(Color32::BLACK);

        tool.on_pointer_down(Pos2::new(5.0, 5.0), &mut session, &view).unwrap();
        tool.cancel(&mut session);
        tool.on_pointer_up(Pos2::new(5.0, 5.0), &mut session, &view).unwrap();

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.current().unwrap().get_pixel(5, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_move_without_press_does_nothing() {
        let (mut session, view) = setup();
        let mut tool = DrawTool::new(1);
        tool.on_pointer_move(Pos2::new(5.0, 5.0), &mut session, &view).unwrap();
        assert!(!session.has_uncommitted_changes());
    }
}
